use super::intent::Intent;
use super::state::SliceState;

/// The only place a slice's state changes.
///
/// `reduce` takes the current state by value and returns the next one.
/// It must not perform I/O or read clocks; anything non-deterministic
/// (generated ids, request tokens) is attached to the intent beforehand.
pub trait Reducer {
    type State: SliceState;
    type Intent: Intent;

    fn reduce(state: Self::State, intent: Self::Intent) -> Self::State;
}
