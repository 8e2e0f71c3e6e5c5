/// Trait for values that can be dispatched to a store.
///
/// Intents cross from operation tasks to the dispatcher task, so they
/// must be `Send + 'static`.
pub trait Intent: Send + 'static {
    /// Stable name for log output and filtering.
    fn name(&self) -> &'static str;
}
