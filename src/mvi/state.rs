/// Marker trait for slice state.
///
/// Snapshots are cloned out to subscribers, compared to skip redundant
/// notifications, and start from `Default`.
pub trait SliceState: Clone + PartialEq + Default + Send + Sync + 'static {}
