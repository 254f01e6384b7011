use time::OffsetDateTime;

/// Source of "now" for request timestamps.
pub trait Clock: Send + Sync + 'static {
    fn now(&self) -> OffsetDateTime;
}
