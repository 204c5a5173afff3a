/// Common behaviour of errors returned by external capabilities.
pub trait CapabilityError: std::error::Error + Send + Sync + 'static {
    /// Whether a single retry may succeed.
    fn is_transient(&self) -> bool;

    /// The error to report when a call exceeds its deadline.
    fn timed_out() -> Self;
}
