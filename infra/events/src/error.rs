use std::borrow::Cow;

/// Errors that can occur while configuring the notification bus.
#[vitrine_derive::vitrine_error]
pub enum EventBusError {
    /// Capacity must be greater than zero for the notice stream.
    #[error("Invalid capacity{}: {message}", format_context(.context))]
    InvalidCapacity { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}
