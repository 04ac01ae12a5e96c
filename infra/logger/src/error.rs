use std::borrow::Cow;
use tracing_appender::rolling::InitError;
use tracing_subscriber::util::TryInitError;

/// Why logging could not be set up for a Vitrine binary.
#[vitrine_derive::vitrine_error]
pub enum LoggerError {
    /// `logging.level`, `logging.filter` or a builder setting is unusable.
    #[error("Invalid logging settings{}: {message}", format_context(.context))]
    #[hint("Valid levels are trace, debug, info, warn, error and off")]
    InvalidConfiguration { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// `logging.dir` could not be created.
    #[error("Log directory unavailable{}: {source}", format_context(.context))]
    #[hint("Check that logging.dir is writable")]
    LogDir { source: std::io::Error, context: Option<Cow<'static, str>> },

    #[error("Log file rotation setup failed{}: {source}", format_context(.context))]
    #[hint("Check that logging.dir is writable")]
    Appender { source: InitError, context: Option<Cow<'static, str>> },

    /// The process already has a global subscriber; only the first `Logger` installs one.
    #[error("Subscriber already installed{}: {source}", format_context(.context))]
    Subscriber { source: TryInitError, context: Option<Cow<'static, str>> },
}
