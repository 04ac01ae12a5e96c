use std::borrow::Cow;
use vitrine_derive::vitrine_error;

#[vitrine_error]
pub enum DemoError {
    #[error("IO error{}: {source}", format_context(.context))]
    Io {
        #[source]
        source: std::io::Error,
        context: Option<Cow<'static, str>>,
    },

    #[error("Quota exceeded{}: {message}", format_context(.context))]
    #[hint("Free some space and try again")]
    Quota { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Internal error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

fn main() {
    let err = DemoError::from("boom");
    assert!(err.hint().is_none());
}
