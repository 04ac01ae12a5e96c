use std::borrow::Cow;
use vitrine_derive::vitrine_error;

#[vitrine_error]
pub enum SampleError {
    #[error("IO error{}: {source}", format_context(.context))]
    Io { source: std::io::Error, context: Option<Cow<'static, str>> },

    #[error("Quota exceeded{}: {message}", format_context(.context))]
    #[hint("Remove unused entries or raise the quota")]
    Quota { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Internal error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

fn read_missing() -> Result<Vec<u8>, SampleError> {
    std::fs::read("/definitely/not/here/vitrine.bin").context("Reading fixture")
}

#[test]
fn vitrine_error_ui() {
    let t = trybuild::TestCases::new();
    t.pass("tests/ui/vitrine_error_pass.rs");
}

#[test]
fn source_errors_convert_with_context() {
    let err = read_missing().expect_err("file must not exist");
    assert!(matches!(err, SampleError::Io { context: Some(_), .. }));
    assert!(err.to_string().starts_with("IO error (Reading fixture)"));
}

#[test]
fn context_is_attached_to_existing_errors() {
    let result: Result<(), SampleError> =
        Err(SampleError::Quota { message: "5 MiB".into(), context: None });
    let err = result.context("Saving homepage").expect_err("still an error");
    assert_eq!(err.to_string(), "Quota exceeded (Saving homepage): 5 MiB");
}

#[test]
fn hints_are_exposed_per_variant() {
    let quota = SampleError::Quota { message: "full".into(), context: None };
    assert_eq!(quota.hint(), Some("Remove unused entries or raise the quota"));

    let internal = SampleError::from(String::from("unexpected"));
    assert_eq!(internal.hint(), None);
    assert_eq!(internal.to_string(), "Internal error: unexpected");
}
