use crate::kernel::error::Error;
use crate::session::error::SessionError;
use crate::settings::secret::CodecError;
use crate::storage::error::StoreError;

#[test]
fn test_subsystem_errors_convert() {
    let err: Error = StoreError::not_found("x").into();
    assert!(err.is_not_found());
    assert!(err.to_string().contains("'x'"));

    let err: Error = SessionError::collision("Work#").into();
    assert!(err.is_name_collision());
    assert!(!err.is_not_found());

    let err: Error = CodecError::Utf8.into();
    assert!(matches!(err, Error::Codec(CodecError::Utf8)));
}

#[test]
fn test_io_error_carries_operation_and_path() {
    let source = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
    let err = StoreError::io(source, "write_record", "/tmp/x");
    let text = err.to_string();
    assert!(text.contains("write_record"));
    assert!(text.contains("/tmp/x"));
}
