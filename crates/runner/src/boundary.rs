//! Fault boundary: turns a panic in one operation into an [`AppError`].
//!
//! Only panics raised while `op` runs on this frame are intercepted. Errors
//! the operation returns pass through untouched.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use warden_core::{AppError, AppResult};

const UNKNOWN_FAULT: &str = "unknown fault";

/// Run `op`, absorbing any panic as an error of kind `Fault`.
pub fn execute<T, F>(op: F) -> AppResult<T>
where
    F: FnOnce() -> AppResult<T>,
{
    match panic::catch_unwind(AssertUnwindSafe(op)) {
        Ok(result) => result,
        Err(payload) => {
            let description = describe_panic(&*payload);
            tracing::warn!(fault = %description, "fault absorbed at boundary");
            Err(AppError::fault(description))
        }
    }
}

/// Text of a panic payload: `&str`, `String`, or a panicked [`AppError`].
pub fn describe_panic(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else if let Some(e) = payload.downcast_ref::<AppError>() {
        e.render_chain()
    } else {
        UNKNOWN_FAULT.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use warden_core::{ErrorKind, NOT_FOUND};

    #[test]
    fn ok_passes_through() {
        assert_eq!(execute(|| Ok(42)).unwrap(), 42);
    }

    #[test]
    fn returned_error_is_unchanged() {
        let err = execute(|| -> AppResult<()> {
            Err(AppError::wrap(&NOT_FOUND, "order repository").with_detail("id", 0))
        })
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(err.message(), "order repository");
        assert_eq!(err.detail("id"), Some("0"));
        assert!(err.is(&NOT_FOUND));
    }

    #[test]
    fn str_panic_becomes_fault() {
        let err = execute(|| -> AppResult<()> { panic!("boom") }).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Fault);
        assert!(err.message().contains("boom"));
        assert!(err.cause().is_none());
    }

    #[test]
    fn formatted_panic_becomes_fault() {
        let index = 7;
        let err = execute(|| -> AppResult<()> { panic!("index {index} out of range") })
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Fault);
        assert_eq!(err.message(), "index 7 out of range");
    }

    #[test]
    fn app_error_payload_is_described() {
        let err = execute(|| -> AppResult<()> {
            panic::panic_any(AppError::wrap(&NOT_FOUND, "config"))
        })
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Fault);
        assert_eq!(err.message(), "config: not found");
    }

    #[test]
    fn unknown_payload() {
        let err = execute(|| -> AppResult<()> { panic::panic_any(17_u32) }).unwrap_err();
        assert_eq!(err.message(), UNKNOWN_FAULT);
    }

    #[test]
    fn nested_boundaries_only_catch_their_own_frame() {
        let outer = execute(|| {
            let inner = execute(|| -> AppResult<()> { panic!("inner") });
            assert!(inner.is_err());
            Ok("outer survived")
        });
        assert_eq!(outer.unwrap(), "outer survived");
    }
}
