//! HTTP-style status codes for error kinds. Presentation only.

use warden_core::{AppError, ErrorKind};

pub fn status_code(kind: ErrorKind) -> u16 {
    match kind {
        ErrorKind::Validation => 400,
        ErrorKind::Unauthorized => 401,
        ErrorKind::NotFound => 404,
        ErrorKind::Internal | ErrorKind::Fault => 500,
    }
}

/// Status for the nearest classified node, i.e. the error itself.
pub fn status_for(err: &AppError) -> u16 {
    status_code(err.kind())
}

pub fn reason(code: u16) -> &'static str {
    match code {
        200 => "OK",
        400 => "Bad Request",
        401 => "Unauthorized",
        404 => "Not Found",
        _ => "Internal Server Error",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use warden_core::NOT_FOUND;

    #[test]
    fn every_kind_has_a_status() {
        let codes: Vec<_> = ErrorKind::ALL.iter().map(|k| status_code(*k)).collect();
        assert_eq!(codes, [400, 404, 401, 500, 500]);
    }

    #[test]
    fn status_uses_outermost_classification() {
        let err = AppError::wrap_as(
            ErrorKind::Internal,
            AppError::wrap(&NOT_FOUND, "repository"),
            "service",
        );
        assert_eq!(status_for(&err), 500);
        assert_eq!(reason(status_for(&err)), "Internal Server Error");
        assert_eq!(reason(404), "Not Found");
    }
}
