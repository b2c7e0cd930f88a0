//! Layered order lookup: db -> repository -> service -> handler.
//!
//! The db layer only knows the `NOT_FOUND` sentinel; the repository adds
//! context; the service reclassifies; the handler picks a status from the
//! nearest classified node and logs the full chain.

use crate::status;
use warden_core::{AppError, AppResult, ErrorKind, NOT_FOUND, UNAUTHORIZED};

const ORDERS: [(i64, &str); 3] = [(1, "order #1"), (2, "order #2"), (3, "order #3")];
const RESTRICTED_ID: i64 = 13;

fn find_order_in_db(id: i64) -> AppResult<&'static str> {
    if id == RESTRICTED_ID {
        return Err(AppError::wrap(&UNAUTHORIZED, format!("orders row id={id}")));
    }
    ORDERS
        .iter()
        .find(|(order_id, _)| *order_id == id)
        .map(|(_, name)| *name)
        .ok_or_else(|| AppError::wrap(&NOT_FOUND, format!("orders row id={id}")))
}

fn get_order(id: i64) -> AppResult<&'static str> {
    find_order_in_db(id).map_err(|e| AppError::wrap(e, "order repository"))
}

/// Service layer: validates input and classifies repository failures.
pub fn process_order(id: i64) -> AppResult<&'static str> {
    if id < 0 {
        return Err(
            AppError::validation(format!("invalid order id: {id}")).with_detail("field", "id"),
        );
    }
    get_order(id).map_err(|e| {
        if e.is(&NOT_FOUND) {
            AppError::wrap_as(ErrorKind::NotFound, e, "order not found")
                .with_detail("resource", "order")
                .with_detail("id", id)
        } else if e.is(&UNAUTHORIZED) {
            AppError::wrap_as(ErrorKind::Unauthorized, e, "order access denied")
        } else {
            AppError::wrap_as(ErrorKind::Internal, e, "internal error")
        }
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub body: String,
}

/// Handler layer: never sees how many layers wrapped the error.
pub fn handle_order_request(id: i64) -> Response {
    match process_order(id) {
        Ok(order) => Response {
            status: 200,
            body: order.to_string(),
        },
        Err(err) => {
            tracing::warn!(
                id,
                kind = %err.kind(),
                chain = %err.render_chain(),
                "order request failed"
            );
            let mut body = err.message().to_string();
            let field = err
                .as_kind(ErrorKind::Validation)
                .and_then(|e| e.detail("field"));
            if let Some(field) = field {
                body.push_str(&format!(" (field: {field})"));
            }
            if err.is(&NOT_FOUND) {
                body.push_str(" -> resource does not exist");
            }
            Response {
                status: status::status_for(&err),
                body,
            }
        }
    }
}
