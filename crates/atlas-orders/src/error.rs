//! # Order Service Errors
//!
//! The caller-visible rejection taxonomy. Every variant carries a stable
//! kind (see [`OrderError::kind`]) and a human-readable message; storage
//! internals never leak into the message of [`OrderError::Internal`].

use thiserror::Error;

use atlas_core::ValidationError;
use atlas_db::DbError;

/// Rejections and failures of the order lifecycle operations.
///
/// Everything except `Internal` is a business-rule rejection: the request
/// was understood and refused, and (transactional boundaries aside, see the
/// crate docs) no partial mutation is visible to the caller.
#[derive(Debug, Error)]
pub enum OrderError {
    /// Malformed input; nothing was mutated.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Unknown order, product or company.
    #[error("{entity} not found")]
    NotFound { entity: &'static str, id: String },

    /// The principal may not act on this company's data.
    #[error("{0}")]
    Unauthorized(String),

    /// A requested product exists but belongs to another company.
    #[error("invalid product or product does not belong to the company")]
    CrossTenantProduct { product_id: String },

    /// Insufficient stock at reservation time. Named after the offending
    /// product so the caller can surface it.
    #[error("{name} is out of stock")]
    OutOfStock { name: String },

    /// The order has already been placed.
    #[error("order has already been placed")]
    OrderAlreadyFinalized,

    /// The order has been cancelled.
    #[error("order has been cancelled")]
    OrderCancelled,

    /// Storage failure or other unexpected condition. The source is kept
    /// for logs; the display string stays generic.
    #[error("internal server error")]
    Internal(#[source] DbError),
}

impl OrderError {
    /// Stable machine-readable kind, independent of the message wording.
    pub fn kind(&self) -> &'static str {
        match self {
            OrderError::Validation(_) => "validation_error",
            OrderError::NotFound { .. } => "not_found",
            OrderError::Unauthorized(_) => "unauthorized",
            OrderError::CrossTenantProduct { .. } => "cross_tenant_product",
            OrderError::OutOfStock { .. } => "out_of_stock",
            OrderError::OrderAlreadyFinalized => "order_already_finalized",
            OrderError::OrderCancelled => "order_cancelled",
            OrderError::Internal(_) => "internal",
        }
    }
}

/// Storage errors that reach the service without a more specific meaning
/// are internal failures.
impl From<DbError> for OrderError {
    fn from(err: DbError) -> Self {
        OrderError::Internal(err)
    }
}

/// Result type for lifecycle operations.
pub type OrderResult<T> = Result<T, OrderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds_are_stable() {
        assert_eq!(
            OrderError::OutOfStock {
                name: "Basmati Rice".into()
            }
            .kind(),
            "out_of_stock"
        );
        assert_eq!(OrderError::OrderAlreadyFinalized.kind(), "order_already_finalized");
    }

    #[test]
    fn test_internal_message_does_not_leak() {
        let err = OrderError::Internal(DbError::QueryFailed(
            "near \"SELEC\": syntax error".to_string(),
        ));
        assert_eq!(err.to_string(), "internal server error");
    }

    #[test]
    fn test_out_of_stock_names_product() {
        let err = OrderError::OutOfStock {
            name: "Sunflower Oil 1kg".into(),
        };
        assert_eq!(err.to_string(), "Sunflower Oil 1kg is out of stock");
    }
}
