//! # Authenticated Principal
//!
//! The order backend never parses credentials itself. An external
//! authentication middleware verifies the bearer token and hands the core a
//! [`Principal`]; everything downstream branches on this tagged union instead
//! of a dynamically-typed request attribute.

use serde::{Deserialize, Serialize};

/// Result of the (external) authentication middleware.
///
/// Passed explicitly into every lifecycle operation. `Anonymous` reaches the
/// service only when the transport layer chose not to reject the request
/// itself; the service then refuses any mutating operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Principal {
    /// No verified credential was presented.
    Anonymous,
    /// A verified credential resolving to a user within a company.
    Authenticated { user_id: String, company_id: String },
}

impl Principal {
    /// Convenience constructor for an authenticated principal.
    pub fn authenticated(user_id: impl Into<String>, company_id: impl Into<String>) -> Self {
        Principal::Authenticated {
            user_id: user_id.into(),
            company_id: company_id.into(),
        }
    }

    /// Tenant check: does this principal act for `company_id`?
    ///
    /// Anonymous principals belong to no company.
    pub fn is_same_company(&self, company_id: &str) -> bool {
        match self {
            Principal::Anonymous => false,
            Principal::Authenticated {
                company_id: own, ..
            } => own == company_id,
        }
    }

    /// The verified user id, if any.
    pub fn user_id(&self) -> Option<&str> {
        match self {
            Principal::Anonymous => None,
            Principal::Authenticated { user_id, .. } => Some(user_id),
        }
    }
}
