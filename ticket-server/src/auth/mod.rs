//! Authentication & Authorization
//!
//! JWT bearer auth plus the single capability gate core operations
//! consult before running.

mod extractor;
mod jwt;
mod middleware;
mod permissions;

pub use jwt::{Claims, JwtConfig, JwtError, JwtService};
pub use middleware::{require_auth, require_capability};
pub use permissions::{Capability, role_allows};

use crate::db::models::Role;

/// Authenticated caller identity, injected by the auth middleware
#[derive(Debug, Clone)]
pub struct CurrentUser {
    /// "user:id" format
    pub id: String,
    pub name: String,
    pub role: Role,
}

impl CurrentUser {
    /// Single authorization gate
    pub fn can(&self, capability: Capability) -> bool {
        role_allows(self.role, capability)
    }

    /// Gate that fails with 403 when the capability is missing
    pub fn require(&self, capability: Capability) -> Result<(), crate::AppError> {
        if self.can(capability) {
            Ok(())
        } else {
            Err(crate::AppError::forbidden(format!(
                "Capability required: {:?}",
                capability
            )))
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

impl From<Claims> for CurrentUser {
    fn from(claims: Claims) -> Self {
        Self {
            id: claims.sub,
            name: claims.name,
            role: claims.role,
        }
    }
}
