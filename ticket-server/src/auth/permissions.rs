//! Capability Definitions
//!
//! Single authorization gate for core operations. Every operation names
//! the capability it needs and asks the gate once, up front - handlers
//! never compare role strings themselves.

use crate::db::models::Role;

/// What a caller may do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// Reserve capacity and create a booking
    CreateBooking,
    /// Cancel a booking the caller holds
    CancelOwnBooking,
    /// Cancel any booking (administrative cascade path)
    CancelAnyBooking,
    /// Create events and edit event details
    ManageEvents,
    /// Change an event's total capacity
    EditCapacity,
    /// Suspend accounts and list users
    ManageUsers,
    /// Dashboard statistics and global booking listings
    ViewReports,
}

/// Capability table per role
pub fn role_allows(role: Role, capability: Capability) -> bool {
    match role {
        // Admins hold every capability
        Role::Admin => true,
        Role::Customer => matches!(
            capability,
            Capability::CreateBooking | Capability::CancelOwnBooking
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn customer_cannot_touch_admin_capabilities() {
        for capability in [
            Capability::CancelAnyBooking,
            Capability::ManageEvents,
            Capability::EditCapacity,
            Capability::ManageUsers,
            Capability::ViewReports,
        ] {
            assert!(!role_allows(Role::Customer, capability));
        }
    }

    #[test]
    fn customer_can_book_and_cancel_own() {
        assert!(role_allows(Role::Customer, Capability::CreateBooking));
        assert!(role_allows(Role::Customer, Capability::CancelOwnBooking));
    }

    #[test]
    fn admin_holds_everything() {
        assert!(role_allows(Role::Admin, Capability::CancelAnyBooking));
        assert!(role_allows(Role::Admin, Capability::EditCapacity));
    }
}
