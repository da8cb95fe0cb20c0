//! Well-known role name constants.
//!
//! These must match the role names embedded in issued access tokens.

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_CLINICIAN: &str = "clinician";
pub const ROLE_STAFF: &str = "staff";

/// Every role an access token may carry.
pub const KNOWN_ROLES: [&str; 3] = [ROLE_ADMIN, ROLE_CLINICIAN, ROLE_STAFF];

pub fn is_known_role(role: &str) -> bool {
    KNOWN_ROLES.contains(&role)
}

/// Whether a role may perform destructive waitlist operations.
pub fn can_remove_waitlist_entries(role: &str) -> bool {
    role == ROLE_ADMIN || role == ROLE_CLINICIAN
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_and_clinician_may_remove_entries() {
        assert!(can_remove_waitlist_entries(ROLE_ADMIN));
        assert!(can_remove_waitlist_entries(ROLE_CLINICIAN));
    }

    #[test]
    fn staff_may_not_remove_entries() {
        assert!(!can_remove_waitlist_entries(ROLE_STAFF));
        assert!(!can_remove_waitlist_entries(""));
    }

    #[test]
    fn role_names_are_case_sensitive() {
        assert!(is_known_role("staff"));
        assert!(!is_known_role("Staff"));
        assert!(!is_known_role("receptionist"));
    }
}
