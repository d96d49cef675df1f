//! Platform role names carried in access tokens.
//!
//! These must match the `ck_users_role` constraint in `20260301000003_create_users.sql`.

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_PUBLISHER: &str = "publisher";
pub const ROLE_VIEWER: &str = "viewer";

/// Every role the platform issues tokens for.
pub const ALL_ROLES: [&str; 3] = [ROLE_ADMIN, ROLE_PUBLISHER, ROLE_VIEWER];

pub fn is_known_role(role: &str) -> bool {
    ALL_ROLES.contains(&role)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_platform_roles_are_known() {
        assert!(ALL_ROLES.iter().all(|r| is_known_role(r)));
        assert!(!is_known_role("Admin"));
        assert!(!is_known_role("creator"));
    }
}
