//! Authorized-member access lists of public dashboards.
//!
//! Governs the administrative path only (read, edit, delete of the
//! dashboard entity). Anonymous widget reads never consult this list.

use serde::{Deserialize, Serialize};

use crate::types::DbId;

/// Member id granting a right to every authenticated user.
pub const ALL_MEMBERS: &str = "ALL";

/// Access rights, ordered from weakest to strongest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessRight {
    View,
    Edit,
    Admin,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizedMember {
    /// A user id, or [`ALL_MEMBERS`].
    pub id: String,
    pub access_right: AccessRight,
}

/// Members of a freshly published dashboard: the publisher administers
/// it and every authenticated user may view it.
pub fn initial_members(publisher_id: DbId) -> Vec<AuthorizedMember> {
    vec![
        AuthorizedMember {
            id: publisher_id.to_string(),
            access_right: AccessRight::Admin,
        },
        AuthorizedMember {
            id: ALL_MEMBERS.to_string(),
            access_right: AccessRight::View,
        },
    ]
}

/// Strongest right the list grants to `user_id`, if any.
pub fn effective_right(members: &[AuthorizedMember], user_id: DbId) -> Option<AccessRight> {
    let user_key = user_id.to_string();
    members
        .iter()
        .filter(|m| m.id == user_key || m.id == ALL_MEMBERS)
        .map(|m| m.access_right)
        .max()
}

/// Whether `user_id` holds at least `required`. Platform admins always do.
pub fn has_access(
    members: &[AuthorizedMember],
    user_id: DbId,
    is_platform_admin: bool,
    required: AccessRight,
) -> bool {
    is_platform_admin || effective_right(members, user_id).is_some_and(|r| r >= required)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn publisher_is_admin_and_everyone_views() {
        let members = initial_members(7);

        assert_eq!(effective_right(&members, 7), Some(AccessRight::Admin));
        assert_eq!(effective_right(&members, 8), Some(AccessRight::View));
    }

    #[test]
    fn view_right_cannot_administer() {
        let members = initial_members(7);

        assert!(has_access(&members, 8, false, AccessRight::View));
        assert!(!has_access(&members, 8, false, AccessRight::Admin));
        assert!(has_access(&members, 8, true, AccessRight::Admin));
    }

    #[test]
    fn empty_list_grants_nothing() {
        assert_eq!(effective_right(&[], 1), None);
        assert!(!has_access(&[], 1, false, AccessRight::View));
    }

    #[test]
    fn rights_are_ordered() {
        assert!(AccessRight::View < AccessRight::Edit);
        assert!(AccessRight::Edit < AccessRight::Admin);
    }
}
