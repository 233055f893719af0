//! Record access rule: admins reach everything, other users only what they created.

use thbfx_shared::AppError;
use thbfx_shared::types::UserId;
use thiserror::Error;

use super::{Principal, Role};

/// Access denials.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AccessError {
    /// The record does not exist.
    #[error("record not found")]
    NotFound,
    /// The record exists but belongs to someone else.
    #[error("you do not have access to this record")]
    Forbidden,
}

impl From<AccessError> for AppError {
    fn from(err: AccessError) -> Self {
        match err {
            AccessError::NotFound => Self::NotFound("Transaction not found".to_string()),
            AccessError::Forbidden => Self::Forbidden("Access denied".to_string()),
        }
    }
}

/// Checks whether `principal` may view or mutate a record owned by `owner`.
///
/// `owner` is `None` when the record does not exist. Existence is decided
/// first, so a request for a missing id is `NotFound` for everyone.
///
/// # Errors
///
/// Returns [`AccessError::NotFound`] for a missing record and
/// [`AccessError::Forbidden`] for someone else's record.
pub fn authorize(principal: &Principal, owner: Option<UserId>) -> Result<(), AccessError> {
    let owner = owner.ok_or(AccessError::NotFound)?;

    match principal.role {
        Role::Admin => Ok(()),
        Role::StandardUser if principal.id == owner => Ok(()),
        Role::StandardUser => Err(AccessError::Forbidden),
    }
}

/// Owner filter for listing: `None` lists everything.
#[must_use]
pub const fn visible_owner(principal: &Principal) -> Option<UserId> {
    match principal.role {
        Role::Admin => None,
        Role::StandardUser => Some(principal.id),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn user(role: Role) -> Principal {
        Principal::new(UserId::new(), role)
    }

    #[test]
    fn test_owner_may_access() {
        let me = user(Role::StandardUser);
        assert_eq!(authorize(&me, Some(me.id)), Ok(()));
    }

    #[test]
    fn test_other_users_record_is_forbidden() {
        let me = user(Role::StandardUser);
        assert_eq!(
            authorize(&me, Some(UserId::new())),
            Err(AccessError::Forbidden)
        );
    }

    #[test]
    fn test_admin_may_access_any_record() {
        let admin = user(Role::Admin);
        assert_eq!(authorize(&admin, Some(UserId::new())), Ok(()));
    }

    #[rstest]
    #[case(Role::Admin)]
    #[case(Role::StandardUser)]
    fn test_missing_record_is_not_found_before_forbidden(#[case] role: Role) {
        assert_eq!(authorize(&user(role), None), Err(AccessError::NotFound));
    }

    #[test]
    fn test_visible_owner() {
        let admin = user(Role::Admin);
        let me = user(Role::StandardUser);
        assert_eq!(visible_owner(&admin), None);
        assert_eq!(visible_owner(&me), Some(me.id));
    }

    #[test]
    fn test_maps_to_app_error() {
        assert_eq!(AppError::from(AccessError::NotFound).status_code(), 404);
        assert_eq!(AppError::from(AccessError::Forbidden).status_code(), 403);
    }
}
