//! Caller identity as asserted by the upstream authentication layer.
//!
//! Token issuance and verification happen outside this service; requests
//! arrive carrying a user id and an admin flag that are trusted as-is.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::Error;

/// Numeric user identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(i64);

impl UserId {
    /// Wrap a raw id, rejecting non-positive values.
    pub fn new(value: i64) -> Result<Self, Error> {
        if value > 0 {
            Ok(Self(value))
        } else {
            Err(Error::invalid_request(format!(
                "user id must be a positive integer, got {value}"
            )))
        }
    }

    /// Raw id as asserted by the gateway.
    pub fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Authenticated caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedUser {
    /// Caller's id.
    pub user_id: UserId,
    /// Whether the caller may manage content and other users' lists.
    pub is_admin: bool,
}

impl AuthenticatedUser {
    /// Wrap an identity asserted upstream.
    pub fn new(user_id: UserId, is_admin: bool) -> Self {
        Self { user_id, is_admin }
    }

    /// Fail with `Forbidden` unless the caller is an administrator.
    pub fn require_admin(&self) -> Result<(), Error> {
        if self.is_admin {
            Ok(())
        } else {
            Err(Error::forbidden("administrator privileges required"))
        }
    }

    /// Fail with `Forbidden` unless the caller is `owner` or an administrator.
    pub fn require_self_or_admin(&self, owner: UserId) -> Result<(), Error> {
        if self.is_admin || self.user_id == owner {
            Ok(())
        } else {
            Err(Error::forbidden("cannot act on another user's associations"))
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    fn user(id: i64, is_admin: bool) -> AuthenticatedUser {
        AuthenticatedUser::new(UserId::new(id).expect("valid id"), is_admin)
    }

    #[rstest]
    fn rejects_non_positive_ids() {
        let err = UserId::new(0).expect_err("zero id");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
    }

    #[rstest]
    #[case(user(1, false), 1, true)]
    #[case(user(1, false), 2, false)]
    #[case(user(9, true), 2, true)]
    fn self_or_admin(#[case] caller: AuthenticatedUser, #[case] owner: i64, #[case] allowed: bool) {
        let owner = UserId::new(owner).expect("valid id");
        assert_eq!(caller.require_self_or_admin(owner).is_ok(), allowed);
    }

    #[rstest]
    fn non_admin_is_forbidden_from_admin_actions() {
        let err = user(3, false).require_admin().expect_err("not admin");
        assert_eq!(err.code(), ErrorCode::Forbidden);
    }
}
