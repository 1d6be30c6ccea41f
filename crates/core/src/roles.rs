//! Portal roles and who may move an application between statuses.

use serde::{Deserialize, Serialize};

use crate::application::ApplicationStatus;
use crate::error::CoreError;
use crate::types::UserId;

/// Role names as carried in access-token claims.
pub const ROLE_CITIZEN: &str = "citizen";
pub const ROLE_STAFF: &str = "staff";
pub const ROLE_OFFICER: &str = "officer";
pub const ROLE_ADMIN: &str = "admin";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Citizen,
    Staff,
    Officer,
    Admin,
}

impl Role {
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s {
            ROLE_CITIZEN => Ok(Self::Citizen),
            ROLE_STAFF => Ok(Self::Staff),
            ROLE_OFFICER => Ok(Self::Officer),
            ROLE_ADMIN => Ok(Self::Admin),
            _ => Err(CoreError::Validation(format!(
                "Invalid role '{s}'. Must be one of: citizen, staff, officer, admin"
            ))),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Citizen => ROLE_CITIZEN,
            Self::Staff => ROLE_STAFF,
            Self::Officer => ROLE_OFFICER,
            Self::Admin => ROLE_ADMIN,
        }
    }

    /// Staff, officers and admins work on other people's applications.
    pub fn is_privileged(self) -> bool {
        !matches!(self, Self::Citizen)
    }

    /// Whether this role may perform the (already allowed) transition.
    ///
    /// Staff handle intake and hand-over: `pending -> under_review` and
    /// `approved -> completed`. Officers and admins decide.
    pub fn may_transition(self, from: ApplicationStatus, to: ApplicationStatus) -> bool {
        use ApplicationStatus::*;
        match self {
            Self::Citizen => false,
            Self::Staff => matches!((from, to), (Pending, UnderReview) | (Approved, Completed)),
            Self::Officer | Self::Admin => true,
        }
    }
}

/// The authenticated caller of an operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub user_id: UserId,
    pub role: Role,
}

impl Actor {
    pub fn new(user_id: impl Into<UserId>, role: Role) -> Self {
        Self {
            user_id: user_id.into(),
            role,
        }
    }
}
