//! Favorite and visited memberships linking users to content.

use std::fmt;

use chrono::{DateTime, Utc};

use super::{ContentKind, UserId};

/// Kind of membership a user holds on a content row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Relation {
    /// The user bookmarked the row.
    Favorite,
    /// The user has been there.
    Visited,
}

impl Relation {
    /// Label stored in `user_associations.relation`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Favorite => "favorite",
            Self::Visited => "visited",
        }
    }

    /// Inverse of [`Relation::as_str`].
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "favorite" => Some(Self::Favorite),
            "visited" => Some(Self::Visited),
            _ => None,
        }
    }

    /// Response field reporting membership after a toggle.
    pub fn membership_field(self) -> &'static str {
        match self {
            Self::Favorite => "isFavorited",
            Self::Visited => "isVisited",
        }
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity of one membership row. Stores enforce uniqueness on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AssociationKey {
    /// Member.
    pub user_id: UserId,
    /// Favorite or visited.
    pub relation: Relation,
    /// Content kind of the target.
    pub kind: ContentKind,
    /// Target row id within `kind`.
    pub target_id: i64,
}

impl AssociationKey {
    /// Assemble a key from its parts.
    pub fn new(user_id: UserId, relation: Relation, kind: ContentKind, target_id: i64) -> Self {
        Self {
            user_id,
            relation,
            kind,
            target_id,
        }
    }
}

/// A stored membership.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Association {
    /// Which membership this is.
    pub key: AssociationKey,
    /// When the membership was recorded; lists are newest first.
    pub created_at: DateTime<Utc>,
}
