//! Driving port for one favorite/visited relation over one content kind.

use async_trait::async_trait;

use crate::domain::{ContentEntity, Error, LanguageCode, Localized, Relation, UserId};

/// One user's favorites or visits of one content kind.
#[async_trait]
pub trait UserAssociations<T: ContentEntity>: Send + Sync {
    /// Whether this port manages favorites or visits.
    fn relation(&self) -> Relation;

    /// Targets the user holds, newest membership first, text resolved.
    async fn list(&self, user_id: UserId, language: &LanguageCode)
    -> Result<Vec<Localized<T>>, Error>;

    /// `NotFound` for a missing target, `Conflict` if already associated.
    async fn add(&self, user_id: UserId, target_id: i64) -> Result<(), Error>;

    /// `NotFound` when the membership does not exist.
    async fn remove(&self, user_id: UserId, target_id: i64) -> Result<(), Error>;

    /// Flip membership and return the new state.
    async fn toggle(&self, user_id: UserId, target_id: i64) -> Result<bool, Error>;

    /// Every live target the user does not hold, ordered by resolved
    /// display text (case-insensitive), then id.
    async fn available(
        &self,
        user_id: UserId,
        language: &LanguageCode,
    ) -> Result<Vec<Localized<T>>, Error>;
}
