//! In-memory `AssociationRepository`.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::domain::ports::{AssociationRepository, AssociationRepositoryError};
use crate::domain::{Association, AssociationKey, ContentKind, Relation, UserId};

#[derive(Default)]
struct Memberships {
    sequence: u64,
    rows: BTreeMap<AssociationKey, (u64, DateTime<Utc>)>,
}

/// Memberships keyed by [`AssociationKey`]; the map makes duplicates
/// impossible.
#[derive(Default)]
pub struct MemoryAssociationRepository {
    memberships: RwLock<Memberships>,
}

#[async_trait]
impl AssociationRepository for MemoryAssociationRepository {
    async fn insert(&self, key: &AssociationKey) -> Result<bool, AssociationRepositoryError> {
        let mut memberships = self.memberships.write().await;
        if memberships.rows.contains_key(key) {
            return Ok(false);
        }
        memberships.sequence += 1;
        let sequence = memberships.sequence;
        memberships.rows.insert(*key, (sequence, Utc::now()));
        Ok(true)
    }

    async fn delete(&self, key: &AssociationKey) -> Result<bool, AssociationRepositoryError> {
        let mut memberships = self.memberships.write().await;
        Ok(memberships.rows.remove(key).is_some())
    }

    async fn list(
        &self,
        user_id: UserId,
        relation: Relation,
        kind: ContentKind,
    ) -> Result<Vec<Association>, AssociationRepositoryError> {
        let memberships = self.memberships.read().await;
        let mut held: Vec<(u64, Association)> = memberships
            .rows
            .iter()
            .filter(|(key, _)| key.user_id == user_id && key.relation == relation && key.kind == kind)
            .map(|(key, (sequence, created_at))| {
                (
                    *sequence,
                    Association {
                        key: *key,
                        created_at: *created_at,
                    },
                )
            })
            .collect();
        held.sort_by(|a, b| b.0.cmp(&a.0));
        Ok(held.into_iter().map(|(_, association)| association).collect())
    }
}

#[cfg(test)]
mod tests {
    //! Uniqueness and ordering for in-memory memberships.
    use super::*;

    fn key(user: i64, target: i64) -> AssociationKey {
        AssociationKey::new(
            UserId::new(user).expect("positive id"),
            Relation::Visited,
            ContentKind::Location,
            target,
        )
    }

    #[tokio::test]
    async fn insert_reports_duplicates() {
        let repo = MemoryAssociationRepository::default();

        assert!(repo.insert(&key(1, 5)).await.expect("insert"));
        assert!(!repo.insert(&key(1, 5)).await.expect("insert"));
        assert!(repo.delete(&key(1, 5)).await.expect("delete"));
        assert!(!repo.delete(&key(1, 5)).await.expect("delete"));
    }

    #[tokio::test]
    async fn list_returns_newest_first_for_one_user() {
        let repo = MemoryAssociationRepository::default();
        for target in [3, 1, 2] {
            repo.insert(&key(1, target)).await.expect("insert");
        }
        repo.insert(&key(2, 9)).await.expect("insert");

        let held = repo
            .list(
                UserId::new(1).expect("positive id"),
                Relation::Visited,
                ContentKind::Location,
            )
            .await
            .expect("list");

        let targets: Vec<i64> = held.iter().map(|a| a.key.target_id).collect();
        assert_eq!(targets, vec![2, 1, 3]);
    }
}
