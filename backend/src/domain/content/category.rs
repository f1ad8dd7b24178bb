//! Location categories (beaches, museums, restaurants, ...).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::validation;
use super::{ContentEntity, ContentKind, SortValue, common_sort_value};
use crate::domain::{Error, ReferenceId};

/// A grouping for locations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    /// Row identifier.
    pub id: i64,
    /// Text group holding the display name.
    pub name_text_ref_id: ReferenceId,
    /// Icon name used by the client.
    pub icon: Option<String>,
    /// When the row was inserted.
    pub created_at: DateTime<Utc>,
    /// When the row was last written.
    pub updated_at: DateTime<Utc>,
}

/// Fields accepted when creating a category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryDraft {
    pub name_text_ref_id: ReferenceId,
    #[serde(default)]
    pub icon: Option<String>,
}

/// Partial category update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryPatch {
    pub name_text_ref_id: Option<ReferenceId>,
    pub icon: Option<String>,
}

impl ContentEntity for Category {
    type Draft = CategoryDraft;
    type Patch = CategoryPatch;

    const KIND: ContentKind = ContentKind::Category;
    const TEXT_FIELDS: &'static [&'static str] = &["name"];
    const DISPLAY_FIELD: &'static str = "name";
    const SORTABLE_FIELDS: &'static [&'static str] = &["id", "createdAt", "updatedAt"];

    fn id(&self) -> i64 {
        self.id
    }

    fn text_ref(&self, field: &str) -> Option<ReferenceId> {
        (field == "name").then_some(self.name_text_ref_id)
    }

    fn sort_value(&self, field: &str) -> Option<SortValue> {
        common_sort_value(field, self.id, self.created_at, self.updated_at)
    }

    fn validate_draft(draft: &CategoryDraft) -> Result<(), Error> {
        validation::short_text("icon", draft.icon.as_deref())
    }

    fn validate_patch(patch: &CategoryPatch) -> Result<(), Error> {
        validation::short_text("icon", patch.icon.as_deref())
    }

    fn from_draft(id: i64, draft: CategoryDraft, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name_text_ref_id: draft.name_text_ref_id,
            icon: draft.icon,
            created_at: now,
            updated_at: now,
        }
    }

    fn apply_patch(&mut self, patch: CategoryPatch, now: DateTime<Utc>) {
        if let Some(name) = patch.name_text_ref_id {
            self.name_text_ref_id = name;
        }
        if patch.icon.is_some() {
            self.icon = patch.icon;
        }
        self.updated_at = now;
    }
}
