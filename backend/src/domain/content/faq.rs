//! Frequently asked questions shown in the app's help screen.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::validation;
use super::{ContentEntity, ContentKind, SortValue, common_sort_value};
use crate::domain::{Error, ReferenceId};

/// A question and answer pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Faq {
    /// Row identifier.
    pub id: i64,
    /// Text group holding the question.
    pub question_text_ref_id: ReferenceId,
    /// Text group holding the answer.
    pub answer_text_ref_id: ReferenceId,
    /// Position in the FAQ list, ascending.
    pub display_order: i32,
    /// When the row was inserted.
    pub created_at: DateTime<Utc>,
    /// When the row was last written.
    pub updated_at: DateTime<Utc>,
}

/// Fields accepted when creating an FAQ entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FaqDraft {
    pub question_text_ref_id: ReferenceId,
    pub answer_text_ref_id: ReferenceId,
    #[serde(default)]
    pub display_order: i32,
}

/// Partial FAQ update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FaqPatch {
    pub question_text_ref_id: Option<ReferenceId>,
    pub answer_text_ref_id: Option<ReferenceId>,
    pub display_order: Option<i32>,
}

impl ContentEntity for Faq {
    type Draft = FaqDraft;
    type Patch = FaqPatch;

    const KIND: ContentKind = ContentKind::Faq;
    const TEXT_FIELDS: &'static [&'static str] = &["question", "answer"];
    const DISPLAY_FIELD: &'static str = "question";
    const SORTABLE_FIELDS: &'static [&'static str] =
        &["id", "createdAt", "updatedAt", "displayOrder"];

    fn id(&self) -> i64 {
        self.id
    }

    fn text_ref(&self, field: &str) -> Option<ReferenceId> {
        match field {
            "question" => Some(self.question_text_ref_id),
            "answer" => Some(self.answer_text_ref_id),
            _ => None,
        }
    }

    fn sort_value(&self, field: &str) -> Option<SortValue> {
        match field {
            "displayOrder" => Some(SortValue::Int(i64::from(self.display_order))),
            _ => common_sort_value(field, self.id, self.created_at, self.updated_at),
        }
    }

    fn validate_draft(draft: &FaqDraft) -> Result<(), Error> {
        validation::non_negative_i32("displayOrder", Some(draft.display_order))
    }

    fn validate_patch(patch: &FaqPatch) -> Result<(), Error> {
        validation::non_negative_i32("displayOrder", patch.display_order)
    }

    fn from_draft(id: i64, draft: FaqDraft, now: DateTime<Utc>) -> Self {
        Self {
            id,
            question_text_ref_id: draft.question_text_ref_id,
            answer_text_ref_id: draft.answer_text_ref_id,
            display_order: draft.display_order,
            created_at: now,
            updated_at: now,
        }
    }

    fn apply_patch(&mut self, patch: FaqPatch, now: DateTime<Utc>) {
        if let Some(question) = patch.question_text_ref_id {
            self.question_text_ref_id = question;
        }
        if let Some(answer) = patch.answer_text_ref_id {
            self.answer_text_ref_id = answer;
        }
        if let Some(order) = patch.display_order {
            self.display_order = order;
        }
        self.updated_at = now;
    }
}
