//! Dated events held in a city, optionally at a specific location.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::validation;
use super::{ContentEntity, ContentKind, ParentRef, SortValue, common_sort_value};
use crate::domain::{Error, ReferenceId};

/// A dated happening in a city.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    /// Row identifier.
    pub id: i64,
    /// City the row belongs to.
    pub city_id: i64,
    /// Venue hosting the event, when known.
    pub location_id: Option<i64>,
    /// Text group holding the title.
    pub title_text_ref_id: ReferenceId,
    /// Text group holding the long description.
    pub description_text_ref_id: Option<ReferenceId>,
    /// Start of the event.
    pub starts_at: DateTime<Utc>,
    /// End of the event; never before `starts_at`.
    pub ends_at: Option<DateTime<Utc>>,
    /// Cover image URL.
    pub image_url: Option<String>,
    /// When the row was inserted.
    pub created_at: DateTime<Utc>,
    /// When the row was last written.
    pub updated_at: DateTime<Utc>,
}

/// Fields accepted when creating an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDraft {
    /// City the row belongs to.
    pub city_id: i64,
    /// Venue hosting the event, when known.
    #[serde(default)]
    pub location_id: Option<i64>,
    /// Text group holding the title.
    pub title_text_ref_id: ReferenceId,
    /// Text group holding the long description.
    #[serde(default)]
    pub description_text_ref_id: Option<ReferenceId>,
    /// Start of the event.
    pub starts_at: DateTime<Utc>,
    /// End of the event; never before `starts_at`.
    #[serde(default)]
    pub ends_at: Option<DateTime<Utc>>,
    /// Cover image URL.
    #[serde(default)]
    pub image_url: Option<String>,
}

/// Partial event update.
///
/// The merged start and end are validated together.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventPatch {
    pub city_id: Option<i64>,
    pub location_id: Option<i64>,
    pub title_text_ref_id: Option<ReferenceId>,
    pub description_text_ref_id: Option<ReferenceId>,
    pub starts_at: Option<DateTime<Utc>>,
    pub ends_at: Option<DateTime<Utc>>,
    pub image_url: Option<String>,
}

fn parents(city_id: Option<i64>, location_id: Option<i64>) -> Vec<ParentRef> {
    let city = city_id.map(|id| ParentRef::new(ContentKind::City, id, "cityId"));
    let location = location_id.map(|id| ParentRef::new(ContentKind::Location, id, "locationId"));
    city.into_iter().chain(location).collect()
}

impl ContentEntity for Event {
    type Draft = EventDraft;
    type Patch = EventPatch;

    const KIND: ContentKind = ContentKind::Event;
    const TEXT_FIELDS: &'static [&'static str] = &["title", "description"];
    const DISPLAY_FIELD: &'static str = "title";
    const SORTABLE_FIELDS: &'static [&'static str] =
        &["id", "createdAt", "updatedAt", "startsAt"];
    const PARENT_FIELD: Option<&'static str> = Some("cityId");

    fn id(&self) -> i64 {
        self.id
    }

    fn text_ref(&self, field: &str) -> Option<ReferenceId> {
        match field {
            "title" => Some(self.title_text_ref_id),
            "description" => self.description_text_ref_id,
            _ => None,
        }
    }

    fn parent_id(&self) -> Option<i64> {
        Some(self.city_id)
    }

    fn sort_value(&self, field: &str) -> Option<SortValue> {
        match field {
            "startsAt" => Some(SortValue::Time(self.starts_at)),
            _ => common_sort_value(field, self.id, self.created_at, self.updated_at),
        }
    }

    fn validate_draft(draft: &EventDraft) -> Result<(), Error> {
        validation::positive_id("cityId", Some(draft.city_id))?;
        validation::positive_id("locationId", draft.location_id)?;
        validation::ends_after_starts(Some(draft.starts_at), draft.ends_at)?;
        validation::url("imageUrl", draft.image_url.as_deref())
    }

    // A lone endsAt is checked against the stored startsAt by the
    // events_window_check constraint.
    fn validate_patch(patch: &EventPatch) -> Result<(), Error> {
        validation::positive_id("cityId", patch.city_id)?;
        validation::positive_id("locationId", patch.location_id)?;
        validation::ends_after_starts(patch.starts_at, patch.ends_at)?;
        validation::url("imageUrl", patch.image_url.as_deref())
    }

    fn draft_parents(draft: &EventDraft) -> Vec<ParentRef> {
        parents(Some(draft.city_id), draft.location_id)
    }

    fn patch_parents(patch: &EventPatch) -> Vec<ParentRef> {
        parents(patch.city_id, patch.location_id)
    }

    fn from_draft(id: i64, draft: EventDraft, now: DateTime<Utc>) -> Self {
        Self {
            id,
            city_id: draft.city_id,
            location_id: draft.location_id,
            title_text_ref_id: draft.title_text_ref_id,
            description_text_ref_id: draft.description_text_ref_id,
            starts_at: draft.starts_at,
            ends_at: draft.ends_at,
            image_url: draft.image_url,
            created_at: now,
            updated_at: now,
        }
    }

    fn apply_patch(&mut self, patch: EventPatch, now: DateTime<Utc>) {
        if let Some(city_id) = patch.city_id {
            self.city_id = city_id;
        }
        if patch.location_id.is_some() {
            self.location_id = patch.location_id;
        }
        if let Some(title) = patch.title_text_ref_id {
            self.title_text_ref_id = title;
        }
        if patch.description_text_ref_id.is_some() {
            self.description_text_ref_id = patch.description_text_ref_id;
        }
        if let Some(starts_at) = patch.starts_at {
            self.starts_at = starts_at;
        }
        if patch.ends_at.is_some() {
            self.ends_at = patch.ends_at;
        }
        if patch.image_url.is_some() {
            self.image_url = patch.image_url;
        }
        self.updated_at = now;
    }
}
