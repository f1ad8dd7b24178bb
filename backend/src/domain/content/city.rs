//! Cities: the top-level parent of routes, locations and events.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::validation;
use super::{ContentEntity, ContentKind, SortValue, common_sort_value};
use crate::domain::{Error, ReferenceId};

/// A city visitors can browse and favorite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct City {
    /// Row identifier.
    pub id: i64,
    /// Text group holding the display name.
    pub name_text_ref_id: ReferenceId,
    /// Text group holding the long description.
    pub description_text_ref_id: Option<ReferenceId>,
    /// State abbreviation, e.g. `BA`.
    pub state: Option<String>,
    /// Latitude in decimal degrees.
    pub latitude: Option<f64>,
    /// Longitude in decimal degrees.
    pub longitude: Option<f64>,
    /// Cover image URL.
    pub image_url: Option<String>,
    /// When the row was inserted.
    pub created_at: DateTime<Utc>,
    /// When the row was last written.
    pub updated_at: DateTime<Utc>,
}

/// Fields accepted when creating a city.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CityDraft {
    /// Text group holding the display name.
    pub name_text_ref_id: ReferenceId,
    /// Text group holding the long description.
    #[serde(default)]
    pub description_text_ref_id: Option<ReferenceId>,
    /// State abbreviation, e.g. `BA`.
    #[serde(default)]
    pub state: Option<String>,
    /// Latitude in decimal degrees.
    #[serde(default)]
    pub latitude: Option<f64>,
    /// Longitude in decimal degrees.
    #[serde(default)]
    pub longitude: Option<f64>,
    /// Cover image URL.
    #[serde(default)]
    pub image_url: Option<String>,
}

/// Partial city update. Absent fields are left as stored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CityPatch {
    pub name_text_ref_id: Option<ReferenceId>,
    pub description_text_ref_id: Option<ReferenceId>,
    pub state: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub image_url: Option<String>,
}

fn validate_fields(
    state: Option<&str>,
    latitude: Option<f64>,
    longitude: Option<f64>,
    image_url: Option<&str>,
) -> Result<(), Error> {
    validation::short_text("state", state)?;
    validation::latitude("latitude", latitude)?;
    validation::longitude("longitude", longitude)?;
    validation::url("imageUrl", image_url)
}

impl ContentEntity for City {
    type Draft = CityDraft;
    type Patch = CityPatch;

    const KIND: ContentKind = ContentKind::City;
    const TEXT_FIELDS: &'static [&'static str] = &["name", "description"];
    const DISPLAY_FIELD: &'static str = "name";
    const SORTABLE_FIELDS: &'static [&'static str] = &["id", "createdAt", "updatedAt", "state"];

    fn id(&self) -> i64 {
        self.id
    }

    fn text_ref(&self, field: &str) -> Option<ReferenceId> {
        match field {
            "name" => Some(self.name_text_ref_id),
            "description" => self.description_text_ref_id,
            _ => None,
        }
    }

    fn sort_value(&self, field: &str) -> Option<SortValue> {
        match field {
            "state" => self.state.clone().map(SortValue::Text),
            _ => common_sort_value(field, self.id, self.created_at, self.updated_at),
        }
    }

    fn validate_draft(draft: &CityDraft) -> Result<(), Error> {
        validate_fields(
            draft.state.as_deref(),
            draft.latitude,
            draft.longitude,
            draft.image_url.as_deref(),
        )
    }

    fn validate_patch(patch: &CityPatch) -> Result<(), Error> {
        validate_fields(
            patch.state.as_deref(),
            patch.latitude,
            patch.longitude,
            patch.image_url.as_deref(),
        )
    }

    fn from_draft(id: i64, draft: CityDraft, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name_text_ref_id: draft.name_text_ref_id,
            description_text_ref_id: draft.description_text_ref_id,
            state: draft.state,
            latitude: draft.latitude,
            longitude: draft.longitude,
            image_url: draft.image_url,
            created_at: now,
            updated_at: now,
        }
    }

    fn apply_patch(&mut self, patch: CityPatch, now: DateTime<Utc>) {
        if let Some(name) = patch.name_text_ref_id {
            self.name_text_ref_id = name;
        }
        if patch.description_text_ref_id.is_some() {
            self.description_text_ref_id = patch.description_text_ref_id;
        }
        if patch.state.is_some() {
            self.state = patch.state;
        }
        if patch.latitude.is_some() {
            self.latitude = patch.latitude;
        }
        if patch.longitude.is_some() {
            self.longitude = patch.longitude;
        }
        if patch.image_url.is_some() {
            self.image_url = patch.image_url;
        }
        self.updated_at = now;
    }
}
