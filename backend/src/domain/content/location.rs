//! Points of interest within a city, optionally categorised.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::validation;
use super::{ContentEntity, ContentKind, ParentRef, SortValue, common_sort_value};
use crate::domain::{Error, ReferenceId};

/// A point of interest inside a city.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    /// Row identifier.
    pub id: i64,
    /// City the row belongs to.
    pub city_id: i64,
    /// Category the location is filed under.
    pub category_id: Option<i64>,
    /// Text group holding the display name.
    pub name_text_ref_id: ReferenceId,
    /// Text group holding the long description.
    pub description_text_ref_id: Option<ReferenceId>,
    /// Street address as displayed.
    pub address: Option<String>,
    /// Latitude in decimal degrees.
    pub latitude: f64,
    /// Longitude in decimal degrees.
    pub longitude: f64,
    /// Cover image URL.
    pub image_url: Option<String>,
    /// When the row was inserted.
    pub created_at: DateTime<Utc>,
    /// When the row was last written.
    pub updated_at: DateTime<Utc>,
}

/// Fields accepted when creating a location.
///
/// Coordinates are required and range-checked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationDraft {
    /// City the row belongs to.
    pub city_id: i64,
    /// Category the location is filed under.
    #[serde(default)]
    pub category_id: Option<i64>,
    /// Text group holding the display name.
    pub name_text_ref_id: ReferenceId,
    /// Text group holding the long description.
    #[serde(default)]
    pub description_text_ref_id: Option<ReferenceId>,
    /// Street address as displayed.
    #[serde(default)]
    pub address: Option<String>,
    /// Latitude in decimal degrees.
    pub latitude: f64,
    /// Longitude in decimal degrees.
    pub longitude: f64,
    /// Cover image URL.
    #[serde(default)]
    pub image_url: Option<String>,
}

/// Partial location update. Absent fields are left as stored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationPatch {
    pub city_id: Option<i64>,
    pub category_id: Option<i64>,
    pub name_text_ref_id: Option<ReferenceId>,
    pub description_text_ref_id: Option<ReferenceId>,
    pub address: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub image_url: Option<String>,
}

fn parents(city_id: Option<i64>, category_id: Option<i64>) -> Vec<ParentRef> {
    let city = city_id.map(|id| ParentRef::new(ContentKind::City, id, "cityId"));
    let category = category_id.map(|id| ParentRef::new(ContentKind::Category, id, "categoryId"));
    city.into_iter().chain(category).collect()
}

impl ContentEntity for Location {
    type Draft = LocationDraft;
    type Patch = LocationPatch;

    const KIND: ContentKind = ContentKind::Location;
    const TEXT_FIELDS: &'static [&'static str] = &["name", "description"];
    const DISPLAY_FIELD: &'static str = "name";
    const SORTABLE_FIELDS: &'static [&'static str] = &["id", "createdAt", "updatedAt"];
    const PARENT_FIELD: Option<&'static str> = Some("cityId");

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

    fn parent_id(&self) -> Option<i64> {
        Some(self.city_id)
    }

    fn sort_value(&self, field: &str) -> Option<SortValue> {
        common_sort_value(field, self.id, self.created_at, self.updated_at)
    }

    fn validate_draft(draft: &LocationDraft) -> Result<(), Error> {
        validation::positive_id("cityId", Some(draft.city_id))?;
        validation::positive_id("categoryId", draft.category_id)?;
        validation::short_text("address", draft.address.as_deref())?;
        validation::latitude("latitude", Some(draft.latitude))?;
        validation::longitude("longitude", Some(draft.longitude))?;
        validation::url("imageUrl", draft.image_url.as_deref())
    }

    fn validate_patch(patch: &LocationPatch) -> Result<(), Error> {
        validation::positive_id("cityId", patch.city_id)?;
        validation::positive_id("categoryId", patch.category_id)?;
        validation::short_text("address", patch.address.as_deref())?;
        validation::latitude("latitude", patch.latitude)?;
        validation::longitude("longitude", patch.longitude)?;
        validation::url("imageUrl", patch.image_url.as_deref())
    }

    fn draft_parents(draft: &LocationDraft) -> Vec<ParentRef> {
        parents(Some(draft.city_id), draft.category_id)
    }

    fn patch_parents(patch: &LocationPatch) -> Vec<ParentRef> {
        parents(patch.city_id, patch.category_id)
    }

    fn from_draft(id: i64, draft: LocationDraft, now: DateTime<Utc>) -> Self {
        Self {
            id,
            city_id: draft.city_id,
            category_id: draft.category_id,
            name_text_ref_id: draft.name_text_ref_id,
            description_text_ref_id: draft.description_text_ref_id,
            address: draft.address,
            latitude: draft.latitude,
            longitude: draft.longitude,
            image_url: draft.image_url,
            created_at: now,
            updated_at: now,
        }
    }

    fn apply_patch(&mut self, patch: LocationPatch, now: DateTime<Utc>) {
        if let Some(city_id) = patch.city_id {
            self.city_id = city_id;
        }
        if patch.category_id.is_some() {
            self.category_id = patch.category_id;
        }
        if let Some(name) = patch.name_text_ref_id {
            self.name_text_ref_id = name;
        }
        if patch.description_text_ref_id.is_some() {
            self.description_text_ref_id = patch.description_text_ref_id;
        }
        if patch.address.is_some() {
            self.address = patch.address;
        }
        if let Some(latitude) = patch.latitude {
            self.latitude = latitude;
        }
        if let Some(longitude) = patch.longitude {
            self.longitude = longitude;
        }
        if patch.image_url.is_some() {
            self.image_url = patch.image_url;
        }
        self.updated_at = now;
    }
}
