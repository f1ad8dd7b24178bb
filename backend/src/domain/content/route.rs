//! Tourist routes (walking tours, trails) within a city.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::validation;
use super::{ContentEntity, ContentKind, ParentRef, SortValue, common_sort_value};
use crate::domain::{Error, ReferenceId};

/// Effort rating shown alongside a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    /// Flat and short; suitable for anyone.
    Easy,
    /// Some climbing or several hours on foot.
    Moderate,
    /// Steep or long; requires fitness.
    Hard,
}

impl Difficulty {
    /// Lowercase label stored in the database and sent on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Moderate => "moderate",
            Self::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "easy" => Ok(Self::Easy),
            "moderate" => Ok(Self::Moderate),
            "hard" => Ok(Self::Hard),
            other => Err(format!("unknown difficulty `{other}`")),
        }
    }
}

/// A tourist route within a city.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Route {
    /// Row identifier.
    pub id: i64,
    /// City the row belongs to.
    pub city_id: i64,
    /// Text group holding the title.
    pub title_text_ref_id: ReferenceId,
    /// Text group holding the long description.
    pub description_text_ref_id: Option<ReferenceId>,
    /// Total length in kilometres.
    pub distance_km: Option<f64>,
    /// Expected walking time.
    pub duration_minutes: Option<i32>,
    /// Effort rating.
    pub difficulty: Option<Difficulty>,
    /// Cover image URL.
    pub image_url: Option<String>,
    /// When the row was inserted.
    pub created_at: DateTime<Utc>,
    /// When the row was last written.
    pub updated_at: DateTime<Utc>,
}

/// Fields accepted when creating a route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteDraft {
    pub city_id: i64,
    pub title_text_ref_id: ReferenceId,
    #[serde(default)]
    pub description_text_ref_id: Option<ReferenceId>,
    #[serde(default)]
    pub distance_km: Option<f64>,
    #[serde(default)]
    pub duration_minutes: Option<i32>,
    #[serde(default)]
    pub difficulty: Option<Difficulty>,
    #[serde(default)]
    pub image_url: Option<String>,
}

/// Partial route update. Absent fields are left as stored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutePatch {
    pub city_id: Option<i64>,
    pub title_text_ref_id: Option<ReferenceId>,
    pub description_text_ref_id: Option<ReferenceId>,
    pub distance_km: Option<f64>,
    pub duration_minutes: Option<i32>,
    pub difficulty: Option<Difficulty>,
    pub image_url: Option<String>,
}

impl ContentEntity for Route {
    type Draft = RouteDraft;
    type Patch = RoutePatch;

    const KIND: ContentKind = ContentKind::Route;
    const TEXT_FIELDS: &'static [&'static str] = &["title", "description"];
    const DISPLAY_FIELD: &'static str = "title";
    const SORTABLE_FIELDS: &'static [&'static str] = &[
        "id",
        "createdAt",
        "updatedAt",
        "distanceKm",
        "durationMinutes",
    ];
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
            "distanceKm" => self.distance_km.map(SortValue::Float),
            "durationMinutes" => self
                .duration_minutes
                .map(|minutes| SortValue::Int(i64::from(minutes))),
            _ => common_sort_value(field, self.id, self.created_at, self.updated_at),
        }
    }

    fn validate_draft(draft: &RouteDraft) -> Result<(), Error> {
        validation::positive_id("cityId", Some(draft.city_id))?;
        validation::non_negative_f64("distanceKm", draft.distance_km)?;
        validation::non_negative_i32("durationMinutes", draft.duration_minutes)?;
        validation::url("imageUrl", draft.image_url.as_deref())
    }

    fn validate_patch(patch: &RoutePatch) -> Result<(), Error> {
        validation::positive_id("cityId", patch.city_id)?;
        validation::non_negative_f64("distanceKm", patch.distance_km)?;
        validation::non_negative_i32("durationMinutes", patch.duration_minutes)?;
        validation::url("imageUrl", patch.image_url.as_deref())
    }

    fn draft_parents(draft: &RouteDraft) -> Vec<ParentRef> {
        vec![ParentRef::new(ContentKind::City, draft.city_id, "cityId")]
    }

    fn patch_parents(patch: &RoutePatch) -> Vec<ParentRef> {
        patch
            .city_id
            .map(|id| ParentRef::new(ContentKind::City, id, "cityId"))
            .into_iter()
            .collect()
    }

    fn from_draft(id: i64, draft: RouteDraft, now: DateTime<Utc>) -> Self {
        Self {
            id,
            city_id: draft.city_id,
            title_text_ref_id: draft.title_text_ref_id,
            description_text_ref_id: draft.description_text_ref_id,
            distance_km: draft.distance_km,
            duration_minutes: draft.duration_minutes,
            difficulty: draft.difficulty,
            image_url: draft.image_url,
            created_at: now,
            updated_at: now,
        }
    }

    fn apply_patch(&mut self, patch: RoutePatch, now: DateTime<Utc>) {
        if let Some(city_id) = patch.city_id {
            self.city_id = city_id;
        }
        if let Some(title) = patch.title_text_ref_id {
            self.title_text_ref_id = title;
        }
        if patch.description_text_ref_id.is_some() {
            self.description_text_ref_id = patch.description_text_ref_id;
        }
        if patch.distance_km.is_some() {
            self.distance_km = patch.distance_km;
        }
        if patch.duration_minutes.is_some() {
            self.duration_minutes = patch.duration_minutes;
        }
        if patch.difficulty.is_some() {
            self.difficulty = patch.difficulty;
        }
        if patch.image_url.is_some() {
            self.image_url = patch.image_url;
        }
        self.updated_at = now;
    }
}
