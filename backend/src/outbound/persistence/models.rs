//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. Conversions into domain types are
//! fallible because stored values (reference ids, language codes, enum
//! labels) are re-validated on the way out.

use chrono::{DateTime, Utc};
use diesel::prelude::*;

use crate::domain::{
    Association, AssociationKey, Category, CategoryDraft, CategoryPatch, City, CityDraft,
    CityPatch, ContentKind, Event, EventDraft, EventPatch, Faq, FaqDraft, FaqPatch, LanguageCode,
    LocalizedText, Location, LocationDraft, LocationPatch, ReferenceId, Relation, Route,
    RouteDraft, RoutePatch, UserId,
};

use super::schema::{
    categories, cities, events, faqs, localized_texts, locations, routes, user_associations,
};

fn reference(value: i64) -> Result<ReferenceId, String> {
    ReferenceId::new(value).map_err(|error| error.to_string())
}

fn optional_reference(value: Option<i64>) -> Result<Option<ReferenceId>, String> {
    value.map(reference).transpose()
}

// ---------------------------------------------------------------------------
// Localized text models
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = localized_texts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct LocalizedTextRow {
    pub text_id: i64,
    pub reference_id: i64,
    pub language_code: String,
    pub text_content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<LocalizedTextRow> for LocalizedText {
    type Error = String;

    fn try_from(row: LocalizedTextRow) -> Result<Self, Self::Error> {
        Ok(Self {
            text_id: row.text_id,
            reference_id: reference(row.reference_id)?,
            language_code: LanguageCode::new(&row.language_code)
                .map_err(|error| format!("stored language code: {error}"))?,
            text_content: row.text_content,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = localized_texts)]
pub(crate) struct NewLocalizedTextRow<'a> {
    pub reference_id: i64,
    pub language_code: &'a str,
    pub text_content: &'a str,
}

// ---------------------------------------------------------------------------
// City models
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = cities)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CityRow {
    pub id: i64,
    pub name_text_ref_id: i64,
    pub description_text_ref_id: Option<i64>,
    pub state: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<CityRow> for City {
    type Error = String;

    fn try_from(row: CityRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            name_text_ref_id: reference(row.name_text_ref_id)?,
            description_text_ref_id: optional_reference(row.description_text_ref_id)?,
            state: row.state,
            latitude: row.latitude,
            longitude: row.longitude,
            image_url: row.image_url,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = cities)]
pub(crate) struct NewCityRow {
    pub name_text_ref_id: i64,
    pub description_text_ref_id: Option<i64>,
    pub state: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub image_url: Option<String>,
}

impl From<CityDraft> for NewCityRow {
    fn from(draft: CityDraft) -> Self {
        Self {
            name_text_ref_id: draft.name_text_ref_id.get(),
            description_text_ref_id: draft.description_text_ref_id.map(ReferenceId::get),
            state: draft.state,
            latitude: draft.latitude,
            longitude: draft.longitude,
            image_url: draft.image_url,
        }
    }
}

/// `None` fields are left untouched by Diesel.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = cities)]
pub(crate) struct CityUpdate {
    pub name_text_ref_id: Option<i64>,
    pub description_text_ref_id: Option<i64>,
    pub state: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub image_url: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl From<CityPatch> for CityUpdate {
    fn from(patch: CityPatch) -> Self {
        Self {
            name_text_ref_id: patch.name_text_ref_id.map(ReferenceId::get),
            description_text_ref_id: patch.description_text_ref_id.map(ReferenceId::get),
            state: patch.state,
            latitude: patch.latitude,
            longitude: patch.longitude,
            image_url: patch.image_url,
            updated_at: Utc::now(),
        }
    }
}

// ---------------------------------------------------------------------------
// Category models
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = categories)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CategoryRow {
    pub id: i64,
    pub name_text_ref_id: i64,
    pub icon: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<CategoryRow> for Category {
    type Error = String;

    fn try_from(row: CategoryRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            name_text_ref_id: reference(row.name_text_ref_id)?,
            icon: row.icon,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = categories)]
pub(crate) struct NewCategoryRow {
    pub name_text_ref_id: i64,
    pub icon: Option<String>,
}

impl From<CategoryDraft> for NewCategoryRow {
    fn from(draft: CategoryDraft) -> Self {
        Self {
            name_text_ref_id: draft.name_text_ref_id.get(),
            icon: draft.icon,
        }
    }
}

#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = categories)]
pub(crate) struct CategoryUpdate {
    pub name_text_ref_id: Option<i64>,
    pub icon: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl From<CategoryPatch> for CategoryUpdate {
    fn from(patch: CategoryPatch) -> Self {
        Self {
            name_text_ref_id: patch.name_text_ref_id.map(ReferenceId::get),
            icon: patch.icon,
            updated_at: Utc::now(),
        }
    }
}

// ---------------------------------------------------------------------------
// FAQ models
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = faqs)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct FaqRow {
    pub id: i64,
    pub question_text_ref_id: i64,
    pub answer_text_ref_id: i64,
    pub display_order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<FaqRow> for Faq {
    type Error = String;

    fn try_from(row: FaqRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            question_text_ref_id: reference(row.question_text_ref_id)?,
            answer_text_ref_id: reference(row.answer_text_ref_id)?,
            display_order: row.display_order,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = faqs)]
pub(crate) struct NewFaqRow {
    pub question_text_ref_id: i64,
    pub answer_text_ref_id: i64,
    pub display_order: i32,
}

impl From<FaqDraft> for NewFaqRow {
    fn from(draft: FaqDraft) -> Self {
        Self {
            question_text_ref_id: draft.question_text_ref_id.get(),
            answer_text_ref_id: draft.answer_text_ref_id.get(),
            display_order: draft.display_order,
        }
    }
}

#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = faqs)]
pub(crate) struct FaqUpdate {
    pub question_text_ref_id: Option<i64>,
    pub answer_text_ref_id: Option<i64>,
    pub display_order: Option<i32>,
    pub updated_at: DateTime<Utc>,
}

impl From<FaqPatch> for FaqUpdate {
    fn from(patch: FaqPatch) -> Self {
        Self {
            question_text_ref_id: patch.question_text_ref_id.map(ReferenceId::get),
            answer_text_ref_id: patch.answer_text_ref_id.map(ReferenceId::get),
            display_order: patch.display_order,
            updated_at: Utc::now(),
        }
    }
}

// ---------------------------------------------------------------------------
// Route models
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = routes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct RouteRow {
    pub id: i64,
    pub city_id: i64,
    pub title_text_ref_id: i64,
    pub description_text_ref_id: Option<i64>,
    pub distance_km: Option<f64>,
    pub duration_minutes: Option<i32>,
    pub difficulty: Option<String>,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<RouteRow> for Route {
    type Error = String;

    fn try_from(row: RouteRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            city_id: row.city_id,
            title_text_ref_id: reference(row.title_text_ref_id)?,
            description_text_ref_id: optional_reference(row.description_text_ref_id)?,
            distance_km: row.distance_km,
            duration_minutes: row.duration_minutes,
            difficulty: row.difficulty.as_deref().map(str::parse).transpose()?,
            image_url: row.image_url,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = routes)]
pub(crate) struct NewRouteRow {
    pub city_id: i64,
    pub title_text_ref_id: i64,
    pub description_text_ref_id: Option<i64>,
    pub distance_km: Option<f64>,
    pub duration_minutes: Option<i32>,
    pub difficulty: Option<&'static str>,
    pub image_url: Option<String>,
}

impl From<RouteDraft> for NewRouteRow {
    fn from(draft: RouteDraft) -> Self {
        Self {
            city_id: draft.city_id,
            title_text_ref_id: draft.title_text_ref_id.get(),
            description_text_ref_id: draft.description_text_ref_id.map(ReferenceId::get),
            distance_km: draft.distance_km,
            duration_minutes: draft.duration_minutes,
            difficulty: draft.difficulty.map(|difficulty| difficulty.as_str()),
            image_url: draft.image_url,
        }
    }
}

#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = routes)]
pub(crate) struct RouteUpdate {
    pub city_id: Option<i64>,
    pub title_text_ref_id: Option<i64>,
    pub description_text_ref_id: Option<i64>,
    pub distance_km: Option<f64>,
    pub duration_minutes: Option<i32>,
    pub difficulty: Option<&'static str>,
    pub image_url: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl From<RoutePatch> for RouteUpdate {
    fn from(patch: RoutePatch) -> Self {
        Self {
            city_id: patch.city_id,
            title_text_ref_id: patch.title_text_ref_id.map(ReferenceId::get),
            description_text_ref_id: patch.description_text_ref_id.map(ReferenceId::get),
            distance_km: patch.distance_km,
            duration_minutes: patch.duration_minutes,
            difficulty: patch.difficulty.map(|difficulty| difficulty.as_str()),
            image_url: patch.image_url,
            updated_at: Utc::now(),
        }
    }
}

// ---------------------------------------------------------------------------
// Location models
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = locations)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct LocationRow {
    pub id: i64,
    pub city_id: i64,
    pub category_id: Option<i64>,
    pub name_text_ref_id: i64,
    pub description_text_ref_id: Option<i64>,
    pub address: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<LocationRow> for Location {
    type Error = String;

    fn try_from(row: LocationRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            city_id: row.city_id,
            category_id: row.category_id,
            name_text_ref_id: reference(row.name_text_ref_id)?,
            description_text_ref_id: optional_reference(row.description_text_ref_id)?,
            address: row.address,
            latitude: row.latitude,
            longitude: row.longitude,
            image_url: row.image_url,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = locations)]
pub(crate) struct NewLocationRow {
    pub city_id: i64,
    pub category_id: Option<i64>,
    pub name_text_ref_id: i64,
    pub description_text_ref_id: Option<i64>,
    pub address: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub image_url: Option<String>,
}

impl From<LocationDraft> for NewLocationRow {
    fn from(draft: LocationDraft) -> Self {
        Self {
            city_id: draft.city_id,
            category_id: draft.category_id,
            name_text_ref_id: draft.name_text_ref_id.get(),
            description_text_ref_id: draft.description_text_ref_id.map(ReferenceId::get),
            address: draft.address,
            latitude: draft.latitude,
            longitude: draft.longitude,
            image_url: draft.image_url,
        }
    }
}

#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = locations)]
pub(crate) struct LocationUpdate {
    pub city_id: Option<i64>,
    pub category_id: Option<i64>,
    pub name_text_ref_id: Option<i64>,
    pub description_text_ref_id: Option<i64>,
    pub address: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub image_url: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl From<LocationPatch> for LocationUpdate {
    fn from(patch: LocationPatch) -> Self {
        Self {
            city_id: patch.city_id,
            category_id: patch.category_id,
            name_text_ref_id: patch.name_text_ref_id.map(ReferenceId::get),
            description_text_ref_id: patch.description_text_ref_id.map(ReferenceId::get),
            address: patch.address,
            latitude: patch.latitude,
            longitude: patch.longitude,
            image_url: patch.image_url,
            updated_at: Utc::now(),
        }
    }
}

// ---------------------------------------------------------------------------
// Event models
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = events)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct EventRow {
    pub id: i64,
    pub city_id: i64,
    pub location_id: Option<i64>,
    pub title_text_ref_id: i64,
    pub description_text_ref_id: Option<i64>,
    pub starts_at: DateTime<Utc>,
    pub ends_at: Option<DateTime<Utc>>,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<EventRow> for Event {
    type Error = String;

    fn try_from(row: EventRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            city_id: row.city_id,
            location_id: row.location_id,
            title_text_ref_id: reference(row.title_text_ref_id)?,
            description_text_ref_id: optional_reference(row.description_text_ref_id)?,
            starts_at: row.starts_at,
            ends_at: row.ends_at,
            image_url: row.image_url,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = events)]
pub(crate) struct NewEventRow {
    pub city_id: i64,
    pub location_id: Option<i64>,
    pub title_text_ref_id: i64,
    pub description_text_ref_id: Option<i64>,
    pub starts_at: DateTime<Utc>,
    pub ends_at: Option<DateTime<Utc>>,
    pub image_url: Option<String>,
}

impl From<EventDraft> for NewEventRow {
    fn from(draft: EventDraft) -> Self {
        Self {
            city_id: draft.city_id,
            location_id: draft.location_id,
            title_text_ref_id: draft.title_text_ref_id.get(),
            description_text_ref_id: draft.description_text_ref_id.map(ReferenceId::get),
            starts_at: draft.starts_at,
            ends_at: draft.ends_at,
            image_url: draft.image_url,
        }
    }
}

#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = events)]
pub(crate) struct EventUpdate {
    pub city_id: Option<i64>,
    pub location_id: Option<i64>,
    pub title_text_ref_id: Option<i64>,
    pub description_text_ref_id: Option<i64>,
    pub starts_at: Option<DateTime<Utc>>,
    pub ends_at: Option<DateTime<Utc>>,
    pub image_url: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl From<EventPatch> for EventUpdate {
    fn from(patch: EventPatch) -> Self {
        Self {
            city_id: patch.city_id,
            location_id: patch.location_id,
            title_text_ref_id: patch.title_text_ref_id.map(ReferenceId::get),
            description_text_ref_id: patch.description_text_ref_id.map(ReferenceId::get),
            starts_at: patch.starts_at,
            ends_at: patch.ends_at,
            image_url: patch.image_url,
            updated_at: Utc::now(),
        }
    }
}

// ---------------------------------------------------------------------------
// Association models
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = user_associations)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserAssociationRow {
    pub user_id: i64,
    pub relation: String,
    pub target_kind: String,
    pub target_id: i64,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<UserAssociationRow> for Association {
    type Error = String;

    fn try_from(row: UserAssociationRow) -> Result<Self, Self::Error> {
        let user_id = UserId::new(row.user_id).map_err(|error| error.to_string())?;
        let relation = Relation::from_label(&row.relation)
            .ok_or_else(|| format!("unknown relation {}", row.relation))?;
        let kind = ContentKind::from_label(&row.target_kind)
            .ok_or_else(|| format!("unknown target kind {}", row.target_kind))?;
        Ok(Self {
            key: AssociationKey::new(user_id, relation, kind, row.target_id),
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = user_associations)]
pub(crate) struct NewUserAssociationRow {
    pub user_id: i64,
    pub relation: &'static str,
    pub target_kind: &'static str,
    pub target_id: i64,
}

impl From<&AssociationKey> for NewUserAssociationRow {
    fn from(key: &AssociationKey) -> Self {
        Self {
            user_id: key.user_id.get(),
            relation: key.relation.as_str(),
            target_kind: key.kind.as_str(),
            target_id: key.target_id,
        }
    }
}
