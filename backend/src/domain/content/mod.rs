//! Content entities whose text is indirected through reference ids.
//!
//! Every content kind implements [`ContentEntity`], which is the only thing
//! the generic repository, the translation resolver and the association
//! services need to know about it: which fields hold text references, which
//! fields may be sorted on, which parents it points at, and how drafts and
//! patches are validated and applied.

mod category;
mod city;
mod event;
mod faq;
mod location;
mod route;
mod validation;

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::{Error, ReferenceId};

pub use category::{Category, CategoryDraft, CategoryPatch};
pub use city::{City, CityDraft, CityPatch};
pub use event::{Event, EventDraft, EventPatch};
pub use faq::{Faq, FaqDraft, FaqPatch};
pub use location::{Location, LocationDraft, LocationPatch};
pub use route::{Difficulty, Route, RouteDraft, RoutePatch};

/// Discriminator for the content kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ContentKind {
    City,
    Route,
    Location,
    Event,
    Category,
    Faq,
}

impl ContentKind {
    /// Stable storage and log label.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::City => "city",
            Self::Route => "route",
            Self::Location => "location",
            Self::Event => "event",
            Self::Category => "category",
            Self::Faq => "faq",
        }
    }

    /// Parse a storage label back into a kind.
    pub fn from_label(label: &str) -> Option<Self> {
        [
            Self::City,
            Self::Route,
            Self::Location,
            Self::Event,
            Self::Category,
            Self::Faq,
        ]
        .into_iter()
        .find(|kind| kind.as_str() == label)
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Value of a sortable field, used by in-memory ordering.
#[derive(Debug, Clone, PartialEq)]
pub enum SortValue {
    Int(i64),
    Float(f64),
    Time(DateTime<Utc>),
    Text(String),
}

impl SortValue {
    fn cmp_same(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Int(a), Self::Int(b)) => a.cmp(b),
            (Self::Float(a), Self::Float(b)) => a.total_cmp(b),
            (Self::Time(a), Self::Time(b)) => a.cmp(b),
            (Self::Text(a), Self::Text(b)) => a.cmp(b),
            _ => Ordering::Equal,
        }
    }
}

/// Compare optional sort values with missing values last, matching
/// PostgreSQL's default `NULLS LAST` for ascending order.
pub fn compare_sort_values(a: Option<&SortValue>, b: Option<&SortValue>) -> Ordering {
    match (a, b) {
        (Some(left), Some(right)) => left.cmp_same(right),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Sort value for the fields every entity carries.
pub(crate) fn common_sort_value(
    field: &str,
    id: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
) -> Option<SortValue> {
    match field {
        "id" => Some(SortValue::Int(id)),
        "createdAt" => Some(SortValue::Time(created_at)),
        "updatedAt" => Some(SortValue::Time(updated_at)),
        _ => None,
    }
}

/// Optional restriction applied to list and count queries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContentFilter {
    /// Only rows whose parent column (see [`ContentEntity::PARENT_FIELD`])
    /// equals this id.
    pub parent_id: Option<i64>,
}

impl ContentFilter {
    /// Filter to children of `parent_id`.
    pub fn by_parent(parent_id: i64) -> Self {
        Self {
            parent_id: Some(parent_id),
        }
    }
}

/// A reference from a draft or patch to a parent row that must exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParentRef {
    /// Kind of the parent row.
    pub kind: ContentKind,
    /// Parent row id.
    pub id: i64,
    /// Wire name of the referencing field, reported when the parent is missing.
    pub field: &'static str,
}

impl ParentRef {
    /// Reference parent `id` of `kind` through `field`.
    pub fn new(kind: ContentKind, id: i64, field: &'static str) -> Self {
        Self { kind, id, field }
    }
}

/// A content entity storing text as reference ids.
pub trait ContentEntity: Clone + fmt::Debug + Serialize + Send + Sync + 'static {
    /// Payload accepted on create.
    type Draft: Clone + fmt::Debug + DeserializeOwned + Send + Sync + 'static;
    /// Partial payload accepted on update; absent fields are left unchanged.
    type Patch: Clone + fmt::Debug + DeserializeOwned + Send + Sync + 'static;

    const KIND: ContentKind;
    /// Logical names of the text fields (`name`, `description`, ...).
    const TEXT_FIELDS: &'static [&'static str];
    /// Text field whose resolved value orders "available" listings.
    const DISPLAY_FIELD: &'static str;
    /// Client-facing names accepted as `sortBy`.
    const SORTABLE_FIELDS: &'static [&'static str];
    /// Client-facing name of the parent filter (for example `cityId`).
    const PARENT_FIELD: Option<&'static str> = None;

    fn id(&self) -> i64;

    /// Reference id stored for the text field `field`, if set.
    fn text_ref(&self, field: &str) -> Option<ReferenceId>;

    /// Value of the parent column named by [`Self::PARENT_FIELD`].
    fn parent_id(&self) -> Option<i64> {
        None
    }

    fn sort_value(&self, field: &str) -> Option<SortValue>;

    fn validate_draft(draft: &Self::Draft) -> Result<(), Error>;

    fn validate_patch(patch: &Self::Patch) -> Result<(), Error>;

    fn draft_parents(_draft: &Self::Draft) -> Vec<ParentRef> {
        Vec::new()
    }

    fn patch_parents(_patch: &Self::Patch) -> Vec<ParentRef> {
        Vec::new()
    }

    /// Materialise a draft as a stored row.
    fn from_draft(id: i64, draft: Self::Draft, now: DateTime<Utc>) -> Self;

    /// Apply the fields present in `patch`.
    fn apply_patch(&mut self, patch: Self::Patch, now: DateTime<Utc>);

    /// Whether `field` may be used as `sortBy`.
    fn is_sortable(field: &str) -> bool {
        Self::SORTABLE_FIELDS.contains(&field)
    }
}

/// An entity together with its text resolved for one language.
///
/// Serialises the entity's own fields (including the raw `*TextRefId`
/// values needed by edit forms) side by side with the resolved text keyed by
/// logical field name. Unresolved fields are omitted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Localized<T> {
    /// The stored row, untouched.
    #[serde(flatten)]
    pub entity: T,
    /// Resolved text keyed by logical field name, e.g. `name`.
    #[serde(flatten)]
    pub texts: BTreeMap<&'static str, String>,
}

impl<T: ContentEntity> Localized<T> {
    /// Wrap an entity with no text resolved yet.
    pub fn unresolved(entity: T) -> Self {
        Self {
            entity,
            texts: BTreeMap::new(),
        }
    }

    /// Resolved text of one field.
    pub fn text(&self, field: &str) -> Option<&str> {
        self.texts.get(field).map(String::as_str)
    }

    /// Resolved text of the field used to label and sort the row.
    pub fn display_text(&self) -> Option<&str> {
        self.text(T::DISPLAY_FIELD)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Some(SortValue::Int(1)), Some(SortValue::Int(2)), Ordering::Less)]
    #[case(Some(SortValue::Float(2.5)), Some(SortValue::Float(1.0)), Ordering::Greater)]
    #[case(Some(SortValue::Int(1)), None, Ordering::Less)]
    #[case(None, Some(SortValue::Text("a".to_owned())), Ordering::Greater)]
    #[case(None, None, Ordering::Equal)]
    fn missing_values_sort_last(
        #[case] a: Option<SortValue>,
        #[case] b: Option<SortValue>,
        #[case] expected: Ordering,
    ) {
        assert_eq!(compare_sort_values(a.as_ref(), b.as_ref()), expected);
    }

    #[rstest]
    fn kind_labels_round_trip() {
        for kind in [
            ContentKind::City,
            ContentKind::Route,
            ContentKind::Location,
            ContentKind::Event,
            ContentKind::Category,
            ContentKind::Faq,
        ] {
            assert_eq!(ContentKind::from_label(kind.as_str()), Some(kind));
        }
        assert_eq!(ContentKind::from_label("story"), None);
    }
}
