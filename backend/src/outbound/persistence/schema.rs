//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the migrations under `backend/migrations`
//! exactly. Regenerate with `diesel print-schema` after schema changes.

diesel::table! {
    /// Allocated reference ids. A row exists for every id a text group uses.
    text_references (reference_id) {
        reference_id -> Int8,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// One row per (reference, language) pair.
    localized_texts (text_id) {
        text_id -> Int8,
        reference_id -> Int8,
        /// Short language tag such as `pt` or `en`.
        language_code -> Varchar,
        text_content -> Text,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    cities (id) {
        id -> Int8,
        name_text_ref_id -> Int8,
        description_text_ref_id -> Nullable<Int8>,
        state -> Nullable<Varchar>,
        latitude -> Nullable<Float8>,
        longitude -> Nullable<Float8>,
        image_url -> Nullable<Text>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
        /// Set by archive; archived rows are excluded from every read.
        deleted_at -> Nullable<Timestamptz>,
    }
}

diesel::table! {
    categories (id) {
        id -> Int8,
        name_text_ref_id -> Int8,
        icon -> Nullable<Varchar>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
        deleted_at -> Nullable<Timestamptz>,
    }
}

diesel::table! {
    faqs (id) {
        id -> Int8,
        question_text_ref_id -> Int8,
        answer_text_ref_id -> Int8,
        display_order -> Int4,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
        deleted_at -> Nullable<Timestamptz>,
    }
}

diesel::table! {
    routes (id) {
        id -> Int8,
        city_id -> Int8,
        title_text_ref_id -> Int8,
        description_text_ref_id -> Nullable<Int8>,
        distance_km -> Nullable<Float8>,
        duration_minutes -> Nullable<Int4>,
        /// One of `easy`, `moderate`, `hard` (check constraint).
        difficulty -> Nullable<Varchar>,
        image_url -> Nullable<Text>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
        deleted_at -> Nullable<Timestamptz>,
    }
}

diesel::table! {
    locations (id) {
        id -> Int8,
        city_id -> Int8,
        category_id -> Nullable<Int8>,
        name_text_ref_id -> Int8,
        description_text_ref_id -> Nullable<Int8>,
        address -> Nullable<Varchar>,
        latitude -> Float8,
        longitude -> Float8,
        image_url -> Nullable<Text>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
        deleted_at -> Nullable<Timestamptz>,
    }
}

diesel::table! {
    events (id) {
        id -> Int8,
        city_id -> Int8,
        location_id -> Nullable<Int8>,
        title_text_ref_id -> Int8,
        description_text_ref_id -> Nullable<Int8>,
        starts_at -> Timestamptz,
        ends_at -> Nullable<Timestamptz>,
        image_url -> Nullable<Text>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
        deleted_at -> Nullable<Timestamptz>,
    }
}

diesel::table! {
    /// Favorite and visited memberships for every content kind.
    ///
    /// Unique on `(user_id, relation, target_kind, target_id)`.
    user_associations (id) {
        id -> Int8,
        user_id -> Int8,
        relation -> Varchar,
        target_kind -> Varchar,
        target_id -> Int8,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(localized_texts -> text_references (reference_id));
diesel::joinable!(routes -> cities (city_id));
diesel::joinable!(locations -> cities (city_id));
diesel::joinable!(locations -> categories (category_id));
diesel::joinable!(events -> cities (city_id));
diesel::joinable!(events -> locations (location_id));

diesel::allow_tables_to_appear_in_same_query!(
    text_references,
    localized_texts,
    cities,
    categories,
    faqs,
    routes,
    locations,
    events,
    user_associations,
);
