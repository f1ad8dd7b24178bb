//! PostgreSQL-backed content repositories.
//!
//! Every content table shares the same shape (an `id`, timestamps and a
//! nullable `deleted_at`), so one macro generates the `ContentRepository`
//! implementation per table. The macro invocation lists the sortable
//! columns; anything else is rejected before a query is built.

use chrono::Utc;

use crate::domain::{Category, City, Event, Faq, Location, Route};

use super::models::{
    CategoryRow, CategoryUpdate, CityRow, CityUpdate, EventRow, EventUpdate, FaqRow, FaqUpdate,
    LocationRow, LocationUpdate, NewCategoryRow, NewCityRow, NewEventRow, NewFaqRow,
    NewLocationRow, NewRouteRow, RouteRow, RouteUpdate,
};
use super::schema::{categories, cities, events, faqs, locations, routes};

macro_rules! diesel_content_repository {
    (
        $(#[$meta:meta])*
        $name:ident for $entity:ty {
            table: $table:ident,
            row: $row:ty,
            new_row: $new_row:ty,
            update: $update:ty,
            parent: [$($parent:ident)?],
            sort: { $($sort_name:literal => $sort_column:ident),+ $(,)? } $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone)]
        pub struct $name {
            pool: $crate::outbound::persistence::DbPool,
        }

        impl $name {
            /// Create a new repository with the given connection pool.
            pub fn new(pool: $crate::outbound::persistence::DbPool) -> Self {
                Self { pool }
            }

            /// Rows not archived that match `filter`.
            fn live_rows(
                filter: $crate::domain::ContentFilter,
            ) -> $table::BoxedQuery<'static, diesel::pg::Pg> {
                use diesel::prelude::*;

                #[allow(unused_mut, reason = "only tables with a parent column reassign")]
                let mut query = $table::table
                    .filter($table::deleted_at.is_null())
                    .into_boxed();
                $(
                    if let Some(parent_id) = filter.parent_id {
                        query = query.filter($table::$parent.eq(parent_id));
                    }
                )?
                let _ = filter;
                query
            }

            fn convert(
                rows: Vec<$row>,
            ) -> Result<Vec<$entity>, $crate::domain::ports::ContentRepositoryError> {
                $crate::outbound::persistence::diesel_helpers::collect_rows(
                    rows,
                    $crate::domain::ports::ContentRepositoryError::query,
                )
            }

            fn ordered(
                query: $table::BoxedQuery<'static, diesel::pg::Pg>,
                sort: &pagination::SortSpec,
            ) -> Result<
                $table::BoxedQuery<'static, diesel::pg::Pg>,
                $crate::domain::ports::ContentRepositoryError,
            > {
                use diesel::prelude::*;
                use pagination::SortDirection;

                let query = match (sort.field(), sort.direction()) {
                    $(
                        ($sort_name, SortDirection::Asc) => {
                            query.order_by($table::$sort_column.asc())
                        }
                        ($sort_name, SortDirection::Desc) => {
                            query.order_by($table::$sort_column.desc())
                        }
                    )+
                    (other, _) => {
                        return Err(
                            $crate::domain::ports::ContentRepositoryError::unsupported_sort(other),
                        );
                    }
                };
                Ok(query.then_order_by($table::id.asc()))
            }
        }

        #[async_trait::async_trait]
        impl $crate::domain::ports::ContentRepository<$entity> for $name {
            async fn find_by_id(
                &self,
                id: i64,
            ) -> Result<Option<$entity>, $crate::domain::ports::ContentRepositoryError> {
                use diesel::prelude::*;
                use diesel_async::RunQueryDsl;

                let mut conn = self.pool.get().await.map_err(map_pool_error)?;
                let row: Option<$row> = Self::live_rows(Default::default())
                    .filter($table::id.eq(id))
                    .select(<$row>::as_select())
                    .first(&mut conn)
                    .await
                    .optional()
                    .map_err(map_content_diesel_error)?;

                row.map(<$entity>::try_from)
                    .transpose()
                    .map_err($crate::domain::ports::ContentRepositoryError::query)
            }

            async fn find_by_ids(
                &self,
                ids: &[i64],
            ) -> Result<Vec<$entity>, $crate::domain::ports::ContentRepositoryError> {
                use diesel::prelude::*;
                use diesel_async::RunQueryDsl;

                if ids.is_empty() {
                    return Ok(Vec::new());
                }
                let mut conn = self.pool.get().await.map_err(map_pool_error)?;
                let rows: Vec<$row> = Self::live_rows(Default::default())
                    .filter($table::id.eq_any(ids.to_vec()))
                    .order_by($table::id.asc())
                    .select(<$row>::as_select())
                    .load(&mut conn)
                    .await
                    .map_err(map_content_diesel_error)?;

                Self::convert(rows)
            }

            async fn find_all(
                &self,
                filter: $crate::domain::ContentFilter,
            ) -> Result<Vec<$entity>, $crate::domain::ports::ContentRepositoryError> {
                use diesel::prelude::*;
                use diesel_async::RunQueryDsl;

                let mut conn = self.pool.get().await.map_err(map_pool_error)?;
                let rows: Vec<$row> = Self::live_rows(filter)
                    .order_by($table::id.asc())
                    .select(<$row>::as_select())
                    .load(&mut conn)
                    .await
                    .map_err(map_content_diesel_error)?;

                Self::convert(rows)
            }

            async fn find_page(
                &self,
                request: &pagination::PageRequest,
                filter: $crate::domain::ContentFilter,
            ) -> Result<pagination::Paginated<$entity>, $crate::domain::ports::ContentRepositoryError>
            {
                use diesel::prelude::*;
                use diesel_async::RunQueryDsl;

                let sort = request.sort_or("id");
                let page_query = Self::ordered(Self::live_rows(filter), &sort)?;
                let offset = i64::try_from(request.offset()).map_err(|_| {
                    $crate::domain::ports::ContentRepositoryError::query("page offset out of range")
                })?;

                let mut conn = self.pool.get().await.map_err(map_pool_error)?;
                let total: i64 = Self::live_rows(filter)
                    .count()
                    .get_result(&mut conn)
                    .await
                    .map_err(map_content_diesel_error)?;
                let rows: Vec<$row> = page_query
                    .limit(i64::from(request.limit()))
                    .offset(offset)
                    .select(<$row>::as_select())
                    .load(&mut conn)
                    .await
                    .map_err(map_content_diesel_error)?;

                let items = Self::convert(rows)?;
                Ok(pagination::Paginated::new(
                    items,
                    u64::try_from(total).unwrap_or_default(),
                    request,
                ))
            }

            async fn exists(
                &self,
                id: i64,
            ) -> Result<bool, $crate::domain::ports::ContentRepositoryError> {
                use diesel::prelude::*;
                use diesel_async::RunQueryDsl;

                let mut conn = self.pool.get().await.map_err(map_pool_error)?;
                let count: i64 = Self::live_rows(Default::default())
                    .filter($table::id.eq(id))
                    .count()
                    .get_result(&mut conn)
                    .await
                    .map_err(map_content_diesel_error)?;

                Ok(count > 0)
            }

            async fn count(
                &self,
                filter: $crate::domain::ContentFilter,
            ) -> Result<u64, $crate::domain::ports::ContentRepositoryError> {
                use diesel::prelude::*;
                use diesel_async::RunQueryDsl;

                let mut conn = self.pool.get().await.map_err(map_pool_error)?;
                let count: i64 = Self::live_rows(filter)
                    .count()
                    .get_result(&mut conn)
                    .await
                    .map_err(map_content_diesel_error)?;

                Ok(u64::try_from(count).unwrap_or_default())
            }

            async fn create(
                &self,
                draft: <$entity as $crate::domain::ContentEntity>::Draft,
            ) -> Result<$entity, $crate::domain::ports::ContentRepositoryError> {
                use diesel::prelude::*;
                use diesel_async::RunQueryDsl;

                let new_row = <$new_row>::from(draft);
                let mut conn = self.pool.get().await.map_err(map_pool_error)?;
                let row: $row = diesel::insert_into($table::table)
                    .values(&new_row)
                    .returning(<$row>::as_returning())
                    .get_result(&mut conn)
                    .await
                    .map_err(map_content_diesel_error)?;

                <$entity>::try_from(row).map_err($crate::domain::ports::ContentRepositoryError::query)
            }

            async fn create_many(
                &self,
                drafts: Vec<<$entity as $crate::domain::ContentEntity>::Draft>,
            ) -> Result<Vec<$entity>, $crate::domain::ports::ContentRepositoryError> {
                use diesel::prelude::*;
                use diesel_async::RunQueryDsl;

                if drafts.is_empty() {
                    return Ok(Vec::new());
                }
                let new_rows: Vec<$new_row> = drafts.into_iter().map(<$new_row>::from).collect();
                let mut conn = self.pool.get().await.map_err(map_pool_error)?;
                // A single multi-row INSERT either stores every row or none.
                let rows: Vec<$row> = diesel::insert_into($table::table)
                    .values(&new_rows)
                    .returning(<$row>::as_returning())
                    .get_results(&mut conn)
                    .await
                    .map_err(map_content_diesel_error)?;

                Self::convert(rows)
            }

            async fn update(
                &self,
                id: i64,
                patch: <$entity as $crate::domain::ContentEntity>::Patch,
            ) -> Result<Option<$entity>, $crate::domain::ports::ContentRepositoryError> {
                use diesel::prelude::*;
                use diesel_async::RunQueryDsl;

                let changes = <$update>::from(patch);
                let mut conn = self.pool.get().await.map_err(map_pool_error)?;
                let row: Option<$row> = diesel::update(
                    $table::table
                        .filter($table::id.eq(id))
                        .filter($table::deleted_at.is_null()),
                )
                .set(&changes)
                .returning(<$row>::as_returning())
                .get_result(&mut conn)
                .await
                .optional()
                .map_err(map_content_diesel_error)?;

                row.map(<$entity>::try_from)
                    .transpose()
                    .map_err($crate::domain::ports::ContentRepositoryError::query)
            }

            async fn delete(
                &self,
                id: i64,
            ) -> Result<bool, $crate::domain::ports::ContentRepositoryError> {
                use diesel::prelude::*;
                use diesel_async::RunQueryDsl;

                let mut conn = self.pool.get().await.map_err(map_pool_error)?;
                let deleted = diesel::delete($table::table.filter($table::id.eq(id)))
                    .execute(&mut conn)
                    .await
                    .map_err(map_content_diesel_error)?;

                Ok(deleted > 0)
            }

            async fn delete_many(
                &self,
                ids: &[i64],
            ) -> Result<u64, $crate::domain::ports::ContentRepositoryError> {
                use diesel::prelude::*;
                use diesel_async::RunQueryDsl;

                if ids.is_empty() {
                    return Ok(0);
                }
                let mut conn = self.pool.get().await.map_err(map_pool_error)?;
                let deleted = diesel::delete($table::table.filter($table::id.eq_any(ids.to_vec())))
                    .execute(&mut conn)
                    .await
                    .map_err(map_content_diesel_error)?;

                Ok(deleted as u64)
            }

            async fn soft_delete(
                &self,
                id: i64,
            ) -> Result<bool, $crate::domain::ports::ContentRepositoryError> {
                use diesel::prelude::*;
                use diesel_async::RunQueryDsl;

                let mut conn = self.pool.get().await.map_err(map_pool_error)?;
                let archived = diesel::update(
                    $table::table
                        .filter($table::id.eq(id))
                        .filter($table::deleted_at.is_null()),
                )
                .set($table::deleted_at.eq(Some(Utc::now())))
                .execute(&mut conn)
                .await
                .map_err(map_content_diesel_error)?;

                Ok(archived > 0)
            }
        }
    };
}

use super::diesel_helpers::{map_content_diesel_error, map_pool_error_message};
use super::pool::PoolError;
use crate::domain::ports::ContentRepositoryError;

fn map_pool_error(error: PoolError) -> ContentRepositoryError {
    ContentRepositoryError::connection(map_pool_error_message(error))
}

diesel_content_repository! {
    /// Diesel-backed repository for cities.
    DieselCityRepository for City {
        table: cities,
        row: CityRow,
        new_row: NewCityRow,
        update: CityUpdate,
        parent: [],
        sort: {
            "id" => id,
            "createdAt" => created_at,
            "updatedAt" => updated_at,
            "state" => state,
        },
    }
}

diesel_content_repository! {
    /// Diesel-backed repository for location categories.
    DieselCategoryRepository for Category {
        table: categories,
        row: CategoryRow,
        new_row: NewCategoryRow,
        update: CategoryUpdate,
        parent: [],
        sort: {
            "id" => id,
            "createdAt" => created_at,
            "updatedAt" => updated_at,
        },
    }
}

diesel_content_repository! {
    /// Diesel-backed repository for FAQ entries.
    DieselFaqRepository for Faq {
        table: faqs,
        row: FaqRow,
        new_row: NewFaqRow,
        update: FaqUpdate,
        parent: [],
        sort: {
            "id" => id,
            "createdAt" => created_at,
            "updatedAt" => updated_at,
            "displayOrder" => display_order,
        },
    }
}

diesel_content_repository! {
    /// Diesel-backed repository for tourist routes.
    DieselRouteRepository for Route {
        table: routes,
        row: RouteRow,
        new_row: NewRouteRow,
        update: RouteUpdate,
        parent: [city_id],
        sort: {
            "id" => id,
            "createdAt" => created_at,
            "updatedAt" => updated_at,
            "distanceKm" => distance_km,
            "durationMinutes" => duration_minutes,
        },
    }
}

diesel_content_repository! {
    /// Diesel-backed repository for points of interest.
    DieselLocationRepository for Location {
        table: locations,
        row: LocationRow,
        new_row: NewLocationRow,
        update: LocationUpdate,
        parent: [city_id],
        sort: {
            "id" => id,
            "createdAt" => created_at,
            "updatedAt" => updated_at,
        },
    }
}

diesel_content_repository! {
    /// Diesel-backed repository for events.
    DieselEventRepository for Event {
        table: events,
        row: EventRow,
        new_row: NewEventRow,
        update: EventUpdate,
        parent: [city_id],
        sort: {
            "id" => id,
            "createdAt" => created_at,
            "updatedAt" => updated_at,
            "startsAt" => starts_at,
        },
    }
}

#[cfg(test)]
mod tests {
    //! Sort-column guards that run without a database.
    use super::*;
    use crate::domain::{ContentEntity, ContentFilter};
    use pagination::{SortDirection, SortSpec};
    use rstest::rstest;

    #[rstest]
    #[case("state", true)]
    #[case("createdAt", true)]
    #[case("name", false)]
    fn city_sort_columns_follow_entity(#[case] field: &str, #[case] supported: bool) {
        let spec = SortSpec::new(field, SortDirection::Desc);
        let result = DieselCityRepository::ordered(
            DieselCityRepository::live_rows(ContentFilter::default()),
            &spec,
        );
        assert_eq!(result.is_ok(), supported);
        assert_eq!(City::is_sortable(field), supported);
    }

    #[rstest]
    fn every_sortable_event_field_has_a_column() {
        for field in Event::SORTABLE_FIELDS {
            let spec = SortSpec::new(*field, SortDirection::Asc);
            let result = DieselEventRepository::ordered(
                DieselEventRepository::live_rows(ContentFilter::by_parent(1)),
                &spec,
            );
            assert!(result.is_ok(), "{field} has no column");
        }
    }
}
