//! Page-number pagination primitives shared by backend list endpoints.
//!
//! A [`PageRequest`] carries the validated `page`, `limit` and optional sort
//! requested by a client. Repositories translate it into an offset query and
//! hand back a [`Paginated`] envelope whose [`PageMeta`] reports the totals.
//!
//! Out-of-range pages are not an error: they yield an empty `items` array
//! with accurate totals.
//!
//! # Examples
//! ```
//! use pagination::{PageQuery, Paginated};
//!
//! let request = PageQuery {
//!     page: Some("3".to_owned()),
//!     limit: Some("10".to_owned()),
//!     ..PageQuery::default()
//! }
//! .into_request()
//! .expect("valid query");
//!
//! let page = Paginated::from_slice_window((1..=25).collect::<Vec<u32>>(), &request);
//! assert_eq!(page.items, vec![21, 22, 23, 24, 25]);
//! assert_eq!(page.meta.total_pages, 3);
//! assert!(!page.meta.has_next);
//! assert!(page.meta.has_prev);
//! ```

mod error;
mod request;
mod response;
mod sort;

pub use error::PaginationError;
pub use request::{DEFAULT_LIMIT, DEFAULT_PAGE, MAX_LIMIT, PageQuery, PageRequest};
pub use response::{PageMeta, Paginated};
pub use sort::{SortDirection, SortSpec};
