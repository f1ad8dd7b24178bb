//! Allocation of fresh reference ids for new text groups.
//!
//! Candidates come from a monotonic source and are only handed out once the
//! store confirms the reservation, so two concurrent allocations can never
//! return the same id even when legacy rows already occupy some values.

use std::sync::Arc;

use serde_json::json;
use tracing::{debug, warn};

use crate::domain::ports::{ReferenceIdSource, ReferenceIdSourceError};
use crate::domain::{Error, ReferenceId};

/// Default number of candidates tried before giving up.
pub const DEFAULT_ALLOCATION_ATTEMPTS: u32 = 5;

/// Hands out reference ids that no other group uses.
pub struct ReferenceAllocator<S: ?Sized> {
    source: Arc<S>,
    max_attempts: u32,
}

impl<S: ?Sized> Clone for ReferenceAllocator<S> {
    fn clone(&self) -> Self {
        Self {
            source: Arc::clone(&self.source),
            max_attempts: self.max_attempts,
        }
    }
}

impl<S: ?Sized> ReferenceAllocator<S> {
    /// Create an allocator trying at most `max_attempts` candidates (at
    /// least one).
    pub fn new(source: Arc<S>, max_attempts: u32) -> Self {
        Self {
            source,
            max_attempts: max_attempts.max(1),
        }
    }
}

impl<S> ReferenceAllocator<S>
where
    S: ReferenceIdSource + ?Sized,
{
    fn map_source_error(error: ReferenceIdSourceError) -> Error {
        match error {
            ReferenceIdSourceError::Connection { message } => {
                Error::service_unavailable(format!("reference id source unavailable: {message}"))
            }
            ReferenceIdSourceError::Query { message } => {
                Error::internal(format!("reference id source error: {message}"))
            }
        }
    }

    /// Reserve and return an id no existing group uses.
    ///
    /// Fails with `ServiceUnavailable` once every attempt has lost its
    /// reservation.
    pub async fn allocate(&self) -> Result<ReferenceId, Error> {
        for attempt in 1..=self.max_attempts {
            let candidate = self
                .source
                .next_candidate()
                .await
                .map_err(Self::map_source_error)?;
            let reserved = self
                .source
                .reserve(candidate)
                .await
                .map_err(Self::map_source_error)?;
            if reserved {
                debug!(reference_id = %candidate, attempt, "reference id allocated");
                return Ok(candidate);
            }
            warn!(reference_id = %candidate, attempt, "reference id already taken, retrying");
        }

        Err(
            Error::service_unavailable("could not allocate a unique reference id")
                .with_details(json!({ "attempts": self.max_attempts })),
        )
    }
}

#[cfg(test)]
mod tests {
    //! Retry and failure coverage for reference id allocation.
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::ports::MockReferenceIdSource;
    use mockall::Sequence;
    use rstest::rstest;

    fn reference(value: i64) -> ReferenceId {
        ReferenceId::new(value).expect("positive id")
    }

    #[tokio::test]
    async fn returns_first_reserved_candidate() {
        let mut source = MockReferenceIdSource::new();
        source
            .expect_next_candidate()
            .times(1)
            .return_once(|| Ok(reference(7)));
        source
            .expect_reserve()
            .withf(|candidate| candidate.get() == 7)
            .times(1)
            .return_once(|_| Ok(true));

        let allocator = ReferenceAllocator::new(Arc::new(source), 3);
        let id = allocator.allocate().await.expect("allocated");
        assert_eq!(id.get(), 7);
    }

    #[tokio::test]
    async fn skips_candidates_already_taken() {
        let mut source = MockReferenceIdSource::new();
        let mut seq = Sequence::new();
        source
            .expect_next_candidate()
            .times(1)
            .in_sequence(&mut seq)
            .return_once(|| Ok(reference(1)));
        source
            .expect_reserve()
            .times(1)
            .in_sequence(&mut seq)
            .return_once(|_| Ok(false));
        source
            .expect_next_candidate()
            .times(1)
            .in_sequence(&mut seq)
            .return_once(|| Ok(reference(2)));
        source
            .expect_reserve()
            .times(1)
            .in_sequence(&mut seq)
            .return_once(|_| Ok(true));

        let allocator = ReferenceAllocator::new(Arc::new(source), 3);
        let id = allocator.allocate().await.expect("allocated");
        assert_eq!(id.get(), 2);
    }

    #[tokio::test]
    async fn gives_up_after_max_attempts() {
        let mut source = MockReferenceIdSource::new();
        let mut next = 0;
        source.expect_next_candidate().times(2).returning(move || {
            next += 1;
            Ok(reference(next))
        });
        source.expect_reserve().times(2).returning(|_| Ok(false));

        let allocator = ReferenceAllocator::new(Arc::new(source), 2);
        let error = allocator.allocate().await.expect_err("exhausted");
        assert_eq!(error.code(), ErrorCode::ServiceUnavailable);
        assert_eq!(
            error.details().and_then(|d| d.get("attempts")),
            Some(&json!(2))
        );
    }

    #[rstest]
    #[case(ReferenceIdSourceError::connection("refused"), ErrorCode::ServiceUnavailable)]
    #[case(ReferenceIdSourceError::query("boom"), ErrorCode::InternalError)]
    #[tokio::test]
    async fn maps_source_errors(
        #[case] failure: ReferenceIdSourceError,
        #[case] expected: ErrorCode,
    ) {
        let mut source = MockReferenceIdSource::new();
        source
            .expect_next_candidate()
            .times(1)
            .return_once(move || Err(failure));

        let allocator = ReferenceAllocator::new(Arc::new(source), 5);
        let error = allocator.allocate().await.expect_err("source failure");
        assert_eq!(error.code(), expected);
    }

    #[rstest]
    fn zero_attempts_still_tries_once() {
        let allocator = ReferenceAllocator::new(Arc::new(MockReferenceIdSource::new()), 0);
        assert_eq!(allocator.max_attempts, 1);
    }
}
