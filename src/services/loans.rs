//! Loan listings and the copy renewal workflow

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, NaiveDate, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{
        instance::{BookInstance, LoanedCopy, RenewalForm},
        user::{capability, CapabilitySet},
    },
    repository::{instances::InstancesRepository, Repository},
};

/// Loan listings page size
pub const PAGE_SIZE: i64 = 10;

/// Longest allowed extension from today (4 weeks)
pub const MAX_RENEWAL_DAYS: i64 = 28;

/// Extension pre-filled in the renewal form (3 weeks)
pub const SUGGESTED_RENEWAL_DAYS: i64 = 21;

/// Path the client is redirected to after a successful renewal
pub const ALL_LOANS_PATH: &str = "/api/v1/loans/borrowed";

/// Source of "today", injected so boundary dates are testable.
/// All loan logic runs at calendar-date granularity.
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

/// Wall-clock UTC calendar date
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Utc::now().date_naive()
    }
}

/// Why a proposed renewal date was rejected
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenewalDateError {
    #[error("Invalid date - renewal cannot be in the past")]
    PastDate,

    #[error("Invalid date - renewal cannot exceed 4 weeks")]
    ExceedsMaxExtension,
}

/// Validate a proposed renewal date against today. Accepts any date from
/// today through today + 4 weeks, both boundaries inclusive.
pub fn validate_renewal_date(
    candidate: NaiveDate,
    today: NaiveDate,
) -> Result<NaiveDate, RenewalDateError> {
    if candidate < today {
        return Err(RenewalDateError::PastDate);
    }
    if candidate > today + Duration::days(MAX_RENEWAL_DAYS) {
        return Err(RenewalDateError::ExceedsMaxExtension);
    }
    Ok(candidate)
}

/// Due-back date pre-filled in the renewal form
pub fn suggested_renewal_date(today: NaiveDate) -> NaiveDate {
    today + Duration::days(SUGGESTED_RENEWAL_DAYS)
}

/// Narrow store seam for the renewal workflow, mockable in tests
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait InstanceStore: Send + Sync {
    async fn get_instance(&self, id: Uuid) -> AppResult<BookInstance>;
    async fn set_due_back(&self, id: Uuid, due_back: NaiveDate) -> AppResult<()>;
}

#[async_trait]
impl InstanceStore for InstancesRepository {
    async fn get_instance(&self, id: Uuid) -> AppResult<BookInstance> {
        self.get_by_id(id).await
    }

    async fn set_due_back(&self, id: Uuid, due_back: NaiveDate) -> AppResult<()> {
        self.update_due_back(id, due_back).await
    }
}

/// Terminal outcome of a renewal submission: a redirect to the all-loans
/// listing on success, or the form to render again with a field error
#[derive(Debug)]
pub enum RenewalOutcome {
    Redirect { location: &'static str },
    Form(RenewalForm),
}

/// Display path of the renewal workflow: fetch the copy, check the
/// caller's capability, prefill the form with the suggested date. Never
/// mutates. A missing copy is reported before an authorization failure.
pub async fn renewal_form(
    store: &dyn InstanceStore,
    caller: &dyn CapabilitySet,
    today: NaiveDate,
    id: Uuid,
) -> AppResult<RenewalForm> {
    let copy = store.get_instance(id).await?;
    caller.require_capability(capability::CAN_MARK_RETURNED)?;

    Ok(RenewalForm {
        copy,
        renewal_date: suggested_renewal_date(today),
        renewal_date_error: None,
    })
}

/// Submit path of the renewal workflow: fetch, authorize, validate the
/// candidate date, then persist it. A rejected date leaves the copy
/// unmodified.
pub async fn renew(
    store: &dyn InstanceStore,
    caller: &dyn CapabilitySet,
    today: NaiveDate,
    id: Uuid,
    candidate: NaiveDate,
) -> AppResult<RenewalOutcome> {
    let copy = store.get_instance(id).await?;
    caller.require_capability(capability::CAN_MARK_RETURNED)?;

    match validate_renewal_date(candidate, today) {
        Ok(date) => {
            store.set_due_back(copy.id, date).await?;
            tracing::info!("Copy {} renewed until {}", copy.id, date);
            Ok(RenewalOutcome::Redirect {
                location: ALL_LOANS_PATH,
            })
        }
        Err(err) => Ok(RenewalOutcome::Form(RenewalForm {
            copy,
            renewal_date: candidate,
            renewal_date_error: Some(err.to_string()),
        })),
    }
}

#[derive(Clone)]
pub struct LoansService {
    repository: Repository,
    clock: Arc<dyn Clock>,
}

impl LoansService {
    pub fn new(repository: Repository, clock: Arc<dyn Clock>) -> Self {
        Self { repository, clock }
    }

    /// A user's own active loans, ordered by due date
    pub async fn borrowed_by_user(
        &self,
        borrower_id: i32,
        page: i64,
    ) -> AppResult<(Vec<LoanedCopy>, i64)> {
        self.repository
            .instances
            .list_on_loan(Some(borrower_id), page, PAGE_SIZE, self.clock.today())
            .await
    }

    /// All active loans system-wide, ordered by due date
    pub async fn all_borrowed(&self, page: i64) -> AppResult<(Vec<LoanedCopy>, i64)> {
        self.repository
            .instances
            .list_on_loan(None, page, PAGE_SIZE, self.clock.today())
            .await
    }

    /// Renewal form for a copy (display path)
    pub async fn renewal_form(
        &self,
        caller: &dyn CapabilitySet,
        id: Uuid,
    ) -> AppResult<RenewalForm> {
        renewal_form(&self.repository.instances, caller, self.clock.today(), id).await
    }

    /// Renew a copy (submit path)
    pub async fn renew(
        &self,
        caller: &dyn CapabilitySet,
        id: Uuid,
        candidate: NaiveDate,
    ) -> AppResult<RenewalOutcome> {
        renew(
            &self.repository.instances,
            caller,
            self.clock.today(),
            id,
            candidate,
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::models::instance::LoanStatus;
    use mockall::predicate::eq;
    use std::collections::BTreeSet;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
    }

    fn librarian() -> BTreeSet<String> {
        [capability::CAN_MARK_RETURNED.to_string()].into()
    }

    fn patron() -> BTreeSet<String> {
        BTreeSet::new()
    }

    fn copy(id: Uuid, due_back: Option<NaiveDate>) -> BookInstance {
        BookInstance {
            id,
            book_id: Some(1),
            imprint: "Imprint 2016".to_string(),
            due_back,
            borrower_id: Some(1),
            status: LoanStatus::OnLoan,
        }
    }

    #[test]
    fn rejects_dates_in_the_past() {
        for days in 1..=60 {
            let candidate = today() - Duration::days(days);
            assert_eq!(
                validate_renewal_date(candidate, today()),
                Err(RenewalDateError::PastDate)
            );
        }
    }

    #[test]
    fn rejects_dates_beyond_four_weeks() {
        for days in 1..=60 {
            let candidate = today() + Duration::days(MAX_RENEWAL_DAYS + days);
            assert_eq!(
                validate_renewal_date(candidate, today()),
                Err(RenewalDateError::ExceedsMaxExtension)
            );
        }
    }

    #[test]
    fn accepts_the_full_window_inclusive() {
        for days in 0..=MAX_RENEWAL_DAYS {
            let candidate = today() + Duration::days(days);
            assert_eq!(validate_renewal_date(candidate, today()), Ok(candidate));
        }
    }

    #[test]
    fn error_messages_are_the_documented_strings() {
        assert_eq!(
            RenewalDateError::PastDate.to_string(),
            "Invalid date - renewal cannot be in the past"
        );
        assert_eq!(
            RenewalDateError::ExceedsMaxExtension.to_string(),
            "Invalid date - renewal cannot exceed 4 weeks"
        );
    }

    #[test]
    fn suggested_date_is_three_weeks_out() {
        assert_eq!(
            suggested_renewal_date(today()),
            NaiveDate::from_ymd_opt(2024, 7, 6).unwrap()
        );
    }

    #[tokio::test]
    async fn display_prefills_suggestion_without_mutating() {
        let id = Uuid::new_v4();
        let mut store = MockInstanceStore::new();
        store
            .expect_get_instance()
            .with(eq(id))
            .times(2)
            .returning(move |_| Ok(copy(id, Some(today() + Duration::days(5)))));
        store.expect_set_due_back().times(0);

        // Fetching the form twice never writes
        for _ in 0..2 {
            let form = renewal_form(&store, &librarian(), today(), id).await.unwrap();
            assert_eq!(form.renewal_date, today() + Duration::days(21));
            assert!(form.renewal_date_error.is_none());
        }
    }

    #[tokio::test]
    async fn valid_submission_persists_and_redirects() {
        let id = Uuid::new_v4();
        let candidate = today() + Duration::days(14);

        let mut store = MockInstanceStore::new();
        store
            .expect_get_instance()
            .with(eq(id))
            .returning(move |_| Ok(copy(id, Some(today() + Duration::days(5)))));
        store
            .expect_set_due_back()
            .with(eq(id), eq(candidate))
            .times(1)
            .returning(|_, _| Ok(()));

        let outcome = renew(&store, &librarian(), today(), id, candidate)
            .await
            .unwrap();
        match outcome {
            RenewalOutcome::Redirect { location } => assert_eq!(location, ALL_LOANS_PATH),
            RenewalOutcome::Form(_) => panic!("expected a redirect"),
        }
    }

    #[tokio::test]
    async fn past_date_rerenders_form_without_writing() {
        let id = Uuid::new_v4();
        let candidate = today() - Duration::days(1);

        let mut store = MockInstanceStore::new();
        store
            .expect_get_instance()
            .returning(move |_| Ok(copy(id, Some(today() + Duration::days(5)))));
        store.expect_set_due_back().times(0);

        let outcome = renew(&store, &librarian(), today(), id, candidate)
            .await
            .unwrap();
        match outcome {
            RenewalOutcome::Form(form) => {
                assert_eq!(form.renewal_date, candidate);
                assert_eq!(
                    form.renewal_date_error.as_deref(),
                    Some("Invalid date - renewal cannot be in the past")
                );
            }
            RenewalOutcome::Redirect { .. } => panic!("expected the form back"),
        }
    }

    #[tokio::test]
    async fn too_distant_date_rerenders_form_without_writing() {
        let id = Uuid::new_v4();
        let candidate = today() + Duration::days(35);

        let mut store = MockInstanceStore::new();
        store
            .expect_get_instance()
            .returning(move |_| Ok(copy(id, Some(today() + Duration::days(5)))));
        store.expect_set_due_back().times(0);

        let outcome = renew(&store, &librarian(), today(), id, candidate)
            .await
            .unwrap();
        match outcome {
            RenewalOutcome::Form(form) => {
                assert_eq!(
                    form.renewal_date_error.as_deref(),
                    Some("Invalid date - renewal cannot exceed 4 weeks")
                );
            }
            RenewalOutcome::Redirect { .. } => panic!("expected the form back"),
        }
    }

    #[tokio::test]
    async fn unknown_copy_stops_the_workflow() {
        let id = Uuid::new_v4();
        let mut store = MockInstanceStore::new();
        store
            .expect_get_instance()
            .returning(move |_| Err(AppError::NotFound(format!("Book copy {} not found", id))));
        store.expect_set_due_back().times(0);

        // Reported even to a caller who would also fail the capability check
        let err = renew(&store, &patron(), today(), id, today())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn missing_capability_is_forbidden_without_writing() {
        let id = Uuid::new_v4();
        let mut store = MockInstanceStore::new();
        store
            .expect_get_instance()
            .returning(move |_| Ok(copy(id, Some(today() + Duration::days(5)))));
        store.expect_set_due_back().times(0);

        let err = renew(&store, &patron(), today(), id, today() + Duration::days(7))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Authorization(_)));
    }
}
