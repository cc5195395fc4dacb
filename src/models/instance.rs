//! Book instance (physical copy) model and related types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::{Decode, Encode, FromRow, Postgres};
use utoipa::ToSchema;
use uuid::Uuid;

/// Availability status of a copy. Stored as a single-char code
/// ('m', 'o', 'a', 'r'); unknown codes fail to decode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum LoanStatus {
    #[default]
    Maintenance,
    OnLoan,
    Available,
    Reserved,
}

impl LoanStatus {
    pub fn code(&self) -> &'static str {
        match self {
            LoanStatus::Maintenance => "m",
            LoanStatus::OnLoan => "o",
            LoanStatus::Available => "a",
            LoanStatus::Reserved => "r",
        }
    }
}

impl std::fmt::Display for LoanStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            LoanStatus::Maintenance => "maintenance",
            LoanStatus::OnLoan => "on_loan",
            LoanStatus::Available => "available",
            LoanStatus::Reserved => "reserved",
        };
        write!(f, "{}", name)
    }
}

impl std::str::FromStr for LoanStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "m" | "maintenance" => Ok(LoanStatus::Maintenance),
            "o" | "on_loan" => Ok(LoanStatus::OnLoan),
            "a" | "available" => Ok(LoanStatus::Available),
            "r" | "reserved" => Ok(LoanStatus::Reserved),
            _ => Err(format!("Invalid loan status: {}", s)),
        }
    }
}

// SQLx conversion for LoanStatus
impl sqlx::Type<Postgres> for LoanStatus {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<Postgres>>::type_info()
    }
}

impl<'r> Decode<'r, Postgres> for LoanStatus {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s: String = Decode::<Postgres>::decode(value)?;
        s.parse().map_err(|e: String| e.into())
    }
}

impl Encode<'_, Postgres> for LoanStatus {
    fn encode_by_ref(&self, buf: &mut sqlx::postgres::PgArgumentBuffer) -> sqlx::encode::IsNull {
        <String as Encode<Postgres>>::encode(self.code().to_string(), buf)
    }
}

/// A physical, loanable copy of a book. The uuid primary key keeps copy
/// identifiers unguessable so they can be shared.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct BookInstance {
    pub id: Uuid,
    pub book_id: Option<i32>,
    pub imprint: String,
    pub due_back: Option<NaiveDate>,
    pub borrower_id: Option<i32>,
    pub status: LoanStatus,
}

impl BookInstance {
    /// A copy is overdue when it has a due date strictly before today.
    /// All due-date comparisons are calendar-date granularity.
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.due_back.map(|due| due < today).unwrap_or(false)
    }
}

/// An on-loan copy as shown in the loan listings, with book and borrower
/// context resolved
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct LoanedCopy {
    pub id: Uuid,
    pub title: Option<String>,
    pub imprint: String,
    pub due_back: Option<NaiveDate>,
    pub borrower_id: Option<i32>,
    pub borrower_name: Option<String>,
    #[sqlx(default)]
    pub is_overdue: bool,
}

/// Renewal form payload: the display path returns it with a suggested date,
/// a rejected submission returns it with the error attached to the date field
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RenewalForm {
    pub copy: BookInstance,
    pub renewal_date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub renewal_date_error: Option<String>,
}

/// Renewal submission
#[derive(Debug, Deserialize, ToSchema)]
pub struct RenewalRequest {
    pub renewal_date: NaiveDate,
}
