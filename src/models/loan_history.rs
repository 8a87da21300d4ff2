//! Loan history model and related types

use serde::{Deserialize, Serialize};
use sqlx::{Decode, Encode, FromRow, Postgres};
use utoipa::ToSchema;
use validator::Validate;

use super::validate_not_blank;

/// Loan status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LoanStatus {
    Loaned,
    Returned,
}

impl LoanStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoanStatus::Loaned => "LOANED",
            LoanStatus::Returned => "RETURNED",
        }
    }
}

impl std::fmt::Display for LoanStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for LoanStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "LOANED" => Ok(LoanStatus::Loaned),
            "RETURNED" => Ok(LoanStatus::Returned),
            _ => Err(format!("Invalid loan status: {}", s)),
        }
    }
}

// SQLx conversion for LoanStatus (stored as TEXT)
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
        let s: String = self.as_str().to_string();
        <String as Encode<Postgres>>::encode(s, buf)
    }
}

/// Loan history record from database.
///
/// `book_name` holds the book's name by value; it is not a key into the
/// books table, so a history outlives the book it mentions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct LoanHistory {
    pub id: i64,
    pub user_id: i64,
    pub book_name: String,
    pub status: LoanStatus,
}

impl LoanHistory {
    pub fn is_returned(&self) -> bool {
        self.status == LoanStatus::Returned
    }
}

/// Loan history to insert
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLoanHistory {
    pub user_id: i64,
    pub book_name: String,
    pub status: LoanStatus,
}

impl NewLoanHistory {
    pub fn loaned(user_id: i64, book_name: impl Into<String>) -> Self {
        Self::new(user_id, book_name, LoanStatus::Loaned)
    }

    pub fn new(user_id: i64, book_name: impl Into<String>, status: LoanStatus) -> Self {
        Self {
            user_id,
            book_name: book_name.into(),
            status,
        }
    }
}

/// Loan book request
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct BookLoanRequest {
    #[validate(custom(function = "validate_not_blank"))]
    pub user_name: String,
    #[validate(custom(function = "validate_not_blank"))]
    pub book_name: String,
}

/// Return book request
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct BookReturnRequest {
    #[validate(custom(function = "validate_not_blank"))]
    pub user_name: String,
    #[validate(custom(function = "validate_not_blank"))]
    pub book_name: String,
}

/// One line of a user's loan history report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct BookHistoryResponse {
    /// Book name
    pub name: String,
    /// Whether the book has been returned
    pub is_return: bool,
}

impl From<&LoanHistory> for BookHistoryResponse {
    fn from(history: &LoanHistory) -> Self {
        Self {
            name: history.book_name.clone(),
            is_return: history.is_returned(),
        }
    }
}

/// Loan history report for one user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UserLoanHistoryResponse {
    /// User name
    pub name: String,
    /// Loan histories in association order
    pub books: Vec<BookHistoryResponse>,
}

impl UserLoanHistoryResponse {
    pub fn new(name: impl Into<String>, histories: &[LoanHistory]) -> Self {
        Self {
            name: name.into(),
            books: histories.iter().map(BookHistoryResponse::from).collect(),
        }
    }
}
