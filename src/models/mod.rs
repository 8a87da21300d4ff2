//! Data models for the library app

pub mod book;
pub mod loan_history;
pub mod user;

// Re-export commonly used types
pub use book::{Book, BookCategory, BookStat, CreateBook};
pub use loan_history::{
    BookHistoryResponse, BookLoanRequest, BookReturnRequest, LoanHistory, LoanStatus,
    NewLoanHistory, UserLoanHistoryResponse,
};
pub use user::{CreateUser, DeleteUserQuery, UpdateUser, User};

use std::borrow::Cow;

use validator::ValidationError;

/// Reject names that are empty or only whitespace
pub(crate) fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank").with_message(Cow::from("must not be blank")));
    }
    Ok(())
}
