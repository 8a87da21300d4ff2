//! Book model and related types

use serde::{Deserialize, Serialize};
use sqlx::{Decode, Encode, FromRow, Postgres};
use utoipa::ToSchema;
use validator::Validate;

use super::validate_not_blank;

/// Book category, fixed at registration time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookCategory {
    Computer,
    Economy,
    Society,
    Language,
    Science,
}

impl BookCategory {
    pub const ALL: [BookCategory; 5] = [
        BookCategory::Computer,
        BookCategory::Economy,
        BookCategory::Society,
        BookCategory::Language,
        BookCategory::Science,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BookCategory::Computer => "COMPUTER",
            BookCategory::Economy => "ECONOMY",
            BookCategory::Society => "SOCIETY",
            BookCategory::Language => "LANGUAGE",
            BookCategory::Science => "SCIENCE",
        }
    }
}

impl std::fmt::Display for BookCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for BookCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "COMPUTER" => Ok(BookCategory::Computer),
            "ECONOMY" => Ok(BookCategory::Economy),
            "SOCIETY" => Ok(BookCategory::Society),
            "LANGUAGE" => Ok(BookCategory::Language),
            "SCIENCE" => Ok(BookCategory::Science),
            _ => Err(format!("Invalid book category: {}", s)),
        }
    }
}

// SQLx conversion for BookCategory (stored as TEXT)
impl sqlx::Type<Postgres> for BookCategory {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<Postgres>>::type_info()
    }
}

impl<'r> Decode<'r, Postgres> for BookCategory {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s: String = Decode::<Postgres>::decode(value)?;
        s.parse().map_err(|e: String| e.into())
    }
}

impl Encode<'_, Postgres> for BookCategory {
    fn encode_by_ref(&self, buf: &mut sqlx::postgres::PgArgumentBuffer) -> sqlx::encode::IsNull {
        let s: String = self.as_str().to_string();
        <String as Encode<Postgres>>::encode(s, buf)
    }
}

/// Book model from database
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    pub id: i64,
    pub name: String,
    pub category: BookCategory,
}

/// Register book request
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateBook {
    #[validate(custom(function = "validate_not_blank"))]
    pub name: String,
    pub category: BookCategory,
}

impl CreateBook {
    pub fn new(name: impl Into<String>, category: BookCategory) -> Self {
        Self {
            name: name.into(),
            category,
        }
    }

    /// Book with a default category, for seeding stores in tests
    pub fn fixture(name: impl Into<String>) -> Self {
        Self::new(name, BookCategory::Computer)
    }
}

/// Number of books registered under one category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct BookStat {
    pub category: BookCategory,
    pub count: i64,
}
