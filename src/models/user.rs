//! User model and related types

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::validate_not_blank;

/// User model from database
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub age: Option<i32>,
}

/// Create user request
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateUser {
    #[validate(custom(function = "validate_not_blank"))]
    pub name: String,
    #[validate(range(min = 0, message = "Age must not be negative"))]
    pub age: Option<i32>,
}

impl CreateUser {
    pub fn new(name: impl Into<String>, age: Option<i32>) -> Self {
        Self {
            name: name.into(),
            age,
        }
    }
}

/// Update user request.
///
/// A missing `age` leaves it unchanged, an explicit `null` clears it.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateUser {
    #[validate(custom(function = "validate_not_blank"))]
    pub name: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "::serde_with::rust::double_option"
    )]
    #[schema(value_type = Option<i32>)]
    #[validate(range(min = 0, message = "Age must not be negative"))]
    pub age: Option<Option<i32>>,
}

impl UpdateUser {
    /// Apply the update on top of an existing user
    pub fn apply_to(&self, user: &mut User) {
        if let Some(ref name) = self.name {
            user.name = name.clone();
        }
        if let Some(age) = self.age {
            user.age = age;
        }
    }
}

/// Delete user query parameters
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DeleteUserQuery {
    /// Name of the user to delete
    pub name: String,
}
