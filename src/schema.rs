//! Wire shapes: request bodies, their validation into a [`UserDraft`], and the [`UserView`] projection.

use crate::entity::User;
use crate::error::{AppError, FieldError};
use crate::repository::Page;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use utoipa::{IntoParams, ToSchema};

pub const MAX_FIELD_LEN: usize = 255;
pub const DEFAULT_LIMIT: u32 = 10;
pub const MAX_LIMIT: u32 = 100;

static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+$").expect("email pattern compiles"));

/// Body of `POST /api/users`. Fields are optional on the wire so a missing one is reported per field.
#[derive(Clone, Debug, Default, Deserialize, ToSchema)]
#[schema(example = json!({"name": "momo", "email": "momolab@gmail.com"}))]
pub struct CreateUserRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

/// Body of `PUT /api/users/{id}`. Full replacement of both mutable fields.
#[derive(Clone, Debug, Default, Deserialize, ToSchema)]
#[schema(example = json!({"name": "momo", "email": "momolab@gmail.com"}))]
pub struct UpdateUserRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

/// Validated name and email. The only input the data access layer accepts for writes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UserDraft {
    pub name: String,
    pub email: String,
}

impl CreateUserRequest {
    pub fn validate(self) -> Result<UserDraft, AppError> {
        UserDraft::from_fields(self.name, self.email)
    }
}

impl UpdateUserRequest {
    pub fn validate(self) -> Result<UserDraft, AppError> {
        UserDraft::from_fields(self.name, self.email)
    }
}

impl UserDraft {
    fn from_fields(name: Option<String>, email: Option<String>) -> Result<Self, AppError> {
        let mut errors = Vec::new();
        let name = required("name", name, &mut errors);
        let email = required("email", email, &mut errors);
        if let Some(email) = &email {
            if !EMAIL.is_match(email) {
                errors.push(FieldError::new("email", "must be a valid email"));
            }
        }
        match (name, email) {
            (Some(name), Some(email)) if errors.is_empty() => Ok(UserDraft { name, email }),
            _ => Err(AppError::Validation(errors)),
        }
    }
}

fn required(field: &str, value: Option<String>, errors: &mut Vec<FieldError>) -> Option<String> {
    let value = value.map(|v| v.trim().to_string()).unwrap_or_default();
    if value.is_empty() {
        errors.push(FieldError::new(field, "is required"));
        return None;
    }
    if value.chars().count() > MAX_FIELD_LEN {
        errors.push(FieldError::new(
            field,
            format!("must be at most {} characters", MAX_FIELD_LEN),
        ));
        return None;
    }
    Some(value)
}

/// What callers see of a user. Timestamps stay internal.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({"id": 1, "name": "momo", "email": "momolab@gmail.com"}))]
pub struct UserView {
    pub id: i64,
    pub name: String,
    pub email: String,
}

impl From<&User> for UserView {
    fn from(user: &User) -> Self {
        UserView {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
        }
    }
}

impl From<User> for UserView {
    fn from(user: User) -> Self {
        UserView {
            id: user.id,
            name: user.name,
            email: user.email,
        }
    }
}

/// `?skip=&limit=` on `GET /api/users`.
#[derive(Clone, Copy, Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListParams {
    /// Rows to skip. Default 0.
    #[serde(default)]
    pub skip: u32,
    /// Rows to return. Default 10, at most 100.
    #[serde(default = "default_limit")]
    pub limit: u32,
}

fn default_limit() -> u32 {
    DEFAULT_LIMIT
}

impl Default for ListParams {
    fn default() -> Self {
        ListParams {
            skip: 0,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl ListParams {
    pub fn page(&self) -> Page {
        Page {
            offset: i64::from(self.skip),
            limit: i64::from(self.limit.min(MAX_LIMIT)),
        }
    }
}
