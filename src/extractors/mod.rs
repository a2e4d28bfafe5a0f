//! Request extractors whose rejections are [`crate::error::AppError`]s.

mod payload;
mod user_id;

pub use payload::{JsonBody, ListQuery};
pub use user_id::UserId;
