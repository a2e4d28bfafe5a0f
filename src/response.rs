//! Response bodies that are not user views.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub const USER_DELETED: &str = "User deleted successfully";
pub const SERVICE_NAME: &str = "User Service API";

/// Confirmation payload, e.g. after a delete.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({"message": "User deleted successfully"}))]
pub struct MessageBody {
    pub message: String,
}

impl MessageBody {
    pub fn new(message: impl Into<String>) -> Self {
        MessageBody {
            message: message.into(),
        }
    }
}

/// Body of `GET /`.
#[derive(Clone, Debug, Serialize, ToSchema)]
#[schema(example = json!({"message": "User Service API", "status": "ok"}))]
pub struct ServiceStatus {
    pub message: &'static str,
    pub status: &'static str,
}

#[derive(Clone, Debug, Serialize, ToSchema)]
pub struct HealthBody {
    pub status: &'static str,
}

#[derive(Clone, Debug, Serialize, ToSchema)]
pub struct ReadyBody {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database: Option<&'static str>,
}

#[derive(Clone, Debug, Serialize, ToSchema)]
#[schema(example = json!({"name": "user-service", "version": "0.1.0"}))]
pub struct VersionBody {
    pub name: &'static str,
    pub version: &'static str,
}
