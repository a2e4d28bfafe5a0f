//! OpenAPI description of every route, served at `/openapi.json`.

use utoipa::OpenApi;

use crate::{
    error::{ErrorBody, ErrorDetail, FieldError},
    response::{HealthBody, MessageBody, ReadyBody, ServiceStatus, VersionBody},
    schema::{CreateUserRequest, UpdateUserRequest, UserView},
};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::common::root,
        crate::routes::common::health,
        crate::routes::common::ready,
        crate::routes::common::version,
        crate::handlers::users::create,
        crate::handlers::users::list,
        crate::handlers::users::read,
        crate::handlers::users::update,
        crate::handlers::users::delete
    ),
    components(schemas(
        CreateUserRequest,
        UpdateUserRequest,
        UserView,
        MessageBody,
        ServiceStatus,
        HealthBody,
        ReadyBody,
        VersionBody,
        ErrorBody,
        ErrorDetail,
        FieldError
    )),
    tags(
        (name = "users", description = "User registration and maintenance"),
        (name = "health", description = "Liveness, readiness and version")
    ),
    info(
        title = "User Service API",
        description = "Create, list, update and delete users",
        version = "0.1.0"
    )
)]
pub struct ApiDoc;
