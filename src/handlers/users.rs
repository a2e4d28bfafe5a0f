//! User CRUD handlers: create, list, read, update, delete.

use crate::error::{AppError, ErrorBody};
use crate::extractors::{JsonBody, ListQuery, UserId};
use crate::response::{MessageBody, USER_DELETED};
use crate::schema::{CreateUserRequest, ListParams, UpdateUserRequest, UserView};
use crate::state::AppState;
use axum::{extract::State, Json};

#[utoipa::path(
    post,
    path = "/api/users",
    tag = "users",
    request_body = CreateUserRequest,
    responses(
        (status = 200, description = "User created", body = UserView),
        (status = 409, description = "Email already registered", body = ErrorBody),
        (status = 422, description = "Missing or invalid fields", body = ErrorBody)
    )
)]
pub async fn create(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<CreateUserRequest>,
) -> Result<Json<UserView>, AppError> {
    let draft = body.validate()?;
    let mut session = state.store.session().await?;
    let user = session.insert(&draft).await?;
    tracing::info!(user_id = user.id, "user created");
    Ok(Json(UserView::from(user)))
}

#[utoipa::path(
    get,
    path = "/api/users",
    tag = "users",
    params(ListParams),
    responses(
        (status = 200, description = "Users in id order", body = [UserView]),
        (status = 422, description = "Invalid skip or limit", body = ErrorBody)
    )
)]
pub async fn list(
    State(state): State<AppState>,
    ListQuery(params): ListQuery,
) -> Result<Json<Vec<UserView>>, AppError> {
    let mut session = state.store.session().await?;
    let users = session.list(params.page()).await?;
    Ok(Json(users.into_iter().map(UserView::from).collect()))
}

#[utoipa::path(
    get,
    path = "/api/users/{id}",
    tag = "users",
    params(("id" = i64, Path, description = "User id")),
    responses(
        (status = 200, description = "The user", body = UserView),
        (status = 404, description = "No such user", body = ErrorBody)
    )
)]
pub async fn read(
    State(state): State<AppState>,
    UserId(id): UserId,
) -> Result<Json<UserView>, AppError> {
    let mut session = state.store.session().await?;
    let user = session
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::user_not_found(id))?;
    Ok(Json(UserView::from(user)))
}

#[utoipa::path(
    put,
    path = "/api/users/{id}",
    tag = "users",
    params(("id" = i64, Path, description = "User id")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated", body = UserView),
        (status = 404, description = "No such user", body = ErrorBody),
        (status = 409, description = "Email already registered", body = ErrorBody),
        (status = 422, description = "Missing or invalid fields", body = ErrorBody)
    )
)]
pub async fn update(
    State(state): State<AppState>,
    UserId(id): UserId,
    JsonBody(body): JsonBody<UpdateUserRequest>,
) -> Result<Json<UserView>, AppError> {
    let draft = body.validate()?;
    let mut session = state.store.session().await?;
    let user = session
        .update(id, &draft)
        .await?
        .ok_or_else(|| AppError::user_not_found(id))?;
    tracing::info!(user_id = id, "user updated");
    Ok(Json(UserView::from(user)))
}

#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    tag = "users",
    params(("id" = i64, Path, description = "User id")),
    responses(
        (status = 200, description = "User removed", body = MessageBody),
        (status = 404, description = "No such user", body = ErrorBody)
    )
)]
pub async fn delete(
    State(state): State<AppState>,
    UserId(id): UserId,
) -> Result<Json<MessageBody>, AppError> {
    let mut session = state.store.session().await?;
    if !session.delete(id).await? {
        return Err(AppError::user_not_found(id));
    }
    tracing::info!(user_id = id, "user deleted");
    Ok(Json(MessageBody::new(USER_DELETED)))
}
