//! Router assembly: common and user routes behind CORS and request tracing.

pub mod common;
pub mod users;

pub use common::common_routes;
pub use users::user_routes;

use crate::error::ConfigError;
use crate::state::AppState;
use axum::http::HeaderValue;
use axum::Router;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

/// CORS for an explicit origin allow-list with credentials. Methods and headers mirror the preflight request.
pub fn cors_layer(origins: &[String]) -> Result<CorsLayer, ConfigError> {
    let origins = origins
        .iter()
        .map(|o| HeaderValue::from_str(o).map_err(|_| ConfigError::InvalidOrigin(o.clone())))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request()))
}

/// The full service: `/`, health routes and `/api/users`.
pub fn app(state: AppState, cors_origins: &[String]) -> Result<Router, ConfigError> {
    Ok(Router::new()
        .merge(common_routes(state.clone()))
        .merge(user_routes(state))
        .layer(cors_layer(cors_origins)?)
        .layer(TraceLayer::new_for_http()))
}
