//! HTTP layer: catalog pages, JSON API and the router

pub mod catalog;
pub mod genres;
pub mod health;
pub mod openapi;

use axum::{
    async_trait,
    extract::{FromRequestParts, Path},
    http::{header::LOCATION, request::Parts, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{error::AppError, views, AppState};

/// Error rendered as an HTML error page instead of a JSON body
#[derive(Debug)]
pub struct HtmlError(pub AppError);

impl From<AppError> for HtmlError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl IntoResponse for HtmlError {
    fn into_response(self) -> Response {
        let (status, _, message) = self.0.classify();
        (status, Html(views::error_page(status.as_u16(), &message))).into_response()
    }
}

/// Genre id taken from the path; anything that is not an id is an unknown
/// genre
pub struct GenreId(pub i32);

#[async_trait]
impl<S> FromRequestParts<S> for GenreId
where
    S: Send + Sync,
{
    type Rejection = HtmlError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id) = Path::<i32>::from_request_parts(parts, state)
            .await
            .map_err(|_| HtmlError(AppError::NotFound("Genre not found".to_string())))?;
        Ok(GenreId(id))
    }
}

/// Result type of the HTML page handlers
pub type PageResult = Result<Response, HtmlError>;

/// 302 redirect to `path`
pub fn found(path: &str) -> Response {
    (StatusCode::FOUND, [(LOCATION, path.to_string())]).into_response()
}

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let catalog = Router::new()
        .route("/", get(catalog::catalog_index))
        .route("/genres", get(catalog::genre_list))
        .route(
            "/genre/create",
            get(catalog::genre_create_get).post(catalog::genre_create_post),
        )
        .route("/genre/delete", post(catalog::genre_delete_post))
        .route("/genre/:id", get(catalog::genre_detail))
        .route("/genre/:id/delete", get(catalog::genre_delete_get))
        .route(
            "/genre/:id/update",
            get(catalog::genre_update_get).post(catalog::genre_update_post),
        )
        .with_state(state.clone());

    // API v1 routes
    let api_v1 = Router::new()
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        .route("/genres", get(genres::list_genres))
        .route("/genres/:id", get(genres::get_genre))
        .with_state(state);

    Router::new()
        .route("/", get(|| async { found("/catalog/genres") }))
        .nest("/catalog", catalog)
        .nest("/api/v1", api_v1)
        .merge(openapi::create_openapi_router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
