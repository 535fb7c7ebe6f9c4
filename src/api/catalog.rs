//! Catalog pages (server-rendered HTML)

use axum::{
    extract::{rejection::FormRejection, State},
    response::{Html, IntoResponse, Response},
    Form,
};
use serde::Deserialize;

use crate::{
    error::AppError,
    models::genre::{GenreForm, RawGenreForm},
    services::genres::{DeleteOutcome, DeleteView, FormOutcome},
    views::{self, genres::FormMode},
    AppState,
};

use super::{found, GenreId, HtmlError, PageResult};

/// Where genre deletions land
const GENRE_LIST_PATH: &str = "/catalog/genres";

/// Body of the delete confirmation form
#[derive(Debug, Deserialize)]
pub struct DeleteGenreForm {
    pub genreid: i32,
}

/// Turn a create/update outcome into a page or a redirect
fn present_form(mode: FormMode, outcome: FormOutcome) -> Response {
    match outcome {
        FormOutcome::Redisplay { form, errors } => {
            Html(views::genres::genre_form(mode, &form, &errors)).into_response()
        }
        FormOutcome::Redirect(path) => found(&path),
    }
}

/// GET /catalog
pub async fn catalog_index(State(state): State<AppState>) -> PageResult {
    let count = state.services.genres.count().await?;
    Ok(Html(views::genres::catalog_index(count)).into_response())
}

/// GET /catalog/genres
pub async fn genre_list(State(state): State<AppState>) -> PageResult {
    let genres = state.services.genres.list().await?;
    Ok(Html(views::genres::genre_list(&genres)).into_response())
}

/// GET /catalog/genre/:id
pub async fn genre_detail(State(state): State<AppState>, GenreId(id): GenreId) -> PageResult {
    let detail = state.services.genres.detail(id).await?;
    Ok(Html(views::genres::genre_detail(&detail.genre, &detail.books)).into_response())
}

/// GET /catalog/genre/create
pub async fn genre_create_get() -> Html<String> {
    Html(views::genres::genre_form(
        FormMode::Create,
        &GenreForm::default(),
        &[],
    ))
}

/// POST /catalog/genre/create
pub async fn genre_create_post(
    State(state): State<AppState>,
    Form(raw): Form<RawGenreForm>,
) -> PageResult {
    let outcome = state.services.genres.create(&raw).await?;
    Ok(present_form(FormMode::Create, outcome))
}

/// GET /catalog/genre/:id/delete
pub async fn genre_delete_get(State(state): State<AppState>, GenreId(id): GenreId) -> PageResult {
    match state.services.genres.delete_form(id).await? {
        DeleteView::Confirm { genre, books } => {
            Ok(Html(views::genres::genre_delete(&genre, &books)).into_response())
        }
        DeleteView::Missing => Ok(found(GENRE_LIST_PATH)),
    }
}

/// POST /catalog/genre/delete
pub async fn genre_delete_post(
    State(state): State<AppState>,
    form: Result<Form<DeleteGenreForm>, FormRejection>,
) -> PageResult {
    let Form(data) =
        form.map_err(|_| HtmlError(AppError::NotFound("Genre not found".to_string())))?;
    match state.services.genres.delete(data.genreid).await? {
        DeleteOutcome::Blocked { genre, books } => {
            Ok(Html(views::genres::genre_delete(&genre, &books)).into_response())
        }
        DeleteOutcome::Deleted | DeleteOutcome::Missing => Ok(found(GENRE_LIST_PATH)),
    }
}

/// GET /catalog/genre/:id/update
pub async fn genre_update_get(State(state): State<AppState>, GenreId(id): GenreId) -> PageResult {
    let genre = state.services.genres.edit_form(id).await?;
    let form = GenreForm { name: genre.name };
    Ok(Html(views::genres::genre_form(FormMode::Update(id), &form, &[])).into_response())
}

/// POST /catalog/genre/:id/update
pub async fn genre_update_post(
    State(state): State<AppState>,
    GenreId(id): GenreId,
    Form(raw): Form<RawGenreForm>,
) -> PageResult {
    let outcome = state.services.genres.update(id, &raw).await?;
    Ok(present_form(FormMode::Update(id), outcome))
}
