//! Catalog integration tests
//!
//! Drive the full router over the in-memory store. The PostgreSQL test is
//! ignored by default; run it with `cargo test -- --ignored` and a
//! `DATABASE_URL` pointing at a scratch database.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    response::Response,
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use local_library::{
    api::create_router,
    repository::{memory::MemoryStore, GenreRepository, Repository},
    AppConfig, AppState,
};

fn app() -> (Router, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let repository = Repository::from_parts(store.clone(), store.clone());
    let state = AppState::new(AppConfig::default(), repository);
    (create_router(state), store)
}

async fn get(app: &Router, uri: &str) -> Response {
    app.clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn post_form(app: &Router, uri: &str, body: &str) -> Response {
    app.clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap()
}

fn location(response: &Response) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .expect("No Location header")
        .to_str()
        .unwrap()
}

async fn body_text(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn test_genre_lifecycle() {
    let (app, store) = app();

    // Create a new genre
    let response = post_form(&app, "/catalog/genre/create", "name=Fantasy").await;
    assert_eq!(response.status(), StatusCode::FOUND);
    let genre_path = location(&response).to_string();
    assert_eq!(genre_path, "/catalog/genre/1");

    // Same name again lands on the same genre
    let response = post_form(&app, "/catalog/genre/create", "name=+Fantasy+").await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), genre_path);
    assert_eq!(store.count().await.unwrap(), 1);

    // Deletion is refused while a book references it
    let book = store.add_book("The Hobbit", Some(1)).await;
    let response = post_form(&app, "/catalog/genre/delete", "genreid=1").await;
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("Delete Genre"));
    assert!(html.contains("The Hobbit"));
    assert!(store.get_by_id(1).await.unwrap().is_some());

    // Once the book moves away the genre can go
    store.set_book_genre(book.id, None).await.unwrap();
    let response = post_form(&app, "/catalog/genre/delete", "genreid=1").await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), "/catalog/genres");
    assert!(store.get_by_id(1).await.unwrap().is_none());

    // Repeating the delete is harmless
    let response = post_form(&app, "/catalog/genre/delete", "genreid=1").await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), "/catalog/genres");
}

#[tokio::test]
async fn test_invalid_create_redisplays_form() {
    let (app, store) = app();

    let response = post_form(&app, "/catalog/genre/create", "name=%20%20").await;
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("Create Genre"));
    assert!(html.contains("Genre name required"));
    assert_eq!(store.count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_create_escapes_markup() {
    let (app, _store) = app();

    let response = post_form(&app, "/catalog/genre/create", "name=%3Cem%3EGothic%3C%2Fem%3E").await;
    assert_eq!(response.status(), StatusCode::FOUND);

    let html = body_text(get(&app, "/catalog/genres").await).await;
    assert!(html.contains("&lt;em&gt;Gothic&lt;&#x2F;em&gt;"));
    assert!(!html.contains("<em>Gothic"));
}

#[tokio::test]
async fn test_list_is_sorted_by_name() {
    let (app, _store) = app();
    for name in ["Poetry", "Fantasy", "Horror"] {
        post_form(&app, "/catalog/genre/create", &format!("name={}", name)).await;
    }

    let html = body_text(get(&app, "/catalog/genres").await).await;
    let fantasy = html.find("Fantasy").unwrap();
    let horror = html.find("Horror").unwrap();
    let poetry = html.find("Poetry").unwrap();
    assert!(fantasy < horror && horror < poetry);
}

#[tokio::test]
async fn test_detail_shows_books_or_404() {
    let (app, store) = app();
    post_form(&app, "/catalog/genre/create", "name=Horror").await;
    store.add_book("Dracula", Some(1)).await;

    let response = get(&app, "/catalog/genre/1").await;
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("Genre: Horror"));
    assert!(html.contains("Dracula"));

    let response = get(&app, "/catalog/genre/99").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(body_text(response).await.contains("Genre not found"));
}

#[tokio::test]
async fn test_update_flows() {
    let (app, store) = app();
    post_form(&app, "/catalog/genre/create", "name=Horror").await;
    post_form(&app, "/catalog/genre/create", "name=Poetry").await;

    // Form is pre-filled
    let response = get(&app, "/catalog/genre/2/update").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("value=\"Poetry\""));

    // Plain rename
    let response = post_form(&app, "/catalog/genre/2/update", "name=Verse").await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), "/catalog/genre/2");
    assert_eq!(store.get_by_id(2).await.unwrap().unwrap().name, "Verse");

    // Renaming onto a taken name goes to the holder and writes nothing
    let response = post_form(&app, "/catalog/genre/2/update", "name=Horror").await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), "/catalog/genre/1");
    assert_eq!(store.get_by_id(2).await.unwrap().unwrap().name, "Verse");

    // Invalid input is echoed back
    let response = post_form(&app, "/catalog/genre/2/update", "name=ab").await;
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("Update Genre"));
    assert!(html.contains("value=\"ab\""));

    // Unknown genre
    let response = get(&app, "/catalog/genre/42/update").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let response = post_form(&app, "/catalog/genre/42/update", "name=Drama").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_form() {
    let (app, _store) = app();
    post_form(&app, "/catalog/genre/create", "name=Drama").await;

    let response = get(&app, "/catalog/genre/1/delete").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("name=\"genreid\" value=\"1\""));

    let response = get(&app, "/catalog/genre/5/delete").await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), "/catalog/genres");
}

#[tokio::test]
async fn test_delete_form_lists_blocking_books() {
    let (app, store) = app();
    post_form(&app, "/catalog/genre/create", "name=Fantasy").await;
    store.add_book("The Hobbit", Some(1)).await;
    store.add_book("Earthsea", Some(1)).await;

    let response = get(&app, "/catalog/genre/1/delete").await;
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("Delete the following books"));
    assert!(html.contains("The Hobbit"));
    assert!(html.contains("Earthsea"));
    assert!(!html.contains("name=\"genreid\""));
}

#[tokio::test]
async fn test_update_with_unchanged_name() {
    let (app, store) = app();
    post_form(&app, "/catalog/genre/create", "name=Horror").await;
    post_form(&app, "/catalog/genre/create", "name=Poetry").await;

    let response = post_form(&app, "/catalog/genre/2/update", "name=Poetry").await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), "/catalog/genre/2");
    assert_eq!(store.count().await.unwrap(), 2);
}

#[tokio::test]
async fn test_update_of_deleted_genre_onto_taken_name() {
    let (app, store) = app();
    post_form(&app, "/catalog/genre/create", "name=Horror").await;

    let response = post_form(&app, "/catalog/genre/42/update", "name=Horror").await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), "/catalog/genre/1");
    assert_eq!(store.count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_malformed_ids_render_error_page() {
    let (app, _store) = app();

    for uri in ["/catalog/genre/abc", "/catalog/genre/abc/delete", "/catalog/genre/abc/update"] {
        let response = get(&app, uri).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{}", uri);
        let html = body_text(response).await;
        assert!(html.contains("<h2>404</h2>"), "{}", uri);
        assert!(html.contains("Genre not found"), "{}", uri);
    }

    let response = post_form(&app, "/catalog/genre/abc/update", "name=Drama").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(body_text(response).await.contains("<h2>404</h2>"));

    for body in ["", "genreid=abc"] {
        let response = post_form(&app, "/catalog/genre/delete", body).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{:?}", body);
        assert!(body_text(response).await.contains("Genre not found"));
    }
}

#[tokio::test]
async fn test_json_api() {
    let (app, store) = app();
    post_form(&app, "/catalog/genre/create", "name=Fantasy").await;
    store.add_book("The Hobbit", Some(1)).await;

    let response = get(&app, "/api/v1/genres").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(body[0]["name"], "Fantasy");

    let response = get(&app, "/api/v1/genres/1").await;
    let body: Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(body["genre"]["id"], 1);
    assert_eq!(body["books"][0]["title"], "The Hobbit");

    let response = get(&app, "/api/v1/genres/2").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(body["error"], "NoSuchGenre");

    let response = get(&app, "/api/v1/ready").await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_root_redirects_to_genres() {
    let (app, _store) = app();
    let response = get(&app, "/").await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), "/catalog/genres");
}

#[tokio::test]
#[ignore] // Run with: DATABASE_URL=... cargo test -- --ignored
async fn test_postgres_unique_genre_names() {
    use local_library::repository::{CreateOutcome, RenameOutcome};
    use sqlx::postgres::PgPoolOptions;

    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&url)
        .await
        .expect("Failed to connect to database");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    let repository = Repository::new(pool.clone());
    let name = format!("Test genre {}", std::process::id());

    let created = match repository.genres.create_unique(&name).await.unwrap() {
        CreateOutcome::Created(genre) => genre,
        other => panic!("expected a new genre, got {:?}", other),
    };
    assert_eq!(
        repository.genres.create_unique(&name).await.unwrap(),
        CreateOutcome::Existing(created.clone())
    );

    let other_name = format!("{} (other)", name);
    let other = match repository.genres.create_unique(&other_name).await.unwrap() {
        CreateOutcome::Created(genre) => genre,
        other => panic!("expected a new genre, got {:?}", other),
    };
    assert_eq!(
        repository.genres.rename_unique(other.id, &name).await.unwrap(),
        RenameOutcome::Conflict(created.clone())
    );

    assert!(repository.genres.delete(other.id).await.unwrap());
    assert!(repository.genres.delete(created.id).await.unwrap());
    assert!(!repository.genres.delete(created.id).await.unwrap());
}
