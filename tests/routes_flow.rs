use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode, header},
};
use sea_orm::{ConnectionTrait, EntityTrait, PaginatorTrait, Statement};
use serde_json::{Value, json};
use serial_test::serial;
use shop_api::{
    db::{create_orm_conn, create_pool, run_migrations},
    entity::Products,
    routes::create_api_router,
    state::AppState,
    uploads::UploadStore,
};
use tower::ServiceExt;
use uuid::Uuid;

// These tests drive the HTTP router against a real Postgres and are skipped when
// no database is configured.
fn database_url() -> Option<String> {
    match std::env::var("TEST_DATABASE_URL").or_else(|_| std::env::var("DATABASE_URL")) {
        Ok(url) => Some(url),
        Err(_) => {
            eprintln!("Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run route tests.");
            None
        }
    }
}

async fn setup(database_url: &str) -> anyhow::Result<(AppState, Router)> {
    let pool = create_pool(database_url, 2).await?;
    let orm = create_orm_conn(&pool);
    run_migrations(&orm).await?;

    let backend = orm.get_database_backend();
    orm.execute(Statement::from_string(
        backend,
        "TRUNCATE TABLE products, brands, categories, users RESTART IDENTITY CASCADE",
    ))
    .await?;

    let uploads = UploadStore::new(std::env::temp_dir().join(format!("shop-api-routes-{}", Uuid::new_v4())));
    uploads.ensure_dir().await?;

    let state = AppState { pool, orm, uploads };
    let app = create_api_router().with_state(state.clone());
    Ok((state, app))
}

const BOUNDARY: &str = "shop-api-form-boundary";

enum Part<'a> {
    Text(&'a str, &'a str),
    File(&'a str, &'a str, &'a [u8]),
}

fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match part {
            Part::Text(name, value) => body.extend_from_slice(
                format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n").as_bytes(),
            ),
            Part::File(name, file_name, bytes) => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\n\
                         Content-Type: application/octet-stream\r\n\r\n"
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(bytes);
                body.extend_from_slice(b"\r\n");
            }
        }
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

fn multipart_request(method: Method, uri: &str, parts: &[Part<'_>]) -> anyhow::Result<Request<Body>> {
    Ok(Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, format!("multipart/form-data; boundary={BOUNDARY}"))
        .body(Body::from(multipart_body(parts)))?)
}

fn json_request(method: Method, uri: &str, body: Value) -> anyhow::Result<Request<Body>> {
    Ok(Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))?)
}

async fn send(app: &Router, request: Request<Body>) -> anyhow::Result<(StatusCode, Value)> {
    let response = app.clone().oneshot(request).await?;
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await?;
    Ok((status, serde_json::from_slice(&bytes)?))
}

async fn stored_files(state: &AppState) -> anyhow::Result<Vec<String>> {
    let mut names = Vec::new();
    let mut entries = tokio::fs::read_dir(state.uploads.dir()).await?;
    while let Some(entry) = entries.next_entry().await? {
        names.push(entry.file_name().to_string_lossy().into_owned());
    }
    names.sort();
    Ok(names)
}

#[tokio::test]
#[serial]
async fn registering_twice_is_created_then_conflict() -> anyhow::Result<()> {
    let Some(url) = database_url() else {
        return Ok(());
    };
    let (_state, app) = setup(&url).await?;

    let form = [
        Part::Text("name", "Ada"),
        Part::Text("email", "ada@example.com"),
        Part::Text("password", "hunter2"),
    ];
    let (status, body) = send(&app, multipart_request(Method::POST, "/users", &form)?).await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["email"], "ada@example.com");
    assert!(body["data"].get("password").is_none());
    assert!(body["data"].get("password_hash").is_none());

    let (status, body) = send(&app, multipart_request(Method::POST, "/users", &form)?).await?;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["data"]["error"].is_string());
    Ok(())
}

#[tokio::test]
#[serial]
async fn failed_product_create_discards_the_uploaded_photo() -> anyhow::Result<()> {
    let Some(url) = database_url() else {
        return Ok(());
    };
    let (state, app) = setup(&url).await?;

    let form = [
        Part::Text("name", "Air Max"),
        Part::Text("price", "120"),
        Part::Text("category_name", "Ghost"),
        Part::File("photo", "air.png", b"png-bytes"),
    ];
    let (status, body) = send(&app, multipart_request(Method::POST, "/produit", &form)?).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["message"].as_str().is_some_and(|m| m.contains("Ghost")));

    assert!(stored_files(&state).await?.is_empty());
    assert_eq!(Products::find().count(&state.orm).await?, 0);
    Ok(())
}

#[tokio::test]
#[serial]
async fn product_lifecycle_over_both_mounts() -> anyhow::Result<()> {
    let Some(url) = database_url() else {
        return Ok(());
    };
    let (state, app) = setup(&url).await?;

    let (status, _) = send(
        &app,
        json_request(Method::POST, "/categories", json!({ "name": "Shoes", "description": "Footwear" }))?,
    )
    .await?;
    assert_eq!(status, StatusCode::CREATED);

    let form = [
        Part::Text("name", "Air Max"),
        Part::Text("price", "120,50"),
        Part::Text("category_name", "Shoes"),
        Part::File("photo", "front.png", b"front"),
    ];
    let (status, body) = send(&app, multipart_request(Method::POST, "/produits", &form)?).await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["category_name"], "Shoes");
    assert_eq!(body["data"]["category_description"], "Footwear");
    let id = body["data"]["id"].as_str().unwrap_or_default().to_string();
    let first_photo = body["data"]["photo"].as_str().unwrap_or_default().to_string();
    assert!(first_photo.ends_with("-front.png"));
    assert_eq!(stored_files(&state).await?, vec![first_photo.clone()]);

    let (status, body) = send(
        &app,
        Request::get(format!("/produit/{id}")).body(Body::empty())?,
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["photo"], first_photo.as_str());

    let update = [Part::Text("name", "Air Max 90"), Part::File("photo", "side.png", b"side")];
    let (status, body) =
        send(&app, multipart_request(Method::PUT, &format!("/produits/{id}"), &update)?).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "Air Max 90");
    assert_eq!(body["data"]["category_name"], "Shoes");
    let second_photo = body["data"]["photo"].as_str().unwrap_or_default().to_string();
    assert!(second_photo.ends_with("-side.png"));
    // The row points at the new file and the old one is gone.
    assert_eq!(stored_files(&state).await?, vec![second_photo.clone()]);

    let (status, body) = send(
        &app,
        Request::delete(format!("/produit/{id}")).body(Body::empty())?,
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["photo"], second_photo.as_str());
    assert!(stored_files(&state).await?.is_empty());
    Ok(())
}

#[tokio::test]
#[serial]
async fn malformed_requests_get_the_error_envelope() -> anyhow::Result<()> {
    let Some(url) = database_url() else {
        return Ok(());
    };
    let (_state, app) = setup(&url).await?;

    let requests = [
        json_request(Method::POST, "/categories", json!({ "name": 5 }))?,
        Request::get("/produit/not-a-uuid").body(Body::empty())?,
        Request::get("/produits?userId=abc").body(Body::empty())?,
        json_request(Method::POST, "/login", json!({ "email": ["ada"] }))?,
    ];
    for request in requests {
        let uri = request.uri().to_string();
        let (status, body) = send(&app, request).await?;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert!(body["data"]["error"].is_string(), "{uri}");
    }

    let form = [Part::Text("name", "Air Max"), Part::Text("price", "99999999999"), Part::Text("category", "Shoes")];
    let (status, _) = send(&app, multipart_request(Method::POST, "/produit", &form)?).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    Ok(())
}
