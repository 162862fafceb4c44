// HTTP tests against an in-memory database

use actix_web::http::StatusCode;
use actix_web::{test, web, App};
use gradjobs::core::Matcher;
use gradjobs::models::PublicUser;
use gradjobs::routes::{self, AppState};
use gradjobs::services::{CatalogCache, LogNotifier, Notifier, NotifyError, Store, TokenService};
use serde_json::{json, Value};
use std::sync::Arc;

async fn test_state() -> AppState {
    AppState {
        store: Arc::new(Store::in_memory().await.unwrap()),
        tokens: Arc::new(TokenService::new("test-secret", 3600)),
        cache: Arc::new(CatalogCache::new(16, 60)),
        notifier: Arc::new(LogNotifier::new(false, "jobs@example.com")),
        matcher: Matcher::default(),
        allow_admin_registration: false,
    }
}

/// Notifier whose every delivery fails
struct UnreachableMailer;

#[async_trait::async_trait]
impl Notifier for UnreachableMailer {
    async fn registered(&self, _user: &PublicUser) -> Result<(), NotifyError> {
        Err(NotifyError::Delivery("smtp relay unreachable".to_string()))
    }
}

macro_rules! call_json {
    ($app:expr, $req:expr) => {{
        let resp = test::call_service(&$app, $req.to_request()).await;
        let status = resp.status();
        let body: Value = test::read_body_json(resp).await;
        (status, body)
    }};
}

macro_rules! register {
    ($app:expr, $username:expr, $graduate:expr, $employer:expr) => {{
        let (status, body) = call_json!(
            $app,
            test::TestRequest::post()
                .uri("/api/v1/registration")
                .set_json(json!({
                    "username": $username,
                    "password": "secret",
                    "email": format!("{}@example.com", $username),
                    "graduate": $graduate,
                    "employer": $employer,
                }))
        );
        assert_eq!(status, StatusCode::OK, "registration failed: {}", body);
        body["data"]["id"].as_i64().unwrap()
    }};
}

macro_rules! login {
    ($app:expr, $username:expr) => {{
        let (status, body) = call_json!(
            $app,
            test::TestRequest::post()
                .uri("/api/v1/login")
                .set_json(json!({ "username": $username, "password": "secret" }))
        );
        assert_eq!(status, StatusCode::OK, "login failed: {}", body);
        format!("Bearer {}", body["token"].as_str().unwrap())
    }};
}

#[actix_web::test]
async fn test_health() {
    let state = test_state().await;
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .configure(routes::configure_routes),
    )
    .await;

    let (status, body) = call_json!(app, test::TestRequest::get().uri("/api/v1/health"));

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[actix_web::test]
async fn test_graduate_sees_jobs_matching_their_cv() {
    let state = test_state().await;
    let backend = state.store.create_role("Backend developer").await.unwrap();
    let design = state.store.create_role("Designer").await.unwrap();
    let rust = state.store.create_skill("Rust").await.unwrap();

    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .configure(routes::configure_routes),
    )
    .await;

    register!(app, "acme", false, true);
    register!(app, "ada", true, false);
    let acme = login!(app, "acme");
    let ada = login!(app, "ada");

    let (status, body) = call_json!(
        app,
        test::TestRequest::post()
            .uri("/api/v1/jobs")
            .insert_header(("Authorization", acme.clone()))
            .set_json(json!({ "title": "Backend engineer", "yoe": 1.0, "role_id": backend.id }))
    );
    assert_eq!(status, StatusCode::OK);
    let backend_job = body["job"]["id"].as_i64().unwrap();

    let (status, body) = call_json!(
        app,
        test::TestRequest::post()
            .uri("/api/v1/jobs/skills")
            .insert_header(("Authorization", acme.clone()))
            .set_json(json!({ "job_id": backend_job, "job_skill_id": rust.id }))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["tree"].as_array().unwrap().len(), 1);

    let (status, _) = call_json!(
        app,
        test::TestRequest::post()
            .uri("/api/v1/jobs")
            .insert_header(("Authorization", acme.clone()))
            .set_json(json!({ "title": "Product designer", "yoe": 0.0, "role_id": design.id }))
    );
    assert_eq!(status, StatusCode::OK);

    // No CV yet
    let (status, _) = call_json!(
        app,
        test::TestRequest::get()
            .uri("/api/v1/jobs/filtered")
            .insert_header(("Authorization", ada.clone()))
    );
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = call_json!(
        app,
        test::TestRequest::post()
            .uri("/api/v1/cv")
            .insert_header(("Authorization", ada.clone()))
            .set_json(json!({ "gpa": 3.0, "yoe": 1.0, "job_role_id": backend.id }))
    );
    assert_eq!(status, StatusCode::OK);
    let cv_id = body["cv"]["id"].as_i64().unwrap();

    let (status, body) = call_json!(
        app,
        test::TestRequest::post()
            .uri("/api/v1/cv/skills")
            .insert_header(("Authorization", ada.clone()))
            .set_json(json!({ "cv_id": cv_id, "job_skill_id": rust.id }))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["skill"]["name"], "Rust");

    // gpa 5 + role 15 + skill 3 for the backend job, gpa 5 for the design job
    let (status, body) = call_json!(
        app,
        test::TestRequest::get()
            .uri("/api/v1/jobs/filtered")
            .insert_header(("Authorization", ada.clone()))
    );
    assert_eq!(status, StatusCode::OK);
    let jobs = body["jobs"].as_array().unwrap();
    assert_eq!(jobs.len(), 1);
    assert_eq!(jobs[0]["id"].as_i64().unwrap(), backend_job);

    let (status, body) = call_json!(
        app,
        test::TestRequest::get()
            .uri("/api/v1/jobs")
            .insert_header(("Authorization", ada))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["jobs"].as_array().unwrap().len(), 2);
}

#[actix_web::test]
async fn test_duplicate_application_conflicts() {
    let state = test_state().await;
    let role = state.store.create_role("Support").await.unwrap();

    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .configure(routes::configure_routes),
    )
    .await;

    register!(app, "acme", false, true);
    register!(app, "ada", true, false);
    let acme = login!(app, "acme");
    let ada = login!(app, "ada");

    let (_, body) = call_json!(
        app,
        test::TestRequest::post()
            .uri("/api/v1/jobs")
            .insert_header(("Authorization", acme))
            .set_json(json!({ "title": "Support engineer", "yoe": 0.0, "role_id": role.id }))
    );
    let job_id = body["job"]["id"].as_i64().unwrap();

    let apply = || {
        test::TestRequest::post()
            .uri("/api/v1/application")
            .insert_header(("Authorization", ada.clone()))
            .set_json(json!({ "job_id": job_id }))
    };

    let (status, _) = call_json!(app, apply());
    assert_eq!(status, StatusCode::OK);

    let (status, body) = call_json!(app, apply());
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["status_code"], 409);
}

#[actix_web::test]
async fn test_friendship_with_self_is_rejected() {
    let state = test_state().await;
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .configure(routes::configure_routes),
    )
    .await;

    let ada_id = register!(app, "ada", true, false);
    let bob_id = register!(app, "bob", true, false);
    let ada = login!(app, "ada");

    let (status, _) = call_json!(
        app,
        test::TestRequest::post()
            .uri("/api/v1/friends")
            .insert_header(("Authorization", ada.clone()))
            .set_json(json!({ "to": ada_id }))
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Acting for another user needs admin rights
    let (status, _) = call_json!(
        app,
        test::TestRequest::post()
            .uri("/api/v1/friends")
            .insert_header(("Authorization", ada.clone()))
            .set_json(json!({ "from": bob_id, "to": ada_id }))
    );
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = call_json!(
        app,
        test::TestRequest::post()
            .uri("/api/v1/friends")
            .insert_header(("Authorization", ada.clone()))
            .set_json(json!({ "to": bob_id }))
    );
    assert_eq!(status, StatusCode::OK);

    let (status, body) = call_json!(
        app,
        test::TestRequest::get()
            .uri(&format!("/api/v1/friends/{}/{}", bob_id, ada_id))
            .insert_header(("Authorization", ada))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["friend"]["from"].as_i64().unwrap(), ada_id);
}

#[actix_web::test]
async fn test_missing_or_bad_token_is_unauthorized() {
    let state = test_state().await;
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .configure(routes::configure_routes),
    )
    .await;

    let (status, body) = call_json!(app, test::TestRequest::get().uri("/api/v1/jobs"));
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "unauthorized");

    let (status, _) = call_json!(
        app,
        test::TestRequest::get()
            .uri("/api/v1/jobs")
            .insert_header(("Authorization", "Bearer not-a-token"))
    );
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_wrong_role_is_forbidden() {
    let state = test_state().await;
    let role = state.store.create_role("Analyst").await.unwrap();
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .configure(routes::configure_routes),
    )
    .await;

    register!(app, "ada", true, false);
    register!(app, "acme", false, true);
    let ada = login!(app, "ada");
    let acme = login!(app, "acme");

    let (status, _) = call_json!(
        app,
        test::TestRequest::post()
            .uri("/api/v1/jobs")
            .insert_header(("Authorization", ada))
            .set_json(json!({ "title": "Analyst", "yoe": 0.0, "role_id": role.id }))
    );
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = call_json!(
        app,
        test::TestRequest::get()
            .uri("/api/v1/jobs")
            .insert_header(("Authorization", acme))
    );
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn test_registration_and_login_errors() {
    let state = test_state().await;
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .configure(routes::configure_routes),
    )
    .await;

    let (status, body) = call_json!(
        app,
        test::TestRequest::post()
            .uri("/api/v1/registration")
            .set_json(json!({
                "username": "root",
                "password": "secret",
                "email": "root@example.com",
                "admin": true,
            }))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["admin"], false);
    assert!(body["data"].get("password_hash").is_none());

    let (status, _) = call_json!(
        app,
        test::TestRequest::post()
            .uri("/api/v1/registration")
            .set_json(json!({
                "username": "root",
                "password": "other",
                "email": "root@example.com",
            }))
    );
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = call_json!(
        app,
        test::TestRequest::post()
            .uri("/api/v1/registration")
            .set_json(json!({
                "username": "eve",
                "password": "secret",
                "email": "not-an-email",
            }))
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = call_json!(
        app,
        test::TestRequest::post()
            .uri("/api/v1/login")
            .set_json(json!({ "username": "root", "password": "wrong" }))
    );
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_catalog_and_last_messages() {
    let state = test_state().await;
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .configure(routes::configure_routes),
    )
    .await;

    let ada_id = register!(app, "ada", true, false);
    let bob_id = register!(app, "bob", true, false);
    let ada = login!(app, "ada");
    let bob = login!(app, "bob");

    let (status, body) = call_json!(
        app,
        test::TestRequest::get()
            .uri("/api/v1/skills")
            .insert_header(("Authorization", ada.clone()))
    );
    assert_eq!(status, StatusCode::OK);
    assert!(body["skills"].as_array().unwrap().is_empty());

    let (status, _) = call_json!(
        app,
        test::TestRequest::post()
            .uri("/api/v1/skills")
            .insert_header(("Authorization", ada.clone()))
            .set_json(json!({ "name": "SQL" }))
    );
    assert_eq!(status, StatusCode::OK);

    // The cached empty list is dropped on insert
    let (_, body) = call_json!(
        app,
        test::TestRequest::get()
            .uri("/api/v1/skills")
            .insert_header(("Authorization", ada.clone()))
    );
    assert_eq!(body["skills"].as_array().unwrap().len(), 1);

    for (token, receiver, text) in [
        (&ada, bob_id, "hi"),
        (&bob, ada_id, "hello"),
        (&ada, bob_id, "how are you?"),
    ] {
        let (status, _) = call_json!(
            app,
            test::TestRequest::post()
                .uri("/api/v1/messages")
                .insert_header(("Authorization", token.clone()))
                .set_json(json!({ "receiver_id": receiver, "message": text }))
        );
        assert_eq!(status, StatusCode::OK);
    }

    let (status, body) = call_json!(
        app,
        test::TestRequest::get()
            .uri(&format!("/api/v1/messages/lasts/{}", ada_id))
            .insert_header(("Authorization", ada.clone()))
    );
    assert_eq!(status, StatusCode::OK);
    let messages = body["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0]["message"], "how are you?");

    let (status, _) = call_json!(
        app,
        test::TestRequest::get()
            .uri("/api/v1/cv/skills")
            .insert_header(("Authorization", ada))
    );
    assert_eq!(status, StatusCode::NOT_IMPLEMENTED);
}

#[actix_web::test]
async fn test_conversations_are_private_to_participants() {
    let state = test_state().await;
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .configure(routes::configure_routes),
    )
    .await;

    let ada_id = register!(app, "ada", true, false);
    let bob_id = register!(app, "bob", true, false);
    register!(app, "eve", true, false);
    let ada = login!(app, "ada");
    let bob = login!(app, "bob");
    let eve = login!(app, "eve");

    let (status, _) = call_json!(
        app,
        test::TestRequest::post()
            .uri("/api/v1/messages")
            .insert_header(("Authorization", ada.clone()))
            .set_json(json!({ "receiver_id": bob_id, "message": "private note" }))
    );
    assert_eq!(status, StatusCode::OK);

    for uri in [
        format!("/api/v1/messages/{}/{}", ada_id, bob_id),
        format!("/api/v1/messages/lasts/{}", ada_id),
    ] {
        let (status, body) = call_json!(
            app,
            test::TestRequest::get()
                .uri(&uri)
                .insert_header(("Authorization", eve.clone()))
        );
        assert_eq!(status, StatusCode::FORBIDDEN, "{} leaked: {}", uri, body);
        assert!(!body.to_string().contains("private note"));
    }

    // Either participant may read the thread, in any path order
    for (token, uri) in [
        (&ada, format!("/api/v1/messages/{}/{}", ada_id, bob_id)),
        (&bob, format!("/api/v1/messages/{}/{}", ada_id, bob_id)),
        (&bob, format!("/api/v1/messages/{}/{}", bob_id, ada_id)),
    ] {
        let (status, body) = call_json!(
            app,
            test::TestRequest::get()
                .uri(&uri)
                .insert_header(("Authorization", token.clone()))
        );
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["messages"][0]["message"], "private note");
    }

    let (status, _) = call_json!(
        app,
        test::TestRequest::get()
            .uri(&format!("/api/v1/messages/lasts/{}", bob_id))
            .insert_header(("Authorization", ada))
    );
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn test_registration_survives_notifier_failure() {
    let state = AppState {
        notifier: Arc::new(UnreachableMailer),
        ..test_state().await
    };
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .configure(routes::configure_routes),
    )
    .await;

    let ada_id = register!(app, "ada", true, false);
    let ada = login!(app, "ada");

    let (status, body) = call_json!(
        app,
        test::TestRequest::get()
            .uri("/api/v1/user/graduate")
            .insert_header(("Authorization", ada))
    );
    assert_eq!(status, StatusCode::OK);
    let graduates = body["graduates"].as_array().unwrap();
    assert_eq!(graduates.len(), 1);
    assert_eq!(graduates[0]["id"], ada_id);
}
