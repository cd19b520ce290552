mod common;

use chrono::Duration;
use chrono::Utc;
use common::TestApp;
use reqwest::StatusCode;
use serde_json::json;
use serde_json::Value;
use todo_service::domain::user::models::UserId;

#[tokio::test]
async fn test_register_success() {
    let app = TestApp::spawn().await;

    let response = app
        .post("/auth/register")
        .json(&json!({
            "username": "nicola",
            "email": "nicola@example.com",
            "password": "pass_word!",
            "display_name": "Nicola"
        }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::CREATED);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["username"], "nicola");
    assert_eq!(body["data"]["email"], "nicola@example.com");
    assert_eq!(body["data"]["display_name"], "Nicola");
    assert!(body["data"]["id"].is_string());
    assert!(body["data"]["created_at"].is_string());
    assert!(body["data"].get("password_hash").is_none());
}

#[tokio::test]
async fn test_register_duplicate_username() {
    let app = TestApp::spawn().await;
    app.register("nicola", "nicola@example.com", "pass_word!")
        .await;

    let response = app
        .post("/auth/register")
        .json(&json!({
            "username": "nicola",
            "email": "other@example.com",
            "password": "pass_word!"
        }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::CONFLICT);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["success"], false);
    assert!(body["message"]
        .as_str()
        .unwrap()
        .contains("already exists"));
}

#[tokio::test]
async fn test_register_duplicate_email() {
    let app = TestApp::spawn().await;
    app.register("nicola", "nicola@example.com", "pass_word!")
        .await;

    let response = app
        .post("/auth/register")
        .json(&json!({
            "username": "nicola2",
            "email": "nicola@example.com",
            "password": "pass_word!"
        }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_register_invalid_input() {
    let app = TestApp::spawn().await;

    for body in [
        json!({"username": "n", "email": "nicola@example.com", "password": "pass_word!"}),
        json!({"username": "nicola", "email": "not-an-email", "password": "pass_word!"}),
        json!({"username": "nicola", "email": "nicola@example.com", "password": "short"}),
    ] {
        let response = app
            .post("/auth/register")
            .json(&body)
            .send()
            .await
            .expect("Failed to execute request");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: Value = response.json().await.expect("Failed to parse response");
        assert_eq!(body["success"], false);
    }
}

#[tokio::test]
async fn test_register_malformed_json() {
    let app = TestApp::spawn().await;

    let response = app
        .post("/auth/register")
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_login_success() {
    let app = TestApp::spawn().await;
    app.register("nicola", "nicola@example.com", "pass_word!")
        .await;

    let response = app
        .post("/auth/login")
        .json(&json!({"username": "nicola", "password": "pass_word!"}))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["data"]["token_type"], "Bearer");
    assert_eq!(body["data"]["user"]["username"], "nicola");

    let token = body["data"]["token"].as_str().unwrap();
    let claims = app.token_service.validate(token, Utc::now()).unwrap();
    assert_eq!(claims.sub, body["data"]["user"]["id"].as_str().unwrap());
}

#[tokio::test]
async fn test_login_failures_are_indistinguishable() {
    let app = TestApp::spawn().await;
    app.register("nicola", "nicola@example.com", "pass_word!")
        .await;

    let wrong_password = app
        .post("/auth/login")
        .json(&json!({"username": "nicola", "password": "wrong_password"}))
        .send()
        .await
        .expect("Failed to execute request");
    let unknown_user = app
        .post("/auth/login")
        .json(&json!({"username": "nobody", "password": "pass_word!"}))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(wrong_password.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_user.status(), StatusCode::UNAUTHORIZED);

    let wrong_password: Value = wrong_password.json().await.unwrap();
    let unknown_user: Value = unknown_user.json().await.unwrap();
    assert_eq!(wrong_password, unknown_user);
}

#[tokio::test]
async fn test_protected_route_requires_token() {
    let app = TestApp::spawn().await;

    let response = app
        .get("/todos")
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_bad_tokens_are_rejected() {
    let app = TestApp::spawn().await;
    let data = app
        .register("nicola", "nicola@example.com", "pass_word!")
        .await;
    let user_id = data["id"].as_str().unwrap();

    let expired = app
        .token_service
        .issue(user_id, Some("nicola"), Utc::now() - Duration::hours(25))
        .unwrap()
        .token;

    let garbage = app
        .get_authenticated("/users/profile", "not.a.token")
        .send()
        .await
        .unwrap();
    let expired = app
        .get_authenticated("/users/profile", &expired)
        .send()
        .await
        .unwrap();
    let wrong_scheme = app
        .get("/users/profile")
        .header("authorization", "Basic bmljb2xhOnBhc3M=")
        .send()
        .await
        .unwrap();

    assert_eq!(garbage.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(expired.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_scheme.status(), StatusCode::UNAUTHORIZED);

    // All gate rejections share one body.
    let garbage: Value = garbage.json().await.unwrap();
    let expired: Value = expired.json().await.unwrap();
    assert_eq!(garbage, expired);
}

#[tokio::test]
async fn test_get_profile() {
    let app = TestApp::spawn().await;
    let token = app.signup("nicola").await;

    let response = app
        .get_authenticated("/users/profile", &token)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["data"]["username"], "nicola");
    assert_eq!(body["data"]["email"], "nicola@example.com");
}

#[tokio::test]
async fn test_profile_of_removed_user_is_not_found() {
    let app = TestApp::spawn().await;
    let token = app.signup("nicola").await;

    let claims = app.token_service.validate(&token, Utc::now()).unwrap();
    let user_id = UserId::from_string(&claims.sub).unwrap();
    app.users.remove(&user_id);

    let profile = app
        .get_authenticated("/users/profile", &token)
        .send()
        .await
        .unwrap();
    assert_eq!(profile.status(), StatusCode::NOT_FOUND);

    let create = app
        .post_authenticated("/todos", &token)
        .json(&json!({"title": "orphan"}))
        .send()
        .await
        .unwrap();
    assert_eq!(create.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_profile() {
    let app = TestApp::spawn().await;
    let token = app.signup("nicola").await;

    let response = app
        .put_authenticated("/users/profile", &token)
        .json(&json!({"email": "new@example.com", "display_name": "Nico"}))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["data"]["username"], "nicola");
    assert_eq!(body["data"]["email"], "new@example.com");
    assert_eq!(body["data"]["display_name"], "Nico");

    let response = app
        .put_authenticated("/users/profile", &token)
        .json(&json!({"display_name": null}))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert!(body["data"]["display_name"].is_null());
    assert_eq!(body["data"]["email"], "new@example.com");
}

#[tokio::test]
async fn test_update_profile_password_changes_login() {
    let app = TestApp::spawn().await;
    let token = app.signup("nicola").await;

    let response = app
        .put_authenticated("/users/profile", &token)
        .json(&json!({"password": "new_pass_word!"}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let old = app
        .post("/auth/login")
        .json(&json!({"username": "nicola", "password": "pass_word!"}))
        .send()
        .await
        .unwrap();
    assert_eq!(old.status(), StatusCode::UNAUTHORIZED);

    app.login("nicola", "new_pass_word!").await;
}

#[tokio::test]
async fn test_update_profile_conflicts_and_validation() {
    let app = TestApp::spawn().await;
    app.signup("alice").await;
    let token = app.signup("bob").await;

    let taken = app
        .put_authenticated("/users/profile", &token)
        .json(&json!({"email": "alice@example.com"}))
        .send()
        .await
        .unwrap();
    assert_eq!(taken.status(), StatusCode::CONFLICT);

    let null_username = app
        .put_authenticated("/users/profile", &token)
        .json(&json!({"username": null}))
        .send()
        .await
        .unwrap();
    assert_eq!(null_username.status(), StatusCode::BAD_REQUEST);

    // Re-submitting one's own email is not a conflict.
    let same = app
        .put_authenticated("/users/profile", &token)
        .json(&json!({"email": "bob@example.com"}))
        .send()
        .await
        .unwrap();
    assert_eq!(same.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_todo_lifecycle() {
    let app = TestApp::spawn().await;
    let token = app.signup("nicola").await;

    let response = app
        .post_authenticated("/todos", &token)
        .json(&json!({"title": "Buy milk", "description": "semi-skimmed"}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body: Value = response.json().await.unwrap();
    let id = body["data"]["id"].as_str().unwrap().to_string();
    assert_eq!(body["data"]["completed"], false);

    let response = app
        .put_authenticated(&format!("/todos/{}", id), &token)
        .json(&json!({"completed": true, "description": null}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["data"]["completed"], true);
    assert_eq!(body["data"]["title"], "Buy milk");
    assert!(body["data"]["description"].is_null());

    let response = app.get_authenticated("/todos", &token).send().await.unwrap();
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let response = app
        .delete_authenticated(&format!("/todos/{}", id), &token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .get_authenticated(&format!("/todos/{}", id), &token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app.get_authenticated("/todos", &token).send().await.unwrap();
    let body: Value = response.json().await.unwrap();
    assert!(body["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_todos_of_other_users_are_forbidden() {
    let app = TestApp::spawn().await;
    let alice = app.signup("alice").await;
    let bob = app.signup("bob").await;
    let id = app.create_todo(&alice, "Alice's todo").await;
    let path = format!("/todos/{}", id);

    let get = app.get_authenticated(&path, &bob).send().await.unwrap();
    let put = app
        .put_authenticated(&path, &bob)
        .json(&json!({"completed": true}))
        .send()
        .await
        .unwrap();
    let delete = app.delete_authenticated(&path, &bob).send().await.unwrap();

    assert_eq!(get.status(), StatusCode::FORBIDDEN);
    assert_eq!(put.status(), StatusCode::FORBIDDEN);
    assert_eq!(delete.status(), StatusCode::FORBIDDEN);

    // The owner still sees it untouched.
    let response = app.get_authenticated(&path, &alice).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["data"]["completed"], false);

    let listed = app.get_authenticated("/todos", &bob).send().await.unwrap();
    let listed: Value = listed.json().await.unwrap();
    assert!(listed["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_todo_not_found_and_bad_id() {
    let app = TestApp::spawn().await;
    let token = app.signup("nicola").await;

    let missing = app
        .get_authenticated(&format!("/todos/{}", uuid::Uuid::new_v4()), &token)
        .send()
        .await
        .unwrap();
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);

    let bad_id = app
        .get_authenticated("/todos/not-a-uuid", &token)
        .send()
        .await
        .unwrap();
    assert_eq!(bad_id.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_todo_validation() {
    let app = TestApp::spawn().await;
    let token = app.signup("nicola").await;

    let blank = app
        .post_authenticated("/todos", &token)
        .json(&json!({"title": "   "}))
        .send()
        .await
        .unwrap();
    assert_eq!(blank.status(), StatusCode::BAD_REQUEST);

    let too_long = app
        .post_authenticated("/todos", &token)
        .json(&json!({"title": "x".repeat(201)}))
        .send()
        .await
        .unwrap();
    assert_eq!(too_long.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_register_login_and_ownership_walkthrough() {
    let app = TestApp::spawn().await;

    app.register("u1", "u1@x.com", "pw123456").await;

    let duplicate = app
        .post("/auth/register")
        .json(&json!({"username": "u1", "email": "other@x.com", "password": "pw123456"}))
        .send()
        .await
        .unwrap();
    assert_eq!(duplicate.status(), StatusCode::CONFLICT);

    let wrong = app
        .post("/auth/login")
        .json(&json!({"username": "u1", "password": "wrong"}))
        .send()
        .await
        .unwrap();
    assert_eq!(wrong.status(), StatusCode::UNAUTHORIZED);

    let u1 = app.login("u1", "pw123456").await;
    assert!(!u1.is_empty());

    let u2 = app.signup("u2").await;
    let id = app.create_todo(&u2, "not yours").await;

    let response = app
        .get_authenticated(&format!("/todos/{}", id), &u1)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .get(&format!("/todos/{}", id))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_resource_paths_share_todo_ownership() {
    let app = TestApp::spawn().await;
    let alice = app.signup("alice").await;
    let bob = app.signup("bob").await;

    let response = app
        .post_authenticated("/resources", &alice)
        .json(&json!({"title": "via resources"}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body: Value = response.json().await.unwrap();
    let id = body["data"]["id"].as_str().unwrap().to_string();

    let same = app
        .get_authenticated(&format!("/todos/{}", id), &alice)
        .send()
        .await
        .unwrap();
    assert_eq!(same.status(), StatusCode::OK);

    let other = app
        .get_authenticated(&format!("/resources/{}", id), &bob)
        .send()
        .await
        .unwrap();
    assert_eq!(other.status(), StatusCode::FORBIDDEN);

    let anonymous = app.get("/resources").send().await.unwrap();
    assert_eq!(anonymous.status(), StatusCode::UNAUTHORIZED);
}
