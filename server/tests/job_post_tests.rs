#[macro_use]
mod common;

use actix_web::{http::StatusCode, test};
use mongodb::bson::{doc, oid::ObjectId};
use serde_json::{json, Value};
use workwizards::db::{Collection, DocumentStore, MemoryStore, Store};

#[actix_web::test]
async fn test_create_then_fetch_returns_submitted_fields() {
    let app = init_app!(Store::new(MemoryStore::new()));
    let submitted = common::job_post_json("owner@example.com", "design");

    let req = test::TestRequest::post()
        .uri("/api/v1/job-post")
        .cookie(common::token_cookie("owner@example.com"))
        .set_json(&submitted)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Job data received successfully");
    let id = body["insertedId"].as_str().expect("inserted id").to_string();

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/single-job-data?id={id}"))
        .cookie(common::token_cookie("owner@example.com"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let fetched: Value = test::read_body_json(resp).await;
    assert_eq!(fetched["_id"], json!(id));
    for field in [
        "user_email",
        "user_name",
        "user_photoURL",
        "job_title",
        "category",
        "deadline",
        "description",
    ] {
        assert_eq!(fetched[field], submitted[field], "field {field} changed");
    }
    assert_eq!(fetched["minimum_price"].as_f64(), Some(100.0));
    assert_eq!(fetched["maximum_price"].as_f64(), Some(500.0));
}

#[actix_web::test]
async fn test_create_keeps_fields_outside_the_named_set() {
    let app = init_app!(Store::new(MemoryStore::new()));
    let mut submitted = common::job_post_json("owner@example.com", "design");
    submitted["job_type"] = json!("remote");
    submitted["skills"] = json!(["figma", "branding"]);

    let req = test::TestRequest::post()
        .uri("/api/v1/job-post")
        .cookie(common::token_cookie("owner@example.com"))
        .set_json(&submitted)
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let id = body["insertedId"].as_str().expect("inserted id").to_string();

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/single-job-data?id={id}"))
        .cookie(common::token_cookie("owner@example.com"))
        .to_request();
    let fetched: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(fetched["job_type"], "remote");
    assert_eq!(fetched["skills"], json!(["figma", "branding"]));
    assert_eq!(fetched["_id"], json!(id));
}

#[actix_web::test]
async fn test_create_requires_token() {
    let memory = MemoryStore::new();
    let app = init_app!(Store::new(memory.clone()));

    let req = test::TestRequest::post()
        .uri("/api/v1/job-post")
        .set_json(common::job_post_json("owner@example.com", "design"))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert!(memory.is_empty(Collection::JobPosts));
}

async fn seed(store: &Store) {
    let posts = store.job_posts();
    for (email, category) in [
        ("alice@example.com", "design"),
        ("alice@example.com", "marketing"),
        ("bob@example.com", "design"),
        ("carol@example.com", "web-development"),
    ] {
        let post = serde_json::from_value(common::job_post_json(email, category)).unwrap();
        posts.create(&post).await.unwrap();
    }
}

#[actix_web::test]
async fn test_list_is_public_and_returns_everything() {
    let store = Store::new(MemoryStore::new());
    seed(&store).await;
    let app = init_app!(store.clone());

    let req = test::TestRequest::get().uri("/api/v1/job-posts").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body.as_array().unwrap().len(), 4);
}

#[actix_web::test]
async fn test_list_skips_documents_that_do_not_fit() {
    let memory = MemoryStore::new();
    let store = Store::new(memory.clone());
    seed(&store).await;
    memory
        .insert_one(
            Collection::JobPosts,
            doc! {
                "user_email": "legacy@example.com",
                "category": "design",
                "deadline": 1_700_000_000_000i64,
            },
        )
        .await
        .unwrap();
    let app = init_app!(store.clone());

    let req = test::TestRequest::get()
        .uri("/api/v1/job-posts?category=design")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    let posts = body.as_array().unwrap();
    assert_eq!(posts.len(), 2);
    assert!(posts
        .iter()
        .all(|post| post["user_email"] != "legacy@example.com"));
}

#[actix_web::test]
async fn test_list_filters_by_category() {
    let store = Store::new(MemoryStore::new());
    seed(&store).await;
    let app = init_app!(store.clone());

    let req = test::TestRequest::get()
        .uri("/api/v1/job-posts?category=design")
        .to_request();
    let resp = test::call_service(&app, req).await;

    let body: Value = test::read_body_json(resp).await;
    let posts = body.as_array().unwrap();
    assert_eq!(posts.len(), 2);
    assert!(posts.iter().all(|post| post["category"] == "design"));
}

#[actix_web::test]
async fn test_list_owner_email_wins_over_category() {
    let store = Store::new(MemoryStore::new());
    seed(&store).await;
    let app = init_app!(store.clone());

    let req = test::TestRequest::get()
        .uri("/api/v1/job-posts?category=design&email=alice@example.com")
        .to_request();
    let resp = test::call_service(&app, req).await;

    let body: Value = test::read_body_json(resp).await;
    let posts = body.as_array().unwrap();
    assert_eq!(posts.len(), 2);
    assert!(posts
        .iter()
        .all(|post| post["user_email"] == "alice@example.com"));
}

#[actix_web::test]
async fn test_update_overwrites_named_fields_only() {
    let store = Store::new(MemoryStore::new());
    let post =
        serde_json::from_value(common::job_post_json("owner@example.com", "design")).unwrap();
    let id = store.job_posts().create(&post).await.unwrap();
    let app = init_app!(store.clone());

    let req = test::TestRequest::put()
        .uri(&format!("/api/v1/update-job-post-data?id={}", id.to_hex()))
        .cookie(common::token_cookie("owner@example.com"))
        .set_json(json!({
            "job_title": "Rebrand",
            "category": "branding",
            "maximum_price": "750",
            "user_email": "thief@example.com"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["job_title"], "Rebrand");
    assert_eq!(body["category"], "branding");
    assert_eq!(body["maximum_price"].as_f64(), Some(750.0));
    assert_eq!(body["user_email"], "owner@example.com");
    assert_eq!(body["description"], "Looking for help");

    let stored = store.job_posts().find_by_id(id).await.unwrap().unwrap();
    assert_eq!(stored.post.job_title.as_deref(), Some("Rebrand"));
    assert_eq!(stored.post.user_email, "owner@example.com");
}

#[actix_web::test]
async fn test_delete_removes_post() {
    let memory = MemoryStore::new();
    let store = Store::new(memory.clone());
    let post =
        serde_json::from_value(common::job_post_json("owner@example.com", "design")).unwrap();
    let id = store.job_posts().create(&post).await.unwrap();
    let app = init_app!(store.clone());

    let req = test::TestRequest::delete()
        .uri(&format!("/api/v1/delete-job-post?id={}", id.to_hex()))
        .cookie(common::token_cookie("owner@example.com"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["_id"], json!(id.to_hex()));
    assert!(memory.is_empty(Collection::JobPosts));
}

#[actix_web::test]
async fn test_missing_post_answers_null_consistently() {
    let app = init_app!(Store::new(MemoryStore::new()));
    let missing = ObjectId::new().to_hex();

    let requests = [
        test::TestRequest::get().uri(&format!("/api/v1/single-job-data?id={missing}")),
        test::TestRequest::put()
            .uri(&format!("/api/v1/update-job-post-data?id={missing}"))
            .set_json(json!({ "job_title": "Ghost" })),
        test::TestRequest::delete().uri(&format!("/api/v1/delete-job-post?id={missing}")),
    ];

    for request in requests {
        let req = request
            .cookie(common::token_cookie("owner@example.com"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body, Value::Null);
    }
}

#[actix_web::test]
async fn test_malformed_or_missing_id_is_bad_request() {
    let app = init_app!(Store::new(MemoryStore::new()));

    for uri in [
        "/api/v1/single-job-data?id=not-an-id",
        "/api/v1/single-job-data",
        "/api/v1/delete-job-post?id=1234",
    ] {
        let request = if uri.contains("delete") {
            test::TestRequest::delete()
        } else {
            test::TestRequest::get()
        };
        let req = request
            .uri(uri)
            .cookie(common::token_cookie("owner@example.com"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "uri {uri}");

        let body: Value = test::read_body_json(resp).await;
        assert!(body["error"].is_string());
    }
}

#[actix_web::test]
async fn test_invalid_body_is_bad_request() {
    let app = init_app!(Store::new(MemoryStore::new()));

    let req = test::TestRequest::post()
        .uri("/api/v1/job-post")
        .cookie(common::token_cookie("owner@example.com"))
        .set_json(json!({ "job_title": "No owner" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert!(body["error"]
        .as_str()
        .unwrap()
        .starts_with("Invalid request body"));
}
