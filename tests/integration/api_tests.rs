//! API integration tests
//!
//! These run against a server on localhost with the seed data loaded
//! (an `admin`/`admin` account holding `add_user`, a `librarian`/`librarian`
//! account holding `can_mark_returned`, and a `patron`/`patron` account with
//! no capabilities).

use reqwest::{redirect::Policy, Client, StatusCode};
use serde_json::{json, Value};

const BASE_URL: &str = "http://localhost:8080/api/v1";

/// Helper to log in and return a bearer token
async fn get_auth_token(client: &Client, login: &str, password: &str) -> String {
    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({
            "login": login,
            "password": password
        }))
        .send()
        .await
        .expect("Failed to send login request");

    let body: Value = response.json().await.expect("Failed to parse login response");
    body["token"].as_str().expect("No token in response").to_string()
}

/// Client that does not follow the renewal redirect
fn no_redirect_client() -> Client {
    Client::builder()
        .redirect(Policy::none())
        .build()
        .expect("Failed to build client")
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_health_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/health", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_readiness_round_trips_the_database() {
    let client = Client::new();

    let response = client
        .get(format!("{}/ready", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "ready");
}

#[tokio::test]
#[ignore]
async fn test_login() {
    let client = Client::new();

    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({
            "login": "librarian",
            "password": "librarian"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["token"].is_string());
    assert_eq!(body["token_type"], "Bearer");
    assert!(body["capabilities"]
        .as_array()
        .expect("No capabilities in response")
        .iter()
        .any(|c| c == "can_mark_returned"));
}

#[tokio::test]
#[ignore]
async fn test_login_invalid_credentials() {
    let client = Client::new();

    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({
            "login": "librarian",
            "password": "wrong"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore]
async fn test_unauthenticated_all_loans_points_to_login() {
    let client = Client::new();

    let response = client
        .get(format!("{}/loans/borrowed", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["error"], "authentication-required");
    let login = body["login"].as_str().expect("No login URL in response");
    assert!(login.contains("next=/api/v1/loans/borrowed"));
}

#[tokio::test]
#[ignore]
async fn test_all_loans_forbidden_without_capability() {
    let client = Client::new();
    let token = get_auth_token(&client, "patron", "patron").await;

    let response = client
        .get(format!("{}/loans/borrowed", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
#[ignore]
async fn test_my_loans_listing_shape() {
    let client = Client::new();
    let token = get_auth_token(&client, "patron", "patron").await;

    let response = client
        .get(format!("{}/loans/mine", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    let items = body["items"].as_array().expect("items is not an array");
    assert!(body["total"].is_number());
    assert_eq!(body["per_page"], 10);
    assert!(items.len() <= 10);

    // Listing is ordered by due date ascending
    let dates: Vec<&str> = items
        .iter()
        .filter_map(|c| c["due_back"].as_str())
        .collect();
    let mut sorted = dates.clone();
    sorted.sort();
    assert_eq!(dates, sorted);
}

#[tokio::test]
#[ignore]
async fn test_zero_page_is_served_as_first_page() {
    let client = Client::new();
    let token = get_auth_token(&client, "patron", "patron").await;

    let response = client
        .get(format!("{}/books?page=0", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["page"], 1);
}

#[tokio::test]
#[ignore]
async fn test_catalog_summary() {
    let client = Client::new();
    let token = get_auth_token(&client, "patron", "patron").await;

    let response = client
        .get(format!("{}/catalog/summary", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["num_books"].is_number());
    assert!(body["num_copies"].is_number());
    assert!(body["num_copies_available"].is_number());
}

#[tokio::test]
#[ignore]
async fn test_renewal_round_trip() {
    let client = no_redirect_client();
    let token = get_auth_token(&client, "librarian", "librarian").await;

    // Pick an on-loan copy from the all-loans listing
    let listing: Value = client
        .get(format!("{}/loans/borrowed", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");

    let copy_id = listing["items"][0]["id"]
        .as_str()
        .expect("No on-loan copy in seed data")
        .to_string();

    // Display path: the form suggests today + 3 weeks
    let form: Value = client
        .get(format!("{}/copies/{}/renew", BASE_URL, copy_id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");

    let suggested = form["renewal_date"].as_str().expect("No suggested date");
    let expected = (chrono::Utc::now().date_naive() + chrono::Duration::days(21)).to_string();
    assert_eq!(suggested, expected);

    // Submit path: a valid date redirects to the all-loans listing
    let candidate = (chrono::Utc::now().date_naive() + chrono::Duration::days(14)).to_string();
    let response = client
        .post(format!("{}/copies/{}/renew", BASE_URL, copy_id))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "renewal_date": candidate }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response.headers()["location"],
        "/api/v1/loans/borrowed"
    );

    // The new due date is visible in the listing
    let listing: Value = client
        .get(format!("{}/loans/borrowed", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");

    let renewed = listing["items"]
        .as_array()
        .unwrap()
        .iter()
        .find(|c| c["id"] == copy_id.as_str())
        .expect("Renewed copy missing from listing");
    assert_eq!(renewed["due_back"], candidate.as_str());
}

#[tokio::test]
#[ignore]
async fn test_renewal_rejects_past_date() {
    let client = no_redirect_client();
    let token = get_auth_token(&client, "librarian", "librarian").await;

    let listing: Value = client
        .get(format!("{}/loans/borrowed", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");

    let copy_id = listing["items"][0]["id"]
        .as_str()
        .expect("No on-loan copy in seed data")
        .to_string();

    let candidate = (chrono::Utc::now().date_naive() - chrono::Duration::days(1)).to_string();
    let response = client
        .post(format!("{}/copies/{}/renew", BASE_URL, copy_id))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "renewal_date": candidate }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(
        body["renewal_date_error"],
        "Invalid date - renewal cannot be in the past"
    );
}

#[tokio::test]
#[ignore]
async fn test_renewal_unknown_copy_is_not_found() {
    let client = Client::new();
    let token = get_auth_token(&client, "librarian", "librarian").await;

    let response = client
        .get(format!(
            "{}/copies/00000000-0000-0000-0000-000000000000/renew",
            BASE_URL
        ))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore]
async fn test_list_books() {
    let client = Client::new();
    let token = get_auth_token(&client, "patron", "patron").await;

    let response = client
        .get(format!("{}/books", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["items"].is_array());
    assert!(body["total"].is_number());
}

#[tokio::test]
#[ignore]
async fn test_user_create_requires_capability() {
    let client = Client::new();
    let token = get_auth_token(&client, "patron", "patron").await;

    let response = client
        .post(format!("{}/users", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({
            "login": "intruder",
            "password": "intruder"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
#[ignore]
async fn test_created_user_can_log_in() {
    let client = Client::new();
    let token = get_auth_token(&client, "admin", "admin").await;

    // Unique login per run so the test is rerunnable
    let login = format!("reader-{}", uuid::Uuid::new_v4().simple());
    let response = client
        .post(format!("{}/users", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({
            "login": login,
            "password": "s3cret",
            "first_name": "New",
            "last_name": "Reader"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::CREATED);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["login"], login.as_str());
    assert!(body.get("password").is_none());

    // The stored hash verifies against the submitted password
    let token = get_auth_token(&client, &login, "s3cret").await;
    assert!(!token.is_empty());

    // Duplicate login is refused
    let response = client
        .post(format!("{}/users", BASE_URL))
        .header(
            "Authorization",
            format!("Bearer {}", get_auth_token(&client, "admin", "admin").await),
        )
        .json(&json!({
            "login": login,
            "password": "s3cret"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
#[ignore]
async fn test_author_create_requires_capability() {
    let client = Client::new();
    let token = get_auth_token(&client, "patron", "patron").await;

    let response = client
        .post(format!("{}/authors", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({
            "first_name": "Ursula",
            "last_name": "Le Guin"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}
