mod test_utils;

use std::sync::Arc;

use cirrus_server_lib::router_service;
use cirrus_shared::api::{
    GetFilesResponse, LoginRequest, SignupRequest, SESSION_COOKIE,
};

use test_utils::{random_email, test_state};

fn signup_body(email: &str) -> SignupRequest {
    SignupRequest {
        name: "probe".to_string(),
        email: email.to_string(),
        password: "password123".to_string(),
        confirm_password: "password123".to_string(),
    }
}

fn session_cookie(response: &warp::http::Response<warp::hyper::body::Bytes>) -> String {
    let header = response
        .headers()
        .get("set-cookie")
        .expect("response carries a session cookie")
        .to_str()
        .unwrap();
    let value = header
        .split(';')
        .next()
        .unwrap();
    assert!(value.starts_with(SESSION_COOKIE));
    value.to_string()
}

#[tokio::test]
async fn listing_without_a_cookie_is_unauthorized() {
    let (state, _, _dir) = test_state();
    let routes = router_service::routes(&Arc::new(state));

    let response = warp::test::request()
        .method("GET")
        .path("/api/file")
        .reply(&routes)
        .await;

    assert_eq!(response.status(), 401);
}

#[tokio::test]
async fn signup_login_and_list_round_trip() {
    let (state, _, _dir) = test_state();
    let routes = router_service::routes(&Arc::new(state));
    let email = random_email();

    let signed_up = warp::test::request()
        .method("POST")
        .path("/api/auth/signup")
        .json(&signup_body(&email))
        .reply(&routes)
        .await;
    assert_eq!(signed_up.status(), 201);
    session_cookie(&signed_up);

    let logged_in = warp::test::request()
        .method("POST")
        .path("/api/auth/login")
        .json(&LoginRequest { email, password: "password123".to_string() })
        .reply(&routes)
        .await;
    assert_eq!(logged_in.status(), 200);
    let cookie = session_cookie(&logged_in);

    let listed = warp::test::request()
        .method("GET")
        .path("/api/file")
        .header("cookie", &cookie)
        .reply(&routes)
        .await;
    assert_eq!(listed.status(), 200);

    let body: GetFilesResponse = serde_json::from_slice(listed.body()).unwrap();
    assert!(body.files.is_empty());
}

#[tokio::test]
async fn duplicate_signup_is_a_conflict_on_the_wire() {
    let (state, _, _dir) = test_state();
    let routes = router_service::routes(&Arc::new(state));
    let email = random_email();

    let first = warp::test::request()
        .method("POST")
        .path("/api/auth/signup")
        .json(&signup_body(&email))
        .reply(&routes)
        .await;
    assert_eq!(first.status(), 201);

    let second = warp::test::request()
        .method("POST")
        .path("/api/auth/signup")
        .json(&signup_body(&email))
        .reply(&routes)
        .await;
    assert_eq!(second.status(), 409);
}

#[tokio::test]
async fn logout_revokes_the_session_and_clears_the_cookie() {
    let (state, _, _dir) = test_state();
    let routes = router_service::routes(&Arc::new(state));

    let signed_up = warp::test::request()
        .method("POST")
        .path("/api/auth/signup")
        .json(&signup_body(&random_email()))
        .reply(&routes)
        .await;
    let cookie = session_cookie(&signed_up);

    let logged_out = warp::test::request()
        .method("POST")
        .path("/api/auth/logout")
        .header("cookie", &cookie)
        .reply(&routes)
        .await;
    assert_eq!(logged_out.status(), 200);
    let cleared = session_cookie(&logged_out);
    assert!(cleared.ends_with('='));

    let listed = warp::test::request()
        .method("GET")
        .path("/api/file")
        .header("cookie", &cookie)
        .reply(&routes)
        .await;
    assert_eq!(listed.status(), 401);
}

#[tokio::test]
async fn malformed_bodies_are_bad_requests() {
    let (state, _, _dir) = test_state();
    let routes = router_service::routes(&Arc::new(state));

    let response = warp::test::request()
        .method("POST")
        .path("/api/auth/login")
        .body("{\"email\": 42}")
        .reply(&routes)
        .await;

    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn unknown_routes_are_not_found() {
    let (state, _, _dir) = test_state();
    let routes = router_service::routes(&Arc::new(state));

    let response = warp::test::request()
        .method("GET")
        .path("/api/nope")
        .reply(&routes)
        .await;

    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn webhook_without_a_signature_is_rejected() {
    let (state, _, _dir) = test_state();
    let routes = router_service::routes(&Arc::new(state));

    let response = warp::test::request()
        .method("POST")
        .path("/api/webhook")
        .body("{}")
        .reply(&routes)
        .await;

    assert_eq!(response.status(), 400);
}
