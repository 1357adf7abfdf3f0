use axum::Router;
use axum::body::Body;
use axum::http::{Request, header};
use axum::routing::get;
use tower::ServiceExt as _;
use tower_cookies::{CookieManagerLayer, Cookies};
use tutordash_core::{SessionStore as _, SessionToken};

use super::{CookieSessionStore, CookiesExt as _, bearer_token};

fn app(secure: bool) -> Router {
    Router::new()
        .route(
            "/create",
            get(move |cookies: Cookies| async move {
                CookieSessionStore::new(cookies, secure).create(SessionToken::new("teacher_123"));
            }),
        )
        .route(
            "/read",
            get(move |cookies: Cookies| async move {
                CookieSessionStore::new(cookies, secure)
                    .read()
                    .map(|token| token.to_string())
                    .unwrap_or_else(|| "<none>".to_owned())
            }),
        )
        .route(
            "/delete",
            get(move |cookies: Cookies| async move {
                CookieSessionStore::new(cookies, secure).delete();
            }),
        )
        .route(
            "/sidebar",
            get(|cookies: Cookies| async move { cookies.get_sidebar_open().to_string() }),
        )
        .layer(CookieManagerLayer::new())
}

async fn call(app: Router, uri: &str, cookie: Option<&str>) -> axum::response::Response {
    let mut req = Request::builder().uri(uri);
    if let Some(cookie) = cookie {
        req = req.header(header::COOKIE, cookie);
    }
    app.oneshot(req.body(Body::empty()).unwrap()).await.unwrap()
}

fn set_cookie(resp: &axum::response::Response) -> String {
    resp.headers()
        .get(header::SET_COOKIE)
        .expect("Set-Cookie header")
        .to_str()
        .unwrap()
        .to_owned()
}

async fn body_text(resp: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[test_log::test(tokio::test)]
async fn create_sets_all_cookie_attributes() {
    let cookie = set_cookie(&call(app(false), "/create", None).await);

    assert!(cookie.starts_with("auth_token=teacher_123"), "{cookie}");
    assert!(cookie.contains("HttpOnly"), "{cookie}");
    assert!(cookie.contains("Max-Age=604800"), "{cookie}");
    assert!(cookie.contains("Path=/"), "{cookie}");
    assert!(cookie.contains("SameSite=Lax"), "{cookie}");
    assert!(!cookie.contains("Secure"), "{cookie}");
}

#[test_log::test(tokio::test)]
async fn production_cookie_is_secure() {
    let cookie = set_cookie(&call(app(true), "/create", None).await);

    assert!(cookie.contains("Secure"), "{cookie}");
}

#[test_log::test(tokio::test)]
async fn read_recovers_token_from_request() {
    let resp = call(app(false), "/read", Some("auth_token=admin_001")).await;
    assert_eq!(body_text(resp).await, "admin_001");

    let resp = call(app(false), "/read", None).await;
    assert_eq!(body_text(resp).await, "<none>");
}

#[test_log::test(tokio::test)]
async fn delete_expires_cookie_on_same_path() {
    let cookie = set_cookie(&call(app(false), "/delete", Some("auth_token=dpo_001")).await);

    assert!(cookie.starts_with("auth_token="), "{cookie}");
    assert!(cookie.contains("Max-Age=0"), "{cookie}");
    assert!(cookie.contains("Path=/"), "{cookie}");
}

#[test_log::test(tokio::test)]
async fn sidebar_is_open_only_when_explicitly_true() {
    for (cookie, expected) in [
        (None, "false"),
        (Some("sidebar:state=false"), "false"),
        (Some("sidebar:state=yes"), "false"),
        (Some("sidebar:state=true"), "true"),
    ] {
        let resp = call(app(false), "/sidebar", cookie).await;
        assert_eq!(body_text(resp).await, expected, "{cookie:?}");
    }
}

#[test]
fn bearer_token_parsing() {
    let parts = |value: &str| {
        Request::builder()
            .header(header::AUTHORIZATION, value)
            .body(())
            .unwrap()
            .into_parts()
            .0
    };

    assert_eq!(
        bearer_token(&parts("Bearer admin_001")),
        Some(SessionToken::new("admin_001"))
    );
    assert_eq!(bearer_token(&parts("Bearer   ")), None);
    assert_eq!(bearer_token(&parts("Basic dXNlcjpwYXNz")), None);
}
