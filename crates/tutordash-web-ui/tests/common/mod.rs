#![allow(dead_code)]

use reqwest::header::{HeaderMap, LOCATION, SET_COOKIE};
use reqwest::{Response, StatusCode};
use tutordash_web_ui::{Opts, UiServer};
use url::Url;

/// A test web UI server running on a random port.
pub struct TestServer {
    server: UiServer,
    base_url: String,
}

impl TestServer {
    /// Server backed by fixture class data.
    pub async fn start() -> Self {
        Self::start_with(Opts::builder().listen("127.0.0.1:0").build()).await
    }

    /// Server whose class data API can't be reached.
    pub async fn start_with_unreachable_data_api() -> Self {
        Self::start_with(
            Opts::builder()
                .listen("127.0.0.1:0")
                .data_api_url(Url::parse("http://127.0.0.1:9/").expect("valid url"))
                .build(),
        )
        .await
    }

    pub async fn start_with(opts: Opts) -> Self {
        let server = tutordash_web_ui::start_ui(opts)
            .await
            .expect("Failed to start test server");

        let base_url = format!("http://{}", server.local_addr());

        Self { server, base_url }
    }

    /// Create a new `UiDriver` with its own cookie jar (independent session).
    pub fn driver(&self) -> UiDriver {
        UiDriver::new(self.base_url.clone())
    }

    /// Shut down the server cleanly.
    pub async fn shutdown(self) {
        self.server
            .shutdown()
            .await
            .expect("Server shutdown failed");
    }
}

/// HTTP client driver for interacting with the web UI in tests.
///
/// Each `UiDriver` maintains its own cookie jar, so it represents
/// an independent browser session.
pub struct UiDriver {
    client: reqwest::Client,
    base_url: String,
}

impl UiDriver {
    fn new(base_url: String) -> Self {
        let client = reqwest::Client::builder()
            .cookie_store(true)
            // Don't auto-follow redirects, tests assert on redirect targets.
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .expect("Failed to build HTTP client");

        Self { client, base_url }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn get(&self, path: &str) -> Response {
        self.client
            .get(self.url(path))
            .send()
            .await
            .expect("GET request failed")
    }

    pub async fn get_with_bearer(&self, path: &str, token: &str) -> Response {
        self.client
            .get(self.url(path))
            .bearer_auth(token)
            .send()
            .await
            .expect("GET request failed")
    }

    pub async fn post_form(&self, path: &str, form: &[(&str, &str)]) -> Response {
        self.client
            .post(self.url(path))
            .form(form)
            .send()
            .await
            .expect("POST request failed")
    }

    pub async fn post_empty(&self, path: &str) -> Response {
        self.client
            .post(self.url(path))
            .send()
            .await
            .expect("POST request failed")
    }

    pub async fn post_json(&self, path: &str, body: &serde_json::Value) -> Response {
        self.client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .expect("POST request failed")
    }

    /// Log in as `role` and assert the redirect to the dashboard.
    pub async fn login(&self, role: &str) {
        let resp = self.post_form("/login", &[("role", role)]).await;
        assert_eq!(
            resp.status(),
            StatusCode::SEE_OTHER,
            "Expected redirect after login, got {}",
            resp.status()
        );
        assert_eq!(location(&resp), "/");
    }

    pub async fn logout(&self) {
        let resp = self.post_empty("/logout").await;
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&resp), "/login");
    }
}

pub fn location(resp: &Response) -> &str {
    resp.headers()
        .get(LOCATION)
        .expect("Location header")
        .to_str()
        .expect("ASCII location")
}

/// All `Set-Cookie` values of a response.
pub fn set_cookies(headers: &HeaderMap) -> Vec<String> {
    headers
        .get_all(SET_COOKIE)
        .iter()
        .map(|value| value.to_str().expect("ASCII cookie").to_owned())
        .collect()
}
