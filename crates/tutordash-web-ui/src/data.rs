//! Backing class data service.
//!
//! The service is an external collaborator with a single read operation. It
//! either returns typed rows or an explicit failure. Whether to fall back to
//! fixture rows is decided by the view, not here.

use async_trait::async_trait;
use serde::Deserialize;
use snafu::{ResultExt as _, Snafu};
use tracing::debug;
use tutordash_core::SessionToken;
use tutordash_core::radar::{RadarItem, fixture_radar};
use url::Url;

use crate::LOG_TARGET;

#[derive(Debug, Snafu)]
pub enum ClassDataError {
    #[snafu(display("Could not build HTTP client"))]
    Client { source: reqwest::Error },
    #[snafu(display("Invalid data API url"))]
    Url { source: url::ParseError },
    #[snafu(display("Request failed"))]
    Request { source: reqwest::Error },
    #[snafu(display("HTTP {status}"))]
    Status { status: reqwest::StatusCode },
    #[snafu(display("Invalid response body"))]
    Body { source: reqwest::Error },
}

pub type ClassDataResult<T> = std::result::Result<T, ClassDataError>;

#[async_trait]
pub trait ClassDataService: Send + Sync {
    /// Fetch the class radar rows visible to `token`.
    async fn fetch_class_radar(&self, token: &SessionToken) -> ClassDataResult<Vec<RadarItem>>;
}

/// Serves the built-in demo rows.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixtureClassDataService;

#[async_trait]
impl ClassDataService for FixtureClassDataService {
    async fn fetch_class_radar(&self, _token: &SessionToken) -> ClassDataResult<Vec<RadarItem>> {
        Ok(fixture_radar())
    }
}

/// Talks to the class data API over HTTP, authenticating with the session
/// token as a bearer credential.
#[derive(Debug, Clone)]
pub struct HttpClassDataService {
    client: reqwest::Client,
    radar_url: Url,
}

#[derive(Deserialize)]
struct RadarResponse {
    data: Vec<RadarItem>,
}

impl HttpClassDataService {
    pub fn new(base_url: Url) -> ClassDataResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .context(ClientSnafu)?;
        let radar_url = base_url.join("api/class-radar").context(UrlSnafu)?;
        Ok(Self { client, radar_url })
    }
}

#[async_trait]
impl ClassDataService for HttpClassDataService {
    async fn fetch_class_radar(&self, token: &SessionToken) -> ClassDataResult<Vec<RadarItem>> {
        debug!(target: LOG_TARGET, url = %self.radar_url, "Fetching class radar");
        let resp = self
            .client
            .get(self.radar_url.clone())
            .bearer_auth(token.as_str())
            .send()
            .await
            .context(RequestSnafu)?;

        let status = resp.status();
        if !status.is_success() {
            return StatusSnafu { status }.fail();
        }

        Ok(resp.json::<RadarResponse>().await.context(BodySnafu)?.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn radar_url_is_relative_to_base() {
        let service =
            HttpClassDataService::new(Url::parse("http://localhost:8000/").unwrap()).unwrap();
        assert_eq!(
            service.radar_url.as_str(),
            "http://localhost:8000/api/class-radar"
        );
    }

    #[test_log::test(tokio::test)]
    async fn fixture_service_never_fails() {
        let rows = FixtureClassDataService
            .fetch_class_radar(&SessionToken::new("teacher_123"))
            .await
            .unwrap();
        assert_eq!(rows.len(), 6);
    }

    #[test_log::test(tokio::test)]
    async fn unreachable_backend_is_an_explicit_failure() {
        // Port 9 (discard) on localhost is expected to refuse connections.
        let service = HttpClassDataService::new(Url::parse("http://127.0.0.1:9/").unwrap()).unwrap();

        let res = service
            .fetch_class_radar(&SessionToken::new("teacher_123"))
            .await;

        assert!(matches!(res, Err(ClassDataError::Request { .. })));
    }
}
