use bytes::Bytes;
use reqwest::Client;
use url::Url;

use super::ClientError;
use crate::objects::{CandidateSelection, ConfirmedResultResponse, ErrorResponse};
use crate::token::HOST_TOKEN_HEADER;

/// Typed HTTP client for the gathering confirmation endpoints.
///
/// Host-only calls take the raw host token and send it in the
/// `Huddle-Host-Token` header.
#[derive(Debug, Clone)]
pub struct GatheringClient {
    http: Client,
    base_url: Url,
}

impl GatheringClient {
    /// Create a new `GatheringClient` pointing at the root URL of a server.
    pub fn new(base_url: Url) -> Self {
        Self {
            http: Client::new(),
            base_url,
        }
    }

    /// Replace the default `reqwest::Client` with a custom one.
    pub fn with_http_client(mut self, client: Client) -> Self {
        self.http = client;
        self
    }

    fn endpoint(&self, share_code: &str, suffix: &str) -> Result<Url, ClientError> {
        let share_code = urlencoding::encode(share_code);
        Ok(self
            .base_url
            .join(&format!("/api/v1/gatherings/{share_code}/{suffix}"))?)
    }

    /// `POST /api/v1/gatherings/{share_code}/confirm` – confirm while voting.
    pub async fn confirm(
        &self,
        share_code: &str,
        host_token: &str,
        selection: CandidateSelection,
    ) -> Result<ConfirmedResultResponse, ClientError> {
        self.post_selection(share_code, "confirm", host_token, selection)
            .await
    }

    /// `POST /api/v1/gatherings/{share_code}/tiebreak` – resolve a tie.
    pub async fn resolve_tiebreak(
        &self,
        share_code: &str,
        host_token: &str,
        selection: CandidateSelection,
    ) -> Result<ConfirmedResultResponse, ClientError> {
        self.post_selection(share_code, "tiebreak", host_token, selection)
            .await
    }

    async fn post_selection(
        &self,
        share_code: &str,
        suffix: &str,
        host_token: &str,
        selection: CandidateSelection,
    ) -> Result<ConfirmedResultResponse, ClientError> {
        let url = self.endpoint(share_code, suffix)?;
        let resp = self
            .http
            .post(url)
            .header(HOST_TOKEN_HEADER, host_token)
            .json(&selection)
            .send()
            .await?;
        let bytes = check_status(resp).await?.bytes().await?;
        serde_json::from_slice(&bytes).map_err(ClientError::Json)
    }

    /// `GET /api/v1/gatherings/{share_code}/result`
    pub async fn get_result(
        &self,
        share_code: &str,
    ) -> Result<ConfirmedResultResponse, ClientError> {
        let url = self.endpoint(share_code, "result")?;
        let resp = self.http.get(url).send().await?;
        let bytes = check_status(resp).await?.bytes().await?;
        serde_json::from_slice(&bytes).map_err(ClientError::Json)
    }

    /// `GET /api/v1/gatherings/{share_code}/result/ics` – raw calendar file.
    pub async fn download_ics(&self, share_code: &str) -> Result<Bytes, ClientError> {
        let url = self.endpoint(share_code, "result/ics")?;
        let resp = self.http.get(url).send().await?;
        Ok(check_status(resp).await?.bytes().await?)
    }
}

async fn check_status(resp: reqwest::Response) -> Result<reqwest::Response, ClientError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    match serde_json::from_str::<ErrorResponse>(&body) {
        Ok(error) => Err(ClientError::Api { status, error }),
        Err(_) => Err(ClientError::UnexpectedStatus { status, body }),
    }
}
