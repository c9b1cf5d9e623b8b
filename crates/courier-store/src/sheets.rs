use async_trait::async_trait;
use reqwest::{Client, StatusCode, header::CONTENT_TYPE};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

use courier_types::models::Snapshot;

use crate::RemoteStore;

/// Client for a Google Apps Script web app that keeps the document in a
/// spreadsheet.
///
/// The script answers `GET` with the JSON document and accepts a `POST`
/// envelope `{"type": "SYNC_ALL", "payload": ...}`. Requests carry no custom
/// headers beyond `Content-Type: text/plain` on the write, which keeps them
/// "simple" as far as the script host is concerned.
#[derive(Clone)]
pub struct SheetsStore {
    client: Client,
    url: String,
}

#[derive(Debug, Error)]
enum FetchError {
    #[error("request failed: {0}")]
    Request(#[source] reqwest::Error),

    #[error("store answered {0}")]
    Status(StatusCode),

    #[error("unreadable document: {0}")]
    Decode(#[source] reqwest::Error),
}

#[derive(Serialize)]
struct SyncEnvelope<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    payload: &'a Snapshot,
}

impl SheetsStore {
    pub fn new(url: &str) -> Self {
        Self::with_client(Client::new(), url)
    }

    pub fn with_client(client: Client, url: &str) -> Self {
        Self {
            client,
            url: sanitize_url(url),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    async fn try_fetch(&self) -> Result<Snapshot, FetchError> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(FetchError::Request)?;

        if !response.status().is_success() {
            return Err(FetchError::Status(response.status()));
        }

        response.json::<Snapshot>().await.map_err(FetchError::Decode)
    }
}

#[async_trait]
impl RemoteStore for SheetsStore {
    async fn fetch_all(&self) -> Option<Snapshot> {
        match self.try_fetch().await {
            Ok(snapshot) => {
                debug!(
                    "Fetched document: {} users, {} contacts, {} messages, {} posts, {} photos",
                    snapshot.users.len(),
                    snapshot.contacts.len(),
                    snapshot.messages.len(),
                    snapshot.posts.len(),
                    snapshot.photos.len()
                );
                Some(snapshot)
            }
            Err(e) => {
                warn!("Error fetching document from {}: {}", self.url, e);
                None
            }
        }
    }

    async fn replace_all(&self, snapshot: &Snapshot) -> bool {
        let body = match serde_json::to_string(&SyncEnvelope {
            kind: "SYNC_ALL",
            payload: snapshot,
        }) {
            Ok(body) => body,
            Err(e) => {
                warn!("Failed to encode document: {}", e);
                return false;
            }
        };

        // The response is never inspected: reaching the endpoint counts as success.
        match self
            .client
            .post(&self.url)
            .header(CONTENT_TYPE, "text/plain")
            .body(body)
            .send()
            .await
        {
            Ok(_) => true,
            Err(e) => {
                warn!("Error syncing document to {}: {}", self.url, e);
                false
            }
        }
    }
}

/// Clean up a pasted script URL: trim it, drop zero-width characters, and
/// turn an editor link (`.../edit...`) into the deployed `.../exec` endpoint.
pub fn sanitize_url(url: &str) -> String {
    let cleaned: String = url
        .trim()
        .chars()
        .filter(|c| !matches!(c, '\u{200B}'..='\u{200D}' | '\u{FEFF}'))
        .collect();

    match cleaned.split_once("/edit") {
        Some((base, _)) => format!("{base}/exec"),
        None => cleaned,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_trims_and_strips_zero_width() {
        assert_eq!(
            sanitize_url("  https://script.google.com/macros/s/abc/exec\u{200B}\u{FEFF} "),
            "https://script.google.com/macros/s/abc/exec"
        );
    }

    #[test]
    fn sanitize_rewrites_editor_links() {
        assert_eq!(
            sanitize_url("https://script.google.com/macros/s/abc/edit?usp=sharing"),
            "https://script.google.com/macros/s/abc/exec"
        );
    }

    #[test]
    fn sanitize_keeps_exec_urls() {
        let url = "https://script.google.com/macros/s/abc/exec";
        assert_eq!(sanitize_url(url), url);
        assert_eq!(SheetsStore::new(url).url(), url);
    }

    #[test]
    fn envelope_shape() {
        let snapshot = Snapshot::default();
        let json = serde_json::to_value(SyncEnvelope {
            kind: "SYNC_ALL",
            payload: &snapshot,
        })
        .unwrap();
        assert_eq!(json["type"], "SYNC_ALL");
        assert!(json["payload"]["users"].as_array().unwrap().is_empty());
    }
}
