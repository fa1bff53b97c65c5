//! Supabase (PostgREST) implementation of the remote note store.

use std::fmt;
use std::time::Duration;

use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Deserialize;

use super::{require_identity, require_owner, RemoteError, RemoteNoteStore, RemoteResult};
use crate::models::{NoteId, RemoteNote};
use crate::util::{compact_text, is_http_url, normalize_text_option};

const NOTES_TABLE: &str = "notes";
const HTTP_TIMEOUT_SECS: u64 = 15;

/// REST client for the `notes` table of a Supabase project
#[derive(Clone)]
pub struct SupabaseNoteClient {
    rest_url: String,
    anon_key: String,
    access_token: Option<String>,
    client: Client,
}

impl fmt::Debug for SupabaseNoteClient {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("SupabaseNoteClient")
            .field("rest_url", &self.rest_url)
            .field("anon_key", &"[REDACTED]")
            .field(
                "access_token",
                &self.access_token.as_ref().map(|_| "[REDACTED]"),
            )
            .finish_non_exhaustive()
    }
}

impl SupabaseNoteClient {
    /// Build a client for the project at `url`.
    ///
    /// Requests authenticate with `access_token` when present, otherwise with
    /// the anon key (row-level security then decides what is visible).
    pub fn new(
        url: impl AsRef<str>,
        anon_key: impl Into<String>,
        access_token: Option<String>,
    ) -> RemoteResult<Self> {
        let rest_url = normalize_rest_url(url.as_ref())?;
        let anon_key = anon_key.into().trim().to_string();
        if anon_key.is_empty() {
            return Err(RemoteError::InvalidConfiguration(
                "Supabase anon key must not be empty".to_string(),
            ));
        }

        Ok(Self {
            rest_url,
            anon_key,
            access_token: normalize_text_option(access_token),
            client: Client::builder()
                .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
                .build()?,
        })
    }

    fn table_url(&self) -> String {
        format!("{}/{NOTES_TABLE}", self.rest_url)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        let bearer = self.access_token.as_deref().unwrap_or(&self.anon_key);
        request
            .header("apikey", &self.anon_key)
            .bearer_auth(bearer)
            .header("Accept", "application/json")
    }

    async fn ensure_success(response: Response) -> RemoteResult<Response> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        Err(RemoteError::Api(parse_api_error(status, &body)))
    }
}

impl RemoteNoteStore for SupabaseNoteClient {
    async fn upsert(&self, note: &RemoteNote, identity: &str) -> RemoteResult<()> {
        let identity = require_identity(identity)?;
        require_owner(note, identity)?;

        tracing::debug!("Upserting remote note {}", note.app_id);
        let request = self.authorized(
            self.client
                .post(self.table_url())
                .query(&[("on_conflict", "user_id,app_id")])
                .header("Prefer", "resolution=merge-duplicates,return=minimal")
                .json(&[note]),
        );
        Self::ensure_success(request.send().await?).await?;
        Ok(())
    }

    async fn delete_by_id(&self, id: NoteId, identity: &str) -> RemoteResult<()> {
        let identity = require_identity(identity)?;

        tracing::debug!("Deleting remote note {id}");
        let request = self.authorized(self.client.delete(self.table_url()).query(&[
            ("app_id", format!("eq.{id}")),
            ("user_id", format!("eq.{identity}")),
        ]));
        Self::ensure_success(request.send().await?).await?;
        Ok(())
    }

    async fn get_all_by_identity(&self, identity: &str) -> RemoteResult<Vec<RemoteNote>> {
        let identity = require_identity(identity)?;

        let request = self.authorized(self.client.get(self.table_url()).query(&[
            ("user_id", format!("eq.{identity}")),
            ("select", "*".to_string()),
        ]));
        let response = Self::ensure_success(request.send().await?).await?;
        let notes = response.json::<Vec<RemoteNote>>().await?;
        tracing::debug!("Fetched {} remote notes", notes.len());
        Ok(notes)
    }
}

/// Normalize a project URL to its `/rest/v1` base
pub fn normalize_rest_url(url: &str) -> RemoteResult<String> {
    let trimmed = url.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(RemoteError::InvalidConfiguration(
            "Supabase URL must not be empty".to_string(),
        ));
    }
    if !is_http_url(trimmed) {
        return Err(RemoteError::InvalidConfiguration(
            "Supabase URL must include http:// or https://".to_string(),
        ));
    }
    if trimmed.ends_with("/rest/v1") {
        Ok(trimmed.to_string())
    } else {
        Ok(format!("{trimmed}/rest/v1"))
    }
}

#[derive(Debug, Deserialize)]
struct PostgrestErrorResponse {
    message: Option<String>,
    error: Option<String>,
    details: Option<String>,
    hint: Option<String>,
}

fn parse_api_error(status: StatusCode, body: &str) -> String {
    if let Ok(payload) = serde_json::from_str::<PostgrestErrorResponse>(body) {
        if let Some(message) = payload
            .message
            .or(payload.error)
            .or(payload.details)
            .or(payload.hint)
        {
            return format!("{} ({})", message.trim(), status.as_u16());
        }
    }

    let trimmed = compact_text(body);
    if trimmed.is_empty() {
        format!("HTTP {}", status.as_u16())
    } else {
        format!("{} ({})", trimmed, status.as_u16())
    }
}
