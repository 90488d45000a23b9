//! HTTP client for the hosted document store.

use async_trait::async_trait;
use reqwest::{RequestBuilder, Response, StatusCode};
use serde_json::Value;

use super::{DocumentStore, StoreError, StoreResult};
use crate::util::{compact_text, is_http_url};

/// Document store client speaking the backend's REST surface
/// (`/data/v1`).
///
/// Collections map to URL segments and equality filters to
/// `?field=eq.value` query strings. Every request carries the project
/// API key plus the calling user's access token.
#[derive(Debug, Clone)]
pub struct RestDocumentStore {
    data_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl RestDocumentStore {
    /// Creates a client for the data surface of `backend_url`.
    pub fn new(backend_url: &str, api_key: &str) -> StoreResult<Self> {
        let data_url = normalize_data_url(backend_url)?;
        let api_key = api_key.trim();
        if api_key.is_empty() {
            return Err(StoreError::InvalidConfiguration(
                "API key is empty".to_string(),
            ));
        }
        Ok(Self {
            data_url,
            api_key: api_key.to_string(),
            client: reqwest::Client::new(),
        })
    }

    fn collection_url(&self, collection: &str) -> String {
        format!("{}/{collection}", self.data_url)
    }

    fn filtered_url(&self, collection: &str, field: &str, value: &str) -> String {
        format!(
            "{}/{collection}?{}",
            self.data_url,
            eq_filter(field, value)
        )
    }

    fn request(&self, builder: RequestBuilder, token: &str) -> RequestBuilder {
        builder.header("apikey", &self.api_key).bearer_auth(token)
    }

    async fn check(response: Response) -> StoreResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await?;
        Err(StoreError::Api(format_api_error(status, &body)))
    }
}

#[async_trait]
impl DocumentStore for RestDocumentStore {
    async fn create(&self, collection: &str, record: Value, token: &str) -> StoreResult<String> {
        let url = self.collection_url(collection);
        tracing::debug!("POST {url}");
        let response = self
            .request(self.client.post(url), token)
            .header("Prefer", "return=representation")
            .json(&record)
            .send()
            .await?;
        let body: Value = Self::check(response).await?.json().await?;
        extract_created_id(&body).ok_or_else(|| {
            StoreError::Api("create response did not include an id".to_string())
        })
    }

    async fn set(
        &self,
        collection: &str,
        id: &str,
        record: Value,
        token: &str,
    ) -> StoreResult<()> {
        let url = self.filtered_url(collection, "id", id);
        tracing::debug!("PUT {url}");
        let response = self
            .request(self.client.put(url), token)
            .json(&record)
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    async fn get(&self, collection: &str, id: &str, token: &str) -> StoreResult<Option<Value>> {
        let mut records = self.query_eq(collection, "id", id, token).await?;
        if records.is_empty() {
            Ok(None)
        } else {
            Ok(Some(records.swap_remove(0)))
        }
    }

    async fn delete(&self, collection: &str, id: &str, token: &str) -> StoreResult<()> {
        let url = self.filtered_url(collection, "id", id);
        tracing::debug!("DELETE {url}");
        let response = self.request(self.client.delete(url), token).send().await?;
        Self::check(response).await?;
        Ok(())
    }

    async fn query_eq(
        &self,
        collection: &str,
        field: &str,
        value: &str,
        token: &str,
    ) -> StoreResult<Vec<Value>> {
        let url = self.filtered_url(collection, field, value);
        tracing::debug!("GET {url}");
        let response = self.request(self.client.get(url), token).send().await?;
        let records: Vec<Value> = Self::check(response).await?.json().await?;
        Ok(records)
    }
}

/// Normalizes a backend URL into its data endpoint base.
fn normalize_data_url(raw: &str) -> StoreResult<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(StoreError::InvalidConfiguration(
            "Backend URL is empty".to_string(),
        ));
    }
    if !is_http_url(trimmed) {
        return Err(StoreError::InvalidConfiguration(
            "Backend URL must start with http:// or https://".to_string(),
        ));
    }
    if trimmed.ends_with("/data/v1") {
        Ok(trimmed.to_string())
    } else {
        Ok(format!("{trimmed}/data/v1"))
    }
}

fn eq_filter(field: &str, value: &str) -> String {
    format!("{field}=eq.{}", urlencoding::encode(value))
}

/// Pulls the assigned id out of a `return=representation` response,
/// which is an array for bulk-capable endpoints and a bare object
/// otherwise.
fn extract_created_id(body: &Value) -> Option<String> {
    let record = match body {
        Value::Array(items) => items.first()?,
        other => other,
    };
    match record.get("id")? {
        Value::String(id) => Some(id.clone()),
        Value::Number(id) => Some(id.to_string()),
        _ => None,
    }
}

fn format_api_error(status: StatusCode, body: &str) -> String {
    #[derive(serde::Deserialize, Default)]
    struct ApiErrorPayload {
        message: Option<String>,
        error: Option<String>,
        msg: Option<String>,
    }

    let payload: ApiErrorPayload = serde_json::from_str(body).unwrap_or_default();
    let message = payload
        .message
        .or(payload.error)
        .or(payload.msg)
        .map(|message| compact_text(&message))
        .filter(|message| !message.is_empty());
    match message {
        Some(message) => format!("{message} ({})", status.as_u16()),
        None => format!("HTTP {}", status.as_u16()),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn normalize_data_url_appends_data_path() {
        assert_eq!(
            normalize_data_url("https://backend.example.com").unwrap(),
            "https://backend.example.com/data/v1"
        );
        assert_eq!(
            normalize_data_url("https://backend.example.com/data/v1/").unwrap(),
            "https://backend.example.com/data/v1"
        );
    }

    #[test]
    fn normalize_data_url_rejects_bad_input() {
        assert!(matches!(
            normalize_data_url(""),
            Err(StoreError::InvalidConfiguration(_))
        ));
        assert!(matches!(
            normalize_data_url("backend.example.com"),
            Err(StoreError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn eq_filter_encodes_values() {
        assert_eq!(eq_filter("id", "abc-123"), "id=eq.abc-123");
        assert_eq!(eq_filter("user_id", "a b&c"), "user_id=eq.a%20b%26c");
    }

    #[test]
    fn created_id_is_read_from_array_or_object() {
        assert_eq!(
            extract_created_id(&json!([{ "id": "p-1", "title": "T" }])),
            Some("p-1".to_string())
        );
        assert_eq!(
            extract_created_id(&json!({ "id": "p-2" })),
            Some("p-2".to_string())
        );
        assert_eq!(
            extract_created_id(&json!({ "id": 42 })),
            Some("42".to_string())
        );
        assert_eq!(extract_created_id(&json!([])), None);
        assert_eq!(extract_created_id(&json!({ "title": "T" })), None);
    }

    #[test]
    fn api_errors_keep_message_and_status() {
        let formatted = format_api_error(
            StatusCode::NOT_FOUND,
            r#"{ "message": "relation \"posts\" does not exist" }"#,
        );
        assert_eq!(formatted, "relation \"posts\" does not exist (404)");

        let fallback = format_api_error(StatusCode::BAD_GATEWAY, "not json");
        assert_eq!(fallback, "HTTP 502");
    }

    #[test]
    fn client_rejects_empty_api_key() {
        let result = RestDocumentStore::new("https://backend.example.com", "");
        assert!(matches!(
            result,
            Err(StoreError::InvalidConfiguration(_))
        ));
    }
}
