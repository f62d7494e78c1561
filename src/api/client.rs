//
//  datamall
//  api/client.rs
//
//  Copyright (c) 2026 The datamall developers. All rights reserved.
//

//! # HTTP Client for the DataMall API
//!
//! This module provides the transport pipeline shared by every endpoint
//! façade. It issues authenticated GET requests, classifies responses,
//! retries classified server faults, paginates by `$skip`, caches page
//! bodies and sanitises the aggregated payload.
//!
//! ## Pipeline
//!
//! One call to [`DataMallClient::send_request`] runs:
//!
//! 1. ensure the `$skip` cursor defaults to 0
//! 2. GET one page (served from cache when fresh), with bounded retry on
//!    fault-classified failures
//! 3. classify the response: fault envelope, bare HTTP error, or payload
//! 4. extract the payload from the `value` envelope when present
//! 5. fold full pages (exactly 500 records) into one list, advancing
//!    `$skip` and pausing briefly every 1000 records
//! 6. strip the undocumented `odata.metadata` key and sanitise the result
//!
//! ## Example
//!
//! ```rust,no_run
//! use datamall::api::{DataMallClient, WireParams};
//!
//! let client = DataMallClient::new("your-account-key")?;
//! let stops = client.send_request(
//!     &client.endpoint_url("/BusStops"),
//!     WireParams::new(),
//!     0,
//!     &[],
//! )?;
//! # Ok::<(), datamall::api::ApiError>(())
//! ```

use std::thread;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::{json, Map as JsonMap, Value as JsonValue};
use tracing::{debug, trace, warn};

use crate::api::cache::ResponseCache;
use crate::api::params::WireParams;
use crate::api::sanitise::{sanitise, Value};
use crate::api::ApiError;
use crate::constants::{
    BASE_API_ENDPOINT, CACHE_MAXSIZE, MAX_ATTEMPTS, PAGE_SIZE, RETRY_BASE_DELAY_MS,
    THROTTLE_EVERY_RECORDS, THROTTLE_SECONDS, USER_AGENT,
};

/// The structured fault body some HTTP 500 responses carry.
///
/// `{"fault": {"faultstring": "...", "detail": {"key": "value", ...}}}`
#[derive(Debug, Deserialize)]
struct FaultEnvelope {
    fault: Fault,
}

#[derive(Debug, Deserialize)]
struct Fault {
    faultstring: String,
    #[serde(default)]
    detail: JsonMap<String, JsonValue>,
}

/// The main HTTP client for the DataMall API.
///
/// `DataMallClient` owns the blocking HTTP session (with the `AccountKey`
/// and `Accept` headers applied to every request), the response cache, and
/// the base endpoint URL. Endpoint façades hold one of these by composition
/// and drive it through [`send_request`](Self::send_request) and
/// [`send_download_request`](Self::send_download_request).
///
/// # Creating a client
///
/// ```rust,no_run
/// use datamall::api::DataMallClient;
///
/// let client = DataMallClient::new("your-account-key")?;
/// # Ok::<(), datamall::api::ApiError>(())
/// ```
///
/// # Concurrency
///
/// Each call is synchronous and blocking; pagination is strictly
/// sequential. The client is cheap to clone: clones share the HTTP
/// connection pool and the response cache, and the cache serializes its
/// own access, so independent top-level requests may run from multiple
/// threads.
#[derive(Debug, Clone)]
pub struct DataMallClient {
    /// The underlying blocking HTTP client.
    http: Client,
    /// Root URL that endpoint paths are appended to.
    base_url: String,
    /// Shared TTL cache of page bodies.
    cache: ResponseCache,
}

impl DataMallClient {
    /// Creates a client authenticated with the given DataMall account key.
    ///
    /// Request one from
    /// <https://datamall.lta.gov.sg/content/datamall/en/request-for-api.html>.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Validation`] if the key cannot be used as a
    /// header value, or [`ApiError::Network`] if the HTTP client cannot be
    /// constructed.
    pub fn new(account_key: &str) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        let key = HeaderValue::from_str(account_key)
            .map_err(|_| ApiError::Validation("account key is not a valid header value".into()))?;
        headers.insert("AccountKey", key);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            http,
            base_url: BASE_API_ENDPOINT.to_string(),
            cache: ResponseCache::new(CACHE_MAXSIZE),
        })
    }

    /// Replaces the base endpoint URL.
    ///
    /// Intended for tests and for pointing the client at a stub or proxy;
    /// production use keeps the default DataMall root.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// The root URL that endpoint paths are appended to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The shared response cache.
    ///
    /// Clones of this client (and façades built over them) share one cache;
    /// [`len`](ResponseCache::len) and
    /// [`is_empty`](ResponseCache::is_empty) report its live entry count.
    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }

    /// Builds the absolute URL for an endpoint path such as `"/BusStops"`.
    pub fn endpoint_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Sends a request to an endpoint and returns its sanitised payload.
    ///
    /// Drives the full pipeline: pagination, retry, caching and
    /// sanitisation. Normally called through an endpoint façade, but public
    /// so applications can reach endpoints this crate has no wrapper for
    /// yet.
    ///
    /// # Parameters
    ///
    /// * `url` - The absolute endpoint URL.
    /// * `params` - Wire parameters; names must match what the endpoint
    ///   expects (use [`build_params`](crate::api::params::build_params)).
    /// * `cache_duration` - Seconds before a cached page expires; 0 bypasses
    ///   the cache.
    /// * `sanitise_ignore_keys` - Response key paths exempted from
    ///   sanitisation.
    ///
    /// # Errors
    ///
    /// [`ApiError::Fault`] after the retry budget is exhausted,
    /// [`ApiError::Http`] for other non-success statuses, or
    /// [`ApiError::Network`] for transport failures.
    pub fn send_request(
        &self,
        url: &str,
        params: WireParams,
        cache_duration: u64,
        sanitise_ignore_keys: &[&str],
    ) -> Result<Value, ApiError> {
        let mut response_value = self.collect_response_value(url, params, cache_duration)?;

        if let JsonValue::Object(members) = &mut response_value {
            // not documented in LTA DataMall's API guide
            members.remove("odata.metadata");
        }

        Ok(sanitise(&response_value, sanitise_ignore_keys))
    }

    /// Sends a request to an endpoint that responds with a download link.
    ///
    /// Expects the payload to be a non-empty list whose first element has a
    /// non-empty `Link` string field, and returns that link.
    ///
    /// # Errors
    ///
    /// [`ApiError::MissingDownloadLink`] when the list is empty or the
    /// `Link` field is missing or blank, plus everything
    /// [`send_request`](Self::send_request) can return.
    pub fn send_download_request(
        &self,
        url: &str,
        params: WireParams,
        cache_duration: u64,
    ) -> Result<String, ApiError> {
        let download = self.send_request(url, params, cache_duration, &[])?;

        let link = download
            .as_array()
            .and_then(|items| items.first())
            .and_then(|item| item.get("Link"))
            .and_then(Value::as_str);

        match link {
            Some(link) if !link.is_empty() => Ok(link.to_string()),
            _ => Err(ApiError::MissingDownloadLink),
        }
    }

    /// Collects the response value of an endpoint across all of its pages.
    ///
    /// Folds full pages (exactly [`PAGE_SIZE`] records) into one list by
    /// advancing the `$skip` cursor; a short page (including an empty one)
    /// terminates the fold. Singleton payloads without a list envelope are
    /// returned as-is after the first request.
    fn collect_response_value(
        &self,
        url: &str,
        mut params: WireParams,
        cache_duration: u64,
    ) -> Result<JsonValue, ApiError> {
        params
            .entry("$skip".to_string())
            .or_insert_with(|| "0".to_string());

        let mut collected: Vec<JsonValue> = Vec::new();

        loop {
            let body = self.fetch_page(url, &params, cache_duration)?;

            // the real data is under "value"; singleton endpoints have no envelope
            let value = match body {
                JsonValue::Object(mut members) => match members.remove("value") {
                    Some(value) => value,
                    None => JsonValue::Object(members),
                },
                other => other,
            };

            match value {
                JsonValue::Array(items) => {
                    let full_page = items.len() == PAGE_SIZE;
                    collected.extend(items);
                    if !full_page {
                        return Ok(JsonValue::Array(collected));
                    }

                    let current_skip: usize = params
                        .get("$skip")
                        .and_then(|s| s.parse().ok())
                        .unwrap_or(0);
                    let skip = current_skip + PAGE_SIZE;
                    params.insert("$skip".to_string(), skip.to_string());
                    debug!(url, skip, "full page received, fetching next page");

                    // wait a while so as not to flood the endpoint
                    if skip % THROTTLE_EVERY_RECORDS == 0 {
                        thread::sleep(Duration::from_secs(THROTTLE_SECONDS));
                    }
                }
                other => {
                    if collected.is_empty() {
                        return Ok(other);
                    }
                    // a non-list continuation page ends the fold
                    return Ok(JsonValue::Array(collected));
                }
            }
        }
    }

    /// Fetches one page, retrying classified faults with exponential
    /// backoff up to [`MAX_ATTEMPTS`] total attempts.
    ///
    /// Plain HTTP errors and network failures are not retried.
    fn fetch_page(
        &self,
        url: &str,
        params: &WireParams,
        cache_duration: u64,
    ) -> Result<JsonValue, ApiError> {
        let mut attempt = 0u32;
        loop {
            attempt += 1;
            match self.fetch_page_once(url, params, cache_duration) {
                Err(err @ ApiError::Fault { .. }) if attempt < MAX_ATTEMPTS => {
                    let delay =
                        Duration::from_millis(RETRY_BASE_DELAY_MS * 2u64.pow(attempt - 1));
                    warn!(error = %err, attempt, delay_ms = delay.as_millis() as u64, "API fault, retrying");
                    thread::sleep(delay);
                }
                other => return other,
            }
        }
    }

    /// Issues a single GET and classifies the response.
    fn fetch_page_once(
        &self,
        url: &str,
        params: &WireParams,
        cache_duration: u64,
    ) -> Result<JsonValue, ApiError> {
        if cache_duration > 0 {
            if let Some(body) = self.cache.get(url, params) {
                trace!(url, "response cache hit");
                return Ok(body);
            }
        }

        debug!(url, "GET");
        let response = self.http.get(url).query(params).send()?;
        let status = response.status();
        let text = response.text()?;

        // a body that fails to decode is treated as empty; the status checks
        // below still apply to that empty body
        let body: JsonValue = serde_json::from_str(&text).unwrap_or_else(|_| json!({}));

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            if let Ok(envelope) = serde_json::from_value::<FaultEnvelope>(body.clone()) {
                let details = envelope
                    .fault
                    .detail
                    .iter()
                    .map(|(key, value)| match value {
                        JsonValue::String(s) => format!("{key}: {s}"),
                        other => format!("{key}: {other}"),
                    })
                    .collect();
                return Err(ApiError::Fault {
                    message: envelope.fault.faultstring,
                    details,
                });
            }
        }

        if !status.is_success() {
            return Err(ApiError::Http(status));
        }

        if cache_duration > 0 {
            self.cache.insert(url, params, body.clone(), cache_duration);
        }

        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    const TEST_ACCOUNT_KEY: &str = "test-account-key";

    /// Installs a subscriber so pipeline `debug!`/`warn!` events show up
    /// under `RUST_LOG=debug cargo test`. Later calls are no-ops.
    fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    }

    fn client_for(server: &mockito::ServerGuard) -> DataMallClient {
        init_tracing();
        DataMallClient::new(TEST_ACCOUNT_KEY)
            .unwrap()
            .with_base_url(server.url())
    }

    fn page_of(len: usize, offset: usize) -> JsonValue {
        let records: Vec<JsonValue> = (0..len)
            .map(|i| json!({"RecordId": offset + i}))
            .collect();
        json!({"value": records})
    }

    #[test]
    fn test_send_request_returns_sanitised_list() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", "/BicycleParkingv2")
            .match_header("AccountKey", TEST_ACCOUNT_KEY)
            .match_header("Accept", "application/json")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("Lat".into(), "1.364897".into()),
                Matcher::UrlEncoded("Long".into(), "103.766094".into()),
                Matcher::UrlEncoded("$skip".into(), "0".into()),
            ]))
            .with_status(200)
            .with_body(r#"{"value": [{"key_1": "value_1"}, {"key_a": "value_a"}]}"#)
            .create();

        let client = client_for(&server);
        let mut params = WireParams::new();
        params.insert("Lat".to_string(), "1.364897".to_string());
        params.insert("Long".to_string(), "103.766094".to_string());

        let result = client
            .send_request(&client.endpoint_url("/BicycleParkingv2"), params, 0, &[])
            .unwrap();

        mock.assert();
        let items = result.as_array().expect("a list payload");
        assert_eq!(items.len(), 2);
        assert_eq!(
            items[0].get("key_1"),
            Some(&Value::String("value_1".to_string()))
        );
        assert_eq!(
            items[1].get("key_a"),
            Some(&Value::String("value_a".to_string()))
        );
    }

    #[test]
    fn test_pagination_concatenates_full_pages() {
        let mut server = mockito::Server::new();
        let first = server
            .mock("GET", "/BusStops")
            .match_query(Matcher::UrlEncoded("$skip".into(), "0".into()))
            .with_status(200)
            .with_body(page_of(500, 0).to_string())
            .expect(1)
            .create();
        let second = server
            .mock("GET", "/BusStops")
            .match_query(Matcher::UrlEncoded("$skip".into(), "500".into()))
            .with_status(200)
            .with_body(page_of(500, 500).to_string())
            .expect(1)
            .create();
        let third = server
            .mock("GET", "/BusStops")
            .match_query(Matcher::UrlEncoded("$skip".into(), "1000".into()))
            .with_status(200)
            .with_body(page_of(10, 1000).to_string())
            .expect(1)
            .create();

        let client = client_for(&server);
        let result = client
            .send_request(
                &client.endpoint_url("/BusStops"),
                WireParams::new(),
                0,
                &[],
            )
            .unwrap();

        first.assert();
        second.assert();
        third.assert();
        let items = result.as_array().expect("a list payload");
        assert_eq!(items.len(), 1010);
        assert_eq!(items[0].get("RecordId"), Some(&Value::Integer(0)));
        assert_eq!(items[1009].get("RecordId"), Some(&Value::Integer(1009)));
    }

    #[test]
    fn test_singleton_payload_without_value_envelope() {
        let mut server = mockito::Server::new();
        server
            .mock("GET", "/TrainServiceAlerts")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(
                r#"{"odata.metadata": "ltaodataservice/$metadata#TrainServiceAlerts",
                    "Status": 1, "AffectedSegments": [], "Message": []}"#,
            )
            .create();

        let client = client_for(&server);
        let result = client
            .send_request(
                &client.endpoint_url("/TrainServiceAlerts"),
                WireParams::new(),
                0,
                &[],
            )
            .unwrap();

        assert_eq!(result.get("Status"), Some(&Value::Integer(1)));
        assert_eq!(result.get("odata.metadata"), None);
    }

    #[test]
    fn test_fault_response_raises_api_fault() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", "/BusStops")
            .match_query(Matcher::Any)
            .with_status(500)
            .with_body(
                r#"{"fault": {
                    "faultstring": "Rate limit quota violation. Quota limit exceeded.",
                    "detail": {"errorcode": "policies.ratelimit.QuotaViolation"}
                }}"#,
            )
            .expect(2)
            .create();

        let client = client_for(&server);
        let result = client.send_request(
            &client.endpoint_url("/BusStops"),
            WireParams::new(),
            0,
            &[],
        );

        // the fault is retried once, so exactly two attempts reach the server
        mock.assert();
        match result {
            Err(ApiError::Fault { message, details }) => {
                assert!(message.contains("Rate limit quota violation"));
                assert_eq!(
                    details,
                    vec!["errorcode: policies.ratelimit.QuotaViolation".to_string()]
                );
            }
            other => panic!("expected a fault, got {other:?}"),
        }
    }

    #[test]
    fn test_bare_server_error_is_not_classified_as_fault() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", "/BusStops")
            .match_query(Matcher::Any)
            .with_status(500)
            .with_body("Internal Server Error")
            .expect(1)
            .create();

        let client = client_for(&server);
        let result = client.send_request(
            &client.endpoint_url("/BusStops"),
            WireParams::new(),
            0,
            &[],
        );

        mock.assert();
        assert!(
            matches!(result, Err(ApiError::Http(status)) if status == StatusCode::INTERNAL_SERVER_ERROR)
        );
    }

    #[test]
    fn test_plain_http_error_is_not_retried() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", "/NoSuchEndpoint")
            .match_query(Matcher::Any)
            .with_status(404)
            .with_body(r#"{"message": "not found"}"#)
            .expect(1)
            .create();

        let client = client_for(&server);
        let result = client.send_request(
            &client.endpoint_url("/NoSuchEndpoint"),
            WireParams::new(),
            0,
            &[],
        );

        mock.assert();
        assert!(matches!(result, Err(ApiError::Http(status)) if status == StatusCode::NOT_FOUND));
    }

    #[test]
    fn test_undecodable_success_body_becomes_empty_payload() {
        let mut server = mockito::Server::new();
        server
            .mock("GET", "/BusStops")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("this is not json")
            .create();

        let client = client_for(&server);
        let result = client
            .send_request(
                &client.endpoint_url("/BusStops"),
                WireParams::new(),
                0,
                &[],
            )
            .unwrap();

        assert_eq!(result.as_object().map(|m| m.len()), Some(0));
    }

    #[test]
    fn test_cached_page_is_not_refetched() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", "/BusServices")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"value": [{"ServiceNo": "15"}]}"#)
            .expect(1)
            .create();

        let client = client_for(&server);
        let url = client.endpoint_url("/BusServices");
        assert!(client.cache().is_empty());
        let first = client
            .send_request(&url, WireParams::new(), 60, &[])
            .unwrap();
        let second = client
            .send_request(&url, WireParams::new(), 60, &[])
            .unwrap();

        mock.assert();
        assert_eq!(first, second);
        assert_eq!(client.cache().len(), 1);
    }

    #[test]
    fn test_cache_duration_zero_always_refetches() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", "/BusServices")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"value": []}"#)
            .expect(2)
            .create();

        let client = client_for(&server);
        let url = client.endpoint_url("/BusServices");
        client.send_request(&url, WireParams::new(), 0, &[]).unwrap();
        client.send_request(&url, WireParams::new(), 0, &[]).unwrap();

        mock.assert();
    }

    #[test]
    fn test_download_request_returns_link() {
        let mut server = mockito::Server::new();
        server
            .mock("GET", "/GeospatialWholeIsland")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"value": [{"Link": "https://dm-link.example/ArrowMarking.zip"}]}"#)
            .create();

        let client = client_for(&server);
        let link = client
            .send_download_request(
                &client.endpoint_url("/GeospatialWholeIsland"),
                WireParams::new(),
                0,
            )
            .unwrap();
        assert_eq!(link, "https://dm-link.example/ArrowMarking.zip");
    }

    #[test]
    fn test_download_request_with_empty_list_fails() {
        let mut server = mockito::Server::new();
        server
            .mock("GET", "/GeospatialWholeIsland")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"value": []}"#)
            .create();

        let client = client_for(&server);
        let result = client.send_download_request(
            &client.endpoint_url("/GeospatialWholeIsland"),
            WireParams::new(),
            0,
        );
        assert!(matches!(result, Err(ApiError::MissingDownloadLink)));
    }

    #[test]
    fn test_download_request_with_blank_link_fails() {
        let mut server = mockito::Server::new();
        server
            .mock("GET", "/GeospatialWholeIsland")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"value": [{"Link": ""}]}"#)
            .create();

        let client = client_for(&server);
        let result = client.send_download_request(
            &client.endpoint_url("/GeospatialWholeIsland"),
            WireParams::new(),
            0,
        );
        assert!(matches!(result, Err(ApiError::MissingDownloadLink)));
    }
}
