//! Thin asynchronous client for the parcel backend.
//!
//! - Typed accessors for creating, listing, reading and deleting parcels.
//! - Keeps each customer's parcel list in memory for a short TTL and serves the
//!   last known list when a refresh fails.

use std::{
    collections::HashMap,
    sync::Arc,
    time::{Duration, SystemTime},
};

use reqwest::{Client, RequestBuilder, Response, StatusCode, Url};
use serde::{de::DeserializeOwned, Deserialize};
use thiserror::Error;
use tokio::sync::Mutex;

use crate::domain::{sort_newest_first, ClientSettings, NewParcel, Parcel};

const DEFAULT_TTL: Duration = Duration::from_secs(5 * 60);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);
const USER_AGENT: &str = concat!("parcel-desk/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Error)]
pub enum ApiClientError {
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("http request error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("backend answered {status}: {message}")]
    Status { status: StatusCode, message: String },
    #[error("parcel {0} was not found")]
    NotFound(String),
    #[error("api error: {0}")]
    Api(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CacheStatus {
    Fresh,
    Cached,
    Stale,
}

#[derive(Clone, Debug)]
pub struct CachedPayload<T> {
    pub data: T,
    pub fetched_at: SystemTime,
    pub status: CacheStatus,
}

impl<T> CachedPayload<T> {
    fn new(data: T, fetched_at: SystemTime, status: CacheStatus) -> Self {
        Self {
            data,
            fetched_at,
            status,
        }
    }
}

#[derive(Default)]
struct ParcelCache {
    by_email: HashMap<String, Cached<Vec<Parcel>>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InsertResponse {
    inserted_id: Option<String>,
    #[serde(default)]
    acknowledged: Option<bool>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DeleteResponse {
    #[serde(default)]
    deleted_count: u64,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
    error: Option<String>,
}

#[derive(Clone)]
pub struct ParcelApiClient {
    http: Client,
    base_url: Url,
    access_token: Option<String>,
    cache: Arc<Mutex<ParcelCache>>,
    ttl: Duration,
}

impl ParcelApiClient {
    pub fn new(settings: &ClientSettings) -> Result<Self, ApiClientError> {
        let mut client = Self::with_base_url(&settings.api_base_url)?;
        client.access_token = settings
            .access_token
            .clone()
            .filter(|token| !token.trim().is_empty());
        Ok(client)
    }

    pub fn with_base_url(base: &str) -> Result<Self, ApiClientError> {
        let base_url = Url::parse(base)?;
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            http,
            base_url,
            access_token: None,
            cache: Arc::new(Mutex::new(ParcelCache::default())),
            ttl: DEFAULT_TTL,
        })
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Submits a booked parcel and returns the id the backend assigned.
    pub async fn create_parcel(&self, parcel: &NewParcel) -> Result<String, ApiClientError> {
        let url = self.url("parcels")?;
        tracing::info!(
            tracking_id = %parcel.tracking_id,
            total_price = parcel.total_price,
            "submitting parcel"
        );

        let response: InsertResponse = self
            .fetch_json(self.http.post(url).json(parcel))
            .await?;
        if response.acknowledged == Some(false) {
            return Err(ApiClientError::Api("backend did not acknowledge the parcel".into()));
        }
        let id = response
            .inserted_id
            .ok_or_else(|| ApiClientError::Api("response missing insertedId".into()))?;

        self.invalidate(&parcel.created_by).await;
        tracing::info!(parcel_id = %id, "parcel created");
        Ok(id)
    }

    pub async fn list_parcels(
        &self,
        email: &str,
    ) -> Result<CachedPayload<Vec<Parcel>>, ApiClientError> {
        if let Some(payload) = self.cached_parcels(email).await {
            return Ok(payload);
        }

        let mut url = self.url("parcels")?;
        url.query_pairs_mut().append_pair("email", email);
        tracing::debug!(%url, "requesting parcels");

        match self.fetch_json::<Vec<Parcel>>(self.http.get(url)).await {
            Ok(mut parcels) => {
                sort_newest_first(&mut parcels);
                tracing::debug!(count = parcels.len(), "fetched parcels");
                Ok(self.store_parcels(email, parcels).await)
            }
            Err(error) => {
                if let Some(stale) = self.cached_parcels_stale(email).await {
                    tracing::warn!(%error, "parcel refresh failed; serving last known list");
                    return Ok(stale);
                }
                Err(error)
            }
        }
    }

    pub async fn get_parcel(&self, id: &str) -> Result<Parcel, ApiClientError> {
        let url = self.parcel_url(id)?;
        match self.fetch_json::<Parcel>(self.http.get(url)).await {
            Err(ApiClientError::Status { status, .. }) if status == StatusCode::NOT_FOUND => {
                Err(ApiClientError::NotFound(id.to_string()))
            }
            other => other,
        }
    }

    /// Deletes a parcel owned by `email` and drops that customer's cached list.
    pub async fn delete_parcel(&self, id: &str, email: &str) -> Result<(), ApiClientError> {
        let url = self.parcel_url(id)?;
        let result = self
            .fetch_json::<DeleteResponse>(self.http.delete(url))
            .await;
        let response = match result {
            Err(ApiClientError::Status { status, .. }) if status == StatusCode::NOT_FOUND => {
                return Err(ApiClientError::NotFound(id.to_string()));
            }
            other => other?,
        };
        if response.deleted_count == 0 {
            return Err(ApiClientError::NotFound(id.to_string()));
        }

        self.invalidate(email).await;
        tracing::info!(parcel_id = %id, "parcel deleted");
        Ok(())
    }

    pub async fn clear_cache(&self) {
        self.cache.lock().await.by_email.clear();
    }

    async fn invalidate(&self, email: &str) {
        self.cache.lock().await.by_email.remove(email);
    }

    async fn cached_parcels(&self, email: &str) -> Option<CachedPayload<Vec<Parcel>>> {
        let cache = self.cache.lock().await;
        let result = cache
            .by_email
            .get(email)
            .and_then(|entry| entry.if_fresh(self.ttl));
        if result.is_some() {
            tracing::debug!("serving cached parcels");
        }
        result
    }

    async fn cached_parcels_stale(&self, email: &str) -> Option<CachedPayload<Vec<Parcel>>> {
        let cache = self.cache.lock().await;
        cache.by_email.get(email).map(Cached::stale)
    }

    async fn store_parcels(&self, email: &str, data: Vec<Parcel>) -> CachedPayload<Vec<Parcel>> {
        let fetched_at = SystemTime::now();
        let payload = CachedPayload::new(data.clone(), fetched_at, CacheStatus::Fresh);
        let mut cache = self.cache.lock().await;
        cache
            .by_email
            .insert(email.to_string(), Cached::new(data, fetched_at));
        payload
    }

    async fn fetch_json<T>(&self, builder: RequestBuilder) -> Result<T, ApiClientError>
    where
        T: DeserializeOwned,
    {
        let builder = match &self.access_token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        };
        let response = builder.send().await?;
        let response = check_status(response).await?;
        Ok(response.json::<T>().await?)
    }

    fn url(&self, path: &str) -> Result<Url, url::ParseError> {
        self.base_url.join(path)
    }

    /// `parcels/<id>` with the id kept as one percent-encoded segment.
    fn parcel_url(&self, id: &str) -> Result<Url, ApiClientError> {
        let mut url = self.url("parcels/")?;
        url.path_segments_mut()
            .map_err(|_| ApiClientError::Api(format!("{} cannot hold a path", self.base_url)))?
            .pop_if_empty()
            .push(id);
        Ok(url)
    }
}

async fn check_status(response: Response) -> Result<Response, ApiClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&body)
        .ok()
        .and_then(|parsed| parsed.message.or(parsed.error))
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("unexpected response")
                .to_string()
        });
    tracing::warn!(%status, %message, "backend rejected request");
    Err(ApiClientError::Status { status, message })
}

struct Cached<T> {
    value: T,
    fetched_at: SystemTime,
}

impl<T: Clone> Cached<T> {
    fn new(value: T, fetched_at: SystemTime) -> Self {
        Self { value, fetched_at }
    }

    fn if_fresh(&self, ttl: Duration) -> Option<CachedPayload<T>> {
        if self
            .fetched_at
            .elapsed()
            .map(|elapsed| elapsed <= ttl)
            .unwrap_or(false)
        {
            Some(CachedPayload::new(
                self.value.clone(),
                self.fetched_at,
                CacheStatus::Cached,
            ))
        } else {
            None
        }
    }

    fn stale(&self) -> CachedPayload<T> {
        CachedPayload::new(self.value.clone(), self.fetched_at, CacheStatus::Stale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DeliveryStatus, ParcelType, PaymentStatus};
    use httpmock::prelude::*;
    use serde_json::json;

    fn client_for(server: &MockServer) -> ParcelApiClient {
        ParcelApiClient::with_base_url(&format!("{}/", server.base_url())).expect("client builds")
    }

    fn sample_parcel() -> NewParcel {
        NewParcel {
            title: "Books".to_string(),
            parcel_type: ParcelType::NotDocument,
            parcel_weight: Some(5.0),
            sender_name: "Rahim".to_string(),
            sender_contact: "01700000000".to_string(),
            sender_region: "Dhaka".to_string(),
            sender_district: "Dhaka".to_string(),
            pickup_address: "Road 2".to_string(),
            pickup_instruction: String::new(),
            receiver_name: "Karim".to_string(),
            receiver_contact: "01800000000".to_string(),
            receiver_region: "Chattogram".to_string(),
            receiver_district: "Feni".to_string(),
            delivery_address: "Road 9".to_string(),
            delivery_instruction: "Call first".to_string(),
            created_by: "customer@example.com".to_string(),
            total_price: 270,
            payment_status: PaymentStatus::Unpaid,
            delivery_status: DeliveryStatus::NotCollected,
            tracking_id: "PCL-20250610-0A1B2C3D".to_string(),
            creation_date: "2025-06-10T08:15:00Z".to_string(),
        }
    }

    #[tokio::test]
    async fn create_parcel_posts_payload_with_token() {
        let server = MockServer::start_async().await;
        let parcel = sample_parcel();
        let mock = server
            .mock_async(|when, then| {
                when.method(Method::POST)
                    .path("/parcels")
                    .header("authorization", "Bearer secret")
                    .json_body(serde_json::to_value(&parcel).expect("serializes"));
                then.status(200)
                    .json_body(json!({"acknowledged": true, "insertedId": "abc123"}));
            })
            .await;

        let settings = ClientSettings {
            api_base_url: format!("{}/", server.base_url()),
            user_email: "customer@example.com".to_string(),
            access_token: Some("secret".to_string()),
        };
        let client = ParcelApiClient::new(&settings).expect("client builds");

        let id = client.create_parcel(&parcel).await.expect("created");
        assert_eq!(id, "abc123");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn create_parcel_requires_inserted_id() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(Method::POST).path("/parcels");
                then.status(201).json_body(json!({"acknowledged": true}));
            })
            .await;

        let result = client_for(&server).create_parcel(&sample_parcel()).await;
        assert!(matches!(result, Err(ApiClientError::Api(_))));
    }

    #[tokio::test]
    async fn list_parcels_sorts_and_caches() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(Method::GET)
                    .path("/parcels")
                    .query_param("email", "customer@example.com");
                then.status(200).json_body(json!([
                    {"_id": "old", "title": "A", "creationDate": "2025-01-01T00:00:00Z"},
                    {"_id": "new", "title": "B", "creationDate": "2025-02-01T00:00:00Z"}
                ]));
            })
            .await;

        let client = client_for(&server);
        let first = client
            .list_parcels("customer@example.com")
            .await
            .expect("listed");
        assert_eq!(first.status, CacheStatus::Fresh);
        let ids: Vec<_> = first.data.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["new", "old"]);

        let second = client
            .list_parcels("customer@example.com")
            .await
            .expect("listed");
        assert_eq!(second.status, CacheStatus::Cached);
        mock.assert_hits_async(1).await;
    }

    #[tokio::test]
    async fn failed_refresh_serves_stale_list() {
        let server = MockServer::start_async().await;
        let mut ok = server
            .mock_async(|when, then| {
                when.method(Method::GET).path("/parcels");
                then.status(200).json_body(json!([{"_id": "p1"}]));
            })
            .await;

        let client = client_for(&server).with_ttl(Duration::ZERO);
        client
            .list_parcels("customer@example.com")
            .await
            .expect("listed");

        ok.delete_async().await;
        server
            .mock_async(|when, then| {
                when.method(Method::GET).path("/parcels");
                then.status(503).json_body(json!({"message": "maintenance"}));
            })
            .await;

        let stale = client
            .list_parcels("customer@example.com")
            .await
            .expect("stale fallback");
        assert_eq!(stale.status, CacheStatus::Stale);
        assert_eq!(stale.data.len(), 1);

        let other = client.list_parcels("someone@example.com").await;
        match other {
            Err(ApiClientError::Status { status, message }) => {
                assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
                assert_eq!(message, "maintenance");
            }
            other => panic!("expected status error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn get_parcel_maps_missing_record() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(Method::GET).path("/parcels/missing");
                then.status(404).body("not here");
            })
            .await;

        let result = client_for(&server).get_parcel("missing").await;
        assert!(matches!(result, Err(ApiClientError::NotFound(id)) if id == "missing"));
    }

    #[tokio::test]
    async fn delete_parcel_invalidates_cached_list() {
        let server = MockServer::start_async().await;
        let list = server
            .mock_async(|when, then| {
                when.method(Method::GET).path("/parcels");
                then.status(200).json_body(json!([{"_id": "p1"}]));
            })
            .await;
        let delete = server
            .mock_async(|when, then| {
                when.method(Method::DELETE).path("/parcels/p1");
                then.status(200).json_body(json!({"deletedCount": 1}));
            })
            .await;

        let client = client_for(&server);
        client.list_parcels("customer@example.com").await.expect("listed");
        client
            .delete_parcel("p1", "customer@example.com")
            .await
            .expect("deleted");
        client.list_parcels("customer@example.com").await.expect("listed");

        delete.assert_async().await;
        list.assert_hits_async(2).await;
    }

    #[tokio::test]
    async fn delete_parcel_reports_zero_deletions_as_not_found() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(Method::DELETE).path("/parcels/gone");
                then.status(200).json_body(json!({"deletedCount": 0}));
            })
            .await;

        let result = client_for(&server)
            .delete_parcel("gone", "customer@example.com")
            .await;
        assert!(matches!(result, Err(ApiClientError::NotFound(_))));
    }

    #[rstest::rstest]
    #[case("66f0c0ffee", "http://h/api/parcels/66f0c0ffee")]
    #[case("a?x=1", "http://h/api/parcels/a%3Fx=1")]
    #[case("../admin", "http://h/api/parcels/..%2Fadmin")]
    #[case("a/b#c", "http://h/api/parcels/a%2Fb%23c")]
    fn parcel_ids_stay_inside_one_path_segment(#[case] id: &str, #[case] expected: &str) {
        let client = ParcelApiClient::with_base_url("http://h/api/").expect("client builds");
        let url = client.parcel_url(id).expect("url builds");
        assert_eq!(url.as_str(), expected);
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        assert!(matches!(
            ParcelApiClient::with_base_url("not a url"),
            Err(ApiClientError::InvalidUrl(_))
        ));
    }
}
