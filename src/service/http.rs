use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use uuid::Uuid;

use crate::service::{
    error::{ServiceError, unavailable},
    ports::FeedServicePort,
    types::{
        Article, ArticleDraft, FeedItem, FeedQuery, InteractionEvent, Preferences, ServiceConfig,
        Session,
    },
    wire,
};

const POOL_IDLE_TIMEOUT_SECS: u64 = 30;

/// HTTP adapter for the feed service. One attempt per call; callers decide
/// whether and when to try again.
pub struct HttpFeedService {
    client: Client,
    base_url: String,
}

impl HttpFeedService {
    pub fn new(config: &ServiceConfig) -> Result<Self, ServiceError> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .pool_idle_timeout(Duration::from_secs(POOL_IDLE_TIMEOUT_SECS))
            .build()
            .map_err(|err| unavailable(format!("http client failed to build: {}", err)))?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Performs the exchange and returns status plus raw body. Only transport
    /// failures error here; status interpretation stays with the caller.
    async fn exchange(
        &self,
        operation: &'static str,
        request: reqwest::RequestBuilder,
    ) -> Result<(u16, String), ServiceError> {
        let request_id = Uuid::now_v7().to_string();
        let response = request
            .header("x-request-id", &request_id)
            .send()
            .await
            .map_err(|err| wire::transport_error(operation, err))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|err| wire::transport_error(operation, err))?;
        tracing::debug!(
            target: "service",
            operation,
            request_id = %request_id,
            status,
            "service_response"
        );
        Ok((status, body))
    }

    async fn fetch_json(
        &self,
        operation: &'static str,
        request: reqwest::RequestBuilder,
    ) -> Result<Value, ServiceError> {
        let (status, body) = self.exchange(operation, request).await?;
        if !(200..300).contains(&status) {
            return Err(wire::status_error(operation, status, &body));
        }
        serde_json::from_str(&body).map_err(|err| wire::decode_error(operation, err))
    }

    /// For acknowledgement endpoints the body carries no contract; it is
    /// dropped unread on success.
    async fn fetch_ack(
        &self,
        operation: &'static str,
        request: reqwest::RequestBuilder,
    ) -> Result<(), ServiceError> {
        let (status, body) = self.exchange(operation, request).await?;
        if !(200..300).contains(&status) {
            return Err(wire::status_error(operation, status, &body));
        }
        Ok(())
    }
}

#[async_trait]
impl FeedServicePort for HttpFeedService {
    async fn create_anonymous_session(&self) -> Result<Session, ServiceError> {
        let value = self
            .fetch_json(
                "create_anonymous_session",
                self.client.post(self.url("/auth/anonymous")),
            )
            .await?;
        wire::decode_session(value)
    }

    async fn load_preferences(&self, user_id: &str) -> Result<Preferences, ServiceError> {
        const OPERATION: &str = "load_preferences";
        let request = self
            .client
            .get(self.url(&format!("/users/{}/preferences", user_id)));
        let (status, body) = self.exchange(OPERATION, request).await?;
        // 404 is "nothing stored yet", a successful load of the defaults.
        if status == 404 {
            return Ok(Preferences::default());
        }
        if !(200..300).contains(&status) {
            return Err(wire::status_error(OPERATION, status, &body));
        }
        let value =
            serde_json::from_str(&body).map_err(|err| wire::decode_error(OPERATION, err))?;
        wire::decode_preferences(value)
    }

    async fn save_preferences(
        &self,
        user_id: &str,
        preferences: &Preferences,
    ) -> Result<(), ServiceError> {
        self.fetch_ack(
            "save_preferences",
            self.client
                .post(self.url(&format!("/users/{}/preferences", user_id)))
                .json(preferences),
        )
        .await
    }

    async fn fetch_feed(&self, query: &FeedQuery) -> Result<Vec<FeedItem>, ServiceError> {
        let value = self
            .fetch_json(
                "fetch_feed",
                self.client
                    .get(self.url("/articles/feed"))
                    .query(&query.query_pairs()),
            )
            .await?;
        wire::decode_feed(value)
    }

    async fn record_interaction(
        &self,
        user_id: &str,
        event: &InteractionEvent,
    ) -> Result<(), ServiceError> {
        self.fetch_ack(
            "record_interaction",
            self.client
                .post(self.url("/interactions"))
                .query(&[("user_id", user_id)])
                .json(event),
        )
        .await
    }

    async fn publish_article(
        &self,
        user_id: &str,
        draft: &ArticleDraft,
    ) -> Result<Article, ServiceError> {
        let value = self
            .fetch_json(
                "publish_article",
                self.client
                    .post(self.url("/articles"))
                    .query(&[("user_id", user_id)])
                    .json(draft),
            )
            .await?;
        wire::decode_article(value)
    }
}
