use async_trait::async_trait;

use crate::service::{
    error::ServiceError,
    types::{Article, ArticleDraft, FeedItem, FeedQuery, InteractionEvent, Preferences, Session},
};

/// Network seam to the feed service. The production implementation speaks
/// HTTP (`HttpFeedService`); tests substitute scripted implementations.
#[async_trait]
pub trait FeedServicePort: Send + Sync {
    async fn create_anonymous_session(&self) -> Result<Session, ServiceError>;

    async fn load_preferences(&self, user_id: &str) -> Result<Preferences, ServiceError>;

    async fn save_preferences(
        &self,
        user_id: &str,
        preferences: &Preferences,
    ) -> Result<(), ServiceError>;

    async fn fetch_feed(&self, query: &FeedQuery) -> Result<Vec<FeedItem>, ServiceError>;

    async fn record_interaction(
        &self,
        user_id: &str,
        event: &InteractionEvent,
    ) -> Result<(), ServiceError>;

    async fn publish_article(
        &self,
        user_id: &str,
        draft: &ArticleDraft,
    ) -> Result<Article, ServiceError>;
}
