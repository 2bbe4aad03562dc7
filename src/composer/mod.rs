use crate::service::{
    FeedServicePort, ServiceError,
    types::{Article, ArticleDraft, Session},
};

/// Stateless submission of user-authored articles. Holds no draft and no
/// result; callers own both sides of the exchange.
#[derive(Debug, Default)]
pub struct Composer;

impl Composer {
    pub fn new() -> Self {
        Self
    }

    pub async fn publish(
        &self,
        service: &dyn FeedServicePort,
        session: &Session,
        draft: ArticleDraft,
    ) -> Result<Article, ServiceError> {
        let article = service.publish_article(&session.user_id, &draft).await?;
        tracing::info!(target: "composer", article_id = %article.id, "article_published");
        Ok(article)
    }
}
