use std::{
    future::Future,
    pin::Pin,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;

use crate::service::{
    error::ServiceError,
    ports::FeedServicePort,
    types::{
        Article, ArticleDraft, FeedItem, FeedQuery, InteractionEvent, Preferences, Session, UserId,
    },
};

pub type HookFuture<Out> = Pin<Box<dyn Future<Output = Result<Out, ServiceError>> + Send>>;
pub type Hook<In, Out> = Arc<dyn Fn(In) -> HookFuture<Out> + Send + Sync>;

pub fn boxed<Out, F>(future: F) -> HookFuture<Out>
where
    F: Future<Output = Result<Out, ServiceError>> + Send + 'static,
{
    Box::pin(future)
}

/// Everything the fake was asked to do, in call order.
#[derive(Debug, Clone, PartialEq)]
pub enum ServiceCall {
    CreateAnonymousSession,
    LoadPreferences { user_id: UserId },
    SavePreferences { user_id: UserId, preferences: Preferences },
    FetchFeed { query: FeedQuery },
    RecordInteraction { user_id: UserId, event: InteractionEvent },
    PublishArticle { user_id: UserId, draft: ArticleDraft },
}

impl ServiceCall {
    pub fn name(&self) -> &'static str {
        match self {
            ServiceCall::CreateAnonymousSession => "create_anonymous_session",
            ServiceCall::LoadPreferences { .. } => "load_preferences",
            ServiceCall::SavePreferences { .. } => "save_preferences",
            ServiceCall::FetchFeed { .. } => "fetch_feed",
            ServiceCall::RecordInteraction { .. } => "record_interaction",
            ServiceCall::PublishArticle { .. } => "publish_article",
        }
    }
}

/// Scripted in-memory stand-in for the feed service. Defaults answer every
/// operation benignly; tests override the operations they care about.
pub struct ScriptedFeedService {
    calls: Arc<Mutex<Vec<ServiceCall>>>,
    on_create_session: Hook<(), Session>,
    on_load_preferences: Hook<UserId, Preferences>,
    on_save_preferences: Hook<(UserId, Preferences), ()>,
    on_fetch_feed: Hook<FeedQuery, Vec<FeedItem>>,
    on_record_interaction: Hook<(UserId, InteractionEvent), ()>,
    on_publish_article: Hook<(UserId, ArticleDraft), Article>,
}

impl ScriptedFeedService {
    pub fn new() -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            on_create_session: Arc::new(|_: ()| {
                boxed(async {
                    Ok(Session {
                        user_id: "user-test".to_string(),
                    })
                })
            }),
            on_load_preferences: Arc::new(|_: UserId| boxed(async { Ok(Preferences::default()) })),
            on_save_preferences: Arc::new(|_: (UserId, Preferences)| boxed(async { Ok(()) })),
            on_fetch_feed: Arc::new(|_: FeedQuery| boxed(async { Ok(Vec::new()) })),
            on_record_interaction: Arc::new(|_: (UserId, InteractionEvent)| boxed(async { Ok(()) })),
            on_publish_article: Arc::new(|(_, draft): (UserId, ArticleDraft)| {
                boxed(async move {
                    Ok(Article {
                        id: "article-test".to_string(),
                        title: draft.title,
                        content: draft.content,
                        language: draft.language,
                        region: draft.region,
                        categories: draft.categories,
                    })
                })
            }),
        }
    }

    pub fn with_create_session(mut self, hook: Hook<(), Session>) -> Self {
        self.on_create_session = hook;
        self
    }

    pub fn with_load_preferences(mut self, hook: Hook<UserId, Preferences>) -> Self {
        self.on_load_preferences = hook;
        self
    }

    pub fn with_save_preferences(mut self, hook: Hook<(UserId, Preferences), ()>) -> Self {
        self.on_save_preferences = hook;
        self
    }

    pub fn with_fetch_feed(mut self, hook: Hook<FeedQuery, Vec<FeedItem>>) -> Self {
        self.on_fetch_feed = hook;
        self
    }

    pub fn with_record_interaction(mut self, hook: Hook<(UserId, InteractionEvent), ()>) -> Self {
        self.on_record_interaction = hook;
        self
    }

    pub fn with_publish_article(mut self, hook: Hook<(UserId, ArticleDraft), Article>) -> Self {
        self.on_publish_article = hook;
        self
    }

    pub fn calls(&self) -> Vec<ServiceCall> {
        self.calls.lock().expect("call journal lock").clone()
    }

    pub fn call_names(&self) -> Vec<&'static str> {
        self.calls().iter().map(ServiceCall::name).collect()
    }

    fn record(&self, call: ServiceCall) {
        self.calls.lock().expect("call journal lock").push(call);
    }
}

impl Default for ScriptedFeedService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FeedServicePort for ScriptedFeedService {
    async fn create_anonymous_session(&self) -> Result<Session, ServiceError> {
        self.record(ServiceCall::CreateAnonymousSession);
        (self.on_create_session)(()).await
    }

    async fn load_preferences(&self, user_id: &str) -> Result<Preferences, ServiceError> {
        self.record(ServiceCall::LoadPreferences {
            user_id: user_id.to_string(),
        });
        (self.on_load_preferences)(user_id.to_string()).await
    }

    async fn save_preferences(
        &self,
        user_id: &str,
        preferences: &Preferences,
    ) -> Result<(), ServiceError> {
        self.record(ServiceCall::SavePreferences {
            user_id: user_id.to_string(),
            preferences: preferences.clone(),
        });
        (self.on_save_preferences)((user_id.to_string(), preferences.clone())).await
    }

    async fn fetch_feed(&self, query: &FeedQuery) -> Result<Vec<FeedItem>, ServiceError> {
        self.record(ServiceCall::FetchFeed {
            query: query.clone(),
        });
        (self.on_fetch_feed)(query.clone()).await
    }

    async fn record_interaction(
        &self,
        user_id: &str,
        event: &InteractionEvent,
    ) -> Result<(), ServiceError> {
        self.record(ServiceCall::RecordInteraction {
            user_id: user_id.to_string(),
            event: event.clone(),
        });
        (self.on_record_interaction)((user_id.to_string(), event.clone())).await
    }

    async fn publish_article(
        &self,
        user_id: &str,
        draft: &ArticleDraft,
    ) -> Result<Article, ServiceError> {
        self.record(ServiceCall::PublishArticle {
            user_id: user_id.to_string(),
            draft: draft.clone(),
        });
        (self.on_publish_article)((user_id.to_string(), draft.clone())).await
    }
}
