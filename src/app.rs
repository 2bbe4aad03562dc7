use std::sync::Arc;

use thiserror::Error;
use tokio::sync::mpsc;

use crate::{
    composer::Composer,
    feed::{self, FeedController, FeedView},
    preferences::{DraftEdit, PreferenceStore, PreferencesEvent},
    service::{
        FeedServicePort, ServiceError,
        types::{
            Article, ArticleDraft, ArticleId, InteractionAction, InteractionEvent, Preferences,
            Session,
        },
    },
    session::SessionManager,
};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("no active session; run `login` first")]
    SessionRequired,
    #[error(transparent)]
    Service(#[from] ServiceError),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SignInReport {
    pub session: Session,
    pub preferences_error: Option<ServiceError>,
    pub feed_error: Option<ServiceError>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SaveOutcome {
    pub refreshed: bool,
    pub refresh_error: Option<ServiceError>,
}

/// Outcome of an interaction. The two halves fail independently; neither
/// blocks the other.
#[derive(Debug, Clone, PartialEq)]
pub struct InteractionReport {
    pub interaction_error: Option<ServiceError>,
    pub refresh_error: Option<ServiceError>,
}

/// Owns the four components and the service port. Methods take `&mut self`,
/// which serializes every state transition; nothing mutates from a network
/// callback.
pub struct App {
    service: Arc<dyn FeedServicePort>,
    session: SessionManager,
    preferences: PreferenceStore,
    feed: FeedController,
    composer: Composer,
    preference_events: mpsc::UnboundedReceiver<PreferencesEvent>,
}

impl App {
    pub fn new(service: Arc<dyn FeedServicePort>) -> Self {
        let mut preferences = PreferenceStore::new();
        let preference_events = preferences.subscribe();
        Self {
            service,
            session: SessionManager::new(),
            preferences,
            feed: FeedController::new(),
            composer: Composer::new(),
            preference_events,
        }
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.current()
    }

    pub fn preferences(&self) -> &PreferenceStore {
        &self.preferences
    }

    pub fn feed_view(&self) -> FeedView {
        self.feed.view()
    }

    /// Session creation, then the initial preference load, then the first
    /// feed refresh with the post-load confirmed values. Only the session
    /// step is fatal; the other two surface their errors in the report.
    pub async fn sign_in(&mut self) -> Result<SignInReport, AppError> {
        let service = Arc::clone(&self.service);
        let session = self.session.begin_anonymous(service.as_ref()).await?;
        let preferences_error = self
            .preferences
            .load(service.as_ref(), &session)
            .await
            .err();
        let query = feed::derive_query(&session, self.preferences.confirmed());
        let feed_error = self.feed.refresh(service.as_ref(), &query).await.err();
        Ok(SignInReport {
            session,
            preferences_error,
            feed_error,
        })
    }

    pub fn edit_draft(&mut self, edit: DraftEdit) -> Result<(), AppError> {
        self.require_session()?;
        self.preferences.edit_draft(edit);
        Ok(())
    }

    /// Saves the draft. On promotion the store's event decides whether the
    /// feed re-fetches: only language or region changes do.
    pub async fn save_preferences(&mut self) -> Result<SaveOutcome, AppError> {
        let session = self.require_session()?;
        let service = Arc::clone(&self.service);
        self.preferences.save(service.as_ref(), &session).await?;

        let mut filters_changed = false;
        while let Ok(event) = self.preference_events.try_recv() {
            match event {
                PreferencesEvent::ConfirmedChanged {
                    feed_filters_changed,
                } => filters_changed |= feed_filters_changed,
            }
        }
        if !filters_changed {
            return Ok(SaveOutcome {
                refreshed: false,
                refresh_error: None,
            });
        }
        let query = feed::derive_query(&session, self.preferences.confirmed());
        let refresh_error = self.feed.refresh(service.as_ref(), &query).await.err();
        Ok(SaveOutcome {
            refreshed: true,
            refresh_error,
        })
    }

    pub async fn refresh_feed(&mut self) -> Result<(), AppError> {
        let session = self.require_session()?;
        let service = Arc::clone(&self.service);
        let query = feed::derive_query(&session, self.preferences.confirmed());
        self.feed.refresh(service.as_ref(), &query).await?;
        Ok(())
    }

    /// Fire-and-confirm: the refresh starts only after the interaction call
    /// settles, and runs regardless of how it settled.
    pub async fn record_interaction(
        &mut self,
        article_id: impl Into<ArticleId>,
        action: InteractionAction,
    ) -> Result<InteractionReport, AppError> {
        let session = self.require_session()?;
        let service = Arc::clone(&self.service);
        let event = InteractionEvent {
            article_id: article_id.into(),
            action,
        };
        tracing::debug!(
            target: "feed",
            article_id = %event.article_id,
            action = event.action.as_str(),
            "interaction_sent"
        );
        let interaction_error = service
            .record_interaction(&session.user_id, &event)
            .await
            .err();
        let query = feed::derive_query(&session, self.preferences.confirmed());
        let refresh_error = self.feed.refresh(service.as_ref(), &query).await.err();
        Ok(InteractionReport {
            interaction_error,
            refresh_error,
        })
    }

    pub async fn publish(&mut self, draft: ArticleDraft) -> Result<Article, AppError> {
        let session = self.require_session()?;
        let service = Arc::clone(&self.service);
        let article = self
            .composer
            .publish(service.as_ref(), &session, draft)
            .await?;
        Ok(article)
    }

    /// Seed for a new article: the draft preferences' language, region and
    /// categories, with the service's authoring default when no language is
    /// chosen.
    pub fn article_draft_from_preferences(
        &self,
        title: impl Into<String>,
        content: impl Into<String>,
    ) -> ArticleDraft {
        let prefs: &Preferences = self.preferences.draft();
        let mut draft = ArticleDraft::new(title, content);
        if let Some(language) = &prefs.language {
            draft.language = Some(language.clone());
        }
        draft.region = prefs.region.clone();
        draft.categories = prefs.categories.clone();
        draft
    }

    fn require_session(&self) -> Result<Session, AppError> {
        match self.session.current() {
            Some(session) => Ok(session.clone()),
            None => {
                tracing::debug!(target: "app", "operation_refused_without_session");
                Err(AppError::SessionRequired)
            }
        }
    }
}
