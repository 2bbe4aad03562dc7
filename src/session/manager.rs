use crate::service::{FeedServicePort, ServiceError, types::Session};

/// Holds the anonymous identity for the lifetime of the process. There is
/// no sign-out and no session replacement.
#[derive(Debug, Default)]
pub struct SessionManager {
    session: Option<Session>,
}

impl SessionManager {
    pub fn new() -> Self {
        Self { session: None }
    }

    pub fn current(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// Creates the anonymous session on first call. Later calls return the
    /// existing session without touching the network.
    pub async fn begin_anonymous(
        &mut self,
        service: &dyn FeedServicePort,
    ) -> Result<Session, ServiceError> {
        if let Some(session) = &self.session {
            tracing::debug!(target: "session", user_id = %session.user_id, "session_reused");
            return Ok(session.clone());
        }
        let session = service.create_anonymous_session().await?;
        tracing::info!(target: "session", user_id = %session.user_id, "session_started");
        self.session = Some(session.clone());
        Ok(session)
    }
}
