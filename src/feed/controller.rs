use crate::service::{
    FeedServicePort, ServiceError,
    types::{FeedItem, FeedQuery, Preferences, Session},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedPhase {
    Idle,
    Fetching,
}

/// What a reader should be shown right now. Empty feed, fetch in progress
/// and failure are three different answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedStatus {
    NotLoaded,
    Fetching,
    Ready,
    Empty,
    Failed,
}

#[derive(Debug, PartialEq, Eq)]
pub struct RefreshTicket {
    seq: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    Applied,
    /// A newer refresh was issued while this one was in flight; the
    /// completion, error included, was dropped.
    Superseded,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FeedView {
    pub phase: FeedPhase,
    pub status: FeedStatus,
    pub items: Vec<FeedItem>,
    pub last_error: Option<ServiceError>,
}

/// The query parameters a fetch should carry: the session's user plus the
/// confirmed filters. Draft preferences never reach this function.
pub fn derive_query(session: &Session, confirmed: &Preferences) -> FeedQuery {
    FeedQuery {
        user_id: session.user_id.clone(),
        language: confirmed.language.clone(),
        region: confirmed.region.clone(),
    }
}

#[derive(Debug, Default)]
pub struct FeedController {
    items: Vec<FeedItem>,
    last_error: Option<ServiceError>,
    fetched_once: bool,
    issue_seq: u64,
    live_refresh: Option<u64>,
}

impl FeedController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> FeedPhase {
        if self.live_refresh.is_some() {
            FeedPhase::Fetching
        } else {
            FeedPhase::Idle
        }
    }

    pub fn status(&self) -> FeedStatus {
        if self.live_refresh.is_some() {
            FeedStatus::Fetching
        } else if self.last_error.is_some() {
            FeedStatus::Failed
        } else if !self.fetched_once {
            FeedStatus::NotLoaded
        } else if self.items.is_empty() {
            FeedStatus::Empty
        } else {
            FeedStatus::Ready
        }
    }

    /// Items currently presentable. During a fetch these are the previous
    /// results, kept visible until the replacement arrives.
    pub fn items(&self) -> &[FeedItem] {
        &self.items
    }

    pub fn last_error(&self) -> Option<&ServiceError> {
        self.last_error.as_ref()
    }

    pub fn view(&self) -> FeedView {
        FeedView {
            phase: self.phase(),
            status: self.status(),
            items: self.items.clone(),
            last_error: self.last_error.clone(),
        }
    }

    pub fn begin_refresh(&mut self) -> RefreshTicket {
        self.issue_seq += 1;
        let seq = self.issue_seq;
        self.live_refresh = Some(seq);
        tracing::debug!(target: "feed", seq, "refresh_begun");
        RefreshTicket { seq }
    }

    pub fn complete_refresh(
        &mut self,
        ticket: RefreshTicket,
        result: Result<Vec<FeedItem>, ServiceError>,
    ) -> RefreshOutcome {
        if self.live_refresh != Some(ticket.seq) {
            tracing::debug!(target: "feed", seq = ticket.seq, "stale_refresh_discarded");
            return RefreshOutcome::Superseded;
        }
        self.live_refresh = None;
        match result {
            Ok(items) => {
                // An empty answer still replaces the list.
                tracing::info!(target: "feed", item_count = items.len(), "feed_refreshed");
                self.items = items;
                self.fetched_once = true;
                self.last_error = None;
            }
            Err(err) => {
                tracing::warn!(target: "feed", error = %err, "feed_refresh_failed");
                self.last_error = Some(err);
            }
        }
        RefreshOutcome::Applied
    }

    /// Sequential refresh: begin, await, complete. Superseding cannot happen
    /// inside this call, so a fetch error is always the surfaced one.
    pub async fn refresh(
        &mut self,
        service: &dyn FeedServicePort,
        query: &FeedQuery,
    ) -> Result<(), ServiceError> {
        let ticket = self.begin_refresh();
        let result = service.fetch_feed(query).await;
        let err = result.as_ref().err().cloned();
        match (self.complete_refresh(ticket, result), err) {
            (RefreshOutcome::Applied, Some(err)) => Err(err),
            _ => Ok(()),
        }
    }
}
