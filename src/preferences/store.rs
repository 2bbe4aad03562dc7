use tokio::sync::mpsc;

use crate::service::{
    FeedServicePort, ServiceError,
    types::{Preferences, Session},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreferencePhase {
    Unloaded,
    Loading,
    Loaded,
}

/// Local-only draft mutations. None of these touch the confirmed value or
/// perform I/O.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DraftEdit {
    SetLanguage(Option<String>),
    SetRegion(Option<String>),
    ToggleCategory(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreferencesEvent {
    /// A save promoted the draft. `feed_filters_changed` is true iff the
    /// confirmed language or region differs from before; category-only
    /// changes report false.
    ConfirmedChanged { feed_filters_changed: bool },
}

#[derive(Debug, PartialEq, Eq)]
pub struct LoadTicket {
    seq: u64,
}

/// Carries the draft snapshot captured when the save was issued; completion
/// promotes the snapshot, not whatever the draft holds by then.
#[derive(Debug, PartialEq, Eq)]
pub struct SaveTicket {
    seq: u64,
    snapshot: Preferences,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settlement {
    Settled,
    /// The completion belonged to superseded work; its result, error
    /// included, was dropped without touching state.
    Discarded,
}

#[derive(Debug, Default)]
pub struct PreferenceStore {
    confirmed: Preferences,
    draft: Preferences,
    issue_seq: u64,
    live_load: Option<u64>,
    live_save: Option<u64>,
    /// Sequence of the newest completion that wrote `confirmed`. A
    /// completion whose ticket is older than this never applies.
    applied_watermark: u64,
    synced: bool,
    last_error: Option<ServiceError>,
    subscribers: Vec<mpsc::UnboundedSender<PreferencesEvent>>,
}

impl PreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> PreferencePhase {
        if self.live_load.is_some() {
            PreferencePhase::Loading
        } else if self.synced {
            PreferencePhase::Loaded
        } else {
            PreferencePhase::Unloaded
        }
    }

    pub fn confirmed(&self) -> &Preferences {
        &self.confirmed
    }

    pub fn draft(&self) -> &Preferences {
        &self.draft
    }

    pub fn last_error(&self) -> Option<&ServiceError> {
        self.last_error.as_ref()
    }

    pub fn subscribe(&mut self) -> mpsc::UnboundedReceiver<PreferencesEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribers.push(tx);
        rx
    }

    pub fn edit_draft(&mut self, edit: DraftEdit) {
        match edit {
            DraftEdit::SetLanguage(value) => {
                self.draft.language = value.filter(|v| !v.is_empty());
            }
            DraftEdit::SetRegion(value) => {
                self.draft.region = value.filter(|v| !v.is_empty());
            }
            DraftEdit::ToggleCategory(category) => {
                if !self.draft.categories.remove(&category) {
                    self.draft.categories.insert(category);
                }
            }
        }
    }

    pub fn begin_load(&mut self) -> LoadTicket {
        let seq = self.next_seq();
        self.live_load = Some(seq);
        tracing::debug!(target: "preferences", seq, "load_begun");
        LoadTicket { seq }
    }

    pub fn complete_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<Preferences, ServiceError>,
    ) -> Settlement {
        if self.live_load != Some(ticket.seq) {
            tracing::debug!(target: "preferences", seq = ticket.seq, "stale_load_discarded");
            return Settlement::Discarded;
        }
        self.live_load = None;
        if ticket.seq <= self.applied_watermark {
            // A newer write already landed; this load must not clobber it.
            tracing::debug!(target: "preferences", seq = ticket.seq, "outpaced_load_discarded");
            return Settlement::Discarded;
        }
        match result {
            Ok(value) => {
                self.confirmed = value.clone();
                self.draft = value;
                self.synced = true;
                self.applied_watermark = ticket.seq;
                self.last_error = None;
                tracing::info!(target: "preferences", "preferences_loaded");
            }
            Err(err) => {
                tracing::warn!(target: "preferences", error = %err, "preferences_load_failed");
                self.last_error = Some(err);
            }
        }
        self.check_consistency();
        Settlement::Settled
    }

    pub fn begin_save(&mut self) -> SaveTicket {
        let seq = self.next_seq();
        self.live_save = Some(seq);
        tracing::debug!(target: "preferences", seq, "save_begun");
        SaveTicket {
            seq,
            snapshot: self.draft.clone(),
        }
    }

    pub fn complete_save(
        &mut self,
        ticket: SaveTicket,
        result: Result<(), ServiceError>,
    ) -> Settlement {
        if self.live_save != Some(ticket.seq) {
            tracing::debug!(target: "preferences", seq = ticket.seq, "stale_save_discarded");
            return Settlement::Discarded;
        }
        self.live_save = None;
        if ticket.seq <= self.applied_watermark {
            tracing::debug!(target: "preferences", seq = ticket.seq, "outpaced_save_discarded");
            return Settlement::Discarded;
        }
        match result {
            Ok(()) => {
                let feed_filters_changed =
                    self.confirmed.feed_filters() != ticket.snapshot.feed_filters();
                self.confirmed = ticket.snapshot;
                self.synced = true;
                self.applied_watermark = ticket.seq;
                self.last_error = None;
                tracing::info!(target: "preferences", feed_filters_changed, "preferences_saved");
                self.emit(PreferencesEvent::ConfirmedChanged {
                    feed_filters_changed,
                });
            }
            Err(err) => {
                // Draft and confirmed both survive a failed save.
                tracing::warn!(target: "preferences", error = %err, "preferences_save_failed");
                self.last_error = Some(err);
            }
        }
        self.check_consistency();
        Settlement::Settled
    }

    /// Sequential load: begin, await, complete. The surfaced error is the
    /// settled one; superseding cannot happen inside this call.
    pub async fn load(
        &mut self,
        service: &dyn FeedServicePort,
        session: &Session,
    ) -> Result<(), ServiceError> {
        let ticket = self.begin_load();
        let result = service.load_preferences(&session.user_id).await;
        let err = result.as_ref().err().cloned();
        match (self.complete_load(ticket, result), err) {
            (Settlement::Settled, Some(err)) => Err(err),
            _ => Ok(()),
        }
    }

    pub async fn save(
        &mut self,
        service: &dyn FeedServicePort,
        session: &Session,
    ) -> Result<(), ServiceError> {
        let ticket = self.begin_save();
        let result = service
            .save_preferences(&session.user_id, &ticket.snapshot)
            .await;
        let err = result.as_ref().err().cloned();
        match (self.complete_save(ticket, result), err) {
            (Settlement::Settled, Some(err)) => Err(err),
            _ => Ok(()),
        }
    }

    fn next_seq(&mut self) -> u64 {
        self.issue_seq += 1;
        self.issue_seq
    }

    fn emit(&mut self, event: PreferencesEvent) {
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }

    fn check_consistency(&self) {
        debug_assert!(self.applied_watermark <= self.issue_seq);
        debug_assert!(self.live_load.is_none_or(|seq| seq <= self.issue_seq));
        debug_assert!(self.live_save.is_none_or(|seq| seq <= self.issue_seq));
    }
}
