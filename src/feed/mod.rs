pub mod controller;

pub use controller::{
    FeedController, FeedPhase, FeedStatus, FeedView, RefreshOutcome, RefreshTicket, derive_query,
};
