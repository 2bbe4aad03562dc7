pub mod store;

pub use store::{
    DraftEdit, LoadTicket, PreferencePhase, PreferenceStore, PreferencesEvent, SaveTicket,
    Settlement,
};
