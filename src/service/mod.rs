pub mod error;
pub mod http;
pub mod ports;
pub mod testing;
pub mod types;
pub(crate) mod wire;

pub use error::{ServiceError, ServiceErrorKind};
pub use http::HttpFeedService;
pub use ports::FeedServicePort;
