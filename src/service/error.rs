use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceErrorKind {
    /// Transport failure, timeout, or any non-success HTTP status.
    Unavailable,
    /// Success status whose body could not be decoded into the expected shape.
    MalformedResponse,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceError {
    pub kind: ServiceErrorKind,
    pub message: String,
    pub operation: Option<String>,
    pub http_status: Option<u16>,
}

impl ServiceError {
    pub fn new(kind: ServiceErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            operation: None,
            http_status: None,
        }
    }

    pub fn with_operation(mut self, operation: impl Into<String>) -> Self {
        self.operation = Some(operation.into());
        self
    }

    pub fn with_http_status(mut self, status: u16) -> Self {
        self.http_status = Some(status);
        self
    }

    pub fn is_unavailable(&self) -> bool {
        self.kind == ServiceErrorKind::Unavailable
    }
}

impl std::fmt::Display for ServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)?;
        if let Some(operation) = &self.operation {
            write!(f, " (op={})", operation)?;
        }
        if let Some(status) = self.http_status {
            write!(f, " (http={})", status)?;
        }
        Ok(())
    }
}

impl std::error::Error for ServiceError {}

pub fn unavailable(message: impl Into<String>) -> ServiceError {
    ServiceError::new(ServiceErrorKind::Unavailable, message)
}

pub fn malformed_response(message: impl Into<String>) -> ServiceError {
    ServiceError::new(ServiceErrorKind::MalformedResponse, message)
}
