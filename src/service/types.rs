use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

pub type UserId = String;
pub type ArticleId = String;

/// Languages the demo service is known to serve. Free-form codes still pass
/// through unchanged; this list only feeds the console's suggestions.
pub const KNOWN_LANGUAGES: &[&str] = &["en", "zh", "es", "fr", "hi"];
pub const KNOWN_REGIONS: &[&str] = &["US", "CN", "IN", "EU", "BR"];
pub const KNOWN_CATEGORIES: &[&str] = &[
    "politics",
    "sports",
    "entertainment",
    "technology",
    "business",
    "science",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user_id: UserId,
}

/// Reading preferences. `None` means "auto": no filter is applied and the
/// field is omitted from wire bodies and feed queries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(default, deserialize_with = "empty_string_as_unset")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_unset")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(default)]
    pub categories: BTreeSet<String>,
}

impl Preferences {
    /// The pair that parameterizes feed fetches. Categories are not part of
    /// the feed query contract.
    pub fn feed_filters(&self) -> (Option<&str>, Option<&str>) {
        (self.language.as_deref(), self.region.as_deref())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedItem {
    pub id: ArticleId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default, deserialize_with = "empty_string_as_unset")]
    pub language: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_unset")]
    pub region: Option<String>,
}

/// Parameters of one feed fetch, derived from the session and the confirmed
/// preferences at derivation time. Draft edits never reach this type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedQuery {
    pub user_id: UserId,
    pub language: Option<String>,
    pub region: Option<String>,
}

impl FeedQuery {
    pub fn for_user(user_id: impl Into<UserId>) -> Self {
        Self {
            user_id: user_id.into(),
            language: None,
            region: None,
        }
    }

    /// URL query pairs. Unset filters are omitted entirely, never sent as
    /// empty values.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("user_id", self.user_id.clone())];
        if let Some(language) = &self.language {
            pairs.push(("language", language.clone()));
        }
        if let Some(region) = &self.region {
            pairs.push(("region", region.clone()));
        }
        pairs
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionAction {
    View,
    Like,
    Share,
}

impl InteractionAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            InteractionAction::View => "view",
            InteractionAction::Like => "like",
            InteractionAction::Share => "share",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractionEvent {
    pub article_id: ArticleId,
    pub action: InteractionAction,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleDraft {
    pub title: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    pub categories: BTreeSet<String>,
}

impl ArticleDraft {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            language: Some(default_authoring_language().to_string()),
            region: None,
            categories: BTreeSet::new(),
        }
    }
}

impl Default for ArticleDraft {
    fn default() -> Self {
        Self::new("", "")
    }
}

/// Created-article representation echoed by the service after a publish.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    pub id: ArticleId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default, deserialize_with = "empty_string_as_unset")]
    pub language: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_unset")]
    pub region: Option<String>,
    #[serde(default)]
    pub categories: BTreeSet<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_ms: default_request_timeout_ms(),
        }
    }
}

/// The service stores and serves empty strings interchangeably with missing
/// fields for the optional filters. Normalize both to `None`.
fn empty_string_as_unset<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|v| !v.is_empty()))
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_request_timeout_ms() -> u64 {
    10_000
}

fn default_authoring_language() -> &'static str {
    "en"
}
