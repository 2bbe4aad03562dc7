use crate::{
    app::AppError,
    feed::{FeedStatus, FeedView},
    service::{
        ServiceError, ServiceErrorKind,
        types::{FeedItem, KNOWN_CATEGORIES, KNOWN_LANGUAGES, KNOWN_REGIONS, Preferences},
    },
};

const CONTENT_PREVIEW_MAX_CHARS: usize = 120;

pub fn short_user_id(user_id: &str) -> String {
    let mut chars = user_id.chars();
    let head: String = chars.by_ref().take(8).collect();
    if chars.next().is_some() {
        format!("{}…", head)
    } else {
        head
    }
}

pub fn catalogs_block() -> String {
    format!(
        "languages: {} (or - for auto)\nregions: {} (or - for auto)\ncategories: {}",
        KNOWN_LANGUAGES.join(" "),
        KNOWN_REGIONS.join(" "),
        KNOWN_CATEGORIES.join(" "),
    )
}

pub fn preferences_block(confirmed: &Preferences, draft: &Preferences) -> String {
    let mut lines = vec![
        format!("confirmed: {}", describe_preferences(confirmed)),
        format!("draft:     {}", describe_preferences(draft)),
    ];
    if confirmed != draft {
        lines.push("draft has unsaved changes; `save` to apply.".to_string());
    }
    lines.join("\n")
}

pub fn feed_block(view: &FeedView) -> String {
    match view.status {
        FeedStatus::NotLoaded => {
            "feed has not been fetched yet; `login` starts a session.".to_string()
        }
        FeedStatus::Fetching => {
            let mut lines = vec!["fetching feed...".to_string()];
            if !view.items.is_empty() {
                lines.push("showing previous results:".to_string());
                lines.push(item_lines(&view.items));
            }
            lines.join("\n")
        }
        FeedStatus::Failed => {
            let mut lines = match &view.last_error {
                Some(err) => vec![format!("feed refresh failed: {}", service_error_line(err))],
                None => vec!["feed refresh failed.".to_string()],
            };
            if !view.items.is_empty() {
                lines.push("showing last known results:".to_string());
                lines.push(item_lines(&view.items));
            }
            lines.join("\n")
        }
        FeedStatus::Empty => "No items yet. Try publishing or changing preferences.".to_string(),
        FeedStatus::Ready => item_lines(&view.items),
    }
}

pub fn service_error_line(err: &ServiceError) -> String {
    match err.kind {
        ServiceErrorKind::Unavailable => format!("service unavailable: {}", err.message),
        ServiceErrorKind::MalformedResponse => {
            format!("unexpected service payload: {}", err.message)
        }
    }
}

pub fn app_error_line(err: &AppError) -> String {
    match err {
        AppError::SessionRequired => err.to_string(),
        AppError::Service(service_err) => service_error_line(service_err),
    }
}

fn describe_preferences(preferences: &Preferences) -> String {
    let categories = if preferences.categories.is_empty() {
        "-".to_string()
    } else {
        preferences
            .categories
            .iter()
            .cloned()
            .collect::<Vec<_>>()
            .join(",")
    };
    format!(
        "language={} region={} categories={}",
        preferences.language.as_deref().unwrap_or("auto"),
        preferences.region.as_deref().unwrap_or("auto"),
        categories,
    )
}

fn item_lines(items: &[FeedItem]) -> String {
    items
        .iter()
        .enumerate()
        .map(|(index, item)| item_line(index + 1, item))
        .collect::<Vec<_>>()
        .join("\n")
}

fn item_line(number: usize, item: &FeedItem) -> String {
    let mut meta_parts = Vec::new();
    if let Some(language) = &item.language {
        meta_parts.push(language.as_str());
    }
    if let Some(region) = &item.region {
        meta_parts.push(region.as_str());
    }
    let meta = if meta_parts.is_empty() {
        String::new()
    } else {
        format!(" [{}]", meta_parts.join(" / "))
    };
    let preview = content_preview(&item.content);
    if preview.is_empty() {
        format!("{:>3}. {}{}", number, item.title, meta)
    } else {
        format!("{:>3}. {}{}\n     {}", number, item.title, meta, preview)
    }
}

fn content_preview(content: &str) -> String {
    let flattened = content.split_whitespace().collect::<Vec<_>>().join(" ");
    if flattened.chars().count() <= CONTENT_PREVIEW_MAX_CHARS {
        flattened
    } else {
        let head: String = flattened.chars().take(CONTENT_PREVIEW_MAX_CHARS).collect();
        format!("{}...", head)
    }
}
