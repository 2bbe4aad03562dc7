use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use gazette::{
    app::{App, AppError},
    preferences::DraftEdit,
    service::{
        error::unavailable,
        testing::{ScriptedFeedService, ServiceCall, boxed},
        types::{FeedQuery, Preferences, UserId},
    },
};

fn fetch_queries(service: &ScriptedFeedService) -> Vec<FeedQuery> {
    service
        .calls()
        .into_iter()
        .filter_map(|call| match call {
            ServiceCall::FetchFeed { query } => Some(query),
            _ => None,
        })
        .collect()
}

fn save_bodies(service: &ScriptedFeedService) -> Vec<Preferences> {
    service
        .calls()
        .into_iter()
        .filter_map(|call| match call {
            ServiceCall::SavePreferences { preferences, .. } => Some(preferences),
            _ => None,
        })
        .collect()
}

async fn signed_in_app(service: &Arc<ScriptedFeedService>) -> App {
    let mut app = App::new(service.clone());
    app.sign_in().await.expect("sign-in should succeed");
    app
}

#[tokio::test]
async fn given_saved_language_and_region_when_the_save_lands_then_the_feed_refetches_with_them() {
    let service = Arc::new(ScriptedFeedService::new());
    let mut app = signed_in_app(&service).await;

    app.edit_draft(DraftEdit::SetLanguage(Some("zh".to_string())))
        .expect("edit should be allowed");
    app.edit_draft(DraftEdit::SetRegion(Some("IN".to_string())))
        .expect("edit should be allowed");
    let outcome = app.save_preferences().await.expect("save should succeed");

    assert!(outcome.refreshed);
    assert!(outcome.refresh_error.is_none());
    assert_eq!(
        service.call_names(),
        vec![
            "create_anonymous_session",
            "load_preferences",
            "fetch_feed",
            "save_preferences",
            "fetch_feed",
        ]
    );

    let bodies = save_bodies(&service);
    assert_eq!(bodies[0].language.as_deref(), Some("zh"));
    assert_eq!(bodies[0].region.as_deref(), Some("IN"));

    let queries = fetch_queries(&service);
    assert_eq!(queries[1].language.as_deref(), Some("zh"));
    assert_eq!(queries[1].region.as_deref(), Some("IN"));
}

#[tokio::test]
async fn given_category_only_changes_when_saved_then_the_feed_is_left_alone() {
    let service = Arc::new(ScriptedFeedService::new());
    let mut app = signed_in_app(&service).await;

    app.edit_draft(DraftEdit::ToggleCategory("technology".to_string()))
        .expect("edit should be allowed");
    let outcome = app.save_preferences().await.expect("save should succeed");

    assert!(!outcome.refreshed);
    assert!(outcome.refresh_error.is_none());
    assert!(app.preferences().confirmed().categories.contains("technology"));
    assert_eq!(fetch_queries(&service).len(), 1);
    assert_eq!(service.call_names().last(), Some(&"save_preferences"));
}

#[tokio::test]
async fn given_a_failed_save_when_it_settles_then_draft_and_confirmed_both_survive() {
    let saves = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&saves);
    let service = Arc::new(ScriptedFeedService::new().with_save_preferences(Arc::new(
        move |_: (UserId, Preferences)| {
            let call = counter.fetch_add(1, Ordering::SeqCst);
            boxed(async move {
                if call == 0 {
                    Err(unavailable("write refused"))
                } else {
                    Ok(())
                }
            })
        },
    )));
    let mut app = signed_in_app(&service).await;

    app.edit_draft(DraftEdit::SetLanguage(Some("es".to_string())))
        .expect("edit should be allowed");
    let err = app.save_preferences().await.expect_err("save must fail");

    assert!(matches!(err, AppError::Service(_)));
    assert_eq!(app.preferences().draft().language.as_deref(), Some("es"));
    assert_eq!(app.preferences().confirmed().language, None);
    assert_eq!(fetch_queries(&service).len(), 1);

    let outcome = app.save_preferences().await.expect("retry should succeed");

    assert!(outcome.refreshed);
    assert_eq!(app.preferences().confirmed().language.as_deref(), Some("es"));
    let queries = fetch_queries(&service);
    assert_eq!(queries.len(), 2);
    assert_eq!(queries[1].language.as_deref(), Some("es"));
}

#[tokio::test]
async fn given_unsaved_draft_edits_when_the_feed_refreshes_then_queries_ignore_them() {
    let service = Arc::new(ScriptedFeedService::new());
    let mut app = signed_in_app(&service).await;

    app.edit_draft(DraftEdit::SetLanguage(Some("fr".to_string())))
        .expect("edit should be allowed");
    app.refresh_feed().await.expect("refresh should succeed");

    let queries = fetch_queries(&service);
    assert_eq!(queries.len(), 2);
    assert_eq!(queries[1].language, None);
    assert!(save_bodies(&service).is_empty());
}
