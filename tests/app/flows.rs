use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use gazette::{
    app::{App, AppError},
    feed::FeedStatus,
    preferences::DraftEdit,
    service::{
        error::unavailable,
        testing::{ScriptedFeedService, ServiceCall, boxed},
        types::{FeedItem, FeedQuery, InteractionAction, Preferences},
    },
};

fn item(id: &str) -> FeedItem {
    FeedItem {
        id: id.to_string(),
        title: format!("title {}", id),
        content: "body".to_string(),
        language: None,
        region: None,
    }
}

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

#[tokio::test]
async fn given_fresh_app_when_signing_in_then_session_prefs_and_feed_load_in_order() {
    let service = Arc::new(ScriptedFeedService::new());
    let mut app = App::new(service.clone());

    let report = app.sign_in().await.expect("sign-in should succeed");

    assert_eq!(report.session.user_id, "user-test");
    assert!(report.preferences_error.is_none());
    assert!(report.feed_error.is_none());
    assert_eq!(
        service.call_names(),
        vec!["create_anonymous_session", "load_preferences", "fetch_feed"]
    );
    assert_eq!(app.feed_view().status, FeedStatus::Empty);
}

#[tokio::test]
async fn given_no_stored_filters_when_first_feed_loads_then_query_carries_only_the_user() {
    let service = Arc::new(ScriptedFeedService::new());
    let mut app = App::new(service.clone());

    app.sign_in().await.expect("sign-in should succeed");

    let queries = fetch_queries(&service);
    assert_eq!(queries.len(), 1);
    assert_eq!(queries[0], FeedQuery::for_user("user-test"));
    assert_eq!(
        queries[0].query_pairs(),
        vec![("user_id", "user-test".to_string())]
    );
}

#[tokio::test]
async fn given_stored_filters_when_signing_in_then_first_fetch_carries_them() {
    let service = Arc::new(ScriptedFeedService::new().with_load_preferences(Arc::new(
        |_: String| {
            boxed(async {
                Ok(Preferences {
                    language: Some("zh".to_string()),
                    region: Some("IN".to_string()),
                    ..Preferences::default()
                })
            })
        },
    )));
    let mut app = App::new(service.clone());

    app.sign_in().await.expect("sign-in should succeed");

    let queries = fetch_queries(&service);
    assert_eq!(queries[0].language.as_deref(), Some("zh"));
    assert_eq!(queries[0].region.as_deref(), Some("IN"));
}

#[tokio::test]
async fn given_unreachable_service_when_signing_in_then_the_failure_is_fatal() {
    let service = Arc::new(ScriptedFeedService::new().with_create_session(Arc::new(|_: ()| {
        boxed(async { Err(unavailable("auth endpoint down")) })
    })));
    let mut app = App::new(service.clone());

    let err = app.sign_in().await.expect_err("sign-in must fail");

    assert!(matches!(err, AppError::Service(_)));
    assert!(app.session().is_none());
    assert_eq!(service.call_names(), vec!["create_anonymous_session"]);
}

#[tokio::test]
async fn given_failed_preference_load_when_signing_in_then_defaults_still_drive_the_feed() {
    let service = Arc::new(ScriptedFeedService::new().with_load_preferences(Arc::new(
        |_: String| boxed(async { Err(unavailable("preferences table offline")) }),
    )));
    let mut app = App::new(service.clone());

    let report = app.sign_in().await.expect("sign-in should still succeed");

    assert!(report.preferences_error.is_some());
    assert!(report.feed_error.is_none());
    assert_eq!(app.preferences().confirmed(), &Preferences::default());
    let queries = fetch_queries(&service);
    assert_eq!(queries[0], FeedQuery::for_user("user-test"));
}

#[tokio::test]
async fn given_no_session_when_gated_operations_run_then_they_fail_without_network() {
    let service = Arc::new(ScriptedFeedService::new());
    let mut app = App::new(service.clone());

    let edit = app.edit_draft(DraftEdit::SetLanguage(Some("zh".to_string())));
    assert!(matches!(edit, Err(AppError::SessionRequired)));

    let save = app.save_preferences().await;
    assert!(matches!(save, Err(AppError::SessionRequired)));

    let refresh = app.refresh_feed().await;
    assert!(matches!(refresh, Err(AppError::SessionRequired)));

    let interaction = app.record_interaction("a-1", InteractionAction::View).await;
    assert!(matches!(interaction, Err(AppError::SessionRequired)));

    let draft = app.article_draft_from_preferences("Title", "Body");
    let publish = app.publish(draft).await;
    assert!(matches!(publish, Err(AppError::SessionRequired)));

    assert!(service.call_names().is_empty());
}

#[tokio::test]
async fn given_a_populated_feed_when_a_refresh_fails_then_previous_items_stay() {
    let fetches = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&fetches);
    let service = Arc::new(
        ScriptedFeedService::new().with_fetch_feed(Arc::new(move |_: FeedQuery| {
            let call = counter.fetch_add(1, Ordering::SeqCst);
            boxed(async move {
                if call == 0 {
                    Ok(vec![item("a-1"), item("a-2")])
                } else {
                    Err(unavailable("feed endpoint down"))
                }
            })
        })),
    );
    let mut app = App::new(service.clone());
    app.sign_in().await.expect("sign-in should succeed");
    assert_eq!(app.feed_view().items.len(), 2);

    let err = app.refresh_feed().await.expect_err("refresh must fail");

    assert!(matches!(err, AppError::Service(_)));
    let view = app.feed_view();
    assert_eq!(view.status, FeedStatus::Failed);
    assert_eq!(view.items.len(), 2);
    assert!(view.last_error.is_some());
}

#[tokio::test]
async fn given_a_populated_feed_when_a_refresh_returns_nothing_then_the_list_empties() {
    let fetches = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&fetches);
    let service = Arc::new(
        ScriptedFeedService::new().with_fetch_feed(Arc::new(move |_: FeedQuery| {
            let call = counter.fetch_add(1, Ordering::SeqCst);
            boxed(async move {
                if call == 0 {
                    Ok(vec![item("a-1")])
                } else {
                    Ok(Vec::new())
                }
            })
        })),
    );
    let mut app = App::new(service.clone());
    app.sign_in().await.expect("sign-in should succeed");
    assert_eq!(app.feed_view().status, FeedStatus::Ready);

    app.refresh_feed().await.expect("refresh should succeed");

    let view = app.feed_view();
    assert_eq!(view.status, FeedStatus::Empty);
    assert!(view.items.is_empty());
    assert!(view.last_error.is_none());
}
