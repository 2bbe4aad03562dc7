use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use gazette::{
    app::App,
    feed::FeedStatus,
    preferences::DraftEdit,
    service::{
        error::unavailable,
        testing::{ScriptedFeedService, ServiceCall, boxed},
        types::{FeedItem, FeedQuery, InteractionAction, InteractionEvent, UserId},
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

async fn signed_in_app(service: &Arc<ScriptedFeedService>) -> App {
    let mut app = App::new(service.clone());
    app.sign_in().await.expect("sign-in should succeed");
    app
}

#[tokio::test]
async fn given_a_like_when_it_is_acknowledged_then_a_refresh_follows() {
    let service = Arc::new(ScriptedFeedService::new());
    let mut app = signed_in_app(&service).await;

    let report = app
        .record_interaction("a-1", InteractionAction::Like)
        .await
        .expect("interaction should run");

    assert!(report.interaction_error.is_none());
    assert!(report.refresh_error.is_none());

    let names = service.call_names();
    assert_eq!(
        &names[names.len() - 2..],
        &["record_interaction", "fetch_feed"]
    );
    assert!(service.calls().contains(&ServiceCall::RecordInteraction {
        user_id: "user-test".to_string(),
        event: InteractionEvent {
            article_id: "a-1".to_string(),
            action: InteractionAction::Like,
        },
    }));
}

#[tokio::test]
async fn given_a_failed_interaction_when_it_settles_then_the_refresh_still_runs() {
    let service = Arc::new(
        ScriptedFeedService::new()
            .with_record_interaction(Arc::new(|_: (UserId, InteractionEvent)| {
                boxed(async { Err(unavailable("interaction endpoint down")) })
            }))
            .with_fetch_feed(Arc::new(|_: FeedQuery| {
                boxed(async { Ok(vec![item("a-1")]) })
            })),
    );
    let mut app = signed_in_app(&service).await;

    let report = app
        .record_interaction("a-1", InteractionAction::View)
        .await
        .expect("interaction should run");

    assert!(report.interaction_error.is_some());
    assert!(report.refresh_error.is_none());
    let names = service.call_names();
    assert_eq!(
        &names[names.len() - 2..],
        &["record_interaction", "fetch_feed"]
    );
    assert_eq!(app.feed_view().status, FeedStatus::Ready);
}

#[tokio::test]
async fn given_both_halves_failing_then_each_error_is_reported_separately() {
    let fetches = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&fetches);
    let service = Arc::new(
        ScriptedFeedService::new()
            .with_record_interaction(Arc::new(|_: (UserId, InteractionEvent)| {
                boxed(async { Err(unavailable("interaction endpoint down")) })
            }))
            .with_fetch_feed(Arc::new(move |_: FeedQuery| {
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
    let mut app = signed_in_app(&service).await;

    let report = app
        .record_interaction("a-2", InteractionAction::Share)
        .await
        .expect("interaction should run");

    assert!(report.interaction_error.is_some());
    assert!(report.refresh_error.is_some());
    let view = app.feed_view();
    assert_eq!(view.status, FeedStatus::Failed);
    assert_eq!(view.items.len(), 2);
}

#[tokio::test]
async fn given_a_publish_when_it_succeeds_then_the_feed_is_not_touched() {
    let service = Arc::new(ScriptedFeedService::new());
    let mut app = signed_in_app(&service).await;

    let draft = app.article_draft_from_preferences("Headline", "Body text");
    let article = app.publish(draft).await.expect("publish should succeed");

    assert_eq!(article.id, "article-test");
    assert_eq!(article.title, "Headline");
    assert_eq!(service.call_names().last(), Some(&"publish_article"));
    assert_eq!(
        service
            .call_names()
            .iter()
            .filter(|name| **name == "fetch_feed")
            .count(),
        1
    );
}

#[tokio::test]
async fn given_draft_preferences_when_composing_then_the_draft_carries_them() {
    let service = Arc::new(ScriptedFeedService::new());
    let mut app = signed_in_app(&service).await;

    let plain = app.article_draft_from_preferences("T", "C");
    assert_eq!(plain.language.as_deref(), Some("en"));
    assert_eq!(plain.region, None);

    app.edit_draft(DraftEdit::SetLanguage(Some("hi".to_string())))
        .expect("edit should be allowed");
    app.edit_draft(DraftEdit::SetRegion(Some("IN".to_string())))
        .expect("edit should be allowed");
    app.edit_draft(DraftEdit::ToggleCategory("sports".to_string()))
        .expect("edit should be allowed");

    let seeded = app.article_draft_from_preferences("T", "C");
    assert_eq!(seeded.language.as_deref(), Some("hi"));
    assert_eq!(seeded.region.as_deref(), Some("IN"));
    assert!(seeded.categories.contains("sports"));

    app.publish(seeded).await.expect("publish should succeed");
    let published = service
        .calls()
        .into_iter()
        .find_map(|call| match call {
            ServiceCall::PublishArticle { draft, .. } => Some(draft),
            _ => None,
        })
        .expect("publish should be recorded");
    assert_eq!(published.language.as_deref(), Some("hi"));
    assert_eq!(published.region.as_deref(), Some("IN"));
}
