//! The client components against the real API over HTTP.

use super::helpers::{fast_engine, serve, unique_entity, within};
use gallery::{
    application::{
        LikeView, NotificationKind, NotificationLevel, StaticSession, SubmissionGuard,
        ToggleReconciler,
    },
    domain::social::{
        CommentGateway, EntityId, LikeGateway, LikeSnapshot, Rejection, UserId,
        repository::SocialRepository,
    },
    infrastructure::http::RestGateway,
};
use std::sync::Arc;

fn alice() -> Arc<StaticSession> {
    Arc::new(StaticSession::new(Some(UserId::new("alice"))))
}

#[tokio::test]
async fn like_burst_converges_with_server() {
    let (base_url, store) = serve().await;
    let engine = fast_engine();
    let gateway: Arc<dyn LikeGateway> =
        Arc::new(RestGateway::with_timeout(base_url, engine.request_timeout));
    let entity = EntityId::new(unique_entity("prompt"));
    store
        .toggle_like(&entity, &UserId::new("carol"))
        .await
        .expect("seed like");

    let likes = ToggleReconciler::new(
        entity.clone(),
        gateway,
        alice(),
        engine.notifier(),
        engine.toggle_options(),
    );
    likes.initialize().await;
    assert_eq!(
        likes.view(),
        LikeView {
            liked: false,
            count: 1,
            is_loading: false
        }
    );

    for _ in 0..3 {
        likes.toggle().expect("signed in");
    }
    let optimistic = likes.view();
    assert!(optimistic.liked);
    assert_eq!(optimistic.count, 2);

    let mut view = likes.subscribe();
    within("like to settle", view.wait_for(|v| !v.is_loading))
        .await
        .expect("reconciler alive");

    assert_eq!(likes.confirmed(), LikeSnapshot::new(true, 2));
    assert_eq!(likes.pending_delta(), 0);
    assert_eq!(
        store
            .like_state(&entity, Some(&UserId::new("alice")))
            .await
            .expect("state"),
        LikeSnapshot::new(true, 2)
    );

    store
        .toggle_like(&entity, &UserId::new("bob"))
        .await
        .expect("bob likes");
    likes.refetch().await;
    assert_eq!(likes.view().count, 3);
    assert!(likes.view().liked);
}

#[tokio::test]
async fn reads_follow_likes_made_outside_the_reconciler() {
    let (base_url, store) = serve().await;
    let engine = fast_engine();
    let entity = EntityId::new(unique_entity("prompt"));
    let alice_id = UserId::new("alice");
    store
        .toggle_like(&entity, &UserId::new("carol"))
        .await
        .expect("carol likes");
    store
        .toggle_like(&entity, &alice_id)
        .await
        .expect("alice likes from another tab");

    let likes = ToggleReconciler::new(
        entity.clone(),
        Arc::new(RestGateway::new(base_url)),
        alice(),
        engine.notifier(),
        engine.toggle_options(),
    );
    likes.initialize().await;
    assert_eq!(
        likes.view(),
        LikeView {
            liked: true,
            count: 2,
            is_loading: false
        }
    );

    store
        .toggle_like(&entity, &alice_id)
        .await
        .expect("alice unlikes from another tab");
    likes.refetch().await;
    assert_eq!(
        likes.view(),
        LikeView {
            liked: false,
            count: 1,
            is_loading: false
        }
    );
    assert_eq!(likes.pending_delta(), 0);
    assert_eq!(
        store.like_state(&entity, Some(&alice_id)).await.expect("state"),
        LikeSnapshot::new(false, 1)
    );
}

#[tokio::test]
async fn even_burst_leaves_server_untouched() {
    let (base_url, store) = serve().await;
    let engine = fast_engine();
    let entity = EntityId::new(unique_entity("prompt"));
    let likes = ToggleReconciler::new(
        entity.clone(),
        Arc::new(RestGateway::new(base_url)),
        alice(),
        engine.notifier(),
        engine.toggle_options(),
    );
    likes.initialize().await;

    likes.toggle().expect("signed in");
    likes.toggle().expect("signed in");

    let mut view = likes.subscribe();
    within("like to settle", view.wait_for(|v| !v.is_loading))
        .await
        .expect("reconciler alive");
    assert!(!likes.view().liked);
    assert_eq!(
        store.like_state(&entity, None).await.expect("state"),
        LikeSnapshot::default()
    );
}

#[tokio::test]
async fn comment_submit_duplicate_and_delete() {
    let (base_url, store) = serve().await;
    let engine = fast_engine();
    let gateway: Arc<dyn CommentGateway> = Arc::new(RestGateway::new(base_url));
    let entity = EntityId::new(unique_entity("prompt"));
    let notifier = engine.notifier();
    let mut toasts = notifier.subscribe();

    let thread = SubmissionGuard::new(
        entity.clone(),
        gateway,
        alice(),
        notifier,
        engine.submission_options(),
    );
    thread.load().await;
    assert!(thread.view().comments.is_empty());

    thread.set_draft("  great prompt ");
    thread.submit("  great prompt ").expect("accepted locally");
    let mut view = thread.subscribe();
    within("comment to appear", view.wait_for(|v| v.comments.len() == 1))
        .await
        .expect("guard alive");

    let toast = within("toast", toasts.recv()).await.expect("toast");
    assert_eq!(toast.message, "Comment added!");
    assert_eq!(toast.level, NotificationLevel::Success);
    assert_eq!(thread.view().draft, "");

    let stored = store.get_comments(&entity).await.expect("comments");
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].content, "great prompt");

    assert_eq!(
        thread.submit("great prompt"),
        Err(Rejection::DuplicateContent)
    );
    let toast = within("toast", toasts.recv()).await.expect("toast");
    assert_eq!(toast.kind, NotificationKind::Duplicate);

    let id = stored[0].id.clone();
    thread.delete(&id).expect("delete accepted");
    assert_eq!(thread.delete(&id), Err(Rejection::DeletionInProgress));
    let _ = within("toast", toasts.recv()).await.expect("toast");

    let toast = within("toast", toasts.recv()).await.expect("toast");
    assert_eq!(toast.message, "Comment deleted!");
    assert!(thread.view().comments.is_empty());
    assert!(!thread.is_deleting(&id));
    assert!(store.get_comments(&entity).await.expect("comments").is_empty());
}

#[tokio::test]
async fn refused_delete_restores_comment() {
    let (base_url, store) = serve().await;
    let engine = fast_engine();
    let entity = EntityId::new(unique_entity("prompt"));
    let mine = store
        .add_comment(entity.clone(), UserId::new("alice"), "mine".into())
        .await
        .expect("seed");
    let theirs = store
        .add_comment(entity.clone(), UserId::new("bob"), "theirs".into())
        .await
        .expect("seed");
    let notifier = engine.notifier();
    let mut toasts = notifier.subscribe();

    let thread = SubmissionGuard::new(
        entity,
        Arc::new(RestGateway::new(base_url)),
        alice(),
        notifier,
        engine.submission_options(),
    );
    thread.load().await;

    thread.delete(&theirs.id).expect("delete accepted");
    let toast = within("toast", toasts.recv()).await.expect("toast");
    assert_eq!(toast.kind, NotificationKind::Transient);
    assert_eq!(toast.message, "Failed to delete comment. Please try again.");

    let ids: Vec<_> = thread.view().comments.into_iter().map(|c| c.id).collect();
    assert_eq!(ids, vec![mine.id, theirs.id]);
    assert!(thread.view().deleting.is_empty());
}
