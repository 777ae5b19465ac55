//! Comment thread of one entity: submission and deletion with local guards.
//!
//! A submit press is debounced (the latest text wins), then sent as a single
//! create request. While it is out, further submissions are refused, and the
//! same text is refused again for a cooldown after it was accepted. Deletes
//! are idempotent per comment id and staged: the comment stays visible for a
//! short fade, disappears, and comes back at its old position if the server
//! refuses.

use super::dedup::RecentSubmission;
use crate::application::notifications::{NotificationKind, Notifier};
use crate::domain::social::{
    CommentGateway, CommentId, CommentRecord, EntityId, GatewayError, Rejection, Session, UserId,
};
use crate::infrastructure::scheduling::{Debouncer, InFlight};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::AbortHandle;
use tokio::time::Instant;
use ts_rs::TS;

const ADDED_MESSAGE: &str = "Comment added!";
const ADD_FAILED_MESSAGE: &str = "Failed to add comment. Please try again.";
const DELETED_MESSAGE: &str = "Comment deleted!";
const DELETE_FAILED_MESSAGE: &str = "Failed to delete comment. Please try again.";

#[derive(Debug, Clone, Copy)]
pub struct SubmissionOptions {
    /// Quiet period after the last submit press.
    pub debounce: Duration,
    /// How long an accepted text is refused if submitted again.
    pub cooldown: Duration,
    /// How long a comment being deleted stays visible before it is hidden.
    pub fade_out: Duration,
}

impl Default for SubmissionOptions {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(800),
            cooldown: Duration::from_secs(5),
            fade_out: Duration::from_millis(300),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ThreadView {
    pub comments: Vec<CommentRecord>,
    pub draft: String,
    /// A submission is waiting out the debounce window or in flight.
    pub is_submitting: bool,
    pub deleting: Vec<CommentId>,
}

type CommentAdded = Arc<dyn Fn(&CommentRecord) + Send + Sync>;

pub struct SubmissionGuard {
    inner: Arc<Inner>,
}

struct Inner {
    entity_id: EntityId,
    gateway: Arc<dyn CommentGateway>,
    session: Arc<dyn Session>,
    notifier: Notifier,
    options: SubmissionOptions,
    debouncer: Debouncer,
    shared: Mutex<Shared>,
    view: watch::Sender<ThreadView>,
}

struct Shared {
    comments: Vec<CommentRecord>,
    draft: String,
    /// Trimmed text waiting for the debounce window to close.
    queued: Option<String>,
    submission: Option<InFlight>,
    generation: u64,
    armed: u64,
    recent: Option<RecentSubmission>,
    deleting: BTreeMap<CommentId, Deletion>,
    on_comment_added: Option<CommentAdded>,
}

struct Deletion {
    task: AbortHandle,
    /// Set once the fade elapsed: where the comment was and what it was.
    hidden: Option<(usize, CommentRecord)>,
}

impl Shared {
    fn view(&self) -> ThreadView {
        ThreadView {
            comments: self.comments.clone(),
            draft: self.draft.clone(),
            is_submitting: self.queued.is_some() || self.submission.is_some(),
            deleting: self.deleting.keys().cloned().collect(),
        }
    }
}

impl SubmissionGuard {
    pub fn new(
        entity_id: EntityId,
        gateway: Arc<dyn CommentGateway>,
        session: Arc<dyn Session>,
        notifier: Notifier,
        options: SubmissionOptions,
    ) -> Self {
        let (view, _) = watch::channel(ThreadView::default());
        Self {
            inner: Arc::new(Inner {
                entity_id,
                gateway,
                session,
                notifier,
                options,
                debouncer: Debouncer::new(options.debounce),
                shared: Mutex::new(Shared {
                    comments: Vec::new(),
                    draft: String::new(),
                    queued: None,
                    submission: None,
                    generation: 0,
                    armed: 0,
                    recent: None,
                    deleting: BTreeMap::new(),
                    on_comment_added: None,
                }),
                view,
            }),
        }
    }

    pub fn entity_id(&self) -> &EntityId {
        &self.inner.entity_id
    }

    pub fn view(&self) -> ThreadView {
        self.inner.shared.lock().view()
    }

    pub fn subscribe(&self) -> watch::Receiver<ThreadView> {
        self.inner.view.subscribe()
    }

    /// Runs after every comment the server accepted, with the created record.
    pub fn set_on_comment_added<F>(&self, callback: F)
    where
        F: Fn(&CommentRecord) + Send + Sync + 'static,
    {
        self.inner.shared.lock().on_comment_added = Some(Arc::new(callback));
    }

    pub fn set_draft(&self, draft: impl Into<String>) {
        let mut shared = self.inner.shared.lock();
        shared.draft = draft.into();
        self.inner.publish(shared.view());
    }

    pub fn is_deleting(&self, comment_id: &CommentId) -> bool {
        self.inner.shared.lock().deleting.contains_key(comment_id)
    }

    /// Loads the thread. Failures are logged and leave the current list alone.
    pub async fn load(&self) {
        let result = self.inner.gateway.list_comments(&self.inner.entity_id).await;
        let mut shared = self.inner.shared.lock();
        match result {
            Ok(mut comments) => {
                let hidden: Vec<CommentId> = shared
                    .deleting
                    .iter()
                    .filter(|(_, deletion)| deletion.hidden.is_some())
                    .map(|(id, _)| id.clone())
                    .collect();
                comments.retain(|c| !hidden.contains(&c.id));
                tracing::debug!(
                    entity_id = %self.inner.entity_id,
                    count = comments.len(),
                    "comments loaded"
                );
                shared.comments = comments;
                self.inner.publish(shared.view());
            }
            Err(err) => {
                tracing::warn!(
                    entity_id = %self.inner.entity_id,
                    error = %err,
                    "failed to load comments"
                );
            }
        }
    }

    /// Queues `text` for submission. Presses inside the debounce window
    /// replace each other; only the last one is sent.
    pub fn submit(&self, text: &str) -> Result<(), Rejection> {
        if self.inner.session.user_id().is_none() {
            self.inner.session.on_auth_required();
            return Err(Rejection::AuthRequired);
        }

        let content = text.trim();
        if content.is_empty() {
            return Err(self.inner.reject(Rejection::EmptyContent));
        }

        let mut shared = self.inner.shared.lock();
        if shared.submission.is_some() {
            drop(shared);
            return Err(self.inner.reject(Rejection::SubmissionInProgress));
        }
        if shared
            .recent
            .as_ref()
            .is_some_and(|recent| recent.blocks(content, Instant::now()))
        {
            drop(shared);
            return Err(self.inner.reject(Rejection::DuplicateContent));
        }

        shared.draft = text.to_string();
        shared.queued = Some(content.to_string());
        Inner::arm(&self.inner, &mut shared);
        self.inner.publish(shared.view());
        Ok(())
    }

    /// Deletes a comment. A second call for an id already being deleted is
    /// refused without touching the server.
    pub fn delete(&self, comment_id: &CommentId) -> Result<(), Rejection> {
        let Some(user_id) = self.inner.session.user_id() else {
            self.inner.session.on_auth_required();
            return Err(Rejection::AuthRequired);
        };

        let mut shared = self.inner.shared.lock();
        if shared.deleting.contains_key(comment_id) {
            drop(shared);
            tracing::debug!(comment_id = %comment_id, "delete already in progress");
            return Err(self.inner.reject(Rejection::DeletionInProgress));
        }

        let task = tokio::spawn(Inner::run_delete(
            Arc::downgrade(&self.inner),
            self.inner.gateway.clone(),
            comment_id.clone(),
            user_id,
            self.inner.options.fade_out,
        ));
        shared.deleting.insert(
            comment_id.clone(),
            Deletion {
                task: task.abort_handle(),
                hidden: None,
            },
        );
        self.inner.publish(shared.view());
        Ok(())
    }

    /// Cancels the pending submission and aborts every request. Comments
    /// hidden by an unfinished delete are put back. Called on drop.
    pub fn shutdown(&self) {
        self.inner.shutdown();
    }
}

impl Drop for SubmissionGuard {
    fn drop(&mut self) {
        self.inner.shutdown();
    }
}

impl Inner {
    fn publish(&self, view: ThreadView) {
        self.view.send_if_modified(|current| {
            if *current == view {
                false
            } else {
                *current = view;
                true
            }
        });
    }

    fn reject(&self, rejection: Rejection) -> Rejection {
        self.notifier.rejection(rejection);
        rejection
    }

    fn arm(inner: &Arc<Inner>, shared: &mut Shared) {
        shared.armed += 1;
        let token = shared.armed;
        let weak = Arc::downgrade(inner);
        inner.debouncer.schedule(move || {
            if let Some(inner) = weak.upgrade() {
                Inner::fire(&inner, token);
            }
        });
    }

    fn fire(inner: &Arc<Inner>, token: u64) {
        let mut shared = inner.shared.lock();
        if shared.armed != token {
            return;
        }
        let Some(content) = shared.queued.take() else {
            return;
        };

        let Some(user_id) = inner.session.user_id() else {
            inner.publish(shared.view());
            drop(shared);
            inner.session.on_auth_required();
            return;
        };

        // The cooldown may have been entered by an earlier submission that
        // finished while this one was queued.
        if shared
            .recent
            .as_ref()
            .is_some_and(|recent| recent.blocks(&content, Instant::now()))
        {
            inner.publish(shared.view());
            drop(shared);
            inner.reject(Rejection::DuplicateContent);
            return;
        }

        shared.generation += 1;
        let generation = shared.generation;
        tracing::debug!(
            entity_id = %inner.entity_id,
            generation,
            length = content.chars().count(),
            "submitting comment"
        );

        let task = tokio::spawn(Inner::run_submit(
            Arc::downgrade(inner),
            inner.gateway.clone(),
            inner.entity_id.clone(),
            user_id,
            content,
            generation,
        ));
        shared.submission = Some(InFlight::new(generation, task.abort_handle()));
        inner.publish(shared.view());
    }

    async fn run_submit(
        weak: Weak<Inner>,
        gateway: Arc<dyn CommentGateway>,
        entity_id: EntityId,
        user_id: UserId,
        content: String,
        generation: u64,
    ) {
        let result = gateway.create_comment(&entity_id, &user_id, &content).await;
        if let Some(inner) = weak.upgrade() {
            inner.complete_submit(generation, content, result);
        }
    }

    fn complete_submit(
        &self,
        generation: u64,
        content: String,
        result: Result<CommentRecord, GatewayError>,
    ) {
        let mut shared = self.shared.lock();
        if !shared
            .submission
            .as_ref()
            .is_some_and(|s| s.generation() == generation)
        {
            return;
        }
        shared.submission = None;

        match result {
            Ok(record) => {
                shared.comments.push(record.clone());
                shared.draft.clear();
                shared.recent = Some(RecentSubmission::new(
                    &content,
                    self.options.cooldown,
                    Instant::now(),
                ));
                let callback = shared.on_comment_added.clone();
                self.publish(shared.view());
                drop(shared);

                tracing::info!(
                    entity_id = %self.entity_id,
                    comment_id = %record.id,
                    "comment added"
                );
                if let Some(callback) = callback {
                    callback(&record);
                }
                self.notifier.success(ADDED_MESSAGE);
            }
            Err(err) => {
                self.publish(shared.view());
                drop(shared);

                tracing::warn!(
                    entity_id = %self.entity_id,
                    error = %err,
                    retryable = err.is_retryable(),
                    "failed to add comment"
                );
                self.notifier
                    .error(NotificationKind::Transient, ADD_FAILED_MESSAGE);
            }
        }
    }

    async fn run_delete(
        weak: Weak<Inner>,
        gateway: Arc<dyn CommentGateway>,
        comment_id: CommentId,
        user_id: UserId,
        fade_out: Duration,
    ) {
        let mut request = gateway.delete_comment(&comment_id, &user_id);
        let result = tokio::select! {
            result = &mut request => result,
            _ = tokio::time::sleep(fade_out) => {
                match weak.upgrade() {
                    Some(inner) => inner.hide(&comment_id),
                    None => return,
                }
                request.await
            }
        };
        if let Some(inner) = weak.upgrade() {
            inner.complete_delete(&comment_id, result);
        }
    }

    fn hide(&self, comment_id: &CommentId) {
        let mut shared = self.shared.lock();
        let Shared {
            comments, deleting, ..
        } = &mut *shared;
        let Some(deletion) = deleting.get_mut(comment_id) else {
            return;
        };
        if deletion.hidden.is_none() {
            if let Some(index) = comments.iter().position(|c| &c.id == comment_id) {
                let record = comments.remove(index);
                deletion.hidden = Some((index, record));
            }
        }
        self.publish(shared.view());
    }

    fn complete_delete(&self, comment_id: &CommentId, result: Result<(), GatewayError>) {
        let mut shared = self.shared.lock();
        let Some(deletion) = shared.deleting.remove(comment_id) else {
            return;
        };

        match result {
            Ok(()) => {
                if deletion.hidden.is_none() {
                    shared.comments.retain(|c| &c.id != comment_id);
                }
                self.publish(shared.view());
                drop(shared);

                tracing::info!(comment_id = %comment_id, "comment deleted");
                self.notifier.success(DELETED_MESSAGE);
            }
            Err(err) => {
                if let Some((index, record)) = deletion.hidden {
                    let index = index.min(shared.comments.len());
                    shared.comments.insert(index, record);
                }
                self.publish(shared.view());
                drop(shared);

                tracing::warn!(
                    comment_id = %comment_id,
                    error = %err,
                    "failed to delete comment, restored"
                );
                self.notifier
                    .error(NotificationKind::Transient, DELETE_FAILED_MESSAGE);
            }
        }
    }

    fn shutdown(&self) {
        let mut shared = self.shared.lock();
        shared.armed += 1;
        self.debouncer.cancel();
        shared.queued = None;
        if let Some(submission) = shared.submission.take() {
            submission.abort();
        }
        let deleting = std::mem::take(&mut shared.deleting);
        for (_, deletion) in deleting {
            deletion.task.abort();
            if let Some((index, record)) = deletion.hidden {
                let index = index.min(shared.comments.len());
                shared.comments.insert(index, record);
            }
        }
        self.publish(shared.view());
    }
}
