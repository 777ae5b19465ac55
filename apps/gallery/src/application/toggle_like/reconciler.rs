//! Optimistic like button for one entity.
//!
//! Clicks update the view synchronously and restart a debounce timer. When the
//! timer fires, the net effect of the burst goes out as at most one request;
//! a request still in flight at that point is aborted and its generation
//! retired. Responses are folded in by [`ToggleState`], and if the user kept
//! clicking while a request was out, another round is scheduled until nothing
//! is outstanding.

use super::state::{Dispatch, DispatchKind, LikeView, Reconciled, ToggleState};
use crate::application::notifications::{NotificationKind, Notifier};
use crate::domain::social::{
    EntityId, GatewayError, LikeGateway, LikeSnapshot, Rejection, Session, UserId,
};
use crate::infrastructure::scheduling::{Debouncer, InFlight};
use parking_lot::Mutex;
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::sync::watch;

const FAILURE_MESSAGE: &str = "Failed to update like. Please try again.";

#[derive(Debug, Clone, Copy)]
pub struct ToggleOptions {
    /// Quiet period after the last click before anything is sent.
    pub debounce: Duration,
    /// State to show before `initialize` returns, e.g. from a list page that
    /// already knows the count.
    pub initial: Option<LikeSnapshot>,
}

impl Default for ToggleOptions {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(500),
            initial: None,
        }
    }
}

/// Owns the like state of one entity for as long as it is on screen.
///
/// Dropping the reconciler (or calling [`shutdown`](Self::shutdown)) cancels
/// the debounce timer and aborts any request in flight. All methods that
/// schedule work must be called from within a Tokio runtime.
pub struct ToggleReconciler {
    inner: Arc<Inner>,
}

struct Inner {
    entity_id: EntityId,
    gateway: Arc<dyn LikeGateway>,
    session: Arc<dyn Session>,
    notifier: Notifier,
    debouncer: Debouncer,
    shared: Mutex<Shared>,
    view: watch::Sender<LikeView>,
}

struct Shared {
    state: ToggleState,
    in_flight: Option<InFlight>,
    /// Bumped whenever the timer is re-armed or disarmed; a timer callback
    /// carrying an older value has been replaced and does nothing.
    armed: u64,
}

impl ToggleReconciler {
    pub fn new(
        entity_id: EntityId,
        gateway: Arc<dyn LikeGateway>,
        session: Arc<dyn Session>,
        notifier: Notifier,
        options: ToggleOptions,
    ) -> Self {
        let state = ToggleState::new(options.initial.unwrap_or_default());
        let (view, _) = watch::channel(state.view());
        Self {
            inner: Arc::new(Inner {
                entity_id,
                gateway,
                session,
                notifier,
                debouncer: Debouncer::new(options.debounce),
                shared: Mutex::new(Shared {
                    state,
                    in_flight: None,
                    armed: 0,
                }),
                view,
            }),
        }
    }

    pub fn entity_id(&self) -> &EntityId {
        &self.inner.entity_id
    }

    pub fn view(&self) -> LikeView {
        self.inner.shared.lock().state.view()
    }

    /// Receives every change of [`LikeView`].
    pub fn subscribe(&self) -> watch::Receiver<LikeView> {
        self.inner.view.subscribe()
    }

    pub fn confirmed(&self) -> LikeSnapshot {
        self.inner.shared.lock().state.confirmed()
    }

    pub fn pending_delta(&self) -> i64 {
        self.inner.shared.lock().state.pending_delta()
    }

    /// Loads the current like state. A failed read is logged and leaves the
    /// default (or seeded) state in place; it never reaches the UI.
    pub async fn initialize(&self) {
        self.inner.read("initialize").await;
    }

    /// Re-reads the server state, picking up other users' likes.
    pub async fn refetch(&self) {
        self.inner.read("refetch").await;
    }

    /// Flips the like optimistically and schedules reconciliation.
    ///
    /// Never waits on the network. Without a signed-in user the session's auth
    /// callback runs and nothing changes.
    pub fn toggle(&self) -> Result<LikeView, Rejection> {
        if self.inner.session.user_id().is_none() {
            self.inner.session.on_auth_required();
            return Err(Rejection::AuthRequired);
        }

        let mut shared = self.inner.shared.lock();
        let displayed = shared.state.toggle();
        Inner::arm(&self.inner, &mut shared);
        let view = shared.state.view();
        self.inner.publish(view);

        tracing::debug!(
            entity_id = %self.inner.entity_id,
            liked = displayed.liked,
            pending_delta = shared.state.pending_delta(),
            "like toggled"
        );
        Ok(view)
    }

    /// Cancels the timer and any request in flight and drops unconfirmed
    /// state. Called automatically on drop.
    pub fn shutdown(&self) {
        self.inner.shutdown();
    }
}

impl Drop for ToggleReconciler {
    fn drop(&mut self) {
        self.inner.shutdown();
    }
}

impl Inner {
    fn publish(&self, view: LikeView) {
        self.view.send_if_modified(|current| {
            if *current == view {
                false
            } else {
                *current = view;
                true
            }
        });
    }

    /// (Re)starts the debounce window. Caller holds the shared lock.
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

        let Some(user_id) = inner.session.user_id() else {
            // Signed out between the click and the dispatch.
            if let Some(previous) = shared.in_flight.take() {
                previous.abort();
            }
            shared.state.discard();
            inner.publish(shared.state.view());
            drop(shared);
            inner.session.on_auth_required();
            return;
        };

        if let Some(previous) = shared.in_flight.take() {
            tracing::debug!(
                entity_id = %inner.entity_id,
                generation = previous.generation(),
                "superseding in-flight like request"
            );
            previous.abort();
        }

        let Some(dispatch) = shared.state.begin_round() else {
            tracing::debug!(entity_id = %inner.entity_id, "no net like change to send");
            inner.publish(shared.state.view());
            return;
        };

        tracing::debug!(
            entity_id = %inner.entity_id,
            generation = dispatch.generation,
            kind = ?dispatch.kind,
            sent_delta = dispatch.sent_delta,
            "dispatching like reconciliation"
        );

        let task = tokio::spawn(Inner::run(
            Arc::downgrade(inner),
            inner.gateway.clone(),
            inner.entity_id.clone(),
            user_id,
            dispatch,
        ));
        shared.in_flight = Some(InFlight::new(dispatch.generation, task.abort_handle()));
        inner.publish(shared.state.view());
    }

    async fn run(
        weak: Weak<Inner>,
        gateway: Arc<dyn LikeGateway>,
        entity_id: EntityId,
        user_id: UserId,
        dispatch: Dispatch,
    ) {
        let result = match dispatch.kind {
            DispatchKind::Toggle => gateway.toggle_like(&entity_id, &user_id).await,
            DispatchKind::Verify => gateway.fetch_like(&entity_id, Some(user_id)).await,
        };
        if let Some(inner) = weak.upgrade() {
            Inner::complete(&inner, dispatch, result);
        }
    }

    fn complete(
        inner: &Arc<Inner>,
        dispatch: Dispatch,
        result: Result<LikeSnapshot, GatewayError>,
    ) {
        let mut shared = inner.shared.lock();
        let owns_slot = shared
            .in_flight
            .as_ref()
            .is_some_and(|f| f.generation() == dispatch.generation);

        match result {
            Ok(snapshot) => match shared.state.apply_response(dispatch.generation, snapshot) {
                Reconciled::Stale => {
                    tracing::debug!(
                        entity_id = %inner.entity_id,
                        generation = dispatch.generation,
                        "ignoring response to superseded like request"
                    );
                }
                Reconciled::Settled => {
                    if owns_slot {
                        shared.in_flight = None;
                    }
                    tracing::debug!(
                        entity_id = %inner.entity_id,
                        liked = snapshot.liked,
                        count = snapshot.count,
                        "like state settled"
                    );
                }
                Reconciled::Outstanding => {
                    if owns_slot {
                        shared.in_flight = None;
                    }
                    tracing::debug!(
                        entity_id = %inner.entity_id,
                        pending_delta = shared.state.pending_delta(),
                        "clicks arrived while in flight, scheduling another round"
                    );
                    Inner::arm(inner, &mut shared);
                }
            },
            Err(err) => {
                if !shared.state.apply_failure(dispatch.generation) {
                    tracing::debug!(
                        entity_id = %inner.entity_id,
                        error = %err,
                        "ignoring failure of superseded like request"
                    );
                    return;
                }
                if owns_slot {
                    shared.in_flight = None;
                }
                shared.armed += 1;
                inner.debouncer.cancel();
                inner.publish(shared.state.view());
                drop(shared);

                tracing::warn!(
                    entity_id = %inner.entity_id,
                    error = %err,
                    retryable = err.is_retryable(),
                    "like reconciliation failed, rolled back to confirmed state"
                );
                inner.notifier.error(NotificationKind::Transient, FAILURE_MESSAGE);
                return;
            }
        }
        inner.publish(shared.state.view());
    }

    async fn read(&self, purpose: &'static str) {
        let ticket = {
            let mut shared = self.shared.lock();
            let ticket = shared.state.begin_read();
            self.publish(shared.state.view());
            ticket
        };

        let user_id = self.session.user_id();
        let result = self.gateway.fetch_like(&self.entity_id, user_id).await;

        let mut shared = self.shared.lock();
        match result {
            Ok(snapshot) => {
                if !shared.state.apply_read(ticket, snapshot) {
                    tracing::debug!(
                        entity_id = %self.entity_id,
                        purpose,
                        "like read overlapped a toggle, discarded"
                    );
                }
            }
            Err(err) => {
                shared.state.finish_read(ticket);
                tracing::warn!(
                    entity_id = %self.entity_id,
                    purpose,
                    error = %err,
                    "failed to fetch like state"
                );
            }
        }
        self.publish(shared.state.view());
    }

    fn shutdown(&self) {
        let mut shared = self.shared.lock();
        shared.armed += 1;
        self.debouncer.cancel();
        if let Some(in_flight) = shared.in_flight.take() {
            in_flight.abort();
        }
        shared.state.discard();
        self.publish(shared.state.view());
    }
}
