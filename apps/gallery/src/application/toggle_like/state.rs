//! Reconciliation arithmetic for one likeable entity.
//!
//! Everything here is synchronous and free of I/O so that every interleaving
//! of clicks, timer firings and responses can be driven step by step. The
//! [`ToggleReconciler`](super::ToggleReconciler) owns the timers and tasks and
//! feeds their outcomes into this state.
//!
//! What the UI shows is always derived, never stored:
//!
//! ```text
//! displayed.liked = confirmed.liked XOR odd(pending_delta)
//! displayed.count = max(0, confirmed.count + pending_delta)
//! ```

use crate::domain::social::LikeSnapshot;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// What a like button renders.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LikeView {
    pub liked: bool,
    pub count: i64,
    pub is_loading: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchKind {
    /// `POST /likes`: one server-side toggle.
    Toggle,
    /// `GET /likes`: re-read after a superseded toggle left the server state
    /// unknown and there is no net local change to send.
    Verify,
}

/// A round trip that has been handed to the network.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dispatch {
    pub generation: u64,
    pub kind: DispatchKind,
    /// `pending_delta` at the moment of dispatch.
    pub sent_delta: i64,
    /// Whether this round replaced a request that was still in flight.
    pub superseded_previous: bool,
}

/// Issued by [`ToggleState::begin_read`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadTicket {
    generation: u64,
    overlaps_dispatch: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reconciled {
    /// The response belongs to a request that is no longer current.
    Stale,
    /// Displayed state now equals the server's.
    Settled,
    /// Local toggles remain unsent; another round must be scheduled.
    Outstanding,
}

#[derive(Debug, Clone)]
pub struct ToggleState {
    confirmed: LikeSnapshot,
    pending_delta: i64,
    toggles_since_dispatch: u32,
    scheduled: bool,
    in_flight: Option<Dispatch>,
    reading: Option<u64>,
    generation: u64,
}

impl ToggleState {
    pub fn new(confirmed: LikeSnapshot) -> Self {
        Self {
            confirmed,
            pending_delta: 0,
            toggles_since_dispatch: 0,
            scheduled: false,
            in_flight: None,
            reading: None,
            generation: 0,
        }
    }

    pub fn confirmed(&self) -> LikeSnapshot {
        self.confirmed
    }

    pub fn pending_delta(&self) -> i64 {
        self.pending_delta
    }

    pub fn in_flight(&self) -> Option<Dispatch> {
        self.in_flight
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn displayed(&self) -> LikeSnapshot {
        LikeSnapshot {
            liked: self.confirmed.liked ^ (self.pending_delta % 2 != 0),
            count: (self.confirmed.count + self.pending_delta).max(0),
        }
    }

    pub fn is_loading(&self) -> bool {
        self.scheduled || self.in_flight.is_some() || self.reading.is_some()
    }

    pub fn view(&self) -> LikeView {
        let displayed = self.displayed();
        LikeView {
            liked: displayed.liked,
            count: displayed.count,
            is_loading: self.is_loading(),
        }
    }

    /// Optimistic flip. The caller is expected to (re)arm the debounce timer.
    pub fn toggle(&mut self) -> LikeSnapshot {
        if self.displayed().liked {
            self.pending_delta -= 1;
        } else {
            self.pending_delta += 1;
        }
        self.toggles_since_dispatch = self.toggles_since_dispatch.saturating_add(1);
        self.scheduled = true;
        self.displayed()
    }

    /// The debounce window closed. Returns the round trip to start, if any.
    ///
    /// Whatever was in flight is superseded: its generation stops being
    /// current, so its response will be reported as [`Reconciled::Stale`].
    pub fn begin_round(&mut self) -> Option<Dispatch> {
        self.scheduled = false;
        let superseded_previous = self.in_flight.take().is_some();

        let kind = if self.pending_delta != 0 {
            DispatchKind::Toggle
        } else if superseded_previous {
            DispatchKind::Verify
        } else {
            return None;
        };

        self.generation += 1;
        self.toggles_since_dispatch = 0;
        let dispatch = Dispatch {
            generation: self.generation,
            kind,
            sent_delta: self.pending_delta,
            superseded_previous,
        };
        self.in_flight = Some(dispatch);
        Some(dispatch)
    }

    /// Folds the server's answer to `generation` into local state.
    pub fn apply_response(&mut self, generation: u64, snapshot: LikeSnapshot) -> Reconciled {
        let dispatch = match self.in_flight {
            Some(dispatch) if dispatch.generation == generation => dispatch,
            _ => return Reconciled::Stale,
        };
        self.in_flight = None;

        let untouched = dispatch.kind == DispatchKind::Toggle
            && !dispatch.superseded_previous
            && self.toggles_since_dispatch == 0;
        if untouched {
            self.confirmed = snapshot;
            self.pending_delta = 0;
        } else {
            self.rebaseline(snapshot);
        }

        if self.pending_delta == 0 {
            Reconciled::Settled
        } else {
            self.scheduled = true;
            Reconciled::Outstanding
        }
    }

    /// The request for `generation` failed. Returns `false` when that request
    /// was already superseded, in which case nothing changes.
    pub fn apply_failure(&mut self, generation: u64) -> bool {
        match self.in_flight {
            Some(dispatch) if dispatch.generation == generation => {}
            _ => return false,
        }
        self.in_flight = None;
        self.pending_delta = 0;
        self.toggles_since_dispatch = 0;
        self.scheduled = false;
        true
    }

    /// Marks a read (`initialize` / `refetch`) as started. The returned ticket
    /// goes back into [`apply_read`](Self::apply_read).
    pub fn begin_read(&mut self) -> ReadTicket {
        self.reading = Some(self.generation);
        ReadTicket {
            generation: self.generation,
            overlaps_dispatch: self.in_flight.is_some(),
        }
    }

    /// Applies a read result unless some toggle was in flight at any point
    /// while the read was out: the server may have answered the read before
    /// or after applying it, so only the toggle's response is trustworthy.
    ///
    /// With no unsent clicks the snapshot is taken as is. Clicks still waiting
    /// out the debounce window are kept and re-expressed against it.
    pub fn apply_read(&mut self, ticket: ReadTicket, snapshot: LikeSnapshot) -> bool {
        self.finish_read(ticket);
        if ticket.overlaps_dispatch
            || ticket.generation != self.generation
            || self.in_flight.is_some()
        {
            return false;
        }

        if self.pending_delta == 0 && !self.scheduled {
            self.confirmed = snapshot;
        } else {
            self.rebaseline(snapshot);
            if self.pending_delta != 0 {
                self.scheduled = true;
            }
        }
        true
    }

    pub fn finish_read(&mut self, ticket: ReadTicket) {
        if self.reading == Some(ticket.generation) {
            self.reading = None;
        }
    }

    /// Throws away everything unconfirmed. Used on teardown.
    pub fn discard(&mut self) {
        self.generation += 1;
        self.in_flight = None;
        self.reading = None;
        self.scheduled = false;
        self.pending_delta = 0;
        self.toggles_since_dispatch = 0;
    }

    /// Takes `snapshot` as the new baseline and re-expresses what the user
    /// currently sees as a delta against it.
    fn rebaseline(&mut self, snapshot: LikeSnapshot) {
        let intended = self.displayed().liked;
        self.confirmed = snapshot;
        self.pending_delta = match (intended, snapshot.liked) {
            (true, false) => 1,
            (false, true) => -1,
            _ => 0,
        };
    }
}

impl Default for ToggleState {
    fn default() -> Self {
        Self::new(LikeSnapshot::default())
    }
}
