//! Render-completion tracking for committed results.
//!
//! Issuing a transformation request and seeing its output are separate
//! moments: the service may take up to a minute to materialise an
//! expensive chain. [`RenderObserver`] holds the current
//! [`TransformResult`] and moves it from `Pending` to `Ready` or `Failed`
//! when the viewer reports a load or error event.
//!
//! Each armed result gets a fresh [`RenderTicket`]. Events carrying a
//! ticket other than the current one, including a ticket for an earlier
//! commit of the identical URL, are ignored.

use crate::error::RenderError;
use crate::types::Provenance;

/// Whether the requested reference has been displayed yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RenderState {
    /// Requested; waiting for the viewer's load event.
    Pending,
    /// The viewer finished loading the reference.
    Ready,
    /// The viewer failed to load the reference.
    Failed,
}

/// Identity of one armed result.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RenderTicket {
    generation: u64,
    url: String,
}

impl RenderTicket {
    /// Arm counter value this ticket was issued under.
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// The reference this ticket tracks.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }
}

/// A committed transformation request and its render status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformResult {
    ticket: RenderTicket,
    render_state: RenderState,
    provenance: Provenance,
}

impl TransformResult {
    /// The fully composed request reference.
    #[must_use]
    pub fn requested_url(&self) -> &str {
        &self.ticket.url
    }

    /// Identity to hand to the viewer's load callbacks.
    #[must_use]
    pub const fn ticket(&self) -> &RenderTicket {
        &self.ticket
    }

    /// Current render status.
    #[must_use]
    pub const fn render_state(&self) -> RenderState {
        self.render_state
    }

    /// Which image the request was built from.
    #[must_use]
    pub const fn provenance(&self) -> Provenance {
        self.provenance
    }

    /// Whether the result was computed from a substitute demo image.
    #[must_use]
    pub const fn is_fallback(&self) -> bool {
        self.provenance.is_fallback()
    }

    /// The render failure, if the viewer reported one.
    #[must_use]
    pub fn render_error(&self) -> Option<RenderError> {
        (self.render_state == RenderState::Failed).then(|| RenderError {
            url: self.ticket.url.clone(),
        })
    }
}

/// Holder of the current result, guarding against stale viewer events.
#[derive(Debug, Default)]
pub struct RenderObserver {
    current: Option<TransformResult>,
    armed: u64,
}

impl RenderObserver {
    /// An observer with no result.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the current result with a fresh `Pending` one.
    pub fn arm(&mut self, requested_url: String, provenance: Provenance) -> &TransformResult {
        self.armed += 1;
        self.current.insert(TransformResult {
            ticket: RenderTicket {
                generation: self.armed,
                url: requested_url,
            },
            render_state: RenderState::Pending,
            provenance,
        })
    }

    /// Drop the current result. Outstanding tickets become stale.
    pub fn clear(&mut self) {
        self.current = None;
    }

    /// The current result, if any.
    #[must_use]
    pub const fn current(&self) -> Option<&TransformResult> {
        self.current.as_ref()
    }

    /// The viewer finished loading `ticket`'s reference.
    ///
    /// Returns `false` if the ticket is stale or the result already
    /// settled.
    pub fn on_ready(&mut self, ticket: &RenderTicket) -> bool {
        self.settle(ticket, RenderState::Ready)
    }

    /// The viewer failed to load `ticket`'s reference.
    ///
    /// No retry or substitution happens here; the user decides whether
    /// to commit again or reset.
    pub fn on_failed(&mut self, ticket: &RenderTicket) -> bool {
        self.settle(ticket, RenderState::Failed)
    }

    fn settle(&mut self, ticket: &RenderTicket, outcome: RenderState) -> bool {
        let Some(result) = self.current.as_mut().filter(|r| r.ticket == *ticket) else {
            tracing::debug!(
                generation = ticket.generation,
                url = %ticket.url,
                "ignoring render event for superseded result"
            );
            return false;
        };
        if result.render_state != RenderState::Pending {
            return false;
        }
        result.render_state = outcome;
        match outcome {
            RenderState::Failed => {
                tracing::warn!(url = %ticket.url, "transformed image failed to load");
            }
            _ => tracing::info!(url = %ticket.url, "transformed image ready"),
        }
        true
    }
}
