//! Host-to-orchestrator event channel.

use std::sync::Arc;

use permflow_core::CapabilityName;
use tokio::sync::mpsc;
use tracing::trace;

use crate::delivery::DeliverySlot;

/// Lifecycle and result signals reported by a host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
    /// The host container is attached.
    Attached,
    /// The host is visible, or the user returned from a settings page.
    Resumed,
    /// The host container is gone.
    Destroyed,
    /// The OS answered an interactive prompt.
    PromptResult {
        /// Code of the prompt being answered.
        request_code: u16,
        /// Per-capability answer as reported by the OS.
        results: Vec<(CapabilityName, bool)>,
    },
}

/// Sender half given to a [`Host`](crate::Host) on attach.
///
/// Cheap to clone. Reporting [`HostEvents::destroyed`] disarms the cycle's
/// delivery slot before the event is even queued, so no callback can fire
/// once a host has reported its destruction. Dropping every clone without
/// reporting anything is treated as destruction too.
#[derive(Clone)]
pub struct HostEvents {
    tx: mpsc::UnboundedSender<HostEvent>,
    slot: Arc<DeliverySlot>,
}

impl std::fmt::Debug for HostEvents {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostEvents")
            .field("closed", &self.tx.is_closed())
            .finish_non_exhaustive()
    }
}

impl HostEvents {
    pub(crate) fn new(tx: mpsc::UnboundedSender<HostEvent>, slot: Arc<DeliverySlot>) -> Self {
        Self { tx, slot }
    }

    /// Reports that the host is attached.
    pub fn attached(&self) -> bool {
        self.send(HostEvent::Attached)
    }

    /// Reports that the host resumed.
    pub fn resumed(&self) -> bool {
        self.send(HostEvent::Resumed)
    }

    /// Reports that the host was destroyed.
    pub fn destroyed(&self) -> bool {
        self.send(HostEvent::Destroyed)
    }

    /// Reports the OS answer to prompt `request_code`.
    pub fn prompt_result(
        &self,
        request_code: u16,
        results: impl IntoIterator<Item = (CapabilityName, bool)>,
    ) -> bool {
        self.send(HostEvent::PromptResult {
            request_code,
            results: results.into_iter().collect(),
        })
    }

    /// Sends `event`. Returns `false` if the cycle no longer listens.
    pub fn send(&self, event: HostEvent) -> bool {
        if event == HostEvent::Destroyed {
            self.slot.disarm();
        }
        let sent = self.tx.send(event).is_ok();
        if !sent {
            trace!("Host event dropped, cycle already finished");
        }
        sent
    }

    /// Whether the cycle has stopped listening.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}
