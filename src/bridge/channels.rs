//! Bridge channel management.
//!
//! Both gateways feed one event channel; the dispatch loop and the
//! supervisor share one shutdown signal.

use tokio::sync::{mpsc, watch};

use crate::common::messages::BridgeEvent;

/// The single event channel consumed by the dispatch loop.
///
/// A fresh one is created for every connection attempt, so events queued by
/// a dead connection are never replayed into a rebuilt bridge.
pub struct EventChannels {
    /// Cloned into every gateway.
    pub events_tx: mpsc::UnboundedSender<BridgeEvent>,
    /// Owned by the dispatch loop.
    pub events_rx: mpsc::UnboundedReceiver<BridgeEvent>,
}

impl EventChannels {
    pub fn new() -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            events_tx,
            events_rx,
        }
    }
}

impl Default for EventChannels {
    fn default() -> Self {
        Self::new()
    }
}

/// Control channels for shutdown coordination.
pub struct ControlChannels {
    /// Sender to trigger shutdown.
    pub shutdown_tx: watch::Sender<bool>,
    /// Handed to the supervisor.
    pub shutdown_rx: watch::Receiver<bool>,
}

impl ControlChannels {
    pub fn new() -> Self {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        Self {
            shutdown_tx,
            shutdown_rx,
        }
    }
}

impl Default for ControlChannels {
    fn default() -> Self {
        Self::new()
    }
}
