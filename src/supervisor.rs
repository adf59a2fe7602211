//! Connection supervisor.
//!
//! Drives the bridge through Disconnected → Initializing → Running, tearing
//! the whole core down and rebuilding it whenever the room network's
//! connectivity is lost.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use backon::BackoffBuilder;
use tokio::sync::{mpsc, watch};
use tracing::{error, info, warn};

use crate::bridge::{Bridge, EventChannels, RunExit};
use crate::common::error::{AppError, BridgeError, BridgeResult, ErrorCategory};
use crate::common::messages::BridgeEvent;
use crate::config::load_and_validate;
use crate::config::types::{Config, ReconnectConfig};
use crate::gateway::Gateways;

/// Lifecycle state published by the supervisor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupervisorState {
    Disconnected,
    Initializing,
    Running,
}

/// Opens both network connections.
///
/// The returned gateways must push every inbound event into `events`.
#[async_trait]
pub trait Connector: Send + Sync {
    async fn connect(
        &self,
        config: &Config,
        events: mpsc::UnboundedSender<BridgeEvent>,
    ) -> BridgeResult<Gateways>;
}

/// Exponential backoff between connection attempts: factor 1.1, jitter,
/// unlimited retries.
fn reconnect_backoff(config: &ReconnectConfig) -> impl Iterator<Item = Duration> {
    backon::ExponentialBuilder::default()
        .with_min_delay(Duration::from_millis(config.min_delay_ms))
        .with_max_delay(Duration::from_millis(config.max_delay_ms))
        .with_factor(1.1)
        .with_jitter()
        .without_max_times()
        .build()
}

pub struct Supervisor<C> {
    config: Config,
    connector: C,
    shutdown_rx: watch::Receiver<bool>,
    state_tx: watch::Sender<SupervisorState>,
}

impl<C: Connector> Supervisor<C> {
    pub fn new(config: Config, connector: C, shutdown_rx: watch::Receiver<bool>) -> Self {
        let (state_tx, _) = watch::channel(SupervisorState::Disconnected);
        Self {
            config,
            connector,
            shutdown_rx,
            state_tx,
        }
    }

    /// Follow state transitions.
    pub fn subscribe(&self) -> watch::Receiver<SupervisorState> {
        self.state_tx.subscribe()
    }

    fn set_state(&self, state: SupervisorState) {
        self.state_tx.send_replace(state);
    }

    /// Run until shutdown (`Ok`) or a fatal error (`Err`).
    pub async fn run(mut self) -> BridgeResult<()> {
        let mut backoff = reconnect_backoff(&self.config.reconnect);

        loop {
            if *self.shutdown_rx.borrow() {
                info!("Shutdown signal detected, stopping supervisor");
                break;
            }

            self.set_state(SupervisorState::Initializing);
            let EventChannels {
                events_tx,
                mut events_rx,
            } = EventChannels::new();

            match self.start(events_tx).await {
                Ok(mut bridge) => {
                    info!("Bridge is running");
                    backoff = reconnect_backoff(&self.config.reconnect);
                    self.set_state(SupervisorState::Running);

                    match bridge.run(&mut events_rx, &mut self.shutdown_rx).await {
                        Ok(RunExit::Shutdown) => break,
                        Ok(RunExit::EventsClosed) => warn!("Gateways went away"),
                        Err(e) => Self::check_fatal(e)?,
                    }
                }
                Err(e) => Self::check_fatal(e)?,
            }

            self.set_state(SupervisorState::Disconnected);

            let delay = backoff
                .next()
                .unwrap_or(Duration::from_millis(self.config.reconnect.max_delay_ms));
            info!("Reconnecting in {:.1} seconds...", delay.as_secs_f64());

            tokio::select! {
                _ = tokio::time::sleep(delay) => {},
                changed = self.shutdown_rx.changed() => {
                    if changed.is_err() || *self.shutdown_rx.borrow() {
                        info!("Shutdown signal received during backoff");
                        break;
                    }
                }
            }
        }

        self.set_state(SupervisorState::Disconnected);
        Ok(())
    }

    /// Connect both networks and initialize a fresh bridge.
    async fn start(&self, events_tx: mpsc::UnboundedSender<BridgeEvent>) -> BridgeResult<Bridge> {
        info!("Connecting to the room network...");
        let gateways = self.connector.connect(&self.config, events_tx).await?;

        let mut bridge = Bridge::new(&self.config, gateways);
        bridge.initialize().await?;
        Ok(bridge)
    }

    fn check_fatal(e: BridgeError) -> BridgeResult<()> {
        if e.category() == ErrorCategory::Fatal {
            error!("Fatal bridge error: {}", e);
            return Err(e);
        }
        error!("Bridge stopped: {}", e);
        Ok(())
    }
}

/// Load and validate the configuration at `path`, then supervise the bridge
/// until shutdown.
pub async fn run_from_config_file<C: Connector>(
    path: impl AsRef<Path>,
    connector: C,
    shutdown_rx: watch::Receiver<bool>,
) -> Result<(), AppError> {
    let path = path.as_ref();
    info!("Loading configuration from {}...", path.display());
    let config = load_and_validate(path).map_err(|e| {
        error!("Failed to load configuration: {}", e);
        e
    })?;

    info!("Configuration loaded successfully");
    info!("  Matrix user: {}", config.bot_id());
    info!("  Matrix server: {}", config.matrix.server.base_url);
    info!("  XMPP login: {}", config.xmpp.login.jid);
    info!(
        "  XMPP server: {}:{}",
        config.xmpp.server.host, config.xmpp.server.port
    );

    Supervisor::new(config, connector, shutdown_rx).run().await?;
    Ok(())
}
