//! Adapter runtime integration.
//!
//! Bridges the synchronous game loop with the async TCP server: the loop polls
//! [`Adapter::try_recv`] once per frame and pushes replies with the `send_*`
//! helpers, which never block.

use std::sync::Arc;

use tokio::runtime::Runtime;
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::core::GameSnapshot;
use crate::protocol::{build_observation, create_ack, create_event, AckStatus};
use crate::server::{run_server, AdapterStatus, ServerConfig};
use crate::types::{Command, EngineEvent};

/// Command delivered to the game loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InboundCommand {
    pub client_id: usize,
    pub seq: u64,
    pub payload: InboundPayload,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InboundPayload {
    /// A client finished its handshake and wants the current state
    SnapshotRequest,
    Command(Command),
}

/// Outbound line to be delivered by the server.
#[derive(Debug, Clone)]
pub enum OutboundMessage {
    ToClient { client_id: usize, line: String },
    /// To every handshaken client that asked for streaming
    Broadcast { line: String },
}

/// Running adapter instance.
pub struct Adapter {
    _rt: Runtime,
    cmd_rx: mpsc::Receiver<InboundCommand>,
    out_tx: mpsc::UnboundedSender<OutboundMessage>,
    status: Arc<AdapterStatus>,
    out_seq: u64,
}

impl Adapter {
    /// Start the adapter from environment variables.
    ///
    /// Returns `Ok(None)` if `SWAPEM_AI_DISABLED` is set.
    pub fn start_from_env() -> anyhow::Result<Option<Self>> {
        if ServerConfig::is_disabled() {
            info!("adapter disabled via SWAPEM_AI_DISABLED");
            return Ok(None);
        }
        Self::start(ServerConfig::from_env()).map(Some)
    }

    pub fn start(config: ServerConfig) -> anyhow::Result<Self> {
        let max_pending = config.max_pending_commands.max(1);
        let (cmd_tx, cmd_rx) = mpsc::channel::<InboundCommand>(max_pending);
        let (out_tx, out_rx) = mpsc::unbounded_channel::<OutboundMessage>();
        let status = Arc::new(AdapterStatus::default());

        let rt = Runtime::new()?;
        let server_status = Arc::clone(&status);
        rt.spawn(async move {
            if let Err(e) = run_server(config, cmd_tx, out_rx, None, Some(server_status)).await {
                warn!(error = %e, "adapter server stopped");
            }
        });

        Ok(Self {
            _rt: rt,
            cmd_rx,
            out_tx,
            status,
            out_seq: 0,
        })
    }

    pub fn try_recv(&mut self) -> Option<InboundCommand> {
        self.cmd_rx.try_recv().ok()
    }

    pub fn send(&self, msg: OutboundMessage) {
        let _ = self.out_tx.send(msg);
    }

    pub fn status(&self) -> &AdapterStatus {
        &self.status
    }

    fn next_seq(&mut self) -> u64 {
        self.out_seq += 1;
        self.out_seq
    }

    /// Ack a command with the client's own `seq`.
    pub fn send_ack(&self, client_id: usize, seq: u64, applied: bool) {
        let status = if applied {
            AckStatus::Ok
        } else {
            AckStatus::Ignored
        };
        if let Ok(line) = serde_json::to_string(&create_ack(seq, status)) {
            self.send(OutboundMessage::ToClient { client_id, line });
        }
    }

    pub fn broadcast_event(&mut self, event: &EngineEvent) {
        let seq = self.next_seq();
        if let Ok(line) = serde_json::to_string(&create_event(seq, event)) {
            self.send(OutboundMessage::Broadcast { line });
        }
    }

    /// Observation to one client, or to all streaming clients when `client_id` is `None`.
    pub fn send_observation(&mut self, client_id: Option<usize>, snap: &GameSnapshot) {
        let seq = self.next_seq();
        let Ok(line) = serde_json::to_string(&build_observation(seq, snap)) else {
            return;
        };
        match client_id {
            Some(client_id) => self.send(OutboundMessage::ToClient { client_id, line }),
            None => self.send(OutboundMessage::Broadcast { line }),
        }
    }
}
