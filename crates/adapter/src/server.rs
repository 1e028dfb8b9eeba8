//! TCP server for the remote adapter
//!
//! Handles incoming connections and manages client lifecycle. Commands go to
//! the game loop through a bounded channel; replies and streamed messages come
//! back through an unbounded one.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{mpsc, oneshot, RwLock};
use tracing::{debug, info, warn};

use crate::protocol::*;
use crate::runtime::{InboundCommand, InboundPayload, OutboundMessage};

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 7878;

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub max_pending_commands: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            max_pending_commands: 16,
        }
    }
}

impl ServerConfig {
    /// Read `SWAPEM_AI_HOST`, `SWAPEM_AI_PORT` and `SWAPEM_AI_MAX_PENDING`.
    pub fn from_env() -> Self {
        use std::env;

        let defaults = Self::default();
        let host = env::var("SWAPEM_AI_HOST")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or(defaults.host);
        let port = env::var("SWAPEM_AI_PORT")
            .ok()
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(defaults.port);
        let max_pending_commands = env::var("SWAPEM_AI_MAX_PENDING")
            .ok()
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(defaults.max_pending_commands);

        Self {
            host,
            port,
            max_pending_commands,
        }
    }

    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("invalid adapter address {}:{}", self.host, self.port))
    }

    /// True when `SWAPEM_AI_DISABLED` is `1` or `true`.
    pub fn is_disabled() -> bool {
        std::env::var("SWAPEM_AI_DISABLED")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false)
    }
}

/// Connection counters shared with the game loop for the status panel.
#[derive(Debug, Default)]
pub struct AdapterStatus {
    clients: AtomicUsize,
    /// 0 = no controller; client ids start at 1
    controller: AtomicUsize,
}

impl AdapterStatus {
    pub fn client_count(&self) -> usize {
        self.clients.load(Ordering::Relaxed)
    }

    pub fn controller_id(&self) -> Option<usize> {
        match self.controller.load(Ordering::Relaxed) {
            0 => None,
            id => Some(id),
        }
    }
}

/// Handle to a connected client
pub struct ClientHandle {
    pub id: usize,
    pub addr: SocketAddr,
    pub stream_observations: bool,
    pub handshaken: bool,
    pub last_seq: Option<u64>,
    pub tx: mpsc::UnboundedSender<String>,
}

/// Shared server state
pub struct ServerState {
    clients: RwLock<Vec<ClientHandle>>,
    controller: RwLock<Option<usize>>,
    status: Arc<AdapterStatus>,
}

impl ServerState {
    pub fn new(status: Arc<AdapterStatus>) -> Self {
        Self {
            clients: RwLock::new(Vec::new()),
            controller: RwLock::new(None),
            status,
        }
    }

    async fn is_handshaken(&self, client_id: usize) -> bool {
        let clients = self.clients.read().await;
        clients
            .iter()
            .find(|c| c.id == client_id)
            .map(|c| c.handshaken)
            .unwrap_or(false)
    }

    /// Enforce strictly increasing `seq` per client.
    async fn check_and_update_seq(&self, client_id: usize, seq: u64) -> bool {
        let mut clients = self.clients.write().await;
        let Some(client) = clients.iter_mut().find(|c| c.id == client_id) else {
            return true;
        };
        match client.last_seq {
            Some(prev) if seq <= prev => false,
            _ => {
                client.last_seq = Some(seq);
                true
            }
        }
    }

    async fn send_to(&self, client_id: usize, line: String) {
        let clients = self.clients.read().await;
        if let Some(c) = clients.iter().find(|c| c.id == client_id) {
            let _ = c.tx.send(line);
        }
    }

    async fn broadcast(&self, line: &str) {
        let clients = self.clients.read().await;
        for c in clients.iter().filter(|c| c.handshaken && c.stream_observations) {
            let _ = c.tx.send(line.to_string());
        }
    }
}

fn encode<T: serde::Serialize>(msg: &T) -> Option<String> {
    match serde_json::to_string(msg) {
        Ok(line) => Some(line),
        Err(e) => {
            warn!(error = %e, "adapter: failed to encode message");
            None
        }
    }
}

/// Start the TCP server and run until the listener fails.
///
/// `ready_tx` receives the bound address (useful with port 0). `status` is
/// updated as clients connect and the controller changes.
pub async fn run_server(
    config: ServerConfig,
    command_tx: mpsc::Sender<InboundCommand>,
    mut out_rx: mpsc::UnboundedReceiver<OutboundMessage>,
    ready_tx: Option<oneshot::Sender<SocketAddr>>,
    status: Option<Arc<AdapterStatus>>,
) -> anyhow::Result<()> {
    let addr = config.socket_addr()?;
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind adapter on {}", addr))?;
    let bound = listener.local_addr()?;
    info!(%bound, "adapter listening");
    if let Some(tx) = ready_tx {
        let _ = tx.send(bound);
    }

    let state = Arc::new(ServerState::new(status.unwrap_or_default()));
    let mut client_id_counter = 0usize;

    // Outbound dispatcher.
    {
        let state = Arc::clone(&state);
        tokio::spawn(async move {
            while let Some(msg) = out_rx.recv().await {
                match msg {
                    OutboundMessage::ToClient { client_id, line } => {
                        state.send_to(client_id, line).await;
                    }
                    OutboundMessage::Broadcast { line } => state.broadcast(&line).await,
                }
            }
        });
    }

    loop {
        let (socket, addr) = listener.accept().await?;
        client_id_counter += 1;
        let client_id = client_id_counter;
        info!(client_id, %addr, "adapter client connected");

        let state = Arc::clone(&state);
        let command_tx = command_tx.clone();
        tokio::spawn(async move {
            if let Err(e) =
                handle_client(socket, addr, client_id, Arc::clone(&state), command_tx).await
            {
                warn!(client_id, error = %e, "adapter client error");
            }
            remove_client(&state, client_id).await;
            info!(client_id, "adapter client disconnected");
        });
    }
}

/// Drop a client; if it was the controller, promote the lowest remaining id.
async fn remove_client(state: &ServerState, client_id: usize) {
    let next = {
        let mut clients = state.clients.write().await;
        clients.retain(|c| c.id != client_id);
        state.status.clients.store(clients.len(), Ordering::Relaxed);
        clients.iter().filter(|c| c.handshaken).map(|c| c.id).min()
    };
    let mut controller = state.controller.write().await;
    if *controller == Some(client_id) {
        *controller = next;
        state.status.controller.store(next.unwrap_or(0), Ordering::Relaxed);
        match next {
            Some(id) => info!(client_id = id, "adapter controller promoted"),
            None => info!(client_id, "adapter controller released"),
        }
    }
}

async fn handle_client(
    socket: TcpStream,
    addr: SocketAddr,
    client_id: usize,
    state: Arc<ServerState>,
    command_tx: mpsc::Sender<InboundCommand>,
) -> anyhow::Result<()> {
    let (reader, mut writer) = socket.into_split();
    let mut reader = BufReader::new(reader);
    let (tx, mut rx) = mpsc::unbounded_channel::<String>();

    {
        let mut clients = state.clients.write().await;
        clients.push(ClientHandle {
            id: client_id,
            addr,
            stream_observations: false,
            handshaken: false,
            last_seq: None,
            tx: tx.clone(),
        });
        state.status.clients.store(clients.len(), Ordering::Relaxed);
    }

    let write_task = tokio::spawn(async move {
        while let Some(mut line) = rx.recv().await {
            line.push('\n');
            if writer.write_all(line.as_bytes()).await.is_err() {
                break;
            }
            if writer.flush().await.is_err() {
                break;
            }
        }
    });

    let reply = |msg: Option<String>| {
        if let Some(line) = msg {
            let _ = tx.send(line);
        }
    };

    let mut line = String::new();
    loop {
        line.clear();
        if reader.read_line(&mut line).await? == 0 {
            break;
        }
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        debug!(client_id, line = trimmed, "adapter recv");

        match parse_message(trimmed) {
            Ok(ParsedMessage::Hello(hello)) => {
                if state.is_handshaken(client_id).await
                    && !state.check_and_update_seq(client_id, hello.seq).await
                {
                    reply(encode(&create_error(
                        hello.seq,
                        ErrorCode::InvalidCommand,
                        "seq must be strictly increasing",
                    )));
                    continue;
                }

                let major = PROTOCOL_VERSION.split('.').next().unwrap_or("1");
                if hello.protocol_version.split('.').next() != Some(major) {
                    reply(encode(&create_error(
                        hello.seq,
                        ErrorCode::ProtocolMismatch,
                        &format!("protocol version {} not supported", hello.protocol_version),
                    )));
                    break;
                }

                {
                    let mut clients = state.clients.write().await;
                    if let Some(c) = clients.iter_mut().find(|c| c.id == client_id) {
                        c.handshaken = true;
                        c.last_seq = Some(hello.seq);
                        c.stream_observations = hello.requested.stream_observations;
                    }
                }

                // First client to hello becomes controller.
                let role = {
                    let mut controller = state.controller.write().await;
                    if controller.is_none() {
                        *controller = Some(client_id);
                        state.status.controller.store(client_id, Ordering::Relaxed);
                        info!(
                            client_id,
                            client = %hello.client.name,
                            "adapter controller assigned"
                        );
                        AssignedRole::Controller
                    } else {
                        AssignedRole::Observer
                    }
                };
                reply(encode(&create_welcome(hello.seq, client_id, role)));

                let _ = command_tx.try_send(InboundCommand {
                    client_id,
                    seq: hello.seq,
                    payload: InboundPayload::SnapshotRequest,
                });
            }
            Ok(ParsedMessage::Command(cmd)) => {
                if !state.is_handshaken(client_id).await {
                    reply(encode(&create_error(
                        cmd.seq,
                        ErrorCode::HandshakeRequired,
                        "send hello before command",
                    )));
                    continue;
                }
                if !state.check_and_update_seq(client_id, cmd.seq).await {
                    reply(encode(&create_error(
                        cmd.seq,
                        ErrorCode::InvalidCommand,
                        "seq must be strictly increasing",
                    )));
                    continue;
                }
                if *state.controller.read().await != Some(client_id) {
                    reply(encode(&create_error(
                        cmd.seq,
                        ErrorCode::NotController,
                        "only the controller may send commands",
                    )));
                    continue;
                }

                let command = match cmd.to_command() {
                    Ok(c) => c,
                    Err((code, message)) => {
                        reply(encode(&create_error(cmd.seq, code, &message)));
                        continue;
                    }
                };

                // The game loop acks once the command is applied.
                if command_tx
                    .try_send(InboundCommand {
                        client_id,
                        seq: cmd.seq,
                        payload: InboundPayload::Command(command),
                    })
                    .is_err()
                {
                    reply(encode(&create_error(
                        cmd.seq,
                        ErrorCode::Backpressure,
                        "command queue is full",
                    )));
                }
            }
            Ok(ParsedMessage::Unknown(value)) => {
                let seq = value.get("seq").and_then(|v| v.as_u64()).unwrap_or(0);
                reply(encode(&create_error(
                    seq,
                    ErrorCode::InvalidCommand,
                    "unknown message type",
                )));
            }
            Err(e) => {
                reply(encode(&create_error(
                    0,
                    ErrorCode::InvalidCommand,
                    &format!("JSON parse error: {}", e),
                )));
            }
        }
    }

    drop(tx);
    // Removing the handle drops the last sender, so the writer drains and exits.
    remove_client(&state, client_id).await;
    let _ = write_task.await;
    Ok(())
}
