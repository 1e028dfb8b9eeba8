use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tokio::sync::{mpsc, oneshot};

use swapem::adapter::{
    build_observation, create_ack, create_event, create_hello, run_server, AckStatus,
    AdapterStatus, InboundCommand, InboundPayload, OutboundMessage, ServerConfig,
};
use swapem::core::{ColorPalette, GameSession, Grid, MemoryHighScores, SeededRng};
use swapem::types::EngineEvent;

/// Stripes plus one legal move: (3,2) <-> (4,2) lines up three 7s on row 4.
fn planted() -> Grid {
    let mut rows = [[0u8; 8]; 8];
    for (r, row) in rows.iter_mut().enumerate() {
        for (c, cell) in row.iter_mut().enumerate() {
            *cell = ((r * 2 + c) % 5) as u8;
        }
    }
    rows[4][0] = 7;
    rows[4][1] = 7;
    rows[3][2] = 7;
    Grid::from_colors(rows)
}

fn line<T: serde::Serialize>(msg: &T) -> String {
    serde_json::to_string(msg).unwrap()
}

/// Stand-in for the terminal game loop: applies commands and streams results.
async fn run_engine(
    mut cmd_rx: mpsc::Receiver<InboundCommand>,
    out_tx: mpsc::UnboundedSender<OutboundMessage>,
) {
    let mut session = GameSession::from_grid(
        planted(),
        ColorPalette::new(8).unwrap(),
        SeededRng::new(5),
        MemoryHighScores::new(),
    );
    let mut seq = 0u64;

    while let Some(inbound) = cmd_rx.recv().await {
        match inbound.payload {
            InboundPayload::SnapshotRequest => {
                seq += 1;
                let _ = out_tx.send(OutboundMessage::ToClient {
                    client_id: inbound.client_id,
                    line: line(&build_observation(seq, &session.snapshot())),
                });
            }
            InboundPayload::Command(command) => {
                let status = if session.apply_command(command) {
                    AckStatus::Ok
                } else {
                    AckStatus::Ignored
                };
                let _ = out_tx.send(OutboundMessage::ToClient {
                    client_id: inbound.client_id,
                    line: line(&create_ack(inbound.seq, status)),
                });

                let events = session.take_events();
                for event in &events {
                    seq += 1;
                    let _ = out_tx.send(OutboundMessage::Broadcast {
                        line: line(&create_event(seq, event)),
                    });
                }
                if events.iter().any(|e| {
                    matches!(e, EngineEvent::Settled { .. } | EngineEvent::GameOver { .. })
                }) {
                    seq += 1;
                    let _ = out_tx.send(OutboundMessage::Broadcast {
                        line: line(&build_observation(seq, &session.snapshot())),
                    });
                }
            }
        }
    }
}

struct Client {
    lines: Lines<BufReader<OwnedReadHalf>>,
    writer: OwnedWriteHalf,
}

impl Client {
    async fn connect(addr: std::net::SocketAddr) -> Self {
        let stream = TcpStream::connect(addr).await.expect("connect failed");
        let (read_half, writer) = stream.into_split();
        Self {
            lines: BufReader::new(read_half).lines(),
            writer,
        }
    }

    async fn send(&mut self, line: &str) {
        self.writer.write_all(line.as_bytes()).await.unwrap();
        self.writer.write_all(b"\n").await.unwrap();
        self.writer.flush().await.unwrap();
    }

    async fn recv(&mut self) -> Value {
        let line = tokio::time::timeout(Duration::from_secs(2), self.lines.next_line())
            .await
            .expect("timed out waiting for a line")
            .unwrap()
            .expect("connection closed");
        serde_json::from_str(&line).unwrap()
    }

    /// Skip streamed messages until one of `msg_type` arrives.
    async fn recv_type(&mut self, msg_type: &str) -> Value {
        loop {
            let v = self.recv().await;
            if v["type"] == msg_type {
                return v;
            }
        }
    }

    async fn hello(&mut self, name: &str) -> Value {
        self.send(&line(&create_hello(1, name, true))).await;
        let welcome = self.recv().await;
        assert_eq!(welcome["type"], "welcome");
        let obs = self.recv().await;
        assert_eq!(obs["type"], "observation");
        welcome
    }
}

async fn start() -> (std::net::SocketAddr, Arc<AdapterStatus>, tokio::task::JoinHandle<()>) {
    let config = ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        max_pending_commands: 8,
    };
    let (cmd_tx, cmd_rx) = mpsc::channel::<InboundCommand>(8);
    let (out_tx, out_rx) = mpsc::unbounded_channel::<OutboundMessage>();
    let (ready_tx, ready_rx) = oneshot::channel();
    let status = Arc::new(AdapterStatus::default());

    let server_status = Arc::clone(&status);
    let server = tokio::spawn(async move {
        let _ = run_server(config, cmd_tx, out_rx, Some(ready_tx), Some(server_status)).await;
    });
    tokio::spawn(run_engine(cmd_rx, out_tx));

    let addr = tokio::time::timeout(Duration::from_secs(2), ready_rx)
        .await
        .expect("server did not signal ready")
        .expect("ready channel dropped");
    (addr, status, server)
}

#[tokio::test]
async fn adapter_controller_move_streams_events_and_observation() {
    let (addr, status, server) = start().await;

    let mut a = Client::connect(addr).await;
    let welcome = a.hello("controller").await;
    assert_eq!(welcome["role"], "controller");
    assert_eq!(welcome["protocol_version"], "1.0.0");
    assert_eq!(welcome["game_id"], "swapem");
    let a_id = welcome["client_id"].as_u64().unwrap() as usize;
    assert_eq!(status.controller_id(), Some(a_id));

    let mut b = Client::connect(addr).await;
    let welcome = b.hello("observer").await;
    assert_eq!(welcome["role"], "observer");

    b.send(r#"{"type":"command","seq":2,"command":"restart"}"#).await;
    let err = b.recv().await;
    assert_eq!(err["type"], "error");
    assert_eq!(err["code"], "not_controller");

    a.send(r#"{"type":"command","seq":2,"command":"select","row":3,"col":2}"#).await;
    let ack = a.recv().await;
    assert_eq!(ack["type"], "ack");
    assert_eq!(ack["seq"], 2);
    assert_eq!(ack["status"], "ok");

    a.send(r#"{"type":"command","seq":3,"command":"select","row":4,"col":2}"#).await;
    let ack = a.recv().await;
    assert_eq!(ack["seq"], 3);
    assert_eq!(ack["status"], "ok");

    let swapped = a.recv().await;
    assert_eq!(swapped["type"], "event");
    assert_eq!(swapped["event"]["kind"], "swapped");
    assert_eq!(swapped["event"]["from"], serde_json::json!([3, 2]));
    assert_eq!(swapped["event"]["to"], serde_json::json!([4, 2]));

    let first_step = a.recv().await;
    assert_eq!(first_step["event"]["kind"], "cascade_step");
    assert_eq!(first_step["event"]["step"], 1);
    assert_eq!(first_step["event"]["score_delta"], 30);
    assert_eq!(
        first_step["event"]["matches_found"],
        serde_json::json!([[4, 0], [4, 1], [4, 2]])
    );

    let obs = a.recv_type("observation").await;
    assert_eq!(obs["moves"], 1);
    assert!(obs["score"].as_u64().unwrap() >= 30);
    assert_eq!(obs["colors"], 8);
    let cells = obs["board"]["cells"].as_array().unwrap();
    assert_eq!(cells.len(), 8);
    assert!(cells
        .iter()
        .flat_map(|row| row.as_array().unwrap())
        .all(|c| (1..=8).contains(&c.as_u64().unwrap())));

    // Observers see the same stream.
    let swapped = b.recv_type("event").await;
    assert_eq!(swapped["event"]["kind"], "swapped");
    let obs_b = b.recv_type("observation").await;
    assert_eq!(obs_b["score"], obs["score"]);

    server.abort();
}

#[tokio::test]
async fn adapter_rejects_commands_before_hello_and_stale_seq() {
    let (addr, _status, server) = start().await;
    let mut a = Client::connect(addr).await;

    a.send(r#"{"type":"command","seq":1,"command":"restart"}"#).await;
    let err = a.recv().await;
    assert_eq!(err["code"], "handshake_required");

    a.hello("late").await;
    a.send(r#"{"type":"command","seq":1,"command":"restart"}"#).await;
    let err = a.recv().await;
    assert_eq!(err["code"], "invalid_command");

    a.send(r#"{"type":"command","seq":2,"command":"select"}"#).await;
    let err = a.recv().await;
    assert_eq!(err["code"], "invalid_command");

    a.send("not json").await;
    let err = a.recv().await;
    assert_eq!(err["type"], "error");

    server.abort();
}

#[tokio::test]
async fn adapter_protocol_mismatch_closes_connection() {
    let (addr, _status, server) = start().await;
    let mut a = Client::connect(addr).await;

    a.send(r#"{"type":"hello","seq":1,"client":{"name":"old","version":"0"},"protocol_version":"2.0.0"}"#)
        .await;
    let err = a.recv().await;
    assert_eq!(err["code"], "protocol_mismatch");
    let closed = tokio::time::timeout(Duration::from_secs(2), a.lines.next_line())
        .await
        .unwrap()
        .unwrap();
    assert!(closed.is_none());

    server.abort();
}

#[tokio::test]
async fn adapter_promotes_observer_when_controller_leaves() {
    let (addr, status, server) = start().await;

    let mut a = Client::connect(addr).await;
    a.hello("first").await;
    let mut b = Client::connect(addr).await;
    let welcome = b.hello("second").await;
    let b_id = welcome["client_id"].as_u64().unwrap() as usize;

    drop(a);
    let deadline = tokio::time::Instant::now() + Duration::from_secs(2);
    while status.controller_id() != Some(b_id) {
        assert!(tokio::time::Instant::now() < deadline, "observer was not promoted");
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert_eq!(status.client_count(), 1);

    b.send(r#"{"type":"command","seq":2,"command":"restart"}"#).await;
    let ack = b.recv_type("ack").await;
    assert_eq!(ack["seq"], 2);
    assert_eq!(ack["status"], "ok");

    server.abort();
}
