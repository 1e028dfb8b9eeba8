//! Protocol module - JSON message types for the remote adapter
//!
//! Every message is one JSON object per line carrying `type`, `seq` (sender
//! sequence number) and `ts` (unix milliseconds).

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::core::{GameSnapshot, Phase};
use crate::types::{
    CascadeStep, Command, Coord, EngineEvent, Move, SpawnedSpecial, SpecialKind, GRID_HEIGHT,
    GRID_WIDTH,
};

pub const PROTOCOL_VERSION: &str = "1.0.0";

// ============== Client -> Game Messages ==============

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum HelloType {
    #[serde(rename = "hello")]
    #[default]
    Hello,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CommandType {
    #[serde(rename = "command")]
    #[default]
    Command,
}

/// Client hello message (first message on a connection)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HelloMessage {
    #[serde(rename = "type", default)]
    pub msg_type: HelloType,
    pub seq: u64,
    #[serde(default)]
    pub ts: u64,
    pub client: ClientInfo,
    pub protocol_version: String,
    #[serde(default)]
    pub requested: RequestedCapabilities,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientInfo {
    pub name: String,
    pub version: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RequestedCapabilities {
    /// Receive `event` and `observation` messages as the game progresses.
    pub stream_observations: bool,
}

impl Default for RequestedCapabilities {
    fn default() -> Self {
        Self {
            stream_observations: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommandName {
    Select,
    Restart,
    Quit,
}

/// Command message (controller only)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandMessage {
    #[serde(rename = "type", default)]
    pub msg_type: CommandType,
    pub seq: u64,
    #[serde(default)]
    pub ts: u64,
    pub command: CommandName,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub col: Option<u8>,
}

impl CommandMessage {
    /// Engine command for this message.
    ///
    /// `select` needs both `row` and `col`; range checks are left to the engine,
    /// which ignores out-of-bounds picks.
    pub fn to_command(&self) -> Result<Command, (ErrorCode, String)> {
        match self.command {
            CommandName::Select => match (self.row, self.col) {
                (Some(row), Some(col)) => Ok(Command::Select(Coord::new(row, col))),
                _ => Err((
                    ErrorCode::InvalidCommand,
                    "select requires row and col".to_string(),
                )),
            },
            CommandName::Restart => Ok(Command::Restart),
            CommandName::Quit => Ok(Command::Quit),
        }
    }
}

/// Any message a client may send
#[derive(Debug, Clone)]
pub enum ParsedMessage {
    Hello(HelloMessage),
    Command(CommandMessage),
    Unknown(serde_json::Value),
}

/// Parse one line from a client.
pub fn parse_message(line: &str) -> Result<ParsedMessage, serde_json::Error> {
    let value: serde_json::Value = serde_json::from_str(line)?;
    match value.get("type").and_then(|t| t.as_str()) {
        Some("hello") => Ok(ParsedMessage::Hello(serde_json::from_value(value)?)),
        Some("command") => Ok(ParsedMessage::Command(serde_json::from_value(value)?)),
        _ => Ok(ParsedMessage::Unknown(value)),
    }
}

// ============== Game -> Client Messages ==============

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WelcomeType {
    #[serde(rename = "welcome")]
    Welcome,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AckType {
    #[serde(rename = "ack")]
    Ack,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AckStatus {
    /// Command changed the game
    #[serde(rename = "ok")]
    Ok,
    /// Command was valid but had no effect (e.g. a pick after game over)
    #[serde(rename = "ignored")]
    Ignored,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorType {
    #[serde(rename = "error")]
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    HandshakeRequired,
    ProtocolMismatch,
    NotController,
    InvalidCommand,
    Backpressure,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssignedRole {
    Controller,
    Observer,
}

/// Welcome message (response to hello)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WelcomeMessage {
    #[serde(rename = "type")]
    pub msg_type: WelcomeType,
    pub seq: u64,
    pub ts: u64,
    pub protocol_version: String,
    pub client_id: u64,
    pub role: AssignedRole,
    pub game_id: String,
}

/// Acknowledgment for an applied command
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AckMessage {
    #[serde(rename = "type")]
    pub msg_type: AckType,
    pub seq: u64,
    pub ts: u64,
    pub status: AckStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorMessage {
    #[serde(rename = "type")]
    pub msg_type: ErrorType,
    pub seq: u64,
    pub ts: u64,
    pub code: ErrorCode,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventType {
    #[serde(rename = "event")]
    Event,
}

/// One engine event, streamed as it is drained from the session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventMessage {
    #[serde(rename = "type")]
    pub msg_type: EventType,
    pub seq: u64,
    pub ts: u64,
    pub event: EventPayload,
}

/// `[row, col]`
pub type CoordPair = [u8; 2];

fn pair(c: Coord) -> CoordPair {
    [c.row, c.col]
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EventPayload {
    Swapped {
        from: CoordPair,
        to: CoordPair,
    },
    SwapRejected {
        from: CoordPair,
        to: CoordPair,
    },
    CascadeStep {
        step: u32,
        matches_found: Vec<CoordPair>,
        removed: Vec<CoordPair>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        spawned: Option<SpawnedPayload>,
        score_delta: u32,
        multiplier: u32,
    },
    Settled {
        score: u32,
    },
    GameOver {
        final_score: u32,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpawnedPayload {
    pub at: CoordPair,
    pub color: u8,
    pub special: String,
}

impl From<&SpawnedSpecial> for SpawnedPayload {
    fn from(s: &SpawnedSpecial) -> Self {
        Self {
            at: pair(s.coord),
            color: s.tile.color.0,
            special: s.tile.special.as_str().to_string(),
        }
    }
}

impl From<&CascadeStep> for EventPayload {
    fn from(s: &CascadeStep) -> Self {
        EventPayload::CascadeStep {
            step: s.step,
            matches_found: s.matches_found.iter().map(pair).collect(),
            removed: s.removed.iter().map(pair).collect(),
            spawned: s.spawned.as_ref().map(SpawnedPayload::from),
            score_delta: s.score_delta,
            multiplier: s.multiplier,
        }
    }
}

impl From<&EngineEvent> for EventPayload {
    fn from(ev: &EngineEvent) -> Self {
        let swap = |mv: &Move| (pair(mv.from), pair(mv.to));
        match ev {
            EngineEvent::Swapped { mv } => {
                let (from, to) = swap(mv);
                EventPayload::Swapped { from, to }
            }
            EngineEvent::SwapRejected { mv } => {
                let (from, to) = swap(mv);
                EventPayload::SwapRejected { from, to }
            }
            EngineEvent::CascadeStep(step) => EventPayload::from(step),
            EngineEvent::Settled { score } => EventPayload::Settled { score: *score },
            EngineEvent::GameOver { final_score } => EventPayload::GameOver {
                final_score: *final_score,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObservationType {
    #[serde(rename = "observation")]
    Observation,
}

/// Full game state (sent after each settled move and on request)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservationMessage {
    #[serde(rename = "type")]
    pub msg_type: ObservationType,
    pub seq: u64,
    pub ts: u64,
    pub phase: String,
    pub playable: bool,
    pub game_over: bool,
    pub episode_id: u32,
    pub colors: u8,
    pub score: u32,
    pub high_score: u32,
    pub moves: u32,
    pub last_multiplier: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected: Option<CoordPair>,
    pub board: BoardSnapshot,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardSnapshot {
    pub width: u8,
    pub height: u8,
    /// 0 = empty, otherwise color index + 1
    pub cells: [[u8; GRID_WIDTH as usize]; GRID_HEIGHT as usize],
    /// 0 = plain, 1 = horizontal, 2 = vertical, 3 = cross
    pub specials: [[u8; GRID_WIDTH as usize]; GRID_HEIGHT as usize],
}

fn special_code(kind: SpecialKind) -> u8 {
    match kind {
        SpecialKind::None => 0,
        SpecialKind::HorizontalLine => 1,
        SpecialKind::VerticalLine => 2,
        SpecialKind::Cross => 3,
    }
}

impl From<&GameSnapshot> for BoardSnapshot {
    fn from(snap: &GameSnapshot) -> Self {
        let mut board = BoardSnapshot {
            width: GRID_WIDTH,
            height: GRID_HEIGHT,
            cells: [[0; GRID_WIDTH as usize]; GRID_HEIGHT as usize],
            specials: [[0; GRID_WIDTH as usize]; GRID_HEIGHT as usize],
        };
        for (r, row) in snap.tiles.iter().enumerate() {
            for (c, cell) in row.iter().enumerate() {
                if let Some(tile) = cell {
                    board.cells[r][c] = tile.color.0 + 1;
                    board.specials[r][c] = special_code(tile.special);
                }
            }
        }
        board
    }
}

// ============== Builders ==============

/// Milliseconds since the unix epoch (0 if the clock is before it).
pub fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

pub fn create_hello(seq: u64, name: &str, stream_observations: bool) -> HelloMessage {
    HelloMessage {
        msg_type: HelloType::Hello,
        seq,
        ts: now_ms(),
        client: ClientInfo {
            name: name.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        protocol_version: PROTOCOL_VERSION.to_string(),
        requested: RequestedCapabilities {
            stream_observations,
        },
    }
}

pub fn create_welcome(seq: u64, client_id: usize, role: AssignedRole) -> WelcomeMessage {
    WelcomeMessage {
        msg_type: WelcomeType::Welcome,
        seq,
        ts: now_ms(),
        protocol_version: PROTOCOL_VERSION.to_string(),
        client_id: client_id as u64,
        role,
        game_id: "swapem".to_string(),
    }
}

pub fn create_ack(seq: u64, status: AckStatus) -> AckMessage {
    AckMessage {
        msg_type: AckType::Ack,
        seq,
        ts: now_ms(),
        status,
    }
}

pub fn create_error(seq: u64, code: ErrorCode, message: &str) -> ErrorMessage {
    ErrorMessage {
        msg_type: ErrorType::Error,
        seq,
        ts: now_ms(),
        code,
        message: message.to_string(),
    }
}

pub fn create_event(seq: u64, event: &EngineEvent) -> EventMessage {
    EventMessage {
        msg_type: EventType::Event,
        seq,
        ts: now_ms(),
        event: EventPayload::from(event),
    }
}

pub fn build_observation(seq: u64, snap: &GameSnapshot) -> ObservationMessage {
    ObservationMessage {
        msg_type: ObservationType::Observation,
        seq,
        ts: now_ms(),
        phase: snap.phase.as_str().to_string(),
        playable: snap.playable(),
        game_over: snap.game_over || snap.phase == Phase::GameOver,
        episode_id: snap.episode_id,
        colors: snap.colors,
        score: snap.score,
        high_score: snap.high_score,
        moves: snap.moves,
        last_multiplier: snap.last_multiplier,
        selected: snap.selected.map(pair),
        board: BoardSnapshot::from(snap),
    }
}
