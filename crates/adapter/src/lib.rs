//! Adapter module - remote control via TCP socket with a JSON line protocol
//!
//! External agents (bots, test harnesses) connect over TCP, say `hello`, and
//! then either drive the game (the controller) or watch it (observers).
//!
//! # Protocol Overview
//!
//! 1. **Connection**: client connects (default `127.0.0.1:7878`)
//! 2. **Handshake**: client sends `hello`, server answers `welcome` with the
//!    assigned role and an initial `observation`
//! 3. **Controller Assignment**: first client to hello becomes the controller;
//!    on disconnect the lowest remaining id is promoted
//! 4. **Commanding**: the controller sends `select` / `restart` / `quit`;
//!    each applied command is answered with `ack`
//! 5. **Streaming**: every engine event is sent as an `event`, and an
//!    `observation` follows each settled move
//!
//! # Environment Variables
//!
//! - `SWAPEM_AI_HOST`: bind address (default "127.0.0.1")
//! - `SWAPEM_AI_PORT`: port (default 7878)
//! - `SWAPEM_AI_MAX_PENDING`: bounded command queue size (default 16)
//! - `SWAPEM_AI_DISABLED`: "1" or "true" disables the adapter
//!
//! # Example
//!
//! ```text
//! -> {"type":"hello","seq":1,"client":{"name":"bot","version":"0.1"},"protocol_version":"1.0.0"}
//! <- {"type":"welcome","seq":1,"ts":...,"protocol_version":"1.0.0","client_id":1,"role":"controller","game_id":"swapem"}
//! <- {"type":"observation","seq":1,...,"board":{"width":8,"height":8,"cells":[[...]],"specials":[[...]]}}
//! -> {"type":"command","seq":2,"command":"select","row":3,"col":4}
//! <- {"type":"ack","seq":2,"ts":...,"status":"ok"}
//! ```

pub mod protocol;
pub mod runtime;
pub mod server;

pub use swapem_core as core;
pub use swapem_types as types;

pub use protocol::*;
pub use runtime::{Adapter, InboundCommand, InboundPayload, OutboundMessage};
pub use server::{run_server, AdapterStatus, ServerConfig};
