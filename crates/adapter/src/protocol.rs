//! Protocol module - JSON message types for the driver adapter
//!
//! Line-delimited JSON. Every message carries `type` and `seq`; client
//! sequence numbers must increase strictly, server messages carry their own
//! counter. The command vocabulary is the engine's external surface:
//! `activate {x, y}` and `restart`.

use serde::{Deserialize, Serialize};

/// Protocol version sent in `welcome`
pub const PROTOCOL_VERSION: &str = "1.0.0";

// ============== Client -> Server ==============

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ClientMessage {
    /// Handshake; the first client to hello becomes the controller
    Hello {
        seq: u64,
        client: ClientInfo,
        /// Whether this client wants observation broadcasts
        #[serde(default = "default_stream")]
        stream_observations: bool,
    },
    /// Controller command
    Command {
        seq: u64,
        #[serde(flatten)]
        command: CommandPayload,
    },
}

fn default_stream() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientInfo {
    pub name: String,
    pub version: String,
}

/// The commands a driver can issue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "lowercase")]
pub enum CommandPayload {
    /// Activate the tile at grid cell (x, y); row 0 is the bottom row
    Activate { x: i16, y: i16 },
    /// Restart the session with a fresh grid and budget
    Restart,
}

// ============== Server -> Client ==============

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ServerMessage {
    Welcome {
        seq: u64,
        protocol_version: String,
        role: Role,
        grid_width: u8,
        grid_height: u8,
    },
    Observation {
        seq: u64,
        #[serde(flatten)]
        observation: Observation,
    },
    Ack {
        seq: u64,
        /// Sequence number of the acknowledged command
        command_seq: u64,
    },
    Error {
        seq: u64,
        code: String,
        message: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Controller,
    Observer,
}

/// Full observable state, broadcast to streaming clients
///
/// `cells` is row-major from the bottom row up; 0 is empty, 1..=5 are the
/// palette kinds in order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub width: u8,
    pub height: u8,
    pub cells: Vec<u8>,
    pub phase: String,
    pub score: u32,
    pub moves_left: u32,
    pub game_over: bool,
    pub seed: u32,
}

impl ServerMessage {
    /// Encode as one protocol line (no trailing newline)
    pub fn to_line(&self) -> String {
        serde_json::to_string(self).expect("protocol types serialize")
    }
}
