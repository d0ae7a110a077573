//! Adapter module - external driver control via TCP with a JSON protocol
//!
//! This module lets an external driver (a bot, a test harness, a replay
//! tool) play the game over a socket instead of the keyboard.
//!
//! # Protocol Overview
//!
//! The adapter implements a **line-delimited JSON protocol** over TCP:
//!
//! 1. **Connection**: Client connects to the TCP socket (default: 127.0.0.1:7878)
//! 2. **Handshake**: Client sends `hello`, server responds with `welcome`
//! 3. **Controller Assignment**: First client to hello becomes the controller
//! 4. **Observation Streaming**: Server sends state snapshots to streaming clients
//! 5. **Commanding**: The controller activates cells and restarts the session
//!
//! # Message Types
//!
//! ## Client → Server
//!
//! - **hello**: Handshake with client info and streaming preference
//! - **command**: `activate {x, y}` or `restart`
//!
//! ## Server → Client
//!
//! - **welcome**: Role assignment plus grid dimensions
//! - **observation**: Cell kinds, phase, score, moves left, game-over flag
//! - **ack**: Command accepted into the game loop's queue
//! - **error**: Rejection with code and message
//!
//! # Environment Variables
//!
//! - `BLAST_AI_HOST`: Bind address (default: "127.0.0.1")
//! - `BLAST_AI_PORT`: Port number (default: 7878)
//! - `BLAST_AI_MAX_PENDING`: Command queue depth (default: 10)
//! - `BLAST_AI_DISABLED`: Set to "1" or "true" to disable the adapter
//!
//! # Example Protocol Flow
//!
//! ```text
//! Client -> Server: {"type":"hello","seq":1,"client":{"name":"my-bot","version":"1.0"}}
//! Server -> Client: {"type":"welcome","seq":1,"protocol_version":"1.0.0","role":"controller","grid_width":6,"grid_height":6}
//! Server -> Client: {"type":"observation","seq":2,"width":6,"height":6,"cells":[...],...}
//! Client -> Server: {"type":"command","seq":2,"command":"activate","x":3,"y":0}
//! Server -> Client: {"type":"ack","seq":3,"command_seq":2}
//! ```
//!
//! # Testing
//!
//! Connect with netcat for manual testing:
//!
//! ```bash
//! nc 127.0.0.1 7878
//! {"type":"hello","seq":1,"client":{"name":"test","version":"0.1"}}
//! ```

pub mod protocol;
pub mod runtime;
pub mod server;

pub use tui_blast_core as core;
pub use tui_blast_types as types;

pub use protocol::{
    ClientInfo, ClientMessage, CommandPayload, Observation, Role, ServerMessage, PROTOCOL_VERSION,
};
pub use runtime::{Adapter, AdapterStatus, ClientCommand, InboundCommand, OutboundMessage};
pub use server::{run_server, ServerConfig, ServerStatus};
