//! Adapter runtime integration.
//!
//! Bridges the sync game loop with the async TCP server: commands flow in
//! through a bounded channel, protocol lines flow out through an unbounded
//! one, and connection counters are shared for the status panel.

use std::sync::Arc;

use tokio::runtime::Runtime;
use tokio::sync::mpsc;

use crate::protocol::CommandPayload;
use crate::server::{run_server, ServerConfig, ServerStatus};

/// Command delivered to the game loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InboundCommand {
    pub client_id: usize,
    pub seq: u64,
    pub command: ClientCommand,
}

/// Command payload, decoupled from the wire representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientCommand {
    Activate { x: i16, y: i16 },
    Restart,
}

impl From<CommandPayload> for ClientCommand {
    fn from(value: CommandPayload) -> Self {
        match value {
            CommandPayload::Activate { x, y } => ClientCommand::Activate { x, y },
            CommandPayload::Restart => ClientCommand::Restart,
        }
    }
}

/// Outbound protocol line to be delivered by the server.
#[derive(Debug, Clone)]
pub enum OutboundMessage {
    ToClient { client_id: usize, line: String },
    Broadcast { line: String },
}

/// Connection status snapshot for the view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdapterStatus {
    pub client_count: usize,
    pub controller_id: Option<usize>,
}

/// Running adapter instance.
pub struct Adapter {
    _rt: Runtime,
    cmd_rx: mpsc::Receiver<InboundCommand>,
    out_tx: mpsc::UnboundedSender<OutboundMessage>,
    status: Arc<ServerStatus>,
}

impl Adapter {
    /// Start the adapter from environment variables.
    ///
    /// Returns None if `BLAST_AI_DISABLED` is set. Grid dimensions are
    /// echoed to clients in the welcome message.
    pub fn start_from_env(grid_width: u8, grid_height: u8) -> Option<Self> {
        if ServerConfig::is_disabled() {
            return None;
        }

        let config = ServerConfig {
            grid_width,
            grid_height,
            ..ServerConfig::from_env()
        };
        let max_pending = config.max_pending_commands.max(1);
        let (cmd_tx, cmd_rx) = mpsc::channel::<InboundCommand>(max_pending);
        let (out_tx, out_rx) = mpsc::unbounded_channel::<OutboundMessage>();
        let status = Arc::new(ServerStatus::new());

        let rt = Runtime::new().expect("failed to create tokio runtime");
        let server_status = Arc::clone(&status);
        rt.spawn(async move {
            let _ = run_server(config, cmd_tx, out_rx, server_status, None).await;
        });

        Some(Self {
            _rt: rt,
            cmd_rx,
            out_tx,
            status,
        })
    }

    pub fn try_recv(&mut self) -> Option<InboundCommand> {
        self.cmd_rx.try_recv().ok()
    }

    pub fn send(&self, msg: OutboundMessage) {
        let _ = self.out_tx.send(msg);
    }

    pub fn status(&self) -> AdapterStatus {
        AdapterStatus {
            client_count: self.status.client_count(),
            controller_id: self.status.controller_id(),
        }
    }
}
