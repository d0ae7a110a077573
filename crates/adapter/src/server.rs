//! TCP server for the driver adapter
//!
//! Handles incoming connections and manages client lifecycle. Uses tokio for
//! async networking. Multiple clients can connect; the first to complete the
//! hello handshake is the controller, later ones observe until the
//! controller disconnects.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicI64, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{mpsc, oneshot, RwLock};

use crate::protocol::{ClientMessage, CommandPayload, Role, ServerMessage, PROTOCOL_VERSION};
use crate::runtime::{ClientCommand, InboundCommand, OutboundMessage};

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub max_pending_commands: usize,
    /// Grid dimensions reported in `welcome`
    pub grid_width: u8,
    pub grid_height: u8,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 7878,
            max_pending_commands: 10,
            grid_width: tui_blast_types::DEFAULT_GRID_WIDTH,
            grid_height: tui_blast_types::DEFAULT_GRID_HEIGHT,
        }
    }
}

impl ServerConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        use std::env;

        let mut config = Self::default();
        if let Ok(host) = env::var("BLAST_AI_HOST") {
            config.host = host;
        }
        if let Some(port) = env::var("BLAST_AI_PORT").ok().and_then(|s| s.parse().ok()) {
            config.port = port;
        }
        if let Some(max) = env::var("BLAST_AI_MAX_PENDING")
            .ok()
            .and_then(|s| s.parse().ok())
        {
            config.max_pending_commands = max;
        }
        config
    }

    /// Check if the adapter is disabled via environment
    pub fn is_disabled() -> bool {
        std::env::var("BLAST_AI_DISABLED")
            .map(|v| v == "1" || v.to_lowercase() == "true")
            .unwrap_or(false)
    }

    pub fn socket_addr(&self) -> SocketAddr {
        format!("{}:{}", self.host, self.port)
            .parse()
            .expect("invalid adapter socket address")
    }
}

/// Connection counters shared with the view's status panel
#[derive(Debug, Default)]
pub struct ServerStatus {
    clients: AtomicUsize,
    /// Controller client id, or -1 when none
    controller: AtomicI64,
}

impl ServerStatus {
    pub fn new() -> Self {
        Self {
            clients: AtomicUsize::new(0),
            controller: AtomicI64::new(-1),
        }
    }

    pub fn client_count(&self) -> usize {
        self.clients.load(Ordering::Relaxed)
    }

    pub fn controller_id(&self) -> Option<usize> {
        let raw = self.controller.load(Ordering::Relaxed);
        (raw >= 0).then_some(raw as usize)
    }
}

struct ClientHandle {
    id: usize,
    handshaken: bool,
    stream_observations: bool,
    last_seq: Option<u64>,
    tx: mpsc::UnboundedSender<String>,
}

struct Shared {
    config: ServerConfig,
    clients: RwLock<Vec<ClientHandle>>,
    controller: RwLock<Option<usize>>,
    status: Arc<ServerStatus>,
    out_seq: AtomicU64,
}

impl Shared {
    fn next_seq(&self) -> u64 {
        self.out_seq.fetch_add(1, Ordering::Relaxed) + 1
    }

    async fn send_to(&self, client_id: usize, line: String) {
        let clients = self.clients.read().await;
        if let Some(client) = clients.iter().find(|c| c.id == client_id) {
            let _ = client.tx.send(line);
        }
    }

    async fn broadcast(&self, line: &str) {
        let clients = self.clients.read().await;
        for client in clients.iter() {
            if client.handshaken && client.stream_observations {
                let _ = client.tx.send(line.to_string());
            }
        }
    }
}

/// Start the TCP server
///
/// Resolves when the listener fails; otherwise serves until the process
/// exits. `ready_tx` receives the bound address (useful with port 0).
pub async fn run_server(
    config: ServerConfig,
    command_tx: mpsc::Sender<InboundCommand>,
    mut out_rx: mpsc::UnboundedReceiver<OutboundMessage>,
    status: Arc<ServerStatus>,
    ready_tx: Option<oneshot::Sender<SocketAddr>>,
) -> anyhow::Result<()> {
    let listener = TcpListener::bind(config.socket_addr()).await?;
    if let Some(tx) = ready_tx {
        let _ = tx.send(listener.local_addr()?);
    }

    let shared = Arc::new(Shared {
        config,
        clients: RwLock::new(Vec::new()),
        controller: RwLock::new(None),
        status,
        out_seq: AtomicU64::new(0),
    });

    // Outbound dispatcher: the sync game loop pushes lines through here.
    {
        let shared = Arc::clone(&shared);
        tokio::spawn(async move {
            while let Some(msg) = out_rx.recv().await {
                match msg {
                    OutboundMessage::Broadcast { line } => shared.broadcast(&line).await,
                    OutboundMessage::ToClient { client_id, line } => {
                        shared.send_to(client_id, line).await
                    }
                }
            }
        });
    }

    let mut next_client_id: usize = 0;
    loop {
        let (stream, _addr) = listener.accept().await?;
        let client_id = next_client_id;
        next_client_id += 1;

        let shared = Arc::clone(&shared);
        let command_tx = command_tx.clone();
        tokio::spawn(async move {
            handle_client(shared, command_tx, stream, client_id).await;
        });
    }
}

async fn handle_client(
    shared: Arc<Shared>,
    command_tx: mpsc::Sender<InboundCommand>,
    stream: TcpStream,
    client_id: usize,
) {
    let (read_half, mut write_half) = stream.into_split();
    let (tx, mut rx) = mpsc::unbounded_channel::<String>();

    {
        let mut clients = shared.clients.write().await;
        clients.push(ClientHandle {
            id: client_id,
            handshaken: false,
            stream_observations: false,
            last_seq: None,
            tx,
        });
    }
    shared.status.clients.fetch_add(1, Ordering::Relaxed);

    // Writer: drain queued lines to the socket.
    let writer = tokio::spawn(async move {
        while let Some(line) = rx.recv().await {
            if write_half.write_all(line.as_bytes()).await.is_err() {
                break;
            }
            if write_half.write_all(b"\n").await.is_err() {
                break;
            }
        }
    });

    let mut lines = BufReader::new(read_half).lines();
    while let Ok(Some(line)) = lines.next_line().await {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match serde_json::from_str::<ClientMessage>(line) {
            Ok(ClientMessage::Hello {
                seq,
                stream_observations,
                ..
            }) => {
                handle_hello(&shared, client_id, seq, stream_observations).await;
            }
            Ok(ClientMessage::Command { seq, command }) => {
                handle_command(&shared, &command_tx, client_id, seq, command).await;
            }
            Err(err) => {
                let reply = ServerMessage::Error {
                    seq: shared.next_seq(),
                    code: "bad_message".to_string(),
                    message: err.to_string(),
                };
                shared.send_to(client_id, reply.to_line()).await;
            }
        }
    }

    disconnect(&shared, client_id).await;
    writer.abort();
}

async fn handle_hello(shared: &Arc<Shared>, client_id: usize, seq: u64, stream_observations: bool) {
    {
        let mut clients = shared.clients.write().await;
        if let Some(client) = clients.iter_mut().find(|c| c.id == client_id) {
            client.handshaken = true;
            client.stream_observations = stream_observations;
            client.last_seq = Some(seq);
        }
    }

    let role = {
        let mut controller = shared.controller.write().await;
        if controller.is_none() {
            *controller = Some(client_id);
            shared
                .status
                .controller
                .store(client_id as i64, Ordering::Relaxed);
            Role::Controller
        } else if *controller == Some(client_id) {
            Role::Controller
        } else {
            Role::Observer
        }
    };

    let welcome = ServerMessage::Welcome {
        seq: shared.next_seq(),
        protocol_version: PROTOCOL_VERSION.to_string(),
        role,
        grid_width: shared.config.grid_width,
        grid_height: shared.config.grid_height,
    };
    shared.send_to(client_id, welcome.to_line()).await;
}

async fn handle_command(
    shared: &Arc<Shared>,
    command_tx: &mpsc::Sender<InboundCommand>,
    client_id: usize,
    seq: u64,
    command: CommandPayload,
) {
    let rejection = {
        let mut clients = shared.clients.write().await;
        let Some(client) = clients.iter_mut().find(|c| c.id == client_id) else {
            return;
        };
        if !client.handshaken {
            Some(("not_ready", "hello required before commands"))
        } else if matches!(client.last_seq, Some(prev) if seq <= prev) {
            Some(("stale_seq", "sequence number must increase"))
        } else {
            client.last_seq = Some(seq);
            None
        }
    };

    let rejection = match rejection {
        Some(r) => Some(r),
        None => {
            let controller = shared.controller.read().await;
            if *controller != Some(client_id) {
                Some(("not_controller", "only the controller may command"))
            } else {
                None
            }
        }
    };

    if let Some((code, message)) = rejection {
        let reply = ServerMessage::Error {
            seq: shared.next_seq(),
            code: code.to_string(),
            message: message.to_string(),
        };
        shared.send_to(client_id, reply.to_line()).await;
        return;
    }

    let inbound = InboundCommand {
        client_id,
        seq,
        command: ClientCommand::from(command),
    };
    let reply = match command_tx.try_send(inbound) {
        Ok(()) => ServerMessage::Ack {
            seq: shared.next_seq(),
            command_seq: seq,
        },
        Err(_) => ServerMessage::Error {
            seq: shared.next_seq(),
            code: "overloaded".to_string(),
            message: "command queue is full".to_string(),
        },
    };
    shared.send_to(client_id, reply.to_line()).await;
}

async fn disconnect(shared: &Arc<Shared>, client_id: usize) {
    {
        let mut clients = shared.clients.write().await;
        clients.retain(|c| c.id != client_id);
    }
    shared.status.clients.fetch_sub(1, Ordering::Relaxed);

    let mut controller = shared.controller.write().await;
    if *controller == Some(client_id) {
        *controller = None;
        shared.status.controller.store(-1, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::CommandPayload;

    async fn start_test_server(
        max_pending: usize,
    ) -> (
        SocketAddr,
        mpsc::Receiver<InboundCommand>,
        mpsc::UnboundedSender<OutboundMessage>,
        Arc<ServerStatus>,
    ) {
        let config = ServerConfig {
            port: 0,
            max_pending_commands: max_pending,
            ..ServerConfig::default()
        };
        let (cmd_tx, cmd_rx) = mpsc::channel(max_pending.max(1));
        let (out_tx, out_rx) = mpsc::unbounded_channel();
        let status = Arc::new(ServerStatus::new());
        let (ready_tx, ready_rx) = oneshot::channel();

        let server_status = Arc::clone(&status);
        tokio::spawn(async move {
            let _ = run_server(config, cmd_tx, out_rx, server_status, Some(ready_tx)).await;
        });

        let addr = ready_rx.await.expect("server did not report its address");
        (addr, cmd_rx, out_tx, status)
    }

    async fn connect(addr: SocketAddr) -> (tokio::net::tcp::OwnedWriteHalf, tokio::io::Lines<BufReader<tokio::net::tcp::OwnedReadHalf>>) {
        let stream = TcpStream::connect(addr).await.unwrap();
        let (read, write) = stream.into_split();
        (write, BufReader::new(read).lines())
    }

    async fn send_line(write: &mut tokio::net::tcp::OwnedWriteHalf, line: &str) {
        write.write_all(line.as_bytes()).await.unwrap();
        write.write_all(b"\n").await.unwrap();
    }

    #[tokio::test]
    async fn test_hello_assigns_controller_and_welcomes() {
        let (addr, _cmd_rx, _out_tx, status) = start_test_server(4).await;
        let (mut write, mut lines) = connect(addr).await;

        send_line(
            &mut write,
            r#"{"type":"hello","seq":1,"client":{"name":"bot","version":"0.1"}}"#,
        )
        .await;

        let welcome = lines.next_line().await.unwrap().unwrap();
        assert!(welcome.contains(r#""type":"welcome""#));
        assert!(welcome.contains(r#""role":"controller""#));
        assert_eq!(status.client_count(), 1);
        assert_eq!(status.controller_id(), Some(0));
    }

    #[tokio::test]
    async fn test_second_client_is_observer() {
        let (addr, _cmd_rx, _out_tx, _status) = start_test_server(4).await;

        let (mut w1, mut l1) = connect(addr).await;
        send_line(
            &mut w1,
            r#"{"type":"hello","seq":1,"client":{"name":"a","version":"0"}}"#,
        )
        .await;
        let _ = l1.next_line().await.unwrap().unwrap();

        let (mut w2, mut l2) = connect(addr).await;
        send_line(
            &mut w2,
            r#"{"type":"hello","seq":1,"client":{"name":"b","version":"0"}}"#,
        )
        .await;
        let welcome = l2.next_line().await.unwrap().unwrap();
        assert!(welcome.contains(r#""role":"observer""#));
    }

    #[tokio::test]
    async fn test_controller_command_is_forwarded_and_acked() {
        let (addr, mut cmd_rx, _out_tx, _status) = start_test_server(4).await;
        let (mut write, mut lines) = connect(addr).await;

        send_line(
            &mut write,
            r#"{"type":"hello","seq":1,"client":{"name":"bot","version":"0"}}"#,
        )
        .await;
        let _ = lines.next_line().await.unwrap().unwrap();

        send_line(
            &mut write,
            r#"{"type":"command","seq":2,"command":"activate","x":2,"y":1}"#,
        )
        .await;

        let inbound = cmd_rx.recv().await.unwrap();
        assert_eq!(inbound.client_id, 0);
        assert_eq!(inbound.seq, 2);
        assert_eq!(
            inbound.command,
            ClientCommand::from(CommandPayload::Activate { x: 2, y: 1 })
        );

        let ack = lines.next_line().await.unwrap().unwrap();
        assert!(ack.contains(r#""type":"ack""#));
        assert!(ack.contains(r#""command_seq":2"#));
    }

    #[tokio::test]
    async fn test_command_before_hello_is_rejected() {
        let (addr, _cmd_rx, _out_tx, _status) = start_test_server(4).await;
        let (mut write, mut lines) = connect(addr).await;

        send_line(&mut write, r#"{"type":"command","seq":1,"command":"restart"}"#).await;
        let reply = lines.next_line().await.unwrap().unwrap();
        assert!(reply.contains("not_ready"));
    }

    #[tokio::test]
    async fn test_stale_sequence_is_rejected() {
        let (addr, _cmd_rx, _out_tx, _status) = start_test_server(4).await;
        let (mut write, mut lines) = connect(addr).await;

        send_line(
            &mut write,
            r#"{"type":"hello","seq":5,"client":{"name":"bot","version":"0"}}"#,
        )
        .await;
        let _ = lines.next_line().await.unwrap().unwrap();

        send_line(&mut write, r#"{"type":"command","seq":5,"command":"restart"}"#).await;
        let reply = lines.next_line().await.unwrap().unwrap();
        assert!(reply.contains("stale_seq"));
    }

    #[tokio::test]
    async fn test_broadcast_reaches_streaming_clients() {
        let (addr, _cmd_rx, out_tx, _status) = start_test_server(4).await;
        let (mut write, mut lines) = connect(addr).await;

        send_line(
            &mut write,
            r#"{"type":"hello","seq":1,"client":{"name":"bot","version":"0"}}"#,
        )
        .await;
        let _ = lines.next_line().await.unwrap().unwrap();

        out_tx
            .send(OutboundMessage::Broadcast {
                line: r#"{"type":"observation","seq":1}"#.to_string(),
            })
            .unwrap();

        let observation = lines.next_line().await.unwrap().unwrap();
        assert!(observation.contains("observation"));
    }

    #[tokio::test]
    async fn test_malformed_line_gets_error_reply() {
        let (addr, _cmd_rx, _out_tx, _status) = start_test_server(4).await;
        let (mut write, mut lines) = connect(addr).await;

        send_line(&mut write, "this is not json").await;
        let reply = lines.next_line().await.unwrap().unwrap();
        assert!(reply.contains("bad_message"));
    }
}
