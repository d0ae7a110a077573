//! End-to-end: drive the engine through the adapter protocol.
//!
//! Spins up the real TCP server, connects a client, and plays the game-loop
//! role by hand: commands come out of the bounded channel, the engine
//! resolves them, and an observation goes back over the broadcast path.

use std::sync::Arc;

use serde_json::Value;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::sync::{mpsc, oneshot};

use tui_blast::adapter::{
    run_server, ClientCommand, InboundCommand, Observation, OutboundMessage, ServerConfig,
    ServerMessage, ServerStatus,
};
use tui_blast::core::NullSink;
use tui_blast::engine::{EngineContext, GameSession};
use tui_blast::types::{EngineConfig, TICK_MS};

type ClientLines = tokio::io::Lines<BufReader<tokio::net::tcp::OwnedReadHalf>>;

async fn start_server() -> (
    std::net::SocketAddr,
    mpsc::Receiver<InboundCommand>,
    mpsc::UnboundedSender<OutboundMessage>,
) {
    let config = ServerConfig {
        port: 0,
        ..ServerConfig::default()
    };
    let (cmd_tx, cmd_rx) = mpsc::channel(8);
    let (out_tx, out_rx) = mpsc::unbounded_channel();
    let (ready_tx, ready_rx) = oneshot::channel();
    let status = Arc::new(ServerStatus::new());

    tokio::spawn(async move {
        let _ = run_server(config, cmd_tx, out_rx, status, Some(ready_tx)).await;
    });

    let addr = ready_rx.await.expect("server address");
    (addr, cmd_rx, out_tx)
}

async fn handshake(addr: std::net::SocketAddr) -> (tokio::net::tcp::OwnedWriteHalf, ClientLines, Value) {
    let stream = TcpStream::connect(addr).await.unwrap();
    let (read, mut write) = stream.into_split();
    let mut lines = BufReader::new(read).lines();

    write
        .write_all(b"{\"type\":\"hello\",\"seq\":1,\"client\":{\"name\":\"e2e\",\"version\":\"0.1\"}}\n")
        .await
        .unwrap();
    let welcome: Value =
        serde_json::from_str(&lines.next_line().await.unwrap().unwrap()).unwrap();
    (write, lines, welcome)
}

fn observation_line(context: &EngineContext, session: &GameSession, seq: u64) -> String {
    let snap = context.scheduler().snapshot();
    ServerMessage::Observation {
        seq,
        observation: Observation {
            width: snap.width,
            height: snap.height,
            cells: snap.cells.clone(),
            phase: snap.phase.as_str().to_string(),
            score: session.score(),
            moves_left: session.moves_left(),
            game_over: session.is_over(),
            seed: snap.seed,
        },
    }
    .to_line()
}

#[tokio::test]
async fn controller_activation_clears_and_observes() {
    let (addr, mut cmd_rx, out_tx) = start_server().await;
    let (mut write, mut lines, welcome) = handshake(addr).await;
    assert_eq!(welcome["role"], "controller");

    // Single-kind palette: every cell belongs to one big group, so any
    // activation clears the whole grid.
    let config = EngineConfig {
        palette_size: 1,
        ..EngineConfig::default()
    };
    let mut visuals = NullSink;
    let mut context = EngineContext::new(config, 7);
    context.initialize(&mut visuals);

    write
        .write_all(b"{\"type\":\"command\",\"seq\":2,\"command\":\"activate\",\"x\":3,\"y\":3}\n")
        .await
        .unwrap();
    let ack: Value = serde_json::from_str(&lines.next_line().await.unwrap().unwrap()).unwrap();
    assert_eq!(ack["type"], "ack");
    assert_eq!(ack["command_seq"], 2);

    // Game-loop side: execute the command and settle the cascade.
    let inbound = cmd_rx.recv().await.unwrap();
    let ClientCommand::Activate { x, y } = inbound.command else {
        panic!("expected an activate command");
    };
    context.activate(x, y, &mut visuals).unwrap();
    while !context.scheduler().phase().is_idle() {
        context.tick(TICK_MS, &mut visuals);
    }

    let session = *context.session();
    out_tx
        .send(OutboundMessage::Broadcast {
            line: observation_line(&context, &session, 1),
        })
        .unwrap();

    let observation: Value =
        serde_json::from_str(&lines.next_line().await.unwrap().unwrap()).unwrap();
    assert_eq!(observation["type"], "observation");
    // 36 tiles cleared at 10 points each, one move spent.
    assert_eq!(observation["score"], 360);
    assert_eq!(observation["moves_left"], 19);
    assert_eq!(observation["game_over"], false);
    assert_eq!(observation["phase"], "idle");
    // Refill left no gaps.
    let cells = observation["cells"].as_array().unwrap();
    assert_eq!(cells.len(), 36);
    assert!(cells.iter().all(|c| c.as_u64().unwrap() > 0));
}

#[test]
fn welcome_reports_grid_dimensions() {
    tokio_test::block_on(async {
        let (addr, _cmd_rx, _out_tx) = start_server().await;
        let (_write, _lines, welcome) = handshake(addr).await;
        assert_eq!(welcome["type"], "welcome");
        assert_eq!(welcome["grid_width"], 6);
        assert_eq!(welcome["grid_height"], 6);
        assert_eq!(welcome["protocol_version"], "1.0.0");
    });
}
