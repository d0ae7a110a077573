//! Terminal tile-burst runner (default binary).
//!
//! Owns the cooperative scheduling loop: poll input until the next tick
//! deadline, advance the engine by a fixed 16ms step, render, and bridge the
//! driver adapter. The engine itself never blocks; in-flight moves advance
//! one tick at a time.

use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use anyhow::Result;
use crossterm::event::{self, Event, KeyEventKind, MouseButton, MouseEventKind};

use tui_blast::adapter::{
    Adapter, ClientCommand, Observation, OutboundMessage, ServerMessage,
};
use tui_blast::core::EngineSnapshot;
use tui_blast::engine::{EngineContext, GameSession};
use tui_blast::input::{should_quit, Cursor, InputHandler};
use tui_blast::term::{
    AdapterStatusView, FrameBuffer, GameView, SessionView, TerminalRenderer, TileSprites, Viewport,
};
use tui_blast::types::{EngineConfig, GameCommand, TICK_MS};

fn main() -> Result<()> {
    let mut term = TerminalRenderer::new();
    term.enter()?;

    let result = run(&mut term);

    // Always try to restore terminal state.
    let _ = term.exit();
    result
}

fn run(term: &mut TerminalRenderer) -> Result<()> {
    let config = EngineConfig::default();
    let mut context = EngineContext::new(config, wall_clock_seed());
    let mut sprites = TileSprites::new();
    context.initialize(&mut sprites);

    let mut adapter = Adapter::start_from_env(config.width, config.height);
    let view = GameView::default();
    let mut input = InputHandler::new();
    let mut cursor = Cursor::new(config.width, config.height);

    let mut fb = FrameBuffer::new(0, 0);
    let mut snap = EngineSnapshot::default();
    let mut out_seq: u64 = 0;
    let mut known_clients: usize = 0;

    let mut last_tick = Instant::now();
    let tick_duration = Duration::from_millis(TICK_MS as u64);

    loop {
        // Render.
        let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
        let viewport = Viewport::new(w, h);
        context.scheduler().snapshot_into(&mut snap);
        let session_view = SessionView {
            score: context.session().score(),
            moves_left: context.session().moves_left(),
            game_over: context.session().is_over(),
        };
        let adapter_status = adapter.as_ref().map(|a| {
            let status = a.status();
            AdapterStatusView {
                client_count: status.client_count as u16,
                controller_id: status.controller_id,
            }
        });
        view.render_into(
            &snap,
            &sprites,
            &session_view,
            Some((cursor.x(), cursor.y())),
            adapter_status.as_ref(),
            viewport,
            &mut fb,
        );
        term.draw(&fb)?;

        // Input with timeout until next tick.
        let timeout = tick_duration
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_secs(0));

        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) => match key.kind {
                    KeyEventKind::Press => {
                        if should_quit(key) {
                            return Ok(());
                        }
                        if let Some(command) = input.handle_key_press(key.code) {
                            apply_command(command, &mut cursor, &mut context, &mut sprites);
                        }
                    }
                    KeyEventKind::Repeat => {
                        // Ignore terminal auto-repeat; the input handler owns repeats.
                    }
                    KeyEventKind::Release => {
                        input.handle_key_release(key.code);
                    }
                },
                Event::Mouse(mouse) => {
                    if let MouseEventKind::Down(MouseButton::Left) = mouse.kind {
                        if let Some((x, y)) = view.hit_test(
                            config.width,
                            config.height,
                            viewport,
                            mouse.column,
                            mouse.row,
                        ) {
                            let _ = context.activate(x, y, &mut sprites);
                        }
                    }
                }
                Event::Resize(..) => term.invalidate(),
                _ => {}
            }
        }

        // Tick.
        if last_tick.elapsed() >= tick_duration {
            last_tick = Instant::now();

            for command in input.update(TICK_MS) {
                apply_command(command, &mut cursor, &mut context, &mut sprites);
            }

            if let Some(adapter) = adapter.as_mut() {
                drain_adapter_commands(adapter, &mut context, &mut sprites, &mut out_seq);
            }

            let was_busy = !context.scheduler().phase().is_idle();
            context.tick(TICK_MS, &mut sprites);
            let settled = was_busy && context.scheduler().phase().is_idle();
            let _ = context.take_resolved();

            if let Some(adapter) = adapter.as_ref() {
                // Observations go out when a move settles and when a new
                // client appears; the settled grid is the interesting state.
                let clients = adapter.status().client_count;
                if settled || clients > known_clients {
                    context.scheduler().snapshot_into(&mut snap);
                    out_seq += 1;
                    let line = ServerMessage::Observation {
                        seq: out_seq,
                        observation: observation_from(&snap, context.session()),
                    }
                    .to_line();
                    adapter.send(OutboundMessage::Broadcast { line });
                }
                known_clients = clients;
            }
        }
    }
}

fn apply_command(
    command: GameCommand,
    cursor: &mut Cursor,
    context: &mut EngineContext,
    sprites: &mut TileSprites,
) {
    match command {
        GameCommand::Activate => {
            // Rejections (busy scheduler, undersized group, spent budget)
            // are silent by design.
            let _ = context.activate(cursor.x() as i16, cursor.y() as i16, sprites);
        }
        GameCommand::Restart => context.restart(sprites),
        _ => {
            cursor.apply(command);
        }
    }
}

fn drain_adapter_commands(
    adapter: &mut Adapter,
    context: &mut EngineContext,
    sprites: &mut TileSprites,
    out_seq: &mut u64,
) {
    while let Some(inbound) = adapter.try_recv() {
        match inbound.command {
            ClientCommand::Activate { x, y } => {
                if let Err(err) = context.activate(x, y, sprites) {
                    *out_seq += 1;
                    let line = ServerMessage::Error {
                        seq: *out_seq,
                        code: err.code().to_string(),
                        message: err.message().to_string(),
                    }
                    .to_line();
                    adapter.send(OutboundMessage::ToClient {
                        client_id: inbound.client_id,
                        line,
                    });
                }
            }
            ClientCommand::Restart => context.restart(sprites),
        }
    }
}

fn observation_from(snap: &EngineSnapshot, session: &GameSession) -> Observation {
    Observation {
        width: snap.width,
        height: snap.height,
        cells: snap.cells.clone(),
        phase: snap.phase.as_str().to_string(),
        score: session.score(),
        moves_left: session.moves_left(),
        game_over: session.is_over(),
        seed: snap.seed,
    }
}

fn wall_clock_seed() -> u32 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.subsec_nanos() ^ (d.as_secs() as u32))
        .unwrap_or(1)
}
