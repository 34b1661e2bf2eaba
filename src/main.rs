use std::fs::File;
use std::io::{self, Stdout, Write};
use std::sync::Mutex;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::event::{self, Event as TermEvent, KeyCode, KeyEventKind};
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use crossterm::terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{ExecutableCommand, QueueableCommand};
use tracing_subscriber::EnvFilter;
use unicode_width::UnicodeWidthStr;

use pacbot::ghost::GhostKind;
use pacbot::{Dir, Event, Phase, Pos, RunSettings, Session, Snapshot, Tile};

const CELL_W: usize = 2;

#[derive(Clone, Copy, PartialEq)]
enum Glyph {
    Player { facing: Dir, open: bool },
    Ghost,
    Frightened,
    Wall,
    Warp,
    Empty,
    Pellet,
    Power,
}

impl Glyph {
    fn text(self) -> &'static str {
        match self {
            Glyph::Player { open: false, .. } => "●",
            Glyph::Player { facing, open: true } => match facing {
                Dir::Right => "ᗧ",
                Dir::Left => "ᗤ",
                Dir::Up => "ᗢ",
                Dir::Down => "ᗣ",
            },
            Glyph::Ghost => "👻",
            Glyph::Frightened => "😱",
            Glyph::Wall => "██",
            Glyph::Warp => "░░",
            Glyph::Empty => "  ",
            Glyph::Pellet => "·",
            Glyph::Power => "●",
        }
    }
}

type Cell = (Glyph, Color);

/// Remembers what is on screen so each frame only redraws changed cells.
/// An empty `drawn` forces a full redraw.
#[derive(Default)]
struct Screen {
    drawn: Vec<Cell>,
    hud: String,
    origin: (u16, u16),
}

fn main() -> Result<()> {
    let settings = RunSettings::from_env();
    init_logging()?;
    let mut session = Session::classic(settings.seed).context("loading built-in levels")?;

    let mut stdout = io::stdout();
    terminal::enable_raw_mode()?;
    stdout.execute(EnterAlternateScreen)?;
    stdout.execute(Hide)?;

    let result = run(&mut stdout, &mut session, settings);

    stdout.execute(Show)?;
    stdout.execute(LeaveAlternateScreen)?;
    terminal::disable_raw_mode()?;
    result?;

    println!("Final score: {} (level {})", session.score(), session.level() + 1);
    Ok(())
}

/// Logs go to a file so they do not tear the alternate screen.
fn init_logging() -> Result<()> {
    let Ok(filter) = std::env::var("PACMAN_LOG") else {
        return Ok(());
    };
    let path = std::env::var("PACMAN_LOG_FILE").unwrap_or_else(|_| "pacman.log".to_string());
    let file = File::create(&path).with_context(|| format!("creating log file {path}"))?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn run(stdout: &mut Stdout, session: &mut Session, settings: RunSettings) -> Result<()> {
    let mut screen = Screen::default();
    let frame_time = Duration::from_micros(1_000_000 / settings.render_fps.max(1));
    let tick_time = Duration::from_millis(settings.tick_ms);
    let mut last_tick = Instant::now();
    let mut status = String::new();
    let mut end_frames = 0;

    loop {
        let frame_start = Instant::now();
        while event::poll(Duration::from_millis(0))? {
            if let TermEvent::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press && key.code == KeyCode::Char('q') {
                    return Ok(());
                }
            }
        }

        if last_tick.elapsed() >= tick_time {
            last_tick = Instant::now();
            if session.phase() == Phase::Playing {
                session.tick();
                for event in session.drain_events() {
                    if let Some(line) = describe(&event) {
                        status = line;
                    }
                }
            } else {
                end_frames += 1;
                if end_frames >= session.tuning().end_screen_ticks {
                    return Ok(());
                }
            }
        }

        let snapshot = session.snapshot();
        render(stdout, &snapshot, &status, &mut screen)?;

        let elapsed = frame_start.elapsed();
        if elapsed < frame_time {
            thread::sleep(frame_time - elapsed);
        }
    }
}

fn describe(event: &Event) -> Option<String> {
    match event {
        Event::PowerPelletEaten { .. } => Some("Power pellet!".to_string()),
        Event::GhostEaten { kind, points } => Some(format!("Ate {} +{points}", kind.name())),
        Event::PowerModeEnded => Some(String::new()),
        Event::LevelCleared { next_level } => Some(format!("Level {} start!", next_level + 1)),
        Event::GameOver { score } => Some(format!("GAME OVER - Final Score: {score}")),
        Event::Won { score } => Some(format!("YOU WIN - Final Score: {score}")),
        _ => None,
    }
}

fn render(stdout: &mut Stdout, snap: &Snapshot<'_>, status: &str, screen: &mut Screen) -> io::Result<()> {
    let (width, height) = (snap.grid.cols(), snap.grid.rows());
    let needed = ((width * CELL_W) as u16, (height + 2) as u16);
    let (term_w, term_h) = terminal::size()?;
    if term_w < needed.0 || term_h < needed.1 {
        stdout.queue(Clear(ClearType::All))?;
        stdout.queue(MoveTo(0, 0))?;
        stdout.queue(Print(format!("Terminal too small: need {}x{}.", needed.0, needed.1)))?;
        screen.drawn.clear();
        return stdout.flush();
    }

    let origin = ((term_w - needed.0) / 2, (term_h - needed.1) / 2 + 1);
    if origin != screen.origin || screen.drawn.len() != width * height {
        stdout.queue(Clear(ClearType::All))?;
        screen.origin = origin;
        screen.drawn.clear();
        screen.hud.clear();
    }
    let (x0, y0) = origin;

    let power = if snap.power_mode {
        format!("  Power: {}", snap.power_timer)
    } else {
        String::new()
    };
    let hud = format!(
        "Score: {}  Level: {}  Pellets: {}{power}  (q to quit)",
        snap.score,
        snap.level + 1,
        snap.grid.pellets_left(),
    );
    if hud != screen.hud {
        stdout.queue(MoveTo(x0, y0 - 1))?;
        stdout.queue(Clear(ClearType::CurrentLine))?;
        stdout.queue(Print(&hud))?;
        screen.hud = hud;
    }

    let full = screen.drawn.is_empty();
    for (idx, (pos, tile)) in snap.grid.iter().enumerate() {
        let cell = cell_for(snap, pos, tile);
        if !full && screen.drawn[idx] == cell {
            continue;
        }
        let text = cell.0.text();
        let pad = CELL_W.saturating_sub(text.width());
        stdout.queue(MoveTo(x0 + (pos.col * CELL_W) as u16, y0 + pos.row as u16))?;
        stdout.queue(SetForegroundColor(cell.1))?;
        stdout.queue(Print(format!("{text}{}", " ".repeat(pad))))?;
        if full {
            screen.drawn.push(cell);
        } else {
            screen.drawn[idx] = cell;
        }
    }

    let status_color = match snap.phase {
        Phase::Playing => Color::Yellow,
        Phase::GameOver => Color::Red,
        Phase::Won => Color::Green,
    };
    stdout.queue(MoveTo(x0, y0 + height as u16))?;
    stdout.queue(Clear(ClearType::CurrentLine))?;
    stdout.queue(SetForegroundColor(status_color))?;
    stdout.queue(Print(status))?;
    stdout.queue(ResetColor)?;
    stdout.flush()
}

fn ghost_color(kind: GhostKind) -> Color {
    match kind {
        GhostKind::Blinky => Color::Red,
        GhostKind::Pinky => Color::Magenta,
        GhostKind::Clyde => Color::DarkYellow,
        GhostKind::Inky => Color::Cyan,
    }
}

fn cell_for(snap: &Snapshot<'_>, pos: Pos, tile: Tile) -> Cell {
    if pos == snap.pacman {
        let glyph = Glyph::Player {
            facing: snap.facing,
            open: snap.mouth_open,
        };
        return (glyph, Color::Yellow);
    }
    if let Some(ghost) = snap.ghosts.iter().find(|g| g.visible && g.pos == pos) {
        return if ghost.frightened {
            (Glyph::Frightened, Color::Blue)
        } else {
            (Glyph::Ghost, ghost_color(ghost.kind))
        };
    }
    match tile {
        Tile::Wall => (Glyph::Wall, Color::Blue),
        Tile::Pellet => (Glyph::Pellet, Color::White),
        Tile::Power => (Glyph::Power, Color::White),
        Tile::Empty if is_warp_mouth(snap, pos) => (Glyph::Warp, Color::DarkMagenta),
        Tile::Empty => (Glyph::Empty, Color::Reset),
    }
}

fn is_warp_mouth(snap: &Snapshot<'_>, pos: Pos) -> bool {
    snap.grid
        .warp_endpoints()
        .is_some_and(|(left, right)| pos == left || pos == right)
}
