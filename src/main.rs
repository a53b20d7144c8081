mod clock;
mod config;
mod controller;
mod error;
mod external;
mod logging;
mod render;
mod simulations;

use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::sync::mpsc::Receiver;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    cursor, execute, terminal,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
};
use tracing::{info, warn};

use config::Config;
use controller::Controller;
use external::{ControlMessage, ControlSource};
use render::{ColorDepth, ColorMode, RenderMode};

/// Poll interval while no frame is scheduled
const IDLE_POLL: Duration = Duration::from_millis(100);

#[derive(Parser)]
#[command(name = "backdrop", version, about = "Themed particle and wave backdrops for the terminal")]
struct Cli {
    /// Theme to play (use --list to see all)
    theme: Option<String>,

    /// Palette
    #[arg(short, long, value_enum)]
    mode: Option<ColorMode>,

    /// Render mode
    #[arg(short, long, value_enum)]
    render: Option<RenderMode>,

    /// Terminal color depth
    #[arg(short, long, value_enum)]
    color: Option<ColorDepth>,

    /// Target FPS (1-120)
    #[arg(short, long)]
    fps: Option<u32>,

    /// Fixed random seed for reproducible runs
    #[arg(long)]
    seed: Option<u64>,

    /// Hide the status bar for pure animation mode
    #[arg(long)]
    clean: bool,

    /// List available themes and exit
    #[arg(short, long)]
    list: bool,

    /// Read JSON control messages from stdin ("-") or a watched file
    #[arg(long, value_name = "stdin|PATH")]
    control: Option<ControlSource>,

    /// Write logs to this file (level from BACKDROP_LOG)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Write a commented config template and exit
    #[arg(long)]
    init_config: bool,

    /// Print the config file path and exit
    #[arg(long)]
    show_config: bool,
}

/// Effective settings: CLI flags over the config file over defaults.
#[derive(Debug, PartialEq)]
struct Settings {
    theme: String,
    mode: ColorMode,
    render: RenderMode,
    color: ColorDepth,
    fps: u32,
    clean: bool,
    seed: Option<u64>,
    log_file: Option<PathBuf>,
}

impl Settings {
    fn resolve(cli: &Cli, config: Config) -> Self {
        Settings {
            theme: cli
                .theme
                .clone()
                .or(config.theme)
                .unwrap_or_else(|| simulations::ThemeKey::Aurora.to_string()),
            mode: cli.mode.or(config.mode).unwrap_or_default(),
            render: cli.render.or(config.render).unwrap_or_default(),
            color: cli.color.or(config.color).unwrap_or_default(),
            fps: cli.fps.or(config.fps).unwrap_or(30),
            clean: cli.clean || config.clean.unwrap_or(false),
            seed: cli.seed.or(config.seed),
            log_file: cli.log_file.clone().or(config.log_file),
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.show_config {
        match config::config_path() {
            Some(path) => println!("{}", path.display()),
            None => println!("No config directory available"),
        }
        return Ok(());
    }

    if cli.init_config {
        let path = config::write_default_config().context("failed to write config template")?;
        println!("Wrote {}", path.display());
        return Ok(());
    }

    if cli.list {
        println!("Available themes:");
        for entry in &simulations::THEMES {
            println!("  {:<10} {}", entry.key, entry.description);
        }
        println!("\nModes: light, dark");
        println!("Render modes: braille, half-block");
        println!("Color depths: mono, ansi16, ansi256, true-color");
        return Ok(());
    }

    let settings = Settings::resolve(&cli, config::load_config());
    logging::init(settings.log_file.as_deref()).context("failed to open log file")?;
    info!(theme = %settings.theme, fps = settings.fps, "starting");

    let control = cli
        .control
        .clone()
        .map(external::spawn_reader)
        .transpose()
        .context("failed to start control reader")?;

    // Setup terminal
    terminal::enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, terminal::EnterAlternateScreen, cursor::Hide)?;

    let mut writer = BufWriter::with_capacity(256 * 1024, stdout);
    let mut player = Player::new(settings);
    let result = player.run(&mut writer, control.as_ref());

    // Cleanup
    execute!(writer, cursor::Show, terminal::LeaveAlternateScreen)?;
    terminal::disable_raw_mode()?;

    info!(frames = player.controller.frame_index(), "exiting");
    result
}

/// Terminal host for the controller: owns the presentation settings and
/// turns terminal cells into canvas pixels.
struct Player {
    controller: Controller,
    render_mode: RenderMode,
    depth: ColorDepth,
    hide_status: bool,
    cols: u16,
    rows: u16,
}

enum Flow {
    Continue,
    Quit,
}

impl Player {
    fn new(settings: Settings) -> Self {
        Player {
            controller: Controller::new(&settings.theme, settings.mode, settings.fps, settings.seed),
            render_mode: settings.render,
            depth: settings.color,
            hide_status: settings.clean,
            cols: 0,
            rows: 0,
        }
    }

    /// Rows available to the animation, one is reserved for the status bar
    fn display_rows(&self) -> usize {
        if self.hide_status {
            self.rows as usize
        } else {
            (self.rows as usize).saturating_sub(1)
        }
    }

    /// Push the current terminal size through to the controller.
    fn relayout(&mut self) {
        let dims = self.render_mode.pixel_dimensions(self.cols as usize, self.display_rows());
        self.controller.resize(dims);
    }

    fn run<W: Write>(&mut self, out: &mut W, control: Option<&Receiver<ControlMessage>>) -> Result<()> {
        (self.cols, self.rows) = terminal::size().unwrap_or_else(|e| {
            warn!(error = %e, "terminal size unavailable");
            (0, 0)
        });
        self.relayout();
        self.controller.enable();

        loop {
            // Wait for input until the next frame is due
            let timeout = self.controller.until_due(Instant::now()).unwrap_or(IDLE_POLL);
            if event::poll(timeout)? {
                loop {
                    if let Flow::Quit = self.handle_event(event::read()?, out) {
                        return Ok(());
                    }
                    if !event::poll(Duration::ZERO)? {
                        break;
                    }
                }
            }

            if let Some(rx) = control {
                for msg in rx.try_iter() {
                    msg.apply(&mut self.controller);
                    if !self.controller.is_enabled() {
                        clear_screen(out);
                    }
                }
            }

            // Verify terminal size hasn't changed before drawing;
            // a frame built for the old size would garble the screen
            if let Ok((cols, rows)) = terminal::size()
                && (cols, rows) != (self.cols, self.rows)
            {
                (self.cols, self.rows) = (cols, rows);
                self.relayout();
                clear_screen(out);
                continue;
            }

            self.draw_frame(out, Instant::now());
        }
    }

    /// Render and write the frame if one is due. Returns whether a frame
    /// reached the terminal; a failed write skips the frame, the clock has
    /// already moved on.
    fn draw_frame<W: Write>(&mut self, out: &mut W, now: Instant) -> bool {
        let Some(canvas) = self.controller.frame(now) else {
            return false;
        };
        let frame = render::encode(canvas, self.render_mode, self.depth);
        let status = (!self.hide_status).then(|| self.status_line());

        if let Err(e) = present(out, &frame, status.as_deref(), self.rows) {
            warn!(error = %e, "frame write failed, skipping");
            return false;
        }
        true
    }

    fn handle_event<W: Write>(&mut self, event: Event, out: &mut W) -> Flow {
        match event {
            Event::Resize(w, h) => {
                (self.cols, self.rows) = (w, h);
                self.relayout();
                clear_screen(out);
            }
            Event::Key(KeyEvent {
                code,
                kind: KeyEventKind::Press,
                ..
            }) => match code {
                KeyCode::Char('q') | KeyCode::Esc => return Flow::Quit,
                KeyCode::Right | KeyCode::Char('n') => self.controller.cycle_theme(1),
                KeyCode::Left | KeyCode::Char('p') => self.controller.cycle_theme(-1),
                KeyCode::Char('m') => {
                    let mode = self.controller.mode().toggled();
                    self.controller.set_mode(mode);
                }
                KeyCode::Char(' ') => {
                    if self.controller.is_enabled() {
                        self.controller.disable();
                        clear_screen(out);
                    } else {
                        self.controller.enable();
                    }
                }
                // Cycle render mode
                KeyCode::Char('r') => {
                    self.render_mode = self.render_mode.next();
                    self.relayout();
                    clear_screen(out);
                }
                // Cycle color depth
                KeyCode::Char('c') => self.depth = self.depth.next(),
                // Toggle status bar
                KeyCode::Char('h') => {
                    self.hide_status = !self.hide_status;
                    self.relayout();
                    clear_screen(out);
                }
                _ => {}
            },
            _ => {}
        }
        Flow::Continue
    }

    fn status_line(&self) -> String {
        let name = self.controller.simulation_name().unwrap_or("idle");
        let status = format!(
            " {} ({}) | {:?} | {:?} | {:?} | {:.0} fps | [←/→] theme  [m] mode  [space] pause  [r] render  [c] color  [h] hide  [q] quit ",
            name,
            self.controller.record_count(),
            self.controller.mode(),
            self.render_mode,
            self.depth,
            self.controller.measured_fps(),
        );
        let w = self.cols as usize;
        let truncated: String = status.chars().take(w).collect();
        format!("{:<width$}", truncated, width = w)
    }
}

/// Write one frame and the optional status bar, then flush once.
fn present(out: &mut impl Write, frame: &str, status: Option<&str>, rows: u16) -> io::Result<()> {
    out.write_all(b"\x1b[H")?;
    out.write_all(frame.as_bytes())?;
    if let Some(status) = status {
        write!(out, "\x1b[{};1H\x1b[7m{}\x1b[0m", rows, status)?;
    }
    out.flush()
}

/// Wipe the screen. A failure only leaves stale cells until the next frame.
fn clear_screen(out: &mut impl Write) {
    if let Err(e) = out.write_all(b"\x1b[0m\x1b[2J\x1b[H").and_then(|()| out.flush()) {
        warn!(error = %e, "screen clear failed");
    }
}
