//! cellgrid-demo: interactive exercise of the renderer.
//!
//! Arrow keys move the banner, `r` re-queries the terminal size, `d` or F1
//! dumps the next frame to `BufferDump.txt`, `q` or Esc quits.
//!
//! Usage:
//!   cargo run -p cellgrid-terminal --features demo --bin cellgrid-demo
//!   cargo run -p cellgrid-terminal --features demo --bin cellgrid-demo -- --config demo.toml

use cellgrid_terminal::{
    BorderStyle, Canvas, CanvasConfig, CanvasError, Color24, PipelineStats, StyleMask,
};
use clap::Parser;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crossterm::{cursor, execute, terminal};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "cellgrid-demo", version, about = "Interactive cellgrid renderer demo", long_about = None)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Grid width (0 = terminal width)
    #[arg(long)]
    width: Option<u16>,

    /// Grid height (0 = terminal height)
    #[arg(long)]
    height: Option<u16>,

    /// Target frames per second
    #[arg(long, default_value = "60")]
    fps: u32,

    /// Log file (level from RUST_LOG, default warn)
    #[arg(long, default_value = "cellgrid-demo.log")]
    log_file: PathBuf,
}

struct Demo {
    banner_x: i32,
    banner_y: i32,
    phase: f32,
    frames: u64,
    started: Instant,
}

impl Demo {
    fn new() -> Self {
        Self {
            banner_x: 2,
            banner_y: 2,
            phase: 0.0,
            frames: 0,
            started: Instant::now(),
        }
    }

    fn draw(&mut self, canvas: &mut Canvas, stats: &PipelineStats) {
        let width = i32::from(canvas.width());
        let height = i32::from(canvas.height());

        canvas.draw_box(0, 0, width, height, Some("cellgrid"));

        canvas.write_text(
            self.banner_x,
            self.banner_y,
            "cellgrid: arrows move, r resize, d dump, q quit",
            Color24::GREEN,
            Color24::BLACK,
            StyleMask::BOLD,
        );

        // Sine wave in the lower third, joined segment by segment.
        let mid = height * 2 / 3;
        let amplitude = (height / 6).max(1) as f32;
        let mut prev: Option<(i32, i32)> = None;
        for x in 1..width - 1 {
            let y = mid + ((x as f32 * 0.2 + self.phase).sin() * amplitude) as i32;
            if let Some((px, py)) = prev {
                canvas.draw_line(
                    px,
                    py,
                    x,
                    y,
                    '•',
                    Color24::new(0, 180, 255),
                    Color24::BLACK,
                    StyleMask::NONE,
                );
            }
            prev = Some((x, y));
        }

        let elapsed = self.started.elapsed().as_secs_f32().max(f32::EPSILON);
        let lines = [
            format!("fps      {:>8.1}", self.frames as f32 / elapsed),
            format!("rendered {:>8}", stats.frames_rendered),
            format!("bytes    {:>8}", stats.bytes_written),
            format!("cells    {:>8}", stats.last_frame.cells_written),
            format!("wait us  {:>8}", stats.producer_wait.last.as_micros()),
        ];
        let box_x = (width - 24).max(0);
        canvas.draw_box_styled(
            box_x,
            1,
            22,
            lines.len() as i32 + 2,
            Some("stats"),
            BorderStyle::Single,
            Color24::new(200, 200, 80),
        );
        for (row, line) in lines.iter().enumerate() {
            canvas.write_text(
                box_x + 2,
                2 + row as i32,
                line,
                Color24::WHITE,
                Color24::BLACK,
                StyleMask::NONE,
            );
        }

        self.phase += 0.15;
        self.frames += 1;
    }
}

fn init_logging(path: &Path) -> io::Result<()> {
    let file = std::fs::File::create(path)?;
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .init();
    Ok(())
}

fn load_config(cli: &Cli) -> Result<CanvasConfig, CanvasError> {
    let mut config = match &cli.config {
        Some(path) => CanvasConfig::from_toml_file(path)?,
        None => CanvasConfig::default(),
    };
    if let Some(width) = cli.width {
        config.width = width;
    }
    if let Some(height) = cli.height {
        config.height = height;
    }
    Ok(config)
}

fn run(cli: &Cli, config: CanvasConfig) -> Result<(), CanvasError> {
    let mut canvas = Canvas::new(config)?;
    let mut demo = Demo::new();
    let frame_time = Duration::from_secs(1) / cli.fps.max(1);

    loop {
        let frame_start = Instant::now();

        while event::poll(Duration::ZERO)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                    KeyCode::Left => demo.banner_x -= 1,
                    KeyCode::Right => demo.banner_x += 1,
                    KeyCode::Up => demo.banner_y -= 1,
                    KeyCode::Down => demo.banner_y += 1,
                    KeyCode::Char('r') => canvas.resize(0, 0)?,
                    KeyCode::Char('d') | KeyCode::F(1) => canvas.dump_buffer(1)?,
                    _ => {}
                },
                Event::Resize(width, height) => canvas.resize(width, height)?,
                _ => {}
            }
        }

        let stats = canvas.stats();
        demo.draw(&mut canvas, &stats);
        canvas.flush();

        if let Some(rest) = frame_time.checked_sub(frame_start.elapsed()) {
            std::thread::sleep(rest);
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(&cli.log_file)?;
    let config = load_config(&cli)?;

    terminal::enable_raw_mode()?;
    execute!(io::stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;

    let result = run(&cli, config);

    let _ = execute!(io::stdout(), cursor::Show, terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    result.map_err(Into::into)
}
