use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::Event,
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Layout},
    Terminal,
};

use vitalwatch::app::{App, View};
use vitalwatch::config::TelemetryConfig;
use vitalwatch::source::{simulate, DataSource, FileSource, MqttSource};
use vitalwatch::{events, ui};

#[derive(Parser, Debug)]
#[command(name = "vitalwatch")]
#[command(about = "Terminal dashboard for live vital-sign telemetry over MQTT")]
struct Args {
    /// Path to the configuration file (VITALWATCH_* env vars override it)
    #[arg(short, long, default_value = "vitalwatch.toml")]
    config: PathBuf,

    /// Broker address override (e.g. "wss://broker.example:8884/mqtt")
    #[arg(short, long)]
    broker: Option<String>,

    /// Topic override
    #[arg(short, long)]
    topic: Option<String>,

    /// ECG chart window override, in samples
    #[arg(short, long)]
    window: Option<usize>,

    /// Replay a recorded session (newline-delimited JSON payloads)
    /// instead of connecting to the broker
    #[arg(long, conflicts_with = "simulate")]
    replay: Option<PathBuf>,

    /// Run against the built-in signal simulator (no broker needed)
    #[arg(long)]
    simulate: bool,

    /// With --replay: ingest the recording, write a JSON report, and exit
    #[arg(short, long, requires = "replay")]
    export: Option<PathBuf>,

    /// Write tracing output to this file (the terminal belongs to the TUI)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    if let Some(ref path) = args.log_file {
        init_logging(path)?;
    }

    let mut config = TelemetryConfig::load(&args.config)?;
    if let Some(broker) = args.broker {
        config.broker_url = broker;
    }
    if let Some(topic) = args.topic {
        config.topic = topic;
    }
    if let Some(window) = args.window {
        config.ecg_window = window;
    }
    config.validate()?;

    // Simulator mode: no broker, no runtime needed
    if args.simulate {
        let source = simulate::spawn();
        return run_tui(Box::new(source), &config);
    }

    // Replay mode: recorded session, optionally straight to a report
    if let Some(ref recording) = args.replay {
        let source = FileSource::open(recording)?;
        if let Some(ref export_path) = args.export {
            return export_replay(source, &config, export_path);
        }
        return run_tui(Box::new(source), &config);
    }

    // Default: live MQTT link. The runtime hosts the link task in the
    // background while the TUI runs on this thread.
    let runtime = tokio::runtime::Runtime::new()?;
    let (source, handle) = runtime.block_on(MqttSource::connect(&config))?;

    let result = run_tui(Box::new(source), &config);

    // Graceful close, exactly once, regardless of how the TUI exited.
    runtime.block_on(handle.shutdown());

    result
}

/// Ingest a whole recording and write the report without entering the TUI.
fn export_replay(source: FileSource, config: &TelemetryConfig, export_path: &Path) -> Result<()> {
    let mut app = App::new(Box::new(source), config.ecg_window);
    while app.pump() > 0 {}
    app.export_report(export_path)?;
    println!(
        "Exported {} samples to: {}",
        app.samples_seen,
        export_path.display()
    );
    Ok(())
}

/// Run the TUI with the given data source
fn run_tui(source: Box<dyn DataSource>, config: &TelemetryConfig) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Setup panic hook to restore terminal
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic);
    }));

    let mut app = App::new(source, config.ecg_window);

    // Run the main loop
    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    // Minimum terminal size for usable display
    const MIN_WIDTH: u16 = 60;
    const MIN_HEIGHT: u16 = 12;

    while app.running {
        // Fold in whatever arrived since the last frame
        app.pump();

        // Draw UI
        terminal.draw(|frame| {
            let area = frame.area();

            // Check for minimum terminal size
            if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
                let msg = format!(
                    "Terminal too small: {}x{}\nMinimum: {}x{}\n\nResize to continue",
                    area.width, area.height, MIN_WIDTH, MIN_HEIGHT
                );
                let paragraph = ratatui::widgets::Paragraph::new(msg)
                    .alignment(ratatui::layout::Alignment::Center)
                    .style(ratatui::style::Style::default().fg(ratatui::style::Color::Yellow));
                let centered = ratatui::layout::Rect::new(
                    0,
                    (area.height / 2).saturating_sub(2),
                    area.width,
                    area.height.min(5),
                );
                frame.render_widget(paragraph, centered);
                return;
            }

            let chunks = Layout::vertical([
                Constraint::Length(1), // Header bar
                Constraint::Length(1), // Tabs
                Constraint::Min(8),    // Content
                Constraint::Length(1), // Status bar
            ])
            .split(area);

            // Render header with connection state and live scalars
            ui::common::render_header(frame, app, chunks[0]);

            // Render tabs
            ui::common::render_tabs(frame, app, chunks[1]);

            // Render current view
            match app.current_view {
                View::Vitals => ui::vitals::render(frame, app, chunks[2]),
                View::Waveform => ui::waveform::render(frame, app, chunks[2]),
                View::Intervals => ui::intervals::render(frame, app, chunks[2]),
            }

            // Render status bar
            ui::common::render_status_bar(frame, app, chunks[3]);

            // Render help overlay if active
            if app.show_help {
                ui::common::render_help(frame, app, area);
            }
        })?;

        // Poll for events with a short timeout; this paces the redraw
        if let Some(event) = events::poll_event(Duration::from_millis(50))? {
            match event {
                Event::Key(key) => events::handle_key_event(app, key),
                Event::Resize(_, _) => {
                    // Terminal will redraw on next iteration
                }
                _ => {}
            }
        }
    }

    Ok(())
}

/// Route tracing output to a file; the terminal is owned by ratatui.
fn init_logging(path: &Path) -> Result<()> {
    let file = std::fs::File::create(path)?;
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(Arc::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}
