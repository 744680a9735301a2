use anyhow::Context;
use chrono::Utc;
use clap::{Parser, Subcommand};
use metar_api::{AppState, create_app};
use metar_core::{Color, StationTable};
use metar_engine::{
    ModeStore, ModeToggle, RenderLoop, RenderSink, SharedStations, StationRefresher, mode_cell,
};
use metarmap::{
    FixedSolarTable, JsonFileFeed, JsonModeStore, LogSink, MapConfig, TerminalSink, load_positions,
};
use std::future::IntoFuture;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Command line arguments for the metarmap daemon
#[derive(Parser, Debug)]
#[command(name = "metar-map")]
#[command(about = "Aviation weather light map")]
struct Args {
    /// Path to the map configuration JSON file
    #[arg(short, long)]
    config: PathBuf,

    /// Port to bind the status server to
    #[arg(short, long, default_value = "3000")]
    port: u16,

    /// Draw the strip on the terminal instead of only logging frames
    #[arg(long)]
    terminal: bool,

    /// Render a single frame and exit
    #[arg(long)]
    once: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Light every position with one color, for checking the strip
    Fill {
        /// Channels in strip order, e.g. 102,255,204
        #[arg(long, default_value = "102,255,204")]
        color: Color,
    },
}

fn make_sink(terminal: bool, length: usize) -> Box<dyn RenderSink> {
    if terminal {
        Box::new(TerminalSink::new(std::io::stdout(), length))
    } else {
        Box::new(LogSink::new(length))
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize tracing on stderr; stdout may carry the terminal strip
    tracing_subscriber::fmt()
        .pretty()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = MapConfig::load(&args.config)?;
    tracing::info!("Loaded map config from {}", args.config.display());

    let positions = load_positions(&config.positions_file)?;
    let mut sink = make_sink(args.terminal, positions.len());

    if let Some(Command::Fill { color }) = args.command {
        tracing::info!("Filling {} positions with {}", positions.len(), color);
        sink.show(&vec![color; positions.len()], config.brightness.day)?;
        return Ok(());
    }

    // Display mode, persisted across restarts
    let store = JsonModeStore::new(&config.mode_file);
    let initial_mode = store.load().unwrap_or_else(|error| {
        tracing::warn!("Could not read display mode ({error}), starting in metar mode");
        Default::default()
    });
    let (mode_writer, mode_reader) = mode_cell(initial_mode);
    let store: Box<dyn ModeStore> = Box::new(store);
    let toggle = ModeToggle::new(mode_writer, store);

    // Day/night brightness
    let clock = Arc::new(FixedSolarTable::new(config.solar));
    let daylight = config.daylight();
    let brightness = daylight.evaluate(clock.as_ref(), Utc::now());

    // Weather
    let stations: SharedStations = Arc::new(RwLock::new(StationTable::default()));
    let feed = Arc::new(JsonFileFeed::new(&config.feed_file));
    let refresher = StationRefresher::new(feed, &positions, Arc::clone(&stations));
    refresher.refresh().context("Initial weather fetch failed")?;

    let mut render = RenderLoop::new(
        positions,
        Arc::clone(&stations),
        mode_reader,
        config.render_settings(),
        sink,
        brightness,
    );
    if let Some(secs) = config.brightness_recheck_secs {
        render = render.with_brightness_recheck(clock, daylight, Duration::from_secs(secs));
    }

    if args.once {
        render.tick()?;
        return Ok(());
    }

    let app_state = AppState::new(Arc::clone(&stations), render.subscribe(), toggle);
    let render_task = tokio::spawn(render.run());
    if let Some(secs) = config.refresh_interval_secs {
        tokio::spawn(refresher.run_every(Duration::from_secs(secs)));
    }

    // Build our application with routes
    let app = create_app(app_state);

    let bind_addr = format!("0.0.0.0:{}", args.port);
    tracing::info!("Starting status server on {}", bind_addr);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("Failed to bind to {}", bind_addr))?;

    tokio::select! {
        result = render_task => {
            match result.context("Render task panicked")? {
                Ok(never) => match never {},
                Err(error) => Err(error).context("Render loop stopped"),
            }
        }
        result = axum::serve(listener, app).into_future() => {
            result.context("Server error")
        }
    }
}
