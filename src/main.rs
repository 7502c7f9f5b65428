//! # Hamlet Main Entry Point
//!
//! Parses arguments, starts the generation runtime, builds the village and
//! runs the macroquad frame loop.

use std::sync::Arc;

use clap::Parser;
use hamlet::config::{DEFAULT_ENDPOINT, DEFAULT_MODEL, DEFAULT_TIMEOUT_MS};
use hamlet::{
    GameEvent, GameState, GreeterConfig, GreetingDispatcher, GreetingGenerator, HamletError,
    HamletResult, InputHandler, MacroquadDisplay, MessageImportance,
};
use log::{info, warn};
use macroquad::prelude::{get_frame_time, next_frame, request_new_screen_size};
use tokio::runtime::Runtime;

/// Longest frame step fed to the simulation. A longer stall would let a single
/// step cross a whole tile.
const MAX_FRAME_TIME: f32 = 0.1;

/// Command line arguments for Hamlet.
#[derive(Parser, Debug)]
#[command(name = "hamlet")]
#[command(about = "A top-down village exploration prototype with LLM-voiced villagers")]
#[command(version)]
struct Args {
    /// Random seed for villager behaviour
    #[arg(short, long)]
    seed: Option<u64>,

    /// Base URL of the Ollama-compatible generation service
    #[arg(long, default_value = DEFAULT_ENDPOINT)]
    endpoint: String,

    /// Model used for villager speech
    #[arg(long, default_value = DEFAULT_MODEL)]
    model: String,

    /// Upper bound on one generation request, in milliseconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_MS)]
    timeout_ms: u64,

    /// Never contact the generation service; villagers use canned lines
    #[arg(long)]
    offline: bool,

    /// Also move with the h/j/k/l keys
    #[arg(long)]
    vi_keys: bool,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,
}

impl Args {
    fn greeter_config(&self) -> GreeterConfig {
        GreeterConfig {
            endpoint: self.endpoint.clone(),
            model: self.model.clone(),
            timeout_ms: self.timeout_ms,
        }
    }
}

#[macroquad::main("Hamlet")]
async fn main() -> HamletResult<()> {
    let args = Args::parse();

    initialize_logging(&args.log_level)?;

    info!("Starting Hamlet v{}", hamlet::VERSION);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .thread_name("hamlet-ai")
        .enable_all()
        .build()?;

    let generator = if args.offline {
        info!("Offline mode: villagers will use canned lines");
        GreetingGenerator::offline()
    } else {
        GreetingGenerator::from_config(&args.greeter_config())?
    };
    let generator = Arc::new(generator);

    probe_backend(&runtime, Arc::clone(&generator));

    run_game(&args, &runtime, generator).await
}

/// Initializes the logging system based on the specified log level.
fn initialize_logging(log_level: &str) -> HamletResult<()> {
    #[cfg(feature = "dev-tools")]
    {
        use tracing::Level;

        let level = match log_level.to_lowercase().as_str() {
            "error" => Level::ERROR,
            "warn" => Level::WARN,
            "info" => Level::INFO,
            "debug" => Level::DEBUG,
            "trace" => Level::TRACE,
            _ => Level::INFO,
        };

        tracing_subscriber::fmt()
            .with_max_level(level)
            .with_target(false)
            .try_init()
            .map_err(|e| HamletError::InvalidConfig(e.to_string()))?;
    }

    #[cfg(not(feature = "dev-tools"))]
    {
        let level = log_level.parse::<log::LevelFilter>().map_err(|_| {
            HamletError::InvalidConfig(format!("unknown log level '{}'", log_level))
        })?;

        env_logger::Builder::new()
            .filter_level(level)
            .format_target(false)
            .try_init()
            .map_err(|e| HamletError::InvalidConfig(e.to_string()))?;
    }

    Ok(())
}

/// Logs whether the generation service answers, without holding up start-up.
fn probe_backend(runtime: &Runtime, generator: Arc<GreetingGenerator>) {
    runtime.spawn(async move {
        if generator.is_available().await {
            info!("Generation backend '{}' is reachable", generator.backend_name());
        } else {
            warn!(
                "Generation backend '{}' is not reachable; villagers will use canned lines",
                generator.backend_name()
            );
        }
    });
}

/// Runs the main frame loop.
async fn run_game(
    args: &Args,
    runtime: &Runtime,
    generator: Arc<GreetingGenerator>,
) -> HamletResult<()> {
    request_new_screen_size(1024.0, 768.0);

    let seed = args.seed.unwrap_or(12345);
    info!("Building village with seed: {}", seed);
    let mut game_state = GameState::new(seed)?;

    let mut dispatcher = GreetingDispatcher::new(runtime.handle().clone(), generator);
    let mut input_handler = InputHandler::with_vi_keys(args.vi_keys);
    let mut display = MacroquadDisplay::new();

    display.add_message("Welcome to the village, detective.".to_string());
    display.add_message("Walk up to a villager and press E to talk.".to_string());

    loop {
        let dt = get_frame_time().min(MAX_FRAME_TIME);
        let intents = input_handler.poll(game_state.dialogue.is_active());
        let events = game_state.update(dt, &intents, &mut dispatcher);

        let mut quit = false;
        for event in events {
            match event {
                GameEvent::Message { text, importance } => {
                    if importance == MessageImportance::Warning {
                        warn!("{}", text);
                    }
                    display.add_message(text);
                }
                GameEvent::GreetingRequested { speaker, .. } => {
                    display.add_message(format!("You approach {}.", speaker));
                }
                GameEvent::DialogueOpened { speaker, .. } => {
                    display.add_message(format!("{} speaks.", speaker));
                }
                GameEvent::DialogueClosed => display.add_message("Dialogue closed.".to_string()),
                GameEvent::QuitRequested => quit = true,
                GameEvent::PlayerMoved { .. } => {}
            }
        }

        if quit {
            info!("Player quit the game");
            break;
        }

        display.render_game(&game_state, dispatcher.pending_speaker());

        next_frame().await;
    }

    info!("Game loop ended");
    Ok(())
}
