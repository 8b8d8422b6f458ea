use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use lyric_sync_core::{
    AppConfig, LyricDocument, LyricSession, ManualClock, PlaybackClock, RngSource, SessionEvent,
    StyleMode, TextCasing,
};
use tracing_subscriber::EnvFilter;

fn main() -> lyric_sync_core::Result<()> {
    init_tracing();

    let cli = Cli::parse();

    match cli.command {
        Commands::Plan { display, lyrics, at } => run_plan(&display, &lyrics, at),
        Commands::Play {
            display,
            lyrics,
            from,
            to,
            step,
            seek_at,
            seek_to,
        } => run_play(&display, &lyrics, from, to, step, seek_at.zip(seek_to)),
        Commands::Lines { display, lyrics, at } => run_lines(&display, &lyrics, at),
    }
}

fn run_plan(display: &DisplayArgs, lyrics: &Path, at: f64) -> lyric_sync_core::Result<()> {
    let mut session = open_session(display, lyrics)?;
    session.seek(at);

    println!("{}", serde_json::to_string_pretty(&session.active_view())?);
    Ok(())
}

fn run_play(
    display: &DisplayArgs,
    lyrics: &Path,
    from: f64,
    to: f64,
    step: f64,
    seek: Option<(f64, f64)>,
) -> lyric_sync_core::Result<()> {
    if !(step.is_finite() && step > 0.0) {
        return Err(lyric_sync_core::LyricSyncError::InvalidInput(
            "--step must be a positive number of seconds",
        ));
    }

    let mut session = open_session(display, lyrics)?;
    let mut clock = ManualClock::at(from);
    let mut pending_seek = seek;
    tracing::info!(from, to, step, route = ?session.route(), "starting playback");

    while clock.current_time() <= to {
        let event = match pending_seek {
            Some((at, target)) if clock.current_time() >= at => {
                pending_seek = None;
                clock.seek(target);
                session.seek(clock.current_time())
            }
            _ => session.poll(&clock),
        };

        match event {
            SessionEvent::Entered { index, .. } | SessionEvent::Restarted { index } => {
                tracing::info!(time = clock.current_time(), index, ?event, "line");
                if let Some(view) = session.active_view() {
                    println!("{}", serde_json::to_string(view)?);
                }
            }
            SessionEvent::Cleared => {
                tracing::info!(time = clock.current_time(), "before first line");
            }
            SessionEvent::Idle => {
                tracing::info!("lyrics are not time-synced, nothing to play");
                break;
            }
            SessionEvent::Unchanged => {}
        }

        clock.advance(step);
    }

    Ok(())
}

fn run_lines(display: &DisplayArgs, lyrics: &Path, at: f64) -> lyric_sync_core::Result<()> {
    let mut session = open_session(display, lyrics)?;
    session.seek(at);

    println!("{}", serde_json::to_string_pretty(&session.rows())?);
    Ok(())
}

fn open_session(display: &DisplayArgs, lyrics: &Path) -> lyric_sync_core::Result<LyricSession> {
    let mut config = match &display.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };
    if let Some(style) = display.style {
        config.display.style = style;
    }
    if let Some(casing) = display.casing {
        config.display.casing = casing;
    }
    if display.windowed {
        config.display.immersive = false;
    }

    let rng = match display.seed {
        Some(seed) => RngSource::seeded(seed),
        None => RngSource::from_entropy(),
    };

    let document = LyricDocument::load(lyrics)?;
    tracing::debug!(?config, "resolved configuration");

    let mut session = LyricSession::new(config, rng)?;
    session.load_track(document);
    Ok(session)
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .try_init();
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Kinetic lyrics in time with the music", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug)]
struct DisplayArgs {
    /// JSON configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Presentation style: classic, word-stream, reveal-window or randomized-multiline.
    #[arg(short, long)]
    style: Option<StyleMode>,
    /// Text casing: original, uppercase or lowercase.
    #[arg(long)]
    casing: Option<TextCasing>,
    /// Seed for the randomized layout.
    #[arg(long)]
    seed: Option<u64>,
    /// Use the windowed player, which always shows the scrolling list.
    #[arg(long)]
    windowed: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the timing plan of the line active at a given time.
    Plan {
        #[command(flatten)]
        display: DisplayArgs,
        /// Lyrics file (.lrc, .json or plain text).
        lyrics: PathBuf,
        /// Playback position in seconds.
        #[arg(long, default_value_t = 0.0)]
        at: f64,
    },
    /// Run a simulated playback clock and print every line transition.
    Play {
        #[command(flatten)]
        display: DisplayArgs,
        lyrics: PathBuf,
        #[arg(long, default_value_t = 0.0)]
        from: f64,
        #[arg(long, default_value_t = 300.0)]
        to: f64,
        /// Clock step in seconds, roughly one display frame.
        #[arg(long, default_value_t = 0.05)]
        step: f64,
        /// Position at which to jump the clock.
        #[arg(long, requires = "seek_to")]
        seek_at: Option<f64>,
        /// Target of the jump.
        #[arg(long, requires = "seek_at")]
        seek_to: Option<f64>,
    },
    /// Print the scrolling list rows at a given time.
    Lines {
        #[command(flatten)]
        display: DisplayArgs,
        lyrics: PathBuf,
        #[arg(long, default_value_t = 0.0)]
        at: f64,
    },
}
