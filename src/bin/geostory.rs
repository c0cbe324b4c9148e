use std::{
    io::Write as _,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "geostory", version)]
struct Cli {
    /// Log to stderr (repeat for more detail).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the scene at one event index as JSON.
    Frame(FrameArgs),
    /// Autoplay from the first event to the last and print what happened as JSON.
    Play(PlayArgs),
    /// Print headline statistics of a trajectory as JSON.
    Stats(InputArgs),
}

#[derive(Parser, Debug)]
struct InputArgs {
    /// Events JSON (`{ "events": [...] }`).
    #[arg(long)]
    events: PathBuf,

    /// Regions gazetteer JSON. Built-in coordinates only when omitted or unreadable.
    #[arg(long)]
    regions: Option<PathBuf>,

    /// Playback configuration JSON. Defaults when omitted.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Event index (0-based, clamped to the last event).
    #[arg(long)]
    index: usize,

    /// Highlight this event's segment before snapshotting.
    #[arg(long)]
    highlight: Option<usize>,
}

#[derive(Parser, Debug)]
struct PlayArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Autoplay interval in milliseconds.
    #[arg(long)]
    speed: Option<u64>,

    /// Write the report here instead of stdout.
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct FrameReport {
    fingerprint: String,
    #[serde(flatten)]
    frame: geostory::SceneFrame,
}

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct PlayReport {
    events: usize,
    finished_at: geostory::Millis,
    /// Fingerprint of the scene after each step; a repeat means the step changed nothing.
    fingerprints: Vec<String>,
    effects: Vec<geostory::PlaybackEffect>,
    commands: Vec<geostory::MapCommand>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::Frame(args) => cmd_frame(args),
        Command::Play(args) => cmd_play(args),
        Command::Stats(args) => cmd_stats(args),
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn read_config(path: Option<&Path>) -> anyhow::Result<geostory::PlaybackConfig> {
    match path {
        Some(p) => geostory::PlaybackConfig::from_json_path(p)
            .with_context(|| format!("load config '{}'", p.display())),
        None => Ok(geostory::PlaybackConfig::default()),
    }
}

fn open_session(
    input: &InputArgs,
) -> anyhow::Result<geostory::PlaybackSession<geostory::RecordingMap>> {
    let cfg = read_config(input.config.as_deref())?;
    let gazetteer = geostory::load_gazetteer(input.regions.as_deref());
    let trajectory = geostory::load_trajectory(&input.events, &gazetteer)
        .with_context(|| format!("load events '{}'", input.events.display()))?;

    let map = geostory::RecordingMap::new(geostory::LngLat::new(0.0, 0.0), cfg.initial_zoom);
    let mut session =
        geostory::PlaybackSession::new(map, cfg, Box::new(geostory::MemoryStore::new()))?;
    session.load_trajectory(geostory::Millis::ZERO, trajectory);
    Ok(session)
}

fn write_json(out: Option<&Path>, value: &impl serde::Serialize) -> anyhow::Result<()> {
    match out {
        Some(p) => {
            let f = std::fs::File::create(p)
                .with_context(|| format!("create output '{}'", p.display()))?;
            serde_json::to_writer_pretty(f, value).with_context(|| "write JSON report")?;
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            serde_json::to_writer_pretty(&mut stdout, value).with_context(|| "write JSON report")?;
            writeln!(stdout)?;
        }
    }
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let mut session = open_session(&args.input)?;
    let now = geostory::Millis::ZERO;
    session.go_to(now, args.index, false, true);
    if let Some(h) = args.highlight {
        session.select_event_highlight(now, h);
    }
    let frame = session.frame(now);
    let report = FrameReport {
        fingerprint: geostory::fingerprint_frame(&frame).to_string(),
        frame,
    };
    write_json(None, &report)
}

fn cmd_play(args: PlayArgs) -> anyhow::Result<()> {
    let mut session = open_session(&args.input)?;
    let mut now = geostory::Millis::ZERO;
    if let Some(speed) = args.speed {
        session.set_play_speed(now, geostory::Millis(speed))?;
    }

    let mut fingerprints = vec![geostory::fingerprint_frame(&session.frame(now)).to_string()];
    let mut shown = session.state().current_index;
    session.toggle_play(now);
    loop {
        if session.state().current_index != shown {
            shown = session.state().current_index;
            fingerprints.push(geostory::fingerprint_frame(&session.frame(now)).to_string());
        }
        if !session.is_playing() {
            break;
        }
        let Some(next) = session.next_deadline() else {
            break;
        };
        now = next;
        session.advance(now);
    }
    session.run_until_idle();

    let report = PlayReport {
        events: session.trajectory().map_or(0, geostory::Trajectory::len),
        finished_at: session.now(),
        fingerprints,
        effects: session.take_effects(),
        commands: session.map().commands().to_vec(),
    };
    tracing::info!(
        steps = report.fingerprints.len(),
        finished_at = report.finished_at.0,
        "playback finished"
    );
    write_json(args.out.as_deref(), &report)
}

fn cmd_stats(args: InputArgs) -> anyhow::Result<()> {
    let gazetteer = geostory::load_gazetteer(args.regions.as_deref());
    let trajectory = geostory::load_trajectory(&args.events, &gazetteer)
        .with_context(|| format!("load events '{}'", args.events.display()))?;
    write_json(None, &geostory::TrajectoryStats::compute(&trajectory))
}
