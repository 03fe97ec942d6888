use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Context as _;
use clap::{ArgAction, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "trackboard", version)]
struct Cli {
    /// Raise log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Composite a board request into a PNG.
    Board(BoardArgs),
    /// Print the maximum sequence length of some tracks as `{"limit": N}`.
    Limit(LimitArgs),
    /// Write a synthetic annotation store as JSON.
    Populate(PopulateArgs),
}

#[derive(Parser, Debug)]
struct BoardArgs {
    /// Annotation store JSON (array of records).
    #[arg(long)]
    store: PathBuf,

    /// Board request JSON (`loc`, `tracks`, `conf`).
    #[arg(long)]
    request: PathBuf,

    /// Optional config JSON (`compositor`, `cache`).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output PNG path.
    #[arg(long)]
    out: Option<PathBuf>,

    /// Print the response (data URI + failures) as JSON on stdout.
    #[arg(long)]
    json: bool,

    /// Render tracks one at a time in request order.
    #[arg(long)]
    sequential: bool,

    /// Worker threads for parallel mode.
    #[arg(long)]
    threads: Option<usize>,

    /// Load every track of this group into the cache before compositing.
    #[arg(long)]
    warm_group: Option<String>,
}

#[derive(Parser, Debug)]
struct LimitArgs {
    /// Annotation store JSON (array of records).
    #[arg(long)]
    store: PathBuf,

    /// Track names.
    #[arg(required = true)]
    tracks: Vec<String>,
}

#[derive(Parser, Debug)]
struct PopulateArgs {
    /// Output store JSON path.
    #[arg(long)]
    out: PathBuf,

    /// Number of tracks.
    #[arg(long, default_value_t = 1)]
    tracks: u32,

    /// Gaps per track.
    #[arg(long, default_value_t = 10)]
    elements: u32,

    /// Length of each gap.
    #[arg(long, default_value_t = 1)]
    span: u32,

    /// Distance between consecutive gap starts.
    #[arg(long, default_value_t = 10)]
    sep: u32,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::Board(args) => cmd_board(args),
        Command::Limit(args) => cmd_limit(args),
        Command::Populate(args) => cmd_populate(args),
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

fn read_request_json(path: &Path) -> anyhow::Result<trackboard::BoardRequest> {
    let f = File::open(path).with_context(|| format!("open request '{}'", path.display()))?;
    let req: trackboard::BoardRequest = serde_json::from_reader(BufReader::new(f))
        .with_context(|| format!("parse request JSON '{}'", path.display()))?;
    Ok(req)
}

fn load_store(path: &Path) -> anyhow::Result<Arc<trackboard::InMemoryStore>> {
    let store = trackboard::InMemoryStore::from_path(path)?;
    tracing::info!(records = store.len(), path = %path.display(), "store loaded");
    Ok(Arc::new(store))
}

fn cmd_board(args: BoardArgs) -> anyhow::Result<()> {
    let mut cfg = match &args.config {
        Some(p) => trackboard::BoardConfig::from_path(p)?,
        None => trackboard::BoardConfig::default(),
    };
    if args.sequential {
        cfg.compositor.parallel = false;
    }
    if args.threads.is_some() {
        cfg.compositor.threads = args.threads;
    }
    cfg.validate()?;

    let store = load_store(&args.store)?;
    let req = read_request_json(&args.request)?;
    let compositor = trackboard::Compositor::new(&cfg.context(store))?;

    if let Some(group) = &args.warm_group {
        let threads = if cfg.compositor.parallel {
            cfg.compositor.threads
        } else {
            Some(1)
        };
        let pool = trackboard::build_thread_pool(threads)?;
        let report = compositor.fetcher().warm_group(group, &pool)?;
        eprintln!(
            "warmed group '{}': {} loaded, {} failed",
            report.group,
            report.loaded.len(),
            report.failed.len()
        );
    }

    let out = compositor.composite(&req.to_composite())?;
    for f in &out.failures {
        eprintln!(
            "track #{} '{}' failed [{}]: {}",
            f.index,
            f.track,
            f.error.code(),
            f.error
        );
    }

    let scale = trackboard::LinearScale::for_window(req.conf.width, req.loc)?;
    eprintln!(
        "rendered {}/{} tracks in {:.1} ms ({:.3} bases per pixel, px 0 = {})",
        out.stats.tracks_rendered,
        out.stats.tracks_total,
        out.stats.elapsed.as_secs_f64() * 1000.0,
        1.0 / scale.factor(),
        scale.invert(0.0)
    );

    if let Some(path) = &args.out {
        trackboard::save_png(&out.canvas, path)?;
        eprintln!("wrote {}", path.display());
    }

    if args.json {
        let resp = trackboard::BoardResponse {
            image: trackboard::data_uri(&out.canvas)?,
            failures: out
                .failures
                .iter()
                .map(trackboard::FailureReport::from)
                .collect(),
        };
        println!("{}", serde_json::to_string(&resp)?);
    }
    Ok(())
}

fn cmd_limit(args: LimitArgs) -> anyhow::Result<()> {
    let store = load_store(&args.store)?;
    let fetcher = trackboard::AnnotationFetcher::new(store, None);
    let limit = fetcher.limit(&args.tracks)?;
    println!("{}", serde_json::to_string(&limit)?);
    Ok(())
}

fn cmd_populate(args: PopulateArgs) -> anyhow::Result<()> {
    if args.sep == 0 {
        anyhow::bail!("--sep must be >= 1");
    }
    let store = trackboard::synthetic_store(trackboard::SyntheticOpts {
        tracks: args.tracks,
        elements: args.elements,
        span: args.span,
        sep: args.sep,
    });
    if let Some(parent) = args.out.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(&args.out, store.to_json_string()?)
        .with_context(|| format!("write store '{}'", args.out.display()))?;
    eprintln!("wrote {} records to {}", store.len(), args.out.display());
    Ok(())
}
