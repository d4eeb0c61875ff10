use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use cogcanvas::{
    Background, CanvasResult, FrameChannel, FrameRGBA, Presentation, Seed, SeededRng, Session,
    SessionOpts,
};

#[derive(Parser, Debug)]
#[command(name = "cogcanvas", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the deterministic random stream for a seed.
    Rand(RandArgs),
    /// Boot a standalone session against a params bundle and print what it resolved.
    Replay(ReplayArgs),
}

#[derive(Parser, Debug)]
struct RandArgs {
    /// Seed (any-length decimal integer).
    #[arg(long)]
    seed: String,

    /// Number of values to print.
    #[arg(long, default_value_t = 10)]
    count: usize,
}

#[derive(Parser, Debug)]
struct ReplayArgs {
    /// Template root containing the `params/` directory.
    #[arg(long)]
    root: PathBuf,

    /// Startup query string, e.g. `seed=42`.
    #[arg(long, default_value = "")]
    query: String,

    /// Session options JSON; `--root` overrides its static root.
    #[arg(long)]
    opts: Option<PathBuf>,

    /// Viewport width.
    #[arg(long)]
    width: Option<u32>,

    /// Viewport height.
    #[arg(long)]
    height: Option<u32>,

    /// How many seeded values to include in the summary.
    #[arg(long, default_value_t = 3)]
    samples: usize,
}

/// Records what the session asked the renderer to draw.
#[derive(Default)]
struct HeadlessView {
    drawn: Option<Background>,
}

impl Presentation for HeadlessView {
    fn capture_frame(&mut self) -> CanvasResult<FrameRGBA> {
        Ok(FrameRGBA::solid(1, 1, [0, 0, 0, 255]))
    }

    fn reload_background(&mut self, _index: usize, background: &Background) {
        self.drawn = Some(background.clone());
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Rand(args) => cmd_rand(args),
        Command::Replay(args) => cmd_replay(args),
    }
}

fn cmd_rand(args: RandArgs) -> anyhow::Result<()> {
    let seed = Seed::parse(&args.seed)?;
    for v in SeededRng::new(seed).take(args.count) {
        println!("{v}");
    }
    Ok(())
}

fn cmd_replay(args: ReplayArgs) -> anyhow::Result<()> {
    let mut opts = match &args.opts {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("read opts '{}'", path.display()))?;
            serde_json::from_str::<SessionOpts>(&raw)
                .with_context(|| format!("parse opts '{}'", path.display()))?
        }
        None => SessionOpts::default(),
    };
    opts.static_root = args.root.clone();
    if let Some(w) = args.width {
        opts.window_width = w;
    }
    if let Some(h) = args.height {
        opts.window_height = h;
    }

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("build runtime")?;

    let summary = rt.block_on(async {
        let mut session = Session::from_query(&args.query, opts, FrameChannel::detached())?;
        let mut view = HeadlessView::default();
        let report = session.boot(&mut view).await;
        let samples: Vec<f64> = session.rng().take(args.samples).collect();
        anyhow::Ok(serde_json::json!({
            "boot": report,
            "background": view.drawn,
            "configuration": session.store().config(),
            "attributes": session.store().attributes(),
            "samples": samples,
        }))
    })?;

    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
