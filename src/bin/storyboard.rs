use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing::Level;

#[derive(Parser, Debug)]
#[command(name = "storyboard", version)]
struct Cli {
    /// Log debug diagnostics to stderr.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load a project, assign missing ids and check structural invariants.
    Validate(InArgs),
    /// Print page and audio placement on the global timeline.
    Timeline(InArgs),
    /// Evaluate one frame and print its render list as JSON.
    Frame(FrameArgs),
    /// Write the normalized project back out.
    Normalize(NormalizeArgs),
}

#[derive(Parser, Debug)]
struct InArgs {
    /// Input project (or bare composition) JSON.
    #[arg(long = "in")]
    in_path: PathBuf,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    /// Input project (or bare composition) JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Global frame index (0-based).
    #[arg(long)]
    frame: u64,

    /// Pretty-print the JSON output.
    #[arg(long, default_value_t = false)]
    pretty: bool,
}

#[derive(Parser, Debug)]
struct NormalizeArgs {
    /// Input project (or bare composition) JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output project JSON path.
    #[arg(long)]
    out: PathBuf,

    /// Drop inline local file payloads (share-link export).
    #[arg(long, default_value_t = false)]
    strip_files: bool,

    /// Pretty-print the JSON output.
    #[arg(long, default_value_t = false)]
    pretty: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::WARN })
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.cmd {
        Command::Validate(args) => cmd_validate(args),
        Command::Timeline(args) => cmd_timeline(args),
        Command::Frame(args) => cmd_frame(args),
        Command::Normalize(args) => cmd_normalize(args),
    }
}

fn load(path: &Path) -> anyhow::Result<storyboard::Project> {
    storyboard::Project::from_path(path)
        .with_context(|| format!("load project '{}'", path.display()))
}

fn cmd_validate(args: InArgs) -> anyhow::Result<()> {
    let project = load(&args.in_path)?;
    let comp = &project.composition;
    println!(
        "ok: {} pages, {} frames at {} fps ({}x{})",
        comp.pages.len(),
        comp.total_frames(),
        comp.fps.0,
        comp.width,
        comp.height
    );
    Ok(())
}

fn cmd_timeline(args: InArgs) -> anyhow::Result<()> {
    let project = load(&args.in_path)?;
    let comp = &project.composition;
    let layout = storyboard::Evaluator::timeline(comp);

    for (i, page) in comp.pages.iter().enumerate() {
        let Some(range) = layout.page_range(i) else {
            continue;
        };
        println!(
            "page {i} '{}': frames {}..{} ({:.2}s)",
            page.id,
            range.start.0,
            range.end.0,
            page.duration_seconds(comp.fps)
        );
    }
    for placed in storyboard::schedule_audios(comp, comp.fps) {
        println!(
            "audio '{}': frames {}..{}",
            placed.audio_id, placed.range.start.0, placed.range.end.0
        );
    }
    println!("total: {} frames", layout.total_frames);
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let project = load(&args.in_path)?;
    let files = project.file_table();
    let frame = storyboard::Evaluator::eval_frame(
        &project.composition,
        &files,
        storyboard::FrameIndex(args.frame),
    )?;
    let json = if args.pretty {
        serde_json::to_string_pretty(&frame)?
    } else {
        serde_json::to_string(&frame)?
    };
    println!("{json}");
    Ok(())
}

fn cmd_normalize(args: NormalizeArgs) -> anyhow::Result<()> {
    let project = load(&args.in_path)?;
    let json = project.export(&storyboard::ExportOpts {
        include_files: !args.strip_files,
        pretty: args.pretty,
    })?;

    if let Some(parent) = args.out.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(&args.out, json)
        .with_context(|| format!("write project '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}
