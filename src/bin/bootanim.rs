use std::path::{Path, PathBuf};

use anyhow::Context as _;
use bootanim::animation::frames::{MANIFEST_NAME, load_descriptor};
use bootanim::archive::zip::write_zip;
use bootanim::{
    AnimationDescriptor, BootConfig, CompressionMethod, DisplayThreshold, HeadlessCompositor,
    SnapshotOpts, ZipArchive,
};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "bootanim", version)]
struct Cli {
    /// Log filter, e.g. `info` or `bootanim=debug`. Overrides `RUST_LOG`.
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Play the boot animation on a headless surface.
    Run(RunArgs),
    /// Build a bootanimation zip from a directory holding `desc.txt` and the part folders.
    Pack(PackArgs),
    /// Print the parts and frames of a bootanimation zip.
    Inspect(InspectArgs),
}

#[derive(Parser, Debug)]
struct RunArgs {
    /// JSON config file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Archive to play. Replaces the configured search list.
    #[arg(long)]
    archive: Option<PathBuf>,

    /// Surface width.
    #[arg(long)]
    width: Option<u32>,

    /// Surface height.
    #[arg(long)]
    height: Option<u32>,

    /// Stop after this many ticks.
    #[arg(long)]
    ticks: Option<u64>,

    /// Initial display threshold (2 = verbose .. 8 = silent).
    #[arg(long)]
    threshold: Option<u8>,

    /// Write presented frames as PNGs into this directory.
    #[arg(long)]
    snapshots: Option<PathBuf>,

    /// Keep every N-th presented frame.
    #[arg(long, default_value_t = 1)]
    snapshot_every: u64,
}

#[derive(Parser, Debug)]
struct PackArgs {
    /// Source directory.
    #[arg(long = "in")]
    in_dir: PathBuf,

    /// Output zip path.
    #[arg(long)]
    out: PathBuf,

    /// Deflate the manifest. Frames are always stored.
    #[arg(long)]
    deflate_manifest: bool,
}

#[derive(Parser, Debug)]
struct InspectArgs {
    /// Zip archive to inspect.
    archive: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_level.as_deref())?;
    match cli.cmd {
        Command::Run(args) => cmd_run(args),
        Command::Pack(args) => cmd_pack(args),
        Command::Inspect(args) => cmd_inspect(args),
    }
}

fn init_tracing(level: Option<&str>) -> anyhow::Result<()> {
    let filter = match level {
        Some(level) => EnvFilter::try_new(level).with_context(|| format!("parse log level '{level}'"))?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

fn cmd_run(args: RunArgs) -> anyhow::Result<()> {
    let mut cfg = BootConfig::load(args.config.as_deref())?;
    if let Some(archive) = args.archive {
        cfg.archive_paths = vec![archive];
    }
    if let Some(width) = args.width {
        cfg.display_width = width;
    }
    if let Some(height) = args.height {
        cfg.display_height = height;
    }
    if let Some(ticks) = args.ticks {
        cfg.tick_limit = Some(ticks);
    }
    if let Some(threshold) = args.threshold {
        cfg.initial_threshold = DisplayThreshold::new(threshold)?;
    }

    let mut compositor = HeadlessCompositor::new(cfg.display_size());
    if let Some(dir) = args.snapshots {
        compositor = compositor.with_snapshots(SnapshotOpts {
            dir,
            every: args.snapshot_every,
        });
    }
    let engine = bootanim::prepare_engine(&cfg, &mut compositor)?;

    let worker = std::thread::Builder::new()
        .name("bootanim".to_string())
        .spawn(move || engine.run())
        .context("spawn playback thread")?;
    let summary = worker
        .join()
        .map_err(|_| anyhow::anyhow!("playback thread panicked"))??;

    serde_json::to_writer_pretty(std::io::stdout().lock(), &summary).context("write summary")?;
    println!();
    Ok(())
}

fn cmd_pack(args: PackArgs) -> anyhow::Result<()> {
    let manifest_path = args.in_dir.join(MANIFEST_NAME);
    let manifest = std::fs::read_to_string(&manifest_path)
        .with_context(|| format!("read manifest '{}'", manifest_path.display()))?;
    let desc = AnimationDescriptor::parse(&manifest);
    desc.validate()
        .with_context(|| format!("invalid manifest '{}'", manifest_path.display()))?;

    let mut files = Vec::new();
    for part in &desc.parts {
        let dir = args.in_dir.join(&part.path);
        files.extend(list_files(&args.in_dir, &dir)?);
    }
    files.sort();
    files.dedup();

    let mut blobs = Vec::with_capacity(files.len());
    for name in &files {
        let path = args.in_dir.join(name);
        let bytes = std::fs::read(&path).with_context(|| format!("read frame '{}'", path.display()))?;
        blobs.push(bytes);
    }

    let manifest_method = if args.deflate_manifest {
        CompressionMethod::Deflated
    } else {
        CompressionMethod::Stored
    };
    let entries = std::iter::once((MANIFEST_NAME, manifest.as_bytes(), manifest_method)).chain(
        files
            .iter()
            .zip(&blobs)
            .map(|(name, bytes)| (name.as_str(), bytes.as_slice(), CompressionMethod::Stored)),
    );
    let zip = write_zip(entries)?;

    if let Some(parent) = args.out.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(&args.out, zip).with_context(|| format!("write zip '{}'", args.out.display()))?;

    eprintln!(
        "wrote {} ({} parts, {} frames)",
        args.out.display(),
        desc.parts.len(),
        files.len()
    );
    Ok(())
}

/// Archive names (`part/file`) of the regular files directly inside `dir`.
fn list_files(root: &Path, dir: &Path) -> anyhow::Result<Vec<String>> {
    let mut names = Vec::new();
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!(dir = %dir.display(), error = %e, "part directory unreadable; skipped");
            return Ok(names);
        }
    };
    for entry in entries {
        let entry = entry.with_context(|| format!("list '{}'", dir.display()))?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let path = entry.path();
        let rel = path
            .strip_prefix(root)
            .with_context(|| format!("'{}' outside '{}'", path.display(), root.display()))?;
        let name = rel
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        names.push(name);
    }
    Ok(names)
}

fn cmd_inspect(args: InspectArgs) -> anyhow::Result<()> {
    let archive = ZipArchive::open(&args.archive)?;
    let desc = load_descriptor(&archive)?;

    println!("{}x{} @ {} fps", desc.width, desc.height, desc.fps);
    for (i, part) in desc.parts.iter().enumerate() {
        let repeat = if part.is_infinite() {
            "forever".to_string()
        } else {
            format!("x{}", part.repeat_count)
        };
        println!(
            "part {i}: '{}' {repeat}, pause {} frames, {} frames",
            part.path,
            part.pause_frames,
            part.frames.len()
        );
        for frame in &part.frames {
            println!("  {} ({} bytes)", frame.name, frame.span.len());
        }
    }
    for (line, text) in &desc.skipped_lines {
        println!("skipped line {line}: {text}");
    }
    Ok(())
}
