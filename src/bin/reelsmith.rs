use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing_subscriber::EnvFilter;

use reelsmith::assets::media::is_tool_on_path;
use reelsmith::assets::pool::{
    IMAGE_EXTENSIONS, MUSIC_EXTENSIONS, TRANSITION_EXTENSIONS, list_assets,
};
use reelsmith::collab::upload::publish;
use reelsmith::{
    Canvas, CommandUploader, EdgeTtsCli, FilterKind, ReelConfig, ReelOptions, ReelSummary,
    UploadOutcome, ViralContent, create_reel, extract_thumbnail,
};

#[derive(Parser, Debug)]
#[command(name = "reelsmith", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build a reel from a script (requires `ffmpeg` on PATH).
    Build(BuildArgs),
    /// Build a reel from a generated content response and optionally upload it.
    Run(RunArgs),
    /// Save the mid-point frame of a video as `<video>.jpg`.
    Thumbnail(ThumbnailArgs),
    /// Check external tools and the directory layout.
    Doctor(LayoutArgs),
}

#[derive(Args, Debug)]
struct LayoutArgs {
    /// Project root holding `images/`, `assets/` and `output/`.
    #[arg(long, default_value = ".")]
    root: PathBuf,

    /// JSON directory layout; relative paths resolve against the file's directory.
    #[arg(long)]
    config: Option<PathBuf>,
}

impl LayoutArgs {
    fn load(&self) -> anyhow::Result<ReelConfig> {
        match &self.config {
            Some(path) => Ok(ReelConfig::from_path(path)?),
            None => Ok(ReelConfig::rooted(&self.root)),
        }
    }
}

#[derive(Args, Debug)]
struct ReelArgs {
    #[command(flatten)]
    layout: LayoutArgs,

    /// Video file name inside the output directory.
    #[arg(long, default_value = "viral_reel.mp4")]
    output_name: String,

    /// Number of images (default: 6 or 7, at random).
    #[arg(long)]
    images: Option<usize>,

    /// Color grade: cinematic, warm or cool (default: random).
    #[arg(long)]
    filter: Option<FilterKind>,

    /// Do not insert transition clips.
    #[arg(long, default_value_t = false)]
    no_transitions: bool,

    /// Do not add background music.
    #[arg(long, default_value_t = false)]
    no_music: bool,

    /// Do not synthesize a voice-over.
    #[arg(long, default_value_t = false)]
    no_voice: bool,

    /// Speech synthesis voice.
    #[arg(long, default_value = "hi-IN-MadhurNeural")]
    voice: String,

    /// Seed for every random choice (default: from entropy).
    #[arg(long)]
    seed: Option<u64>,
}

impl ReelArgs {
    fn options(&self, thumbnail: bool) -> ReelOptions {
        ReelOptions {
            output_name: self.output_name.clone(),
            use_voice: !self.no_voice,
            voice: self.voice.clone(),
            image_count: self.images,
            filter: self.filter,
            use_transitions: !self.no_transitions,
            use_music: !self.no_music,
            thumbnail,
            ..ReelOptions::default()
        }
    }

    fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}

#[derive(Args, Debug)]
struct BuildArgs {
    #[command(flatten)]
    reel: ReelArgs,

    /// Voice-over script.
    #[arg(long, conflicts_with = "script_file", required_unless_present = "script_file")]
    script: Option<String>,

    /// Read the voice-over script from a file.
    #[arg(long)]
    script_file: Option<PathBuf>,

    /// Also save a mid-point thumbnail.
    #[arg(long, default_value_t = false)]
    thumbnail: bool,
}

#[derive(Args, Debug)]
struct RunArgs {
    #[command(flatten)]
    reel: ReelArgs,

    /// Generator response JSON with `hindi_quote`, `english_translation`, `caption`, `hashtags`.
    #[arg(long)]
    content: PathBuf,

    /// Upload program invoked as `PROGRAM <video> --caption <text> [--thumbnail <jpg>]`.
    #[arg(long)]
    uploader: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct ThumbnailArgs {
    /// Finished video.
    #[arg(long)]
    video: PathBuf,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Build(args) => cmd_build(args),
        Command::Run(args) => cmd_run(args),
        Command::Thumbnail(args) => cmd_thumbnail(args),
        Command::Doctor(args) => cmd_doctor(args),
    }
}

fn build(reel: &ReelArgs, script: &str, thumbnail: bool) -> anyhow::Result<ReelSummary> {
    let cfg = reel.layout.load()?;
    cfg.prepare_workspace()?;
    let backend = EdgeTtsCli::default();
    let summary = create_reel(
        &cfg,
        script,
        &reel.options(thumbnail),
        Some(&backend),
        &mut reel.rng(),
    )?;
    eprintln!(
        "wrote {} ({:.1}s, {} images, {} transitions, {}, {:.2} MB)",
        summary.video.display(),
        summary.duration_secs,
        summary.image_count,
        summary.transition_count,
        summary.filter,
        summary.file_size as f64 / 1024.0 / 1024.0
    );
    if let Some(cleanup) = summary.cleanup {
        eprintln!("cleaned up {cleanup}");
    }
    Ok(summary)
}

fn cmd_build(args: BuildArgs) -> anyhow::Result<()> {
    let script = match (&args.script, &args.script_file) {
        (Some(s), _) => s.clone(),
        (None, Some(path)) => std::fs::read_to_string(path)
            .with_context(|| format!("read script '{}'", path.display()))?,
        (None, None) => anyhow::bail!("either --script or --script-file is required"),
    };
    build(&args.reel, script.trim(), args.thumbnail)?;
    Ok(())
}

fn cmd_run(args: RunArgs) -> anyhow::Result<()> {
    let content = ViralContent::from_path(&args.content)?;
    eprintln!("hook: {}", content.hindi_quote);
    let summary = build(&args.reel, &content.hindi_quote, true)?;

    let Some(program) = args.uploader else {
        eprintln!("no uploader configured; video saved but not uploaded");
        return Ok(());
    };
    let uploader = CommandUploader::new(program);
    let outcome = publish(
        &uploader,
        &summary.video,
        &content.caption_text(),
        summary.thumbnail.as_deref(),
    );
    match outcome {
        UploadOutcome::Posted { media_code } => eprintln!("posted: {media_code}"),
        UploadOutcome::ProbablyPosted { reason } => {
            eprintln!("upload likely succeeded ({reason}); check the profile")
        }
        UploadOutcome::Failed(failure) => anyhow::bail!("{failure} ({})", failure.hint()),
    }
    Ok(())
}

fn cmd_thumbnail(args: ThumbnailArgs) -> anyhow::Result<()> {
    match extract_thumbnail(&args.video, Canvas::REEL) {
        Some(path) => {
            eprintln!("wrote {}", path.display());
            Ok(())
        }
        None => anyhow::bail!("could not extract a thumbnail from '{}'", args.video.display()),
    }
}

fn cmd_doctor(args: LayoutArgs) -> anyhow::Result<()> {
    let cfg = args.load()?;
    let mut problems = 0usize;

    for tool in ["ffmpeg", "ffprobe"] {
        if is_tool_on_path(tool) {
            eprintln!("ok      {tool}");
        } else {
            eprintln!("missing {tool} (required)");
            problems += 1;
        }
    }
    // edge-tts has no `-version`; `--help` exits 0 when it is installed.
    if std::process::Command::new("edge-tts")
        .arg("--help")
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .status()
        .is_ok_and(|s| s.success())
    {
        eprintln!("ok      edge-tts");
    } else {
        eprintln!("missing edge-tts (reels will be built without voice)");
    }

    problems += report_pool("images", &cfg.images_dir, IMAGE_EXTENSIONS, true)?;
    report_pool("transitions", &cfg.transitions_dir, TRANSITION_EXTENSIONS, false)?;
    report_pool("music", &cfg.music_dir, MUSIC_EXTENSIONS, false)?;

    if problems > 0 {
        anyhow::bail!("{problems} problem(s) found");
    }
    eprintln!("ready");
    Ok(())
}

fn report_pool(name: &str, dir: &Path, exts: &[&str], required: bool) -> anyhow::Result<usize> {
    let found = list_assets(dir, exts)?;
    if !found.is_empty() {
        eprintln!("ok      {name}: {} file(s) in {}", found.len(), dir.display());
        return Ok(0);
    }
    if required {
        eprintln!("missing {name}: none in {} (required)", dir.display());
        Ok(1)
    } else {
        eprintln!("empty   {name}: none in {}", dir.display());
        Ok(0)
    }
}
