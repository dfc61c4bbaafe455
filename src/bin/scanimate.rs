use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{ArgAction, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "scanimate", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Split an animated GIF into fully painted per-frame PNGs.
    Frames(FramesArgs),
    /// Run the full pipeline and produce the moiré back/front image pair.
    Compose(ComposeArgs),
}

#[derive(Parser, Debug)]
struct FramesArgs {
    /// Input animated GIF.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output directory for the frame PNGs.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct ComposeArgs {
    /// Job description JSON. When set, the individual input flags are ignored.
    #[arg(long)]
    job: Option<PathBuf>,

    /// Subject animation GIF.
    #[arg(long, required_unless_present = "job")]
    animation: Option<PathBuf>,

    /// Interference mask GIF.
    #[arg(long, required_unless_present = "job")]
    mask: Option<PathBuf>,

    /// Output directory root.
    #[arg(long, default_value = "output")]
    out: PathBuf,

    /// Side length of the square normalized frames.
    #[arg(long, default_value_t = 480)]
    size: u32,

    /// Binary threshold on the r+g+b sum (0..765).
    #[arg(long, default_value_t = 510)]
    threshold: u32,

    /// Normalize the subject animation with inverted polarity.
    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    flip_animation: bool,

    /// Polarity of the mask variant used for the front image.
    #[arg(long, default_value_t = false, action = ArgAction::Set)]
    flip_mask: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();
    match cli.cmd {
        Command::Frames(args) => cmd_frames(args),
        Command::Compose(args) => cmd_compose(args),
    }
}

fn cmd_frames(args: FramesArgs) -> anyhow::Result<()> {
    let frames = scanimate::extract_frames(&args.in_path, &args.out)?;
    eprintln!("wrote {} frames to {}", frames.len(), args.out.display());
    Ok(())
}

fn cmd_compose(args: ComposeArgs) -> anyhow::Result<()> {
    let job = match &args.job {
        Some(path) => read_job_json(path)?,
        None => {
            let mut job = scanimate::Job::new(
                args.animation.context("--animation is required")?,
                args.mask.context("--mask is required")?,
                args.out,
            );
            job.resolution = scanimate::Resolution::square(args.size);
            job.threshold = args.threshold;
            job.flip_animation = args.flip_animation;
            job.flip_mask = args.flip_mask;
            job
        }
    };

    let artifacts = scanimate::run_job(&job)?;
    eprintln!(
        "composited {} animation frames against {} mask frames",
        artifacts.animation_frames, artifacts.mask_frames
    );
    eprintln!("wrote {}", job.back_path().display());
    eprintln!("wrote {}", job.front_path().display());
    Ok(())
}

fn read_job_json(path: &Path) -> anyhow::Result<scanimate::Job> {
    let f = File::open(path).with_context(|| format!("open job '{}'", path.display()))?;
    let r = BufReader::new(f);
    let job: scanimate::Job = serde_json::from_reader(r).with_context(|| "parse job JSON")?;
    Ok(job)
}
