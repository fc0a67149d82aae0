use std::io::{self, BufReader};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use roi_track::integration::{
    AnnotatingRenderer, FixedSelector, ImageDirSource, LogRenderer, PromptSelector, QuitCommand,
    RegionSelector, Renderer, SharedInput,
};
use roi_track::{
    AcquisitionLoop, DEFAULT_RECORD_PATH, Frame, Region, RegionStore, TemplateTracker,
    TemplateTrackerConfig, TrackerSession,
};

#[derive(Parser, Debug)]
#[command(
    name = "roi-track",
    about = "Track one object across frames, remembering its region between runs"
)]
struct Args {
    /// Directory of frames, read in file-name order
    #[arg(long, value_name = "DIR", default_value = "frames")]
    source: PathBuf,
    /// Where the selected region is saved and restored
    #[arg(long, value_name = "PATH", default_value = DEFAULT_RECORD_PATH)]
    record: PathBuf,
    /// Region to track when none is saved, as x,y,width,height (prompted otherwise)
    #[arg(long, value_name = "X,Y,W,H")]
    roi: Option<Region>,
    /// Write annotated frames to this directory
    #[arg(long, value_name = "DIR")]
    annotate: Option<PathBuf>,
    #[arg(long, default_value_t = TemplateTrackerConfig::default().search_margin)]
    search_margin: u32,
    #[arg(long, default_value_t = TemplateTrackerConfig::default().min_score)]
    min_score: f32,
    /// Search around the last position instead of a predicted one
    #[arg(long)]
    no_motion_prior: bool,
}

type SharedStdin = SharedInput<BufReader<io::Stdin>>;

/// `--roi` if given, the terminal prompt otherwise.
enum Selector {
    Fixed(FixedSelector),
    Prompt(PromptSelector<SharedStdin, io::Stderr>),
}

impl RegionSelector for Selector {
    fn select_region(&mut self, frame: &Frame) -> Option<Region> {
        match self {
            Self::Fixed(selector) => selector.select_region(frame),
            Self::Prompt(selector) => selector.select_region(frame),
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let source = ImageDirSource::open(&args.source)
        .with_context(|| format!("cannot open video source {}", args.source.display()))?;
    let store = RegionStore::new(&args.record);
    let tracker = TemplateTracker::new(TemplateTrackerConfig {
        search_margin: args.search_margin,
        min_score: args.min_score,
        motion_prior: !args.no_motion_prior,
    });
    // The prompt and the quit watcher share one buffer so piped input is not split.
    let stdin = SharedInput::new(BufReader::new(io::stdin()));
    let selector = match args.roi {
        Some(region) => Selector::Fixed(FixedSelector(Some(region))),
        None => Selector::Prompt(PromptSelector::new(stdin.clone(), io::stderr())),
    };
    let annotate = args
        .annotate
        .as_ref()
        .map(AnnotatingRenderer::new)
        .transpose()
        .context("cannot create annotation directory")?;
    let renderer: Box<dyn Renderer> = match annotate {
        Some(annotate) => Box::new((LogRenderer::default(), annotate)),
        None => Box::new(LogRenderer::default()),
    };

    info!("Tracking started. Enter 'q' to quit.");
    let mut acquisition = AcquisitionLoop::new(
        store,
        TrackerSession::new(tracker),
        source,
        selector,
        renderer,
        QuitCommand::new(stdin),
    );
    let summary = acquisition.run().context("tracking aborted")?;

    info!(
        "Processed {} frames ({} tracking, {} lost), final state {}",
        summary.frames,
        summary.tracked,
        summary.lost,
        summary.final_state.label()
    );
    Ok(())
}
