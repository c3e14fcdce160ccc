//! gesture_pad: face-gated gesture control entry point.

use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{Parser, ValueEnum};
use tracing::info;

use face_gate::{DetectingRecognizer, DownsampleEmbedder, FixedBoxes, IdentityGate, Registry};
use gesture_engine::GestureEngine;
use gesture_pad::logging::init_logging;
use gesture_pad::{
    run, ActionSink, AppConfig, CameraFaces, FrameSource, LogSink, ScriptSource, Session, SinkKind,
};
use hand_pose::Handedness;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum SinkArg { Log, Os }

#[derive(Clone, Copy, Debug, ValueEnum)]
enum HandArg { Right, Left }

#[derive(Parser, Debug)]
#[command(name = "gesture_pad", about = "Face-gated hand-gesture desktop controller")]
struct Cli {
    /// JSON config file; flags below override its fields
    #[arg(long)]
    config: Option<PathBuf>,

    /// Replay a JSON-lines recording instead of opening the simulator
    #[arg(long)]
    script: Option<PathBuf>,

    /// Directory of enrolled `<name>.json` faces
    #[arg(long)]
    registry_dir: Option<PathBuf>,

    /// Person allowed to unlock gesture control
    #[arg(long)]
    identity: Option<String>,

    /// Face match distance threshold
    #[arg(long)]
    threshold: Option<f32>,

    /// Where actions go
    #[arg(long, value_enum)]
    sink: Option<SinkArg>,

    /// Which hand faces the camera
    #[arg(long, value_enum)]
    hand: Option<HandArg>,
}

impl Cli {
    fn into_config(self) -> anyhow::Result<(AppConfig, Option<PathBuf>)> {
        let mut cfg = match &self.config {
            Some(path) => AppConfig::load(path)?,
            None       => AppConfig::default(),
        };
        if let Some(dir) = self.registry_dir { cfg.registry_dir = dir; }
        if let Some(id) = self.identity      { cfg.identity = id; }
        if let Some(t) = self.threshold      { cfg.match_threshold = t; }
        if let Some(s) = self.sink {
            cfg.sink = match s { SinkArg::Log => SinkKind::Log, SinkArg::Os => SinkKind::Os };
        }
        if let Some(h) = self.hand {
            cfg.engine.handedness = match h { HandArg::Right => Handedness::Right, HandArg::Left => Handedness::Left };
        }
        cfg.validate()?;
        Ok((cfg, self.script))
    }
}

fn make_sink(kind: SinkKind) -> anyhow::Result<Box<dyn ActionSink>> {
    match kind {
        SinkKind::Log => Ok(Box::new(LogSink)),
        #[cfg(feature = "os-input")]
        SinkKind::Os  => Ok(Box::new(gesture_pad::EnigoSink::new()?)),
        #[cfg(not(feature = "os-input"))]
        SinkKind::Os  => bail!("the os sink needs a build with --features os-input"),
    }
}

fn make_source(
    script:   Option<PathBuf>,
    cfg:      &AppConfig,
    registry: &Registry,
) -> anyhow::Result<Box<dyn FrameSource>> {
    if let Some(path) = script {
        info!("Mode: replaying {}", path.display());
        let src = ScriptSource::open(&path).with_context(|| format!("opening {}", path.display()))?;
        return Ok(Box::new(src));
    }

    #[cfg(feature = "window")]
    {
        info!("Mode: keyboard simulation (hold F to show your face)");
        let face = registry.get(&cfg.identity).cloned();
        let band = (cfg.engine.scroll_up_max_y, cfg.engine.scroll_down_min_y);
        let src = gesture_pad::sim::SimSource::new(cfg.engine.handedness, face, band)?;
        Ok(Box::new(src))
    }

    #[cfg(not(feature = "window"))]
    {
        let _ = (cfg, registry);
        bail!("no frame source: pass --script, or build with --features window for the simulator")
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging("gesture_pad=info,face_gate=info,gesture_engine=info");

    let (cfg, script) = cli.into_config()?;
    info!("gesture_pad v{} starting", env!("CARGO_PKG_VERSION"));

    let registry = Registry::load_dir(&cfg.registry_dir)
        .with_context(|| format!("loading face registry from {}", cfg.registry_dir.display()))?;
    let engine = GestureEngine::new(cfg.engine.clone())?;
    let sink = make_sink(cfg.sink)?;
    let mut source = make_source(script, &cfg, &registry)?;
    let gate = IdentityGate::new(registry, &cfg.identity, cfg.match_threshold)?;

    info!("waiting for {} to show their face", cfg.identity);
    let recognizer = CameraFaces(DetectingRecognizer::new(
        FixedBoxes(cfg.face_boxes.clone()),
        DownsampleEmbedder { side: cfg.embed_side },
    ));
    let mut session = Session::new(gate, recognizer, engine, sink);
    let stats = run(&mut source, &mut session)?;
    println!(
        "{} frames, {} actions, {} dispatch failures",
        stats.frames, stats.actions, stats.sink_failures
    );
    Ok(())
}
