//! shelfmark - planogram capture and restore demo driver
//!
//! Headless simulation: a capture run records a section and a handful of
//! item scans against a synthetic shelf, saves the planogram, then a
//! restore run replays the stored layout against a freshly scanned anchor.

mod config;
mod sim;

use std::env;
use std::path::PathBuf;

use anyhow::Result;
use tracing::info;

use shelfmark_core::{ScanEvent, TrackingState};
use shelfmark_scene::math;
use shelfmark_session::{AnchorSession, ScanBus, Workflow, WorkflowMode};
use shelfmark_store::{ExportStore, MemoryStore, Repository};

use config::SimConfig;
use sim::ShelfSim;

/// Parsed command-line options.
struct CliOptions {
    config_path: Option<PathBuf>,
    data_dir: Option<PathBuf>,
    capture_only: bool,
}

impl CliOptions {
    fn parse<I>(mut args: I) -> Self
    where
        I: Iterator<Item = String>,
    {
        let mut options = Self {
            config_path: None,
            data_dir: None,
            capture_only: false,
        };
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--config" => options.config_path = args.next().map(PathBuf::from),
                "--data-dir" => options.data_dir = args.next().map(PathBuf::from),
                "--capture-only" => options.capture_only = true,
                _ => {}
            }
        }
        options
    }
}

fn main() -> Result<()> {
    // Initialize tracing with INFO level by default (can be overridden via RUST_LOG env var)
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Starting shelfmark v{}", env!("CARGO_PKG_VERSION"));

    let cli = CliOptions::parse(env::args().skip(1));
    let mut cfg = match &cli.config_path {
        Some(path) => SimConfig::load_from_path(path),
        None => SimConfig::load(),
    };
    if let Some(dir) = cli.data_dir {
        cfg.data_dir = dir;
    }
    info!(profile = ?cfg.tracking, "requesting tracker session profile");

    let sim = ShelfSim::new(cfg.seed, cfg.jitter);
    let bus = ScanBus::new();

    run_capture(&cfg, &sim, &bus)?;
    if !cli.capture_only {
        run_restore(&cfg, &sim, &bus)?;
    }
    Ok(())
}

fn repository(cfg: &SimConfig) -> Result<Repository<MemoryStore>> {
    Ok(Repository::new(
        MemoryStore::new(),
        ExportStore::new(&cfg.data_dir)?,
    ))
}

/// Aim the simulated scanner, publish the scan, and pump it through.
fn scan(workflow: &mut Workflow<MemoryStore>, bus: &ScanBus, sim: &ShelfSim, code: &str, target: [f32; 3]) {
    sim.aim(math::vec3_from_array(target));
    bus.publish(ScanEvent::new(code, "LABEL-TYPE-EAN13"));
    for feedback in workflow.pump(sim) {
        info!(?feedback, "scan outcome");
    }
}

fn run_capture(cfg: &SimConfig, sim: &ShelfSim, bus: &ScanBus) -> Result<()> {
    info!("capture run");
    let mut workflow = Workflow::new(
        WorkflowMode::Capture,
        AnchorSession::new(cfg.defaults.clone()),
        repository(cfg)?,
        bus,
    );

    // Let the per-tick poll discover the shelf before scanning.
    for _ in 0..3 {
        if let Some(feedback) = workflow.tick(TrackingState::Tracking, sim) {
            info!(?feedback, "tick feedback");
        }
    }

    scan(&mut workflow, bus, sim, &cfg.section_code, cfg.section_target);
    for item in &cfg.items {
        scan(&mut workflow, bus, sim, &item.upc, item.target);
    }

    info!(
        pending = workflow.session().pending_items().len(),
        "capture complete"
    );
    workflow.save()?;
    Ok(())
}

fn run_restore(cfg: &SimConfig, sim: &ShelfSim, bus: &ScanBus) -> Result<()> {
    info!("restore run");
    let mut workflow = Workflow::new(
        WorkflowMode::Restore,
        AnchorSession::new(cfg.defaults.clone()),
        repository(cfg)?,
        bus,
    );

    // Scanning the section in the new session materializes the layout.
    scan(&mut workflow, bus, sim, &cfg.section_code, cfg.section_target);

    let session = workflow.session();
    for (id, node) in session.graph().iter() {
        if let (Some(banner), Some(world)) = (&node.banner, session.graph().world_position(id)) {
            info!(
                label = %banner.text,
                x = world.x,
                y = world.y,
                z = world.z,
                "restored node"
            );
        }
    }
    Ok(())
}
