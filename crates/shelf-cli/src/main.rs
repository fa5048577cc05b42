use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::{Path, PathBuf};
use time::format_description::well_known::Rfc3339;
use tracing::{info, warn};

use shelf_compare::{doctor as layout_doctor, CategoryMismatch, Comparator, CompareConfig, MisplacementMode, Summary};
use shelf_proto::{Detection, Discrepancy, Planogram, PlanogramItem};
use shelf_scan::{DetectionSource, FrameNormalizer, FramePump, ReplaySource, ScanConfig, ScanEvent};
use shelf_store::{CatalogStore, PlanogramDraft, PlanogramSource, StoreConfig};

#[derive(Debug, Parser)]
#[command(name = "shelfsnap", version, about = "ShelfSnap - planogram compliance checks")]
struct Cli {
    #[arg(long)]
    config: PathBuf,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Validate the config and every planogram layout in the catalog.
    Doctor,
    /// List planograms in the catalog.
    Planograms,
    /// List catalog products (placeholders when the catalog has none).
    Products {
        /// Write the placeholder products into an empty catalog.
        #[arg(long)]
        seed: bool,
    },
    /// Compare one detection snapshot (JSON array) against a planogram.
    Compare {
        #[arg(long)]
        planogram: String,
        #[arg(long)]
        detections: PathBuf,
    },
    /// Replay recorded frames (JSON lines), freeze, and compare the frozen snapshot.
    Scan {
        #[arg(long)]
        planogram: String,
        #[arg(long)]
        frames: PathBuf,
        #[arg(long)]
        freeze_after: Option<usize>,
        /// Frames are raw detector objects in pixels of a WIDTHxHEIGHT image.
        #[arg(long, value_parser = parse_image_size)]
        image_size: Option<(u32, u32)>,
        /// Offer frames like a camera: drop them while the pump is busy.
        #[arg(long)]
        live: bool,
    },
    /// Build a planogram from a product grid and save it to the catalog.
    Build {
        #[arg(long)]
        grid: PathBuf,
        #[arg(long)]
        name: String,
        #[arg(long)]
        section: Option<String>,
    },
}

#[derive(Debug, serde::Deserialize)]
struct Config {
    store: StoreConfig,
    #[serde(default)]
    compare: CompareConfig,
    #[serde(default)]
    scan: ScanConfig,
}

#[derive(Debug, serde::Deserialize)]
struct GridFile {
    rows: Vec<Vec<Option<String>>>,
}

#[derive(Debug, Serialize)]
struct Report<'a> {
    generated_at: String,
    planogram_id: &'a str,
    summary: Summary,
    discrepancies: Vec<Discrepancy>,
}

fn load_config(path: &Path) -> Result<Config> {
    let s = std::fs::read_to_string(path).with_context(|| format!("read config {}", path.display()))?;
    toml::from_str(&s).context("parse config toml")
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let cfg = load_config(&cli.config)?;
    let mut store = CatalogStore::open(&cfg.store.catalog_path).context("open catalog")?;

    match cli.cmd {
        Command::Doctor => doctor(&cfg, &store)?,
        Command::Planograms => planograms(&store)?,
        Command::Products { seed } => products(&cfg, &mut store, seed)?,
        Command::Compare { planogram, detections } => {
            let dets = read_detections(&detections)?;
            report(&cfg, &store, &planogram, &dets)?;
        }
        Command::Scan { planogram, frames, freeze_after, image_size, live } => {
            let dets = scan(&cfg, &frames, freeze_after, image_size, live).await?;
            report(&cfg, &store, &planogram, &dets)?;
        }
        Command::Build { grid, name, section } => build(&mut store, &grid, &name, section)?,
    }
    Ok(())
}

fn doctor(cfg: &Config, store: &CatalogStore) -> Result<()> {
    info!("doctor: starting (catalog {})", store.path().display());
    anyhow::ensure!(cfg.scan.queue_depth >= 1, "scan.queue_depth must be >= 1");

    if cfg.compare.misplacement == MisplacementMode::Category {
        let policy = CategoryMismatch::from_products(&store.products()?);
        if policy.is_empty() {
            warn!("doctor: misplacement=category but no product has a category; label heuristic will be used");
        }
    }

    let mut bad = 0usize;
    for p in store.planograms()? {
        let items = store.items(&p.id)?;
        match layout_doctor::check_layout(&p, &items) {
            Ok(findings) => {
                for f in &findings {
                    warn!("doctor: planogram {}: {}", p.id, f);
                }
                info!("doctor: planogram {} ({} items): {} findings", p.id, items.len(), findings.len());
            }
            Err(e) => {
                warn!("doctor: planogram {}: {}", p.id, e);
                bad += 1;
            }
        }
    }
    anyhow::ensure!(bad == 0, "{} planogram(s) cannot be compared", bad);

    info!("doctor: OK");
    Ok(())
}

fn planograms(store: &CatalogStore) -> Result<()> {
    for p in store.planograms()? {
        let n = store.items(&p.id)?.len();
        println!(
            "{} name={:?} section={} shelves={} width_mm={} items={}",
            p.id,
            p.name,
            p.section.as_deref().unwrap_or("-"),
            p.shelves_count,
            p.shelf_width_mm,
            n
        );
    }
    Ok(())
}

fn products(cfg: &Config, store: &mut CatalogStore, seed: bool) -> Result<()> {
    let mut list = store.products()?;
    if list.is_empty() && cfg.store.sample_products {
        list = shelf_store::sample_products();
        if seed {
            store.add_products(list.clone()).context("seed products")?;
            info!("products: seeded {} placeholder products", list.len());
        } else {
            info!("products: catalog empty, showing placeholders (use --seed to save them)");
        }
    }
    for p in &list {
        println!("{} sku={} name={:?} width_mm={} category={}", p.id, p.sku, p.name, p.width_mm, p.category.as_deref().unwrap_or("-"));
    }
    Ok(())
}

fn read_detections(path: &Path) -> Result<Vec<Detection>> {
    let s = std::fs::read_to_string(path).with_context(|| format!("read detections {}", path.display()))?;
    let dets: Vec<Detection> = serde_json::from_str(&s).context("parse detections json")?;
    for d in dets.iter().filter(|d| !d.bounding_box.is_well_formed()) {
        warn!("detection {} has a malformed box {:?}", d.id, d.bounding_box);
    }
    Ok(dets)
}

fn parse_image_size(s: &str) -> Result<(u32, u32), String> {
    let (w, h) = s.split_once(['x', 'X']).ok_or_else(|| format!("expected WIDTHxHEIGHT, got {s:?}"))?;
    let dim = |v: &str| v.trim().parse::<u32>().map_err(|e| format!("{v:?}: {e}"));
    Ok((dim(w)?, dim(h)?))
}

async fn scan(
    cfg: &Config,
    frames: &Path,
    freeze_after: Option<usize>,
    image_size: Option<(u32, u32)>,
    live: bool,
) -> Result<Vec<Detection>> {
    let mut source = ReplaySource::open(frames).with_context(|| format!("open frames {}", frames.display()))?;
    if let Some((w, h)) = image_size {
        source = source.with_normalizer(FrameNormalizer::new(w, h)?);
    }
    let freeze_after = freeze_after.or(cfg.scan.freeze_after_frames);
    let pump = FramePump::spawn(cfg.scan.queue_depth);

    if freeze_after == Some(0) {
        pump.send(ScanEvent::Freeze).await?;
    }
    let mut n = 0usize;
    let mut busy = 0usize;
    while let Some(frame) = source.next_frame()? {
        if live {
            if !pump.offer_frame(frame)? {
                busy += 1;
            }
            tokio::task::yield_now().await;
        } else {
            pump.send(ScanEvent::Frame(frame)).await?;
        }
        n += 1;
        if Some(n) == freeze_after {
            pump.send(ScanEvent::Freeze).await?;
        }
    }
    if freeze_after.map_or(true, |k| k > n && k > 0) {
        // freeze on whatever the last frame showed
        pump.send(ScanEvent::Freeze).await?;
    }

    if busy > 0 {
        warn!("scan: {} frames dropped while the pump was busy", busy);
    }
    let session = pump.shutdown().await?;
    info!(
        "scan: {} frames replayed, {} ignored while frozen",
        session.frames_seen(),
        session.frames_dropped()
    );
    Ok(session.state().snapshot())
}

fn compare_with(cfg: &Config, store: &CatalogStore, planogram: &Planogram, items: &[PlanogramItem], dets: &[Detection]) -> Result<Vec<Discrepancy>> {
    let invalid_items = cfg.compare.invalid_items;
    let out = match cfg.compare.misplacement {
        MisplacementMode::Label => Comparator::new().invalid_items(invalid_items).compare(planogram, items, dets),
        MisplacementMode::Category => {
            let policy = CategoryMismatch::from_products(&store.products()?);
            Comparator::with_policy(policy).invalid_items(invalid_items).compare(planogram, items, dets)
        }
    };
    out.with_context(|| format!("compare planogram {}", planogram.id))
}

fn report(cfg: &Config, store: &CatalogStore, planogram_id: &str, dets: &[Detection]) -> Result<()> {
    let planogram = store.planogram(planogram_id)?;
    let items = store.items(planogram_id)?;
    let discrepancies = compare_with(cfg, store, &planogram, &items, dets)?;
    let summary = Summary::of(&items, dets, &discrepancies);
    info!(
        "compare: {} matched, {} missing, {} misplaced, {} overstock",
        summary.matched, summary.missing, summary.misplaced, summary.overstock
    );

    let report = Report {
        generated_at: time::OffsetDateTime::now_utc().format(&Rfc3339).context("format timestamp")?,
        planogram_id,
        summary,
        discrepancies,
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn build(store: &mut CatalogStore, grid: &Path, name: &str, section: Option<String>) -> Result<()> {
    let s = std::fs::read_to_string(grid).with_context(|| format!("read grid {}", grid.display()))?;
    let file: GridFile = serde_json::from_str(&s).context("parse grid json")?;
    let draft = PlanogramDraft::from_rows(file.rows)?;

    let known = store.products()?;
    for r in 0..draft.rows() {
        for c in 0..draft.columns() {
            if let Some(pid) = draft.get(r, c) {
                if !known.iter().any(|p| p.id == pid) {
                    warn!("build: cell ({}, {}) uses unknown product {}", r, c, pid);
                }
            }
        }
    }

    let (planogram, items) = draft.build(name, section);
    if items.is_empty() {
        anyhow::bail!("grid {} has no products", grid.display());
    }
    let id = planogram.id.clone();
    let n = items.len();
    store.insert_planogram(planogram, items)?;
    info!("build: saved planogram {} with {} items", id, n);
    println!("{}", id);
    Ok(())
}
