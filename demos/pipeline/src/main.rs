//! pipeline: end-to-end heat-exposure run.
//!
//! ```text
//! pipeline [run.json]
//! ```
//!
//! With a run file, input paths are resolved relative to the file's
//! directory and results go to `output_dir` in the chosen `format`.  Without
//! one, a small built-in sample is processed and written as CSV to
//! `./output`.
//!
//! ```json
//! {
//!   "curves": "curves.csv",
//!   "sites": "sites.csv",
//!   "zones": "zones.csv",
//!   "nodes": "nodes.csv",
//!   "links": "links.csv",
//!   "parcels": "parcels.csv",
//!   "link_parcels": "link_parcels.csv",
//!   "routes": "routes.csv",
//!   "events": "events.csv",
//!   "output_dir": "out",
//!   "format": "csv",
//!   "population_only": true,
//!   "exposure": { "cabin_rate": 25.5, "malformed_policy": "drop_agent" }
//! }
//! ```
//!
//! Log verbosity follows `RUST_LOG` (default `info`).

mod sample;

use std::fs::File;
use std::io::{self, Cursor, Read};
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use tracing_subscriber::{EnvFilter, fmt};

use hx_core::ExposureConfig;
use hx_exposure::Aggregator;
use hx_output::{CsvWriter, DEFAULT_BATCH, OutputWriter, export};
use hx_spatial::{
    SpatialJoin, ThermalIndex, load_link_parcels_reader, load_network_reader, load_parcels_reader,
    load_routes_reader, load_sites_reader, load_zones_reader,
};
use hx_thermal::load_curves_reader;
use hx_trajectory::{Reconstructor, event_reader};

// ── Run file ──────────────────────────────────────────────────────────────────

#[derive(Deserialize, Default, Clone, Copy, PartialEq, Eq, Debug)]
#[serde(rename_all = "lowercase")]
enum Format {
    #[default]
    Csv,
    Sqlite,
    Parquet,
}

#[derive(Deserialize)]
struct RunFile {
    curves:          PathBuf,
    #[serde(default)]
    sites:           Option<PathBuf>,
    #[serde(default)]
    zones:           Option<PathBuf>,
    nodes:           PathBuf,
    links:           PathBuf,
    parcels:         PathBuf,
    #[serde(default)]
    link_parcels:    Option<PathBuf>,
    routes:          PathBuf,
    events:          PathBuf,
    output_dir:      PathBuf,
    #[serde(default)]
    format:          Format,
    #[serde(default = "yes")]
    population_only: bool,
    #[serde(default)]
    exposure:        ExposureConfig,
}

fn yes() -> bool {
    true
}

type Source = Box<dyn Read>;

/// Every input table as an open reader.
struct Sources {
    curves:       Source,
    sites:        Option<Source>,
    zones:        Option<Source>,
    nodes:        Source,
    links:        Source,
    parcels:      Source,
    link_parcels: Option<Source>,
    routes:       Source,
    events:       Source,
}

fn open(base: &Path, rel: &Path) -> Result<Source> {
    let path = base.join(rel);
    let file = File::open(&path).with_context(|| format!("opening {}", path.display()))?;
    Ok(Box::new(io::BufReader::new(file)))
}

fn open_opt(base: &Path, rel: Option<&PathBuf>) -> Result<Option<Source>> {
    rel.map(|p| open(base, p)).transpose()
}

impl Sources {
    fn from_run_file(base: &Path, run: &RunFile) -> Result<Self> {
        Ok(Self {
            curves:       open(base, &run.curves)?,
            sites:        open_opt(base, run.sites.as_ref())?,
            zones:        open_opt(base, run.zones.as_ref())?,
            nodes:        open(base, &run.nodes)?,
            links:        open(base, &run.links)?,
            parcels:      open(base, &run.parcels)?,
            link_parcels: open_opt(base, run.link_parcels.as_ref())?,
            routes:       open(base, &run.routes)?,
            events:       open(base, &run.events)?,
        })
    }

    fn sample() -> Self {
        let src = |s: &'static str| -> Source { Box::new(Cursor::new(s)) };
        Self {
            curves:       src(sample::CURVES_CSV),
            sites:        Some(src(sample::SITES_CSV)),
            zones:        Some(src(sample::ZONES_CSV)),
            nodes:        src(sample::NODES_CSV),
            links:        src(sample::LINKS_CSV),
            parcels:      src(sample::PARCELS_CSV),
            link_parcels: Some(src(sample::LINK_PARCELS_CSV)),
            routes:       src(sample::ROUTES_CSV),
            events:       src(sample::EVENTS_CSV),
        }
    }
}

// ── Pipeline ──────────────────────────────────────────────────────────────────

fn run<W: OutputWriter>(
    src:             Sources,
    cfg:             &ExposureConfig,
    population_only: bool,
    writer:          &mut W,
) -> Result<()> {
    let t0 = Instant::now();

    let curves = load_curves_reader(src.curves).context("loading temperature curves")?;
    let mut join = SpatialJoin::new();
    if let Some(r) = src.sites {
        load_sites_reader(r, &curves, &mut join).context("loading temperature sites")?;
    }
    if let Some(r) = src.zones {
        load_zones_reader(r, &curves, &mut join).context("loading zone mapping")?;
    }
    let join = join.build();
    let network = load_network_reader(src.nodes, src.links, &curves, &join).context("loading network")?;

    let mut parcels = load_parcels_reader(src.parcels, &curves).context("loading parcels")?;
    if let Some(r) = src.link_parcels {
        load_link_parcels_reader(r, &network, &mut parcels).context("loading link parcels")?;
    }
    let index = ThermalIndex::new(curves, network, parcels.build()).context("binding curves")?;
    let routes = load_routes_reader(src.routes, index.network()).context("loading matched routes")?;
    tracing::info!(
        curves = index.curves().len(),
        nodes = index.network().node_count(),
        links = index.network().link_count(),
        parcels = index.parcels().len(),
        routes = routes.len(),
        elapsed_ms = t0.elapsed().as_millis() as u64,
        "inputs loaded"
    );

    let mut population = Reconstructor::new(&index, &routes, cfg)
        .run(event_reader(src.events))
        .context("reconstructing trajectories")?;
    if population_only {
        let removed = population.retain_population_members();
        tracing::info!(removed, "non-population agents filtered");
    }

    let agg = Aggregator::new(&index, cfg)?;
    let mut links = agg.link_store();
    let summary = agg.run(&mut population, &mut links)?;

    export(writer, &population, &index, &links, DEFAULT_BATCH).context("writing results")?;

    println!(
        "agents: {}  aborted: {}  dropped: {}  undefined air: {}  total air: {:.1}  ({:.2?})",
        summary.agents,
        summary.aborted,
        summary.dropped,
        summary.null_air,
        summary.total_air,
        t0.elapsed()
    );
    Ok(())
}

fn run_with_format(
    src:             Sources,
    cfg:             &ExposureConfig,
    population_only: bool,
    format:          Format,
    out:             &Path,
) -> Result<()> {
    std::fs::create_dir_all(out).with_context(|| format!("creating {}", out.display()))?;
    match format {
        Format::Csv => run(src, cfg, population_only, &mut CsvWriter::new(out)?),
        #[cfg(feature = "sqlite")]
        Format::Sqlite => run(src, cfg, population_only, &mut hx_output::SqliteWriter::new(out)?),
        #[cfg(feature = "parquet")]
        Format::Parquet => run(src, cfg, population_only, &mut hx_output::ParquetWriter::new(out)?),
        #[allow(unreachable_patterns)]
        other => bail!("output format {other:?} needs the matching cargo feature"),
    }
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).with_target(false).init();

    match std::env::args_os().nth(1) {
        Some(arg) => {
            let path = PathBuf::from(arg);
            let text = std::fs::read_to_string(&path)
                .with_context(|| format!("reading run file {}", path.display()))?;
            let run_file: RunFile = serde_json::from_str(&text)
                .with_context(|| format!("parsing run file {}", path.display()))?;
            run_file.exposure.validate()?;

            let base = path.parent().unwrap_or(Path::new(".")).to_path_buf();
            let src = Sources::from_run_file(&base, &run_file)?;
            run_with_format(
                src,
                &run_file.exposure,
                run_file.population_only,
                run_file.format,
                &base.join(&run_file.output_dir),
            )
        }
        None => {
            tracing::info!("no run file given, processing the built-in sample");
            run_with_format(Sources::sample(), &ExposureConfig::default(), true, Format::Csv, Path::new("output"))
        }
    }
}
