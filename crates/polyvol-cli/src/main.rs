use anyhow::{bail, Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use polyvol::periodic::MinimumImage;
use polyvol::{AtomIndex, CoordinateProvider, PolyhedralVolume, Structure, Topology, VolumeError};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::Level;
use tracing_subscriber::fmt::SubscriberBuilder;

mod input;

#[derive(Parser)]
#[command(name = "polyvol")]
#[command(about = "Volumes of polyhedral clusters in crystal structures")]
struct Cmd {
    /// Raise log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Volume of one cluster; topology follows from the number of sites
    Volume {
        /// Structure JSON (lattice + fractional sites)
        #[arg(long)]
        structure: PathBuf,
        /// Site indices in canonical vertex order, comma separated
        #[arg(long, value_delimiter = ',', required = true)]
        sites: Vec<AtomIndex>,
        /// Resolve sites to the periodic image nearest the first site
        #[arg(long)]
        wrap: bool,
        /// Octahedra only: use the 4-tetrahedron canonical split
        #[arg(long)]
        canonical: bool,
    },
    /// Volumes for every cluster row of a CSV file (columns s0..s7)
    Batch {
        #[arg(long)]
        structure: PathBuf,
        #[arg(long)]
        clusters: PathBuf,
        #[arg(long)]
        out: PathBuf,
        #[arg(long)]
        wrap: bool,
    },
    /// Print a demo structure (octahedral molecule across the cell corner)
    Demo {
        #[arg(long, default_value_t = 10.0)]
        cell: f64,
        #[arg(long, default_value_t = 1.6)]
        bond: f64,
    },
}

/// One computed cluster volume.
#[derive(Debug, Serialize)]
struct VolumeRecord {
    topology: Topology,
    sites: Vec<AtomIndex>,
    volume: f64,
}

fn main() -> Result<()> {
    let cmd = Cmd::parse();
    let level = match cmd.verbose {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    SubscriberBuilder::default()
        .with_target(false)
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
    match cmd.action {
        Action::Volume {
            structure,
            sites,
            wrap,
            canonical,
        } => volume(&structure, sites, wrap, canonical),
        Action::Batch {
            structure,
            clusters,
            out,
            wrap,
        } => batch(&structure, &clusters, &out, wrap),
        Action::Demo { cell, bond } => demo(cell, bond),
    }
}

fn volume(structure_path: &Path, sites: Vec<AtomIndex>, wrap: bool, canonical: bool) -> Result<()> {
    let structure = input::read_structure(structure_path)?;
    tracing::info!(structure = %structure_path.display(), sites = ?sites, wrap, canonical, "volume");
    let record = compute(&structure, sites, wrap, canonical)?;
    println!("{}", serde_json::to_string_pretty(&record)?);
    Ok(())
}

fn batch(structure_path: &Path, clusters_path: &Path, out: &Path, wrap: bool) -> Result<()> {
    let structure = input::read_structure(structure_path)?;
    let clusters = input::read_clusters(clusters_path)?;
    tracing::info!(
        structure = %structure_path.display(),
        clusters = clusters.len(),
        wrap,
        "batch"
    );
    let mut records = Vec::with_capacity(clusters.len());
    for (row, sites) in clusters.into_iter().enumerate() {
        let record =
            compute(&structure, sites, wrap, false).with_context(|| format!("cluster row {row}"))?;
        records.push(record);
    }

    if let Some(parent) = out.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(out, serde_json::to_vec_pretty(&records)?)
        .with_context(|| format!("writing {}", out.display()))?;
    tracing::info!(out = %out.display(), records = records.len(), "batch_done");
    Ok(())
}

fn demo(cell: f64, bond: f64) -> Result<()> {
    let Some((structure, sites)) = polyvol::special::corner_octahedron_structure(cell, bond) else {
        bail!("demo needs 0 < bond < cell / 4 (got cell {cell}, bond {bond})");
    };
    tracing::info!(sites = ?sites, "octahedron sites in canonical order");
    println!("{}", serde_json::to_string_pretty(&structure)?);
    Ok(())
}

fn compute(structure: &Structure, sites: Vec<AtomIndex>, wrap: bool, canonical: bool) -> Result<VolumeRecord> {
    let Some(topology) = Topology::from_vertex_count(sites.len()) else {
        bail!(
            "{} sites given; clusters have 4 (tetrahedron), 6 (octahedron) or 8 (cube)",
            sites.len()
        );
    };
    if canonical && topology != Topology::Octahedron {
        bail!("--canonical applies to octahedra only, got a {topology}");
    }
    let volume = if wrap {
        let image = MinimumImage::about_site(structure, sites[0])?;
        cluster_volume(PolyhedralVolume::new(&image), &sites, canonical)?
    } else {
        cluster_volume(PolyhedralVolume::new(structure), &sites, canonical)?
    };
    Ok(VolumeRecord {
        topology,
        sites,
        volume,
    })
}

fn cluster_volume<P: CoordinateProvider + ?Sized>(
    calc: PolyhedralVolume<'_, P>,
    sites: &[AtomIndex],
    canonical: bool,
) -> Result<f64, VolumeError> {
    if canonical {
        calc.octahedral_canonical(sites)
    } else {
        calc.cluster(sites)
    }
}
