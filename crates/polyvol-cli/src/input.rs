//! Input loaders: structures (JSON) and cluster tables (CSV).

use anyhow::{bail, Context, Result};
use polars::prelude::*;
use polyvol::{AtomIndex, Structure};
use std::fs;
use std::path::Path;

/// Columns `s0..s7` hold the site indices of one cluster per row.
const MAX_SLOTS: usize = 8;

pub fn read_structure(path: &Path) -> Result<Structure> {
    let text =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing structure {}", path.display()))
}

/// Read one cluster per CSV row from columns `s0, s1, ...`.
///
/// Trailing empty cells end a row's cluster early, so 4-, 6- and 8-site
/// clusters can share one file. A filled cell after an empty one is an error.
pub fn read_clusters(path: &Path) -> Result<Vec<Vec<AtomIndex>>> {
    let lf = LazyCsvReader::new(path)
        .with_infer_schema_length(Some(100))
        .finish()
        .with_context(|| format!("opening {}", path.display()))?;
    let df = lf
        .collect()
        .with_context(|| format!("reading {}", path.display()))?;
    tracing::debug!(rows = df.height(), cols = df.width(), "clusters_csv_shape");

    let mut columns = Vec::with_capacity(MAX_SLOTS);
    for slot in 0..MAX_SLOTS {
        let name = format!("s{slot}");
        let Ok(col) = df.column(&name) else {
            break;
        };
        let col = col
            .cast(&DataType::Int64)
            .with_context(|| format!("column {name} is not integral"))?;
        columns.push(col);
    }
    if columns.is_empty() {
        bail!("{}: no cluster columns (expected s0, s1, ...)", path.display());
    }

    let mut clusters = Vec::with_capacity(df.height());
    for row in 0..df.height() {
        let mut sites = Vec::with_capacity(columns.len());
        let mut ended = false;
        for (slot, col) in columns.iter().enumerate() {
            match col.i64()?.get(row) {
                None => ended = true,
                Some(_) if ended => {
                    bail!("{}: row {row}: gap before column s{slot}", path.display());
                }
                Some(v) if v < 0 => {
                    bail!("{}: row {row} has negative site index {v}", path.display());
                }
                Some(v) => sites.push(v as AtomIndex),
            }
        }
        clusters.push(sites);
    }
    Ok(clusters)
}
