use anyhow::{Context, Result};
use ndarray::Array1;
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;
use std::path::PathBuf;

use combind::features::FeatureView;

use super::config;

/// Print the block shapes of a feature view as JSON
pub fn run(
    root: PathBuf,
    config_path: Option<PathBuf>,
    ligands: Vec<String>,
    features: Vec<String>,
) -> Result<()> {
    let mut pipeline = config::open_viewer(root, config_path.as_deref())?;

    let view = pipeline
        .get_view(&ligands, &features)
        .context("Failed to build feature view")?;
    println!("{}", serde_json::to_string_pretty(&shapes(&view))?);
    Ok(())
}

fn shapes(view: &FeatureView) -> Value {
    let lengths = |m: &BTreeMap<String, Array1<f64>>| -> Value {
        m.iter()
            .map(|(ligand, v)| (ligand.clone(), json!(v.len())))
            .collect::<Map<_, _>>()
            .into()
    };

    let mut out = Map::new();
    out.insert("gscore".to_string(), lengths(&view.gscore));
    out.insert("rmsd".to_string(), lengths(&view.rmsd));
    for (feature, blocks) in &view.pairs {
        let blocks: Map<String, Value> = blocks
            .iter()
            .map(|((a, b), m)| (format!("{a}/{b}"), json!([m.nrows(), m.ncols()])))
            .collect();
        out.insert(feature.clone(), blocks.into());
    }
    out.into()
}
