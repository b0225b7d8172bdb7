//! Cycle output persistence

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use anyhow::Context;
use chrono::Utc;
use serde::Serialize;
use tracing::info;
use uuid::Uuid;
use crate::{
    errors::{EngineError, EngineResult},
    pipeline::CycleReport,
    types::{ProcessedPool, ProtocolRelationship, YieldSpread},
};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Snapshot<'a, T: Serialize> {
    cycle_id: Uuid,
    generated_at: String,
    items: &'a [T],
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SpreadRecord<'a> {
    cycle_id: Uuid,
    #[serde(flatten)]
    spread: &'a YieldSpread,
}

fn dated_path(output_dir: &Path, folder: &str, prefix: &str, extension: &str) -> PathBuf {
    output_dir
        .join(folder)
        .join(format!("{}_{}.{}", prefix, Utc::now().format("%Y-%m-%d"), extension))
}

fn storage_error(path: &Path) -> impl FnOnce(anyhow::Error) -> EngineError + '_ {
    move |source| EngineError::Storage {
        path: path.to_path_buf(),
        source,
    }
}

fn write_snapshot<T: Serialize>(path: &Path, cycle_id: Uuid, items: &[T]) -> EngineResult<()> {
    let write = || -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let snapshot = Snapshot {
            cycle_id,
            generated_at: Utc::now().to_rfc3339(),
            items,
        };
        let json = serde_json::to_string_pretty(&snapshot).context("Failed to serialize snapshot")?;
        fs::write(path, json)?;
        Ok(())
    };
    write().map_err(storage_error(path))
}

pub fn save_pools(output_dir: &Path, cycle_id: Uuid, pools: &[ProcessedPool]) -> EngineResult<PathBuf> {
    let path = dated_path(output_dir, "pools", "pools", "json");
    write_snapshot(&path, cycle_id, pools)?;
    info!(%cycle_id, pools = pools.len(), path = %path.display(), "Saved processed pools");
    Ok(path)
}

pub fn save_relationships(
    output_dir: &Path,
    cycle_id: Uuid,
    relationships: &[ProtocolRelationship],
) -> EngineResult<PathBuf> {
    let path = dated_path(output_dir, "relationships", "relationships", "json");
    write_snapshot(&path, cycle_id, relationships)?;
    info!(%cycle_id, edges = relationships.len(), "Saved protocol relationships");
    Ok(path)
}

/// Append spreads to the day's JSONL log.
pub fn save_spreads(output_dir: &Path, cycle_id: Uuid, spreads: &[YieldSpread]) -> EngineResult<PathBuf> {
    let path = dated_path(output_dir, "spreads", "spreads", "jsonl");
    let append = || -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new().create(true).append(true).open(&path)?;
        for spread in spreads {
            writeln!(file, "{}", serde_json::to_string(&SpreadRecord { cycle_id, spread })?)?;
        }
        Ok(())
    };
    append().map_err(storage_error(&path))?;

    info!(%cycle_id, spreads = spreads.len(), "Saved yield spreads");
    Ok(path)
}

pub fn save_cycle(output_dir: &Path, report: &CycleReport) -> EngineResult<()> {
    save_pools(output_dir, report.cycle_id, &report.pools)?;
    save_spreads(output_dir, report.cycle_id, &report.spreads.spreads)?;
    save_relationships(output_dir, report.cycle_id, &report.relationships)?;
    Ok(())
}
