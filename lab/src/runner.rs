use crate::controllers::create_controller;
use anyhow::{anyhow, Context, Result};
use flappy_core::{run_generation, Controller};
use serde::Serialize;
use std::fs;
use std::path::Path;

#[derive(Clone, Debug, Serialize)]
pub struct RunMetrics {
    pub controller_id: String,
    pub seed: u32,
    pub max_ticks: u32,
    pub ticks: u32,
    pub score: u32,
    pub fitness: f64,
    pub exhausted: bool,
}

pub fn run_controller(id: &str, seed: u32, max_ticks: u32) -> Result<RunMetrics> {
    let controller =
        create_controller(id).ok_or_else(|| anyhow!("unknown controller '{id}'"))?;
    run_controller_instance(id, controller, seed, max_ticks)
}

pub fn run_controller_instance(
    id: &str,
    controller: Box<dyn Controller>,
    seed: u32,
    max_ticks: u32,
) -> Result<RunMetrics> {
    if max_ticks == 0 {
        return Err(anyhow!("max_ticks must be > 0"));
    }

    let mut batch = [controller];
    let outcome = run_generation(&mut batch, seed, 1, max_ticks);

    Ok(RunMetrics {
        controller_id: id.to_string(),
        seed,
        max_ticks,
        ticks: outcome.ticks,
        score: outcome.score,
        fitness: outcome.fitness[0],
        exhausted: outcome.exhausted,
    })
}

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed creating directory {}", parent.display()))?;
    }
    let bytes = serde_json::to_vec_pretty(value).context("failed encoding JSON")?;
    fs::write(path, bytes).with_context(|| format!("failed writing {}", path.display()))
}
