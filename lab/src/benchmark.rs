use crate::controllers::controller_ids;
use crate::runner::{run_controller, write_json, RunMetrics};
use crate::util::seed_to_hex;
use anyhow::{anyhow, Context, Result};
use rayon::prelude::*;
use serde::Serialize;
use std::collections::HashMap;
use std::path::PathBuf;

#[derive(Clone, Debug)]
pub struct BenchmarkConfig {
    pub controllers: Vec<String>,
    pub seeds: Vec<u32>,
    pub max_ticks: u32,
    pub out_dir: Option<PathBuf>,
    pub jobs: Option<usize>,
}

#[derive(Clone, Debug, Serialize)]
pub struct ControllerSummary {
    pub controller_id: String,
    pub runs: usize,
    pub mean_fitness: f64,
    pub mean_score: f64,
    pub max_score: u32,
    pub mean_ticks: f64,
    pub exhausted_runs: usize,
}

#[derive(Clone, Debug, Serialize)]
pub struct BenchmarkReport {
    pub max_ticks: u32,
    pub seeds: Vec<String>,
    pub ranked: Vec<ControllerSummary>,
}

/// Expands `--controllers`: `all` (or nothing) means the whole roster,
/// otherwise a comma-separated id list checked against it.
pub fn resolve_controllers(selection: Option<&str>) -> Result<Vec<String>> {
    let roster = controller_ids();
    let selection = match selection {
        None | Some("all") => return Ok(roster),
        Some(selection) => selection,
    };

    let mut selected = Vec::new();
    for token in selection.split(',') {
        let token = token.trim();
        if token.is_empty() {
            continue;
        }
        if !roster.iter().any(|id| id == token) {
            return Err(anyhow!("unknown controller '{token}'"));
        }
        selected.push(token.to_string());
    }
    if selected.is_empty() {
        return Err(anyhow!("no controllers parsed from --controllers"));
    }
    Ok(selected)
}

pub fn run_benchmark(cfg: &BenchmarkConfig) -> Result<BenchmarkReport> {
    if cfg.seeds.is_empty() {
        return Err(anyhow!("benchmark needs at least one seed"));
    }
    if cfg.controllers.is_empty() {
        return Err(anyhow!("benchmark needs at least one controller"));
    }

    let jobs: Vec<(String, u32)> = cfg
        .controllers
        .iter()
        .flat_map(|id| cfg.seeds.iter().map(move |&seed| (id.clone(), seed)))
        .collect();

    let sweep = || -> Result<Vec<RunMetrics>> {
        jobs.par_iter()
            .map(|(id, seed)| run_controller(id, *seed, cfg.max_ticks))
            .collect()
    };
    let results = match cfg.jobs {
        Some(threads) => rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()
            .context("failed building benchmark thread pool")?
            .install(sweep),
        None => sweep(),
    }?;

    let mut by_controller: HashMap<&str, Vec<&RunMetrics>> = HashMap::new();
    for metrics in &results {
        by_controller
            .entry(metrics.controller_id.as_str())
            .or_default()
            .push(metrics);
    }

    let mut ranked: Vec<ControllerSummary> = cfg
        .controllers
        .iter()
        .map(|id| summarize(id, &by_controller[id.as_str()]))
        .collect();
    ranked.sort_by(|a, b| b.mean_fitness.total_cmp(&a.mean_fitness));

    for summary in &ranked {
        eprintln!(
            "{:>14}  mean_fitness={:>8.1}  mean_score={:>6.2}  max_score={:>3}  mean_ticks={:>8.1}",
            summary.controller_id,
            summary.mean_fitness,
            summary.mean_score,
            summary.max_score,
            summary.mean_ticks,
        );
    }

    let report = BenchmarkReport {
        max_ticks: cfg.max_ticks,
        seeds: cfg.seeds.iter().map(|&seed| seed_to_hex(seed)).collect(),
        ranked,
    };

    if let Some(out_dir) = &cfg.out_dir {
        write_json(&out_dir.join("benchmark-report.json"), &report)?;
        write_json(&out_dir.join("benchmark-runs.json"), &results)?;
    }

    Ok(report)
}

fn summarize(id: &str, runs: &[&RunMetrics]) -> ControllerSummary {
    let count = runs.len();
    let total_fitness: f64 = runs.iter().map(|run| run.fitness).sum();
    let total_score: u64 = runs.iter().map(|run| u64::from(run.score)).sum();
    let total_ticks: u64 = runs.iter().map(|run| u64::from(run.ticks)).sum();

    ControllerSummary {
        controller_id: id.to_string(),
        runs: count,
        mean_fitness: total_fitness / count as f64,
        mean_score: total_score as f64 / count as f64,
        max_score: runs.iter().map(|run| run.score).max().unwrap_or(0),
        mean_ticks: total_ticks as f64 / count as f64,
        exhausted_runs: runs.iter().filter(|run| run.exhausted).count(),
    }
}
