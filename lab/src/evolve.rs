//! The optimizer collaborator: evolves flat weight genomes for the `neuro`
//! controller against the simulation core. The core is consumed strictly
//! through its evaluate-a-batch contract: one shared world per generation,
//! one fitness per genome back.

use crate::controllers::{Neuro, NEURO_GENOME_LEN};
use crate::runner::write_json;
use anyhow::{anyhow, Result};
use flappy_core::{run_generation, SeededRng};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EvolveConfig {
    pub population: usize,
    pub generations: u32,
    pub seed: u32,
    pub max_ticks: u32,
    /// Top genomes copied unchanged into the next generation.
    pub elite: usize,
    /// Truncation-selection pool the offspring draw parents from.
    pub parents: usize,
    pub mutation_rate: f32,
    pub mutation_scale: f32,
}

impl Default for EvolveConfig {
    fn default() -> Self {
        Self {
            population: 50,
            generations: 20,
            seed: 0x5EED_B17D,
            max_ticks: 20_000,
            elite: 2,
            parents: 10,
            mutation_rate: 0.15,
            mutation_scale: 0.6,
        }
    }
}

impl EvolveConfig {
    fn validate(&self) -> Result<()> {
        if self.population == 0 {
            return Err(anyhow!("population must be > 0"));
        }
        if self.generations == 0 {
            return Err(anyhow!("generations must be > 0"));
        }
        if self.max_ticks == 0 {
            return Err(anyhow!("max_ticks must be > 0"));
        }
        if self.elite > self.parents || self.parents > self.population {
            return Err(anyhow!(
                "need elite <= parents <= population, got {}/{}/{}",
                self.elite,
                self.parents,
                self.population
            ));
        }
        Ok(())
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Genome {
    pub weights: Vec<f32>,
}

impl Genome {
    fn random(rng: &mut SeededRng) -> Self {
        Self {
            weights: (0..NEURO_GENOME_LEN)
                .map(|_| rng.next_f32() * 4.0 - 2.0)
                .collect(),
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct GenerationReport {
    pub generation: u32,
    pub world_seed: u32,
    pub best_fitness: f64,
    pub mean_fitness: f64,
    pub score: u32,
    pub ticks: u32,
    pub exhausted: bool,
}

#[derive(Clone, Debug, Serialize)]
pub struct EvolutionSummary {
    pub config: EvolveConfig,
    pub reports: Vec<GenerationReport>,
    pub best_fitness: f64,
    pub best_generation: u32,
    pub high_score: u32,
    pub best: Genome,
}

pub fn run_evolution(cfg: &EvolveConfig, out_dir: Option<&Path>) -> Result<EvolutionSummary> {
    cfg.validate()?;

    let mut rng = SeededRng::new(cfg.seed);
    let mut population: Vec<Genome> = (0..cfg.population).map(|_| Genome::random(&mut rng)).collect();

    let mut reports = Vec::with_capacity(cfg.generations as usize);
    let mut best = population[0].clone();
    let mut best_fitness = f64::NEG_INFINITY;
    let mut best_generation = 0;
    let mut high_score = 0u32;

    for generation in 1..=cfg.generations {
        // Pipes differ per generation but replay exactly for a fixed master
        // seed.
        let world_seed = rng.next();

        let mut controllers: Vec<Neuro> = population
            .iter()
            .map(|genome| Neuro::new(genome.weights.clone()))
            .collect();
        let outcome = run_generation(&mut controllers, world_seed, generation, cfg.max_ticks);

        let mut ranked: Vec<usize> = (0..population.len()).collect();
        ranked.sort_by(|&a, &b| outcome.fitness[b].total_cmp(&outcome.fitness[a]));

        let generation_best = outcome.fitness[ranked[0]];
        let mean_fitness =
            outcome.fitness.iter().sum::<f64>() / outcome.fitness.len() as f64;
        if generation_best > best_fitness {
            best_fitness = generation_best;
            best = population[ranked[0]].clone();
            best_generation = generation;
        }
        high_score = high_score.max(outcome.score);

        eprintln!(
            "gen {generation:>3}: best={generation_best:>8.0} mean={mean_fitness:>8.1} score={} ticks={}{}",
            outcome.score,
            outcome.ticks,
            if outcome.exhausted { " (tick budget)" } else { "" },
        );

        let report = GenerationReport {
            generation,
            world_seed,
            best_fitness: generation_best,
            mean_fitness,
            score: outcome.score,
            ticks: outcome.ticks,
            exhausted: outcome.exhausted,
        };
        if let Some(dir) = out_dir {
            write_json(&dir.join(format!("generation-{generation:03}.json")), &report)?;
        }
        reports.push(report);

        population = next_population(cfg, &population, &ranked, &mut rng);
    }

    let summary = EvolutionSummary {
        config: cfg.clone(),
        reports,
        best_fitness,
        best_generation,
        high_score,
        best,
    };
    if let Some(dir) = out_dir {
        write_json(&dir.join("evolution-summary.json"), &summary)?;
        write_json(&dir.join("best-genome.json"), &summary.best)?;
    }

    Ok(summary)
}

fn next_population(
    cfg: &EvolveConfig,
    population: &[Genome],
    ranked: &[usize],
    rng: &mut SeededRng,
) -> Vec<Genome> {
    let mut next = Vec::with_capacity(cfg.population);
    for &index in ranked.iter().take(cfg.elite) {
        next.push(population[index].clone());
    }

    while next.len() < cfg.population {
        let a = ranked[rng.next_int(cfg.parents as u32) as usize];
        let b = ranked[rng.next_int(cfg.parents as u32) as usize];
        let mut child = crossover(&population[a], &population[b], rng);
        mutate(&mut child, cfg, rng);
        next.push(child);
    }
    next
}

/// Uniform crossover, gene by gene.
fn crossover(a: &Genome, b: &Genome, rng: &mut SeededRng) -> Genome {
    let weights = a
        .weights
        .iter()
        .zip(&b.weights)
        .map(|(&wa, &wb)| if rng.next() & 1 == 0 { wa } else { wb })
        .collect();
    Genome { weights }
}

fn mutate(genome: &mut Genome, cfg: &EvolveConfig, rng: &mut SeededRng) {
    for weight in &mut genome.weights {
        if rng.next_f32() < cfg.mutation_rate {
            *weight += (rng.next_f32() * 2.0 - 1.0) * cfg.mutation_scale;
        }
    }
}
