use flappy_lab::evolve::{run_evolution, EvolveConfig};
use flappy_lab::highscore;

fn smoke_config() -> EvolveConfig {
    EvolveConfig {
        population: 10,
        generations: 4,
        seed: 0xACED_0001,
        max_ticks: 800,
        elite: 2,
        parents: 5,
        mutation_rate: 0.25,
        mutation_scale: 0.5,
    }
}

#[test]
fn evolution_writes_its_artifacts() {
    let dir = tempfile::tempdir().expect("tempdir");
    let summary = run_evolution(&smoke_config(), Some(dir.path())).expect("evolution runs");

    assert_eq!(summary.reports.len(), 4);
    for generation in 1..=4 {
        let path = dir.path().join(format!("generation-{generation:03}.json"));
        assert!(path.is_file(), "missing {}", path.display());
    }
    assert!(dir.path().join("evolution-summary.json").is_file());

    let best: serde_json::Value = serde_json::from_slice(
        &std::fs::read(dir.path().join("best-genome.json")).expect("best genome readable"),
    )
    .expect("best genome parses");
    assert!(best["weights"].as_array().is_some());
}

#[test]
fn artifact_run_matches_in_memory_run() {
    let dir = tempfile::tempdir().expect("tempdir");
    let on_disk = run_evolution(&smoke_config(), Some(dir.path())).expect("evolution runs");
    let in_memory = run_evolution(&smoke_config(), None).expect("evolution runs");
    assert_eq!(on_disk.best_fitness, in_memory.best_fitness);
    assert_eq!(on_disk.best.weights, in_memory.best.weights);
    assert_eq!(on_disk.high_score, in_memory.high_score);
}

#[test]
fn high_score_file_only_moves_up() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("scores/highscore.dat");

    assert_eq!(highscore::load(&path).expect("missing file reads"), 0);
    assert_eq!(highscore::record(&path, 7).expect("record"), 7);
    assert_eq!(highscore::record(&path, 3).expect("record keeps best"), 7);
    assert_eq!(highscore::record(&path, 12).expect("record improves"), 12);
    assert_eq!(highscore::load(&path).expect("reload"), 12);

    std::fs::write(&path, "not a number\n").expect("scribble");
    assert!(highscore::load(&path).is_err());
}
