//! Controller roster: named baseline and heuristic controllers plus the
//! evolvable feedforward net. The simulation core sees all of them through
//! the `Controller` trait alone.

use flappy_core::constants::WINDOW_HEIGHT;
use flappy_core::{Controller, Senses};
use serde::Serialize;

pub const SENSOR_COUNT: usize = 3;

/// Hidden layer width of the evolvable net.
pub const NEURO_HIDDEN: usize = 6;
/// Flat genome length: input-to-hidden weights and biases, then the output
/// row and its bias.
pub const NEURO_GENOME_LEN: usize = (SENSOR_COUNT + 1) * NEURO_HIDDEN + NEURO_HIDDEN + 1;

const NEURO_BASELINE_SEED: u32 = 0x00B1_12D5;

#[derive(Clone, Debug, Serialize)]
pub struct ControllerManifestEntry {
    pub id: String,
    pub family: String,
    pub description: String,
    pub config_hash: String,
    pub config: serde_json::Value,
}

// ── Baselines ───────────────────────────────────────────────────────

/// Never flaps; the gravity-only reference.
pub struct Sitter;

impl Controller for Sitter {
    fn decide(&mut self, _senses: Senses) -> f32 {
        0.0
    }
}

#[derive(Clone, Copy, Debug, Serialize)]
pub struct MetronomeConfig {
    pub id: &'static str,
    pub description: &'static str,
    pub period: u32,
}

/// Flaps on a fixed period, blind to the sensors.
pub struct Metronome {
    cfg: MetronomeConfig,
    tick: u32,
}

impl Metronome {
    pub fn new(cfg: MetronomeConfig) -> Self {
        Self { cfg, tick: 0 }
    }
}

impl Controller for Metronome {
    fn decide(&mut self, _senses: Senses) -> f32 {
        self.tick += 1;
        if self.tick % self.cfg.period == 0 {
            1.0
        } else {
            0.0
        }
    }
}

fn metronome_configs() -> [MetronomeConfig; 2] {
    [
        MetronomeConfig {
            id: "metronome-5",
            description: "Blind five-tick flapper, climbs toward the ceiling.",
            period: 5,
        },
        MetronomeConfig {
            id: "metronome-9",
            description: "Blind nine-tick flapper, slower climb.",
            period: 9,
        },
    ]
}

// ── Gap seekers ─────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, Serialize)]
pub struct GapSeekerConfig {
    pub id: &'static str,
    pub description: &'static str,
    /// Flap while the lower gap edge is nearer than the upper edge plus
    /// this band; larger bands ride lower in the gap.
    pub hold_band: f32,
    /// Height below which (numerically above which) the seeker always
    /// flaps, regardless of the gap.
    pub floor_guard: f32,
}

/// Heuristic on the raw sensor triple: keep the bird inside the sensed gap.
pub struct GapSeeker {
    cfg: GapSeekerConfig,
}

impl GapSeeker {
    pub fn new(cfg: GapSeekerConfig) -> Self {
        Self { cfg }
    }
}

impl Controller for GapSeeker {
    fn decide(&mut self, senses: Senses) -> f32 {
        if senses.y >= self.cfg.floor_guard {
            return 1.0;
        }
        if senses.gap_below < senses.gap_above + self.cfg.hold_band {
            1.0
        } else {
            0.0
        }
    }
}

fn gap_seeker_configs() -> [GapSeekerConfig; 3] {
    [
        GapSeekerConfig {
            id: "gap-center",
            description: "Holds the middle of the sensed gap.",
            hold_band: 0.0,
            floor_guard: 660.0,
        },
        GapSeekerConfig {
            id: "gap-low",
            description: "Rides the lower half of the gap, flaps late.",
            hold_band: -60.0,
            floor_guard: 650.0,
        },
        GapSeekerConfig {
            id: "gap-skimmer",
            description: "Hugs the upper gap edge, flaps early.",
            hold_band: 60.0,
            floor_guard: 670.0,
        },
    ]
}

// ── Evolvable net ───────────────────────────────────────────────────

/// 3-input feedforward net over a flat weight genome: tanh hidden layer,
/// sigmoid output. Inputs are scaled by the window height so the weights
/// work on unit-order values.
pub struct Neuro {
    weights: Vec<f32>,
}

impl Neuro {
    pub fn new(weights: Vec<f32>) -> Self {
        assert_eq!(weights.len(), NEURO_GENOME_LEN, "genome length mismatch");
        Self { weights }
    }

    pub fn from_seed(seed: u32) -> Self {
        let mut rng = flappy_core::SeededRng::new(seed);
        let weights = (0..NEURO_GENOME_LEN)
            .map(|_| rng.next_f32() * 4.0 - 2.0)
            .collect();
        Self::new(weights)
    }

    fn forward(&self, inputs: [f32; SENSOR_COUNT]) -> f32 {
        let mut cursor = 0;
        let mut hidden = [0.0f32; NEURO_HIDDEN];
        for node in hidden.iter_mut() {
            let mut sum = 0.0;
            for &input in &inputs {
                sum += self.weights[cursor] * input;
                cursor += 1;
            }
            sum += self.weights[cursor]; // bias
            cursor += 1;
            *node = sum.tanh();
        }

        let mut out = 0.0;
        for &node in &hidden {
            out += self.weights[cursor] * node;
            cursor += 1;
        }
        out += self.weights[cursor];
        debug_assert_eq!(cursor + 1, NEURO_GENOME_LEN);

        1.0 / (1.0 + (-out).exp())
    }
}

impl Controller for Neuro {
    fn decide(&mut self, senses: Senses) -> f32 {
        let [y, above, below] = senses.as_array();
        self.forward([
            y / WINDOW_HEIGHT,
            above / WINDOW_HEIGHT,
            below / WINDOW_HEIGHT,
        ])
    }
}

// ── Roster ──────────────────────────────────────────────────────────

pub fn controller_ids() -> Vec<String> {
    describe_controllers()
        .into_iter()
        .map(|(id, _)| id.to_string())
        .collect()
}

pub fn describe_controllers() -> Vec<(&'static str, &'static str)> {
    let mut out = vec![("sitter", "Never flaps; gravity-only baseline.")];
    for cfg in metronome_configs() {
        out.push((cfg.id, cfg.description));
    }
    for cfg in gap_seeker_configs() {
        out.push((cfg.id, cfg.description));
    }
    out.push((
        "neuro-baseline",
        "Feedforward net with a fixed seeded random genome.",
    ));
    out
}

pub fn create_controller(id: &str) -> Option<Box<dyn Controller>> {
    if id == "sitter" {
        return Some(Box::new(Sitter));
    }
    if id == "neuro-baseline" {
        return Some(Box::new(Neuro::from_seed(NEURO_BASELINE_SEED)));
    }
    for cfg in metronome_configs() {
        if cfg.id == id {
            return Some(Box::new(Metronome::new(cfg)));
        }
    }
    for cfg in gap_seeker_configs() {
        if cfg.id == id {
            return Some(Box::new(GapSeeker::new(cfg)));
        }
    }
    None
}

pub fn controller_manifest_entries() -> Vec<ControllerManifestEntry> {
    let mut entries = vec![manifest_entry(
        "sitter",
        "baseline",
        "Never flaps; gravity-only baseline.",
        serde_json::json!({}),
    )];

    for cfg in metronome_configs() {
        let config = serde_json::to_value(cfg).expect("config should serialize");
        entries.push(manifest_entry(cfg.id, "metronome", cfg.description, config));
    }
    for cfg in gap_seeker_configs() {
        let config = serde_json::to_value(cfg).expect("config should serialize");
        entries.push(manifest_entry(cfg.id, "gap_seeker", cfg.description, config));
    }

    let baseline = serde_json::json!({ "seed": NEURO_BASELINE_SEED, "hidden": NEURO_HIDDEN });
    entries.push(manifest_entry(
        "neuro-baseline",
        "neuro",
        "Feedforward net with a fixed seeded random genome.",
        baseline,
    ));
    entries
}

fn manifest_entry(
    id: &str,
    family: &str,
    description: &str,
    config: serde_json::Value,
) -> ControllerManifestEntry {
    ControllerManifestEntry {
        id: id.to_string(),
        family: family.to_string(),
        description: description.to_string(),
        config_hash: config_fingerprint(&config),
        config,
    }
}

/// FNV-1a over the canonical JSON encoding; stable across runs so manifests
/// can be diffed.
pub fn config_fingerprint(config: &serde_json::Value) -> String {
    let encoded = config.to_string();
    let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
    for byte in encoded.bytes() {
        hash ^= u64::from(byte);
        hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
    }
    format!("{hash:016x}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_listed_id_constructs() {
        for id in controller_ids() {
            assert!(create_controller(&id).is_some(), "missing controller {id}");
        }
        assert!(create_controller("no-such-controller").is_none());
    }

    #[test]
    fn manifest_covers_the_roster_with_stable_fingerprints() {
        let entries = controller_manifest_entries();
        assert_eq!(entries.len(), controller_ids().len());
        for entry in &entries {
            assert_eq!(
                entry.config_hash,
                config_fingerprint(&entry.config),
                "fingerprint drift for {}",
                entry.id
            );
        }
    }

    #[test]
    fn neuro_output_is_a_probability() {
        let mut net = Neuro::from_seed(0x1234_5678);
        let senses = Senses {
            y: 350.0,
            gap_above: 120.0,
            gap_below: 80.0,
        };
        let out = net.decide(senses);
        assert!((0.0..=1.0).contains(&out));
    }

    #[test]
    fn same_genome_same_decision() {
        let senses = Senses {
            y: 410.0,
            gap_above: 60.0,
            gap_below: 140.0,
        };
        let mut a = Neuro::from_seed(0x0F0F_0F0F);
        let mut b = Neuro::from_seed(0x0F0F_0F0F);
        assert_eq!(a.decide(senses), b.decide(senses));
    }

    #[test]
    fn gap_seeker_flaps_when_the_floor_is_close() {
        let mut seeker = GapSeeker::new(gap_seeker_configs()[0]);
        let senses = Senses {
            y: 700.0,
            gap_above: 400.0,
            gap_below: 200.0,
        };
        assert!(seeker.decide(senses) > 0.5);
    }
}
