use super::{
    BaseSnapshot, BirdSnapshot, Controller, GenerationOutcome, PipeSnapshot, Senses, WorldSnapshot,
};
use crate::constants::{
    BASE_SPEED, BASE_WIDTH, BIRD_HEIGHT, BIRD_START_X, BIRD_START_Y, COLLISION_PENALTY,
    FALL_ACCEL, FLAP_IMPULSE, FLAP_THRESHOLD, GAP_HEIGHT_MAX_EXCLUSIVE, GAP_HEIGHT_MIN, GROUND_Y,
    MAX_DROP_PER_TICK, MAX_TILT_DEG, MIN_TILT_DEG, PASS_REWARD, PIPE_GAP, PIPE_HEIGHT,
    PIPE_SPAWN_X, PIPE_SPEED, PIPE_WIDTH, RISE_BOOST, SURVIVAL_REWARD, TILT_DECAY_PER_TICK,
    TILT_HOLD_MARGIN,
};
use crate::error::InvariantCode;
use crate::mask::{bird_silhouette, pipe_bottom_silhouette, pipe_top_silhouette, SpriteMask};
use crate::rng::SeededRng;

#[derive(Clone, Copy, Debug)]
pub(super) struct Bird {
    x: f32,
    y: f32,
    velocity: f32,
    tilt: f32,
    ticks_since_flap: u32,
    flap_height: f32,
}

impl Bird {
    fn new(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            velocity: 0.0,
            tilt: 0.0,
            ticks_since_flap: 0,
            flap_height: y,
        }
    }

    /// One tick of free flight: `d = v*t + 1.5*t^2` with `t` counted since
    /// the last flap, clamped to a terminal drop and boosted while rising.
    fn integrate(&mut self) {
        self.ticks_since_flap += 1;
        let t = self.ticks_since_flap as f32;
        let mut displacement = self.velocity * t + FALL_ACCEL * t * t;
        if displacement >= MAX_DROP_PER_TICK {
            displacement = MAX_DROP_PER_TICK;
        }
        if displacement < 0.0 {
            displacement -= RISE_BOOST;
        }
        self.y += displacement;

        if displacement < 0.0 || self.y < self.flap_height + TILT_HOLD_MARGIN {
            if self.tilt < MAX_TILT_DEG {
                self.tilt = MAX_TILT_DEG;
            }
        } else if self.tilt > MIN_TILT_DEG {
            self.tilt = (self.tilt - TILT_DECAY_PER_TICK).max(MIN_TILT_DEG);
        }
    }

    fn flap(&mut self) {
        self.velocity = FLAP_IMPULSE;
        self.ticks_since_flap = 0;
        self.flap_height = self.y;
    }
}

#[derive(Clone, Copy, Debug)]
struct Pipe {
    x: f32,
    gap_top: f32,
    gap_bottom: f32,
    top_piece_y: f32,
    passed: bool,
    culled: bool,
}

impl Pipe {
    fn spawn(x: f32, rng: &mut SeededRng) -> Self {
        let mut pipe = Self {
            x,
            gap_top: 0.0,
            gap_bottom: 0.0,
            top_piece_y: 0.0,
            passed: false,
            culled: false,
        };
        pipe.set_gap_top(rng.next_range(GAP_HEIGHT_MIN, GAP_HEIGHT_MAX_EXCLUSIVE) as f32);
        pipe
    }

    /// Fixes the gap height and derives both piece extents from it; drawn
    /// once at spawn.
    fn set_gap_top(&mut self, gap_top: f32) {
        self.gap_top = gap_top;
        self.gap_bottom = gap_top + PIPE_GAP;
        self.top_piece_y = gap_top - PIPE_HEIGHT as f32;
    }

    #[inline]
    fn advance(&mut self) {
        self.x -= PIPE_SPEED;
    }
}

#[derive(Clone, Copy, Debug)]
struct Base {
    x1: f32,
    x2: f32,
}

impl Base {
    fn new() -> Self {
        Self {
            x1: 0.0,
            x2: BASE_WIDTH,
        }
    }

    fn advance(&mut self) {
        self.x1 -= BASE_SPEED;
        self.x2 -= BASE_SPEED;
        if self.x1 + BASE_WIDTH < 0.0 {
            self.x1 = self.x2 + BASE_WIDTH;
        }
        if self.x2 + BASE_WIDTH < 0.0 {
            self.x2 = self.x1 + BASE_WIDTH;
        }
    }
}

struct SpriteBank {
    bird: SpriteMask,
    pipe_top: SpriteMask,
    pipe_bottom: SpriteMask,
}

/// One live agent: physical state plus its fitness accumulator, inline, and
/// the stable `slot` tying it to its controller and its cell in the fitness
/// ledger. Deaths flip `alive`; a single end-of-tick prune removes the
/// records, so same-tick multi-death never shifts a neighbour mid-scan.
struct Agent {
    slot: usize,
    bird: Bird,
    fitness: f64,
    alive: bool,
}

pub(super) struct World<'a, C: Controller> {
    controllers: &'a mut [C],
    agents: Vec<Agent>,
    pipes: Vec<Pipe>,
    base: Base,
    sprites: SpriteBank,
    rng: SeededRng,
    score: u32,
    tick: u32,
    generation: u32,
    final_fitness: Vec<f64>,
}

impl<'a, C: Controller> World<'a, C> {
    pub(super) fn new(controllers: &'a mut [C], seed: u32, generation: u32) -> Self {
        let mut rng = SeededRng::new(seed);
        let pipes = vec![Pipe::spawn(PIPE_SPAWN_X, &mut rng)];
        let agents = (0..controllers.len())
            .map(|slot| Agent {
                slot,
                bird: Bird::new(BIRD_START_X, BIRD_START_Y),
                fitness: 0.0,
                alive: true,
            })
            .collect();
        let final_fitness = vec![0.0; controllers.len()];

        Self {
            controllers,
            agents,
            pipes,
            base: Base::new(),
            sprites: SpriteBank {
                bird: bird_silhouette(),
                pipe_top: pipe_top_silhouette(),
                pipe_bottom: pipe_bottom_silhouette(),
            },
            rng,
            score: 0,
            tick: 0,
            generation,
            final_fitness,
        }
    }

    #[inline]
    pub(super) fn live_count(&self) -> usize {
        self.agents.len()
    }

    #[inline]
    pub(super) fn ticks(&self) -> u32 {
        self.tick
    }

    #[inline]
    pub(super) fn score(&self) -> u32 {
        self.score
    }

    pub(super) fn step(&mut self) {
        if self.agents.is_empty() {
            return;
        }
        debug_assert!(self.agents.iter().all(|agent| agent.alive));
        assert_eq!(self.controllers.len(), self.final_fitness.len());
        self.tick += 1;

        let sensed = self.sensed_pipe_index();

        // Integrate, accrue survival credit, then let each controller decide.
        for agent in &mut self.agents {
            agent.bird.integrate();
            agent.fitness += SURVIVAL_REWARD;

            let pipe = &self.pipes[sensed];
            let senses = Senses {
                y: agent.bird.y,
                gap_above: (agent.bird.y - pipe.gap_top).abs(),
                gap_below: (agent.bird.y - pipe.gap_bottom).abs(),
            };
            if self.controllers[agent.slot].decide(senses) > FLAP_THRESHOLD {
                agent.bird.flap();
            }
        }

        // Collision and pass detection against the pre-advance pipe
        // positions, then scroll each pipe.
        let mut pass_event = false;
        let mut any_died = false;
        for pipe_index in 0..self.pipes.len() {
            for agent in &mut self.agents {
                if !agent.alive {
                    continue;
                }
                let pipe = &self.pipes[pipe_index];
                if collides(&self.sprites, &agent.bird, pipe) {
                    agent.fitness += COLLISION_PENALTY;
                    agent.alive = false;
                    any_died = true;
                    continue;
                }
                if !pipe.passed && pipe.x < agent.bird.x {
                    self.pipes[pipe_index].passed = true;
                    pass_event = true;
                }
            }

            let pipe = &mut self.pipes[pipe_index];
            if pipe.x + (PIPE_WIDTH as f32) < 0.0 {
                pipe.culled = true;
            }
            pipe.advance();
        }

        // The pass event fires once per pipe no matter how many agents
        // crossed it this tick.
        if pass_event {
            self.score += 1;
            for agent in &mut self.agents {
                if agent.alive {
                    agent.fitness += PASS_REWARD;
                }
            }
            let replacement = Pipe::spawn(PIPE_SPAWN_X, &mut self.rng);
            self.pipes.push(replacement);
        }
        self.pipes.retain(|pipe| !pipe.culled);

        // Vertical bounds: ground contact or ceiling exit, no penalty.
        for agent in &mut self.agents {
            if !agent.alive {
                continue;
            }
            let y = agent.bird.y;
            if y + BIRD_HEIGHT as f32 >= GROUND_Y || y <= 0.0 {
                agent.alive = false;
                any_died = true;
            }
        }

        self.base.advance();

        if any_died {
            for agent in &self.agents {
                if !agent.alive {
                    self.final_fitness[agent.slot] = agent.fitness;
                }
            }
            self.agents.retain(|agent| agent.alive);
        }
    }

    /// Obstacle the population senses this tick: the front pipe, unless the
    /// lead agent has already cleared its trailing edge.
    fn sensed_pipe_index(&self) -> usize {
        debug_assert!(!self.pipes.is_empty());
        let lead = &self.agents[0];
        if self.pipes.len() > 1 && lead.bird.x > self.pipes[0].x + PIPE_WIDTH as f32 {
            1
        } else {
            0
        }
    }

    pub(super) fn outcome(&self, exhausted: bool) -> GenerationOutcome {
        let mut fitness = self.final_fitness.clone();
        for agent in &self.agents {
            fitness[agent.slot] = agent.fitness;
        }
        GenerationOutcome {
            generation: self.generation,
            fitness,
            score: self.score,
            ticks: self.tick,
            exhausted,
        }
    }

    pub(super) fn snapshot(&self) -> WorldSnapshot {
        WorldSnapshot {
            tick: self.tick,
            generation: self.generation,
            score: self.score,
            live_count: self.agents.len(),
            sensed_pipe: if self.agents.is_empty() {
                0
            } else {
                self.sensed_pipe_index()
            },
            rng_state: self.rng.state(),
            birds: self
                .agents
                .iter()
                .map(|agent| BirdSnapshot {
                    slot: agent.slot,
                    x: agent.bird.x,
                    y: agent.bird.y,
                    velocity: agent.bird.velocity,
                    tilt: agent.bird.tilt,
                    ticks_since_flap: agent.bird.ticks_since_flap,
                    fitness: agent.fitness,
                })
                .collect(),
            pipes: self
                .pipes
                .iter()
                .map(|pipe| PipeSnapshot {
                    x: pipe.x,
                    gap_top: pipe.gap_top,
                    gap_bottom: pipe.gap_bottom,
                    top_piece_y: pipe.top_piece_y,
                    passed: pipe.passed,
                })
                .collect(),
            base: BaseSnapshot {
                x1: self.base.x1,
                x2: self.base.x2,
                y: GROUND_Y,
            },
        }
    }

    pub(super) fn validate_invariants(&self) -> Result<(), InvariantCode> {
        if self.final_fitness.len() != self.controllers.len() {
            return Err(InvariantCode::FitnessLedgerLength);
        }

        if !self.agents.iter().all(|agent| agent.alive) {
            return Err(InvariantCode::AgentLiveFlag);
        }

        for agent in &self.agents {
            if agent.bird.x != BIRD_START_X {
                return Err(InvariantCode::BirdFixedX);
            }
            if agent.bird.tilt < MIN_TILT_DEG || agent.bird.tilt > MAX_TILT_DEG {
                return Err(InvariantCode::BirdTiltRange);
            }
        }

        for pipe in &self.pipes {
            let gap_top = pipe.gap_top as i32;
            if gap_top < GAP_HEIGHT_MIN || gap_top >= GAP_HEIGHT_MAX_EXCLUSIVE {
                return Err(InvariantCode::GapHeightRange);
            }
            if pipe.gap_bottom - pipe.gap_top != PIPE_GAP {
                return Err(InvariantCode::GapSpanExact);
            }
            if pipe.top_piece_y != pipe.gap_top - PIPE_HEIGHT as f32 {
                return Err(InvariantCode::PipePieceGeometry);
            }
        }

        if !self.pipes.windows(2).all(|pair| pair[0].x < pair[1].x) {
            return Err(InvariantCode::PipeOrdering);
        }

        if (self.base.x1 - self.base.x2).abs() != BASE_WIDTH {
            return Err(InvariantCode::BaseSegmentSpacing);
        }

        Ok(())
    }
}

/// Exact silhouette test of one agent against both pieces of one pipe. The
/// offsets are each piece's position minus the rounded bird position.
fn collides(sprites: &SpriteBank, bird: &Bird, pipe: &Pipe) -> bool {
    let dx = (pipe.x - bird.x).round() as i32;
    let bird_y = bird.y.round() as i32;
    let top_dy = pipe.top_piece_y.round() as i32 - bird_y;
    let bottom_dy = pipe.gap_bottom.round() as i32 - bird_y;

    sprites.bird.overlap(&sprites.pipe_top, dx, top_dy)
        || sprites.bird.overlap(&sprites.pipe_bottom, dx, bottom_dy)
}
