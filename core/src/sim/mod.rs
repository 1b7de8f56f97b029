use serde::Serialize;

use crate::error::InvariantCode;

mod world;

use world::World;

/// What an agent perceives each tick: its own height plus the absolute
/// vertical distances to the sensed gap's upper and lower edges.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Senses {
    pub y: f32,
    pub gap_above: f32,
    pub gap_below: f32,
}

impl Senses {
    #[inline]
    pub fn as_array(&self) -> [f32; 3] {
        [self.y, self.gap_above, self.gap_below]
    }
}

/// An externally supplied decision function. The simulation depends on
/// nothing else about the controller; a flap is triggered when the returned
/// scalar exceeds the flap threshold.
pub trait Controller {
    fn decide(&mut self, senses: Senses) -> f32;
}

impl<T: Controller + ?Sized> Controller for Box<T> {
    fn decide(&mut self, senses: Senses) -> f32 {
        (**self).decide(senses)
    }
}

impl<T: Controller + ?Sized> Controller for &mut T {
    fn decide(&mut self, senses: Senses) -> f32 {
        (**self).decide(senses)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct BirdSnapshot {
    pub slot: usize,
    pub x: f32,
    pub y: f32,
    pub velocity: f32,
    pub tilt: f32,
    pub ticks_since_flap: u32,
    pub fitness: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct PipeSnapshot {
    pub x: f32,
    pub gap_top: f32,
    pub gap_bottom: f32,
    pub top_piece_y: f32,
    pub passed: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct BaseSnapshot {
    pub x1: f32,
    pub x2: f32,
    pub y: f32,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct WorldSnapshot {
    pub tick: u32,
    pub generation: u32,
    pub score: u32,
    pub live_count: usize,
    pub sensed_pipe: usize,
    pub rng_state: u32,
    pub birds: Vec<BirdSnapshot>,
    pub pipes: Vec<PipeSnapshot>,
    pub base: BaseSnapshot,
}

/// Final report of one generation, slot-ordered to match the controller
/// collection the generation was spawned from.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GenerationOutcome {
    pub generation: u32,
    pub fitness: Vec<f64>,
    pub score: u32,
    pub ticks: u32,
    /// True when the run was cut off externally (tick budget) rather than
    /// ending with the last agent's death.
    pub exhausted: bool,
}

/// Stepwise driver for one generation: one agent per controller, advanced a
/// tick at a time until no agents remain.
pub struct Evaluation<'a, C: Controller> {
    world: World<'a, C>,
}

impl<'a, C: Controller> Evaluation<'a, C> {
    pub fn new(controllers: &'a mut [C], seed: u32, generation: u32) -> Self {
        Self {
            world: World::new(controllers, seed, generation),
        }
    }

    #[inline]
    pub fn step(&mut self) {
        self.world.step();
    }

    #[inline]
    pub fn is_finished(&self) -> bool {
        self.world.live_count() == 0
    }

    #[inline]
    pub fn live_count(&self) -> usize {
        self.world.live_count()
    }

    #[inline]
    pub fn ticks(&self) -> u32 {
        self.world.ticks()
    }

    #[inline]
    pub fn score(&self) -> u32 {
        self.world.score()
    }

    #[inline]
    pub fn snapshot(&self) -> WorldSnapshot {
        self.world.snapshot()
    }

    #[inline]
    pub fn validate(&self) -> Result<(), InvariantCode> {
        self.world.validate_invariants()
    }

    /// Fitness accrued so far, complete for every slot. Callable mid-run:
    /// still-live agents report their running totals.
    pub fn outcome(&self) -> GenerationOutcome {
        self.world.outcome(!self.is_finished())
    }
}

/// Runs a whole generation to termination: all agents dead, or `max_ticks`
/// reached (the external-shutdown path, which still reports the fitness
/// accrued so far). An empty controller collection is a valid terminal case
/// and executes zero ticks.
pub fn run_generation<C: Controller>(
    controllers: &mut [C],
    seed: u32,
    generation: u32,
    max_ticks: u32,
) -> GenerationOutcome {
    let mut eval = Evaluation::new(controllers, seed, generation);
    while !eval.is_finished() && eval.ticks() < max_ticks {
        eval.step();
    }
    eval.outcome()
}
