//! World and physics tunables: a 500x800 window, 2x-scaled sprites, and the
//! ground band at y=730.

pub const WINDOW_WIDTH: f32 = 500.0;
pub const WINDOW_HEIGHT: f32 = 800.0;
pub const GROUND_Y: f32 = 730.0;

pub const BIRD_START_X: f32 = 230.0;
pub const BIRD_START_Y: f32 = 350.0;
pub const BIRD_WIDTH: u32 = 68;
pub const BIRD_HEIGHT: u32 = 48;

pub const FLAP_IMPULSE: f32 = -10.5;
pub const FALL_ACCEL: f32 = 1.5;
pub const MAX_DROP_PER_TICK: f32 = 16.0;
pub const RISE_BOOST: f32 = 2.0;

pub const MAX_TILT_DEG: f32 = 25.0;
pub const MIN_TILT_DEG: f32 = -90.0;
pub const TILT_DECAY_PER_TICK: f32 = 20.0;
// A bird still within this margin above its flap height keeps its nose up.
pub const TILT_HOLD_MARGIN: f32 = 50.0;

pub const PIPE_WIDTH: u32 = 104;
pub const PIPE_HEIGHT: u32 = 640;
pub const PIPE_GAP: f32 = 200.0;
pub const PIPE_SPEED: f32 = 5.0;
pub const PIPE_SPAWN_X: f32 = 700.0;
pub const GAP_HEIGHT_MIN: i32 = 40;
pub const GAP_HEIGHT_MAX_EXCLUSIVE: i32 = 450;

pub const PIPE_LIP_HEIGHT: u32 = 40;
pub const PIPE_BODY_INSET: u32 = 4;

pub const BASE_WIDTH: f32 = 672.0;
pub const BASE_SPEED: f32 = 5.0;

pub const SURVIVAL_REWARD: f64 = 1.0;
pub const PASS_REWARD: f64 = 1.0;
pub const COLLISION_PENALTY: f64 = -1.0;
pub const FLAP_THRESHOLD: f32 = 0.5;
