pub mod constants;
pub mod error;
pub mod mask;
pub mod rng;
pub mod sim;

pub use error::InvariantCode;
pub use rng::SeededRng;
pub use sim::{run_generation, Controller, Evaluation, GenerationOutcome, Senses};
