pub mod core;
pub mod error;
pub mod sim;

pub use crate::core::{Scheduler, Scheme};
pub use error::SimError;
pub use sim::{JobSpec, Sim, SimConfig, SimReport};
