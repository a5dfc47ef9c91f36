use crate::{
    core::{Scheme, Ticks},
    error::SimError,
};

/// Validated driver settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimConfig {
    pub cores: usize,
    pub scheme: Scheme,
    /// Time slice length; only consulted under round robin.
    pub quantum: Option<Ticks>,
}

impl SimConfig {
    pub fn new(cores: usize, scheme: Scheme, quantum: Option<Ticks>) -> Result<Self, SimError> {
        if cores == 0 {
            return Err(SimError::NoCores);
        }

        let quantum = match (scheme, quantum) {
            (Scheme::Rr, Some(q)) if q > 0 => Some(q),
            (Scheme::Rr, _) => return Err(SimError::MissingQuantum),
            _ => None,
        };

        Ok(Self {
            cores,
            scheme,
            quantum,
        })
    }
}
