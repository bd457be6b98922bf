pub mod arch;
pub mod error;
pub mod gradient;
pub mod noise;
pub mod optimization;
pub mod parameters;
pub mod shaping;
pub mod space;

pub use error::{EsErr, Result};
pub use noise::NoiseTable;
pub use parameters::ParameterSet;
pub use shaping::RewardPair;
pub use space::{Action, ActionSpace, Observation};
