mod optimizer;
mod policy;
mod training;

pub use optimizer::OptimizerConfig;
pub use policy::{ActFnConfig, PolicyConfig};
pub use training::TrainingConfig;
