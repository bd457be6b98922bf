mod act_fn;
mod feedforward;
mod policy;

pub use act_fn::ActFn;
pub use feedforward::FeedForward;
pub use policy::PolicyEvaluator;
