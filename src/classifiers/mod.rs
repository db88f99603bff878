pub mod baseline;
pub mod bayes;
pub mod classifier;
pub mod linear;
pub mod neighbors;
mod pipeline;
pub mod trees;

pub use classifier::{Classifier, FitError};
pub use pipeline::ModelPipeline;
