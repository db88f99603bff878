pub mod build;
pub mod choices;
mod run_config;

pub use run_config::{
    ClassifierEntry, ClassifierSpec, ClassifierTable, RUN_INPUT_SECTION, RunConfig, SelectionMode,
    default_ensemble,
};
