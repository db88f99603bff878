mod learner_choice;
mod registry_choice;
mod schema;

pub use learner_choice::*;
pub use registry_choice::RegistryChoice;
pub use schema::{FieldKind, FieldSpec, check_params, specs_for_kind};
