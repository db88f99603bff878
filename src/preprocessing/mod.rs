mod column_transformer;
mod one_hot_encoder;
mod standard_scaler;

pub use column_transformer::{FittedTransform, TransformSpec};
pub use one_hot_encoder::OneHotEncoder;
pub use standard_scaler::StandardScaler;
