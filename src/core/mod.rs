pub mod column_types;
pub mod dataset;
pub mod estimators;
pub mod matrix;
pub mod metadata;

pub use column_types::{ColumnTypeMap, FeatureKind};
pub use dataset::{Column, Dataset, Value};
pub use matrix::{Matrix, RowView};
pub use metadata::{ColumnMetadata, ColumnType, DatasetMetadata};
