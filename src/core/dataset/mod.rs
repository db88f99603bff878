mod dataset;
mod value;

pub use dataset::{Column, Dataset};
pub use value::{Value, compare_categories, sorted_categories};
