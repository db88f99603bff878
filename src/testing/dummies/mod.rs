mod sea_table;

pub use sea_table::{LABEL_COLUMN, SeaTable, randomize_labels};
