mod imputation;
mod partitioner;
mod split;

pub use imputation::{column_median, impute_median};
pub use partitioner::{DataPartitioner, Partition, PartitionPair, PartitionSettings};
pub use split::{SplitIndices, train_test_split};
