mod k_neighbors;

pub use k_neighbors::{KNeighbors, NeighborWeights};
