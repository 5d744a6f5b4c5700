pub mod completions;
pub mod edges;
pub mod network;
