//! Implicit game trees: a vertex knows who moves and where each action leads.

mod vertex;

pub use vertex::{ChanceOrPlayer, GameTreeVertex, Leaf, VertexOrLeaf};
