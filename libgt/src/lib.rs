// (LIB)rary for (G)ame (T)rees.
// Builds an `efg_core::Game` from a game tree which is only described
// implicitly, by how each vertex moves on to the next.

pub mod builder;
pub mod game_tree;

pub use builder::GameBuilder;
pub use game_tree::{ChanceOrPlayer, GameTreeVertex, Leaf, VertexOrLeaf};
