use std::fmt::Debug;

/// A state of a game described by its transitions. `GameBuilder` expands
/// the tree reachable from an initial vertex into a `Game`.
pub trait GameTreeVertex
where
    Self: Debug + Clone,
{
    // Information set for a given state (assuming its a player's move). Two
    // vertices of the same player with equal `PlayerInfo` share an infoset.
    type PlayerInfo: Eq + Ord + Debug + Clone;

    // Chance outcomes or player choices. Equal actions at different
    // infosets are unrelated.
    type Action: Eq + Ord + Debug + Clone;

    fn next_player(&self) -> ChanceOrPlayer;
    fn player_information(&self) -> Self::PlayerInfo;

    /// Actions paired with their probabilities. The probabilities are only
    /// read at chance vertices, where they must sum to one.
    fn available_actions(&self) -> Box<[(Self::Action, f64)]>;
    fn next_state(&self, action: &Self::Action) -> VertexOrLeaf<Self>;

    /// Called on every vertex before it is expanded; panics on states the
    /// generator should never produce.
    fn validate(&self) {}
}

/// Who moves at a vertex. Players are numbered from 1.
#[derive(Debug, Clone, PartialEq, PartialOrd)]
pub enum ChanceOrPlayer {
    Player(usize),
    Chance,
}

/// Result of taking an action: another vertex, or a terminal payoff.
pub enum VertexOrLeaf<T: GameTreeVertex> {
    Leaf(Leaf),
    Vertex(T),
}

/// Payoffs at a terminal vertex, by player number starting from player 1.
/// Chance probabilities along the path are not folded in.
#[derive(Clone, Debug, PartialEq)]
pub struct Leaf {
    pub payoffs: Vec<f64>,
}

impl Leaf {
    pub fn new(payoffs: &[f64]) -> Leaf {
        Leaf {
            payoffs: payoffs.to_vec(),
        }
    }

    /// Payoffs of a two player zero sum game.
    pub fn zero_sum(payoff_pl1: f64) -> Leaf {
        Leaf::new(&[payoff_pl1, -payoff_pl1])
    }
}
