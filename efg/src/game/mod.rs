mod arena;
mod edit;
mod extensive_form_game;
mod handles;
mod infoset;
mod node;
mod outcome;
mod payoff;
mod player;
mod utility;

pub use self::extensive_form_game::Game;
pub use self::handles::{ActionId, GameId, InfosetId, NodeId, OutcomeId, PlayerId};
pub use self::utility::Stamped;

pub(crate) use self::arena::Key;

#[cfg(test)]
pub use self::extensive_form_game::test_fixtures;
