use crate::game::arena::Key;
use std::cmp::Ordering;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU32, Ordering as AtomicOrdering};

/// Identity of a `Game` instance. Every handle records the game it came from,
/// so that combining entities of two games is detected as a mismatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GameId(u32);

impl GameId {
    pub(crate) fn fresh() -> GameId {
        static NEXT_GAME_ID: AtomicU32 = AtomicU32::new(0);
        GameId(NEXT_GAME_ID.fetch_add(1, AtomicOrdering::Relaxed))
    }
}

macro_rules! entity_handle {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name {
            pub(crate) game: GameId,
            pub(crate) key: Key,
        }

        impl $name {
            pub(crate) fn new(game: GameId, key: Key) -> $name {
                $name { game, key }
            }

            pub fn game(&self) -> GameId {
                self.game
            }
        }
    };
}

entity_handle!(
    /// Handle to a vertex of the game tree.
    NodeId
);
entity_handle!(
    /// Handle to an information set.
    InfosetId
);
entity_handle!(
    /// Handle to a terminal payoff vector.
    OutcomeId
);

/// Handle to a player. Number 0 is the chance player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlayerId {
    pub(crate) game: GameId,
    pub(crate) number: usize,
}

impl PlayerId {
    pub fn game(&self) -> GameId {
        self.game
    }

    pub fn number(&self) -> usize {
        self.number
    }

    pub fn is_chance(&self) -> bool {
        self.number == 0
    }
}

/// Handle to an action of an information set.
///
/// Actions are identified by a key which is unique within their infoset and
/// survives renumbering; `slot` caches the position the action had when the
/// handle was produced and is only a lookup hint.
#[derive(Debug, Clone, Copy)]
pub struct ActionId {
    pub(crate) infoset: InfosetId,
    pub(crate) key: u32,
    pub(crate) slot: usize,
}

impl ActionId {
    pub fn infoset(&self) -> InfosetId {
        self.infoset
    }

    pub fn game(&self) -> GameId {
        self.infoset.game
    }
}

impl PartialEq for ActionId {
    fn eq(&self, other: &ActionId) -> bool {
        self.infoset == other.infoset && self.key == other.key
    }
}

impl Eq for ActionId {}

impl Hash for ActionId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.infoset.hash(state);
        self.key.hash(state);
    }
}

impl PartialOrd for ActionId {
    fn partial_cmp(&self, other: &ActionId) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ActionId {
    fn cmp(&self, other: &ActionId) -> Ordering {
        (self.infoset, self.key).cmp(&(other.infoset, other.key))
    }
}
