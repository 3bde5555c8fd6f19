use crate::game::arena::Key;

/// Storage for a player. Player number 0 is chance.
#[derive(Debug, Clone)]
pub(crate) struct PlayerData {
    pub label: String,

    // Infosets in canonical order: first appearance in a depth-first walk,
    // with infosets that have no members last.
    pub infosets: Vec<Key>,
}

impl PlayerData {
    pub fn new(label: String) -> PlayerData {
        PlayerData {
            label,
            infosets: vec![],
        }
    }
}
