use crate::game::arena::Key;
use crate::numeric::Number;

/// Storage for an information set.
#[derive(Debug, Clone)]
pub(crate) struct InfosetData<T: Number> {
    pub player: usize,
    pub label: String,
    pub actions: Vec<ActionData<T>>,
    pub members: Vec<Key>,

    // Position within the owning player's infoset list.
    pub number: usize,

    next_action_key: u32,
}

/// An action and, at chance infosets, its probability. Personal actions carry
/// a probability of zero which is never read.
#[derive(Debug, Clone)]
pub(crate) struct ActionData<T: Number> {
    pub key: u32,
    pub label: String,
    pub prob: T,
}

impl<T: Number> InfosetData<T> {
    /// Creates an infoset with `num_actions` actions labelled "1", "2", ...
    /// Chance infosets start out uniform.
    pub fn new(player: usize, num_actions: usize) -> InfosetData<T> {
        let prob = match player {
            0 => T::one() / T::from_usize(num_actions),
            _ => T::zero(),
        };
        let actions = (0..num_actions)
            .map(|i| ActionData {
                key: i as u32,
                label: (i + 1).to_string(),
                prob,
            })
            .collect();
        InfosetData {
            player,
            label: String::new(),
            actions,
            members: vec![],
            number: 0,
            next_action_key: num_actions as u32,
        }
    }

    /// A memberless infoset with the same player and actions (labels and
    /// probabilities included).
    pub fn duplicate_shape(&self) -> InfosetData<T> {
        InfosetData {
            player: self.player,
            label: String::new(),
            actions: self.actions.clone(),
            members: vec![],
            number: 0,
            next_action_key: self.next_action_key,
        }
    }

    pub fn is_chance(&self) -> bool {
        self.player == 0
    }

    pub fn num_actions(&self) -> usize {
        self.actions.len()
    }

    /// Current position of the action with `key`, trying `hint` first.
    pub fn action_position(&self, key: u32, hint: usize) -> Option<usize> {
        match self.actions.get(hint) {
            Some(action) if action.key == key => Some(hint),
            _ => self.actions.iter().position(|a| a.key == key),
        }
    }

    pub fn insert_action(&mut self, position: usize) -> u32 {
        let key = self.next_action_key;
        self.next_action_key += 1;
        self.actions.insert(
            position,
            ActionData {
                key,
                label: String::new(),
                prob: T::zero(),
            },
        );
        key
    }

    pub fn remove_member(&mut self, node: Key) {
        if let Some(position) = self.members.iter().position(|&m| m == node) {
            self.members.remove(position);
        }
    }

    pub fn member_position(&self, node: Key) -> Option<usize> {
        self.members.iter().position(|&m| m == node)
    }
}
