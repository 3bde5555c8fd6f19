use crate::error::{Error, Result};
use crate::game::arena::{Arena, Key};
use crate::game::handles::{ActionId, GameId, InfosetId, NodeId, OutcomeId, PlayerId};
use crate::game::infoset::InfosetData;
use crate::game::node::NodeData;
use crate::game::outcome::OutcomeData;
use crate::game::player::PlayerData;
use crate::numeric::Number;

use log::trace;
use std::collections::HashSet;

/// A finite game in extensive form: an explicit tree whose decision nodes are
/// grouped into information sets owned by players (player 0 is chance), and
/// whose nodes may carry outcomes.
///
/// All entities are owned by the game and addressed through copyable handles
/// (`NodeId`, `InfosetId`, ...). Handles stay valid across edits for as long as
/// the entity they name is alive; once an entity is deleted its handle resolves
/// to `Error::NullReference`.
///
/// Besides handles, entities carry *canonical numbers*: nodes are numbered in
/// depth-first order from the root, and each player's infosets in order of
/// first appearance in that walk (memberless infosets last). Numbers are
/// recomputed after every structural edit, so two structurally identical games
/// number their entities identically. Supports and the enumeration algorithms
/// index everything by these numbers.
///
/// Every edit increments `revision()`.
#[derive(Debug, Clone)]
pub struct Game<T: Number> {
    pub(crate) id: GameId,
    pub(crate) revision: u64,
    pub(crate) title: String,

    // Index 0 is chance.
    pub(crate) players: Vec<PlayerData>,

    pub(crate) infosets: Arena<InfosetData<T>>,
    pub(crate) nodes: Arena<NodeData>,
    pub(crate) outcomes: Arena<OutcomeData<T>>,
    pub(crate) outcome_list: Vec<Key>,

    pub(crate) root: Key,

    // Nodes in canonical depth-first order.
    pub(crate) node_list: Vec<Key>,
}

impl<T: Number> Game<T> {
    /// A game consisting of a single terminal root and the chance player.
    pub fn new() -> Game<T> {
        let mut nodes = Arena::new();
        let root = nodes.insert(NodeData::new(None));
        Game {
            id: GameId::fresh(),
            revision: 0,
            title: String::from("Untitled extensive form game"),
            players: vec![PlayerData::new(String::from("Chance"))],
            infosets: Arena::new(),
            nodes,
            outcomes: Arena::new(),
            outcome_list: vec![],
            root,
            node_list: vec![root],
        }
    }

    pub fn id(&self) -> GameId {
        self.id
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: &str) {
        self.title = title.to_string();
    }

    // ------------------------------------------------------------------
    // Handle resolution.
    // ------------------------------------------------------------------

    pub(crate) fn node_key(&self, node: NodeId) -> Result<Key> {
        if node.game != self.id {
            return Err(Error::mismatch("node belongs to a different game"));
        }
        match self.nodes.contains(node.key) {
            true => Ok(node.key),
            false => Err(Error::NullReference("node")),
        }
    }

    pub(crate) fn infoset_key(&self, infoset: InfosetId) -> Result<Key> {
        if infoset.game != self.id {
            return Err(Error::mismatch("infoset belongs to a different game"));
        }
        match self.infosets.contains(infoset.key) {
            true => Ok(infoset.key),
            false => Err(Error::NullReference("infoset")),
        }
    }

    pub(crate) fn outcome_key(&self, outcome: OutcomeId) -> Result<Key> {
        if outcome.game != self.id {
            return Err(Error::mismatch("outcome belongs to a different game"));
        }
        match self.outcomes.contains(outcome.key) {
            true => Ok(outcome.key),
            false => Err(Error::NullReference("outcome")),
        }
    }

    pub(crate) fn player_number(&self, player: PlayerId) -> Result<usize> {
        if player.game != self.id {
            return Err(Error::mismatch("player belongs to a different game"));
        }
        match player.number < self.players.len() {
            true => Ok(player.number),
            false => Err(Error::NullReference("player")),
        }
    }

    /// Resolves an action to its infoset key and current position.
    pub(crate) fn action_position(&self, action: ActionId) -> Result<(Key, usize)> {
        let infoset = self.infoset_key(action.infoset)?;
        match self.infosets[infoset].action_position(action.key, action.slot) {
            Some(position) => Ok((infoset, position)),
            None => Err(Error::NullReference("action")),
        }
    }

    /// Canonical (player, infoset, action) coordinates of an action.
    pub(crate) fn action_coordinates(&self, action: ActionId) -> Result<(usize, usize, usize)> {
        let (infoset, position) = self.action_position(action)?;
        let data = &self.infosets[infoset];
        Ok((data.player, data.number, position))
    }

    pub(crate) fn node_handle(&self, key: Key) -> NodeId {
        NodeId::new(self.id, key)
    }

    pub(crate) fn infoset_handle(&self, key: Key) -> InfosetId {
        InfosetId::new(self.id, key)
    }

    pub(crate) fn outcome_handle(&self, key: Key) -> OutcomeId {
        OutcomeId::new(self.id, key)
    }

    pub(crate) fn action_handle(&self, infoset: Key, position: usize) -> ActionId {
        ActionId {
            infoset: self.infoset_handle(infoset),
            key: self.infosets[infoset].actions[position].key,
            slot: position,
        }
    }

    pub(crate) fn infoset_at(&self, player: usize, number: usize) -> Key {
        self.players[player].infosets[number]
    }

    // ------------------------------------------------------------------
    // Players.
    // ------------------------------------------------------------------

    /// Number of personal players (chance excluded).
    pub fn num_players(&self) -> usize {
        self.players.len() - 1
    }

    pub fn chance(&self) -> PlayerId {
        PlayerId {
            game: self.id,
            number: 0,
        }
    }

    /// Personal player with the given number (1-based).
    pub fn player(&self, number: usize) -> Result<PlayerId> {
        match number >= 1 && number < self.players.len() {
            true => Ok(PlayerId {
                game: self.id,
                number,
            }),
            false => Err(Error::invalid(format!("no player numbered {}", number))),
        }
    }

    /// Personal players in order.
    pub fn players(&self) -> Vec<PlayerId> {
        (1..self.players.len())
            .map(|number| PlayerId {
                game: self.id,
                number,
            })
            .collect()
    }

    pub fn player_label(&self, player: PlayerId) -> Result<&str> {
        let number = self.player_number(player)?;
        Ok(&self.players[number].label)
    }

    pub fn set_player_label(&mut self, player: PlayerId, label: &str) -> Result<()> {
        let number = self.player_number(player)?;
        self.players[number].label = label.to_string();
        Ok(())
    }

    /// Infosets of a player in canonical order.
    pub fn player_infosets(&self, player: PlayerId) -> Result<Vec<InfosetId>> {
        let number = self.player_number(player)?;
        Ok(self.players[number]
            .infosets
            .iter()
            .map(|&k| self.infoset_handle(k))
            .collect())
    }

    pub fn num_infosets(&self, player: PlayerId) -> Result<usize> {
        let number = self.player_number(player)?;
        Ok(self.players[number].infosets.len())
    }

    /// Total number of personal infosets.
    pub fn total_num_infosets(&self) -> usize {
        self.players[1..].iter().map(|p| p.infosets.len()).sum()
    }

    // ------------------------------------------------------------------
    // Infosets and actions.
    // ------------------------------------------------------------------

    pub fn infoset_player(&self, infoset: InfosetId) -> Result<PlayerId> {
        let key = self.infoset_key(infoset)?;
        Ok(PlayerId {
            game: self.id,
            number: self.infosets[key].player,
        })
    }

    pub fn is_chance_infoset(&self, infoset: InfosetId) -> Result<bool> {
        let key = self.infoset_key(infoset)?;
        Ok(self.infosets[key].is_chance())
    }

    /// Canonical position of the infoset within its player's list.
    pub fn infoset_number(&self, infoset: InfosetId) -> Result<usize> {
        let key = self.infoset_key(infoset)?;
        Ok(self.infosets[key].number)
    }

    pub fn infoset_label(&self, infoset: InfosetId) -> Result<&str> {
        let key = self.infoset_key(infoset)?;
        Ok(&self.infosets[key].label)
    }

    pub fn set_infoset_label(&mut self, infoset: InfosetId, label: &str) -> Result<()> {
        let key = self.infoset_key(infoset)?;
        self.infosets[key].label = label.to_string();
        Ok(())
    }

    pub fn members(&self, infoset: InfosetId) -> Result<Vec<NodeId>> {
        let key = self.infoset_key(infoset)?;
        Ok(self.infosets[key]
            .members
            .iter()
            .map(|&m| self.node_handle(m))
            .collect())
    }

    pub fn num_members(&self, infoset: InfosetId) -> Result<usize> {
        let key = self.infoset_key(infoset)?;
        Ok(self.infosets[key].members.len())
    }

    pub fn actions(&self, infoset: InfosetId) -> Result<Vec<ActionId>> {
        let key = self.infoset_key(infoset)?;
        Ok((0..self.infosets[key].num_actions())
            .map(|position| self.action_handle(key, position))
            .collect())
    }

    pub fn num_actions(&self, infoset: InfosetId) -> Result<usize> {
        let key = self.infoset_key(infoset)?;
        Ok(self.infosets[key].num_actions())
    }

    /// Action at `position` (0-based) of an infoset.
    pub fn action(&self, infoset: InfosetId, position: usize) -> Result<ActionId> {
        let key = self.infoset_key(infoset)?;
        match position < self.infosets[key].num_actions() {
            true => Ok(self.action_handle(key, position)),
            false => Err(Error::invalid(format!("no action at position {}", position))),
        }
    }

    /// Current 0-based position of the action within its infoset.
    pub fn action_number(&self, action: ActionId) -> Result<usize> {
        Ok(self.action_position(action)?.1)
    }

    pub fn action_label(&self, action: ActionId) -> Result<&str> {
        let (infoset, position) = self.action_position(action)?;
        Ok(&self.infosets[infoset].actions[position].label)
    }

    pub fn set_action_label(&mut self, action: ActionId, label: &str) -> Result<()> {
        let (infoset, position) = self.action_position(action)?;
        self.infosets[infoset].actions[position].label = label.to_string();
        Ok(())
    }

    /// Probability of a chance action; personal actions report zero.
    pub fn chance_prob(&self, action: ActionId) -> Result<T> {
        let (infoset, position) = self.action_position(action)?;
        Ok(self.infosets[infoset].actions[position].prob)
    }

    /// Finds a personal infoset by canonical coordinates.
    pub fn infoset_by_number(&self, player: usize, number: usize) -> Result<InfosetId> {
        match self.players.get(player).and_then(|p| p.infosets.get(number)) {
            Some(&key) => Ok(self.infoset_handle(key)),
            None => Err(Error::invalid(format!(
                "no infoset numbered {} for player {}",
                number, player
            ))),
        }
    }

    // ------------------------------------------------------------------
    // Nodes.
    // ------------------------------------------------------------------

    pub fn root(&self) -> NodeId {
        self.node_handle(self.root)
    }

    pub fn num_nodes(&self) -> usize {
        self.node_list.len()
    }

    /// All nodes in canonical depth-first order.
    pub fn nodes(&self) -> Vec<NodeId> {
        self.node_list.iter().map(|&n| self.node_handle(n)).collect()
    }

    pub fn terminal_nodes(&self) -> Vec<NodeId> {
        self.node_list
            .iter()
            .filter(|&&n| self.nodes[n].is_terminal())
            .map(|&n| self.node_handle(n))
            .collect()
    }

    /// Node with the given canonical number.
    pub fn node_by_number(&self, number: usize) -> Result<NodeId> {
        match self.node_list.get(number) {
            Some(&key) => Ok(self.node_handle(key)),
            None => Err(Error::invalid(format!("no node numbered {}", number))),
        }
    }

    pub fn node_number(&self, node: NodeId) -> Result<usize> {
        let key = self.node_key(node)?;
        Ok(self.nodes[key].number)
    }

    pub fn is_deleted(&self, node: NodeId) -> bool {
        node.game == self.id && !self.nodes.contains(node.key)
    }

    pub fn parent(&self, node: NodeId) -> Result<Option<NodeId>> {
        let key = self.node_key(node)?;
        Ok(self.nodes[key].parent.map(|p| self.node_handle(p)))
    }

    pub fn children(&self, node: NodeId) -> Result<Vec<NodeId>> {
        let key = self.node_key(node)?;
        Ok(self.nodes[key]
            .children
            .iter()
            .map(|&c| self.node_handle(c))
            .collect())
    }

    pub fn num_children(&self, node: NodeId) -> Result<usize> {
        let key = self.node_key(node)?;
        Ok(self.nodes[key].children.len())
    }

    /// Child of a decision node reached by `action`.
    pub fn child(&self, node: NodeId, action: ActionId) -> Result<NodeId> {
        let key = self.node_key(node)?;
        let (infoset, position) = self.action_position(action)?;
        if self.nodes[key].infoset != Some(infoset) {
            return Err(Error::mismatch("action does not belong to the node's infoset"));
        }
        Ok(self.node_handle(self.nodes[key].children[position]))
    }

    pub fn is_terminal(&self, node: NodeId) -> Result<bool> {
        let key = self.node_key(node)?;
        Ok(self.nodes[key].is_terminal())
    }

    pub fn infoset(&self, node: NodeId) -> Result<Option<InfosetId>> {
        let key = self.node_key(node)?;
        Ok(self.nodes[key].infoset.map(|i| self.infoset_handle(i)))
    }

    /// The action leading from the parent to this node, `None` at the root.
    pub fn prior_action(&self, node: NodeId) -> Result<Option<ActionId>> {
        let key = self.node_key(node)?;
        Ok(self
            .prior_action_position(key)
            .map(|(infoset, position)| self.action_handle(infoset, position)))
    }

    pub(crate) fn prior_action_position(&self, node: Key) -> Option<(Key, usize)> {
        let parent = self.nodes[node].parent?;
        let position = self.nodes[parent].child_position(node)?;
        let infoset = self.nodes[parent].infoset?;
        Some((infoset, position))
    }

    pub fn node_label(&self, node: NodeId) -> Result<&str> {
        let key = self.node_key(node)?;
        Ok(&self.nodes[key].label)
    }

    pub fn set_node_label(&mut self, node: NodeId, label: &str) -> Result<()> {
        let key = self.node_key(node)?;
        self.nodes[key].label = label.to_string();
        Ok(())
    }

    /// True if `ancestor` lies on the path from the root to `node` (a node is
    /// its own successor).
    pub fn is_successor_of(&self, node: NodeId, ancestor: NodeId) -> Result<bool> {
        let node = self.node_key(node)?;
        let ancestor = self.node_key(ancestor)?;
        Ok(self.is_successor_key(node, ancestor))
    }

    pub(crate) fn is_successor_key(&self, node: Key, ancestor: Key) -> bool {
        let mut current = Some(node);
        while let Some(n) = current {
            if n == ancestor {
                return true;
            }
            current = self.nodes[n].parent;
        }
        false
    }

    /// All nodes of the subtree rooted at `node`, in depth-first order.
    pub fn descendants(&self, node: NodeId) -> Result<Vec<NodeId>> {
        let key = self.node_key(node)?;
        Ok(self
            .subtree_keys(key)
            .into_iter()
            .map(|n| self.node_handle(n))
            .collect())
    }

    pub(crate) fn subtree_keys(&self, node: Key) -> Vec<Key> {
        let mut subtree = vec![];
        let mut node_stack = vec![node];
        while let Some(n) = node_stack.pop() {
            subtree.push(n);
            node_stack.extend(self.nodes[n].children.iter().rev());
        }
        subtree
    }

    // ------------------------------------------------------------------
    // Outcomes.
    // ------------------------------------------------------------------

    pub fn outcomes(&self) -> Vec<OutcomeId> {
        self.outcome_list
            .iter()
            .map(|&o| self.outcome_handle(o))
            .collect()
    }

    pub fn num_outcomes(&self) -> usize {
        self.outcome_list.len()
    }

    pub fn outcome(&self, node: NodeId) -> Result<Option<OutcomeId>> {
        let key = self.node_key(node)?;
        Ok(self.nodes[key].outcome.map(|o| self.outcome_handle(o)))
    }

    pub fn outcome_label(&self, outcome: OutcomeId) -> Result<&str> {
        let key = self.outcome_key(outcome)?;
        Ok(&self.outcomes[key].label)
    }

    pub fn set_outcome_label(&mut self, outcome: OutcomeId, label: &str) -> Result<()> {
        let key = self.outcome_key(outcome)?;
        self.outcomes[key].label = label.to_string();
        Ok(())
    }

    pub fn outcome_payoff(&self, outcome: OutcomeId, player: PlayerId) -> Result<T> {
        let key = self.outcome_key(outcome)?;
        let number = self.player_number(player)?;
        if number == 0 {
            return Err(Error::invalid("chance receives no payoff"));
        }
        Ok(self.outcomes[key].payoff(number))
    }

    // ------------------------------------------------------------------
    // Canonical ordering.
    // ------------------------------------------------------------------

    /// Records a structural edit: bumps the revision and renumbers nodes and
    /// infosets canonically.
    pub(crate) fn touch(&mut self) {
        self.revision += 1;
        self.canonicalize();
        trace!("Game {:?} now at revision {}", self.id, self.revision);
    }

    /// Records a non-structural edit (payoffs, probabilities, outcomes).
    pub(crate) fn bump(&mut self) {
        self.revision += 1;
    }

    fn canonicalize(&mut self) {
        self.node_list = self.subtree_keys(self.root);
        for (number, &node) in self.node_list.iter().enumerate() {
            self.nodes[node].number = number;
        }

        let mut seen = HashSet::<Key>::new();
        let mut sorted: Vec<Vec<Key>> = vec![vec![]; self.players.len()];
        for &node in self.node_list.iter() {
            if let Some(infoset) = self.nodes[node].infoset {
                if seen.insert(infoset) {
                    sorted[self.infosets[infoset].player].push(infoset);
                }
            }
        }

        for (player, list) in sorted.iter_mut().enumerate() {
            // Memberless infosets keep their relative order, after the rest.
            for &infoset in self.players[player].infosets.iter() {
                if !seen.contains(&infoset) {
                    list.push(infoset);
                }
            }
            for (number, &infoset) in list.iter().enumerate() {
                self.infosets[infoset].number = number;
            }
        }

        for (player, list) in sorted.into_iter().enumerate() {
            self.players[player].infosets = list;
        }
    }
}

impl<T: Number> Default for Game<T> {
    fn default() -> Game<T> {
        Game::new()
    }
}

#[cfg(test)]
pub mod test_fixtures {
    use crate::game::Game;
    use lazy_static::lazy_static;

    fn attach_payoffs(game: &mut Game<f64>, payoffs: &[[f64; 2]]) {
        let leaves = game.terminal_nodes();
        assert_eq!(leaves.len(), payoffs.len());
        for (leaf, values) in leaves.into_iter().zip(payoffs.iter()) {
            let outcome = game.new_outcome();
            game.set_payoffs(outcome, values).unwrap();
            game.set_outcome(leaf, Some(outcome)).unwrap();
        }
    }

    /// Two players, one infoset each, moving simultaneously.
    /// Payoffs are listed as (row, column) for UL, UR, DL, DR.
    pub fn simultaneous_game(payoffs: &[[f64; 2]; 4]) -> Game<f64> {
        let mut game = Game::new();
        let row = game.new_player("Row");
        let column = game.new_player("Column");
        let root = game.root();

        let row_infoset = game.new_infoset(row, 2).unwrap();
        game.append_move(root, row_infoset).unwrap();
        let column_infoset = game.new_infoset(column, 2).unwrap();
        for child in game.children(root).unwrap() {
            game.append_move(child, column_infoset).unwrap();
        }

        for (infoset, labels) in [(row_infoset, ["U", "D"]), (column_infoset, ["L", "R"])].iter() {
            for (action, label) in game.actions(*infoset).unwrap().into_iter().zip(labels.iter()) {
                game.set_action_label(action, label).unwrap();
            }
        }
        attach_payoffs(&mut game, payoffs);
        game
    }

    /// Chance flips a coin the entrant cannot observe. The entrant stays
    /// out or enters; after entry the incumbent fights or shares, again
    /// without seeing the coin.
    pub fn entry_game() -> Game<f64> {
        let mut game = Game::new();
        let entrant = game.new_player("Entrant");
        let incumbent = game.new_player("Incumbent");
        let root = game.root();

        let coin = game.new_infoset(game.chance(), 2).unwrap();
        game.append_move(root, coin).unwrap();
        let entry = game.new_infoset(entrant, 2).unwrap();
        let fight = game.new_infoset(incumbent, 2).unwrap();
        for side in game.children(root).unwrap() {
            game.append_move(side, entry).unwrap();
            let entered = game.children(side).unwrap()[0];
            game.append_move(entered, fight).unwrap();
        }

        for (infoset, labels) in [
            (coin, ["Heads", "Tails"]),
            (entry, ["In", "Out"]),
            (fight, ["Fight", "Share"]),
        ]
        .iter()
        {
            for (action, label) in game.actions(*infoset).unwrap().into_iter().zip(labels.iter()) {
                game.set_action_label(action, label).unwrap();
            }
        }
        attach_payoffs(
            &mut game,
            &[
                [-1.0, -1.0],
                [1.0, 1.0],
                [0.0, 2.0],
                [-1.0, -1.0],
                [2.0, 1.0],
                [0.0, 2.0],
            ],
        );
        game
    }

    /// Player 2 opens with a or b; player 1 moves x or y only after a.
    /// Payoffs are listed for a-x, a-y and b.
    pub fn second_player_opens(payoffs: &[[f64; 2]; 3]) -> Game<f64> {
        let mut game = Game::new();
        let responder = game.new_player("Responder");
        let opener = game.new_player("Opener");
        let root = game.root();

        let open = game.new_infoset(opener, 2).unwrap();
        game.append_move(root, open).unwrap();
        let respond = game.new_infoset(responder, 2).unwrap();
        let after_a = game.children(root).unwrap()[0];
        game.append_move(after_a, respond).unwrap();

        for (infoset, labels) in [(respond, ["x", "y"]), (open, ["a", "b"])].iter() {
            for (action, label) in game.actions(*infoset).unwrap().into_iter().zip(labels.iter()) {
                game.set_action_label(action, label).unwrap();
            }
        }
        attach_payoffs(&mut game, payoffs);
        game
    }

    pub fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    lazy_static! {
        /// Row's D and Column's R are strictly dominant.
        pub static ref PRISONERS_DILEMMA: Game<f64> = simultaneous_game(&[
            [3.0, 3.0],
            [0.0, 5.0],
            [5.0, 0.0],
            [1.0, 1.0],
        ]);

        pub static ref MATCHING_PENNIES: Game<f64> = simultaneous_game(&[
            [1.0, -1.0],
            [-1.0, 1.0],
            [-1.0, 1.0],
            [1.0, -1.0],
        ]);

        pub static ref ENTRY_GAME: Game<f64> = entry_game();

        /// Player 1 prefers y after a; player 2 is indifferent throughout.
        pub static ref SECOND_PLAYER_OPENS: Game<f64> =
            second_player_opens(&[[0.0, 2.0], [1.0, 2.0], [0.0, 2.0]]);

        /// Two players and a terminal root.
        pub static ref TRIVIAL_GAME: Game<f64> = {
            let mut game = Game::new();
            game.new_player("First");
            game.new_player("Second");
            game
        };
    }
}
