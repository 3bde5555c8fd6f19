use crate::error::{Error, Result};
use crate::game::arena::Key;
use crate::game::handles::{ActionId, InfosetId, NodeId, OutcomeId, PlayerId};
use crate::game::infoset::InfosetData;
use crate::game::node::NodeData;
use crate::game::outcome::OutcomeData;
use crate::game::player::PlayerData;
use crate::game::Game;
use crate::numeric::Number;

use log::{debug, trace};

/// Structural editing. Every successful edit increments the revision; edits
/// changing the shape of the tree also renumber it canonically.
impl<T: Number> Game<T> {
    pub fn new_player(&mut self, label: &str) -> PlayerId {
        self.players.push(PlayerData::new(label.to_string()));
        for &outcome in self.outcome_list.iter() {
            self.outcomes[outcome].payoffs.push(T::zero());
        }
        self.touch();
        PlayerId {
            game: self.id,
            number: self.players.len() - 1,
        }
    }

    /// Creates a memberless infoset with `num_actions` actions. Chance
    /// infosets start out with uniform probabilities.
    pub fn new_infoset(&mut self, player: PlayerId, num_actions: usize) -> Result<InfosetId> {
        let number = self.player_number(player)?;
        if num_actions == 0 {
            return Err(Error::invalid("an infoset needs at least one action"));
        }
        let key = self.infosets.insert(InfosetData::new(number, num_actions));
        self.players[number].infosets.push(key);
        self.touch();
        Ok(self.infoset_handle(key))
    }

    /// Turns the terminal `node` into a decision point of `infoset`, with one
    /// fresh terminal child per action.
    pub fn append_move(&mut self, node: NodeId, infoset: InfosetId) -> Result<()> {
        if node.game != infoset.game {
            return Err(Error::mismatch("node and infoset belong to different games"));
        }
        let node = self.node_key(node)?;
        let infoset = self.infoset_key(infoset)?;
        if !self.nodes[node].is_terminal() {
            return Err(Error::invalid("can only append a move at a terminal node"));
        }
        self.attach_decision(node, infoset);
        self.touch();
        Ok(())
    }

    /// Inserts a decision point of `infoset` immediately above `node`. The
    /// node becomes the first child of the new decision point; the remaining
    /// children are fresh terminal nodes. Returns the new decision point.
    pub fn insert_move(&mut self, node: NodeId, infoset: InfosetId) -> Result<NodeId> {
        if node.game != infoset.game {
            return Err(Error::mismatch("node and infoset belong to different games"));
        }
        let node = self.node_key(node)?;
        let infoset = self.infoset_key(infoset)?;

        let parent = self.nodes[node].parent;
        let inserted = self.nodes.insert(NodeData::new(parent));
        self.replace_in_parent(node, inserted);
        self.nodes[node].parent = Some(inserted);

        self.nodes[inserted].infoset = Some(infoset);
        self.infosets[infoset].members.push(inserted);
        let mut children = vec![node];
        for _ in 1..self.infosets[infoset].num_actions() {
            children.push(self.nodes.insert(NodeData::new(Some(inserted))));
        }
        self.nodes[inserted].children = children;

        self.touch();
        trace!("Inserted move above node {:?}", node);
        Ok(self.node_handle(inserted))
    }

    /// Deletes the move *above* `node`: the parent decision point and all of
    /// its other subtrees disappear, and `node` takes the parent's place.
    pub fn delete_move(&mut self, node: NodeId) -> Result<NodeId> {
        let key = self.node_key(node)?;
        let parent = match self.nodes[key].parent {
            Some(parent) => parent,
            None => return Err(Error::invalid("the root has no move above it")),
        };

        let siblings: Vec<Key> = self.nodes[parent]
            .children
            .iter()
            .cloned()
            .filter(|&c| c != key)
            .collect();
        for sibling in siblings {
            self.free_subtree(sibling);
        }
        self.nodes[parent].children.clear();

        let grandparent = self.nodes[parent].parent;
        self.replace_in_parent(parent, key);
        self.nodes[key].parent = grandparent;
        self.free_node(parent);

        self.touch();
        Ok(node)
    }

    /// Deletes everything below `node`, which becomes a terminal node without
    /// outcome, infoset membership or label.
    pub fn delete_tree(&mut self, node: NodeId) -> Result<()> {
        let key = self.node_key(node)?;
        self.clear_below(key);
        let data = &mut self.nodes[key];
        data.outcome = None;
        data.label.clear();
        self.touch();
        Ok(())
    }

    /// Moves `node` into `infoset`. Does nothing if the action counts differ
    /// or `node` is terminal.
    pub fn join_infoset(&mut self, infoset: InfosetId, node: NodeId) -> Result<()> {
        if node.game != infoset.game {
            return Err(Error::mismatch("node and infoset belong to different games"));
        }
        let node = self.node_key(node)?;
        let infoset = self.infoset_key(infoset)?;
        if self.join_infoset_key(infoset, node) {
            self.touch();
        }
        Ok(())
    }

    /// Moves `node` into a fresh infoset with the same player and actions.
    /// A node which is the sole member of its infoset stays where it is.
    /// Returns the node's infoset afterwards, `None` for terminal nodes.
    pub fn leave_infoset(&mut self, node: NodeId) -> Result<Option<InfosetId>> {
        let node = self.node_key(node)?;
        let before = self.nodes[node].infoset;
        let after = self.leave_infoset_key(node);
        if after != before {
            self.touch();
        }
        Ok(after.map(|i| self.infoset_handle(i)))
    }

    /// Moves every member of `from` into `to`. Does nothing if the two are the
    /// same infoset or their action counts differ.
    pub fn merge_infoset(&mut self, to: InfosetId, from: InfosetId) -> Result<()> {
        if to.game != from.game {
            return Err(Error::mismatch("infosets belong to different games"));
        }
        let to = self.infoset_key(to)?;
        let from = self.infoset_key(from)?;
        if to == from || self.infosets[to].num_actions() != self.infosets[from].num_actions() {
            debug!("Merge of infosets skipped");
            return Ok(());
        }
        let members = std::mem::replace(&mut self.infosets[from].members, vec![]);
        for &member in members.iter() {
            self.nodes[member].infoset = Some(to);
        }
        self.infosets[to].members.extend(members);
        self.touch();
        Ok(())
    }

    /// Moves `node` and all later members of its infoset into a new infoset of
    /// the same player. Returns the new infoset, or the node's own infoset if
    /// `node` is its first member.
    pub fn split_infoset(&mut self, node: NodeId) -> Result<InfosetId> {
        let node = self.node_key(node)?;
        let infoset = match self.nodes[node].infoset {
            Some(infoset) => infoset,
            None => return Err(Error::invalid("terminal nodes have no infoset")),
        };
        let position = self.infosets[infoset]
            .member_position(node)
            .expect("node missing from its infoset");
        if position == 0 {
            return Ok(self.infoset_handle(infoset));
        }

        let moved = self.infosets[infoset].members.split_off(position);
        let split = self.insert_infoset_like(infoset);
        for &member in moved.iter() {
            self.nodes[member].infoset = Some(split);
        }
        self.infosets[split].members = moved;
        self.touch();
        Ok(self.infoset_handle(split))
    }

    /// Hands a personal infoset over to another personal player.
    pub fn switch_player(&mut self, infoset: InfosetId, player: PlayerId) -> Result<()> {
        if infoset.game != player.game {
            return Err(Error::mismatch("infoset and player belong to different games"));
        }
        let key = self.infoset_key(infoset)?;
        let number = self.player_number(player)?;
        let old = self.infosets[key].player;
        if old == 0 || number == 0 {
            return Err(Error::invalid("chance infosets cannot change owner"));
        }
        if old == number {
            return Ok(());
        }
        self.players[old].infosets.retain(|&i| i != key);
        self.players[number].infosets.push(key);
        self.infosets[key].player = number;
        self.touch();
        Ok(())
    }

    /// Splits every infoset of `player` according to which action at
    /// `infoset` precedes its members, so that `player` learns the choice made
    /// at `infoset`.
    pub fn reveal(&mut self, infoset: InfosetId, player: PlayerId) -> Result<()> {
        if infoset.game != player.game {
            return Err(Error::mismatch("infoset and player belong to different games"));
        }
        let revealed = self.infoset_key(infoset)?;
        let number = self.player_number(player)?;
        let num_actions = self.infosets[revealed].num_actions();
        if num_actions <= 1 {
            return Ok(());
        }

        for action in 0..num_actions {
            let mut marked = std::collections::HashSet::<Key>::new();
            for &member in self.infosets[revealed].members.iter() {
                let child = self.nodes[member].children[action];
                marked.extend(self.subtree_keys(child));
            }

            // The list grows while we go; infosets split off for earlier
            // actions are partitioned again.
            let mut i = 0;
            while i < self.players[number].infosets.len() {
                let target = self.players[number].infosets[i];
                let members = self.infosets[target].members.clone();
                let mut split: Option<Key> = None;
                for member in members {
                    if marked.remove(&member) {
                        match split {
                            None => split = self.leave_infoset_key(member),
                            Some(s) => {
                                self.join_infoset_key(s, member);
                            }
                        }
                    }
                }
                i += 1;
            }
        }

        self.touch();
        debug!("Revealed infoset {:?} to player {}", revealed, number);
        Ok(())
    }

    /// Adds an action to `infoset` before `before` (or last), with a fresh
    /// terminal child at every member.
    pub fn insert_action(
        &mut self,
        infoset: InfosetId,
        before: Option<ActionId>,
    ) -> Result<ActionId> {
        let key = self.infoset_key(infoset)?;
        let position = match before {
            Some(action) => {
                let (owner, position) = self.action_position(action)?;
                if owner != key {
                    return Err(Error::mismatch("action does not belong to the infoset"));
                }
                position
            }
            None => self.infosets[key].num_actions(),
        };

        self.infosets[key].insert_action(position);
        for member in self.infosets[key].members.clone() {
            let child = self.nodes.insert(NodeData::new(Some(member)));
            self.nodes[member].children.insert(position, child);
        }
        self.touch();
        Ok(self.action_handle(key, position))
    }

    /// Removes an action and the subtree below it at every member. The
    /// remaining actions are renumbered.
    pub fn delete_action(&mut self, infoset: InfosetId, action: ActionId) -> Result<()> {
        if action.infoset != infoset {
            return Err(Error::mismatch("action does not belong to the infoset"));
        }
        let (key, position) = self.action_position(action)?;
        if self.infosets[key].num_actions() == 1 {
            return Err(Error::invalid("cannot delete the only action of an infoset"));
        }

        for member in self.infosets[key].members.clone() {
            let child = self.nodes[member].children.remove(position);
            self.free_subtree(child);
        }
        self.infosets[key].actions.remove(position);
        self.touch();
        Ok(())
    }

    pub fn set_chance_prob(&mut self, action: ActionId, prob: T) -> Result<()> {
        let (key, position) = self.action_position(action)?;
        if !self.infosets[key].is_chance() {
            return Err(Error::invalid("only chance actions carry probabilities"));
        }
        if prob < T::zero() {
            return Err(Error::invalid("probabilities must be non-negative"));
        }
        self.infosets[key].actions[position].prob = prob;
        self.bump();
        Ok(())
    }

    /// Removes a memberless infoset. Returns `false` if it still has members.
    pub fn delete_empty_infoset(&mut self, infoset: InfosetId) -> Result<bool> {
        let key = self.infoset_key(infoset)?;
        if !self.infosets[key].members.is_empty() {
            return Ok(false);
        }
        let player = self.infosets[key].player;
        self.players[player].infosets.retain(|&i| i != key);
        self.infosets.remove(key);
        self.touch();
        Ok(true)
    }

    /// Removes every memberless infoset; returns how many were removed.
    pub fn delete_empty_infosets(&mut self) -> usize {
        let mut removed = 0;
        for player in 0..self.players.len() {
            let (empty, kept): (Vec<Key>, Vec<Key>) = self.players[player]
                .infosets
                .iter()
                .partition(|&&i| self.infosets[i].members.is_empty());
            for infoset in empty {
                self.infosets.remove(infoset);
                removed += 1;
            }
            self.players[player].infosets = kept;
        }
        if removed > 0 {
            self.touch();
        }
        removed
    }

    /// Copies the subtree below `src` onto the terminal node `dest`. Copied
    /// decision nodes join the infosets of their originals and outcomes are
    /// shared.
    pub fn copy_tree(&mut self, src: NodeId, dest: NodeId) -> Result<()> {
        let src = self.node_key(src)?;
        let dest = self.node_key(dest)?;
        if !self.nodes[dest].is_terminal() {
            return Err(Error::invalid("can only copy onto a terminal node"));
        }
        if self.is_successor_key(dest, src) {
            return Err(Error::invalid("cannot copy a subtree into itself"));
        }

        let mut node_stack = vec![(src, dest)];
        while let Some((from, to)) = node_stack.pop() {
            let label = self.nodes[from].label.clone();
            let outcome = self.nodes[from].outcome;
            self.nodes[to].label = label;
            self.nodes[to].outcome = outcome;
            if let Some(infoset) = self.nodes[from].infoset {
                self.attach_decision(to, infoset);
                let pairs: Vec<(Key, Key)> = self.nodes[from]
                    .children
                    .iter()
                    .cloned()
                    .zip(self.nodes[to].children.iter().cloned())
                    .collect();
                node_stack.extend(pairs);
            }
        }
        self.touch();
        Ok(())
    }

    /// Moves the subtree below `src` onto the terminal node `dest`, which
    /// takes over `src`'s infoset membership; `src` becomes terminal.
    pub fn move_tree(&mut self, src: NodeId, dest: NodeId) -> Result<()> {
        let src = self.node_key(src)?;
        let dest = self.node_key(dest)?;
        if !self.nodes[dest].is_terminal() {
            return Err(Error::invalid("can only move onto a terminal node"));
        }
        if self.is_successor_key(dest, src) {
            return Err(Error::invalid("cannot move a subtree into itself"));
        }

        let children = std::mem::replace(&mut self.nodes[src].children, vec![]);
        for &child in children.iter() {
            self.nodes[child].parent = Some(dest);
        }
        self.nodes[dest].children = children;

        if let Some(infoset) = self.nodes[src].infoset.take() {
            let members = &mut self.infosets[infoset].members;
            let position = members
                .iter()
                .position(|&m| m == src)
                .expect("node missing from its infoset");
            members[position] = dest;
            self.nodes[dest].infoset = Some(infoset);
        }
        self.touch();
        Ok(())
    }

    // ------------------------------------------------------------------
    // Outcomes.
    // ------------------------------------------------------------------

    pub fn new_outcome(&mut self) -> OutcomeId {
        let key = self.outcomes.insert(OutcomeData::new(self.num_players()));
        self.outcome_list.push(key);
        self.bump();
        self.outcome_handle(key)
    }

    /// Deletes an outcome, detaching it from every node it is attached to.
    pub fn delete_outcome(&mut self, outcome: OutcomeId) -> Result<()> {
        let key = self.outcome_key(outcome)?;
        for &node in self.node_list.iter() {
            if self.nodes[node].outcome == Some(key) {
                self.nodes[node].outcome = None;
            }
        }
        self.outcome_list.retain(|&o| o != key);
        self.outcomes.remove(key);
        self.bump();
        Ok(())
    }

    pub fn set_payoff(&mut self, outcome: OutcomeId, player: PlayerId, value: T) -> Result<()> {
        if outcome.game != player.game {
            return Err(Error::mismatch("outcome and player belong to different games"));
        }
        let key = self.outcome_key(outcome)?;
        let number = self.player_number(player)?;
        if number == 0 {
            return Err(Error::invalid("chance receives no payoff"));
        }
        self.outcomes[key].payoffs[number - 1] = value;
        self.bump();
        Ok(())
    }

    /// Sets every personal player's payoff at once.
    pub fn set_payoffs(&mut self, outcome: OutcomeId, values: &[T]) -> Result<()> {
        let key = self.outcome_key(outcome)?;
        if values.len() != self.num_players() {
            return Err(Error::invalid(format!(
                "expected {} payoffs, got {}",
                self.num_players(),
                values.len()
            )));
        }
        self.outcomes[key].payoffs.copy_from_slice(values);
        self.bump();
        Ok(())
    }

    pub fn set_outcome(&mut self, node: NodeId, outcome: Option<OutcomeId>) -> Result<()> {
        let node = self.node_key(node)?;
        let outcome = match outcome {
            Some(outcome) => Some(self.outcome_key(outcome)?),
            None => None,
        };
        self.nodes[node].outcome = outcome;
        self.bump();
        Ok(())
    }

    // ------------------------------------------------------------------
    // Internals. None of these touch the revision.
    // ------------------------------------------------------------------

    fn attach_decision(&mut self, node: Key, infoset: Key) {
        debug_assert!(self.nodes[node].is_terminal());
        self.nodes[node].infoset = Some(infoset);
        self.infosets[infoset].members.push(node);
        let children = (0..self.infosets[infoset].num_actions())
            .map(|_| self.nodes.insert(NodeData::new(Some(node))))
            .collect();
        self.nodes[node].children = children;
    }

    /// Puts `replacement` where `node` hangs from its parent (or at the root).
    fn replace_in_parent(&mut self, node: Key, replacement: Key) {
        match self.nodes[node].parent {
            Some(parent) => {
                let position = self.nodes[parent]
                    .child_position(node)
                    .expect("node missing from its parent");
                self.nodes[parent].children[position] = replacement;
            }
            None => self.root = replacement,
        }
    }

    fn clear_below(&mut self, node: Key) {
        let children = std::mem::replace(&mut self.nodes[node].children, vec![]);
        for child in children {
            self.free_subtree(child);
        }
        if let Some(infoset) = self.nodes[node].infoset.take() {
            self.infosets[infoset].remove_member(node);
        }
    }

    fn free_subtree(&mut self, node: Key) {
        for n in self.subtree_keys(node) {
            self.free_node(n);
        }
    }

    fn free_node(&mut self, node: Key) {
        if let Some(data) = self.nodes.remove(node) {
            if let Some(infoset) = data.infoset {
                self.infosets[infoset].remove_member(node);
            }
        }
    }

    fn insert_infoset_like(&mut self, infoset: Key) -> Key {
        let shape = self.infosets[infoset].duplicate_shape();
        let player = shape.player;
        let key = self.infosets.insert(shape);
        self.players[player].infosets.push(key);
        key
    }

    pub(crate) fn join_infoset_key(&mut self, infoset: Key, node: Key) -> bool {
        let current = match self.nodes[node].infoset {
            Some(current) => current,
            None => return false,
        };
        if current == infoset
            || self.infosets[infoset].num_actions() != self.infosets[current].num_actions()
        {
            return false;
        }
        self.infosets[current].remove_member(node);
        self.infosets[infoset].members.push(node);
        self.nodes[node].infoset = Some(infoset);
        true
    }

    pub(crate) fn leave_infoset_key(&mut self, node: Key) -> Option<Key> {
        let current = self.nodes[node].infoset?;
        if self.infosets[current].members.len() == 1 {
            return Some(current);
        }
        let fresh = self.insert_infoset_like(current);
        self.infosets[current].remove_member(node);
        self.infosets[fresh].members.push(node);
        self.nodes[node].infoset = Some(fresh);
        Some(fresh)
    }
}

#[cfg(test)]
mod tests {
    use crate::error::Error;
    use crate::game::test_fixtures::{entry_game, simultaneous_game, ENTRY_GAME, PRISONERS_DILEMMA};
    use crate::game::{Game, Stamped};
    use crate::strategy::PureBehavProfile;
    use crate::support::Support;
    use assert_approx_eq::assert_approx_eq;

    fn check_structure(game: &Game<f64>) {
        for node in game.nodes() {
            match game.infoset(node).unwrap() {
                Some(infoset) => assert_eq!(
                    game.num_children(node).unwrap(),
                    game.num_actions(infoset).unwrap()
                ),
                None => assert!(game.is_terminal(node).unwrap()),
            }
        }
        for (number, node) in game.nodes().into_iter().enumerate() {
            assert_eq!(game.node_number(node).unwrap(), number);
        }
    }

    #[test]
    fn edits_bump_revision_and_keep_structure() {
        let mut game = Game::<f64>::new();
        let mut revision = game.revision();
        let mut expect_newer = |game: &Game<f64>| {
            check_structure(game);
            assert!(game.revision() > revision);
            revision = game.revision();
        };

        let player = game.new_player("Alice");
        expect_newer(&game);
        let infoset = game.new_infoset(player, 3).unwrap();
        expect_newer(&game);
        let root = game.root();
        game.append_move(root, infoset).unwrap();
        expect_newer(&game);
        let child = game.children(root).unwrap()[1];
        let upper = game.insert_move(child, infoset).unwrap();
        expect_newer(&game);
        game.insert_action(infoset, None).unwrap();
        expect_newer(&game);
        let action = game.action(infoset, 0).unwrap();
        game.delete_action(infoset, action).unwrap();
        expect_newer(&game);
        let outcome = game.new_outcome();
        expect_newer(&game);
        game.set_payoff(outcome, player, 4.0).unwrap();
        expect_newer(&game);
        game.set_outcome(upper, Some(outcome)).unwrap();
        expect_newer(&game);
        game.delete_tree(upper).unwrap();
        expect_newer(&game);
    }

    #[test]
    fn new_infoset_requires_actions() {
        let mut game = Game::<f64>::new();
        let player = game.new_player("Alice");
        match game.new_infoset(player, 0) {
            Err(Error::InvalidArgument(_)) => (),
            other => panic!("unexpected {:?}", other),
        }
        let chance = game.new_infoset(game.chance(), 4).unwrap();
        for action in game.actions(chance).unwrap() {
            assert_approx_eq!(game.chance_prob(action).unwrap(), 0.25);
        }
    }

    #[test]
    fn insert_move_pushes_node_down() {
        let mut game = Game::<f64>::new();
        let player = game.new_player("Alice");
        let infoset = game.new_infoset(player, 2).unwrap();
        let root = game.root();
        game.append_move(root, infoset).unwrap();
        let leaf = game.children(root).unwrap()[0];

        let inserted = game.insert_move(leaf, infoset).unwrap();
        assert_eq!(game.parent(leaf).unwrap(), Some(inserted));
        assert_eq!(game.children(inserted).unwrap()[0], leaf);
        assert_eq!(game.children(root).unwrap()[0], inserted);
        assert_eq!(game.num_members(infoset).unwrap(), 2);
        assert_eq!(game.num_nodes(), 5);

        // Inserting above the root replaces the root.
        let top = game.insert_move(root, infoset).unwrap();
        assert_eq!(game.root(), top);
        assert_eq!(game.node_number(root).unwrap(), 1);
        check_structure(&game);
    }

    #[test]
    fn delete_move_keeps_the_node() {
        let mut game = entry_game();
        let root = game.root();
        let heads = game.children(root).unwrap()[0];
        let tails = game.children(root).unwrap()[1];
        let entered = game.children(tails).unwrap()[0];

        assert_eq!(game.delete_move(heads).unwrap(), heads);
        assert_eq!(game.root(), heads);
        assert!(game.is_deleted(root));
        assert!(game.is_deleted(tails));
        assert!(game.is_deleted(entered));
        assert_eq!(game.parent(heads).unwrap(), None);
        assert_eq!(game.num_nodes(), 5);
        assert_eq!(game.node_number(heads).unwrap(), 0);
        check_structure(&game);

        match game.node_number(entered) {
            Err(Error::NullReference(_)) => (),
            other => panic!("unexpected {:?}", other),
        }
        match game.delete_move(heads) {
            Err(Error::InvalidArgument(_)) => (),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn delete_tree_clears_membership() {
        let mut game = entry_game();
        let root = game.root();
        let heads = game.children(root).unwrap()[0];
        let entry = game.infoset(heads).unwrap().unwrap();
        let fight = game.infoset(game.children(heads).unwrap()[0]).unwrap().unwrap();

        game.delete_tree(heads).unwrap();
        assert!(game.is_terminal(heads).unwrap());
        assert_eq!(game.num_members(entry).unwrap(), 1);
        assert_eq!(game.num_members(fight).unwrap(), 1);
        assert_eq!(game.outcome(heads).unwrap(), None);
        check_structure(&game);
    }

    #[test]
    fn infoset_membership_edits() {
        let mut game = entry_game();
        let root = game.root();
        let sides = game.children(root).unwrap();
        let entry = game.infoset(sides[0]).unwrap().unwrap();
        let entrant = game.infoset_player(entry).unwrap();

        let single = game.leave_infoset(sides[1]).unwrap().unwrap();
        assert_ne!(single, entry);
        assert_eq!(game.num_infosets(entrant).unwrap(), 2);
        assert_eq!(game.members(single).unwrap(), vec![sides[1]]);

        // Sole members stay put.
        assert_eq!(game.leave_infoset(sides[1]).unwrap(), Some(single));

        game.join_infoset(entry, sides[1]).unwrap();
        assert_eq!(game.num_members(entry).unwrap(), 2);
        assert_eq!(game.num_members(single).unwrap(), 0);
        assert_eq!(game.infoset_number(single).unwrap(), 1);
        assert!(game.delete_empty_infoset(single).unwrap());
        assert_eq!(game.num_infosets(entrant).unwrap(), 1);

        let split = game.split_infoset(sides[1]).unwrap();
        assert_eq!(game.members(split).unwrap(), vec![sides[1]]);
        assert_eq!(game.split_infoset(sides[0]).unwrap(), entry);
        game.merge_infoset(entry, split).unwrap();
        assert_eq!(game.num_members(entry).unwrap(), 2);
        assert_eq!(game.delete_empty_infosets(), 1);

        // Action counts must agree.
        let wide = game.new_infoset(entrant, 3).unwrap();
        let revision = game.revision();
        game.join_infoset(wide, sides[0]).unwrap();
        game.merge_infoset(wide, entry).unwrap();
        assert_eq!(game.revision(), revision);
        assert_eq!(game.num_members(entry).unwrap(), 2);
        check_structure(&game);
    }

    #[test]
    fn reveal_splits_by_revealed_action() {
        let mut game = entry_game();
        let root = game.root();
        let coin = game.infoset(root).unwrap().unwrap();
        let entrant = game.player(1).unwrap();
        let incumbent = game.player(2).unwrap();

        game.reveal(coin, incumbent).unwrap();
        assert_eq!(game.num_infosets(incumbent).unwrap(), 2);
        assert_eq!(game.num_infosets(entrant).unwrap(), 1);
        for infoset in game.player_infosets(incumbent).unwrap() {
            assert_eq!(game.num_members(infoset).unwrap(), 1);
        }

        game.reveal(coin, entrant).unwrap();
        assert_eq!(game.num_infosets(entrant).unwrap(), 2);
        assert!(game.is_perfect_recall());
        check_structure(&game);
    }

    #[test]
    fn action_insertion_and_deletion() {
        let mut game = entry_game();
        let entrant = game.player(1).unwrap();
        let entry = game.player_infosets(entrant).unwrap()[0];
        let out = game.action(entry, 1).unwrap();

        let wait = game.insert_action(entry, Some(out)).unwrap();
        assert_eq!(game.action_number(wait).unwrap(), 1);
        assert_eq!(game.action_number(out).unwrap(), 2);
        for member in game.members(entry).unwrap() {
            assert_eq!(game.num_children(member).unwrap(), 3);
        }

        let enter = game.action(entry, 0).unwrap();
        game.delete_action(entry, enter).unwrap();
        assert_eq!(game.action_number(out).unwrap(), 1);
        assert_eq!(game.action_label(out).unwrap(), "Out");
        match game.action_number(enter) {
            Err(Error::NullReference(_)) => (),
            other => panic!("unexpected {:?}", other),
        }
        // Incumbent's infoset lost every member along with the entry branch.
        let incumbent = game.player(2).unwrap();
        let fight = game.player_infosets(incumbent).unwrap()[0];
        assert_eq!(game.num_members(fight).unwrap(), 0);

        game.delete_action(entry, wait).unwrap();
        match game.delete_action(entry, out) {
            Err(Error::InvalidArgument(_)) => (),
            other => panic!("unexpected {:?}", other),
        }
        check_structure(&game);
    }

    #[test]
    fn copy_and_move_subtrees() {
        let mut game = Game::<f64>::new();
        let player = game.new_player("Alice");
        let infoset = game.new_infoset(player, 2).unwrap();
        let root = game.root();
        game.append_move(root, infoset).unwrap();
        let left = game.children(root).unwrap()[0];
        let right = game.children(root).unwrap()[1];
        game.append_move(left, infoset).unwrap();
        let outcome = game.new_outcome();
        let leaf = game.children(left).unwrap()[1];
        game.set_outcome(leaf, Some(outcome)).unwrap();

        match game.copy_tree(root, leaf) {
            Err(Error::InvalidArgument(_)) => (),
            other => panic!("unexpected {:?}", other),
        }
        game.copy_tree(left, right).unwrap();
        assert_eq!(game.num_members(infoset).unwrap(), 3);
        assert_eq!(game.outcome(game.children(right).unwrap()[1]).unwrap(), Some(outcome));
        check_structure(&game);

        let target = game.children(right).unwrap()[0];
        game.move_tree(left, target).unwrap();
        assert!(game.is_terminal(left).unwrap());
        assert_eq!(game.infoset(left).unwrap(), None);
        assert_eq!(game.infoset(target).unwrap(), Some(infoset));
        assert_eq!(game.parent(leaf).unwrap(), Some(target));
        assert_eq!(game.num_members(infoset).unwrap(), 3);
        check_structure(&game);
    }

    #[test]
    fn handles_from_other_games_are_rejected() {
        let mut game = entry_game();
        let other = entry_game();
        match game.delete_tree(other.root()) {
            Err(Error::Mismatch(_)) => (),
            result => panic!("unexpected {:?}", result),
        }
        let foreign = other.player_infosets(other.player(1).unwrap()).unwrap()[0];
        match game.append_move(game.terminal_nodes()[0], foreign) {
            Err(Error::Mismatch(_)) => (),
            result => panic!("unexpected {:?}", result),
        }
    }

    #[test]
    fn identical_construction_gives_identical_numbering() {
        let a = entry_game();
        let b = entry_game();
        let labels = |game: &Game<f64>| -> Vec<(usize, String)> {
            game.nodes()
                .into_iter()
                .map(|n| {
                    let label = match game.prior_action(n).unwrap() {
                        Some(action) => game.action_label(action).unwrap().to_string(),
                        None => String::new(),
                    };
                    (game.node_number(n).unwrap(), label)
                })
                .collect()
        };
        assert_eq!(labels(&a), labels(&b));
    }

    #[test]
    fn compress_with_full_support_preserves_payoffs() {
        let game = &*ENTRY_GAME;
        let support = Support::new(game);
        let compressed = game.compress(&support).unwrap();
        assert_eq!(compressed.num_nodes(), game.num_nodes());

        let mut original = PureBehavProfile::new(game);
        let mut copy = PureBehavProfile::new(&compressed);
        for enter in 0..2 {
            for fight in 0..2 {
                original.set_by_number(1, 0, enter).unwrap();
                original.set_by_number(2, 0, fight).unwrap();
                copy.set_by_number(1, 0, enter).unwrap();
                copy.set_by_number(2, 0, fight).unwrap();
                let expected = game.payoff(&original).unwrap();
                let actual = compressed.payoff(&copy).unwrap();
                for (e, a) in expected.iter().zip(actual.iter()) {
                    assert_approx_eq!(e, a);
                }
            }
        }
    }

    #[test]
    fn compress_drops_inactive_actions() {
        let game = &*PRISONERS_DILEMMA;
        let mut support = Support::new(game);
        let up = game.action(game.infoset_by_number(1, 0).unwrap(), 0).unwrap();
        support.remove_action(up).unwrap();
        let compressed = game.compress(&support).unwrap();
        assert_eq!(compressed.num_nodes(), 4);
        let row = compressed.infoset_by_number(1, 0).unwrap();
        assert_eq!(compressed.num_actions(row).unwrap(), 1);
        assert_eq!(compressed.action_label(compressed.action(row, 0).unwrap()).unwrap(), "D");
    }

    #[test]
    fn payoff_summaries() {
        let game = &*PRISONERS_DILEMMA;
        assert!(!game.is_const_sum());
        assert_approx_eq!(game.min_payoff(None).unwrap(), 0.0);
        assert_approx_eq!(game.max_payoff(game.player(2).ok()).unwrap(), 5.0);
        let zero_sum = simultaneous_game(&[[1.0, -1.0], [2.0, -2.0], [0.0, 0.0], [3.0, -3.0]]);
        assert!(zero_sum.is_const_sum());
        assert!(zero_sum.is_perfect_recall());
    }

    #[test]
    fn stamped_values_expire() {
        let mut game = entry_game();
        let stamped = Stamped::new(&game, game.num_nodes());
        assert_eq!(stamped.get(&game), Some(&11));
        let root = game.root();
        game.set_node_label(root, "Start").unwrap();
        assert_eq!(stamped.get(&game), Some(&11));
        let outcome = game.new_outcome();
        game.set_outcome(root, Some(outcome)).unwrap();
        assert_eq!(stamped.get(&game), None);
    }
}
