use crate::error::{Error, Result};
use crate::game::{ActionId, Game, InfosetId, Key, NodeId};
use crate::numeric::Number;

use std::fmt;

/// A restriction of a game to a subset of its actions.
///
/// Alongside the active actions a support keeps track of which nodes remain
/// reachable when play is confined to them, and how many reachable members
/// each infoset has. Both are updated incrementally as actions are added or
/// removed and always agree with a fresh walk from the root.
///
/// Chance actions are always active. The support borrows its game, so the
/// game cannot be edited underneath it.
#[derive(Debug, Clone)]
pub struct Support<'g, T: Number> {
    game: &'g Game<T>,

    // Indexed by player, canonical infoset number and action position.
    active: Vec<Vec<Vec<bool>>>,

    // Indexed by canonical node number.
    reachable: Vec<bool>,

    // Number of reachable members, by player and infoset number.
    reached: Vec<Vec<usize>>,
}

impl<'g, T: Number> Support<'g, T> {
    /// The support containing every action of `game`.
    pub fn new(game: &'g Game<T>) -> Support<'g, T> {
        let active = game
            .players
            .iter()
            .map(|player| {
                player
                    .infosets
                    .iter()
                    .map(|&i| vec![true; game.infosets[i].num_actions()])
                    .collect()
            })
            .collect();
        let reached = game
            .players
            .iter()
            .map(|player| {
                player
                    .infosets
                    .iter()
                    .map(|&i| game.infosets[i].members.len())
                    .collect()
            })
            .collect();
        Support {
            game,
            active,
            reachable: vec![true; game.num_nodes()],
            reached,
        }
    }

    pub fn game(&self) -> &'g Game<T> {
        self.game
    }

    // ------------------------------------------------------------------
    // Coordinate-level access used by the algorithms.
    // ------------------------------------------------------------------

    pub(crate) fn is_active(&self, player: usize, infoset: usize, action: usize) -> bool {
        self.active[player][infoset][action]
    }

    pub(crate) fn active_count(&self, player: usize, infoset: usize) -> usize {
        self.active[player][infoset].iter().filter(|&&a| a).count()
    }

    /// Positions of the active actions of an infoset, in order.
    pub(crate) fn active_positions(&self, player: usize, infoset: usize) -> Vec<usize> {
        self.active[player][infoset]
            .iter()
            .enumerate()
            .filter(|(_, &a)| a)
            .map(|(position, _)| position)
            .collect()
    }

    pub(crate) fn num_infosets_of(&self, player: usize) -> usize {
        self.active[player].len()
    }

    pub(crate) fn num_actions_at(&self, player: usize, infoset: usize) -> usize {
        self.active[player][infoset].len()
    }

    /// True if some member of the infoset is reachable.
    pub(crate) fn is_infoset_active(&self, player: usize, infoset: usize) -> bool {
        self.reached[player][infoset] > 0
    }

    pub(crate) fn is_node_reachable(&self, node: Key) -> bool {
        self.reachable[self.game.nodes[node].number]
    }

    fn coordinates(&self, infoset: Key) -> (usize, usize) {
        let data = &self.game.infosets[infoset];
        (data.player, data.number)
    }

    /// Activates an action. Returns false if it already was active.
    pub(crate) fn activate(&mut self, player: usize, infoset: usize, action: usize) -> bool {
        if self.active[player][infoset][action] {
            return false;
        }
        self.active[player][infoset][action] = true;

        let game = self.game;
        let key = game.infoset_at(player, infoset);
        for &member in game.infosets[key].members.iter() {
            if self.is_node_reachable(member) {
                let child = game.nodes[member].children[action];
                self.activate_subtree(child);
            }
        }
        true
    }

    /// Deactivates an action. Returns the personal infosets which lost their
    /// last reachable member as a consequence.
    pub(crate) fn deactivate(
        &mut self,
        player: usize,
        infoset: usize,
        action: usize,
    ) -> Vec<(usize, usize)> {
        let mut deactivated = vec![];
        if !self.active[player][infoset][action] {
            return deactivated;
        }
        self.active[player][infoset][action] = false;

        let game = self.game;
        let key = game.infoset_at(player, infoset);
        for &member in game.infosets[key].members.iter() {
            if self.is_node_reachable(member) {
                let child = game.nodes[member].children[action];
                self.deactivate_subtree(child, &mut deactivated);
            }
        }
        deactivated
    }

    fn activate_subtree(&mut self, start: Key) {
        let game = self.game;
        let mut node_stack = vec![start];
        while let Some(node) = node_stack.pop() {
            let data = &game.nodes[node];
            self.reachable[data.number] = true;
            if let Some(infoset) = data.infoset {
                let (player, number) = self.coordinates(infoset);
                self.reached[player][number] += 1;
                for (position, &child) in data.children.iter().enumerate() {
                    if self.active[player][number][position] {
                        node_stack.push(child);
                    }
                }
            }
        }
    }

    fn deactivate_subtree(&mut self, start: Key, deactivated: &mut Vec<(usize, usize)>) {
        let game = self.game;
        let mut node_stack = vec![start];
        while let Some(node) = node_stack.pop() {
            let data = &game.nodes[node];
            self.reachable[data.number] = false;
            if let Some(infoset) = data.infoset {
                let (player, number) = self.coordinates(infoset);
                self.reached[player][number] -= 1;
                if self.reached[player][number] == 0 && player != 0 {
                    deactivated.push((player, number));
                }
                for &child in data.children.iter() {
                    if self.reachable[game.nodes[child].number] {
                        node_stack.push(child);
                    }
                }
            }
        }
    }

    /// Nonterminal nodes reachable from `start` (inclusive) through active
    /// actions, in depth-first order.
    pub(crate) fn nonterminal_from(&self, start: Key) -> Vec<Key> {
        let mut found = vec![];
        let mut node_stack = vec![start];
        while let Some(node) = node_stack.pop() {
            let data = &self.game.nodes[node];
            if let Some(infoset) = data.infoset {
                found.push(node);
                let (player, number) = self.coordinates(infoset);
                for (position, &child) in data.children.iter().enumerate().rev() {
                    if self.active[player][number][position] {
                        node_stack.push(child);
                    }
                }
            }
        }
        found
    }

    /// Personal infosets of the given nodes, first appearance first.
    pub(crate) fn personal_infosets_of(&self, nodes: &[Key]) -> Vec<(usize, usize)> {
        let mut infosets: Vec<(usize, usize)> = vec![];
        for &node in nodes.iter() {
            if let Some(infoset) = self.game.nodes[node].infoset {
                let coordinates = self.coordinates(infoset);
                if coordinates.0 != 0 && !infosets.contains(&coordinates) {
                    infosets.push(coordinates);
                }
            }
        }
        infosets
    }

    /// Personal infosets reachable from `node` by taking the action at
    /// `position` and active actions afterwards.
    pub(crate) fn infosets_via(&self, node: Key, position: usize) -> Vec<(usize, usize)> {
        let child = self.game.nodes[node].children[position];
        self.personal_infosets_of(&self.nonterminal_from(child))
    }

    /// Reachable members of an infoset, in member order.
    pub(crate) fn reachable_member_keys(&self, player: usize, infoset: usize) -> Vec<Key> {
        let key = self.game.infoset_at(player, infoset);
        self.game.infosets[key]
            .members
            .iter()
            .cloned()
            .filter(|&m| self.is_node_reachable(m))
            .collect()
    }

    fn action_coordinates(&self, action: ActionId) -> Result<(usize, usize, usize)> {
        self.game.action_coordinates(action)
    }

    fn infoset_coordinates(&self, infoset: InfosetId) -> Result<(usize, usize)> {
        let key = self.game.infoset_key(infoset)?;
        Ok(self.coordinates(key))
    }

    // ------------------------------------------------------------------
    // Public queries.
    // ------------------------------------------------------------------

    pub fn contains(&self, action: ActionId) -> Result<bool> {
        let (player, infoset, position) = self.action_coordinates(action)?;
        Ok(self.is_active(player, infoset, position))
    }

    /// Position of `action` among the active actions of its infoset.
    pub fn get_index(&self, action: ActionId) -> Result<Option<usize>> {
        let (player, infoset, position) = self.action_coordinates(action)?;
        Ok(self
            .active_positions(player, infoset)
            .iter()
            .position(|&p| p == position))
    }

    /// Number of active actions at `infoset`.
    pub fn num_actions(&self, infoset: InfosetId) -> Result<usize> {
        let (player, number) = self.infoset_coordinates(infoset)?;
        Ok(self.active_count(player, number))
    }

    /// Active actions at `infoset`, in order.
    pub fn actions(&self, infoset: InfosetId) -> Result<Vec<ActionId>> {
        let key = self.game.infoset_key(infoset)?;
        let (player, number) = self.coordinates(key);
        Ok(self
            .active_positions(player, number)
            .into_iter()
            .map(|position| self.game.action_handle(key, position))
            .collect())
    }

    /// Number of active personal actions.
    pub fn total_num_actions(&self) -> usize {
        self.active[1..]
            .iter()
            .flat_map(|player| player.iter())
            .map(|infoset| infoset.iter().filter(|&&a| a).count())
            .sum()
    }

    pub fn add_action(&mut self, action: ActionId) -> Result<()> {
        let (player, infoset, position) = self.action_coordinates(action)?;
        self.activate(player, infoset, position);
        Ok(())
    }

    pub fn remove_action(&mut self, action: ActionId) -> Result<()> {
        self.remove_action_deactivating(action).map(|_| ())
    }

    /// Removes an action and reports the infosets which thereby lost their
    /// last reachable member.
    pub fn remove_action_deactivating(&mut self, action: ActionId) -> Result<Vec<InfosetId>> {
        let (player, infoset, position) = self.action_coordinates(action)?;
        if player == 0 {
            return Err(Error::invalid("chance actions cannot be removed from a support"));
        }
        Ok(self
            .deactivate(player, infoset, position)
            .into_iter()
            .map(|(player, number)| {
                self.game
                    .infoset_handle(self.game.infoset_at(player, number))
            })
            .collect())
    }

    pub fn is_reachable(&self, node: NodeId) -> Result<bool> {
        let key = self.game.node_key(node)?;
        Ok(self.is_node_reachable(key))
    }

    /// True if some member of `infoset` is reachable.
    pub fn infoset_is_active(&self, infoset: InfosetId) -> Result<bool> {
        let (player, number) = self.infoset_coordinates(infoset)?;
        Ok(self.is_infoset_active(player, number))
    }

    pub fn reachable_members(&self, infoset: InfosetId) -> Result<Vec<NodeId>> {
        let (player, number) = self.infoset_coordinates(infoset)?;
        Ok(self
            .reachable_member_keys(player, number)
            .into_iter()
            .map(|m| self.game.node_handle(m))
            .collect())
    }

    /// Nonterminal nodes strictly below `node` reachable through active
    /// actions.
    pub fn reachable_nonterminal_nodes(&self, node: NodeId) -> Result<Vec<NodeId>> {
        let key = self.game.node_key(node)?;
        let mut nodes = self.nonterminal_from(key);
        if !nodes.is_empty() {
            nodes.remove(0);
        }
        Ok(nodes.into_iter().map(|n| self.game.node_handle(n)).collect())
    }

    /// Personal infosets met at or below `node` through active actions.
    pub fn reachable_infosets(&self, node: NodeId) -> Result<Vec<InfosetId>> {
        let key = self.game.node_key(node)?;
        Ok(self.infoset_handles(self.personal_infosets_of(&self.nonterminal_from(key))))
    }

    /// Personal infosets met after taking `action` at `node`.
    pub fn reachable_infosets_via(&self, node: NodeId, action: ActionId) -> Result<Vec<InfosetId>> {
        let key = self.game.node_key(node)?;
        let (infoset, position) = self.game.action_position(action)?;
        if self.game.nodes[key].infoset != Some(infoset) {
            return Err(Error::mismatch("action does not belong to the node's infoset"));
        }
        Ok(self.infoset_handles(self.infosets_via(key, position)))
    }

    fn infoset_handles(&self, infosets: Vec<(usize, usize)>) -> Vec<InfosetId> {
        infosets
            .into_iter()
            .map(|(player, number)| {
                self.game
                    .infoset_handle(self.game.infoset_at(player, number))
            })
            .collect()
    }

    /// Sum over reachable personal infosets of the number of active actions
    /// less one.
    pub fn num_degrees_of_freedom(&self) -> usize {
        let mut degrees = 0;
        for player in 1..self.active.len() {
            for infoset in 0..self.num_infosets_of(player) {
                if self.is_infoset_active(player, infoset) {
                    degrees += self.active_count(player, infoset).saturating_sub(1);
                }
            }
        }
        degrees
    }

    /// True if every personal infoset keeps at least one action.
    pub fn is_valid(&self) -> bool {
        self.personal_infosets()
            .all(|(player, infoset)| self.active_count(player, infoset) > 0)
    }

    /// True if every reachable personal infoset keeps at least one action.
    pub fn has_active_actions_at_active_infosets(&self) -> bool {
        self.personal_infosets().all(|(player, infoset)| {
            !self.is_infoset_active(player, infoset) || self.active_count(player, infoset) > 0
        })
    }

    /// As `has_active_actions_at_active_infosets`, and additionally no
    /// unreachable infoset has an active action.
    pub fn has_active_actions_at_active_infosets_and_no_others(&self) -> bool {
        self.personal_infosets().all(|(player, infoset)| {
            let count = self.active_count(player, infoset);
            match self.is_infoset_active(player, infoset) {
                true => count > 0,
                false => count == 0,
            }
        })
    }

    fn personal_infosets<'s>(&'s self) -> impl Iterator<Item = (usize, usize)> + 's {
        (1..self.active.len())
            .flat_map(move |player| (0..self.num_infosets_of(player)).map(move |i| (player, i)))
    }

    /// True if every action active here is active in `other`.
    pub fn is_subset_of(&self, other: &Support<T>) -> bool {
        if self.game.id() != other.game.id() {
            return false;
        }
        self.active.iter().zip(other.active.iter()).all(|(mine, theirs)| {
            mine.iter().zip(theirs.iter()).all(|(mine, theirs)| {
                mine.iter().zip(theirs.iter()).all(|(&m, &t)| !m || t)
            })
        })
    }
}

impl<'g, T: Number> PartialEq for Support<'g, T> {
    fn eq(&self, other: &Support<'g, T>) -> bool {
        self.game.id() == other.game.id() && self.active == other.active
    }
}

impl<'g, T: Number> Eq for Support<'g, T> {}

/// Lists active action labels, one brace group per player and infoset.
impl<'g, T: Number> fmt::Display for Support<'g, T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{{")?;
        for player in 1..self.active.len() {
            write!(f, " {{")?;
            for infoset in 0..self.num_infosets_of(player) {
                write!(f, " {{")?;
                let key = self.game.infoset_at(player, infoset);
                for position in self.active_positions(player, infoset) {
                    let label = &self.game.infosets[key].actions[position].label;
                    match label.is_empty() {
                        true => write!(f, " {}", position + 1)?,
                        false => write!(f, " \"{}\"", label)?,
                    }
                }
                write!(f, " }}")?;
            }
            write!(f, " }}")?;
        }
        write!(f, " }}")
    }
}
