use crate::error::{Error, Result};
use crate::game::{ActionId, Game, InfosetId, Key, NodeId};
use crate::numeric::Number;
use crate::support::Support;

/// A support of basis actions together with, at every personal infoset, a
/// set of basis member nodes.
///
/// The basis is consistent when some ordering of vanishing probabilities
/// makes the basis actions the ones played with positive probability and the
/// basis nodes exactly the members of each infoset reached with the highest
/// probability. See `Basis::is_consistent`.
#[derive(Debug, Clone, PartialEq)]
pub struct Basis<'g, T: Number> {
    actions: Support<'g, T>,

    // Indexed by player, canonical infoset number and member position.
    nodes: Vec<Vec<Vec<bool>>>,
}

impl<'g, T: Number> Basis<'g, T> {
    /// A basis over the actions of `actions` in which every member of every
    /// personal infoset is a basis node.
    pub fn new(actions: Support<'g, T>) -> Basis<'g, T> {
        let game = actions.game();
        let nodes = game
            .players
            .iter()
            .enumerate()
            .map(|(number, player)| {
                player
                    .infosets
                    .iter()
                    .map(|&i| vec![number != 0; game.infosets[i].members.len()])
                    .collect()
            })
            .collect();
        Basis { actions, nodes }
    }

    /// The basis over all actions of `game`.
    pub fn full(game: &'g Game<T>) -> Basis<'g, T> {
        Basis::new(Support::new(game))
    }

    pub fn game(&self) -> &'g Game<T> {
        self.actions.game()
    }

    pub fn actions(&self) -> &Support<'g, T> {
        &self.actions
    }

    pub fn add_action(&mut self, action: ActionId) -> Result<()> {
        self.actions.add_action(action)
    }

    pub fn remove_action(&mut self, action: ActionId) -> Result<()> {
        self.actions.remove_action(action)
    }

    /// Player, infoset number and member position of a decision node.
    fn locate(&self, node: NodeId) -> Result<(usize, usize, usize)> {
        let game = self.game();
        let key = game.node_key(node)?;
        let infoset = match game.nodes[key].infoset {
            Some(infoset) => infoset,
            None => return Err(Error::invalid("terminal nodes cannot be basis nodes")),
        };
        let data = &game.infosets[infoset];
        if data.is_chance() {
            return Err(Error::invalid("chance nodes cannot be basis nodes"));
        }
        match data.member_position(key) {
            Some(position) => Ok((data.player, data.number, position)),
            None => Err(Error::mismatch("node is not a member of its infoset")),
        }
    }

    pub fn add_node(&mut self, node: NodeId) -> Result<()> {
        let (player, infoset, position) = self.locate(node)?;
        self.nodes[player][infoset][position] = true;
        Ok(())
    }

    pub fn remove_node(&mut self, node: NodeId) -> Result<()> {
        let (player, infoset, position) = self.locate(node)?;
        self.nodes[player][infoset][position] = false;
        Ok(())
    }

    pub fn is_basis_node(&self, node: NodeId) -> Result<bool> {
        let (player, infoset, position) = self.locate(node)?;
        Ok(self.nodes[player][infoset][position])
    }

    /// Basis members of `infoset`, in membership order.
    pub fn basis_nodes(&self, infoset: InfosetId) -> Result<Vec<NodeId>> {
        let game = self.game();
        let key = game.infoset_key(infoset)?;
        let data = &game.infosets[key];
        Ok(self
            .member_keys(data.player, data.number)
            .into_iter()
            .filter(|&(_, basis)| basis)
            .map(|(m, _)| game.node_handle(m))
            .collect())
    }

    /// Members of a personal infoset, each flagged with basis membership.
    pub(crate) fn member_keys(&self, player: usize, infoset: usize) -> Vec<(Key, bool)> {
        let game = self.game();
        let key = game.infoset_at(player, infoset);
        game.infosets[key]
            .members
            .iter()
            .enumerate()
            .map(|(position, &m)| (m, player != 0 && self.nodes[player][infoset][position]))
            .collect()
    }
}
