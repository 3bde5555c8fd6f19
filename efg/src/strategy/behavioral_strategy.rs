use crate::error::{Error, Result};
use crate::game::{ActionId, Game, InfosetId, Key, NodeId, PlayerId};
use crate::numeric::Number;
use crate::support::Support;

/// A behaviour strategy profile: a probability for every personal action.
/// Chance actions always use the game's own probabilities.
#[derive(Debug, Clone)]
pub struct BehavProfile<'g, T: Number> {
    game: &'g Game<T>,

    // Indexed by player, canonical infoset number and action position.
    probs: Vec<Vec<Vec<T>>>,
}

impl<'g, T: Number> BehavProfile<'g, T> {
    /// The profile mixing uniformly over the active actions of `support` at
    /// every infoset. Inactive actions get probability zero.
    pub fn centroid(support: &Support<'g, T>) -> BehavProfile<'g, T> {
        let game = support.game();
        let mut probs = vec![vec![]];
        for player in 1..game.players.len() {
            let mut infosets = vec![];
            for (number, &infoset) in game.players[player].infosets.iter().enumerate() {
                let num_actions = game.infosets[infoset].num_actions();
                let active = support.active_count(player, number);
                let share = match active {
                    0 => T::zero(),
                    n => T::one() / T::from_usize(n),
                };
                infosets.push(
                    (0..num_actions)
                        .map(|a| match support.is_active(player, number, a) {
                            true => share,
                            false => T::zero(),
                        })
                        .collect(),
                );
            }
            probs.push(infosets);
        }
        BehavProfile { game, probs }
    }

    pub fn game(&self) -> &'g Game<T> {
        self.game
    }

    pub fn prob(&self, action: ActionId) -> Result<T> {
        let (player, number, position) = self.game.action_coordinates(action)?;
        match player {
            0 => self.game.chance_prob(action),
            _ => Ok(self.probs[player][number][position]),
        }
    }

    pub fn set_prob(&mut self, action: ActionId, prob: T) -> Result<()> {
        let (player, number, position) = self.game.action_coordinates(action)?;
        if player == 0 {
            return Err(Error::invalid("chance probabilities belong to the game"));
        }
        if prob < T::zero() {
            return Err(Error::invalid("probabilities must be non-negative"));
        }
        self.probs[player][number][position] = prob;
        Ok(())
    }

    fn branch_weight(&self, infoset: Key, position: usize) -> T {
        self.game.chance_or(infoset, position, |player, number, position| {
            self.probs[player][number][position]
        })
    }

    pub fn realiz_prob(&self, node: NodeId) -> Result<T> {
        let key = self.game.node_key(node)?;
        Ok(self.game.path_weight(key, |i, p| self.branch_weight(i, p)))
    }

    pub fn infoset_prob(&self, infoset: InfosetId) -> Result<T> {
        let key = self.game.infoset_key(infoset)?;
        Ok(self.game.infosets[key]
            .members
            .iter()
            .fold(T::zero(), |acc, &m| {
                acc + self.game.path_weight(m, |i, p| self.branch_weight(i, p))
            }))
    }

    /// Conditional probability of being at `node` given that its infoset is
    /// reached; zero when the infoset is reached with probability zero.
    pub fn belief(&self, node: NodeId) -> Result<T> {
        let infoset = match self.game.infoset(node)? {
            Some(infoset) => infoset,
            None => return Err(Error::invalid("terminal nodes have no infoset")),
        };
        let total = self.infoset_prob(infoset)?;
        if total.is_zero() {
            return Ok(T::zero());
        }
        Ok(self.realiz_prob(node)? / total)
    }

    pub fn payoff(&self, player: PlayerId) -> Result<T> {
        let number = self.game.player_number(player)?;
        if number == 0 {
            return Err(Error::invalid("chance receives no payoff"));
        }
        Ok(self.payoff_vector()[number - 1])
    }

    pub fn payoff_vector(&self) -> Vec<T> {
        self.game
            .accumulate_payoffs(self.game.root, |i, p| self.branch_weight(i, p))
    }
}
