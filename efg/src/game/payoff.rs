use crate::error::{Error, Result};
use crate::game::arena::Key;
use crate::game::Game;
use crate::numeric::Number;
use crate::strategy::PureBehavProfile;

/// Payoff evaluation. Outcomes may hang at interior nodes as well as at
/// leaves; every outcome met on a realised path contributes.
impl<T: Number> Game<T> {
    /// Expected payoff vector (one entry per personal player) when the
    /// personal players follow `profile` and chance moves randomly.
    pub fn payoff(&self, profile: &PureBehavProfile<T>) -> Result<Vec<T>> {
        if profile.game().id() != self.id {
            return Err(Error::mismatch("profile belongs to a different game"));
        }
        Ok(self.accumulate_payoffs(self.root, |infoset, position| {
            profile.branch_weight(infoset, position)
        }))
    }

    /// Walks the subtree below `start`, weighting each branch by
    /// `weight(infoset, action position)`. Branches of weight zero are not
    /// explored.
    pub(crate) fn accumulate_payoffs<F>(&self, start: Key, weight: F) -> Vec<T>
    where
        F: Fn(Key, usize) -> T,
    {
        let mut payoffs = vec![T::zero(); self.num_players()];
        let mut node_stack = vec![(start, T::one())];
        while let Some((node, prob)) = node_stack.pop() {
            let data = &self.nodes[node];
            if let Some(outcome) = data.outcome {
                for (total, &value) in payoffs.iter_mut().zip(self.outcomes[outcome].payoffs.iter()) {
                    *total += prob * value;
                }
            }
            if let Some(infoset) = data.infoset {
                for (position, &child) in data.children.iter().enumerate() {
                    let branch = weight(infoset, position);
                    if !branch.is_zero() {
                        node_stack.push((child, prob * branch));
                    }
                }
            }
        }
        payoffs
    }

    /// Product of branch weights along the path from the root to `node`.
    pub(crate) fn path_weight<F>(&self, node: Key, weight: F) -> T
    where
        F: Fn(Key, usize) -> T,
    {
        let mut prob = T::one();
        let mut current = node;
        while let Some((infoset, position)) = self.prior_action_position(current) {
            prob *= weight(infoset, position);
            current = match self.nodes[current].parent {
                Some(parent) => parent,
                None => break,
            };
        }
        prob
    }

    /// Probability of a chance branch; personal branches defer to
    /// `personal(player, infoset number, position)`.
    pub(crate) fn chance_or<F>(&self, infoset: Key, position: usize, personal: F) -> T
    where
        F: Fn(usize, usize, usize) -> T,
    {
        let data = &self.infosets[infoset];
        match data.is_chance() {
            true => data.actions[position].prob,
            false => personal(data.player, data.number, position),
        }
    }
}
