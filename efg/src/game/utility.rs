use crate::error::{Error, Result};
use crate::game::arena::Key;
use crate::game::handles::{GameId, PlayerId};
use crate::game::Game;
use crate::numeric::Number;
use crate::support::Support;

use log::debug;

/// A value derived from a game, tagged with the revision it was computed at.
/// Any later edit of the game makes `get` return `None`.
#[derive(Debug, Clone)]
pub struct Stamped<V> {
    game: GameId,
    revision: u64,
    value: V,
}

impl<V> Stamped<V> {
    pub fn new<T: Number>(game: &Game<T>, value: V) -> Stamped<V> {
        Stamped {
            game: game.id(),
            revision: game.revision(),
            value,
        }
    }

    pub fn get<T: Number>(&self, game: &Game<T>) -> Option<&V> {
        match game.id() == self.game && game.revision() == self.revision {
            true => Some(&self.value),
            false => None,
        }
    }

    pub fn into_inner(self) -> V {
        self.value
    }
}

impl<T: Number> Game<T> {
    /// A copy of the game restricted to the actions of `support`. Nodes below
    /// removed actions disappear; everything else, labels included, carries
    /// over. The copy is a new game: handles of `self` do not resolve in it.
    pub fn compress(&self, support: &Support<T>) -> Result<Game<T>> {
        if support.game().id() != self.id {
            return Err(Error::mismatch("support belongs to a different game"));
        }
        if !support.is_valid() {
            return Err(Error::invalid("support leaves an infoset without actions"));
        }

        let mut removed: Vec<(Key, usize)> = vec![];
        for player in 1..self.players.len() {
            for (number, &infoset) in self.players[player].infosets.iter().enumerate() {
                for position in (0..self.infosets[infoset].num_actions()).rev() {
                    if !support.is_active(player, number, position) {
                        removed.push((infoset, position));
                    }
                }
            }
        }

        let mut compressed = self.clone();
        compressed.id = GameId::fresh();
        for (infoset, position) in removed {
            let action = compressed.action_handle(infoset, position);
            compressed.delete_action(action.infoset(), action)?;
        }
        debug!(
            "Compressed game from {} to {} nodes",
            self.num_nodes(),
            compressed.num_nodes()
        );
        Ok(compressed)
    }

    /// True if every member of each personal infoset is reached by the same
    /// sequence of the owning player's own choices.
    pub fn is_perfect_recall(&self) -> bool {
        for player in 1..self.players.len() {
            for &infoset in self.players[player].infosets.iter() {
                let mut members = self.infosets[infoset].members.iter();
                let first = match members.next() {
                    Some(&first) => self.own_history(first, player),
                    None => continue,
                };
                if members.any(|&m| self.own_history(m, player) != first) {
                    return false;
                }
            }
        }
        true
    }

    /// Choices `player` made on the way to `node`, root first.
    fn own_history(&self, node: Key, player: usize) -> Vec<(Key, usize)> {
        let mut history = vec![];
        let mut current = node;
        while let Some((infoset, position)) = self.prior_action_position(current) {
            if self.infosets[infoset].player == player {
                history.push((infoset, position));
            }
            current = match self.nodes[current].parent {
                Some(parent) => parent,
                None => break,
            };
        }
        history.reverse();
        history
    }

    /// True if all outcomes pay the same total to the players.
    pub fn is_const_sum(&self) -> bool {
        let mut totals = self.outcome_list.iter().map(|&o| {
            self.outcomes[o]
                .payoffs
                .iter()
                .fold(T::zero(), |acc, &v| acc + v)
        });
        let first = match totals.next() {
            Some(first) => first,
            None => return true,
        };
        totals.all(|total| (total - first).is_negligible())
    }

    /// Smallest payoff any outcome gives to `player`, or to anyone when
    /// `player` is `None`. Zero if the game has no outcomes.
    pub fn min_payoff(&self, player: Option<PlayerId>) -> Result<T> {
        self.extreme_payoff(player, |candidate, best| candidate < best)
    }

    /// Largest payoff any outcome gives to `player`, or to anyone when
    /// `player` is `None`. Zero if the game has no outcomes.
    pub fn max_payoff(&self, player: Option<PlayerId>) -> Result<T> {
        self.extreme_payoff(player, |candidate, best| candidate > best)
    }

    fn extreme_payoff<F>(&self, player: Option<PlayerId>, better: F) -> Result<T>
    where
        F: Fn(T, T) -> bool,
    {
        let players = match player {
            Some(player) => {
                let number = self.player_number(player)?;
                if number == 0 {
                    return Err(Error::invalid("chance receives no payoff"));
                }
                vec![number]
            }
            None => (1..self.players.len()).collect(),
        };

        let mut best: Option<T> = None;
        for &outcome in self.outcome_list.iter() {
            for &player in players.iter() {
                let value = self.outcomes[outcome].payoff(player);
                best = match best {
                    Some(b) if !better(value, b) => Some(b),
                    _ => Some(value),
                };
            }
        }
        Ok(best.unwrap_or_else(T::zero))
    }
}
