use crate::error::{Error, Result};
use crate::game::{ActionId, Game, InfosetId, Key, NodeId, PlayerId};
use crate::numeric::Number;

/// One chosen action per personal infoset; chance keeps moving randomly.
#[derive(Debug, Clone)]
pub struct PureBehavProfile<'g, T: Number> {
    game: &'g Game<T>,

    // Chosen action position, indexed by player and canonical infoset
    // number. Row 0 (chance) stays empty.
    choices: Vec<Vec<usize>>,
}

impl<'g, T: Number> PureBehavProfile<'g, T> {
    /// The profile choosing the first action everywhere.
    pub fn new(game: &'g Game<T>) -> PureBehavProfile<'g, T> {
        let mut choices = vec![vec![]];
        for player in game.players() {
            choices.push(vec![0; game.players[player.number()].infosets.len()]);
        }
        PureBehavProfile { game, choices }
    }

    pub fn game(&self) -> &'g Game<T> {
        self.game
    }

    pub fn get(&self, infoset: InfosetId) -> Result<ActionId> {
        let key = self.game.infoset_key(infoset)?;
        let data = &self.game.infosets[key];
        if data.is_chance() {
            return Err(Error::invalid("chance infosets carry no choice"));
        }
        Ok(self
            .game
            .action_handle(key, self.choices[data.player][data.number]))
    }

    pub fn set(&mut self, action: ActionId) -> Result<()> {
        let (player, number, position) = self.game.action_coordinates(action)?;
        if player == 0 {
            return Err(Error::invalid("chance actions cannot be chosen"));
        }
        self.choices[player][number] = position;
        Ok(())
    }

    /// Chooses by canonical coordinates.
    pub fn set_by_number(&mut self, player: usize, infoset: usize, position: usize) -> Result<()> {
        let key = self.game.infoset_key(self.game.infoset_by_number(player, infoset)?)?;
        if player == 0 {
            return Err(Error::invalid("chance actions cannot be chosen"));
        }
        if position >= self.game.infosets[key].num_actions() {
            return Err(Error::invalid(format!("no action at position {}", position)));
        }
        self.choices[player][infoset] = position;
        Ok(())
    }

    pub(crate) fn set_choice(&mut self, player: usize, infoset: usize, position: usize) {
        self.choices[player][infoset] = position;
    }

    pub(crate) fn branch_weight(&self, infoset: Key, position: usize) -> T {
        self.game.chance_or(infoset, position, |player, number, position| {
            match self.choices[player][number] == position {
                true => T::one(),
                false => T::zero(),
            }
        })
    }

    /// Expected payoff to `player` from the root.
    pub fn payoff(&self, player: PlayerId) -> Result<T> {
        self.payoff_from(self.game.root(), player)
    }

    pub fn payoff_vector(&self) -> Vec<T> {
        self.game
            .accumulate_payoffs(self.game.root, |i, p| self.branch_weight(i, p))
    }

    /// Expected payoff to `player` of the play starting at `node`, counting
    /// outcomes at `node` and below only.
    pub fn payoff_from(&self, node: NodeId, player: PlayerId) -> Result<T> {
        let key = self.game.node_key(node)?;
        let number = self.game.player_number(player)?;
        if number == 0 {
            return Err(Error::invalid("chance receives no payoff"));
        }
        Ok(self.payoff_from_key(key, number))
    }

    pub(crate) fn payoff_from_key(&self, node: Key, player: usize) -> T {
        self.game
            .accumulate_payoffs(node, |i, p| self.branch_weight(i, p))[player - 1]
    }

    /// Probability that play reaches `node`.
    pub fn realiz_prob(&self, node: NodeId) -> Result<T> {
        let key = self.game.node_key(node)?;
        Ok(self.game.path_weight(key, |i, p| self.branch_weight(i, p)))
    }

    /// Probability that play reaches some member of `infoset`.
    pub fn infoset_prob(&self, infoset: InfosetId) -> Result<T> {
        let key = self.game.infoset_key(infoset)?;
        Ok(self.game.infosets[key]
            .members
            .iter()
            .fold(T::zero(), |acc, &m| {
                acc + self.game.path_weight(m, |i, p| self.branch_weight(i, p))
            }))
    }
}

#[cfg(test)]
mod tests {
    use super::PureBehavProfile;
    use crate::game::test_fixtures::{ENTRY_GAME, PRISONERS_DILEMMA};
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn simultaneous_payoffs() {
        let game = &*PRISONERS_DILEMMA;
        let mut profile = PureBehavProfile::new(game);
        let row = game.player(1).unwrap();
        let column = game.player(2).unwrap();
        assert_approx_eq!(profile.payoff(row).unwrap(), 3.0);

        profile.set_by_number(2, 0, 1).unwrap();
        assert_approx_eq!(profile.payoff(row).unwrap(), 0.0);
        assert_approx_eq!(profile.payoff(column).unwrap(), 5.0);
        assert_eq!(profile.payoff_vector(), game.payoff(&profile).unwrap());
    }

    #[test]
    fn chance_weights_payoffs_and_reach() {
        let game = &*ENTRY_GAME;
        let mut profile = PureBehavProfile::new(game);
        let entrant = game.player(1).unwrap();
        let incumbent = game.player(2).unwrap();

        // In, then Share: one half of 1 plus one half of 2.
        profile.set_by_number(2, 0, 1).unwrap();
        assert_approx_eq!(profile.payoff(entrant).unwrap(), 1.5);
        assert_approx_eq!(profile.payoff(incumbent).unwrap(), 1.0);

        let fight = game.infoset_by_number(2, 0).unwrap();
        assert_approx_eq!(profile.infoset_prob(fight).unwrap(), 1.0);
        let entered = game.members(fight).unwrap()[0];
        assert_approx_eq!(profile.realiz_prob(entered).unwrap(), 0.5);
        assert_approx_eq!(profile.payoff_from(entered, entrant).unwrap(), 1.0);

        // Staying out never reaches the incumbent.
        let out = game.action(game.infoset_by_number(1, 0).unwrap(), 1).unwrap();
        profile.set(out).unwrap();
        assert_approx_eq!(profile.infoset_prob(fight).unwrap(), 0.0);
        assert_approx_eq!(profile.payoff(incumbent).unwrap(), 2.0);
        assert_eq!(profile.get(out.infoset()).unwrap(), out);
    }
}
