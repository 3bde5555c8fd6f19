use crate::error::{Error, Result};
use crate::game::{ActionId, InfosetId, Key, NodeId, PlayerId};
use crate::numeric::Number;
use crate::strategy::PureBehavProfile;
use crate::support::Support;

/// Iterates over the pure contingencies of a support: every combination of
/// one active action per personal infoset in the iteration space.
///
/// Infosets can be frozen, which holds their current action fixed while the
/// others vary. Iteration advances like an odometer, the last infoset in
/// canonical order turning fastest.
#[derive(Debug, Clone)]
pub struct ContingencyIterator<'s, 'g, T: Number> {
    support: &'s Support<'g, T>,
    profile: PureBehavProfile<'g, T>,

    // All indexed by player and canonical infoset number.
    choices: Vec<Vec<Vec<usize>>>,
    current: Vec<Vec<usize>>,
    in_space: Vec<Vec<bool>>,
    frozen: Vec<Vec<bool>>,
}

impl<'s, 'g, T: Number> ContingencyIterator<'s, 'g, T> {
    /// Iterates over all personal infosets of the support, positioned at
    /// the first contingency.
    pub fn new(support: &'s Support<'g, T>) -> ContingencyIterator<'s, 'g, T> {
        let all: Vec<(usize, usize)> = (1..=support.game().num_players())
            .flat_map(|player| (0..support.num_infosets_of(player)).map(move |i| (player, i)))
            .collect();
        ContingencyIterator::over(support, &all)
    }

    /// Iterates only over `infosets`; every other infoset keeps whatever
    /// action it is set to.
    pub fn with_infosets(
        support: &'s Support<'g, T>,
        infosets: &[InfosetId],
    ) -> Result<ContingencyIterator<'s, 'g, T>> {
        let game = support.game();
        let mut coordinates = vec![];
        for &infoset in infosets.iter() {
            let player = game.infoset_player(infoset)?.number();
            if player == 0 {
                return Err(Error::invalid("chance infosets cannot be iterated over"));
            }
            coordinates.push((player, game.infoset_number(infoset)?));
        }
        Ok(ContingencyIterator::over(support, &coordinates))
    }

    pub(crate) fn over(
        support: &'s Support<'g, T>,
        infosets: &[(usize, usize)],
    ) -> ContingencyIterator<'s, 'g, T> {
        let num_players = support.game().num_players();
        let mut choices = vec![vec![]];
        let mut in_space = vec![vec![]];
        for player in 1..=num_players {
            let count = support.num_infosets_of(player);
            choices.push(
                (0..count)
                    .map(|infoset| support.active_positions(player, infoset))
                    .collect(),
            );
            in_space.push(vec![false; count]);
        }
        for &(player, infoset) in infosets.iter() {
            // An infoset without active actions has nothing to iterate over.
            in_space[player][infoset] = !choices[player][infoset].is_empty();
        }
        let current = in_space.iter().map(|row| vec![0; row.len()]).collect();
        let frozen = in_space.iter().map(|row| vec![false; row.len()]).collect();

        let mut iterator = ContingencyIterator {
            support,
            profile: PureBehavProfile::new(support.game()),
            choices,
            current,
            in_space,
            frozen,
        };
        iterator.first();
        iterator
    }

    pub fn support(&self) -> &'s Support<'g, T> {
        self.support
    }

    /// The pure profile of the current contingency.
    pub fn profile(&self) -> &PureBehavProfile<'g, T> {
        &self.profile
    }

    fn moving(&self, player: usize, infoset: usize) -> bool {
        self.in_space[player][infoset] && !self.frozen[player][infoset]
    }

    /// Resets every thawed infoset in the space to its first active action.
    pub fn first(&mut self) {
        for player in 1..self.in_space.len() {
            for infoset in 0..self.in_space[player].len() {
                if self.moving(player, infoset) {
                    self.current[player][infoset] = 0;
                    let position = self.choices[player][infoset][0];
                    self.profile.set_choice(player, infoset, position);
                }
            }
        }
    }

    /// Advances to the next contingency. Returns false, leaving the iterator
    /// back at the first contingency, once the space is exhausted.
    pub fn next_contingency(&mut self) -> bool {
        for player in (1..self.in_space.len()).rev() {
            for infoset in (0..self.in_space[player].len()).rev() {
                if !self.moving(player, infoset) {
                    continue;
                }
                let next = self.current[player][infoset] + 1;
                if next < self.choices[player][infoset].len() {
                    self.current[player][infoset] = next;
                    let position = self.choices[player][infoset][next];
                    self.profile.set_choice(player, infoset, position);
                    return true;
                }
                self.current[player][infoset] = 0;
                let position = self.choices[player][infoset][0];
                self.profile.set_choice(player, infoset, position);
            }
        }
        false
    }

    pub(crate) fn freeze_at(&mut self, player: usize, infoset: usize) {
        self.frozen[player][infoset] = true;
    }

    pub(crate) fn set_at(&mut self, player: usize, infoset: usize, position: usize) {
        if let Some(index) = self.choices[player][infoset]
            .iter()
            .position(|&p| p == position)
        {
            self.current[player][infoset] = index;
        }
        self.profile.set_choice(player, infoset, position);
    }

    /// Holds `infoset` at its current action.
    pub fn freeze(&mut self, infoset: InfosetId) -> Result<()> {
        let (player, number) = self.coordinates(infoset)?;
        self.freeze_at(player, number);
        Ok(())
    }

    pub fn thaw(&mut self, infoset: InfosetId) -> Result<()> {
        let (player, number) = self.coordinates(infoset)?;
        self.frozen[player][number] = false;
        Ok(())
    }

    /// Selects `action` at its infoset. Inactive actions may be selected
    /// too; iteration continues from the infoset's first active action.
    pub fn set(&mut self, action: ActionId) -> Result<()> {
        let (player, number, position) = self.support.game().action_coordinates(action)?;
        if player == 0 {
            return Err(Error::invalid("chance actions cannot be selected"));
        }
        self.set_at(player, number, position);
        Ok(())
    }

    fn coordinates(&self, infoset: InfosetId) -> Result<(usize, usize)> {
        let game = self.support.game();
        let player = game.infoset_player(infoset)?.number();
        if player == 0 {
            return Err(Error::invalid("chance infosets are never iterated over"));
        }
        Ok((player, game.infoset_number(infoset)?))
    }

    /// Payoff to `player` under the current contingency.
    pub fn payoff(&self, player: PlayerId) -> Result<T> {
        self.profile.payoff(player)
    }

    /// Payoff to `player` of the play below `node` under the current
    /// contingency.
    pub fn payoff_from(&self, node: NodeId, player: PlayerId) -> Result<T> {
        self.profile.payoff_from(node, player)
    }

    pub(crate) fn payoff_from_key(&self, node: Key, player: usize) -> T {
        self.profile.payoff_from_key(node, player)
    }
}
