use crate::contingency::ContingencyIterator;
use crate::error::{Error, Result};
use crate::game::{ActionId, PlayerId};
use crate::numeric::Number;
use crate::status::Status;
use crate::support::Support;

use itertools::Itertools;
use log::{debug, info};

/// Which notion of dominance to test for.
///
/// `strong` asks for a strictly better payoff in every comparison; otherwise
/// the dominating action must do at least as well everywhere and strictly
/// better somewhere. `conditional` compares only play which actually reaches
/// the infoset in question.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DominanceOptions {
    pub strong: bool,
    pub conditional: bool,
}

impl DominanceOptions {
    pub fn new(strong: bool, conditional: bool) -> DominanceOptions {
        DominanceOptions {
            strong,
            conditional,
        }
    }
}

/// Running verdict over a sequence of payoff comparisons.
struct Comparison {
    strong: bool,
    equal: bool,
}

impl Comparison {
    fn new(strong: bool) -> Comparison {
        Comparison {
            strong,
            equal: true,
        }
    }

    /// Records one comparison; false once dominance is ruled out.
    fn record<T: Number>(&mut self, a: T, b: T) -> bool {
        if self.strong {
            return a > b;
        }
        if a < b {
            return false;
        }
        if a > b {
            self.equal = false;
        }
        true
    }

    fn verdict(&self) -> bool {
        self.strong || !self.equal
    }
}

impl<'g, T: Number> Support<'g, T> {
    /// True if action `a` dominates action `b`. Both must belong to the same
    /// infoset; the dominance relation is judged for the infoset's owner
    /// over the contingencies of this support.
    pub fn dominates(
        &self,
        a: ActionId,
        b: ActionId,
        strong: bool,
        conditional: bool,
    ) -> Result<bool> {
        let game = self.game();
        let (player, infoset, a) = game.action_coordinates(a)?;
        let (other_player, other_infoset, b) = game.action_coordinates(b)?;
        if (player, infoset) != (other_player, other_infoset) {
            return Err(Error::mismatch("actions belong to different infosets"));
        }
        if player == 0 {
            return Err(Error::invalid("dominance is undefined at chance infosets"));
        }
        Ok(self.dominates_at(player, infoset, a, b, strong, conditional))
    }

    pub fn dominates_with(&self, a: ActionId, b: ActionId, options: DominanceOptions) -> Result<bool> {
        self.dominates(a, b, options.strong, options.conditional)
    }

    pub(crate) fn dominates_at(
        &self,
        player: usize,
        infoset: usize,
        a: usize,
        b: usize,
        strong: bool,
        conditional: bool,
    ) -> bool {
        match conditional {
            true => self.dominates_conditionally(player, infoset, a, b, strong),
            false => self.dominates_unconditionally(player, infoset, a, b, strong),
        }
    }

    fn dominates_unconditionally(
        &self,
        player: usize,
        infoset: usize,
        a: usize,
        b: usize,
        strong: bool,
    ) -> bool {
        let root = self.game().root;
        let mut with_a = ContingencyIterator::new(self);
        let mut with_b = ContingencyIterator::new(self);
        with_a.freeze_at(player, infoset);
        with_a.set_at(player, infoset, a);
        with_b.freeze_at(player, infoset);
        with_b.set_at(player, infoset, b);

        let mut comparison = Comparison::new(strong);
        loop {
            let payoff_a = with_a.payoff_from_key(root, player);
            let payoff_b = with_b.payoff_from_key(root, player);
            if !comparison.record(payoff_a, payoff_b) {
                return false;
            }
            let more_a = with_a.next_contingency();
            let more_b = with_b.next_contingency();
            if !(more_a && more_b) {
                break;
            }
        }
        comparison.verdict()
    }

    /// Compares play starting at each reachable member of the infoset, over
    /// the contingencies of the infosets reachable below it via `a` or `b`.
    /// An infoset without reachable members is compared at all of its
    /// members instead.
    fn dominates_conditionally(
        &self,
        player: usize,
        infoset: usize,
        a: usize,
        b: usize,
        strong: bool,
    ) -> bool {
        let game = self.game();
        let mut members = self.reachable_member_keys(player, infoset);
        if members.is_empty() {
            members = game.infosets[game.infoset_at(player, infoset)].members.clone();
        }

        let mut comparison = Comparison::new(strong);
        for node in members {
            let infosets: Vec<(usize, usize)> = self
                .infosets_via(node, a)
                .into_iter()
                .chain(self.infosets_via(node, b))
                .unique()
                .filter(|&i| i != (player, infoset))
                .collect();

            let mut with_a = ContingencyIterator::over(self, &infosets);
            let mut with_b = ContingencyIterator::over(self, &infosets);
            with_a.set_at(player, infoset, a);
            with_b.set_at(player, infoset, b);
            loop {
                let payoff_a = with_a.payoff_from_key(node, player);
                let payoff_b = with_b.payoff_from_key(node, player);
                if !comparison.record(payoff_a, payoff_b) {
                    return false;
                }
                let more_a = with_a.next_contingency();
                let more_b = with_b.next_contingency();
                if !(more_a && more_b) {
                    break;
                }
            }
        }
        comparison.verdict()
    }

    /// True if some other active action at the same infoset dominates `a`.
    pub fn is_dominated(&self, a: ActionId, strong: bool, conditional: bool) -> Result<bool> {
        let (player, infoset, a) = self.game().action_coordinates(a)?;
        if player == 0 {
            return Err(Error::invalid("dominance is undefined at chance infosets"));
        }
        Ok(self.is_dominated_at(player, infoset, a, strong, conditional))
    }

    pub(crate) fn is_dominated_at(
        &self,
        player: usize,
        infoset: usize,
        a: usize,
        strong: bool,
        conditional: bool,
    ) -> bool {
        self.active_positions(player, infoset)
            .into_iter()
            .any(|b| b != a && self.dominates_at(player, infoset, b, a, strong, conditional))
    }

    /// Iteratively removes dominated actions of the given players: at each
    /// infoset, actions dominated by an active sibling are removed until none
    /// remain. Polls `status` once per player.
    pub fn undominated(
        &self,
        strong: bool,
        conditional: bool,
        players: &[PlayerId],
        status: &dyn Status,
    ) -> Result<Support<'g, T>> {
        let game = self.game();
        let mut numbers = vec![];
        for &player in players.iter() {
            let number = game.player_number(player)?;
            if number == 0 {
                return Err(Error::invalid("chance has no dominated actions"));
            }
            numbers.push(number);
        }

        let mut reduced = self.clone();
        for (done, &player) in numbers.iter().enumerate() {
            status.get()?;
            status.set_progress(
                done as f64 / numbers.len() as f64,
                &format!("Eliminating actions of player {}", player),
            );
            for infoset in 0..reduced.num_infosets_of(player) {
                loop {
                    let dominated: Vec<usize> = reduced
                        .active_positions(player, infoset)
                        .into_iter()
                        .filter(|&a| reduced.is_dominated_at(player, infoset, a, strong, conditional))
                        .collect();
                    if dominated.is_empty() {
                        break;
                    }
                    debug!(
                        "Player {} infoset {}: removing dominated actions {:?}",
                        player, infoset, dominated
                    );
                    for a in dominated {
                        reduced.deactivate(player, infoset, a);
                    }
                }
            }
        }
        info!(
            "Dominance elimination kept {} of {} actions",
            reduced.total_num_actions(),
            self.total_num_actions()
        );
        Ok(reduced)
    }

    pub fn undominated_with(
        &self,
        options: DominanceOptions,
        players: &[PlayerId],
        status: &dyn Status,
    ) -> Result<Support<'g, T>> {
        self.undominated(options.strong, options.conditional, players, status)
    }
}

#[cfg(test)]
mod tests {
    use super::DominanceOptions;
    use crate::error::Error;
    use crate::game::test_fixtures::{init, ENTRY_GAME, MATCHING_PENNIES, PRISONERS_DILEMMA};
    use crate::game::Game;
    use crate::status::{NullStatus, PollLimit};
    use crate::support::Support;

    fn all_options() -> Vec<DominanceOptions> {
        vec![
            DominanceOptions::new(true, false),
            DominanceOptions::new(true, true),
            DominanceOptions::new(false, false),
            DominanceOptions::new(false, true),
        ]
    }

    #[test]
    fn prisoners_dilemma_defection_dominates() {
        init();
        let game = &*PRISONERS_DILEMMA;
        let support = Support::new(game);
        let row = game.infoset_by_number(1, 0).unwrap();
        let (up, down) = (game.action(row, 0).unwrap(), game.action(row, 1).unwrap());
        for options in all_options() {
            assert!(support.dominates_with(down, up, options).unwrap());
            assert!(!support.dominates_with(up, down, options).unwrap());
            assert!(!support.dominates_with(down, down, options).unwrap());
        }
        assert!(support.is_dominated(up, true, false).unwrap());
        assert!(!support.is_dominated(down, false, false).unwrap());
    }

    #[test]
    fn strong_implies_weak() {
        init();
        for &game in [&*PRISONERS_DILEMMA, &*MATCHING_PENNIES, &*ENTRY_GAME].iter() {
            let support = Support::new(game);
            for player in game.players() {
                for infoset in game.player_infosets(player).unwrap() {
                    let actions = game.actions(infoset).unwrap();
                    for &a in actions.iter() {
                        for &b in actions.iter() {
                            for &conditional in [false, true].iter() {
                                if support.dominates(a, b, true, conditional).unwrap() {
                                    assert!(support.dominates(a, b, false, conditional).unwrap());
                                }
                            }
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn conditional_dominance_ignores_unreached_play() {
        init();
        let game = &*ENTRY_GAME;
        let support = Support::new(game);
        let fight = game.infoset_by_number(2, 0).unwrap();
        let (fight_back, share) = (game.action(fight, 0).unwrap(), game.action(fight, 1).unwrap());

        // When the entrant stays out both actions pay the same.
        assert!(!support.dominates(share, fight_back, true, false).unwrap());
        assert!(support.dominates(share, fight_back, false, false).unwrap());
        assert!(support.dominates(share, fight_back, true, true).unwrap());

        let entry = game.infoset_by_number(1, 0).unwrap();
        let (enter, out) = (game.action(entry, 0).unwrap(), game.action(entry, 1).unwrap());
        for options in all_options() {
            assert!(!support.dominates_with(enter, out, options).unwrap());
            assert!(!support.dominates_with(out, enter, options).unwrap());
        }
    }

    #[test]
    fn unreached_infosets_fall_back_to_all_members() {
        init();
        let game = &*ENTRY_GAME;
        let mut support = Support::new(game);
        let entry = game.infoset_by_number(1, 0).unwrap();
        support.remove_action(game.action(entry, 0).unwrap()).unwrap();

        let fight = game.infoset_by_number(2, 0).unwrap();
        assert!(!support.infoset_is_active(fight).unwrap());
        let (fight_back, share) = (game.action(fight, 0).unwrap(), game.action(fight, 1).unwrap());
        // The unreached infoset is not vacuously undominated: its members are
        // compared as if they were reached.
        assert!(support.dominates(share, fight_back, true, true).unwrap());
        // Unconditionally the incumbent's choice never matters any more.
        assert!(!support.dominates(share, fight_back, false, false).unwrap());
    }

    #[test]
    fn actions_of_different_infosets_mismatch() {
        init();
        let game = &*PRISONERS_DILEMMA;
        let support = Support::new(game);
        let row = game.action(game.infoset_by_number(1, 0).unwrap(), 0).unwrap();
        let column = game.action(game.infoset_by_number(2, 0).unwrap(), 0).unwrap();
        match support.dominates(row, column, true, false) {
            Err(Error::Mismatch(_)) => (),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn iterated_elimination() {
        init();
        let game = &*PRISONERS_DILEMMA;
        let support = Support::new(game);
        let players = game.players();
        let reduced = support.undominated(true, false, &players, &NullStatus).unwrap();
        assert_eq!(reduced.total_num_actions(), 2);
        assert_eq!(format!("{}", reduced), "{ { { \"D\" } } { { \"R\" } } }");
        assert!(reduced.is_subset_of(&support));

        let pennies = Support::new(&*MATCHING_PENNIES);
        let kept = pennies
            .undominated(false, true, &MATCHING_PENNIES.players(), &NullStatus)
            .unwrap();
        assert_eq!(kept, pennies);

        match support.undominated(true, false, &players, &PollLimit::new(1)) {
            Err(Error::Cancelled) => (),
            other => panic!("unexpected {:?}", other),
        }
        match support.undominated(true, false, &[game.chance()], &NullStatus) {
            Err(Error::InvalidArgument(_)) => (),
            other => panic!("unexpected {:?}", other),
        }
        let other = Game::<f64>::new();
        match support.undominated(true, false, &[other.chance()], &NullStatus) {
            Err(Error::Mismatch(_)) => (),
            other => panic!("unexpected {:?}", other),
        }
    }
}
