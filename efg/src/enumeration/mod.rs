//! Backtracking enumeration of subsupports.
//!
//! Every search walks the active actions of its starting support in
//! canonical order with an `ActionCursor`, shrinking a single working support
//! and restoring it on the way back. Actions the cursor has passed are never
//! removed again further down, so each subsupport is visited at most once.

mod nash;
mod subsupports;
mod undominated;

pub use self::nash::possible_nash_subsupports;
pub use self::subsupports::{all_inequivalent_subsupports, all_subsupports};
pub use self::undominated::{all_undominated_subsupports, all_undominated_subsupports_with};

use crate::numeric::Number;
use crate::support::Support;

/// Result of a cancellable enumeration. When `cancelled` is set the search
/// was stopped by its status; `supports` holds what was found until then.
#[derive(Debug, Clone)]
pub struct Enumeration<'g, T: Number> {
    pub supports: Vec<Support<'g, T>>,
    pub cancelled: bool,
}

impl<'g, T: Number> Enumeration<'g, T> {
    pub fn len(&self) -> usize {
        self.supports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.supports.is_empty()
    }
}

/// Stable counting sort by number of degrees of freedom, smallest first.
pub(crate) fn sort_by_degrees_of_freedom<'g, T: Number>(
    supports: Vec<Support<'g, T>>,
) -> Vec<Support<'g, T>> {
    let degrees: Vec<usize> = supports.iter().map(|s| s.num_degrees_of_freedom()).collect();
    let max_degree = match degrees.iter().max() {
        Some(&max_degree) => max_degree,
        None => return supports,
    };
    let mut buckets: Vec<Vec<Support<'g, T>>> = (0..=max_degree).map(|_| vec![]).collect();
    for (support, degree) in supports.into_iter().zip(degrees.into_iter()) {
        buckets[degree].push(support);
    }
    buckets.into_iter().flatten().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::test_fixtures::{
        init, second_player_opens, ENTRY_GAME, MATCHING_PENNIES, PRISONERS_DILEMMA,
        SECOND_PLAYER_OPENS, TRIVIAL_GAME,
    };
    use crate::status::NullStatus;

    fn contains_all(larger: &[Support<f64>], smaller: &[Support<f64>]) -> bool {
        smaller.iter().all(|s| larger.contains(s))
    }

    fn no_duplicates(supports: &[Support<f64>]) -> bool {
        supports
            .iter()
            .enumerate()
            .all(|(i, s)| supports[i + 1..].iter().all(|t| t != s))
    }

    #[test]
    fn enumerations_are_nested() {
        init();
        for &game in [
            &*PRISONERS_DILEMMA,
            &*MATCHING_PENNIES,
            &*ENTRY_GAME,
            &*SECOND_PLAYER_OPENS,
        ]
        .iter()
        {
            let support = Support::new(game);
            let all = all_subsupports(&support);
            let inequivalent = all_inequivalent_subsupports(&support);
            assert!(no_duplicates(&all));
            assert!(no_duplicates(&inequivalent));
            for &strong in [false, true].iter() {
                for &conditional in [false, true].iter() {
                    let undominated =
                        all_undominated_subsupports(&support, strong, conditional, &NullStatus);
                    assert!(!undominated.cancelled);
                    assert!(no_duplicates(&undominated.supports));
                    assert!(contains_all(&inequivalent, &undominated.supports));
                }
            }
            assert!(contains_all(&all, &inequivalent));
            let nash = possible_nash_subsupports(&support, &NullStatus);
            assert!(no_duplicates(&nash.supports));
            assert!(contains_all(&inequivalent, &nash.supports));
        }
    }

    #[test]
    fn later_player_moving_first_loses_nothing() {
        init();
        // Nobody ever strictly prefers one action, so only reachability
        // separates the two searches.
        let game = second_player_opens(&[[0.0, 2.0], [0.0, 2.0], [0.0, 2.0]]);
        let support = Support::new(&game);
        let inequivalent = all_inequivalent_subsupports(&support);
        let undominated = all_undominated_subsupports(&support, true, false, &NullStatus);

        // Three opener sets, and three responder sets whenever a is kept,
        // except that b alone leaves the responder with nothing.
        assert_eq!(inequivalent.len(), 7);
        assert_eq!(undominated.supports, inequivalent);
        assert!(inequivalent
            .iter()
            .any(|s| format!("{}", s) == "{ { { } } { { \"b\" } } }"));
    }

    #[test]
    fn trivial_game_has_one_support() {
        let support = Support::new(&*TRIVIAL_GAME);
        assert_eq!(all_subsupports(&support), vec![support.clone()]);
        assert_eq!(all_inequivalent_subsupports(&support).len(), 1);
        assert_eq!(all_undominated_subsupports(&support, true, false, &NullStatus).len(), 1);
        assert_eq!(possible_nash_subsupports(&support, &NullStatus).len(), 1);
    }

    #[test]
    fn sorting_is_stable() {
        let game = &*ENTRY_GAME;
        let supports = all_subsupports(&Support::new(game));
        let sorted = sort_by_degrees_of_freedom(supports.clone());
        assert_eq!(sorted.len(), supports.len());
        for pair in sorted.windows(2) {
            assert!(pair[0].num_degrees_of_freedom() <= pair[1].num_degrees_of_freedom());
        }
        let ones: Vec<&Support<f64>> = supports
            .iter()
            .filter(|s| s.num_degrees_of_freedom() == 1)
            .collect();
        let sorted_ones: Vec<&Support<f64>> = sorted
            .iter()
            .filter(|s| s.num_degrees_of_freedom() == 1)
            .collect();
        assert_eq!(ones, sorted_ones);
    }
}
