use crate::enumeration::{sort_by_degrees_of_freedom, Enumeration};
use crate::error::Result;
use crate::numeric::Number;
use crate::status::Status;
use crate::support::{ActionCursor, Support};

use log::{debug, warn};

/// Subsupports of `support` that may carry a Nash equilibrium, sorted by
/// degrees of freedom, smallest first.
///
/// The search discards supports in which an active action is weakly
/// dominated, conditionally or not. A candidate is also dropped when some
/// action excluded from it would weakly dominate one of its actions once
/// reactivated. When cancelled, the candidates found so far go through the
/// same check and are returned sorted.
pub fn possible_nash_subsupports<'g, T: Number>(
    support: &Support<'g, T>,
    status: &dyn Status,
) -> Enumeration<'g, T> {
    let mut search = NashSearch {
        base: support,
        status,
        candidates: vec![],
    };
    let mut working = support.clone();
    let mut cancelled = match search.recurse(&mut working, ActionCursor::first(support)) {
        Ok(()) => false,
        Err(e) => {
            warn!(
                "Possible Nash search stopped with {} candidates: {}",
                search.candidates.len(),
                e
            );
            true
        }
    };
    let candidates = search.candidates;
    debug!("Found {} candidate supports", candidates.len());

    // Candidates are filtered even after cancellation so that partial
    // results hold only supports a complete run would also return.
    let total = candidates.len();
    let mut kept = vec![];
    for (done, candidate) in candidates.into_iter().enumerate() {
        if !cancelled {
            match status.get() {
                Ok(()) => status.set_progress(done as f64 / total as f64, "Filtering candidate supports"),
                Err(e) => {
                    warn!("Possible Nash filtering stopped polling: {}", e);
                    cancelled = true;
                }
            }
        }
        if !has_weakly_dominated_action(&candidate) {
            kept.push(candidate);
        }
    }
    debug!("Kept {} possible Nash subsupports", kept.len());
    Enumeration {
        supports: sort_by_degrees_of_freedom(kept),
        cancelled,
    }
}

fn weakly_dominated_at<T: Number>(
    support: &Support<T>,
    player: usize,
    infoset: usize,
    action: usize,
) -> bool {
    support.is_dominated_at(player, infoset, action, false, true)
        || support.is_dominated_at(player, infoset, action, false, false)
}

/// True if an active action is weakly dominated by an active sibling, or
/// conditionally weakly dominated by an inactive sibling whose reactivation
/// keeps the support free of unreached actions.
fn has_weakly_dominated_action<T: Number>(support: &Support<T>) -> bool {
    let mut trial = support.clone();
    for player in 1..=support.game().num_players() {
        for infoset in 0..support.num_infosets_of(player) {
            for action in support.active_positions(player, infoset) {
                if weakly_dominated_at(support, player, infoset, action) {
                    return true;
                }
                for other in 0..support.num_actions_at(player, infoset) {
                    if support.is_active(player, infoset, other) {
                        continue;
                    }
                    trial.activate(player, infoset, other);
                    let dominated = trial.has_active_actions_at_active_infosets_and_no_others()
                        && trial.dominates_at(player, infoset, other, action, false, true);
                    trial.deactivate(player, infoset, other);
                    if dominated {
                        return true;
                    }
                }
            }
        }
    }
    false
}

struct NashSearch<'b, 'g, T: Number> {
    base: &'b Support<'g, T>,
    status: &'b dyn Status,
    candidates: Vec<Support<'g, T>>,
}

impl<'b, 'g, T: Number> NashSearch<'b, 'g, T> {
    fn recurse(&mut self, working: &mut Support<'g, T>, cursor: Option<ActionCursor>) -> Result<()> {
        self.status.get()?;

        let check_domination = working.has_active_actions_at_active_infosets();
        let mut add_support = true;
        let mut deletions = vec![];
        let mut scanner = ActionCursor::first(self.base);
        while let Some(s) = scanner {
            scanner = s.next(self.base);
            let (player, infoset, action) = (s.player(), s.infoset(), s.action());
            if !working.is_active(player, infoset, action) {
                continue;
            }

            let delete = if !working.is_infoset_active(player, infoset) {
                true
            } else if check_domination && weakly_dominated_at(working, player, infoset, action) {
                add_support = false;
                // Only an infoset that stays reached whatever happens later
                // can lose the action for good.
                match cursor {
                    Some(c) => c.infoset_guaranteed_active_by_prior_commitments(working, player, infoset),
                    None => false,
                }
            } else {
                false
            };

            if delete {
                let passed = match cursor {
                    Some(c) => !c.is_subsequent_to(player, infoset, action),
                    None => true,
                };
                if passed {
                    return Ok(());
                }
                deletions.push(s);
            }
        }

        if !deletions.is_empty() {
            let mut violated = false;
            let mut removed = vec![];
            for d in deletions.iter() {
                removed.push(*d);
                let deactivated = working.deactivate(d.player(), d.infoset(), d.action());
                if let Some(c) = cursor {
                    if c.deletions_violate_active_commitments(working, &deactivated) {
                        violated = true;
                        break;
                    }
                }
            }
            let result = match violated {
                true => Ok(()),
                false => self.recurse(working, cursor),
            };
            for d in removed.iter() {
                working.activate(d.player(), d.infoset(), d.action());
            }
            return result;
        }

        if add_support && working.has_active_actions_at_active_infosets_and_no_others() {
            self.candidates.push(working.clone());
        }

        let mut position = cursor;
        while let Some(c) = position {
            let (player, infoset, action) = (c.player(), c.infoset(), c.action());
            if working.is_active(player, infoset, action) {
                let deactivated = working.deactivate(player, infoset, action);
                let result = match c.deletions_violate_active_commitments(working, &deactivated) {
                    true => Ok(()),
                    false => self.recurse(working, Some(c)),
                };
                working.activate(player, infoset, action);
                result?;
            }
            position = c.next(self.base);
        }
        Ok(())
    }
}
