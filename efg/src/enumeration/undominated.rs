use crate::dominance::DominanceOptions;
use crate::enumeration::Enumeration;
use crate::error::{Error, Result};
use crate::numeric::Number;
use crate::status::Status;
use crate::support::{ActionCursor, Support};

use log::{debug, warn};

/// Subsupports of `support` in which no action is dominated and no
/// unreachable infoset keeps an action.
///
/// Each step first deletes every action that is dominated or sits at an
/// unreachable infoset, all at once. Only when nothing is left to delete is
/// the support recorded and the search branches on single removals.
pub fn all_undominated_subsupports<'g, T: Number>(
    support: &Support<'g, T>,
    strong: bool,
    conditional: bool,
    status: &dyn Status,
) -> Enumeration<'g, T> {
    let mut search = UndominatedSearch {
        base: support,
        strong,
        conditional,
        status,
        found: vec![],
    };
    let mut working = support.clone();
    let cancelled = match search.recurse(&mut working, ActionCursor::first(support)) {
        Ok(()) => false,
        Err(Error::Cancelled) => {
            warn!(
                "Undominated subsupport search cancelled after {} supports",
                search.found.len()
            );
            true
        }
        Err(e) => {
            debug_assert!(false, "undominated subsupport search raised {}", e);
            warn!("Undominated subsupport search stopped: {}", e);
            true
        }
    };
    debug!("Found {} undominated subsupports", search.found.len());
    Enumeration {
        supports: search.found,
        cancelled,
    }
}

pub fn all_undominated_subsupports_with<'g, T: Number>(
    support: &Support<'g, T>,
    options: DominanceOptions,
    status: &dyn Status,
) -> Enumeration<'g, T> {
    all_undominated_subsupports(support, options.strong, options.conditional, status)
}

struct UndominatedSearch<'b, 'g, T: Number> {
    base: &'b Support<'g, T>,
    strong: bool,
    conditional: bool,
    status: &'b dyn Status,
    found: Vec<Support<'g, T>>,
}

impl<'b, 'g, T: Number> UndominatedSearch<'b, 'g, T> {
    fn recurse(&mut self, working: &mut Support<'g, T>, cursor: Option<ActionCursor>) -> Result<()> {
        self.status.get()?;

        let check_domination = working.has_active_actions_at_active_infosets();
        let mut deletions = vec![];
        let mut scanner = ActionCursor::first(self.base);
        while let Some(s) = scanner {
            let (player, infoset, action) = (s.player(), s.infoset(), s.action());
            let delete = working.is_active(player, infoset, action)
                && (!working.is_infoset_active(player, infoset)
                    || (check_domination
                        && working.is_dominated_at(
                            player,
                            infoset,
                            action,
                            self.strong,
                            self.conditional,
                        )));
            if delete {
                // A deletion the cursor has passed was explored earlier.
                let passed = match cursor {
                    Some(c) => !c.is_subsequent_to(player, infoset, action),
                    None => true,
                };
                if passed {
                    return Ok(());
                }
                deletions.push(s);
            }
            scanner = s.next(self.base);
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

        if working.has_active_actions_at_active_infosets_and_no_others() {
            self.found.push(working.clone());
        }

        let mut position = cursor;
        while let Some(c) = position {
            let (player, infoset, action) = (c.player(), c.infoset(), c.action());
            if working.is_active(player, infoset, action) {
                // Emptying an infoset is allowed: a later removal may cut it
                // off, and only then is the support recorded.
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
