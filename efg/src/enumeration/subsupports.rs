use crate::numeric::Number;
use crate::support::{ActionCursor, Support};

use log::debug;

/// Every subsupport of `support` in which each reachable infoset keeps at
/// least one active action.
pub fn all_subsupports<'g, T: Number>(support: &Support<'g, T>) -> Vec<Support<'g, T>> {
    let mut found = vec![];
    let mut working = support.clone();
    collect_all(support, &mut working, ActionCursor::first(support), &mut found);
    debug!("Found {} subsupports", found.len());
    found
}

fn collect_all<'g, T: Number>(
    base: &Support<'g, T>,
    working: &mut Support<'g, T>,
    cursor: Option<ActionCursor>,
    found: &mut Vec<Support<'g, T>>,
) {
    if working.has_active_actions_at_active_infosets() {
        found.push(working.clone());
    }

    let mut position = cursor;
    while let Some(c) = position {
        if working.is_active(c.player(), c.infoset(), c.action()) {
            working.deactivate(c.player(), c.infoset(), c.action());
            collect_all(base, working, Some(c), found);
            working.activate(c.player(), c.infoset(), c.action());
        }
        position = c.next(base);
    }
}

/// One subsupport per class of equivalent subsupports: those whose active
/// actions all sit at reachable infosets, and whose reachable infosets all
/// keep an action.
pub fn all_inequivalent_subsupports<'g, T: Number>(
    support: &Support<'g, T>,
) -> Vec<Support<'g, T>> {
    let mut found = vec![];
    let mut working = support.clone();
    collect_inequivalent(support, &mut working, ActionCursor::first(support), &mut found);
    debug!("Found {} inequivalent subsupports", found.len());
    found
}

fn collect_inequivalent<'g, T: Number>(
    base: &Support<'g, T>,
    working: &mut Support<'g, T>,
    cursor: Option<ActionCursor>,
    found: &mut Vec<Support<'g, T>>,
) {
    if working.has_active_actions_at_active_infosets_and_no_others() {
        found.push(working.clone());
    }

    let mut position = cursor;
    while let Some(c) = position {
        if working.is_active(c.player(), c.infoset(), c.action()) {
            let deactivated = working.deactivate(c.player(), c.infoset(), c.action());
            if !c.deletions_violate_active_commitments(working, &deactivated) {
                collect_inequivalent(base, working, Some(c), found);
            }
            working.activate(c.player(), c.infoset(), c.action());
        }
        position = c.next(base);
    }
}
