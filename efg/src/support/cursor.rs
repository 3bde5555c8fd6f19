use crate::game::{ActionId, Game};
use crate::numeric::Number;
use crate::support::Support;

/// Position in the canonical order of personal actions: by player, then
/// infoset number, then action position.
///
/// The backtracking enumerations walk the active actions of their starting
/// support in this order. Only actions at or after the cursor may be removed
/// further down a branch; everything before it has been committed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ActionCursor {
    player: usize,
    infoset: usize,
    action: usize,
}

impl ActionCursor {
    /// The first active personal action of `support`, if there is one.
    pub fn first<T: Number>(support: &Support<T>) -> Option<ActionCursor> {
        ActionCursor::at_or_after(support, 1, 0, 0)
    }

    /// The next active action of `support` after this one.
    pub fn next<T: Number>(&self, support: &Support<T>) -> Option<ActionCursor> {
        ActionCursor::at_or_after(support, self.player, self.infoset, self.action + 1)
    }

    fn at_or_after<T: Number>(
        support: &Support<T>,
        player: usize,
        infoset: usize,
        action: usize,
    ) -> Option<ActionCursor> {
        let num_players = support.game().num_players();
        let (mut player, mut infoset, mut action) = (player, infoset, action);
        while player <= num_players {
            while infoset < support.num_infosets_of(player) {
                while action < support.num_actions_at(player, infoset) {
                    if support.is_active(player, infoset, action) {
                        return Some(ActionCursor {
                            player,
                            infoset,
                            action,
                        });
                    }
                    action += 1;
                }
                infoset += 1;
                action = 0;
            }
            player += 1;
            infoset = 0;
        }
        None
    }

    pub fn player(&self) -> usize {
        self.player
    }

    pub fn infoset(&self) -> usize {
        self.infoset
    }

    pub fn action(&self) -> usize {
        self.action
    }

    /// Handle of the action under the cursor.
    pub fn action_id<T: Number>(&self, game: &Game<T>) -> ActionId {
        game.action_handle(game.infoset_at(self.player, self.infoset), self.action)
    }

    /// True if the action at the given coordinates lies at or after the
    /// cursor.
    pub fn is_subsequent_to(&self, player: usize, infoset: usize, action: usize) -> bool {
        (player, infoset, action) >= (self.player, self.infoset, self.action)
    }

    /// True if removing actions made an infoset unreachable whose choice was
    /// already committed to: an infoset before the cursor which still holds
    /// active actions, or the cursor's own infoset while an action before
    /// the cursor is still active there.
    pub fn deletions_violate_active_commitments<T: Number>(
        &self,
        support: &Support<T>,
        deactivated: &[(usize, usize)],
    ) -> bool {
        deactivated.iter().any(|&(player, infoset)| {
            let here = (player, infoset);
            let cursor = (self.player, self.infoset);
            if here < cursor && support.active_count(player, infoset) > 0 {
                return true;
            }
            here == cursor && (0..self.action).any(|a| support.is_active(player, infoset, a))
        })
    }

    /// True if some member of the infoset is reached by a path made only of
    /// chance actions and active actions before the cursor, so that no
    /// later removal can make the infoset unreachable.
    pub fn infoset_guaranteed_active_by_prior_commitments<T: Number>(
        &self,
        support: &Support<T>,
        player: usize,
        infoset: usize,
    ) -> bool {
        let game = support.game();
        let key = game.infoset_at(player, infoset);
        game.infosets[key].members.iter().any(|&member| {
            let mut current = member;
            while let Some((above, position)) = game.prior_action_position(current) {
                let data = &game.infosets[above];
                let committed = data.is_chance()
                    || (support.is_active(data.player, data.number, position)
                        && !self.is_subsequent_to(data.player, data.number, position));
                if !committed {
                    return false;
                }
                current = match game.nodes[current].parent {
                    Some(parent) => parent,
                    None => break,
                };
            }
            true
        })
    }
}

#[cfg(test)]
mod tests {
    use super::ActionCursor;
    use crate::game::test_fixtures::ENTRY_GAME;
    use crate::support::Support;

    #[test]
    fn walks_active_actions_in_canonical_order() {
        let game = &*ENTRY_GAME;
        let mut support = Support::new(game);
        let mut visited = vec![];
        let mut cursor = ActionCursor::first(&support);
        while let Some(c) = cursor {
            visited.push((c.player(), c.infoset(), c.action()));
            cursor = c.next(&support);
        }
        assert_eq!(visited, vec![(1, 0, 0), (1, 0, 1), (2, 0, 0), (2, 0, 1)]);

        let fight = game.action(game.infoset_by_number(2, 0).unwrap(), 0).unwrap();
        support.remove_action(fight).unwrap();
        let last = ActionCursor::first(&support)
            .and_then(|c| c.next(&support))
            .and_then(|c| c.next(&support))
            .unwrap();
        assert_eq!((last.player(), last.infoset(), last.action()), (2, 0, 1));
        assert!(last.next(&support).is_none());
        assert!(last.is_subsequent_to(2, 0, 1));
        assert!(!last.is_subsequent_to(2, 0, 0));
        assert!(!last.is_subsequent_to(1, 0, 1));
    }

    #[test]
    fn commitments() {
        let game = &*ENTRY_GAME;
        let mut support = Support::new(game);
        let first = ActionCursor::first(&support).unwrap();
        let second = first.next(&support).unwrap();
        let third = second.next(&support).unwrap();

        // Nothing is committed at the start, so the incumbent is not
        // guaranteed to move.
        assert!(!first.infoset_guaranteed_active_by_prior_commitments(&support, 2, 0));
        assert!(first.infoset_guaranteed_active_by_prior_commitments(&support, 1, 0));
        // Past the entrant's infoset, entering is committed.
        assert!(third.infoset_guaranteed_active_by_prior_commitments(&support, 2, 0));

        let enter = game.action(game.infoset_by_number(1, 0).unwrap(), 0).unwrap();
        support.remove_action(enter).unwrap();
        let deactivated = vec![(2, 0)];
        assert!(!first.deletions_violate_active_commitments(&support, &deactivated));
        // The incumbent's infoset lies before a cursor positioned after it.
        let beyond = ActionCursor::first(&Support::new(game))
            .and_then(|c| c.next(&support))
            .unwrap();
        assert_eq!(beyond.player(), 1);
        assert!(!beyond.deletions_violate_active_commitments(&support, &deactivated));
        let at_incumbent = third.next(&Support::new(game)).unwrap();
        assert_eq!((at_incumbent.player(), at_incumbent.action()), (2, 1));
        assert!(at_incumbent.deletions_violate_active_commitments(&support, &deactivated));
    }
}
