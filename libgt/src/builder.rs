use crate::game_tree::{ChanceOrPlayer, GameTreeVertex, Leaf, VertexOrLeaf};

use assert_approx_eq::assert_approx_eq;
use efg_core::game::{Game, InfosetId, NodeId};
use efg_core::Result;
use itertools::sorted;
use log::debug;
use std::collections::BTreeMap;

/// Builder for an extensive form game. The primary purpose of this
/// class is to traverse a game tree, merge vertices sharing a `PlayerInfo`
/// into information sets and eventually construct a `Game`.
pub struct GameBuilder<T: GameTreeVertex> {
    num_players: usize,

    // Information sets seen so far, keyed by player number and `PlayerInfo`.
    infosets: BTreeMap<(usize, T::PlayerInfo), InfosetId>,
}

impl<T> GameBuilder<T>
where
    T: GameTreeVertex,
{
    pub fn new(num_players: usize) -> GameBuilder<T> {
        GameBuilder {
            num_players,
            infosets: BTreeMap::new(),
        }
    }

    /// Creates a `Game` by starting a traversal from a specified initial_vertex.
    /// This is the primary function in the `GameBuilder` class.
    /// Actions within a given infoset are ordered based on the order specified
    /// by `GameTreeVertex::Action`. Infosets, actions and players are labelled
    /// with the `Debug` output of the generator's types.
    pub fn make_game(&mut self, initial_vertex: &T) -> Result<Game<f64>> {
        self.infosets.clear();
        let mut game = Game::new();
        for player in 1..=self.num_players {
            game.new_player(&format!("Player {}", player));
        }

        // Walk over game tree, manually using a stack.
        let mut vertex_stack = vec![(game.root(), initial_vertex.clone())];
        while let Some((node, vertex)) = vertex_stack.pop() {
            vertex.validate();
            let actions_list = match vertex.next_player() {
                ChanceOrPlayer::Chance => Self::handle_chance(&mut game, node, &vertex)?,
                ChanceOrPlayer::Player(player) => {
                    self.handle_player(&mut game, player, node, &vertex)?
                }
            };

            let children = game.children(node)?;
            for (child, action) in children.into_iter().zip(actions_list.iter()) {
                match vertex.next_state(action) {
                    VertexOrLeaf::Vertex(next) => vertex_stack.push((child, next)),
                    VertexOrLeaf::Leaf(leaf) => Self::handle_leaf(&mut game, child, &leaf)?,
                }
            }
        }

        debug!(
            "Built game with {} nodes and {} infosets",
            game.num_nodes(),
            game.total_num_infosets()
        );
        Ok(game)
    }

    /// Expands a chance node into a fresh chance infoset. Returns the actions
    /// in the order of the node's children.
    fn handle_chance(game: &mut Game<f64>, node: NodeId, vertex: &T) -> Result<Vec<T::Action>> {
        let actions_and_probs = vertex.available_actions();
        let total_prob: f64 = actions_and_probs
            .iter()
            .map(|p: &(T::Action, f64)| p.1)
            .sum();
        assert_approx_eq!(total_prob, 1.0);

        let infoset = game.new_infoset(game.chance(), actions_and_probs.len())?;
        for (position, (action, prob)) in actions_and_probs.iter().enumerate() {
            assert!(*prob >= 0f64);
            let handle = game.action(infoset, position)?;
            game.set_chance_prob(handle, *prob)?;
            game.set_action_label(handle, &format!("{:?}", action))?;
        }
        game.append_move(node, infoset)?;
        Ok(actions_and_probs.iter().map(|p| p.0.clone()).collect())
    }

    /// Expands a player node. If the information set is seen for the first
    /// time it is created, otherwise the node joins it.
    fn handle_player(
        &mut self,
        game: &mut Game<f64>,
        player: usize,
        node: NodeId,
        vertex: &T,
    ) -> Result<Vec<T::Action>> {
        let cur_infoset = vertex.player_information();
        let actions_list: Vec<T::Action> = sorted(
            vertex
                .available_actions()
                .iter()
                .map(|p: &(T::Action, f64)| p.0.clone()),
        )
        .collect();

        let key = (player, cur_infoset.clone());
        let infoset = match self.infosets.get(&key) {
            Some(&infoset) => {
                assert_eq!(
                    game.num_actions(infoset)?,
                    actions_list.len(),
                    "vertices of {:?} disagree on the number of actions",
                    cur_infoset
                );
                infoset
            }
            None => {
                let infoset = game.new_infoset(game.player(player)?, actions_list.len())?;
                game.set_infoset_label(infoset, &format!("{:?}", cur_infoset))?;
                for (position, action) in actions_list.iter().enumerate() {
                    let handle = game.action(infoset, position)?;
                    game.set_action_label(handle, &format!("{:?}", action))?;
                }
                self.infosets.insert(key, infoset);
                infoset
            }
        };
        game.append_move(node, infoset)?;
        Ok(actions_list)
    }

    fn handle_leaf(game: &mut Game<f64>, node: NodeId, leaf: &Leaf) -> Result<()> {
        let outcome = game.new_outcome();
        game.set_payoffs(outcome, &leaf.payoffs)?;
        game.set_outcome(node, Some(outcome))
    }
}

#[cfg(test)]
mod tests {
    use super::GameBuilder;
    use crate::game_tree::{ChanceOrPlayer, GameTreeVertex, Leaf, VertexOrLeaf};
    use assert_approx_eq::assert_approx_eq;
    use efg_core::strategy::PureBehavProfile;

    /// Chance deals a high or low card which only player 1 sees. Player 1
    /// raises or folds; after a raise player 2 calls or folds.
    #[derive(Debug, Clone)]
    enum Poker {
        Deal,
        Bet { high: bool },
        Respond { high: bool },
    }

    #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
    enum Card {
        High,
        Low,
    }

    #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
    enum Move {
        Deal(Card),
        Raise,
        Fold,
        Call,
    }

    impl GameTreeVertex for Poker {
        type PlayerInfo = Option<bool>;
        type Action = Move;

        fn next_player(&self) -> ChanceOrPlayer {
            match self {
                Poker::Deal => ChanceOrPlayer::Chance,
                Poker::Bet { .. } => ChanceOrPlayer::Player(1),
                Poker::Respond { .. } => ChanceOrPlayer::Player(2),
            }
        }

        fn player_information(&self) -> Option<bool> {
            match self {
                Poker::Bet { high } => Some(*high),
                _ => None,
            }
        }

        fn available_actions(&self) -> Box<[(Move, f64)]> {
            match self {
                Poker::Deal => vec![(Move::Deal(Card::High), 0.5), (Move::Deal(Card::Low), 0.5)],
                Poker::Bet { .. } => vec![(Move::Fold, 0.0), (Move::Raise, 0.0)],
                Poker::Respond { .. } => vec![(Move::Fold, 0.0), (Move::Call, 0.0)],
            }
            .into_boxed_slice()
        }

        fn next_state(&self, action: &Move) -> VertexOrLeaf<Poker> {
            match (self, action) {
                (Poker::Deal, Move::Deal(card)) => VertexOrLeaf::Vertex(Poker::Bet {
                    high: *card == Card::High,
                }),
                (Poker::Bet { .. }, Move::Fold) => VertexOrLeaf::Leaf(Leaf::zero_sum(-1.0)),
                (Poker::Bet { high }, _) => VertexOrLeaf::Vertex(Poker::Respond { high: *high }),
                (Poker::Respond { .. }, Move::Fold) => VertexOrLeaf::Leaf(Leaf::zero_sum(1.0)),
                (Poker::Respond { high }, _) => match high {
                    true => VertexOrLeaf::Leaf(Leaf::zero_sum(2.0)),
                    false => VertexOrLeaf::Leaf(Leaf::zero_sum(-2.0)),
                },
                _ => panic!("illegal move {:?} at {:?}", action, self),
            }
        }
    }

    #[test]
    fn builds_infosets_from_player_information() {
        let _ = env_logger::builder().is_test(true).try_init();
        let game = GameBuilder::new(2).make_game(&Poker::Deal).unwrap();
        let first = game.player(1).unwrap();
        let second = game.player(2).unwrap();

        // Deal, two bets, two responses and six leaves.
        assert_eq!(game.num_nodes(), 11);
        assert_eq!(game.num_infosets(first).unwrap(), 2);
        assert_eq!(game.num_infosets(second).unwrap(), 1);
        let respond = game.infoset_by_number(2, 0).unwrap();
        assert_eq!(game.num_members(respond).unwrap(), 2);
        assert!(game.is_perfect_recall());
        assert!(game.is_const_sum());

        let deal = game.infoset(game.root()).unwrap().unwrap();
        for action in game.actions(deal).unwrap() {
            assert_approx_eq!(game.chance_prob(action).unwrap(), 0.5);
        }

        // Actions are sorted, so Raise comes before Fold and Fold before Call.
        let bet = game.infoset_by_number(1, 0).unwrap();
        let raise = game.actions(bet).unwrap()[0];
        assert_eq!(game.action_label(raise).unwrap(), "Raise");
        assert_eq!(game.action_label(game.actions(respond).unwrap()[1]).unwrap(), "Call");
    }

    #[test]
    fn payoffs_follow_the_leaves() {
        let game = GameBuilder::new(2).make_game(&Poker::Deal).unwrap();
        let first = game.player(1).unwrap();
        let mut profile = PureBehavProfile::new(&game);

        // Always raise, always fold: player 1 wins the ante.
        profile.set_by_number(2, 0, 0).unwrap();
        assert_approx_eq!(profile.payoff(first).unwrap(), 1.0);

        // Always raise, always call: the cards decide.
        profile.set_by_number(2, 0, 1).unwrap();
        assert_approx_eq!(profile.payoff(first).unwrap(), 0.0);

        // Fold with either card.
        profile.set_by_number(1, 0, 1).unwrap();
        profile.set_by_number(1, 1, 1).unwrap();
        assert_approx_eq!(profile.payoff(first).unwrap(), -1.0);
    }
}
