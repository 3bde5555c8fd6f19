/// Sample games described as implicit game trees.
use libgt::{ChanceOrPlayer, GameTreeVertex, Leaf, VertexOrLeaf};

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

// ----------------------------------------------------------------------
// Rock paper scissors.
// ----------------------------------------------------------------------

#[derive(Debug, Clone, Ord, PartialOrd, Eq, PartialEq)]
pub struct Rps {
    action_pl1: Option<Hand>,
}

#[derive(Debug, Clone, Ord, PartialOrd, Eq, PartialEq)]
pub enum Hand {
    Rock,
    Paper,
    Scissors,
}

impl Rps {
    pub fn initial_state() -> Rps {
        Rps { action_pl1: None }
    }
}

impl GameTreeVertex for Rps {
    type Action = Hand;

    // There is only one information set per player.
    type PlayerInfo = ();

    fn next_player(&self) -> ChanceOrPlayer {
        match self.action_pl1 {
            None => ChanceOrPlayer::Player(1),
            Some(_) => ChanceOrPlayer::Player(2),
        }
    }

    fn player_information(&self) -> Self::PlayerInfo {}

    fn available_actions(&self) -> Box<[(Self::Action, f64)]> {
        vec![
            (Hand::Rock, 1.0f64),
            (Hand::Scissors, 1.0f64),
            (Hand::Paper, 1.0f64),
        ]
        .into_boxed_slice()
    }

    fn next_state(&self, action: &Self::Action) -> VertexOrLeaf<Self> {
        let first = match &self.action_pl1 {
            None => {
                return VertexOrLeaf::Vertex(Rps {
                    action_pl1: Some(action.clone()),
                })
            }
            Some(first) => first,
        };
        let payoff_pl1 = match first {
            Hand::Rock => match action {
                Hand::Scissors => 1.0,
                Hand::Rock => 0.0,
                Hand::Paper => -1.0,
            },
            Hand::Paper => match action {
                Hand::Scissors => -1.0,
                Hand::Rock => 1.0,
                Hand::Paper => 0.0,
            },
            Hand::Scissors => match action {
                Hand::Scissors => 0.0,
                Hand::Rock => -1.0,
                Hand::Paper => 1.0,
            },
        };
        VertexOrLeaf::Leaf(Leaf::zero_sum(payoff_pl1))
    }
}

// ----------------------------------------------------------------------
// Synthetic two stage game: a random bimatrix game, then chance picks one
// of several random bimatrix subgames, with the first stage's actions
// shifting the transition probabilities.
// ----------------------------------------------------------------------

#[derive(Debug, Clone, PartialOrd, PartialEq)]
pub struct Config {
    pub num_subgames: usize,
    pub main_game_size: usize,
    pub subgame_size: usize,
    pub influence_of_main_action: f64,
}

#[derive(Debug, Clone, PartialOrd, PartialEq)]
pub struct Synth {
    config: Config,

    // payoffs[player][row][column]
    main_game_payoffs: Vec<Vec<Vec<f64>>>,

    // subgame_payoffs[subgame][player][row][column]
    subgame_payoffs: Vec<Vec<Vec<Vec<f64>>>>,

    // transition[leader action][subgame id] contains the probability
    // transition[{.}] sums to 1.
    transition: Vec<Vec<f64>>,
}

fn random_bimatrix(rng: &mut ChaCha8Rng, size: usize) -> Vec<Vec<Vec<f64>>> {
    (0..2)
        .map(|_| {
            (0..size)
                .map(|_| (0..size).map(|_| rng.gen_range(0.0, 1.0)).collect())
                .collect()
        })
        .collect()
}

impl Synth {
    pub fn new(config: &Config, random_seed: u64) -> Synth {
        let mut rng = ChaCha8Rng::seed_from_u64(random_seed);
        let main_game_payoffs = random_bimatrix(&mut rng, config.main_game_size);
        let subgame_payoffs = (0..config.num_subgames)
            .map(|_| random_bimatrix(&mut rng, config.subgame_size))
            .collect();

        let mut transition = vec![];
        for _leader_action in 0..config.main_game_size {
            let weights: Vec<f64> = (0..config.num_subgames).map(|_| rng.gen()).collect();
            let accum: f64 = weights.iter().sum();
            transition.push(
                weights
                    .iter()
                    .map(|w| {
                        w / accum * config.influence_of_main_action
                            + 1f64 / config.num_subgames as f64
                                * (1f64 - config.influence_of_main_action)
                    })
                    .collect(),
            );
        }

        Synth {
            config: config.clone(),
            main_game_payoffs,
            subgame_payoffs,
            transition,
        }
    }
}

#[derive(Debug, Clone, PartialOrd, PartialEq)]
pub struct SynthState<'a> {
    synth: &'a Synth,

    p1_m1: usize,
    p2_m1: usize,
    p1_m2: usize,

    subgame_index: Option<usize>,
    player_to_move: ChanceOrPlayer,
}

#[derive(Debug, Clone, Ord, PartialOrd, Eq, PartialEq)]
pub enum SynthAction {
    NextSubgame(usize),
    ActionIndex(usize),
}

/// Each player remembers their own first stage action and observes the
/// subgame, but never the other player's actions.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct SynthInfo {
    own_m1: Option<usize>,
    subgame: Option<usize>,
}

impl<'a> SynthState<'a> {
    pub fn initial_state(synth: &'a Synth) -> SynthState<'a> {
        SynthState {
            synth,
            p1_m1: 0,
            p2_m1: 0,
            p1_m2: 0,
            subgame_index: None,
            player_to_move: ChanceOrPlayer::Player(1),
        }
    }

    fn payoffs(&self, subgame: usize, p2_m2: usize) -> Vec<f64> {
        (0..2)
            .map(|player| {
                self.synth.main_game_payoffs[player][self.p1_m1][self.p2_m1]
                    + self.synth.subgame_payoffs[subgame][player][self.p1_m2][p2_m2]
            })
            .collect()
    }

    fn moved(&self, player_to_move: ChanceOrPlayer) -> SynthState<'a> {
        SynthState {
            player_to_move,
            ..self.clone()
        }
    }
}

impl<'a> GameTreeVertex for SynthState<'a> {
    type Action = SynthAction;
    type PlayerInfo = SynthInfo;

    fn next_player(&self) -> ChanceOrPlayer {
        self.player_to_move.clone()
    }

    fn player_information(&self) -> Self::PlayerInfo {
        let own_m1 = match (self.subgame_index, &self.player_to_move) {
            (None, _) => None,
            (Some(_), ChanceOrPlayer::Player(1)) => Some(self.p1_m1),
            (Some(_), _) => Some(self.p2_m1),
        };
        SynthInfo {
            own_m1,
            subgame: self.subgame_index,
        }
    }

    fn available_actions(&self) -> Box<[(Self::Action, f64)]> {
        let r: Vec<(Self::Action, f64)> = match self.player_to_move {
            ChanceOrPlayer::Chance => {
                let z = &self.synth.transition[self.p1_m1];
                (0..self.synth.config.num_subgames)
                    .map(|x| (SynthAction::NextSubgame(x), z[x]))
                    .collect()
            }
            ChanceOrPlayer::Player(_) => {
                let n = match self.subgame_index {
                    None => self.synth.config.main_game_size,
                    Some(_) => self.synth.config.subgame_size,
                };
                (0..n).map(|x| (SynthAction::ActionIndex(x), 0f64)).collect()
            }
        };
        r.into_boxed_slice()
    }

    fn validate(&self) {
        if let Some(subgame) = self.subgame_index {
            assert!(subgame < self.synth.config.num_subgames);
        }
    }

    fn next_state(&self, action: &Self::Action) -> VertexOrLeaf<Self> {
        match (self.subgame_index, &self.player_to_move, action) {
            (None, ChanceOrPlayer::Player(1), SynthAction::ActionIndex(a)) => {
                VertexOrLeaf::Vertex(SynthState {
                    p1_m1: *a,
                    ..self.moved(ChanceOrPlayer::Player(2))
                })
            }
            (None, ChanceOrPlayer::Player(_), SynthAction::ActionIndex(a)) => {
                VertexOrLeaf::Vertex(SynthState {
                    p2_m1: *a,
                    ..self.moved(ChanceOrPlayer::Chance)
                })
            }
            (None, ChanceOrPlayer::Chance, SynthAction::NextSubgame(s)) => {
                VertexOrLeaf::Vertex(SynthState {
                    subgame_index: Some(*s),
                    ..self.moved(ChanceOrPlayer::Player(1))
                })
            }
            (Some(_), ChanceOrPlayer::Player(1), SynthAction::ActionIndex(a)) => {
                VertexOrLeaf::Vertex(SynthState {
                    p1_m2: *a,
                    ..self.moved(ChanceOrPlayer::Player(2))
                })
            }
            (Some(subgame), ChanceOrPlayer::Player(_), SynthAction::ActionIndex(a)) => {
                VertexOrLeaf::Leaf(Leaf::new(&self.payoffs(subgame, *a)))
            }
            _ => panic!("Unexpected action {:?} at {:?}", action, self),
        }
    }
}

// ----------------------------------------------------------------------
// A small sequential game: an entrant stays out or enters, and an
// incumbent who sees the entry fights or accommodates.
// ----------------------------------------------------------------------

#[derive(Debug, Clone, Ord, PartialOrd, Eq, PartialEq)]
pub enum Entry {
    Start,
    Entered,
}

#[derive(Debug, Clone, Ord, PartialOrd, Eq, PartialEq)]
pub enum EntryAction {
    In,
    Out,
    Fight,
    Accommodate,
}

impl GameTreeVertex for Entry {
    type Action = EntryAction;
    type PlayerInfo = Entry;

    fn next_player(&self) -> ChanceOrPlayer {
        match self {
            Entry::Start => ChanceOrPlayer::Player(1),
            Entry::Entered => ChanceOrPlayer::Player(2),
        }
    }

    fn player_information(&self) -> Self::PlayerInfo {
        self.clone()
    }

    fn available_actions(&self) -> Box<[(Self::Action, f64)]> {
        match self {
            Entry::Start => vec![(EntryAction::In, 0.0), (EntryAction::Out, 0.0)],
            Entry::Entered => vec![(EntryAction::Fight, 0.0), (EntryAction::Accommodate, 0.0)],
        }
        .into_boxed_slice()
    }

    fn next_state(&self, action: &Self::Action) -> VertexOrLeaf<Self> {
        match action {
            EntryAction::In => VertexOrLeaf::Vertex(Entry::Entered),
            EntryAction::Out => VertexOrLeaf::Leaf(Leaf::new(&[0.0, 2.0])),
            EntryAction::Fight => VertexOrLeaf::Leaf(Leaf::new(&[-1.0, -1.0])),
            EntryAction::Accommodate => VertexOrLeaf::Leaf(Leaf::new(&[1.0, 1.0])),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use libgt::GameBuilder;

    #[test]
    fn rps_has_one_infoset_per_player() {
        let game = GameBuilder::new(2).make_game(&Rps::initial_state()).unwrap();
        assert_eq!(game.num_nodes(), 13);
        assert_eq!(game.total_num_infosets(), 2);
        assert!(game.is_const_sum());
    }

    #[test]
    fn synthetic_games_are_reproducible() {
        let config = Config {
            num_subgames: 2,
            main_game_size: 2,
            subgame_size: 2,
            influence_of_main_action: 0.5,
        };
        let synth = Synth::new(&config, 7);
        assert_eq!(synth, Synth::new(&config, 7));
        for row in synth.transition.iter() {
            let total: f64 = row.iter().sum();
            assert!((total - 1.0).abs() < 1e-9);
        }

        let game = GameBuilder::new(2)
            .make_game(&SynthState::initial_state(&synth))
            .unwrap();
        // One first stage infoset each, then one per own first action and
        // subgame.
        assert_eq!(game.total_num_infosets(), 2 * (1 + 2 * 2));
        assert!(game.is_perfect_recall());
    }

    #[test]
    fn entry_game_shape() {
        let game = GameBuilder::new(2).make_game(&Entry::Start).unwrap();
        assert_eq!(game.num_nodes(), 5);
        assert_eq!(game.terminal_nodes().len(), 3);
    }
}
