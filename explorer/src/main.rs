// Command line front end: builds one of the sample games and enumerates
// supports of it.

extern crate env_logger;
extern crate structopt;

use efg_core::basis::Basis;
use efg_core::enumeration::{
    all_inequivalent_subsupports, all_subsupports, all_undominated_subsupports,
    possible_nash_subsupports, Enumeration,
};
use efg_core::game::Game;
use efg_core::support::Support;
use efg_core::{NullStatus, PollLimit, Status};
use libgt::GameBuilder;
use log::{error, info, warn};
use optimizers::SimplexSolver;
use structopt::StructOpt;

use std::str::FromStr;

mod games;
use games::{Entry, Rps, Synth, SynthState};

#[derive(Debug, Clone, Copy, PartialEq)]
enum GameKind {
    Rps,
    Synthetic,
    Sequential,
}

impl FromStr for GameKind {
    type Err = String;

    fn from_str(s: &str) -> Result<GameKind, String> {
        match s {
            "rps" => Ok(GameKind::Rps),
            "synthetic" => Ok(GameKind::Synthetic),
            "sequential" => Ok(GameKind::Sequential),
            _ => Err(format!("unknown game {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Mode {
    All,
    Inequivalent,
    Undominated,
    Nash,
    Eliminate,
    Consistency,
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Mode, String> {
        match s {
            "all" => Ok(Mode::All),
            "inequivalent" => Ok(Mode::Inequivalent),
            "undominated" => Ok(Mode::Undominated),
            "nash" => Ok(Mode::Nash),
            "eliminate" => Ok(Mode::Eliminate),
            "consistency" => Ok(Mode::Consistency),
            _ => Err(format!("unknown mode {}", s)),
        }
    }
}

#[derive(StructOpt, Debug)]
#[structopt(name = "explorer")]
struct Opt {
    /// One of rps, synthetic or sequential.
    #[structopt(short = "g", long = "game", default_value = "rps")]
    game: GameKind,

    /// One of all, inequivalent, undominated, nash, eliminate or consistency.
    #[structopt(short = "m", long = "mode", default_value = "nash")]
    mode: Mode,

    #[structopt(short = "r", long = "seed", default_value = "0")]
    random_seed: u64,

    /// Number of actions per stage of the synthetic game.
    #[structopt(short = "n", long = "size", default_value = "2")]
    size: usize,

    #[structopt(short = "s", long = "strong")]
    strong: bool,

    #[structopt(short = "c", long = "conditional")]
    conditional: bool,

    /// Players whose dominated actions are eliminated; all when empty.
    #[structopt(short = "P", long = "players")]
    players: Vec<usize>,

    /// Cancel searches after this many status polls.
    #[structopt(short = "p", long = "poll-limit")]
    poll_limit: Option<usize>,
}

fn build_game(opt: &Opt) -> efg_core::Result<Game<f64>> {
    match opt.game {
        GameKind::Rps => GameBuilder::new(2).make_game(&Rps::initial_state()),
        GameKind::Sequential => GameBuilder::new(2).make_game(&Entry::Start),
        GameKind::Synthetic => {
            let config = games::Config {
                num_subgames: 2,
                main_game_size: opt.size,
                subgame_size: opt.size,
                influence_of_main_action: 0.5,
            };
            let synth = Synth::new(&config, opt.random_seed);
            GameBuilder::new(2).make_game(&SynthState::initial_state(&synth))
        }
    }
}

fn print_supports(supports: &[Support<f64>]) {
    for support in supports.iter() {
        println!("{} ({} degrees of freedom)", support, support.num_degrees_of_freedom());
    }
    println!("{} supports", supports.len());
}

fn print_enumeration(found: &Enumeration<f64>) {
    print_supports(&found.supports);
    if found.cancelled {
        println!("Search cancelled; the list above is incomplete");
    }
}

fn run(opt: &Opt, game: &Game<f64>, status: &dyn Status) -> efg_core::Result<()> {
    let support = Support::new(game);
    match opt.mode {
        Mode::All => print_supports(&all_subsupports(&support)),
        Mode::Inequivalent => print_supports(&all_inequivalent_subsupports(&support)),
        Mode::Undominated => print_enumeration(&all_undominated_subsupports(
            &support,
            opt.strong,
            opt.conditional,
            status,
        )),
        Mode::Nash => print_enumeration(&possible_nash_subsupports(&support, status)),
        Mode::Eliminate => {
            let players = match opt.players.is_empty() {
                true => game.players(),
                false => opt
                    .players
                    .iter()
                    .map(|&number| game.player(number))
                    .collect::<efg_core::Result<Vec<_>>>()?,
            };
            let reduced = support.undominated(opt.strong, opt.conditional, &players, status)?;
            println!("{}", reduced);
        }
        Mode::Consistency => {
            let solver = SimplexSolver::default();
            let found = possible_nash_subsupports(&support, status);
            for candidate in found.supports.iter() {
                let consistent = Basis::new(candidate.clone()).is_consistent(&solver);
                println!("{} consistent: {}", candidate, consistent);
            }
            if found.cancelled {
                warn!("Search cancelled; not every support was checked");
            }
        }
    }
    Ok(())
}

fn main() {
    env_logger::init();

    let opt = Opt::from_args();

    let game = match build_game(&opt) {
        Ok(game) => game,
        Err(e) => {
            error!("Could not build game: {}", e);
            std::process::exit(1);
        }
    };
    info!(
        "Game has {} nodes, {} personal infosets",
        game.num_nodes(),
        game.total_num_infosets()
    );

    let status: Box<dyn Status> = match opt.poll_limit {
        Some(limit) => Box::new(PollLimit::new(limit)),
        None => Box::new(NullStatus),
    };

    if let Err(e) = run(&opt, &game, status.as_ref()) {
        error!("{}", e);
        std::process::exit(1);
    }
}
