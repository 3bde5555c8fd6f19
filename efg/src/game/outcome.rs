use crate::numeric::Number;

/// Storage for an outcome: one payoff per personal player, indexed by
/// player number minus one.
#[derive(Debug, Clone)]
pub(crate) struct OutcomeData<T: Number> {
    pub label: String,
    pub payoffs: Vec<T>,
}

impl<T: Number> OutcomeData<T> {
    pub fn new(num_players: usize) -> OutcomeData<T> {
        OutcomeData {
            label: String::new(),
            payoffs: vec![T::zero(); num_players],
        }
    }

    pub fn payoff(&self, player: usize) -> T {
        debug_assert!(player >= 1);
        self.payoffs[player - 1]
    }
}
