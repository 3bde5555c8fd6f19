mod behavioral_strategy;
mod pure_strategy;

pub use behavioral_strategy::BehavProfile;
pub use pure_strategy::PureBehavProfile;
