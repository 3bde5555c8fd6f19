#[macro_use]
extern crate approx;

pub mod basis;
pub mod contingency;
pub mod dominance;
pub mod enumeration;
pub mod error;
pub mod game;
pub mod numeric;
pub mod status;
pub mod strategy;
pub mod support;

pub use crate::error::{Error, Result};
pub use crate::numeric::Number;
pub use crate::status::{CancelToken, NullStatus, PollLimit, Status};
