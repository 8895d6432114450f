#![doc = include_str!("../README.md")]

mod accumulator;
pub mod cli;
mod error;
mod options;
mod orchestrator;

pub use accumulator::{Accumulator, RequestDescriptor};
pub use error::Error;
pub use options::Options;
pub use orchestrator::Alda;
