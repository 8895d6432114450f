#![doc = include_str!("../README.md")]

mod error;
mod goal;
mod provider;
mod query;
mod sack;
mod selector;
mod types;
mod utils;

pub use error::Error;
pub use goal::{Goal, InstallTarget};
pub use query::Query;
pub use sack::{PackageId, Repo, Sack};
pub use selector::{Request, Selector};
