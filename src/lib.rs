pub mod configuration;
pub mod domain;
pub mod git;
pub mod startup;
pub mod travis;
pub mod trigger;

pub use configuration::*;
pub use domain::*;
pub use git::*;
pub use startup::*;
pub use travis::*;
pub use trigger::*;
