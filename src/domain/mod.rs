mod build_request;
mod commit_identity;
mod trigger_target;

pub use build_request::*;
pub use commit_identity::*;
pub use trigger_target::*;
