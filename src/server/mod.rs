pub mod builder;
pub mod handler;
pub mod listener;

pub use builder::ProbeServer;
pub use handler::{ProbeError, ProbeHandler};
