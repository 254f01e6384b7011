mod error;
mod exit_guard;
mod incident_detail;
pub mod models;
pub mod ports;
pub mod services;
mod ticker;
mod tracker;

pub use error::*;
pub use exit_guard::*;
pub use incident_detail::*;
pub use services::{IncidentStateSync, SyncCommand, SyncOp};
pub use ticker::*;
pub use tracker::*;
