mod incident_state_sync;

pub use incident_state_sync::*;
