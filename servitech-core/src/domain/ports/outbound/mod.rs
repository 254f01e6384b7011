mod clock;
mod incident_backend;

pub use clock::*;
pub use incident_backend::*;
