mod duration;
mod ids;
mod incident;
mod session;

pub use duration::*;
pub use ids::*;
pub use incident::*;
pub use session::*;
