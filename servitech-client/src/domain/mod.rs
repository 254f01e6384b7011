mod incident;
mod timestamp;
mod user;

pub use incident::*;
pub use timestamp::*;
pub use user::*;
