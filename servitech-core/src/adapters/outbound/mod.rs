mod clock;
mod http;
mod memory;

pub use clock::*;
pub use http::*;
pub use memory::*;
