mod auth;
mod client;
pub mod domain;
mod servitech_url;

pub use servitech_url::*;

pub use auth::*;
pub use client::*;
