mod auth;
mod client;
pub mod domain;

pub use auth::*;
pub use client::{PiazzaClient, PiazzaError};
