//! Application layer: port traits, diagnostic events, and the session
//! service that orchestrates transport → indicator core → outputs.

pub mod events;
pub mod ports;
pub mod service;
