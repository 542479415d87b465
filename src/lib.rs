//! Inspiration board client.
//!
//! Browses boards, loads the selected board's cards, and keeps a local
//! projection consistent with the remote board service across asynchronous
//! create, like, edit, and delete calls.

pub mod config;
pub mod net;
pub mod shell;
pub mod state;
