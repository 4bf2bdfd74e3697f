//! Terminal host of the chat client: HTTP transport, file-backed session
//! storage and the interactive loop.

pub mod backend;
pub mod config;
pub mod store;
pub mod terminal;
