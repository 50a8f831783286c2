//! Backend for the game quick-reference notebook: effect and character catalogs,
//! the recovery calculator, and the HTTP API that serves both.

pub mod cli;
pub mod config;
pub mod data;
pub mod logging;
pub mod recovery;
pub mod server;
