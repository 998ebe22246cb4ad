pub mod cli;
pub mod config;
pub mod game;
pub mod logging;
pub mod pretty;
pub mod server;
pub mod storage;
pub mod supply;
