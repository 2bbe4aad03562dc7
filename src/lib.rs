// Client core for the feed demo; the binary wires it to a terminal console.
pub mod app;
pub mod cli;
pub mod composer;
pub mod config;
pub mod console;
pub mod feed;
pub mod logging;
pub mod preferences;
pub mod service;
pub mod session;
