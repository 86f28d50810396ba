//! Terminal front end: subcommands and rendering

pub mod convert;
pub mod currencies;
pub mod interactive;
pub mod setup;
pub mod ui;
