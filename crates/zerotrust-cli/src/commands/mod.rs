pub mod apps;
pub mod config;
pub mod evaluate;
pub mod scenarios;
