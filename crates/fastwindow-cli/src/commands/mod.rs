pub mod common;
pub mod config;
pub mod data;
pub mod fast;
pub mod history;
pub mod notify;
pub mod weight;
