pub mod company;
pub mod config;
pub mod message;
pub mod search;
pub mod state;
pub mod supplier;
