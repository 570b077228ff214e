pub mod config;
pub mod engine;
pub mod history;
pub mod odds;
pub mod rates;
pub mod report;
pub mod snapshot;
pub mod state;
pub mod win_prob;
