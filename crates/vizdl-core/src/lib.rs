pub mod config;
pub mod logging;

pub mod catalog;
pub mod filter;
pub mod naming;
pub mod pagination;
pub mod retry;
