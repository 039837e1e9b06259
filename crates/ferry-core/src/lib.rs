pub mod config;
pub mod logging;
pub mod session;
pub mod staging;

pub mod progress;
pub mod scheduler;
pub mod store;
pub mod transfer;
