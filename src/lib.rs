pub mod cli;
pub mod config;
pub mod contract;
pub mod desk;
pub mod error;
pub mod lifecycle;
pub mod logging;
pub mod payment;
pub mod permissions;
pub mod store;
pub mod task;
pub mod translator;
pub mod ui;
