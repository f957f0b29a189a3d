// Library for tests to access modules

pub mod chart;
pub mod client;
pub mod commands;
pub mod config;
pub mod dashboard;
pub mod metrics;
pub mod models;
pub mod poller;
pub mod table;
pub mod version;
pub mod view;
