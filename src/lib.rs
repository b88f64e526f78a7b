pub mod activity;
pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod league;
pub mod metrics;
pub mod scoring;
pub mod search;
pub mod seeds;
pub mod tasks;
pub mod tournament;
