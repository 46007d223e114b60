pub mod app;
pub mod auth;
pub mod config;
pub mod db;
pub mod drawings;
pub mod error;
pub mod extract;
pub mod state;
