pub mod config;
pub mod scenario;
pub mod tracker;
pub mod web;
