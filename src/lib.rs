//! Library exports for chronotes-auth, shared between the binary and tests.

pub mod auth;
pub mod commands;
pub mod config;
pub mod gateway;
pub mod models;
pub mod navigator;
pub mod startup;
pub mod state;
pub mod utils;
