//! Library crate for gaffer-back, exposing modules for binaries and integration tests.

pub mod config;
pub mod dao;
pub mod dto;
pub mod error;
pub mod routes;
pub mod rules;
pub mod services;
pub mod state;
