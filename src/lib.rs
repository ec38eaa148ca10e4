// src/lib.rs

pub mod analyze;
pub mod benchmark;
pub mod classify;
pub mod config;
pub mod error;
pub mod export;
pub mod output;
pub mod report;
pub mod sanitize;
