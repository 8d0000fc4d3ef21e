// src/lib.rs
// #![allow(dead_code)]
// #![allow(unused)]

#[macro_use]
pub mod macros;
#[macro_use]
pub mod log;

pub mod config;
pub mod core;
pub mod error;

pub mod chart;
pub mod csv;
pub mod fetch;
pub mod file;
pub mod runner;
pub mod scheduler;
pub mod series;
pub mod signal;
