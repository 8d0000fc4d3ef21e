// src/config/mod.rs

pub mod accounts;
pub mod consts;
pub mod options;

pub use accounts::{ConfigStore, TrackedAccount};
pub use options::{DelayRange, FetchOptions, Settings};
