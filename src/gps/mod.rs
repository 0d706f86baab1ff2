// src/gps/mod.rs
//! GPS fix handling: the cached coordinate record and webhook parameter parsing

pub mod data;
pub mod query;

pub use data::Coordinates;
