// src/volby/mod.rs
pub mod client;
pub mod models;

pub use client::{PageSource, VolbyClient};
pub use models::District;
