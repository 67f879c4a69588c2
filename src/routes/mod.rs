//! Route definitions for the directory API.

pub mod businesses;
pub mod health;
