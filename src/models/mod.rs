//! Database models and DTOs for all domain entities.

pub mod beauty_spa;
pub mod business;
pub mod category;
pub mod health;
pub mod hotel;
pub mod lead;
pub mod notification;
pub mod plan;
pub mod review;
pub mod user;
