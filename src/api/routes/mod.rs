//! API Routes
//!
//! Route handlers organized by functionality.

pub mod health;
pub mod render;
pub mod reports;
