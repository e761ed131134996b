//! Shiftboard Backend Library
//!
//! This library provides the core functionality for the Shiftboard schedule
//! board service, including:
//! - CORS-enabled JSON endpoints for schedules, users and departments
//! - Diesel-backed persistence with embedded migrations
//! - Nested schedule board shaping (date -> department -> staff -> status)

pub mod api;
pub mod db;
pub mod models;
pub mod schema;
