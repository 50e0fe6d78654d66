/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Health check endpoint
/// - `users`: User CRUD endpoints
/// - `items`: Item CRUD, status transition, reassignment, and history

pub mod health;
pub mod items;
pub mod users;
