//! QuickTix API server.
//!
//! A self-hosted backend for the QuickTix ticket-purchasing client: session
//! authentication, event listings, ticket booking with a simulated payment
//! step, profile management, and avatar storage.

pub mod auth;
pub mod config;
pub mod handlers;
pub mod models;
pub mod payments;
pub mod routes;
pub mod state;
pub mod utils;
