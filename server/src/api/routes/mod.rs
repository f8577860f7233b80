//! API route handlers

pub mod firehose;
pub mod health;
