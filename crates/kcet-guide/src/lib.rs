//! KCET counselling guide: cutoff catalog, recommendation engine and HTTP routers.

pub mod catalog;
pub mod config;
pub mod counselling;
pub mod error;
pub mod telemetry;
