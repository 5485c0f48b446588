//! Marketing Campaign Launcher
//!
//! Provisions paused Meta Ads campaigns (campaign, ad set, image, creative, ad)
//! behind a single HTTP endpoint.

pub mod config;
pub mod constants;
pub mod facebook;
pub mod launch;
pub mod models;
pub mod server;

pub use facebook::{AdPlatform, FacebookAPI, FacebookApiError};
pub use launch::{launch_campaign, LaunchError, LaunchStep};
pub use server::{create_router, AppState};
