//! PR risk analysis pipeline: turns a GitHub pull request locator into a
//! risk assessment plus a generated review, via a GitHub data source and
//! pluggable classifier / review-generator collaborators.

pub mod config;
pub mod diff;
pub mod error;
pub mod features;
pub mod github;
pub mod model;
pub mod pipeline;
pub mod pr;
pub mod review;
pub mod server;
