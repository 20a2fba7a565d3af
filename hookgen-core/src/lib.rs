//! # hookgen-core
//!
//! Core library for hookgen - synthetic source-control webhook fixtures.
//!
//! This crate generates chains of changesets with consistent "before"
//! linkage, splits them into individual per-commit push events, derives
//! deployment and incident-issue events from selected commits, and drives
//! delivery through the [`driver::WebhookSink`] boundary. All randomness is
//! injected through a caller-supplied [`rand::Rng`].

pub mod driver;
pub mod error;
pub mod generate;
pub mod models;

pub use driver::{run, EventType, RunPlan, RunSummary, WebhookSink};
pub use error::{Error, Result};
pub use generate::{decompose, generate_chain};
pub use models::{Changeset, Commit, DeploymentEvent, IndividualChange, IssueEvent, ZERO_SHA};
