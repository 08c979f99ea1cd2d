// src/error.rs
//! Error types for the applier.
//!
//! Startup problems ([`ResumeError`], [`ConfigError`]) stop the run before any
//! job is attempted. [`JobError`] is scoped to a single job posting: the
//! orchestrator records it in that job's outcome and moves on.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ResumeError {
    #[error("Please provide a valid path to your resume: '{}' does not exist", .path.display())]
    Missing { path: PathBuf },

    #[error("Please provide a valid pdf or text file path for your resume: '{}'", .path.display())]
    UnsupportedFormat { path: PathBuf },

    #[error("Failed to read resume '{}': {reason}", .path.display())]
    Unreadable { path: PathBuf, reason: String },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config '{}': {reason}", .path.display())]
    Read { path: PathBuf, reason: String },

    #[error("Failed to parse config '{}': {reason}", .path.display())]
    Parse { path: PathBuf, reason: String },

    #[error("Unsupported config format '{}'. Use .yaml, .yml or .toml", .path.display())]
    UnsupportedFormat { path: PathBuf },

    #[error("Unknown personal info key: {0}")]
    UnknownPersonalInfoKey(String),

    #[error("Missing required personal info key: {0}")]
    MissingPersonalInfoKey(&'static str),

    #[error("Personal info line is not KEY=value: {0:?}")]
    MalformedPersonalInfoLine(String),

    #[error("Invalid job list '{}': {reason}", .path.display())]
    JobList { path: PathBuf, reason: String },

    #[error("Job URL must be an absolute http(s) URL: {0}")]
    InvalidJobUrl(String),

    #[error("No job URLs given. Add `jobs` to the config, or use --job / --jobs")]
    NoJobs,

    #[error("OPENAI_API_KEY environment variable not set")]
    MissingApiKey,
}

/// Failure of one job posting. Never fatal to the run.
#[derive(Debug, Error)]
pub enum JobError {
    #[error("Failed to fetch '{url}': {reason}")]
    Fetch { url: String, reason: String },

    #[error("Browser navigation to '{url}' failed: {reason}")]
    Navigation { url: String, reason: String },

    #[error("Apply link '{href}' cannot be resolved against '{base}'")]
    InvalidApplyLink { href: String, base: String },

    #[error("No form found on page")]
    NoFormFound,

    #[error("Multiple forms found on page ({count})")]
    MultipleFormsFound { count: usize },

    #[error("Completion request failed: {0}")]
    Completion(String),

    #[error("Malformed completion response, no `field: value` line in {0:?}")]
    MalformedCompletionResponse(String),
}
