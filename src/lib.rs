// src/lib.rs
//! Drafts job applications: scrapes a posting, finds its application form,
//! and asks a language model to propose values for the form's fields.

pub mod applier;
pub mod completion;
pub mod config;
pub mod error;
pub mod personal_info;
pub mod resume;
pub mod scraping;
pub mod utils;

pub use applier::{Applier, JobOutcome, JobReport};
pub use config::{ConfigFile, RunSettings};
pub use error::{ConfigError, JobError, ResumeError};
pub use personal_info::PersonalInfo;
