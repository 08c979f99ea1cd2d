// src/completion/mod.rs
pub mod client;
pub mod cover_letter;
pub mod form_filler;
pub mod writer;

pub use client::{CompletionClient, CompletionConfig, CompletionRequest, OpenAiCompletionClient};
pub use cover_letter::{build_cover_letter_prompt, extract_requirements};
pub use form_filler::{build_form_prompt, parse_form_completion, FilledForm, FormCompletion};
pub use writer::ApplicationWriter;
