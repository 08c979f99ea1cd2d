// src/resume.rs
//! Resume loading. Only `.pdf` and `.txt` files are accepted.

use crate::error::ResumeError;
use crate::utils::{get_file_extension, read_file_content};
use std::path::{Path, PathBuf};
use tracing::info;

pub const DEFAULT_RESUME_PATH: &str = "resume.pdf";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResumeFormat {
    Pdf,
    Text,
}

impl ResumeFormat {
    pub fn from_path(path: &Path) -> Result<Self, ResumeError> {
        match get_file_extension(path).as_deref() {
            Some("pdf") => Ok(Self::Pdf),
            Some("txt") => Ok(Self::Text),
            _ => Err(ResumeError::UnsupportedFormat {
                path: path.to_path_buf(),
            }),
        }
    }
}

/// Load the resume as plain text.
pub async fn load_resume(path: &Path) -> Result<String, ResumeError> {
    if !tokio::fs::try_exists(path).await.unwrap_or(false) {
        return Err(ResumeError::Missing {
            path: path.to_path_buf(),
        });
    }

    let format = ResumeFormat::from_path(path)?;
    let text = match format {
        ResumeFormat::Text => read_file_content(path)
            .await
            .map_err(|e| unreadable(path, format!("{:#}", e)))?,
        ResumeFormat::Pdf => {
            let owned: PathBuf = path.to_path_buf();
            tokio::task::spawn_blocking(move || pdf_extract::extract_text(&owned))
                .await
                .map_err(|e| unreadable(path, e.to_string()))?
                .map_err(|e| unreadable(path, e.to_string()))?
        }
    };

    info!(
        "Loaded {:?} resume from {} ({} chars)",
        format,
        path.display(),
        text.len()
    );
    Ok(text.trim().to_string())
}

fn unreadable(path: &Path, reason: String) -> ResumeError {
    ResumeError::Unreadable {
        path: path.to_path_buf(),
        reason,
    }
}
