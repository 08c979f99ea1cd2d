// src/completion/writer.rs
use super::client::{CompletionClient, CompletionRequest};
use super::cover_letter::build_cover_letter_prompt;
use super::form_filler::{build_form_prompt, parse_form_completion, FormCompletion};
use crate::config::CompletionSettings;
use crate::error::JobError;
use crate::personal_info::PersonalInfo;
use crate::scraping::FormField;
use tracing::info;

/// Drafts form answers and cover letters through a completion client.
pub struct ApplicationWriter {
    client: Box<dyn CompletionClient>,
    temperature: f32,
    form_max_tokens: u32,
    cover_letter_max_tokens: u32,
}

impl ApplicationWriter {
    pub fn new(client: Box<dyn CompletionClient>, settings: &CompletionSettings) -> Self {
        Self {
            client,
            temperature: settings.temperature,
            form_max_tokens: settings.form_max_tokens,
            cover_letter_max_tokens: settings.cover_letter_max_tokens,
        }
    }

    pub async fn get_form_completion(
        &self,
        fields: &[FormField],
        resume: &str,
        personal_info: &PersonalInfo,
    ) -> Result<FormCompletion, JobError> {
        let request = CompletionRequest {
            prompt: build_form_prompt(fields, resume, personal_info),
            max_tokens: self.form_max_tokens,
            temperature: self.temperature,
        };

        let text = self.complete(&request).await?;
        let completion = parse_form_completion(&text)?;

        info!(
            "Model proposed values for {} of {} fields",
            completion.filled.len(),
            fields.len()
        );
        Ok(completion)
    }

    pub async fn generate_cover_letter(
        &self,
        resume: &str,
        job_description: &str,
        job_requirements: &str,
    ) -> Result<String, JobError> {
        let request = CompletionRequest {
            prompt: build_cover_letter_prompt(resume, job_description, job_requirements),
            max_tokens: self.cover_letter_max_tokens,
            temperature: self.temperature,
        };

        let text = self.complete(&request).await?;
        Ok(text.trim().to_string())
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<String, JobError> {
        self.client
            .complete(request)
            .await
            .map_err(|e| JobError::Completion(format!("{:#}", e)))
    }
}
