// src/completion/form_filler.rs
use crate::error::JobError;
use crate::personal_info::PersonalInfo;
use crate::scraping::FormField;
use serde::ser::{Serialize, SerializeMap, Serializer};
use tracing::warn;

/// Proposed value per form field, in the order the model answered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilledForm {
    entries: Vec<(String, String)>,
}

impl FilledForm {
    /// Insert or replace; a replaced field keeps its original position.
    pub fn insert(&mut self, field: String, value: String) {
        match self.entries.iter_mut().find(|(f, _)| *f == field) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((field, value)),
        }
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(f, _)| f == field)
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(f, v)| (f.as_str(), v.as_str()))
    }
}

impl Serialize for FilledForm {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (field, value) in &self.entries {
            map.serialize_entry(field, value)?;
        }
        map.end()
    }
}

/// Parsed model answer plus the lines that could not be read as
/// `field: value`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormCompletion {
    pub filled: FilledForm,
    pub skipped_lines: Vec<String>,
}

pub fn build_form_prompt(
    fields: &[FormField],
    resume: &str,
    personal_info: &PersonalInfo,
) -> String {
    let descriptors = fields
        .iter()
        .map(FormField::descriptor)
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        r#"Using the following resume and personal info:
RESUME={}
PERSONAL_INFO={}

fill in the following form fields:
{}

Answer with exactly one line per field, formatted as `field: value`, where field is the input's name."#,
        resume,
        personal_info.to_block(),
        descriptors
    )
}

/// Read one `field: value` pair per line.
///
/// Each line is split on its first `": "`, so `field: ` with nothing after
/// the separator is an empty value. Lines without the separator are skipped
/// and reported back. A non-empty answer in which no line parses is
/// [`JobError::MalformedCompletionResponse`].
pub fn parse_form_completion(text: &str) -> Result<FormCompletion, JobError> {
    let mut completion = FormCompletion::default();

    for line in text.lines().map(str::trim_start) {
        if line.trim().is_empty() {
            continue;
        }
        match line.split_once(": ") {
            Some((field, value)) if !field.trim().is_empty() => {
                completion
                    .filled
                    .insert(field.trim().to_string(), value.trim().to_string());
            }
            _ => {
                let line = line.trim_end();
                warn!("Skipping completion line without `field: value`: {:?}", line);
                completion.skipped_lines.push(line.to_string());
            }
        }
    }

    if completion.filled.is_empty() && !completion.skipped_lines.is_empty() {
        return Err(JobError::MalformedCompletionResponse(text.trim().to_string()));
    }

    Ok(completion)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(name: &str) -> FormField {
        FormField {
            markup: format!(r#"<input name="{}" type="text">"#, name),
            name: Some(name.to_string()),
            input_type: Some("text".to_string()),
            id: None,
            label: None,
        }
    }

    #[test]
    fn test_parse_simple_response() {
        let completion = parse_form_completion("Name: John\nEmail: john@x.com").unwrap();
        assert_eq!(completion.filled.len(), 2);
        assert_eq!(completion.filled.get("Name"), Some("John"));
        assert_eq!(completion.filled.get("Email"), Some("john@x.com"));
        assert!(completion.skipped_lines.is_empty());
    }

    #[test]
    fn test_parse_splits_on_first_separator() {
        let completion = parse_form_completion("Note: Available: from May").unwrap();
        assert_eq!(completion.filled.get("Note"), Some("Available: from May"));
    }

    #[test]
    fn test_parse_skips_malformed_lines() {
        let text = "\nHere are the answers\nName: John\n\nEmail:john@x.com\nPhone: 123\n";
        let completion = parse_form_completion(text).unwrap();

        assert_eq!(completion.filled.len(), 2);
        assert_eq!(completion.filled.get("Phone"), Some("123"));
        assert_eq!(
            completion.skipped_lines,
            vec!["Here are the answers", "Email:john@x.com"]
        );
    }

    #[test]
    fn test_parse_keeps_empty_values() {
        let completion =
            parse_form_completion("Name: John\nMiddle name: \nEmail: j@x.com").unwrap();
        assert_eq!(completion.filled.len(), 3);
        assert_eq!(completion.filled.get("Middle name"), Some(""));
        assert_eq!(completion.filled.get("Email"), Some("j@x.com"));
        assert!(completion.skipped_lines.is_empty());
    }

    #[test]
    fn test_parse_empty_value_on_last_line() {
        let completion = parse_form_completion("\n  Name: John\r\nSuffix: \n\n").unwrap();
        assert_eq!(completion.filled.get("Name"), Some("John"));
        assert_eq!(completion.filled.get("Suffix"), Some(""));
        assert!(completion.skipped_lines.is_empty());
    }

    #[test]
    fn test_parse_rejects_response_without_pairs() {
        let err = parse_form_completion("I cannot fill this form.").unwrap_err();
        assert!(matches!(err, JobError::MalformedCompletionResponse(_)));
    }

    #[test]
    fn test_parse_empty_response() {
        let completion = parse_form_completion("  \n ").unwrap();
        assert!(completion.filled.is_empty());
    }

    #[test]
    fn test_duplicate_field_last_value_wins() {
        let completion = parse_form_completion("a: 1\nb: 2\na: 3").unwrap();
        let pairs: Vec<_> = completion.filled.iter().collect();
        assert_eq!(pairs, vec![("a", "3"), ("b", "2")]);
    }

    #[test]
    fn test_filled_form_serializes_as_map() {
        let completion = parse_form_completion("Name: John\nEmail: john@x.com").unwrap();
        let json = serde_json::to_string(&completion.filled).unwrap();
        assert_eq!(json, r#"{"Name":"John","Email":"john@x.com"}"#);
    }

    #[test]
    fn test_form_prompt_embeds_inputs() {
        let info = PersonalInfo::parse_block("NAME=John Doe\nEMAIL=j@x.com\nPHONE=1").unwrap();
        let fields = [field("first_name"), field("email")];
        let prompt = build_form_prompt(&fields, "Rust dev", &info);

        assert!(prompt.contains("RESUME=Rust dev"));
        assert!(prompt.contains("PERSONAL_INFO=NAME=John Doe\nEMAIL=j@x.com\nPHONE=1"));
        assert!(prompt.contains(
            r#"<input name="first_name" type="text">, <input name="email" type="text">"#
        ));
    }
}
