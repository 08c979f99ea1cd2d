// src/scraping/types.rs
use super::page_analyzer::extract_visible_text;
use serde::Serialize;

/// A fetched page and the text a reader would see on it.
#[derive(Debug, Clone)]
pub struct ParsedPage {
    pub raw_html: String,
    pub visible_text: String,
}

impl ParsedPage {
    pub fn new(raw_html: String) -> Self {
        let visible_text = extract_visible_text(&raw_html);
        Self {
            raw_html,
            visible_text,
        }
    }
}

/// One `<input>` of the application form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormField {
    /// Serialized element, attributes included.
    pub markup: String,
    pub name: Option<String>,
    pub input_type: Option<String>,
    pub id: Option<String>,
    /// Text of the `<label>` tied to this input, if any.
    pub label: Option<String>,
}

impl FormField {
    /// What the language model is shown for this field.
    pub fn descriptor(&self) -> String {
        match &self.label {
            Some(label) => format!("{} (label: {})", self.markup, label),
            None => self.markup.clone(),
        }
    }
}
