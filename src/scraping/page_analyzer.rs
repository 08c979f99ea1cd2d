// src/scraping/page_analyzer.rs
//! DOM heuristics over a job page: visible text, the apply link, and the
//! inputs of the application form.

use super::types::FormField;
use crate::error::JobError;
use reqwest::Url;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashMap;

/// Elements whose text content never renders.
const HIDDEN_ELEMENTS: &[&str] = &["script", "style", "noscript", "template"];

const APPLY_KEYWORDS: &[&str] = &["apply", "submit"];

/// Link schemes a browser cannot load as an application page.
const NON_NAVIGABLE_SCHEMES: &[&str] = &["javascript:", "mailto:", "tel:"];

fn selector(css: &'static str) -> Selector {
    Selector::parse(css).expect("hard-coded selector parses")
}

/// Strip tags and return the non-blank lines of text, trimmed, in order.
pub fn extract_visible_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let mut text = String::new();

    for node in document.tree.root().descendants() {
        let Some(chunk) = node.value().as_text() else {
            continue;
        };
        let hidden = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .is_some_and(|el| HIDDEN_ELEMENTS.contains(&el.name()))
        });
        if !hidden {
            text.push_str(chunk);
        }
    }

    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Target of the first anchor whose text mentions "apply" or "submit".
///
/// Only the first such anchor is considered. Returns `None` when it has no
/// usable target: missing or empty `href`, an in-page `#` anchor, or a
/// `javascript:`, `mailto:` or `tel:` link.
pub fn find_apply_link(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let anchor = document
        .select(&selector("a"))
        .find(|a| is_apply_text(&a.text().collect::<String>()))?;

    let href = anchor.value().attr("href")?.trim();
    let lower = href.to_lowercase();
    if href.is_empty()
        || href.starts_with('#')
        || NON_NAVIGABLE_SCHEMES.iter().any(|scheme| lower.starts_with(scheme))
    {
        return None;
    }
    Some(href.to_string())
}

fn is_apply_text(text: &str) -> bool {
    let lower = text.to_lowercase();
    APPLY_KEYWORDS.iter().any(|keyword| lower.contains(keyword))
}

/// Resolve an apply link (possibly relative) against the page it came from.
pub fn resolve_link(base: &str, href: &str) -> Result<Url, JobError> {
    let invalid = || JobError::InvalidApplyLink {
        href: href.to_string(),
        base: base.to_string(),
    };
    let base_url = Url::parse(base).map_err(|_| invalid())?;
    base_url.join(href).map_err(|_| invalid())
}

/// Every `<input>` of the page's only form, in document order.
pub fn extract_form_fields(html: &str) -> Result<Vec<FormField>, JobError> {
    let document = Html::parse_document(html);
    let forms: Vec<ElementRef> = document.select(&selector("form")).collect();

    let form = match forms.as_slice() {
        [] => return Err(JobError::NoFormFound),
        [form] => *form,
        _ => {
            return Err(JobError::MultipleFormsFound { count: forms.len() });
        }
    };

    let labels: HashMap<String, String> = document
        .select(&selector("label[for]"))
        .filter_map(|label| {
            let target = label.value().attr("for")?;
            let text = clean_text(&label.text().collect::<String>());
            (!text.is_empty()).then(|| (target.to_string(), text))
        })
        .collect();

    let fields = form
        .select(&selector("input"))
        .map(|input| {
            let element = input.value();
            let id = element.attr("id").map(String::from);
            let label = id
                .as_ref()
                .and_then(|id| labels.get(id).cloned())
                .or_else(|| enclosing_label_text(input));

            FormField {
                markup: input.html(),
                name: element.attr("name").map(String::from),
                input_type: element.attr("type").map(String::from),
                id,
                label,
            }
        })
        .collect();

    Ok(fields)
}

fn enclosing_label_text(input: ElementRef) -> Option<String> {
    input
        .ancestors()
        .filter_map(ElementRef::wrap)
        .find(|el| el.value().name() == "label")
        .map(|label| clean_text(&label.text().collect::<String>()))
        .filter(|text| !text.is_empty())
}

fn clean_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
