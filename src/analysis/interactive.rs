//! Interactive element extraction: buttons, inputs, dropdowns.

use regex::Regex;

use crate::config::AnalyzerConfig;
use crate::dom::{DocumentModel, Element};
use crate::types::{ButtonElement, DropdownElement, EventBinding, InputElement, InteractiveElements};

/// Event attributes inspected on buttons. Values are recorded verbatim;
/// no JavaScript evaluation happens here.
const EVENT_ATTRS: &[&str] = &[
    "onclick",
    "onchange",
    "onsubmit",
    "onmouseover",
    "onmouseout",
    "onkeydown",
    "onkeyup",
    "onload",
];

pub struct InteractiveElementScanner {
    button_class: Regex,
    dropdown_class: Regex,
    max_buttons: usize,
    max_inputs: usize,
    max_dropdowns: usize,
}

impl InteractiveElementScanner {
    pub fn new(config: &AnalyzerConfig) -> Self {
        Self {
            button_class: Regex::new(r"(?i)btn|button").expect("static pattern"),
            dropdown_class: Regex::new(r"(?i)dropdown|select|menu").expect("static pattern"),
            max_buttons: config.max_buttons,
            max_inputs: config.max_inputs,
            max_dropdowns: config.max_dropdowns,
        }
    }

    /// Scan in document order; each list is capped at its configured size.
    pub fn scan(&self, doc: &DocumentModel) -> InteractiveElements {
        let elements = doc.all_elements();

        let buttons = elements
            .iter()
            .copied()
            .filter(|el| self.is_button(el))
            .take(self.max_buttons)
            .map(|el| ButtonElement {
                tag: el.tag.clone(),
                text: el.text(),
                classes: el.classes.clone(),
                id: el.id.clone(),
                events: extract_events(el),
            })
            .collect();

        let inputs = elements
            .iter()
            .copied()
            .filter(|el| matches!(el.tag.as_str(), "input" | "select" | "textarea"))
            .take(self.max_inputs)
            .map(|el| InputElement {
                tag: el.tag.clone(),
                input_type: el.attribute("type").map(str::to_string),
                name: el.attribute("name").map(str::to_string),
                id: el.id.clone(),
                placeholder: el.attribute("placeholder").map(str::to_string),
                classes: el.classes.clone(),
            })
            .collect();

        let dropdowns = elements
            .iter()
            .copied()
            .filter(|el| self.is_dropdown(el))
            .take(self.max_dropdowns)
            .map(|el| DropdownElement {
                tag: el.tag.clone(),
                id: el.id.clone(),
                classes: el.classes.clone(),
                options: if el.tag == "select" {
                    el.descendants()
                        .into_iter()
                        .filter(|d| d.tag == "option")
                        .count()
                } else {
                    0
                },
            })
            .collect();

        InteractiveElements {
            buttons,
            inputs,
            dropdowns,
        }
    }

    /// A `<button>` always qualifies; `a`/`input` need a btn-like class.
    fn is_button(&self, el: &Element) -> bool {
        if el.tag == "button" {
            return true;
        }
        matches!(el.tag.as_str(), "a" | "input")
            && el.classes.iter().any(|c| self.button_class.is_match(c))
    }

    fn is_dropdown(&self, el: &Element) -> bool {
        if el.tag == "select" {
            return true;
        }
        el.tag == "div" && el.classes.iter().any(|c| self.dropdown_class.is_match(c))
    }
}

fn extract_events(el: &Element) -> Vec<EventBinding> {
    EVENT_ATTRS
        .iter()
        .filter_map(|attr| {
            el.attribute(attr).map(|handler| EventBinding {
                event: attr.trim_start_matches("on").to_string(),
                handler: handler.to_string(),
            })
        })
        .collect()
}
