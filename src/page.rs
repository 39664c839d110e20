//! Live-page surface the submission handler writes through
//!
//! The handler never looks elements up globally; it is handed something
//! implementing [`PageSurface`]. The crate ships an in-memory implementation
//! used by the CLI client and the tests.

use crate::error::{FraudScopeError, Result};
use std::collections::{BTreeSet, HashMap};

/// Minimal surface of a hosting page: element text and class-list access.
pub trait PageSurface {
    /// Rendered text content of the element, if it exists.
    fn element_text(&self, id: &str) -> Option<String>;

    /// Replace the element's text content. Missing targets are an error.
    fn set_element_text(&mut self, id: &str, text: &str) -> Result<()>;

    /// Remove a class marker from the element's class set. Removing a class
    /// the element does not carry is a no-op; a missing element is an error.
    fn remove_class(&mut self, id: &str, class: &str) -> Result<()>;

    fn has_class(&self, id: &str, class: &str) -> bool;
}

#[derive(Debug, Clone, Default)]
pub struct PageElement {
    pub text: String,
    pub classes: BTreeSet<String>,
}

/// In-memory stand-in for the hosting page.
#[derive(Debug, Clone, Default)]
pub struct InMemoryPage {
    elements: HashMap<String, PageElement>,
}

impl InMemoryPage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_element(&mut self, id: &str, text: &str, classes: &[&str]) {
        self.elements.insert(
            id.to_string(),
            PageElement {
                text: text.to_string(),
                classes: classes.iter().map(|c| c.to_string()).collect(),
            },
        );
    }

    /// A page carrying the three elements the prediction page exposes:
    /// empty result and probability slots plus the hidden container.
    pub fn prediction_page() -> Self {
        let mut page = Self::new();
        page.insert_element(crate::fragment::RESULT_TEXT_ID, "", &[]);
        page.insert_element(crate::fragment::PROBABILITY_TEXT_ID, "", &[]);
        page.insert_element(
            crate::fragment::RESULT_BOX_ID,
            "",
            &[crate::fragment::HIDDEN_CLASS],
        );
        page
    }

    fn element_mut(&mut self, id: &str) -> Result<&mut PageElement> {
        self.elements.get_mut(id).ok_or_else(|| FraudScopeError::Page {
            message: format!("No element with id '{}'", id),
        })
    }
}

impl PageSurface for InMemoryPage {
    fn element_text(&self, id: &str) -> Option<String> {
        self.elements.get(id).map(|el| el.text.clone())
    }

    fn set_element_text(&mut self, id: &str, text: &str) -> Result<()> {
        self.element_mut(id)?.text = text.to_string();
        Ok(())
    }

    fn remove_class(&mut self, id: &str, class: &str) -> Result<()> {
        self.element_mut(id)?.classes.remove(class);
        Ok(())
    }

    fn has_class(&self, id: &str, class: &str) -> bool {
        self.elements
            .get(id)
            .is_some_and(|el| el.classes.contains(class))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fragment::{HIDDEN_CLASS, RESULT_BOX_ID, RESULT_TEXT_ID};

    #[test]
    fn prediction_page_starts_hidden_and_empty() {
        let page = InMemoryPage::prediction_page();
        assert_eq!(page.element_text(RESULT_TEXT_ID).as_deref(), Some(""));
        assert!(page.has_class(RESULT_BOX_ID, HIDDEN_CLASS));
    }

    #[test]
    fn set_text_on_missing_element_is_an_error() {
        let mut page = InMemoryPage::new();
        let err = page.set_element_text("nope", "x").unwrap_err();
        assert!(err.to_string().contains("nope"));
    }

    #[test]
    fn remove_class_is_idempotent() {
        let mut page = InMemoryPage::prediction_page();
        page.remove_class(RESULT_BOX_ID, HIDDEN_CLASS).unwrap();
        page.remove_class(RESULT_BOX_ID, HIDDEN_CLASS).unwrap();
        assert!(!page.has_class(RESULT_BOX_ID, HIDDEN_CLASS));
    }
}
