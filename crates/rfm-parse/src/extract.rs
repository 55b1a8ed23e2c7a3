//! Locating registry entries inside the published HTML page.

use scraper::{ElementRef, Html, Selector};

use crate::error::{Error, Result};

/// The container holding the list of designated Russian individuals.
pub const LIST_SELECTOR: &str = "#russianFL .terrorist-list";

/// One entry per list item inside the container.
pub const ENTRY_SELECTOR: &str = "li";

fn selector(s: &str) -> Result<Selector> {
  Selector::parse(s).map_err(|e| Error::Selector {
    selector: s.to_string(),
    reason:   e.to_string(),
  })
}

/// Concatenated text of an element with surrounding whitespace removed.
fn element_text(el: ElementRef<'_>) -> String {
  el.text().collect::<String>().trim().to_string()
}

/// Return the raw text of every entry in the first list container, in page
/// order. Fails if the container is absent.
pub fn extract_entries(html: &str) -> Result<Vec<String>> {
  let document = Html::parse_document(html);
  let list_selector = selector(LIST_SELECTOR)?;
  let entry_selector = selector(ENTRY_SELECTOR)?;

  let list = document
    .select(&list_selector)
    .next()
    .ok_or_else(|| Error::ListNotFound(LIST_SELECTOR.to_string()))?;

  let entries: Vec<String> = list.select(&entry_selector).map(element_text).collect();
  tracing::info!(count = entries.len(), "found registry list entries");
  Ok(entries)
}
