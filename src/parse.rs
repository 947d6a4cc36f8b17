use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use crate::{Error, Result};

#[allow(clippy::expect_used)]
static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace regex is valid"));

#[allow(clippy::expect_used)]
static SHOWING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)showing\s+(\d+)\s*-\s*(\d+)\s+of\s+(\d+)").expect("showing regex is valid")
});

#[allow(clippy::expect_used)]
static ANY_ELEMENT: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("*").expect("universal selector is valid"));

/// Trims the string and collapses every run of whitespace into a single space.
pub fn clean(s: &str) -> String {
    WHITESPACE.replace_all(s.trim(), " ").into_owned()
}

#[inline]
pub(crate) fn create_selector(sel_str: &str) -> Result<Selector> {
    Selector::parse(sel_str).map_err(|_| Error::InvalidSelector(sel_str.into()))
}

/// Normalized text content of an element.
#[inline]
pub(crate) fn element_text(el: &ElementRef) -> String {
    clean(&el.text().collect::<String>())
}

/// The "Showing X - Y of Z" counter of the listing.
///
/// The default value `{0, 0, 0}` stands for an absent or unreadable indicator.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PaginationState {
    pub start: usize,
    pub end: usize,
    pub total: usize,
}

impl PaginationState {
    pub fn new(start: usize, end: usize, total: usize) -> Self {
        Self { start, end, total }
    }

    /// Parses the first "Showing X - Y of Z" occurrence in `text`.
    pub fn parse(text: &str) -> Option<Self> {
        let caps = SHOWING.captures(text)?;
        let num = |i: usize| caps.get(i)?.as_str().parse::<usize>().ok();
        Some(Self::new(num(1)?, num(2)?, num(3)?))
    }

    /// Reads the state from a rendered document, falling back to the zero state.
    pub fn read(doc: &Html) -> Self {
        find_indicator(doc)
            .and_then(|el| Self::parse(&element_text(&el)))
            .unwrap_or_default()
    }

    pub fn is_known(&self) -> bool {
        self.start != 0
    }
}

/// Finds the innermost element carrying the "Showing" counter, first in document order.
pub(crate) fn find_indicator(doc: &Html) -> Option<ElementRef<'_>> {
    let has_counter = |el: &ElementRef| SHOWING.is_match(&el.text().collect::<String>());

    doc.select(&ANY_ELEMENT)
        .filter(|el| !matches!(el.value().name(), "script" | "style" | "template"))
        .filter(has_counter)
        .find(|el| {
            !el.children()
                .filter_map(ElementRef::wrap)
                .any(|child| has_counter(&child))
        })
}
