//! One extraction function per product field.
//!
//! Each function is pure over the parsed document. A field whose markup is
//! missing comes back empty rather than failing.

use crate::extract::policy::{all_values, first_value};
use crate::extract::selectors;
use scraper::{ElementRef, Html};
use std::collections::BTreeMap;

/// Text nodes that are direct children of an element
fn own_text<'a>(element: ElementRef<'a>) -> impl Iterator<Item = &'a str> + 'a {
    element
        .children()
        .filter_map(|node| node.value().as_text())
        .map(|text| &**text)
}

/// Product name from the page heading
pub fn title(document: &Html) -> Option<String> {
    first_value(document.select(&selectors::TITLE).flat_map(own_text))
}

/// Brand from the brand logo's `title` attribute, falling back to `alt`
pub fn brand(document: &Html) -> Option<String> {
    first_value(document.select(&selectors::BRAND_LOGO).filter_map(|img| {
        let img = img.value();
        img.attr("title").or_else(|| img.attr("alt"))
    }))
}

/// First own-text node of the description blocks
pub fn description(document: &Html) -> Option<String> {
    first_value(document.select(&selectors::DESCRIPTION).flat_map(own_text))
}

/// Breadcrumb labels without the leading home entry
///
/// The home entry is dropped from every breadcrumb list on the page, so a
/// page carrying both a desktop and a mobile trail yields both trails
/// without their roots.
pub fn category(document: &Html) -> Vec<String> {
    all_values(
        document
            .select(&selectors::BREADCRUMB)
            .filter(|item| !is_first_breadcrumb(*item))
            .flat_map(|item| item.children().filter_map(ElementRef::wrap))
            .filter(|child| child.value().name() == "a")
            .flat_map(own_text),
    )
}

/// True when no earlier sibling of `item` is a breadcrumb entry
fn is_first_breadcrumb(item: ElementRef<'_>) -> bool {
    !item
        .prev_siblings()
        .filter_map(ElementRef::wrap)
        .any(|sibling| selectors::BREADCRUMB.matches(&sibling))
}

/// First carousel image source
///
/// Only the first image is kept even though the carousel usually holds
/// several.
pub fn image_urls(document: &Html) -> Option<String> {
    first_value(
        document
            .select(&selectors::CAROUSEL_IMAGE)
            .filter_map(|img| img.value().attr("src")),
    )
}

/// Technical attributes from the definition lists
///
/// Terms and values are paired in order inside each list. A term without
/// text is dropped, a missing value becomes an empty string, and a repeated
/// term keeps the last value seen.
pub fn details(document: &Html) -> BTreeMap<String, String> {
    let mut details = BTreeMap::new();

    for list in document.select(&selectors::ATTRIBUTE_LIST) {
        let terms = list.select(&selectors::ATTRIBUTE_TERM);
        let mut values = list.select(&selectors::ATTRIBUTE_VALUE);

        for term in terms {
            let value = values.next().and_then(|dd| first_value(dd.text()));
            if let Some(key) = first_value(term.text()) {
                details.insert(key, value.unwrap_or_default());
            }
        }
    }

    details
}

/// Value of a key/value panel row identified by its label keyword
///
/// A label matches when its first own text node contains `keyword`
/// (case-sensitive). The value is the own text of the label's parent `div`.
/// The first matching row with a value wins.
pub fn labelled_value(document: &Html, keyword: &str) -> Option<String> {
    let values = document
        .select(&selectors::PANEL_LABEL)
        .filter(|label| {
            own_text(*label)
                .next()
                .is_some_and(|text| text.contains(keyword))
        })
        .filter_map(|label| label.parent().and_then(ElementRef::wrap))
        .filter(|parent| parent.value().name() == "div")
        .filter_map(|parent| first_value(own_text(parent)));

    first_value(values)
}

/// The `VARIURE` panel value
pub fn variure(document: &Html) -> Option<String> {
    labelled_value(document, "VARIURE")
}

/// The `FINITION` panel value
pub fn finition(document: &Html) -> Option<String> {
    labelled_value(document, "FINITION")
}

/// The `TYPE` panel value
pub fn product_type(document: &Html) -> Option<String> {
    labelled_value(document, "TYPE")
}
