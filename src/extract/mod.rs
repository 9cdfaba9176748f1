//! Field extraction for product pages
//!
//! This module turns a fetched product page into a [`PartialRecord`]:
//! - scalar text fields through a table of extraction functions
//! - the breadcrumb category and the attribute details
//! - the SKU from the embedded structured data, which is mandatory
//!
//! Every scalar field goes through the same [`first_value`] policy.

mod fields;
mod policy;
pub mod selectors;
mod structured;

pub use fields::labelled_value;
pub use policy::{all_values, clean_text, first_value};
pub use structured::extract_sku;

use crate::config::LinkRules;
use crate::item::{PartialRecord, TextField};
use crate::url::is_product_page;
use crate::ExtractError;
use scraper::Html;

/// Extraction function for a scalar text field
pub type TextExtractor = fn(&Html) -> Option<String>;

/// Scalar fields and the function extracting each of them
pub const TEXT_FIELDS: &[(TextField, TextExtractor)] = &[
    (TextField::Title, fields::title),
    (TextField::Brand, fields::brand),
    (TextField::Description, fields::description),
    (TextField::ImageUrls, fields::image_urls),
    (TextField::Type, fields::product_type),
    (TextField::Finition, fields::finition),
    (TextField::Variure, fields::variure),
];

/// Extracts a partial product record from a page
///
/// Returns `Ok(None)` when the URL is not a product page: such pages are
/// crawled for links only.
///
/// # Errors
///
/// Fails when the SKU cannot be read from the structured data. No partial
/// record is produced in that case since the stock lookup cannot be built.
///
/// # Example
///
/// ```
/// use afdb_crawler::config::LinkRules;
/// use afdb_crawler::extract::extract_product;
///
/// let html = r#"<h1><span itemprop="name">Widget</span></h1>
///     <script data-qa="structuredDataProductSEO">{"sku":"SKU123"}</script>"#;
/// let rules = LinkRules::default();
///
/// let record = extract_product("https://www.afdb.fr/foo-SKU123.html", html, &rules)
///     .unwrap()
///     .unwrap();
/// assert_eq!(record.sku.as_deref(), Some("SKU123"));
/// assert_eq!(record.title.as_deref(), Some("Widget"));
///
/// let category = extract_product("https://www.afdb.fr/outillage.html", html, &rules).unwrap();
/// assert!(category.is_none());
/// ```
pub fn extract_product(
    url: &str,
    html: &str,
    rules: &LinkRules,
) -> Result<Option<PartialRecord>, ExtractError> {
    if !is_product_page(url, rules) {
        return Ok(None);
    }

    let document = Html::parse_document(html);
    extract_fields(url, &document).map(Some)
}

/// Fills a fresh record shell from an already parsed product page
pub fn extract_fields(url: &str, document: &Html) -> Result<PartialRecord, ExtractError> {
    let mut record = PartialRecord::new(url);

    for (field, extract) in TEXT_FIELDS {
        if let Some(value) = extract(document) {
            record.set_text(*field, value);
        }
    }

    record.category = fields::category(document);
    record.details = fields::details(document);
    record.sku = Some(extract_sku(document)?);

    Ok(record)
}
