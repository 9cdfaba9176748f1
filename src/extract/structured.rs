//! SKU extraction from the embedded structured-data script.

use crate::extract::selectors;
use crate::ExtractError;
use scraper::Html;
use serde_json::Value;

/// Extracts the product SKU from the page's structured-data JSON
///
/// The first `script[data-qa="structuredDataProductSEO"]` element is parsed
/// as JSON and its top-level `sku` key returned. A numeric SKU is rendered
/// as its decimal string.
///
/// # Errors
///
/// * `ExtractError::MissingStructuredData` - no such script on the page
/// * `ExtractError::MalformedStructuredData` - the script is not valid JSON
/// * `ExtractError::MissingSku` - the JSON has no string or numeric `sku`
///
/// # Example
///
/// ```
/// use afdb_crawler::extract::extract_sku;
/// use scraper::Html;
///
/// let page = Html::parse_document(
///     r#"<script data-qa="structuredDataProductSEO">{"sku":"ABC123"}</script>"#,
/// );
/// assert_eq!(extract_sku(&page).unwrap(), "ABC123");
/// ```
pub fn extract_sku(document: &Html) -> Result<String, ExtractError> {
    let script = document
        .select(&selectors::STRUCTURED_DATA)
        .next()
        .ok_or(ExtractError::MissingStructuredData)?;

    let raw: String = script.text().collect();
    let data: Value = serde_json::from_str(raw.trim())?;

    match data.get("sku") {
        Some(Value::String(sku)) if !sku.trim().is_empty() => Ok(sku.clone()),
        Some(Value::Number(sku)) => Ok(sku.to_string()),
        _ => Err(ExtractError::MissingSku),
    }
}
