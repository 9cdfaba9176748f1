//! Completion of pending records with the stock lookup result

use crate::state::RecordState;
use crate::StockError;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct StockResponse {
    #[serde(default)]
    results: Vec<StockResult>,
}

#[derive(Debug, Deserialize)]
struct StockResult {
    #[serde(default)]
    views: Vec<StockView>,
}

#[derive(Debug, Deserialize)]
struct StockView {
    #[serde(default)]
    result: Vec<StockMessage>,
}

#[derive(Debug, Deserialize)]
struct StockMessage {
    message: Option<String>,
}

/// Reads `results[0].views[0].result[0].message` from a stock response body
///
/// # Errors
///
/// Returns `StockError::Json` if the body is not JSON of the expected types
/// and `StockError::Shape` naming the first missing level otherwise.
///
/// # Example
///
/// ```
/// use afdb_crawler::item::parse_stock_message;
///
/// let body = r#"{"results":[{"views":[{"result":[{"message":"In Stock"}]}]}]}"#;
/// assert_eq!(parse_stock_message(body).unwrap(), "In Stock");
/// ```
pub fn parse_stock_message(body: &str) -> Result<String, StockError> {
    let response: StockResponse = serde_json::from_str(body)?;

    let result = response
        .results
        .into_iter()
        .next()
        .ok_or(StockError::Shape("results[0]"))?;
    let view = result
        .views
        .into_iter()
        .next()
        .ok_or(StockError::Shape("views[0]"))?;
    let entry = view
        .result
        .into_iter()
        .next()
        .ok_or(StockError::Shape("result[0]"))?;

    entry.message.ok_or(StockError::Shape("message"))
}

/// Applies a stock response to a pending record
///
/// A record that is already complete is returned unchanged so it can never be
/// emitted with a second stock value.
///
/// # Errors
///
/// Fails if the response does not carry a stock message, or the pending
/// record has no SKU.
pub fn assemble(state: RecordState, body: &str) -> Result<RecordState, StockError> {
    if state.is_complete() {
        return Ok(state);
    }

    let message = parse_stock_message(body)?;
    Ok(state.complete(message)?)
}
