//! Stock request builder
//!
//! Builds the follow-up request against the stock-status API for an
//! extracted SKU.

use crate::StockError;
use url::Url;

/// Builds the stock lookup URL for a SKU
///
/// The SKU is form-encoded, so characters like `&` or spaces cannot break
/// out of the `SKUs` parameter.
///
/// # Example
///
/// ```
/// use afdb_crawler::config::DEFAULT_STOCK_ENDPOINT;
/// use afdb_crawler::stock::build_stock_url;
///
/// let url = build_stock_url(DEFAULT_STOCK_ENDPOINT, "ABC123").unwrap();
/// assert_eq!(
///     url.as_str(),
///     "https://www.afdb.fr/INTERSHOP/web/WFS/AFDB-B2B-Site/fr_FR/-/EUR/IncludeProduct-GetStocks?SKUs=ABC123&ShowMessage=true"
/// );
/// ```
pub fn build_stock_url(endpoint: &str, sku: &str) -> Result<Url, StockError> {
    let mut url = Url::parse(endpoint)?;
    url.set_query(None);
    url.query_pairs_mut()
        .append_pair("SKUs", sku)
        .append_pair("ShowMessage", "true");
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_STOCK_ENDPOINT;

    #[test]
    fn test_default_endpoint() {
        let url = build_stock_url(DEFAULT_STOCK_ENDPOINT, "ABC123").unwrap();
        assert_eq!(
            url.as_str(),
            "https://www.afdb.fr/INTERSHOP/web/WFS/AFDB-B2B-Site/fr_FR/-/EUR/IncludeProduct-GetStocks?SKUs=ABC123&ShowMessage=true"
        );
    }

    #[test]
    fn test_custom_endpoint() {
        let url = build_stock_url("http://127.0.0.1:9000/stock", "SKU123").unwrap();
        assert_eq!(
            url.as_str(),
            "http://127.0.0.1:9000/stock?SKUs=SKU123&ShowMessage=true"
        );
    }

    #[test]
    fn test_sku_is_encoded() {
        let url = build_stock_url(DEFAULT_STOCK_ENDPOINT, "A&B 1").unwrap();
        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("SKUs".to_string(), "A&B 1".to_string()),
                ("ShowMessage".to_string(), "true".to_string())
            ]
        );
    }

    #[test]
    fn test_space_is_form_encoded() {
        let url = build_stock_url("https://www.afdb.fr/stock", "AB 12").unwrap();
        assert_eq!(url.query(), Some("SKUs=AB+12&ShowMessage=true"));
    }

    #[test]
    fn test_endpoint_query_replaced() {
        let url = build_stock_url("https://www.afdb.fr/stock?old=1", "X").unwrap();
        assert_eq!(url.query(), Some("SKUs=X&ShowMessage=true"));
    }

    #[test]
    fn test_invalid_endpoint() {
        assert!(matches!(
            build_stock_url("not an endpoint", "X"),
            Err(StockError::InvalidEndpoint(_))
        ));
    }
}
