use crate::item::{PartialRecord, ProductRecord};
use crate::ExtractError;

/// Assembly state of a product record
///
/// A record is `Pending` from the moment its page has been extracted until
/// the stock response is applied. It then becomes `Complete` and is never
/// mutated again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordState {
    /// Page fields extracted, waiting for the stock lookup
    Pending(PartialRecord),

    /// Stock attached, ready to emit
    Complete(ProductRecord),
}

impl RecordState {
    /// Returns true once the stock field has been merged
    pub fn is_complete(&self) -> bool {
        matches!(self, Self::Complete(_))
    }

    /// SKU of the record, if resolved
    pub fn sku(&self) -> Option<&str> {
        match self {
            Self::Pending(partial) => partial.sku.as_deref(),
            Self::Complete(record) => Some(record.sku.as_str()),
        }
    }

    /// Page URL of the record
    pub fn url(&self) -> &str {
        match self {
            Self::Pending(partial) => &partial.url,
            Self::Complete(record) => &record.url,
        }
    }

    /// Moves a pending record to `Complete` with the given stock message
    ///
    /// Completing an already complete record leaves it untouched.
    pub fn complete(self, stock: String) -> Result<Self, ExtractError> {
        match self {
            Self::Pending(partial) => partial.finish(stock).map(Self::Complete),
            complete @ Self::Complete(_) => Ok(complete),
        }
    }

    /// Returns the finished record, or `None` if still pending
    pub fn into_record(self) -> Option<ProductRecord> {
        match self {
            Self::Complete(record) => Some(record),
            Self::Pending(_) => None,
        }
    }
}
