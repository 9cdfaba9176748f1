//! Product records and their assembly
//!
//! A record starts as a [`PartialRecord`] filled from its product page and
//! becomes a [`ProductRecord`] once the stock message is attached.

mod assembler;
mod record;

pub use assembler::{assemble, parse_stock_message};
pub use record::{PartialRecord, ProductRecord, TextField};
