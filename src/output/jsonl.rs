//! JSON Lines feed of product records

use crate::item::ProductRecord;
use crate::output::traits::{ItemSink, OutputResult};
use crate::storage::RunStatus;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Writes one JSON object per line
pub struct JsonLinesSink<W: Write = BufWriter<File>> {
    writer: W,
    written: u64,
}

impl JsonLinesSink<BufWriter<File>> {
    /// Creates (or truncates) the feed file at `path`
    pub fn create(path: &Path) -> OutputResult<Self> {
        let file = File::create(path)?;
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, written: 0 }
    }

    /// Number of records written so far
    pub fn written(&self) -> u64 {
        self.written
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> ItemSink for JsonLinesSink<W> {
    fn name(&self) -> &'static str {
        "jsonl"
    }

    fn write_item(&mut self, record: &ProductRecord) -> OutputResult<()> {
        serde_json::to_writer(&mut self.writer, record)?;
        self.writer.write_all(b"\n")?;
        self.written += 1;
        Ok(())
    }

    fn finish(&mut self, _status: RunStatus) -> OutputResult<()> {
        self.writer.flush()?;
        tracing::debug!("{} records written to the JSON Lines feed", self.written());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use tempfile::TempDir;

    fn record(sku: &str) -> ProductRecord {
        ProductRecord {
            url: format!("https://www.afdb.fr/p-{sku}.html"),
            title: Some("Widget".to_string()),
            brand: None,
            description: None,
            category: vec![],
            image_urls: None,
            sku: sku.to_string(),
            product_type: None,
            finition: None,
            variure: None,
            details: BTreeMap::new(),
            stock: "In Stock".to_string(),
        }
    }

    #[test]
    fn test_one_line_per_record() {
        let mut sink = JsonLinesSink::new(Vec::new());
        sink.write_item(&record("SKU1")).unwrap();
        sink.write_item(&record("SKU2")).unwrap();
        sink.finish(RunStatus::Completed).unwrap();
        assert_eq!(sink.written(), 2);

        let output = String::from_utf8(sink.into_inner()).unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[0],
            r#"{"url":"https://www.afdb.fr/p-SKU1.html","title":"Widget","sku":"SKU1","stock":"In Stock"}"#
        );

        let parsed: ProductRecord = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(parsed, record("SKU2"));
    }

    #[test]
    fn test_file_sink() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("products.jsonl");

        let mut sink = JsonLinesSink::create(&path).unwrap();
        sink.write_item(&record("SKU1")).unwrap();
        sink.finish(RunStatus::Completed).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 1);
        assert!(content.ends_with('\n'));
    }
}
