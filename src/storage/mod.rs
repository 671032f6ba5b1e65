// src/storage/mod.rs
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use crate::extractors::results::{ColumnHeader, ResultRow};
use crate::utils::error::StorageError;

pub struct StorageManager {
    base_dir: PathBuf,
}

impl StorageManager {
    /// Creates a StorageManager writing into `base_dir`. The directory is only
    /// created once a results file is opened.
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Self {
        Self { base_dir: base_dir.as_ref().to_path_buf() }
    }

    /// Path of the results file for `output_name` (given without extension).
    pub fn results_path(&self, output_name: &str) -> PathBuf {
        self.base_dir.join(format!("{}.csv", output_name))
    }

    /// Opens the results file and writes the header row.
    pub fn create_results(&self, output_name: &str, header: &ColumnHeader) -> Result<ResultsWriter<File>, StorageError> {
        if !self.base_dir.exists() {
            fs::create_dir_all(&self.base_dir)?;
        }

        let file_path = self.results_path(output_name);
        let file = File::create(&file_path)?;
        tracing::info!("Writing results to {}", file_path.display());

        ResultsWriter::new(file, header)
    }
}

/// CSV writer for one run's results table.
pub struct ResultsWriter<W: Write> {
    writer: csv::Writer<W>,
    width: usize,
    rows: usize,
}

impl<W: Write> ResultsWriter<W> {
    pub fn new(inner: W, header: &ColumnHeader) -> Result<Self, StorageError> {
        let mut writer = csv::Writer::from_writer(inner);
        writer.write_record(header.columns())?;
        Ok(Self { writer, width: header.len(), rows: 0 })
    }

    pub fn write_row(&mut self, row: &ResultRow) -> Result<(), StorageError> {
        let fields = row.fields();
        if fields.len() != self.width {
            return Err(StorageError::RowWidth { expected: self.width, found: fields.len() });
        }
        self.writer.write_record(&fields)?;
        self.rows += 1;
        Ok(())
    }

    /// Flushes the output and returns the number of data rows written.
    pub fn finish(mut self) -> Result<usize, StorageError> {
        self.writer.flush()?;
        tracing::debug!("Flushed {} result rows", self.rows);
        Ok(self.rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::Html;

    fn header(parties: &[&str]) -> ColumnHeader {
        let cells: String = parties
            .iter()
            .map(|p| format!(r#"<tr><td headers="t1sa1 t1sb2">{}</td></tr>"#, p))
            .collect();
        let doc = Html::parse_document(&format!("<table>{}</table>", cells));
        ColumnHeader::derive(&doc).unwrap()
    }

    fn row(code: &str, name: &str, votes: Vec<u64>) -> ResultRow {
        ResultRow {
            code: code.to_string(),
            name: name.to_string(),
            registered: 100,
            envelopes: 90,
            valid: 80,
            votes,
        }
    }

    #[test]
    fn test_results_file_layout() {
        let dir = tempfile::tempdir().unwrap();
        let storage = StorageManager::new(dir.path().join("out"));
        let header = header(&["X", "Strana, z.s."]);

        let mut writer = storage.create_results("kraj", &header).unwrap();
        writer.write_row(&row("1", "Benešov", vec![30, 50])).unwrap();
        assert_eq!(writer.finish().unwrap(), 1);

        let written = fs::read_to_string(storage.results_path("kraj")).unwrap();
        assert_eq!(
            written,
            "code,location,registered,envelopes,valid,X,\"Strana, z.s.\"\n1,Benešov,100,90,80,30,50\n"
        );
    }

    #[test]
    fn test_row_width_must_match_header() {
        let mut writer = ResultsWriter::new(Vec::new(), &header(&["X", "Y"])).unwrap();
        let err = writer.write_row(&row("1", "A", vec![1])).unwrap_err();
        assert!(matches!(err, StorageError::RowWidth { expected: 7, found: 6 }));
    }

    #[test]
    fn test_nothing_created_before_open() {
        let dir = tempfile::tempdir().unwrap();
        let storage = StorageManager::new(dir.path().join("later"));
        assert_eq!(storage.results_path("x"), dir.path().join("later").join("x.csv"));
        assert!(!dir.path().join("later").exists());
    }
}
