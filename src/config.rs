// src/config.rs
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::time::Duration;
use crate::utils::AppError;
use crate::volby::models::parse_url;

/// Everything one run needs, built by the command-line layer.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// District list page of one territorial unit.
    pub source_url: String,
    /// Results file name without the `.csv` extension.
    pub output_name: String,
    pub output_dir: PathBuf,
    /// Base that relative district links are resolved against.
    pub base_url: String,
    pub request_delay: Duration,
    pub debug: bool,
}

impl RunConfig {
    pub fn validate(&self) -> Result<(), AppError> {
        parse_url(&self.source_url)
            .map_err(|e| AppError::Config(format!("source URL: {}", e)))?;
        parse_url(&self.base_url)
            .map_err(|e| AppError::Config(format!("base URL: {}", e)))?;

        if self.output_name.trim().is_empty() {
            return Err(AppError::Config("output name must not be empty".to_string()));
        }
        if self.output_name.contains(['/', '\\']) {
            return Err(AppError::Config(format!(
                "output name '{}' must not contain path separators, use --output-dir",
                self.output_name
            )));
        }
        Ok(())
    }

    /// Directory for `--debug` captures of this run.
    pub fn debug_dir(&self) -> PathBuf {
        self.output_dir.join("debug").join(&self.output_name)
    }
}

/// Asks for the source URL and output name, one line each.
pub fn prompt_source<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> Result<(String, String), AppError> {
    let source_url = prompt(input, output, "URL of the district list page: ")?;
    let output_name = prompt(input, output, "Output file name (without .csv): ")?;
    Ok((source_url, output_name))
}

fn prompt<R: BufRead, W: Write>(input: &mut R, output: &mut W, label: &str) -> Result<String, AppError> {
    write!(output, "{}", label)?;
    output.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Err(AppError::Config(format!("no answer given for '{}'", label.trim_end_matches([':', ' ']))));
    }
    Ok(line.trim().to_string())
}
