//! Import and export of quote collections as JSON documents.
//!
//! # Document Format
//!
//! An export is the collection as a pretty-printed JSON array (2-space
//! indentation):
//!
//! ```json
//! [
//!   {
//!     "text": "Stay hungry, stay foolish.",
//!     "category": "Motivation"
//!   }
//! ]
//! ```
//!
//! An import must be an array in which every element is an object carrying
//! `text` and `category` fields. Extra fields are ignored. Numbers and
//! booleans are stored as their JSON text; `null`, arrays and objects are
//! rejected. Values are otherwise taken as-is: no trimming, no
//! de-duplication against what is already stored, so importing the same
//! file twice doubles every quote.
//!
//! # File Exchange
//!
//! Moving documents in and out of the process goes through the
//! [`FileExchange`] capability. [`DirectoryExchange`] is the filesystem
//! implementation used by the CLI.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;
use thiserror::Error;

use crate::quotes::Quote;

/// File name offered for exports.
pub const EXPORT_FILE_NAME: &str = "quotes.json";

pub const IMPORT_SUCCESS_MESSAGE: &str = "Quotes imported successfully!";
pub const IMPORT_FAILURE_MESSAGE: &str = "Error importing quotes. Please check the file format.";

/// Why an import document was rejected.
#[derive(Debug, Error)]
pub enum TransferError {
    #[error("Invalid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid quote format: {0}")]
    Shape(String),

    #[error("Could not read import file: {0}")]
    Read(#[source] std::io::Error),
}

// ============================================================================
// EXPORT
// ============================================================================

/// Serialize a collection as a 2-space-indented JSON array.
pub fn export_quotes(quotes: &[Quote]) -> String {
    // Vec<{String, String}> cannot fail to serialize
    serde_json::to_string_pretty(quotes).unwrap_or_else(|_| "[]".to_string())
}

// ============================================================================
// IMPORT
// ============================================================================

/// Parse and validate an import document.
///
/// Returns the quotes in document order, or an error without side effects.
pub fn parse_import(document: &str) -> Result<Vec<Quote>, TransferError> {
    let value: Value = serde_json::from_str(document)?;

    let items = value
        .as_array()
        .ok_or_else(|| TransferError::Shape("document is not an array".to_string()))?;

    items
        .iter()
        .enumerate()
        .map(|(index, item)| quote_from_value(index, item))
        .collect()
}

fn quote_from_value(index: usize, item: &Value) -> Result<Quote, TransferError> {
    let object = item
        .as_object()
        .ok_or_else(|| TransferError::Shape(format!("element {index} is not an object")))?;

    let field = |name: &str| -> Result<String, TransferError> {
        match object.get(name) {
            Some(Value::String(s)) => Ok(s.clone()),
            Some(scalar @ (Value::Number(_) | Value::Bool(_))) => Ok(scalar.to_string()),
            Some(_) => Err(TransferError::Shape(format!(
                "element {index} has a non-scalar `{name}`"
            ))),
            None => Err(TransferError::Shape(format!(
                "element {index} is missing `{name}`"
            ))),
        }
    };

    Ok(Quote::new(field("text")?, field("category")?))
}

// ============================================================================
// FILE EXCHANGE
// ============================================================================

/// Moves documents across the process boundary.
pub trait FileExchange: Send + Sync {
    /// Hand a document to the user under the given file name.
    ///
    /// Returns where the document ended up, for reporting.
    fn offer_download(&self, file_name: &str, contents: &str) -> Result<PathBuf, std::io::Error>;

    /// Read a user-supplied document as UTF-8 text.
    fn read_upload(&self, source: &Path) -> Result<String, std::io::Error>;
}

/// [`FileExchange`] over a plain directory.
#[derive(Debug, Clone)]
pub struct DirectoryExchange {
    dir: PathBuf,
}

impl DirectoryExchange {
    /// Downloads land in `dir`; uploads are read from wherever they point.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl FileExchange for DirectoryExchange {
    fn offer_download(&self, file_name: &str, contents: &str) -> Result<PathBuf, std::io::Error> {
        fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(file_name);
        fs::write(&path, contents)?;
        Ok(path)
    }

    fn read_upload(&self, source: &Path) -> Result<String, std::io::Error> {
        // Relative paths resolve against the exchange directory
        let path = if source.is_absolute() {
            source.to_path_buf()
        } else {
            self.dir.join(source)
        };
        fs::read_to_string(path)
    }
}

// ============================================================================
// TESTS
// ============================================================================
