//! Long-format tabular input for the transaction store
//!
//! A `Table` is a header plus rows of optional text cells. It is the
//! boundary between whatever produced the data (a CSV export, a query
//! result) and `Dataset::from_table`, which groups rows into transactions.

use crate::error::{MiningError, Result};
use std::io::BufRead;

/// Cell spellings treated as missing values
const MISSING_MARKERS: &[&str] = &["", "NA", "NaN", "null", "NULL"];

/// Column-named table of optional string cells
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Option<String>>>,
}

impl Table {
    /// Build a table, checking that every row matches the header width
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Option<String>>>) -> Result<Self> {
        for (index, row) in rows.iter().enumerate() {
            if row.len() != columns.len() {
                return Err(MiningError::MalformedTable {
                    line: index + 2,
                    reason: format!("expected {} fields, found {}", columns.len(), row.len()),
                });
            }
        }
        Ok(Self { columns, rows })
    }

    /// Parse CSV text whose first line is the header
    ///
    /// # Example
    /// ```
    /// use apriori_miner::table::Table;
    ///
    /// let table = Table::from_csv_str("id,item\n1,bread\n1,\n").unwrap();
    /// assert_eq!(table.columns(), &["id", "item"]);
    /// assert_eq!(table.rows()[1][1], None);
    /// ```
    pub fn from_csv_str(text: &str) -> Result<Self> {
        let mut columns: Option<Vec<String>> = None;
        let mut rows = Vec::new();

        for (index, line) in logical_lines(text)? {
            if line.trim().is_empty() {
                continue;
            }
            let fields = split_fields(&line, index)?;
            match &columns {
                None => {
                    columns = Some(fields.into_iter().map(Field::into_value).collect());
                }
                Some(header) => {
                    if fields.len() != header.len() {
                        return Err(MiningError::MalformedTable {
                            line: index,
                            reason: format!(
                                "expected {} fields, found {}",
                                header.len(),
                                fields.len()
                            ),
                        });
                    }
                    rows.push(fields.into_iter().map(to_cell).collect());
                }
            }
        }

        let columns = columns.ok_or(MiningError::MalformedTable {
            line: 1,
            reason: "missing header row".to_string(),
        })?;
        Ok(Self { columns, rows })
    }

    /// Read and parse CSV from any buffered reader
    pub fn from_reader<R: BufRead>(mut reader: R) -> Result<Self> {
        let mut text = String::new();
        std::io::Read::read_to_string(&mut reader, &mut text).map_err(|e| {
            MiningError::MalformedTable {
                line: 0,
                reason: format!("read failed: {}", e),
            }
        })?;
        Self::from_csv_str(&text)
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Option<String>>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Index of a named column, or `InvalidInputSchema`
    pub fn column_index(&self, name: &str) -> Result<usize> {
        self.columns
            .iter()
            .position(|c| c == name)
            .ok_or_else(|| MiningError::InvalidInputSchema {
                column: name.to_string(),
                available: self.columns.clone(),
            })
    }

    /// Values of two columns side by side, one pair per row
    pub fn column_pairs(
        &self,
        first: &str,
        second: &str,
    ) -> Result<Vec<(Option<&str>, Option<&str>)>> {
        let a = self.column_index(first)?;
        let b = self.column_index(second)?;
        Ok(self
            .rows
            .iter()
            .map(|row| (row[a].as_deref(), row[b].as_deref()))
            .collect())
    }
}

/// One parsed field; quoted text is kept verbatim, unquoted text is trimmed
struct Field {
    text: String,
    quoted: bool,
}

impl Field {
    fn into_value(self) -> String {
        if self.quoted {
            self.text
        } else {
            self.text.trim().to_string()
        }
    }
}

fn to_cell(field: Field) -> Option<String> {
    let value = field.into_value();
    if MISSING_MARKERS.contains(&value.as_str()) {
        None
    } else {
        Some(value)
    }
}

/// Join physical lines so quoted fields may contain newlines
///
/// Each entry carries the 1-based line number where the record starts.
fn logical_lines(text: &str) -> Result<Vec<(usize, String)>> {
    let mut records = Vec::new();
    let mut pending: Option<(usize, String)> = None;

    for (index, raw) in text.lines().enumerate() {
        let line_no = index + 1;
        let (start, mut record) = match pending.take() {
            Some((start, mut acc)) => {
                acc.push('\n');
                acc.push_str(raw);
                (start, acc)
            }
            None => (line_no, raw.to_string()),
        };
        if record.ends_with('\r') {
            record.pop();
        }
        if record.matches('"').count() % 2 == 1 {
            pending = Some((start, record));
        } else {
            records.push((start, record));
        }
    }

    if let Some((start, _)) = pending {
        return Err(MiningError::MalformedTable {
            line: start,
            reason: "unterminated quoted field".to_string(),
        });
    }
    Ok(records)
}

/// Split one record on commas, honouring `"..."` quoting with `""` escapes
fn split_fields(record: &str, line: usize) -> Result<Vec<Field>> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut quoted = false;
    let mut in_quotes = false;
    let mut chars = record.chars().peekable();

    while let Some(c) = chars.next() {
        match (c, in_quotes) {
            ('"', true) => {
                if chars.peek() == Some(&'"') {
                    current.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            }
            ('"', false) => {
                if quoted || !current.trim().is_empty() {
                    return Err(MiningError::MalformedTable {
                        line,
                        reason: "quote inside unquoted field".to_string(),
                    });
                }
                current.clear();
                quoted = true;
                in_quotes = true;
            }
            (',', false) => fields.push(Field {
                text: std::mem::take(&mut current),
                quoted: std::mem::take(&mut quoted),
            }),
            // Padding between a closing quote and the next comma
            (other, false) if quoted && other.is_whitespace() => {}
            (_, false) if quoted => {
                return Err(MiningError::MalformedTable {
                    line,
                    reason: "text after closing quote".to_string(),
                });
            }
            (other, _) => current.push(other),
        }
    }
    fields.push(Field {
        text: current,
        quoted,
    });
    Ok(fields)
}
