use indexmap::{IndexMap, IndexSet};
use sha2::{Digest, Sha256};

use super::file::File;
use crate::error::ValidationError;

/// One table row: field name to rendered value, in insertion order.
pub type Row = IndexMap<String, String>;

/// Tabular data with an optional title.
///
/// Rows need not share the same fields. The header is the union of all row
/// keys: the first row's key order comes first, keys first seen in later rows
/// are appended in the order they appear. A row without a header field
/// renders an empty cell for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    rows: Vec<Row>,
    header: Vec<String>,
    title: Option<String>,
}

impl Table {
    pub fn new<I, R, K, V>(rows: I) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: ToString,
    {
        let rows: Vec<Row> = rows
            .into_iter()
            .map(|row| {
                row.into_iter()
                    .map(|(k, v)| (k.into(), v.to_string()))
                    .collect::<Row>()
            })
            .collect();

        if rows.is_empty() {
            return Err(ValidationError::EmptyTable);
        }
        if let Some(index) = rows.iter().position(|r| r.is_empty()) {
            return Err(ValidationError::EmptyRow(index));
        }

        let header = derive_header(&rows);
        Ok(Self {
            rows,
            header,
            title: None,
        })
    }

    /// Replace the derived header with an explicit column list.
    pub fn with_header<I, S>(mut self, columns: I) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut seen = IndexSet::new();
        for column in columns {
            let column = column.into();
            if seen.contains(&column) {
                return Err(ValidationError::DuplicateColumn(column));
            }
            seen.insert(column);
        }
        if seen.is_empty() {
            return Err(ValidationError::EmptyHeader);
        }
        self.header = seen.into_iter().collect();
        Ok(self)
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn header(&self) -> &[String] {
        &self.header
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Value of `column` in `row`, or an empty string when the row lacks it.
    pub fn cell<'a>(row: &'a Row, column: &str) -> &'a str {
        row.get(column).map(String::as_str).unwrap_or("")
    }

    /// Rows as header-ordered cell lists, missing fields filled with `""`.
    pub fn cells(&self) -> impl Iterator<Item = Vec<&str>> + '_ {
        self.rows
            .iter()
            .map(|row| self.header.iter().map(|c| Self::cell(row, c)).collect())
    }

    /// Export the rows as a CSV attachment.
    ///
    /// The file is named `{title stem}_{hash}.csv`, where the stem is the first
    /// 50 characters of the title with spaces replaced by underscores (or
    /// `table` when untitled) and the hash is derived from the cell contents.
    pub fn to_csv_file(&self) -> Result<File, ValidationError> {
        let stem = match &self.title {
            Some(title) => title.chars().take(50).collect::<String>().replace(' ', "_"),
            None => "table".to_string(),
        };
        let name = format!("{stem}_{}.csv", self.content_hash());
        Ok(File::csv(name, self.to_csv()?))
    }

    fn to_csv(&self) -> Result<Vec<u8>, csv::Error> {
        let mut wtr = csv::WriterBuilder::new()
            .terminator(csv::Terminator::CRLF)
            .from_writer(Vec::new());
        wtr.write_record(&self.header)?;
        for cells in self.cells() {
            wtr.write_record(&cells)?;
        }
        wtr.into_inner().map_err(|e| csv::Error::from(e.into_error()))
    }

    fn content_hash(&self) -> String {
        let mut hasher = Sha256::new();
        for row in &self.rows {
            for (k, v) in row {
                hasher.update(k.as_bytes());
                hasher.update([0x1f]);
                hasher.update(v.as_bytes());
                hasher.update([0x1e]);
            }
            hasher.update([0x1d]);
        }
        let hex = format!("{:x}", hasher.finalize());
        hex[..8].to_string()
    }
}

fn derive_header(rows: &[Row]) -> Vec<String> {
    let mut header: IndexSet<&str> = IndexSet::new();
    for row in rows {
        for key in row.keys() {
            header.insert(key.as_str());
        }
    }
    header.into_iter().map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn heterogeneous() -> Table {
        Table::new(vec![
            vec![("host", "db-1"), ("status", "down")],
            vec![("status", "up"), ("region", "eu")],
        ])
        .unwrap()
    }

    #[test]
    fn header_follows_first_row_then_new_keys() {
        let table = heterogeneous();
        assert_eq!(table.header(), ["host", "status", "region"]);
    }

    #[test]
    fn missing_fields_become_empty_cells() {
        let table = heterogeneous();
        let cells: Vec<_> = table.cells().collect();
        assert_eq!(cells[0], vec!["db-1", "down", ""]);
        assert_eq!(cells[1], vec!["", "up", "eu"]);
    }

    #[test]
    fn empty_table_and_rows_rejected() {
        let empty = Table::new(Vec::<Vec<(String, String)>>::new());
        assert!(matches!(empty, Err(ValidationError::EmptyTable)));

        let blank_row = Table::new(vec![vec![("a", "1")], vec![]]);
        assert!(matches!(blank_row, Err(ValidationError::EmptyRow(1))));
    }

    #[test]
    fn explicit_header_validated() {
        let table = heterogeneous().with_header(["region", "host"]).unwrap();
        assert_eq!(table.header(), ["region", "host"]);

        let dup = heterogeneous().with_header(["host", "host"]);
        assert!(matches!(dup, Err(ValidationError::DuplicateColumn(c)) if c == "host"));

        let none = heterogeneous().with_header(Vec::<String>::new());
        assert!(matches!(none, Err(ValidationError::EmptyHeader)));
    }

    #[test]
    fn csv_export_quotes_and_names() {
        let table = Table::new(vec![vec![("name", "a,b"), ("note", "say \"hi\"")]])
            .unwrap()
            .with_title("Nightly job report");
        let file = table.to_csv_file().unwrap();

        assert!(file.name().starts_with("Nightly_job_report_"));
        assert!(file.name().ends_with(".csv"));
        assert_eq!(file.mime_type(), "text/csv");
        let body = String::from_utf8(file.bytes().to_vec()).unwrap();
        assert_eq!(body, "name,note\r\n\"a,b\",\"say \"\"hi\"\"\"\r\n");
    }

    #[test]
    fn csv_export_fills_missing_cells_in_header_order() {
        let file = heterogeneous().to_csv_file().unwrap();
        let body = String::from_utf8(file.bytes().to_vec()).unwrap();
        assert_eq!(body, "host,status,region\r\ndb-1,down,\r\n,up,eu\r\n");
    }

    #[test]
    fn csv_name_is_stable_and_content_dependent() {
        let a = heterogeneous().to_csv_file().unwrap();
        let b = heterogeneous().to_csv_file().unwrap();
        let c = Table::new(vec![vec![("host", "db-2")]]).unwrap().to_csv_file().unwrap();
        assert_eq!(a.name(), b.name());
        assert!(a.name().starts_with("table_"));
        assert_ne!(a.name(), c.name());
    }
}
