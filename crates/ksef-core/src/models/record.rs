//! Extracted records and per-section datasets.

use serde::ser::{SerializeMap, SerializeStruct};
use serde::{Serialize, Serializer};

use crate::section::{Section, SectionKind};

/// Header name of the optional document-name column.
pub const SOURCE_COLUMN: &str = "source";

/// Values for one anchor node of one document.
///
/// Values are stored in the section's column order, one slot per column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    section: SectionKind,
    source: String,
    values: Vec<Option<String>>,
}

impl Record {
    /// Create a record. `values` must have one entry per column of `section`.
    pub fn new(section: SectionKind, source: impl Into<String>, values: Vec<Option<String>>) -> Self {
        debug_assert_eq!(values.len(), section.section().columns.len());
        Self {
            section,
            source: source.into(),
            values,
        }
    }

    pub fn section(&self) -> SectionKind {
        self.section
    }

    /// Name of the document the record came from.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn values(&self) -> &[Option<String>] {
        &self.values
    }

    /// Value of a named column. `None` for an empty value or an unknown column.
    pub fn get(&self, column: &str) -> Option<&str> {
        let index = self.section.section().column_index(column)?;
        self.values.get(index)?.as_deref()
    }

    /// Values as CSV cells, with empty values as `""`.
    pub fn cells(&self, include_source: bool) -> Vec<&str> {
        let source = include_source.then_some(self.source.as_str());
        source
            .into_iter()
            .chain(self.values.iter().map(|v| v.as_deref().unwrap_or_default()))
            .collect()
    }
}

impl Serialize for Record {
    /// A map of column name to value (or `null`), in column order.
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let section = self.section.section();
        let mut map = serializer.serialize_map(Some(self.values.len() + 1))?;
        map.serialize_entry(SOURCE_COLUMN, &self.source)?;
        for (name, value) in section.column_names().zip(&self.values) {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// All records of one section, in enumeration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dataset {
    section: SectionKind,
    records: Vec<Record>,
}

impl Dataset {
    pub fn new(section: SectionKind) -> Self {
        Self {
            section,
            records: Vec::new(),
        }
    }

    pub fn section(&self) -> SectionKind {
        self.section
    }

    /// Static definition of the section the dataset holds.
    pub fn definition(&self) -> &'static Section {
        self.section.section()
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Append records, keeping their order.
    pub fn extend(&mut self, records: impl IntoIterator<Item = Record>) {
        for record in records {
            debug_assert_eq!(record.section, self.section);
            self.records.push(record);
        }
    }

    /// CSV header row.
    pub fn header(&self, include_source: bool) -> Vec<&'static str> {
        include_source
            .then_some(SOURCE_COLUMN)
            .into_iter()
            .chain(self.definition().column_names())
            .collect()
    }

    /// Every value of one column, in record order.
    pub fn column<'a>(&'a self, name: &'a str) -> impl Iterator<Item = Option<&'a str>> + 'a {
        self.records.iter().map(move |r| r.get(name))
    }

    /// Text-only view of the dataset, as rendered to CSV.
    pub fn to_table(&self, include_source: bool) -> Table {
        Table {
            section: self.section,
            columns: self.header(include_source).into_iter().map(String::from).collect(),
            rows: self
                .records
                .iter()
                .map(|r| r.cells(include_source).into_iter().map(String::from).collect())
                .collect(),
        }
    }
}

impl Serialize for Dataset {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Dataset", 2)?;
        state.serialize_field("section", &self.section)?;
        state.serialize_field("records", &self.records)?;
        state.end()
    }
}

/// Column names plus rows of text cells.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Table {
    pub section: SectionKind,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn seller(source: &str, nip: Option<&str>) -> Record {
        let section = SectionKind::Seller.section();
        let mut values = vec![None; section.columns.len()];
        values[section.column_index("NIP").unwrap()] = nip.map(String::from);
        values[section.column_index("P_2").unwrap()] = Some("FV/1".to_string());
        Record::new(SectionKind::Seller, source, values)
    }

    #[test]
    fn test_get_by_column_name() {
        let record = seller("a.xml", Some("1234567890"));
        assert_eq!(record.get("NIP"), Some("1234567890"));
        assert_eq!(record.get("Email"), None);
        assert_eq!(record.get("NoSuchColumn"), None);
    }

    #[test]
    fn test_cells_render_empty_values() {
        let record = seller("a.xml", None);
        let cells = record.cells(true);

        assert_eq!(cells.len(), SectionKind::Seller.section().columns.len() + 1);
        assert_eq!(cells[0], "a.xml");
        assert_eq!(cells[1], "FV/1");
        assert!(cells[2..].iter().all(|c| c.is_empty()));
    }

    #[test]
    fn test_dataset_header_and_column() {
        let mut dataset = Dataset::new(SectionKind::Seller);
        dataset.extend([seller("a.xml", Some("1")), seller("b.xml", None)]);

        assert_eq!(dataset.header(false)[..2].to_vec(), vec!["P_2", "PrefiksPodatnika"]);
        assert_eq!(dataset.header(true)[0], SOURCE_COLUMN);
        assert_eq!(dataset.column("NIP").collect::<Vec<_>>(), vec![Some("1"), None]);
    }

    #[test]
    fn test_record_json_keeps_column_order_and_nulls() {
        let json = serde_json::to_string(&seller("a.xml", None)).unwrap();

        assert!(json.starts_with(r#"{"source":"a.xml","P_2":"FV/1","PrefiksPodatnika":null"#));
        assert!(json.contains(r#""NIP":null"#));
    }

    #[test]
    fn test_table_matches_records() {
        let mut dataset = Dataset::new(SectionKind::Seller);
        dataset.extend([seller("a.xml", Some("1"))]);
        let table = dataset.to_table(false);

        assert_eq!(table.columns.len(), table.rows[0].len());
        assert_eq!(table.rows[0][3], "1");
    }
}
