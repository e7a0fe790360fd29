//! Invoice sections and the table-driven extractor.
//!
//! Each section is plain data: an anchor path, any extra nodes that must be
//! present, and an ordered table of columns. [`Section::extract`] applies that
//! table to a document.

mod buyer;
mod header;
mod line_items;
mod seller;

pub use buyer::BUYER;
pub use header::HEADER;
pub use line_items::LINE_ITEMS;
pub use seller::SELLER;

use std::fmt;
use std::str::FromStr;

use roxmltree::Node;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::KsefError;
use crate::models::config::{ExtractionConfig, MissingAnchor};
use crate::models::record::Record;
use crate::xml::{FieldPath, InvoiceDocument};

/// The four semantic sections of an FA(2) invoice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    /// `Podmiot1`, the seller.
    Seller,
    /// `Podmiot2`, the buyer.
    Buyer,
    /// `Fa`, general invoice data.
    Header,
    /// `FaWiersz`, one record per invoice line.
    #[serde(rename = "lines")]
    LineItems,
}

impl SectionKind {
    /// All sections, in output order.
    pub const ALL: [SectionKind; 4] = [Self::Seller, Self::Buyer, Self::Header, Self::LineItems];

    /// Short name used on the command line and in the browser bindings.
    pub fn name(self) -> &'static str {
        match self {
            Self::Seller => "seller",
            Self::Buyer => "buyer",
            Self::Header => "header",
            Self::LineItems => "lines",
        }
    }

    /// CSV file the section is written to.
    pub fn file_name(self) -> &'static str {
        match self {
            Self::Seller => "Podmiot1.csv",
            Self::Buyer => "Podmiot2.csv",
            Self::Header => "DaneOgolne.csv",
            Self::LineItems => "DaneWierszowe.csv",
        }
    }

    /// Static definition of the section.
    pub fn section(self) -> &'static Section {
        match self {
            Self::Seller => &SELLER,
            Self::Buyer => &BUYER,
            Self::Header => &HEADER,
            Self::LineItems => &LINE_ITEMS,
        }
    }
}

impl fmt::Display for SectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SectionKind {
    type Err = KsefError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "seller" | "podmiot1" => Ok(Self::Seller),
            "buyer" | "podmiot2" => Ok(Self::Buyer),
            "header" | "fa" | "daneogolne" => Ok(Self::Header),
            "lines" | "line_items" | "fawiersz" | "danewierszowe" => Ok(Self::LineItems),
            _ => Err(KsefError::UnknownSection(s.to_string())),
        }
    }
}

/// Node a column path is resolved against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// The section's anchor node.
    Anchor,
    /// The document's root element.
    Root,
}

/// One output column and where its value lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    /// CSV header name.
    pub name: &'static str,
    /// Element path, relative to `scope`.
    pub path: &'static str,
    pub scope: Scope,
    /// Extra path (same scope) that must resolve before `path` is read.
    pub guard: Option<&'static str>,
}

impl Column {
    /// Column read relative to the anchor node.
    pub const fn new(name: &'static str, path: &'static str) -> Self {
        Self {
            name,
            path,
            scope: Scope::Anchor,
            guard: None,
        }
    }

    /// Column read relative to the document root.
    pub const fn root(name: &'static str, path: &'static str) -> Self {
        Self {
            name,
            path,
            scope: Scope::Root,
            guard: None,
        }
    }

    /// Column whose value is only read when `guard` also resolves.
    pub const fn guarded(self, guard: &'static str) -> Self {
        Self {
            guard: Some(guard),
            ..self
        }
    }

    /// Resolve the column's value from its context node.
    pub fn resolve(&self, context: Node<'_, '_>, namespace: &str) -> Option<String> {
        if let Some(guard) = self.guard {
            FieldPath::parse(guard).find(context, namespace)?;
        }
        FieldPath::parse(self.path).text(context, namespace)
    }
}

/// How the anchor path selects section roots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    /// First match only: one record per document at most.
    Single(&'static str),
    /// Every match: one record per matched node.
    Every(&'static str),
}

impl Anchor {
    pub fn path(&self) -> &'static str {
        match self {
            Self::Single(path) | Self::Every(path) => path,
        }
    }
}

/// Static definition of an invoice section.
#[derive(Debug)]
pub struct Section {
    pub kind: SectionKind,
    /// Root-relative path of the section's node(s).
    pub anchor: Anchor,
    /// Root-relative paths that must exist for the document to yield records.
    pub requires: &'static [&'static str],
    /// Output columns in CSV order.
    pub columns: &'static [Column],
}

impl Section {
    /// Column names in declaration order.
    pub fn column_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.columns.iter().map(|c| c.name)
    }

    /// Position of a column in the table.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    /// Extract this section's records from a document.
    ///
    /// Yields nothing when the anchor or a required node is missing, unless
    /// the configuration asks for a placeholder record.
    pub fn extract(&self, doc: &InvoiceDocument<'_>, config: &ExtractionConfig) -> Vec<Record> {
        let namespace = config.namespace.as_str();
        let root = doc.root();

        let anchor_path = FieldPath::parse(self.anchor.path());
        let anchors = match self.anchor {
            Anchor::Single(_) => anchor_path.find(root, namespace).into_iter().collect(),
            Anchor::Every(_) => anchor_path.find_all(root, namespace),
        };

        let missing = self
            .requires
            .iter()
            .copied()
            .find(|path| FieldPath::parse(path).find(root, namespace).is_none());

        if anchors.is_empty() || missing.is_some() {
            debug!(
                "{}: no {} record ({} missing)",
                doc.source(),
                self.kind,
                missing.unwrap_or(self.anchor.path())
            );
            return match config.missing_anchor {
                MissingAnchor::Skip => Vec::new(),
                MissingAnchor::EmptyRecord => {
                    let shared = self.document_values(root, namespace);
                    vec![self.record(doc, None, &shared, namespace)]
                }
            };
        }

        let shared = self.document_values(root, namespace);
        anchors
            .into_iter()
            .map(|anchor| self.record(doc, Some(anchor), &shared, namespace))
            .collect()
    }

    /// Values of the root-scoped columns, resolved once per document.
    /// Anchor-scoped slots are left empty.
    fn document_values(&self, root: Node<'_, '_>, namespace: &str) -> Vec<Option<String>> {
        self.columns
            .iter()
            .map(|column| match column.scope {
                Scope::Root => column.resolve(root, namespace),
                Scope::Anchor => None,
            })
            .collect()
    }

    fn record(
        &self,
        doc: &InvoiceDocument<'_>,
        anchor: Option<Node<'_, '_>>,
        shared: &[Option<String>],
        namespace: &str,
    ) -> Record {
        let values = self
            .columns
            .iter()
            .zip(shared)
            .map(|(column, shared)| match (column.scope, anchor) {
                (Scope::Root, _) => shared.clone(),
                (Scope::Anchor, Some(node)) => column.resolve(node, namespace),
                (Scope::Anchor, None) => None,
            })
            .collect();

        Record::new(self.kind, doc.source(), values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const NS: &str = crate::models::config::FA2_NAMESPACE;

    fn invoice(body: &str) -> String {
        format!(r#"<?xml version="1.0" encoding="UTF-8"?><Faktura xmlns="{NS}">{body}</Faktura>"#)
    }

    fn extract(kind: SectionKind, xml: &str) -> Vec<Record> {
        let doc = InvoiceDocument::parse("test.xml", xml).unwrap();
        kind.section().extract(&doc, &ExtractionConfig::default())
    }

    #[test]
    fn test_section_names_round_trip() {
        for kind in SectionKind::ALL {
            assert_eq!(kind.name().parse::<SectionKind>().unwrap(), kind);
            assert_eq!(kind.section().kind, kind);
        }
        assert_eq!("Podmiot2".parse::<SectionKind>().unwrap(), SectionKind::Buyer);
        assert!("footer".parse::<SectionKind>().is_err());
    }

    #[test]
    fn test_column_names_unique() {
        for kind in SectionKind::ALL {
            let names: Vec<_> = kind.section().column_names().collect();
            let mut deduped = names.clone();
            deduped.sort_unstable();
            deduped.dedup();
            assert_eq!(names.len(), deduped.len(), "duplicate column in {kind}");
        }
    }

    #[test]
    fn test_seller_and_header_share_p2() {
        let xml = invoice(
            "<Podmiot1><DaneIdentyfikacyjne><NIP>1234567890</NIP></DaneIdentyfikacyjne></Podmiot1>\
             <Fa><P_2>FV/1/2024</P_2></Fa>",
        );
        let seller = extract(SectionKind::Seller, &xml);
        let header = extract(SectionKind::Header, &xml);

        assert_eq!(seller.len(), 1);
        assert_eq!(header.len(), 1);
        assert_eq!(seller[0].get("P_2"), Some("FV/1/2024"));
        assert_eq!(seller[0].get("P_2"), header[0].get("P_2"));
        assert_eq!(seller[0].get("NIP"), Some("1234567890"));
    }

    #[test]
    fn test_seller_requires_fa() {
        let xml = invoice("<Podmiot1><DaneIdentyfikacyjne><NIP>1</NIP></DaneIdentyfikacyjne></Podmiot1>");
        assert!(extract(SectionKind::Seller, &xml).is_empty());
    }

    #[test]
    fn test_buyer_missing_anchor_yields_nothing() {
        let xml = invoice("<Podmiot1/><Fa><P_2>X</P_2></Fa>");
        assert!(extract(SectionKind::Buyer, &xml).is_empty());
    }

    #[test]
    fn test_missing_anchor_empty_record_policy() {
        let xml = invoice("<Fa><P_2>FV/7</P_2></Fa>");
        let doc = InvoiceDocument::parse("no-buyer.xml", &xml).unwrap();
        let config = ExtractionConfig {
            missing_anchor: MissingAnchor::EmptyRecord,
            ..ExtractionConfig::default()
        };

        let records = BUYER.extract(&doc, &config);
        assert_eq!(records.len(), 1);
        // Root-scoped columns still resolve; anchor-scoped ones are empty.
        assert_eq!(records[0].get("P_2"), Some("FV/7"));
        assert_eq!(records[0].get("NIP"), None);
        assert_eq!(records[0].values().len(), BUYER.columns.len());
    }

    #[test]
    fn test_line_items_in_order_with_p2() {
        let xml = invoice(
            "<Fa><P_2>FV/3/2024</P_2>\
               <FaWiersz><NrWierszaFa>1</NrWierszaFa><P_7>Kawa</P_7><P_9A>12,50</P_9A></FaWiersz>\
               <FaWiersz><NrWierszaFa>2</NrWierszaFa><P_7>Herbata</P_7></FaWiersz>\
               <FaWiersz><NrWierszaFa>3</NrWierszaFa><GTIN>5901234123457</GTIN></FaWiersz>\
             </Fa>",
        );
        let lines = extract(SectionKind::LineItems, &xml);

        assert_eq!(lines.len(), 3);
        let numbers: Vec<_> = lines.iter().map(|r| r.get("NrWierszaFa")).collect();
        assert_eq!(numbers, vec![Some("1"), Some("2"), Some("3")]);
        assert!(lines.iter().all(|r| r.get("P_2") == Some("FV/3/2024")));
        assert_eq!(lines[0].get("P_9A"), Some("12,50"));
        assert_eq!(lines[1].get("P_9A"), None);
        assert_eq!(lines[2].get("GTIN"), Some("5901234123457"));
    }

    #[test]
    fn test_zero_lines_yield_nothing() {
        let xml = invoice("<Fa><P_2>FV/0</P_2></Fa>");
        assert!(extract(SectionKind::LineItems, &xml).is_empty());
    }

    #[test]
    fn test_adnotacje_without_zwolnienie() {
        let xml = invoice(
            "<Fa><P_2>FV/9</P_2><Adnotacje><P_16>2</P_16><P_17>2</P_17><P_18>2</P_18></Adnotacje></Fa>",
        );
        let header = extract(SectionKind::Header, &xml);

        assert_eq!(header[0].get("P_16"), Some("2"));
        assert_eq!(header[0].get("P_17"), Some("2"));
        for field in ["P_19", "P_19A", "P_19B", "P_19C", "P_19N"] {
            assert_eq!(header[0].get(field), None, "{field}");
        }
    }

    #[test]
    fn test_p42_5_reads_transport_path_behind_guard() {
        // Value under NoweSrodkiTransportu, but only when Adnotacje/P_42_5 exists.
        let guarded = invoice(
            "<Fa><Adnotacje><P_42_5>1</P_42_5>\
               <NoweSrodkiTransportu><P_42_5>2</P_42_5></NoweSrodkiTransportu>\
             </Adnotacje></Fa>",
        );
        assert_eq!(extract(SectionKind::Header, &guarded)[0].get("P_42_5"), Some("2"));

        let unguarded = invoice(
            "<Fa><Adnotacje><NoweSrodkiTransportu><P_42_5>2</P_42_5></NoweSrodkiTransportu></Adnotacje></Fa>",
        );
        assert_eq!(extract(SectionKind::Header, &unguarded)[0].get("P_42_5"), None);
    }

    #[test]
    fn test_p42_5_guard_without_transport_value() {
        let xml = invoice("<Fa><P_2>FV/5</P_2><Adnotacje><P_42_5>1</P_42_5></Adnotacje></Fa>");
        let header = extract(SectionKind::Header, &xml);

        assert_eq!(header.len(), 1);
        assert_eq!(header[0].get("P_42_5"), None);
        assert_eq!(header[0].get("P_2"), Some("FV/5"));
    }

    #[test]
    fn test_p2_from_first_fa_only() {
        let xml = invoice(
            "<Podmiot1><Nazwa>S</Nazwa></Podmiot1><Podmiot2><NrKlienta>K</NrKlienta></Podmiot2>\
             <Fa/><Fa><P_2>FV/second</P_2></Fa>",
        );

        assert_eq!(extract(SectionKind::Seller, &xml)[0].get("P_2"), None);
        assert_eq!(extract(SectionKind::Buyer, &xml)[0].get("P_2"), None);
        assert_eq!(extract(SectionKind::Header, &xml)[0].get("P_2"), None);
    }

    #[test]
    fn test_many_lines_share_document_p2() {
        let rows: String = (1..=5000)
            .map(|n| format!("<FaWiersz><NrWierszaFa>{n}</NrWierszaFa><P_7>Poz {n}</P_7></FaWiersz>"))
            .collect();
        let xml = invoice(&format!("<Fa><P_2>FV/big</P_2>{rows}</Fa>"));
        let lines = extract(SectionKind::LineItems, &xml);

        assert_eq!(lines.len(), 5000);
        assert!(lines.iter().all(|r| r.get("P_2") == Some("FV/big")));
        assert_eq!(lines[4999].get("NrWierszaFa"), Some("5000"));
        assert_eq!(lines[4999].get("P_7"), Some("Poz 5000"));
    }

    #[test]
    fn test_foreign_namespace_matches_nothing() {
        let xml = r#"<Faktura xmlns="urn:other"><Podmiot1/><Fa><P_2>X</P_2></Fa></Faktura>"#;
        assert!(extract(SectionKind::Seller, xml).is_empty());
        assert!(extract(SectionKind::Header, xml).is_empty());
    }
}
