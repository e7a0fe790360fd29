//! `FaWiersz`: invoice lines.
//!
//! Every `FaWiersz` anywhere in the document is a record. Fields are searched
//! anywhere beneath their own line, and `P_2` is the first one in the document
//! so each line can be traced back to its invoice.

use super::{Anchor, Column, Section, SectionKind};

pub static LINE_ITEMS: Section = Section {
    kind: SectionKind::LineItems,
    anchor: Anchor::Every(".//FaWiersz"),
    requires: &[],
    columns: &[
        Column::root("P_2", ".//P_2"),
        Column::new("NrWierszaFa", ".//NrWierszaFa"),
        Column::new("UU_ID", ".//UU_ID"),
        Column::new("P_6A", ".//P_6A"),
        Column::new("P_7", ".//P_7"),
        Column::new("Indeks", ".//Indeks"),
        Column::new("GTIN", ".//GTIN"),
        Column::new("PKWiU", ".//PKWiU"),
        Column::new("CN", ".//CN"),
        Column::new("PKOB", ".//PKOB"),
        Column::new("P_8A", ".//P_8A"),
        Column::new("P_8B", ".//P_8B"),
        Column::new("P_9A", ".//P_9A"),
        Column::new("P_9B", ".//P_9B"),
        Column::new("P_10", ".//P_10"),
        Column::new("P_11", ".//P_11"),
        Column::new("P_11A", ".//P_11A"),
        Column::new("P_11Vat", ".//P_11Vat"),
        Column::new("P_12", ".//P_12"),
        Column::new("P_12_XII", ".//P_12_XII"),
        Column::new("P_12_Zal_15", ".//P_12_Zal_15"),
        Column::new("KwotaAkcyzy", ".//KwotaAkcyzy"),
        Column::new("GTU", ".//GTU"),
        Column::new("Procedura", ".//Procedura"),
        Column::new("KursWaluty", ".//KursWaluty"),
        Column::new("StanPrzed", ".//StanPrzed"),
    ],
};
