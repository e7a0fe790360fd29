//! `Fa`: general invoice data, VAT brackets and annotations.

use super::{Anchor, Column, Section, SectionKind};

pub static HEADER: Section = Section {
    kind: SectionKind::Header,
    anchor: Anchor::Single("Fa"),
    requires: &[],
    columns: &[
        Column::new("KodWaluty", "KodWaluty"),
        Column::new("P_1", "P_1"),
        Column::new("P_1M", "P_1M"),
        Column::new("P_2", "P_2"),
        Column::new("P_6", "P_6"),
        Column::new("P_6_Od", "P_6_Od"),
        Column::new("P_6_Do", "P_6_Do"),
        // Net, tax and converted tax per VAT rate bracket.
        Column::new("P_13_1", "P_13_1"),
        Column::new("P_14_1", "P_14_1"),
        Column::new("P_14_1W", "P_14_1W"),
        Column::new("P_13_2", "P_13_2"),
        Column::new("P_14_2", "P_14_2"),
        Column::new("P_14_2W", "P_14_2W"),
        Column::new("P_13_3", "P_13_3"),
        Column::new("P_14_3", "P_14_3"),
        Column::new("P_14_3W", "P_14_3W"),
        Column::new("P_13_4", "P_13_4"),
        Column::new("P_14_4", "P_14_4"),
        Column::new("P_14_4W", "P_14_4W"),
        Column::new("P_13_5", "P_13_5"),
        Column::new("P_14_5", "P_14_5"),
        Column::new("P_13_6_1", "P_13_6_1"),
        Column::new("P_13_6_2", "P_13_6_2"),
        Column::new("P_13_6_3", "P_13_6_3"),
        Column::new("P_13_7", "P_13_7"),
        Column::new("P_13_8", "P_13_8"),
        Column::new("P_13_9", "P_13_9"),
        Column::new("P_13_10", "P_13_10"),
        Column::new("P_13_11", "P_13_11"),
        Column::new("P_15", "P_15"),
        Column::new("KursWalutyZ", "KursWalutyZ"),
        Column::new("RodzajFaktury", "RodzajFaktury"),
        Column::new("P_16", "Adnotacje/P_16"),
        Column::new("P_17", "Adnotacje/P_17"),
        Column::new("P_18", "Adnotacje/P_18"),
        Column::new("P_18A", "Adnotacje/P_18A"),
        Column::new("P_19", "Adnotacje/Zwolnienie/P_19"),
        Column::new("P_19A", "Adnotacje/Zwolnienie/P_19A"),
        Column::new("P_19B", "Adnotacje/Zwolnienie/P_19B"),
        Column::new("P_19C", "Adnotacje/Zwolnienie/P_19C"),
        Column::new("P_19N", "Adnotacje/Zwolnienie/P_19N"),
        Column::new("P_22", "Adnotacje/NoweSrodkiTransportu/P_22"),
        // Existence is checked directly under Adnotacje, the value is read under
        // NoweSrodkiTransportu. Kept as-is until checked against the FA(2) XSD.
        Column::new("P_42_5", "Adnotacje/NoweSrodkiTransportu/P_42_5").guarded("Adnotacje/P_42_5"),
        Column::new("P_22N", "Adnotacje/NoweSrodkiTransportu/P_22N"),
        Column::new("P_23", "Adnotacje/P_23"),
        Column::new("P_PMarzy", "Adnotacje/PMarzy/P_PMarzy"),
        Column::new("P_PMarzy_2", "Adnotacje/PMarzy/P_PMarzy_2"),
        Column::new("P_PMarzy_3_1", "Adnotacje/PMarzy/P_PMarzy_3_1"),
        Column::new("P_PMarzy_3_2", "Adnotacje/PMarzy/P_PMarzy_3_2"),
        Column::new("P_PMarzy_3_3", "Adnotacje/PMarzy/P_PMarzy_3_3"),
        Column::new("P_PMarzyN", "Adnotacje/PMarzy/P_PMarzyN"),
    ],
};
