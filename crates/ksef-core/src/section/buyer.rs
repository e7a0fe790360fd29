//! `Podmiot2`: the buyer.

use super::{Anchor, Column, Section, SectionKind};

pub static BUYER: Section = Section {
    kind: SectionKind::Buyer,
    anchor: Anchor::Single("Podmiot2"),
    requires: &["Fa"],
    columns: &[
        Column::root("P_2", "Fa/P_2"),
        Column::new("NrEORI", "NrEORI"),
        Column::new("NIP", "DaneIdentyfikacyjne/NIP"),
        // Buyers outside Poland are identified by EU VAT number or a foreign ID.
        Column::new("KodUE", "DaneIdentyfikacyjne/KodUE"),
        Column::new("NrVatUE", "DaneIdentyfikacyjne/NrVatUE"),
        Column::new("KodKraju", "DaneIdentyfikacyjne/KodKraju"),
        Column::new("NrID", "DaneIdentyfikacyjne/NrID"),
        Column::new("BrakID", "DaneIdentyfikacyjne/BrakID"),
        Column::new("Nazwa", "DaneIdentyfikacyjne/Nazwa"),
        Column::new("Adres_KodKraju", "Adres/KodKraju"),
        Column::new("Adres_AdresL1", "Adres/AdresL1"),
        Column::new("Adres_AdresL2", "Adres/AdresL2"),
        Column::new("Adres_GLN", "Adres/GLN"),
        Column::new("AdresKoresp_KodKraju", "AdresKoresp/KodKraju"),
        Column::new("AdresKoresp_AdresL1", "AdresKoresp/AdresL1"),
        Column::new("AdresKoresp_AdresL2", "AdresKoresp/AdresL2"),
        Column::new("AdresKoresp_GLN", "AdresKoresp/GLN"),
        Column::new("Email", "DaneKontaktowe/Email"),
        Column::new("Telefon", "DaneKontaktowe/Telefon"),
        Column::new("NrKlienta", "NrKlienta"),
        Column::new("IDNabywcy", "IDNabywcy"),
    ],
};
