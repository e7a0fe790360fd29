//! `Podmiot1`: the seller.

use super::{Anchor, Column, Section, SectionKind};

pub static SELLER: Section = Section {
    kind: SectionKind::Seller,
    anchor: Anchor::Single("Podmiot1"),
    requires: &["Fa"],
    columns: &[
        Column::root("P_2", "Fa/P_2"),
        Column::new("PrefiksPodatnika", "PrefiksPodatnika"),
        Column::new("NrEORI", "NrEORI"),
        Column::new("NIP", "DaneIdentyfikacyjne/NIP"),
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
        Column::new("StatusInfoPodatnika", "StatusInfoPodatnika"),
    ],
};
