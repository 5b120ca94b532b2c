//! The fixed stadium-section catalog.

use strum::{Display, EnumString, IntoStaticStr};

/// A stadium section the user can exclude from discount eligibility.
///
/// The catalog is immutable and defined exactly once — it is never
/// derived from request data. Display names double as wire values, so
/// the strings below are part of the backend contract.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumString, IntoStaticStr,
)]
pub enum Section {
    #[strum(serialize = "ARQUIBANCADA NORTE OREO")]
    ArquibancadaNorte,
    #[strum(serialize = "ARQUIBANCADA SUL DIAMANTE NEGRO")]
    ArquibancadaSul,
    #[strum(serialize = "CADEIRA SUPERIOR NORTE OREO")]
    CadeiraSuperiorNorte,
    #[strum(serialize = "CADEIRA SUPERIOR SUL DIAMANTE NEGRO")]
    CadeiraSuperiorSul,
    #[strum(serialize = "CADEIRA ESPECIAL OESTE OURO BRANCO")]
    CadeiraEspecialOeste,
    #[strum(serialize = "CAMAROTE CORPORATIVO SPFC")]
    CamaroteCorporativo,
}

impl Section {
    /// Every section, in catalog order.
    pub const CATALOG: [Self; 6] = [
        Self::ArquibancadaNorte,
        Self::ArquibancadaSul,
        Self::CadeiraSuperiorNorte,
        Self::CadeiraSuperiorSul,
        Self::CadeiraEspecialOeste,
        Self::CamaroteCorporativo,
    ];

    /// The wire/display name.
    pub fn name(self) -> &'static str {
        self.into()
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn catalog_has_six_sections() {
        assert_eq!(Section::CATALOG.len(), 6);
    }

    #[test]
    fn names_round_trip_through_from_str() {
        for section in Section::CATALOG {
            let parsed = Section::from_str(section.name()).expect("catalog name parses");
            assert_eq!(parsed, section);
        }
    }

    #[test]
    fn display_matches_wire_name() {
        assert_eq!(
            Section::CamaroteCorporativo.to_string(),
            "CAMAROTE CORPORATIVO SPFC"
        );
        assert_eq!(
            Section::ArquibancadaNorte.name(),
            "ARQUIBANCADA NORTE OREO"
        );
    }

    #[test]
    fn unknown_name_does_not_parse() {
        assert!(Section::from_str("ARQUIBANCADA LESTE").is_err());
    }
}
