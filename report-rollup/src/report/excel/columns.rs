//! Header synonyms and flag coercion for report sheets

use std::collections::HashMap;

use calamine::Data;
use serde::{Deserialize, Serialize};

use super::workbook::cell_text;
use crate::report::text::fold;
use crate::report::types::cols;

/// How a folded header is tested against a synonym
#[derive(Debug, Clone, Copy)]
enum Pattern {
    Exact(&'static str),
    Prefix(&'static str),
    Contains(&'static str),
    ContainsAll(&'static [&'static str]),
}

impl Pattern {
    fn matches(&self, header: &str) -> bool {
        match self {
            Pattern::Exact(s) => header == *s,
            Pattern::Prefix(s) => header.starts_with(*s),
            Pattern::Contains(s) => header.contains(*s),
            Pattern::ContainsAll(parts) => parts.iter().all(|p| header.contains(*p)),
        }
    }
}

/// Synonym table, evaluated top to bottom; first match wins
const SYNONYMS: &[(&str, &[Pattern])] = &[
    (
        cols::CHAMP_ZONE,
        &[Pattern::Prefix("champ / zone"), Pattern::Exact("champ zone")],
    ),
    (
        cols::PLATEFORME_SOUS_ZONE,
        &[Pattern::Contains("plateforme"), Pattern::Contains("platerforme")],
    ),
    (
        cols::NUM_PUITS,
        &[
            Pattern::Prefix("n° puits"),
            Pattern::Contains("n puits"),
            Pattern::Prefix("n°puits"),
        ],
    ),
    (
        cols::TAG_EQUIPEMENT,
        &[Pattern::Contains("tag equipement"), Pattern::Exact("tag")],
    ),
    (
        cols::SOUS_EQUIPEMENT,
        &[
            Pattern::Contains("sous-equipement"),
            Pattern::Contains("sous equipement"),
            Pattern::Contains("sous- equipement"),
        ],
    ),
    (cols::INDISPONIBLE, &[Pattern::Exact("indisponible")]),
    (cols::METIER, &[Pattern::Exact("metier")]),
    (
        cols::TRAVAUX_COMMENTAIRES,
        &[Pattern::ContainsAll(&["travail effectue", "commentaires"])],
    ),
    (cols::TERMINE, &[Pattern::Prefix("termine")]),
    (cols::EN_COURS, &[Pattern::Prefix("en cours")]),
    (cols::REPORTE, &[Pattern::Prefix("report")]),
];

/// Map a raw header to its canonical column name.
///
/// Unrecognised headers come back lower-cased and accent-stripped.
pub fn canonical_column(header: &str) -> String {
    let folded = fold(header);
    SYNONYMS
        .iter()
        .find(|(_, patterns)| patterns.iter().any(|p| p.matches(&folded)))
        .map(|(name, _)| name.to_string())
        .unwrap_or(folded)
}

/// Canonical column name → position in the sheet
#[derive(Debug, Clone, Default)]
pub struct ColumnIndex {
    positions: HashMap<String, usize>,
}

impl ColumnIndex {
    /// Index a header row; when two headers map to the same name the leftmost wins
    pub fn from_header(header: &[Data]) -> Self {
        let mut positions = HashMap::new();
        for (col, cell) in header.iter().enumerate() {
            let raw = cell_text(cell).unwrap_or_default();
            positions.entry(canonical_column(&raw)).or_insert(col);
        }
        Self { positions }
    }

    pub fn get(&self, name: &str) -> Option<usize> {
        self.positions.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.positions.contains_key(name)
    }
}

/// Tokens that mark a flag column as ticked
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlagTokens {
    pub truthy: Vec<String>,
}

impl Default for FlagTokens {
    fn default() -> Self {
        Self {
            truthy: ["1", "true", "vrai", "oui", "yes", "y", "t", "x"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl FlagTokens {
    /// Coerce a cell to a flag; anything not in the token list is false
    pub fn is_set(&self, cell: &Data) -> bool {
        match cell {
            Data::Bool(b) => *b,
            other => cell_text(other)
                .map(|raw| {
                    let token = raw.trim().to_lowercase();
                    self.truthy.iter().any(|t| t.trim().to_lowercase() == token)
                })
                .unwrap_or(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_columns_map_variants() {
        let headers = [
            "Champ / Zone",
            "plateforme/sous-zone",
            "N° puits",
            "TAG équipement",
            "Sous equipement",
            "Métier",
            "Travail effectue + commentaires",
            "Reporté",
        ];
        let mapped: Vec<String> = headers.iter().map(|h| canonical_column(h)).collect();
        assert_eq!(
            mapped,
            vec![
                "champ_zone",
                "plateforme_sous_zone",
                "num_puits",
                "tag_equipement",
                "sous_equipement",
                "metier",
                "travaux_commentaires",
                "reporte",
            ]
        );
    }

    #[test]
    fn test_canonical_columns_more_variants() {
        assert_eq!(canonical_column("Champ Zone"), "champ_zone");
        assert_eq!(canonical_column("Platerforme"), "plateforme_sous_zone");
        assert_eq!(canonical_column("TAG"), "tag_equipement");
        assert_eq!(canonical_column("Sous-Équipement"), "sous_equipement");
        assert_eq!(canonical_column("Terminé"), "termine");
        assert_eq!(canonical_column("En cours"), "en_cours");
        assert_eq!(canonical_column(" Indisponible "), "indisponible");
    }

    #[test]
    fn test_unknown_headers_pass_through_folded() {
        assert_eq!(canonical_column("Responsable  Équipe"), "responsable equipe");
        assert_eq!(canonical_column(""), "");
    }

    #[test]
    fn test_column_index_keeps_leftmost_duplicate() {
        let header = vec![
            Data::String("Champ / Zone".to_string()),
            Data::String("Métier".to_string()),
            Data::String("Champ zone".to_string()),
        ];
        let index = ColumnIndex::from_header(&header);
        assert_eq!(index.get(cols::CHAMP_ZONE), Some(0));
        assert_eq!(index.get(cols::METIER), Some(1));
        assert!(!index.contains(cols::TERMINE));
    }

    #[test]
    fn test_flag_tokens() {
        let tokens = FlagTokens::default();
        let s = |v: &str| Data::String(v.to_string());
        for truthy in ["1", "TRUE", "Vrai", "oui", " x ", "Y", "t"] {
            assert!(tokens.is_set(&s(truthy)), "{truthy} should be set");
        }
        for falsy in ["0", "non", "false", "", "done"] {
            assert!(!tokens.is_set(&s(falsy)), "{falsy} should not be set");
        }
        assert!(tokens.is_set(&Data::Bool(true)));
        assert!(!tokens.is_set(&Data::Bool(false)));
        assert!(tokens.is_set(&Data::Int(1)));
        assert!(tokens.is_set(&Data::Float(1.0)));
        assert!(!tokens.is_set(&Data::Empty));
    }
}
