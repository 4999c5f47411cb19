//! Daily fact rows as read from a single report sheet

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::report::key::ActionKey;

/// Canonical column names shared by the normalizer and the table writers
pub mod cols {
    pub const ACTION_KEY: &str = "action_key";
    pub const DATE_RAPPORT: &str = "date_rapport";
    pub const CHAMP_ZONE: &str = "champ_zone";
    pub const PLATEFORME_SOUS_ZONE: &str = "plateforme_sous_zone";
    pub const NUM_PUITS: &str = "num_puits";
    pub const TAG_EQUIPEMENT: &str = "tag_equipement";
    pub const SOUS_EQUIPEMENT: &str = "sous_equipement";
    pub const METIER: &str = "metier";
    pub const TRAVAUX_COMMENTAIRES: &str = "travaux_commentaires";
    pub const TERMINE: &str = "termine";
    pub const EN_COURS: &str = "en_cours";
    pub const REPORTE: &str = "reporte";
    pub const INDISPONIBLE: &str = "indisponible";
    pub const FEUILLE: &str = "feuille";
    pub const CHANGE_DESC: &str = "change_desc";
}

/// The seven free-text fields that describe an action.
///
/// These are the only inputs to the action key, in this order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionFields {
    pub champ_zone: String,
    pub plateforme_sous_zone: String,
    pub num_puits: String,
    pub tag_equipement: String,
    pub sous_equipement: String,
    pub metier: String,
    pub travaux_commentaires: String,
}

impl ActionFields {
    /// Column names in key order
    pub const COLUMNS: [&'static str; 7] = [
        cols::CHAMP_ZONE,
        cols::PLATEFORME_SOUS_ZONE,
        cols::NUM_PUITS,
        cols::TAG_EQUIPEMENT,
        cols::SOUS_EQUIPEMENT,
        cols::METIER,
        cols::TRAVAUX_COMMENTAIRES,
    ];

    /// Field values in key order
    pub fn values(&self) -> [&str; 7] {
        [
            &self.champ_zone,
            &self.plateforme_sous_zone,
            &self.num_puits,
            &self.tag_equipement,
            &self.sous_equipement,
            &self.metier,
            &self.travaux_commentaires,
        ]
    }

    /// Mutable slots paired with their column name, in key order
    pub fn slots_mut(&mut self) -> [(&'static str, &mut String); 7] {
        [
            (cols::CHAMP_ZONE, &mut self.champ_zone),
            (cols::PLATEFORME_SOUS_ZONE, &mut self.plateforme_sous_zone),
            (cols::NUM_PUITS, &mut self.num_puits),
            (cols::TAG_EQUIPEMENT, &mut self.tag_equipement),
            (cols::SOUS_EQUIPEMENT, &mut self.sous_equipement),
            (cols::METIER, &mut self.metier),
            (cols::TRAVAUX_COMMENTAIRES, &mut self.travaux_commentaires),
        ]
    }

    /// True when every descriptive field is empty after trimming
    pub fn is_blank(&self) -> bool {
        self.values().iter().all(|v| v.trim().is_empty())
    }
}

/// Status flags exactly as ticked on one day's sheet
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawFlags {
    pub termine: bool,
    pub en_cours: bool,
    pub reporte: bool,
    pub indisponible: bool,
}

/// One action occurrence on one report day.
///
/// Rows of the daily table are never modified after assembly; the rollup keeps
/// its derived flags on separate [`RolledAction`](super::RolledAction) rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyFact {
    pub action_key: ActionKey,
    pub date_rapport: Option<NaiveDate>,
    #[serde(flatten)]
    pub fields: ActionFields,
    #[serde(flatten)]
    pub flags: RawFlags,
    /// Name of the sheet the row came from
    pub feuille: String,
}

impl DailyFact {
    /// Build a fact, deriving its key from the descriptive fields
    pub fn new(
        fields: ActionFields,
        flags: RawFlags,
        date_rapport: Option<NaiveDate>,
        feuille: impl Into<String>,
    ) -> Self {
        Self {
            action_key: ActionKey::from_fields(&fields),
            date_rapport,
            fields,
            flags,
            feuille: feuille.into(),
        }
    }
}
