//! Types d'erreurs pour le crate rosreestr

use thiserror::Error;

/// Erreurs pouvant survenir lors de la normalisation des réponses PKK
#[derive(Debug, Error)]
pub enum RosreestrError {
    /// Table de codes inconnue (erreur de configuration)
    #[error("Unknown code table: {0}")]
    UnknownCodeTable(String),

    /// Table de codes embarquée corrompue
    #[error("Corrupt code table {table}: {reason}")]
    CodeTable { table: String, reason: String },

    /// Feature sans numéro cadastral au moment du tri
    #[error("Malformed feature: {0}")]
    MalformedFeature(String),

    /// Géométrie illisible ou non encodable
    #[error("Geometry error: {0}")]
    Geometry(String),

    /// Paire de projections non supportée
    #[error("Unsupported reprojection: EPSG:{from_epsg} -> EPSG:{to_epsg}")]
    UnsupportedProjection { from_epsg: u32, to_epsg: u32 },

    /// Erreur de désérialisation JSON
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl RosreestrError {
    /// Crée une erreur de géométrie avec contexte
    pub fn geometry(reason: impl Into<String>) -> Self {
        Self::Geometry(reason.into())
    }

    /// Crée une erreur de table de codes corrompue
    pub fn code_table(table: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::CodeTable {
            table: table.into(),
            reason: reason.into(),
        }
    }
}
