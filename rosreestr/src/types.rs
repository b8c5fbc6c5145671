//! Types de données pour le crate rosreestr

use serde::Serialize;

/// Emprise d'une feature : [xmin, ymin, xmax, ymax] dans le SRS cible.
/// Les bornes absentes restent à `None` (sérialisées en `null`).
pub type Extent = [Option<f64>; 4];

/// Une parcelle cadastrale normalisée, indépendante de la forme de la
/// réponse amont (tableau plat historique ou GeoJSON).
///
/// Construite une fois par la normalisation puis jamais mutée.
#[derive(Debug, Clone, Serialize)]
pub struct PkkFeature {
    /// Type de l'objet tel que rapporté par l'amont
    pub typeobj: Option<String>,

    /// Numéro cadastral (segments séparés par `:`) - clé de tri
    pub numbpkk: String,

    /// Catégorie de terres (libellé résolu)
    pub categorypkk: String,

    /// Utilisation autorisée (libellé résolu)
    pub typepkk: String,

    /// Utilisation autorisée selon le document (non résolue)
    pub typepkk_bydoc: Option<String>,

    /// Adresse
    pub adresspkk: Option<String>,

    /// Surface déclarée
    pub squarepkk: Option<f64>,

    /// Valeur cadastrale
    pub costpkk: Option<f64>,

    /// Date d'inscription au registre
    pub datepkk: Option<String>,

    /// Statut de la parcelle (libellé résolu)
    pub statuspkk: String,

    /// Emprise dans le SRS cible (EPSG:3857)
    #[serde(rename = "box")]
    pub extent: Extent,

    /// Géométrie WKT dans le SRS cible, si l'amont en a fourni une
    pub geometry: Option<String>,
}

/// SRS attendu par le service de registre en entrée (WGS84)
pub const REGISTRY_EPSG: u32 = 4326;

/// SRS cible des enregistrements normalisés (Web Mercator)
pub const TARGET_EPSG: u32 = 3857;
