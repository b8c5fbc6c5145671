//! Orchestrateur de recherche cadastrale
//!
//! Accepte une requête libre : vide (résultat vide immédiat), texte
//! (transmis tel quel au registre) ou document JSON portant une
//! géométrie, auquel cas celle-ci est reprojetée vers EPSG:4326 — le SRS
//! d'entrée attendu par le registre — et sérialisée en GeoJSON.
//!
//! L'orchestrateur ne remonte jamais d'erreur pour une panne amont :
//! tout échec dégrade en lot vide.

use serde_json::Value;
use tracing::{error, warn};

use rosreestr::{geom, PkkFeature, Reprojector, RosreestrError, REGISTRY_EPSG};

use crate::client::RegistryClient;

/// Service de recherche : client du registre + normalisation
pub struct SearchService {
    client: RegistryClient,
}

impl SearchService {
    pub fn new(client: RegistryClient) -> Self {
        Self { client }
    }

    /// Recherche et retourne des enregistrements normalisés triés.
    pub async fn search(&self, like: &str) -> Vec<PkkFeature> {
        let like = like.trim();
        if like.is_empty() {
            return Vec::new();
        }

        let payload = prepare_payload(like);

        // center_only=false: intersection sur la géométrie complète,
        // pas de raccourci point-dans-polygone
        let raw = self.client.query(&payload, Some(false)).await;
        if raw.is_empty() {
            return Vec::new();
        }

        match rosreestr::normalize(&raw) {
            Ok(records) => records,
            Err(e) => {
                error!("Normalization failed: {}", e);
                Vec::new()
            }
        }
    }
}

/// Prépare la charge de recherche.
///
/// Une requête JSON portant une géométrie est reprojetée vers EPSG:4326
/// et sérialisée en GeoJSON ; tout autre texte passe tel quel.
fn prepare_payload(like: &str) -> String {
    let document: Value = match serde_json::from_str(like) {
        Ok(value) => value,
        Err(_) => return like.to_string(),
    };

    let Some(geometry) = find_geometry(&document) else {
        return like.to_string();
    };

    match geographic_payload(&document, geometry) {
        Ok(payload) => payload,
        Err(e) => {
            warn!("Failed to reproject search geometry, passing query through: {}", e);
            like.to_string()
        }
    }
}

/// Localise la géométrie d'un document GeoJSON : géométrie nue, `Feature`,
/// ou première feature d'une `FeatureCollection`.
fn find_geometry(document: &Value) -> Option<&Value> {
    match document.get("type").and_then(Value::as_str) {
        Some("Feature") => document.get("geometry").filter(|g| !g.is_null()),
        Some("FeatureCollection") => document
            .get("features")?
            .as_array()?
            .iter()
            .find_map(|feature| feature.get("geometry").filter(|g| !g.is_null())),
        Some(
            "Point" | "MultiPoint" | "LineString" | "MultiLineString" | "Polygon"
            | "MultiPolygon" | "GeometryCollection",
        ) => Some(document),
        _ => None,
    }
}

/// Reprojette la géométrie vers EPSG:4326 et la sérialise en GeoJSON
fn geographic_payload(document: &Value, geometry: &Value) -> Result<String, RosreestrError> {
    let epsg = geom::declared_epsg(document)?;
    let geometry = geom::from_geojson_value(geometry)?;
    let reprojector = Reprojector::new(epsg, REGISTRY_EPSG)?;
    let geographic = reprojector.transform_geometry(&geometry)?;
    geom::to_geojson_string(&geographic)
}
