//! Forme GeoJSON : `Feature` et `FeatureCollection`
//!
//! Le contrat amont récent renvoie des features GeoJSON avec leurs
//! attributs sous `properties` et, le cas échéant, une géométrie dans le
//! SRS déclaré du document (EPSG:4326 par défaut). La géométrie est
//! reprojetée vers le SRS cible avant d'être encodée en WKT.
//!
//! La classification d'utilisation (`use_code`) passe par la table
//! `dUtilization_v01`, distincte de celle du contrat historique.

use serde_json::Value;
use tracing::warn;

use super::{as_number, as_text};
use crate::codes;
use crate::error::RosreestrError;
use crate::geom;
use crate::reproject::Reprojector;
use crate::types::{Extent, PkkFeature, TARGET_EPSG};

/// Construit un enregistrement depuis une `Feature` GeoJSON.
///
/// `default_epsg` est le SRS déclaré au niveau du document ; un membre
/// `crs` porté par la feature elle-même a priorité.
pub(crate) fn record(
    feature: &Value,
    default_epsg: u32,
) -> Result<Option<PkkFeature>, RosreestrError> {
    let properties = match feature.get("properties").and_then(Value::as_object) {
        Some(properties) => properties,
        None => {
            warn!("GeoJSON feature without properties, dropped");
            return Ok(None);
        }
    };

    let numbpkk = match as_text(properties.get("cad_num")) {
        Some(cn) => cn,
        None => {
            warn!("GeoJSON feature without cadastral number, dropped");
            return Ok(None);
        }
    };

    let epsg = if feature.get("crs").is_some() {
        geom::declared_epsg(feature).unwrap_or_else(|e| {
            warn!(cn = %numbpkk, "Unreadable feature CRS, assuming EPSG:4326: {}", e);
            4326
        })
    } else {
        default_epsg
    };

    let (geometry, extent) = match feature.get("geometry") {
        Some(value) if !value.is_null() => match build_geometry(value, epsg) {
            Ok(built) => built,
            Err(e) => {
                // Géométrie illisible: enregistrement conservé sans géométrie
                warn!(cn = %numbpkk, "Failed to build geometry: {}", e);
                (None, [None, None, None, None])
            }
        },
        _ => (None, [None, None, None, None]),
    };

    let category = as_text(properties.get("category"));
    let use_code = as_text(properties.get("use_code"));
    let status = as_text(properties.get("status"));

    Ok(Some(PkkFeature {
        typeobj: as_text(properties.get("type")),
        numbpkk,
        categorypkk: codes::resolve_or_undefined(codes::CATEGORIES, category.as_deref())?
            .to_string(),
        typepkk: codes::resolve_or_undefined(codes::UTILIZATION, use_code.as_deref())?
            .to_string(),
        typepkk_bydoc: as_text(properties.get("use_by_doc")),
        adresspkk: as_text(properties.get("readable_address")),
        squarepkk: as_number(properties.get("specified_area")),
        costpkk: as_number(properties.get("cost_value")),
        datepkk: as_text(properties.get("registration_date")),
        statuspkk: codes::resolve_or_undefined(codes::STATES, status.as_deref())?.to_string(),
        extent,
        geometry,
    }))
}

/// Parse, reprojette vers le SRS cible, encode en WKT et calcule l'emprise
fn build_geometry(value: &Value, epsg: u32) -> Result<(Option<String>, Extent), RosreestrError> {
    let geometry = geom::from_geojson_value(value)?;
    let reprojector = Reprojector::new(epsg, TARGET_EPSG)?;
    let projected = reprojector.transform_geometry(&geometry)?;

    Ok((Some(geom::to_wkt(&projected)?), geom::extent_of(&projected)))
}
