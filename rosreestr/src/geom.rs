//! Entrées/sorties géométriques : WKT, GeoJSON, CRS, emprises
//!
//! WKT via geozero (streaming, zero-copy), GeoJSON via le crate geojson.

use geo::BoundingRect;
use geozero::wkt::{Wkt, WktWriter};
use geozero::{GeozeroGeometry, ToGeo};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::error::RosreestrError;
use crate::types::Extent;

/// `urn:ogc:def:crs:EPSG::3857`, `EPSG:4326`, `epsg::3857`...
static CRS_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(?:urn:ogc:def:crs:)?epsg:{1,2}(\d+)\s*$").unwrap());

/// Encode une géométrie en WKT
pub fn to_wkt(geom: &geo::Geometry) -> Result<String, RosreestrError> {
    let mut buf: Vec<u8> = Vec::with_capacity(256);
    let mut writer = WktWriter::new(&mut buf);
    geom.process_geom(&mut writer)
        .map_err(|e| RosreestrError::geometry(format!("WKT encoding failed: {e}")))?;
    String::from_utf8(buf).map_err(|e| RosreestrError::geometry(e.to_string()))
}

/// Décode une géométrie depuis du WKT
pub fn from_wkt(wkt: &str) -> Result<geo::Geometry, RosreestrError> {
    Wkt(wkt)
        .to_geo()
        .map_err(|e| RosreestrError::geometry(format!("invalid WKT: {e}")))
}

/// Décode une géométrie GeoJSON depuis une valeur JSON
pub fn from_geojson_value(value: &Value) -> Result<geo::Geometry, RosreestrError> {
    let geometry: geojson::Geometry = serde_json::from_value(value.clone())?;
    geo::Geometry::try_from(geometry)
        .map_err(|e| RosreestrError::geometry(format!("invalid GeoJSON geometry: {e}")))
}

/// Encode une géométrie en document GeoJSON (string)
pub fn to_geojson_string(geom: &geo::Geometry) -> Result<String, RosreestrError> {
    let geometry = geojson::Geometry::new(geojson::Value::from(geom));
    Ok(serde_json::to_string(&geometry)?)
}

/// Résout le SRS déclaré d'un document GeoJSON.
///
/// Le membre `crs` peut être un objet nommé (`{"type": "name",
/// "properties": {"name": "urn:ogc:def:crs:EPSG::3857"}}`) ou directement
/// une chaîne. Absent: EPSG:4326, le défaut GeoJSON.
pub fn declared_epsg(doc: &Value) -> Result<u32, RosreestrError> {
    let crs = match doc.get("crs") {
        None | Some(Value::Null) => return Ok(4326),
        Some(crs) => crs,
    };

    let name = match crs {
        Value::String(s) => s.as_str(),
        Value::Object(_) => crs
            .pointer("/properties/name")
            .and_then(Value::as_str)
            .ok_or_else(|| RosreestrError::geometry("CRS object without a name"))?,
        _ => return Err(RosreestrError::geometry("unrecognized CRS member")),
    };

    parse_crs_name(name)
}

/// Extrait le code EPSG d'un nom de CRS
pub fn parse_crs_name(name: &str) -> Result<u32, RosreestrError> {
    CRS_NAME
        .captures(name.trim())
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse().ok())
        .ok_or_else(|| RosreestrError::geometry(format!("unrecognized CRS name: {name}")))
}

/// Emprise [xmin, ymin, xmax, ymax] d'une géométrie
pub fn extent_of(geom: &geo::Geometry) -> Extent {
    match geom.bounding_rect() {
        Some(rect) => [
            Some(rect.min().x),
            Some(rect.min().y),
            Some(rect.max().x),
            Some(rect.max().y),
        ],
        None => [None, None, None, None],
    }
}
