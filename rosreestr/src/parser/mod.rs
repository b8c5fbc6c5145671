//! Normalisation des réponses du registre
//!
//! Le service amont renvoie deux formes de documents selon sa version :
//! - forme plate historique : objets `attrs`/`extent`, parfois enveloppés
//!   dans un membre `feature` ;
//! - forme GeoJSON : `Feature` isolée ou `FeatureCollection`.
//!
//! La détection est un simple branchement sur le discriminant `type` de
//! chaque élément ; chaque branche produit le même [`PkkFeature`]
//! canonique. Une feature sans numéro cadastral est écartée avant le tri
//! (voir DESIGN.md).

mod geojson;
mod legacy;

use serde_json::Value;
use tracing::warn;

use crate::error::RosreestrError;
use crate::geom;
use crate::natural;
use crate::types::PkkFeature;

/// Normalise un lot de documents amont en enregistrements canoniques,
/// triés par numéro cadastral (ordre naturel).
pub fn normalize(docs: &[Value]) -> Result<Vec<PkkFeature>, RosreestrError> {
    let mut records = Vec::new();

    for doc in docs {
        match doc.get("type").and_then(Value::as_str) {
            Some("FeatureCollection") => {
                let epsg = document_epsg(doc);
                if let Some(features) = doc.get("features").and_then(Value::as_array) {
                    for feature in features {
                        if let Some(record) = geojson::record(feature, epsg)? {
                            records.push(record);
                        }
                    }
                }
            }
            Some("Feature") => {
                let epsg = document_epsg(doc);
                if let Some(record) = geojson::record(doc, epsg)? {
                    records.push(record);
                }
            }
            _ => {
                if let Some(record) = legacy::record(doc)? {
                    records.push(record);
                }
            }
        }
    }

    natural::sort_features(&mut records)?;
    Ok(records)
}

/// SRS déclaré au niveau du document ; un CRS illisible dégrade vers le
/// défaut GeoJSON plutôt que d'invalider le lot.
fn document_epsg(doc: &Value) -> u32 {
    geom::declared_epsg(doc).unwrap_or_else(|e| {
        warn!("Unreadable document CRS, assuming EPSG:4326: {}", e);
        4326
    })
}

/// Valeur texte (chaîne ou nombre stringifié), vide exclu
fn as_text(value: Option<&Value>) -> Option<String> {
    match value {
        Some(Value::String(s)) => {
            let s = s.trim();
            (!s.is_empty()).then(|| s.to_string())
        }
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    }
}

/// Valeur numérique (nombre ou chaîne numérique)
fn as_number(value: Option<&Value>) -> Option<f64> {
    match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn legacy_doc(cn: &str) -> Value {
        json!({
            "feature": {
                "type": 1,
                "attrs": {
                    "cn": cn,
                    "category_type": "003002000000",
                    "util_code": "141002000000",
                    "util_by_doc": "для размещения жилого дома",
                    "address": "г. Москва, ул. Тверская",
                    "area_value": 1200.5,
                    "cad_cost": "3500000.0",
                    "cc_date_entering": "2005-11-14",
                    "statecd": "01"
                },
                "extent": {"xmin": 4187000.0, "ymin": 7508000.0, "xmax": 4187500.0, "ymax": 7508800.0}
            }
        })
    }

    fn geojson_feature(cn: &str) -> Value {
        json!({
            "type": "Feature",
            "geometry": {"type": "Point", "coordinates": [37.6, 55.7]},
            "properties": {
                "type": "Участок",
                "cad_num": cn,
                "category": "003001000000",
                "use_code": "1.0",
                "use_by_doc": "для сельскохозяйственного производства",
                "readable_address": "Московская область",
                "specified_area": "54300",
                "cost_value": 120000.0,
                "registration_date": "2012-03-01",
                "status": "04"
            }
        })
    }

    #[test]
    fn test_legacy_batch_keeps_count() {
        let docs = vec![legacy_doc("77:01:0001001:2"), legacy_doc("77:01:0001001:1")];
        let records = normalize(&docs).unwrap();
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn test_single_feature_yields_one_record() {
        let docs = vec![geojson_feature("50:21:0010203:45")];
        let records = normalize(&docs).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].numbpkk, "50:21:0010203:45");
    }

    #[test]
    fn test_feature_collection_expands() {
        let docs = vec![json!({
            "type": "FeatureCollection",
            "features": [geojson_feature("50:21:0010203:45"), geojson_feature("50:21:0010203:7")]
        })];
        let records = normalize(&docs).unwrap();
        assert_eq!(records.len(), 2);
        // Tri naturel: 7 avant 45
        assert_eq!(records[0].numbpkk, "50:21:0010203:7");
        assert_eq!(records[1].numbpkk, "50:21:0010203:45");
    }

    #[test]
    fn test_legacy_attribute_mapping() {
        let records = normalize(&[legacy_doc("77:01:0001001:12")]).unwrap();
        let r = &records[0];

        assert_eq!(r.typeobj.as_deref(), Some("1"));
        assert_eq!(r.categorypkk, "Земли населённых пунктов");
        assert_eq!(r.typepkk, "Жилая застройка");
        assert_eq!(r.typepkk_bydoc.as_deref(), Some("для размещения жилого дома"));
        assert_eq!(r.adresspkk.as_deref(), Some("г. Москва, ул. Тверская"));
        assert_eq!(r.squarepkk, Some(1200.5));
        assert_eq!(r.costpkk, Some(3_500_000.0));
        assert_eq!(r.datepkk.as_deref(), Some("2005-11-14"));
        assert_eq!(r.statuspkk, "Ранее учтённый");
        assert_eq!(
            r.extent,
            [Some(4187000.0), Some(7508000.0), Some(4187500.0), Some(7508800.0)]
        );
        assert!(r.geometry.is_none());
    }

    #[test]
    fn test_geojson_attribute_mapping_and_geometry() {
        let records = normalize(&[geojson_feature("50:21:0010203:45")]).unwrap();
        let r = &records[0];

        assert_eq!(r.categorypkk, "Земли сельскохозяйственного назначения");
        assert_eq!(r.typepkk, "Сельскохозяйственное использование");
        assert_eq!(r.statuspkk, "Учтённый");
        assert_eq!(r.squarepkk, Some(54300.0));

        // Géométrie reprojetée en 3857
        let wkt = r.geometry.as_deref().expect("geometry should be set");
        assert!(wkt.starts_with("POINT"));
        let xmin = r.extent[0].expect("xmin");
        assert!(xmin > 4_000_000.0, "xmin={}", xmin);
    }

    #[test]
    fn test_unknown_codes_fall_back() {
        let doc = json!({
            "feature": {
                "attrs": {"cn": "77:01:1", "category_type": "999", "statecd": null}
            }
        });
        let records = normalize(&[doc]).unwrap();
        assert_eq!(records[0].categorypkk, crate::codes::UNDEFINED);
        assert_eq!(records[0].typepkk, crate::codes::UNDEFINED);
        assert_eq!(records[0].statuspkk, crate::codes::UNDEFINED);
    }

    #[test]
    fn test_missing_cadastral_number_is_dropped() {
        let doc = json!({"feature": {"attrs": {"address": "somewhere"}}});
        let records = normalize(&[doc, legacy_doc("77:01:1")]).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].numbpkk, "77:01:1");
    }

    #[test]
    fn test_mixed_shapes_sort_together() {
        let docs = vec![
            legacy_doc("11:10:1"),
            geojson_feature("2:5:1"),
            legacy_doc("11:2:3"),
        ];
        let records = normalize(&docs).unwrap();
        let order: Vec<&str> = records.iter().map(|r| r.numbpkk.as_str()).collect();
        assert_eq!(order, vec!["2:5:1", "11:2:3", "11:10:1"]);
    }

    #[test]
    fn test_geometry_in_declared_3857_is_kept_as_is() {
        let doc = json!({
            "type": "Feature",
            "crs": {"type": "name", "properties": {"name": "urn:ogc:def:crs:EPSG::3857"}},
            "geometry": {"type": "Point", "coordinates": [4187540.0, 7509260.0]},
            "properties": {"cad_num": "77:01:1"}
        });
        let records = normalize(&[doc]).unwrap();
        // Déjà en 3857: reprojection identité
        assert_eq!(records[0].extent[0], Some(4187540.0));
        assert_eq!(records[0].extent[1], Some(7509260.0));
    }
}
