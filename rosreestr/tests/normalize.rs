//! Tests d'intégration de la normalisation sur des documents amont complets

use serde_json::json;

#[test]
fn test_mixed_batch_end_to_end() {
    let docs = vec![
        // Contrat historique, enveloppe `feature`
        json!({
            "feature": {
                "type": 1,
                "attrs": {
                    "cn": "77:01:0001001:1",
                    "category_type": "003002000000",
                    "util_code": "141002000000",
                    "address": "г. Москва",
                    "area_value": 820.0,
                    "cad_cost": 14500000.25,
                    "cc_date_entering": "2004-06-01",
                    "statecd": "01"
                },
                "extent": {
                    "xmin": 4186000.0, "ymin": 7507000.0,
                    "xmax": 4186900.0, "ymax": 7507700.0
                }
            }
        }),
        // Contrat GeoJSON: collection de deux features
        json!({
            "type": "FeatureCollection",
            "features": [
                {
                    "type": "Feature",
                    "geometry": {
                        "type": "Polygon",
                        "coordinates": [[
                            [37.60, 55.70], [37.61, 55.70], [37.61, 55.71],
                            [37.60, 55.71], [37.60, 55.70]
                        ]]
                    },
                    "properties": {
                        "cad_num": "77:01:0001001:10",
                        "category": "003001000000",
                        "use_code": "1.0",
                        "specified_area": 125000,
                        "status": "04"
                    }
                },
                {
                    "type": "Feature",
                    "geometry": null,
                    "properties": {"cad_num": "77:01:0001001:2", "status": "05"}
                }
            ]
        }),
    ];

    let records = rosreestr::normalize(&docs).unwrap();
    assert_eq!(records.len(), 3);

    // Ordre naturel: 1 < 2 < 10
    let order: Vec<&str> = records.iter().map(|r| r.numbpkk.as_str()).collect();
    assert_eq!(
        order,
        vec!["77:01:0001001:1", "77:01:0001001:2", "77:01:0001001:10"]
    );

    // Forme historique: emprise amont reprise telle quelle, pas de géométrie
    let legacy = &records[0];
    assert_eq!(legacy.statuspkk, "Ранее учтённый");
    assert_eq!(legacy.extent[0], Some(4186000.0));
    assert!(legacy.geometry.is_none());

    // Feature sans géométrie: champs vides mais enregistrement conservé
    let bare = &records[1];
    assert_eq!(bare.statuspkk, "Архивный");
    assert_eq!(bare.extent, [None, None, None, None]);

    // Feature avec polygone: WKT et emprise en Web Mercator
    let with_geom = &records[2];
    assert_eq!(with_geom.categorypkk, "Земли сельскохозяйственного назначения");
    let wkt = with_geom.geometry.as_deref().unwrap();
    assert!(wkt.starts_with("POLYGON"), "wkt={}", wkt);
    let [xmin, ymin, xmax, ymax] = with_geom.extent;
    assert!(xmin.unwrap() > 4_000_000.0);
    assert!(ymin.unwrap() > 7_000_000.0);
    assert!(xmax.unwrap() > xmin.unwrap());
    assert!(ymax.unwrap() > ymin.unwrap());
}

#[test]
fn test_empty_batch() {
    let records = rosreestr::normalize(&[]).unwrap();
    assert!(records.is_empty());
}

#[test]
fn test_serialized_record_shape() {
    let docs = vec![json!({
        "feature": {"attrs": {"cn": "77:01:1"}}
    })];
    let records = rosreestr::normalize(&docs).unwrap();
    let value = serde_json::to_value(&records).unwrap();

    let record = &value[0];
    assert_eq!(record["numbpkk"], "77:01:1");
    assert_eq!(record["categorypkk"], rosreestr::codes::UNDEFINED);
    // `box` sérialisé comme tableau de 4 bornes (null si absentes)
    assert_eq!(record["box"], json!([null, null, null, null]));
    assert!(record["geometry"].is_null());
}
