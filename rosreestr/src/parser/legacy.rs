//! Forme plate historique : objets `attrs`/`extent`
//!
//! L'amont historique renvoie chaque parcelle sous la forme
//! `{"feature": {"type": …, "attrs": {…}, "extent": {…}}}` ; l'enveloppe
//! `feature` est parfois absente. Aucune géométrie, seulement une emprise
//! déjà exprimée dans le SRS cible.

use serde_json::Value;
use tracing::warn;

use super::{as_number, as_text};
use crate::codes;
use crate::error::RosreestrError;
use crate::types::{Extent, PkkFeature};

/// Construit un enregistrement depuis un élément plat.
///
/// `Ok(None)` pour une feature sans numéro cadastral (écartée avec un
/// warning). Seule une table de codes défaillante est une vraie erreur.
pub(crate) fn record(doc: &Value) -> Result<Option<PkkFeature>, RosreestrError> {
    let feature = doc.get("feature").unwrap_or(doc);

    let attrs = match feature.get("attrs").and_then(Value::as_object) {
        Some(attrs) => attrs,
        None => {
            warn!("Legacy feature without attrs, dropped");
            return Ok(None);
        }
    };

    let numbpkk = match as_text(attrs.get("cn")) {
        Some(cn) => cn,
        None => {
            warn!("Legacy feature without cadastral number, dropped");
            return Ok(None);
        }
    };

    let category = as_text(attrs.get("category_type"));
    let util_code = as_text(attrs.get("util_code"));
    let statecd = as_text(attrs.get("statecd"));

    Ok(Some(PkkFeature {
        typeobj: as_text(feature.get("type")),
        numbpkk,
        categorypkk: codes::resolve_or_undefined(codes::CATEGORIES, category.as_deref())?
            .to_string(),
        typepkk: codes::resolve_or_undefined(codes::ALLOWED_USE, util_code.as_deref())?
            .to_string(),
        typepkk_bydoc: as_text(attrs.get("util_by_doc")),
        adresspkk: as_text(attrs.get("address")),
        squarepkk: as_number(attrs.get("area_value")),
        costpkk: as_number(attrs.get("cad_cost")),
        datepkk: as_text(attrs.get("cc_date_entering")),
        statuspkk: codes::resolve_or_undefined(codes::STATES, statecd.as_deref())?.to_string(),
        extent: extent_from(feature.get("extent")),
        geometry: None,
    }))
}

/// Emprise amont `{"xmin": …, "ymin": …, "xmax": …, "ymax": …}`
fn extent_from(value: Option<&Value>) -> Extent {
    match value.and_then(Value::as_object) {
        Some(extent) => [
            as_number(extent.get("xmin")),
            as_number(extent.get("ymin")),
            as_number(extent.get("xmax")),
            as_number(extent.get("ymax")),
        ],
        None => [None, None, None, None],
    }
}
