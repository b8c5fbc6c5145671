//! Tween d'augmentation des réponses feature
//!
//! Intercepte les réponses de détail de feature du web-GIS hôte
//! (`GET */api/*/feature/{id}` avec le drapeau `pkk`), en extrait la
//! géométrie (WKT en EPSG:3857), interroge le registre et réinjecte les
//! enregistrements normalisés sous `fields.rosreestr`, plus un lien de
//! prévisualisation si la carte de base est résolue et autorisée.
//!
//! Invariant : aucune défaillance d'augmentation ne doit bloquer ou
//! corrompre la réponse d'origine — elle est alors livrée intacte.

use anyhow::{Context, Result};
use axum::body::{boxed, Body};
use axum::extract::State;
use axum::http::{header, Method, Request, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use tracing::{debug, warn};

use rosreestr::{geom, Reprojector, REGISTRY_EPSG, TARGET_EPSG};

use crate::server::AppState;
use crate::webmap;

static FEATURE_PATH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/api/.+/feature/[A-Za-z0-9]+$").unwrap());

/// Prédicat statique : GET sur un détail de feature avec le drapeau `pkk`
pub fn wants_augmentation(method: &Method, path: &str, query: Option<&str>) -> bool {
    method == Method::GET && FEATURE_PATH.is_match(path) && pkk_flag(query)
}

fn pkk_flag(query: Option<&str>) -> bool {
    let Some(query) = query else { return false };
    query.split('&').any(|pair| {
        let mut kv = pair.splitn(2, '=');
        kv.next() == Some("pkk") && matches!(kv.next().unwrap_or(""), "true" | "yes" | "1")
    })
}

/// Middleware axum : passe-plat ou augmentation selon le prédicat
pub async fn augment_response(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next<Body>,
) -> Response {
    let augment = wants_augmentation(request.method(), request.uri().path(), request.uri().query());
    let user = request
        .headers()
        .get("x-user")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();

    let response = next.run(request).await;

    if !augment {
        return response;
    }
    // Erreur client/serveur: livrer tel quel, aucun appel registre
    if response.status().as_u16() >= 400 {
        return response;
    }

    let (mut parts, body) = response.into_parts();
    let bytes = match hyper::body::to_bytes(body).await {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!("Failed to read feature response body: {}", e);
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    parts.headers.remove(header::CONTENT_LENGTH);

    match augmented_body(&state, &user, &bytes).await {
        Ok(patched) => Response::from_parts(parts, boxed(Body::from(patched))),
        Err(e) => {
            // Réponse d'origine livrée intacte
            warn!("Augmentation skipped: {}", e);
            Response::from_parts(parts, boxed(Body::from(bytes)))
        }
    }
}

/// Reconstruit le corps augmenté : `fields.rosreestr` + `preview`
async fn augmented_body(state: &AppState, user: &str, bytes: &[u8]) -> Result<Vec<u8>> {
    let mut document: Value =
        serde_json::from_slice(bytes).context("feature response body is not JSON")?;

    let wkt = document
        .get("geom")
        .and_then(Value::as_str)
        .context("feature response without geom field")?;

    // La géométrie de la réponse est en Web Mercator; le registre
    // attend du WGS84
    let mercator = geom::from_wkt(wkt)?;
    let reprojector = Reprojector::new(TARGET_EPSG, REGISTRY_EPSG)?;
    let geographic = reprojector.transform_geometry(&mercator)?;
    let payload = geom::to_geojson_string(&geographic)?;

    let records = state.search.search(&payload).await;

    let fields = document
        .get_mut("fields")
        .and_then(Value::as_object_mut)
        .context("feature response without fields object")?;
    fields.insert("rosreestr".into(), serde_json::to_value(&records)?);

    // Lien de prévisualisation: fail closed, absence silencieuse
    if let Some(map) = state.webmaps.base_map(state.config.base_map).await {
        if let Some(link) = webmap::preview_link(&state.config.render_url, &map, user) {
            let extent = geom::extent_of(&mercator)
                .iter()
                .map(|v| v.map(|f| f.to_string()).unwrap_or_default())
                .collect::<Vec<_>>()
                .join(",");
            document["preview"] = Value::String(format!("{}&extent={}", link, extent));
        }
    }

    debug!(records = records.len(), "Feature response augmented");
    Ok(serde_json::to_vec(&document)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_predicate_matches_feature_detail() {
        assert!(wants_augmentation(
            &Method::GET,
            "/api/resource/12/feature/42",
            Some("pkk=true")
        ));
        assert!(wants_augmentation(
            &Method::GET,
            "/api/resource/12/feature/42",
            Some("fields=all&pkk=yes")
        ));
        assert!(wants_augmentation(
            &Method::GET,
            "/api/resource/12/feature/abc42",
            Some("pkk=1")
        ));
    }

    #[test]
    fn test_predicate_rejects() {
        // Drapeau absent ou faux
        assert!(!wants_augmentation(&Method::GET, "/api/resource/12/feature/42", None));
        assert!(!wants_augmentation(
            &Method::GET,
            "/api/resource/12/feature/42",
            Some("pkk=no")
        ));
        // Mauvaise méthode
        assert!(!wants_augmentation(
            &Method::POST,
            "/api/resource/12/feature/42",
            Some("pkk=true")
        ));
        // Chemin hors API feature
        assert!(!wants_augmentation(&Method::GET, "/api/pkk/search/", Some("pkk=true")));
        assert!(!wants_augmentation(
            &Method::GET,
            "/resource/12/feature/42",
            Some("pkk=true")
        ));
        // Identifiant non alphanumérique
        assert!(!wants_augmentation(
            &Method::GET,
            "/api/resource/12/feature/4-2",
            Some("pkk=true")
        ));
        assert!(!wants_augmentation(
            &Method::GET,
            "/api/resource/12/feature/42/",
            Some("pkk=true")
        ));
    }
}
