//! Serveur HTTP : routes de recherche et montage du middleware
//!
//! Le routeur expose `/api/pkk/search/` (GET et POST) et laisse l'hôte
//! greffer ses propres routes via [`router_with`] — elles passent alors
//! sous le middleware d'augmentation, qui ne voit que les routes montées
//! avant lui.

use std::sync::Arc;

use anyhow::Result;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{middleware, Json, Router};
use serde::Deserialize;
use serde_json::Value;
use tower_http::cors::CorsLayer;

use rosreestr::PkkFeature;

use crate::client::RegistryClient;
use crate::config::Config;
use crate::middleware::augment_response;
use crate::search::SearchService;
use crate::webmap::WebMapSource;

/// État partagé du serveur
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub search: Arc<SearchService>,
    pub webmaps: Arc<dyn WebMapSource>,
}

impl AppState {
    pub fn new(config: Config, webmaps: impl WebMapSource + 'static) -> Result<Self> {
        let client = RegistryClient::new(&config)?;
        Ok(Self {
            config: Arc::new(config),
            search: Arc::new(SearchService::new(client)),
            webmaps: Arc::new(webmaps),
        })
    }
}

/// Routeur avec les seules routes du service
pub fn router(state: AppState) -> Router {
    router_with(state, Router::new())
}

/// Routeur avec les routes de l'hôte greffées sous le middleware
/// d'augmentation.
pub fn router_with(state: AppState, host_routes: Router<AppState>) -> Router {
    Router::new()
        .route("/api/pkk/search/", get(search_get).post(search_post))
        .route("/healthz", get(healthz))
        .merge(host_routes)
        .layer(middleware::from_fn_with_state(state.clone(), augment_response))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[derive(Debug, Deserialize)]
struct SearchQuery {
    #[serde(default)]
    like: String,
}

async fn search_get(
    State(state): State<AppState>,
    Query(params): Query<SearchQuery>,
) -> Json<Vec<PkkFeature>> {
    Json(state.search.search(&params.like).await)
}

/// POST : corps JSON `{"like": …}`, chaîne libre ou document GeoJSON
async fn search_post(State(state): State<AppState>, body: String) -> Json<Vec<PkkFeature>> {
    match post_like(&body) {
        Some(like) => Json(state.search.search(&like).await),
        // Corps malformé ou sans membre `like`: lot vide
        None => Json(Vec::new()),
    }
}

/// Extrait le terme de recherche du corps POST.
///
/// Un `like` chaîne passe tel quel ; un `like` objet (document GeoJSON
/// en ligne) est re-sérialisé pour l'orchestrateur.
fn post_like(body: &str) -> Option<String> {
    let document: Value = serde_json::from_str(body).ok()?;
    match document.get("like")? {
        Value::String(s) => Some(s.clone()),
        value @ Value::Object(_) => Some(value.to_string()),
        _ => None,
    }
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}
