//! Cartes web de l'hôte et lien de prévisualisation
//!
//! Frontière d'interface avec le web-GIS hôte : le service n'implémente
//! pas de vrai modèle de cartes, il consomme un catalogue via le trait
//! [`WebMapSource`]. L'implémentation fournie charge un catalogue JSON
//! statique ; un catalogue vide signifie simplement aucun lien de
//! prévisualisation.
//!
//! La permission d'affichage est fail-closed : sans carte résolue ou sans
//! permission, le lien est omis, jamais une erreur.

use std::path::Path;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;

/// Une carte web avec son arbre de couches
#[derive(Debug, Clone, Deserialize)]
pub struct WebMap {
    pub id: i64,

    /// Carte visible par tout le monde
    #[serde(default)]
    pub public: bool,

    /// Utilisateurs autorisés à l'affichage (si non publique)
    #[serde(default)]
    pub allowed_users: Vec<String>,

    /// Éléments racine de la carte
    #[serde(default)]
    pub root: Vec<WebMapItem>,
}

/// Élément d'une carte web : couche ou groupe récursif
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "item_type", rename_all = "snake_case")]
pub enum WebMapItem {
    Layer {
        layer_id: i64,
    },
    Group {
        #[serde(default)]
        children: Vec<WebMapItem>,
    },
}

impl WebMap {
    /// Permission d'affichage pour un utilisateur (fail closed :
    /// l'utilisateur anonyme ne passe que sur une carte publique)
    pub fn has_display_permission(&self, user: &str) -> bool {
        self.public || (!user.is_empty() && self.allowed_users.iter().any(|u| u == user))
    }

    /// Identifiants de couches, collectés récursivement
    pub fn layer_ids(&self) -> Vec<i64> {
        let mut ids = Vec::new();
        collect_layer_ids(&self.root, &mut ids);
        ids
    }
}

fn collect_layer_ids(items: &[WebMapItem], ids: &mut Vec<i64>) {
    for item in items {
        match item {
            WebMapItem::Layer { layer_id } => ids.push(*layer_id),
            WebMapItem::Group { children } => collect_layer_ids(children, ids),
        }
    }
}

/// Source des cartes web de l'hôte
#[async_trait]
pub trait WebMapSource: Send + Sync {
    /// Résout la carte de base : celle configurée, sinon la première
    /// disponible. `None` dégrade en absence de prévisualisation.
    async fn base_map(&self, preferred: Option<i64>) -> Option<WebMap>;
}

/// Catalogue statique chargé depuis un fichier JSON
pub struct StaticWebMaps {
    maps: Vec<WebMap>,
}

impl StaticWebMaps {
    pub fn new(maps: Vec<WebMap>) -> Self {
        Self { maps }
    }

    /// Catalogue vide : prévisualisation toujours omise
    pub fn empty() -> Self {
        Self { maps: Vec::new() }
    }

    /// Charge un catalogue depuis un fichier JSON
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .context(format!("Failed to read webmap catalogue: {}", path.display()))?;
        let maps = serde_json::from_str(&content).context("Failed to parse webmap catalogue")?;
        Ok(Self { maps })
    }
}

#[async_trait]
impl WebMapSource for StaticWebMaps {
    async fn base_map(&self, preferred: Option<i64>) -> Option<WebMap> {
        match preferred {
            Some(id) => self.maps.iter().find(|m| m.id == id).cloned(),
            None => self.maps.first().cloned(),
        }
    }
}

/// Construit le lien de prévisualisation vers le service de rendu.
///
/// `None` si l'utilisateur n'a pas la permission d'affichage ; l'emprise
/// est ajoutée par l'appelant.
pub fn preview_link(render_url: &str, map: &WebMap, user: &str) -> Option<String> {
    if !map.has_display_permission(user) {
        return None;
    }

    let resources = map
        .layer_ids()
        .iter()
        .map(i64::to_string)
        .collect::<Vec<_>>()
        .join(",");

    Some(format!("{}?resource={}", render_url, resources))
}
