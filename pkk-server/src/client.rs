//! Client HTTP vers le service de registre (aiorosreestr)
//!
//! Politique fail-open délibérée : une panne du registre (erreur réseau,
//! timeout, statut non-200, corps illisible) dégrade en résultat vide au
//! lieu de remonter une erreur. L'indisponibilité du registre ne doit
//! jamais casser la réponse API sous-jacente.

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::StatusCode;
use serde_json::Value;
use tracing::error;

use crate::config::Config;

/// Client du service de registre
pub struct RegistryClient {
    http: reqwest::Client,
    host: String,
}

impl RegistryClient {
    /// Construit un client avec le timeout configuré
    pub fn new(config: &Config) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs_f64(config.timeout))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http,
            host: config.registry_host().to_string(),
        })
    }

    /// Interroge `GET {host}/features/?search=…[&center_only=…]`.
    ///
    /// Seul un statut 200 avec un corps JSON lisible produit des données.
    /// Un document unique est enveloppé en lot d'un élément.
    pub async fn query(&self, search: &str, center_only: Option<bool>) -> Vec<Value> {
        let url = format!("{}/features/", self.host);

        let mut request = self.http.get(&url).query(&[("search", search)]);
        if let Some(center_only) = center_only {
            request = request.query(&[("center_only", if center_only { "true" } else { "false" })]);
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                error!(url = %url, "Registry request failed: {}", e);
                return Vec::new();
            }
        };

        let status = response.status();
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                error!(url = %url, "Failed to read registry response: {}", e);
                return Vec::new();
            }
        };

        if status != StatusCode::OK {
            error!(status = %status, body = %body, "Registry returned non-200");
            return Vec::new();
        }

        match serde_json::from_str::<Value>(&body) {
            Ok(Value::Array(items)) => items,
            Ok(Value::Null) => Vec::new(),
            Ok(single) => vec![single],
            Err(e) => {
                error!("Unparseable registry body: {}", e);
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client_for(host: &str) -> RegistryClient {
        RegistryClient::new(&Config {
            host: host.into(),
            timeout: 2.0,
            ..Config::default()
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_unreachable_registry_fails_open() {
        // Port 1: connexion refusée
        let client = client_for("http://127.0.0.1:1");
        let result = client.query("77:01", Some(false)).await;
        assert!(result.is_empty());
    }

    #[tokio::test]
    async fn test_trailing_slash_not_doubled() {
        let client = client_for("http://127.0.0.1:1/");
        assert_eq!(client.host, "http://127.0.0.1:1");
    }
}
