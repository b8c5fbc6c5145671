//! Configuration du service

use std::net::SocketAddr;
use std::path::PathBuf;

/// Configuration principale
#[derive(Debug, Clone)]
pub struct Config {
    /// Adresse du service de registre (aiorosreestr)
    pub host: String,
    /// Timeout des appels au registre (secondes)
    pub timeout: f64,
    /// Adresse d'écoute du serveur HTTP
    pub listen: SocketAddr,
    /// Identifiant de la carte de base pour la prévisualisation
    pub base_map: Option<i64>,
    /// URL du service de rendu d'images
    pub render_url: String,
    /// Catalogue JSON des cartes web (optionnel)
    pub webmaps: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "http://127.0.0.1:8000".into(),
            timeout: 10.0,
            listen: "127.0.0.1:8080".parse().expect("static listen address"),
            base_map: None,
            render_url: "/api/component/render/image".into(),
            webmaps: None,
        }
    }
}

impl Config {
    /// Charge la configuration depuis les variables d'environnement
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            host: std::env::var("PKK_HOST").unwrap_or(defaults.host),
            timeout: std::env::var("PKK_TIMEOUT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.timeout),
            listen: std::env::var("PKK_LISTEN")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.listen),
            base_map: std::env::var("PKK_BASE_MAP").ok().and_then(|v| v.parse().ok()),
            render_url: std::env::var("PKK_RENDER_URL").unwrap_or(defaults.render_url),
            webmaps: std::env::var("PKK_WEBMAPS").ok().map(PathBuf::from),
        }
    }

    /// Adresse du registre sans slash final
    pub fn registry_host(&self) -> &str {
        self.host.trim_end_matches('/')
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.host, "http://127.0.0.1:8000");
        assert_eq!(config.timeout, 10.0);
        assert!(config.base_map.is_none());
    }

    #[test]
    fn test_registry_host_strips_trailing_slash() {
        let config = Config {
            host: "http://pkk.example.org/".into(),
            ..Config::default()
        };
        assert_eq!(config.registry_host(), "http://pkk.example.org");
    }
}
