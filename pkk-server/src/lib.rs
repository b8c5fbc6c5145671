//! Passerelle d'enrichissement cadastral pour une API feature web-GIS
//!
//! Le serveur expose une recherche cadastrale (`/api/pkk/search/`) et un
//! middleware qui augmente les réponses de détail de feature de l'hôte
//! avec les enregistrements du registre Rosreestr normalisés par la
//! bibliothèque [`rosreestr`].

pub mod client;
pub mod config;
pub mod middleware;
pub mod search;
pub mod server;
pub mod webmap;
