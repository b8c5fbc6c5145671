//! # rosreestr
//!
//! Normalisation des réponses cadastrales du registre Rosreestr (PKK).
//!
//! ## Features
//!
//! - Support des deux contrats amont (tableau plat historique et GeoJSON)
//! - Tables de codes embarquées (catégories, utilisations, statuts)
//! - Reprojection WGS84 ↔ Web Mercator en Rust pur
//! - Tri naturel des numéros cadastraux
//! - Types `geo` pour l'interopérabilité avec l'écosystème Rust géospatial
//!
//! ## Usage
//!
//! ```rust
//! use serde_json::json;
//!
//! let docs = vec![json!({
//!     "feature": {
//!         "attrs": {"cn": "77:01:0001001:12", "statecd": "01"},
//!         "extent": {"xmin": 4187000.0, "ymin": 7508000.0,
//!                    "xmax": 4187500.0, "ymax": 7508800.0}
//!     }
//! })];
//!
//! let records = rosreestr::normalize(&docs).unwrap();
//! assert_eq!(records[0].numbpkk, "77:01:0001001:12");
//! ```

pub mod codes;
pub mod error;
pub mod geom;
pub mod natural;
pub mod parser;
pub mod reproject;
pub mod types;

pub use error::RosreestrError;
pub use parser::normalize;
pub use reproject::Reprojector;
pub use types::{Extent, PkkFeature, REGISTRY_EPSG, TARGET_EPSG};
