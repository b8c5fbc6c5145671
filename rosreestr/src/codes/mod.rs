//! Résolution des tables de codes du registre
//!
//! Le registre renvoie des codes opaques (catégorie de terres, utilisation
//! autorisée, statut de parcelle). Les tables de correspondance, dérivées
//! des schémas XSD versionnés du registre, sont embarquées en JSON et
//! chargées paresseusement, une fois par table, dans un cache global en
//! lecture seule.

use std::collections::HashMap;

use once_cell::sync::OnceCell;

use crate::error::RosreestrError;

/// Libellé de repli quand un code est absent ou inconnu
pub const UNDEFINED: &str = "Не определено";

/// Catégories de terres (`category_type` / `category`)
pub const CATEGORIES: &str = "dCategories_v01";
/// Utilisation autorisée, contrat amont historique (`util_code`)
pub const ALLOWED_USE: &str = "dAllowedUse_v02";
/// Utilisation autorisée, contrat amont GeoJSON (`use_code`).
/// Table distincte de `dAllowedUse_v02` : détail de versionnage amont.
pub const UTILIZATION: &str = "dUtilization_v01";
/// Statut de la parcelle (`statecd` / `status`)
pub const STATES: &str = "dStates_v01";

static CATEGORIES_TABLE: OnceCell<HashMap<String, String>> = OnceCell::new();
static ALLOWED_USE_TABLE: OnceCell<HashMap<String, String>> = OnceCell::new();
static UTILIZATION_TABLE: OnceCell<HashMap<String, String>> = OnceCell::new();
static STATES_TABLE: OnceCell<HashMap<String, String>> = OnceCell::new();

fn load(name: &str, raw: &'static str) -> Result<HashMap<String, String>, RosreestrError> {
    let table: HashMap<String, String> = serde_json::from_str(raw)
        .map_err(|e| RosreestrError::code_table(name, e.to_string()))?;
    if table.is_empty() {
        return Err(RosreestrError::code_table(name, "empty table"));
    }
    Ok(table)
}

fn table(name: &str) -> Result<&'static HashMap<String, String>, RosreestrError> {
    match name {
        CATEGORIES => CATEGORIES_TABLE
            .get_or_try_init(|| load(CATEGORIES, include_str!("data/dCategories_v01.json"))),
        ALLOWED_USE => ALLOWED_USE_TABLE
            .get_or_try_init(|| load(ALLOWED_USE, include_str!("data/dAllowedUse_v02.json"))),
        UTILIZATION => UTILIZATION_TABLE
            .get_or_try_init(|| load(UTILIZATION, include_str!("data/dUtilization_v01.json"))),
        STATES => {
            STATES_TABLE.get_or_try_init(|| load(STATES, include_str!("data/dStates_v01.json")))
        }
        other => Err(RosreestrError::UnknownCodeTable(other.to_string())),
    }
}

/// Résout un code brut dans une table nommée.
///
/// Retourne `Ok(None)` pour un code absent ou non répertorié ; l'appelant
/// décide du libellé de repli. Une table inconnue est une erreur de
/// configuration.
pub fn resolve(
    table_name: &str,
    raw_code: Option<&str>,
) -> Result<Option<&'static str>, RosreestrError> {
    let table = table(table_name)?;
    Ok(raw_code
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .and_then(|c| table.get(c))
        .map(String::as_str))
}

/// Résout un code brut en substituant [`UNDEFINED`] aux codes inconnus.
pub fn resolve_or_undefined(
    table_name: &str,
    raw_code: Option<&str>,
) -> Result<&'static str, RosreestrError> {
    Ok(resolve(table_name, raw_code)?.unwrap_or(UNDEFINED))
}

/// Charge toutes les tables embarquées.
///
/// À appeler au démarrage : une table corrompue doit échouer bruyamment
/// avant de servir la moindre requête.
pub fn validate() -> Result<(), RosreestrError> {
    for name in [CATEGORIES, ALLOWED_USE, UTILIZATION, STATES] {
        table(name)?;
    }
    Ok(())
}
