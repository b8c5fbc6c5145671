//! Tri naturel des numéros cadastraux
//!
//! Un numéro cadastral est une suite de segments séparés par `:`
//! (ex: `77:01:0001001:12`). Le tri compare segment par segment en
//! traitant les segments entièrement numériques comme des entiers :
//! `11:10:1` vient après `11:2:3`, contrairement au tri lexicographique.

use crate::error::RosreestrError;
use crate::types::PkkFeature;

/// Segment comparable d'un numéro cadastral.
///
/// Les segments numériques se comparent entre eux comme des entiers et
/// passent avant les segments textuels (ordre total, là où un `int < str`
/// n'est pas défini).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum Segment {
    /// Segment entièrement composé de chiffres
    Num(u64),
    /// Segment quelconque
    Text(String),
}

/// Découpe un numéro cadastral en segments comparables.
///
/// Un numéro vide n'est pas triable : `MalformedFeature`.
pub fn sort_key(numbpkk: &str) -> Result<Vec<Segment>, RosreestrError> {
    if numbpkk.is_empty() {
        return Err(RosreestrError::MalformedFeature(
            "empty cadastral number".into(),
        ));
    }

    Ok(numbpkk
        .split(':')
        .map(|seg| {
            if !seg.is_empty() && seg.bytes().all(|b| b.is_ascii_digit()) {
                match seg.parse::<u64>() {
                    Ok(n) => Segment::Num(n),
                    // Segment numérique trop long pour u64: comparaison textuelle
                    Err(_) => Segment::Text(seg.to_string()),
                }
            } else {
                Segment::Text(seg.to_string())
            }
        })
        .collect())
}

/// Trie un lot de features par numéro cadastral (tri stable, ordre naturel).
///
/// Chaque feature doit porter un `numbpkk` non vide ; la normalisation
/// écarte les features malformées avant d'arriver ici.
pub fn sort_features(features: &mut [PkkFeature]) -> Result<(), RosreestrError> {
    let mut keys = Vec::with_capacity(features.len());
    for feature in features.iter() {
        keys.push(sort_key(&feature.numbpkk)?);
    }

    let mut order: Vec<usize> = (0..features.len()).collect();
    order.sort_by(|&a, &b| keys[a].cmp(&keys[b]));

    // Réordonner en place selon la permutation calculée
    let mut sorted: Vec<PkkFeature> = order.iter().map(|&i| features[i].clone()).collect();
    features.swap_with_slice(&mut sorted);
    Ok(())
}
