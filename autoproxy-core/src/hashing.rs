//! Hashing System - SHA-256 Fingerprints for Render Jobs
//!
//! Identical card text rendered through the same template version always
//! produces the same job hash, so re-renders can be skipped or audited.

use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fmt::Write;

use crate::card::CardAttributes;
use crate::class::CardClass;

/// Compute SHA-256 hash of bytes, return lowercase hex
pub fn sha256_hex(data: &[u8]) -> String {
    let digest = Sha256::digest(data);
    let mut hex = String::with_capacity(digest.len() * 2);
    for byte in digest.iter() {
        // Writing into a String cannot fail.
        let _ = write!(hex, "{:02x}", byte);
    }
    hex
}

/// Canonical JSON: object keys sorted, no whitespace.
///
/// `serde_json::Map` is ordered by key unless `preserve_order` is enabled,
/// so a round trip through `Value` sorts every level.
pub fn canonical_json<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string(&serde_json::to_value(value)?)
}

pub fn compute_manifest_hash<T: Serialize>(manifest: &T) -> Result<String, serde_json::Error> {
    Ok(sha256_hex(canonical_json(manifest)?.as_bytes()))
}

#[derive(Serialize)]
struct JobKey<'a> {
    card: &'a CardAttributes,
    card_class: CardClass,
    template_id: &'a str,
    template_version: &'a str,
    engine_version: &'a str,
}

/// job_hash = sha256(canonical(card, class, template id + version, engine version))
pub fn compute_job_hash(
    card: &CardAttributes,
    card_class: CardClass,
    template_id: &str,
    template_version: &str,
    engine_version: &str,
) -> Result<String, serde_json::Error> {
    compute_manifest_hash(&JobKey {
        card,
        card_class,
        template_id,
        template_version,
        engine_version,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colour::Colour;
    use serde_json::json;

    #[test]
    fn test_canonical_json_sorted() {
        let obj = json!({"z": 1, "a": {"y": 2, "b": 3}, "m": [ {"k": 1, "c": 2} ]});
        let canonical = canonical_json(&obj).unwrap();
        assert_eq!(canonical, r#"{"a":{"b":3,"y":2},"m":[{"c":2,"k":1}],"z":1}"#);
    }

    #[test]
    fn test_sha256_known_vector() {
        assert_eq!(
            sha256_hex(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_job_hash_tracks_inputs() {
        let card = CardAttributes::new("{2}{G}", "Creature — Bear", "", vec![Colour::G]);
        let h1 = compute_job_hash(&card, CardClass::Normal, "normal", "1.0.0", "1.0.0").unwrap();
        let h2 = compute_job_hash(&card, CardClass::Normal, "normal", "1.0.0", "1.0.0").unwrap();
        assert_eq!(h1, h2);

        let bumped = compute_job_hash(&card, CardClass::Normal, "normal", "1.1.0", "1.0.0").unwrap();
        assert_ne!(h1, bumped);
    }

    #[test]
    fn test_job_hash_keys_on_card_and_class() {
        let card = CardAttributes::new("{2}{G}", "Creature — Bear", "", vec![Colour::G]);
        let base = compute_job_hash(&card, CardClass::Normal, "normal", "1.0.0", "1.0.0").unwrap();

        let snow = compute_job_hash(&card, CardClass::Snow, "normal", "1.0.0", "1.0.0").unwrap();
        assert_ne!(base, snow);

        let recoloured = CardAttributes::new("{2}{R}", "Creature — Bear", "", vec![Colour::R]);
        let other = compute_job_hash(&recoloured, CardClass::Normal, "normal", "1.0.0", "1.0.0").unwrap();
        assert_ne!(base, other);
    }
}
