//! Per-run metadata: an ordered list of key/value maps.
//!
//! Lookups walk the maps in order and return the first map holding any of
//! the requested keys, so earlier entries shadow later ones.

use crate::core::{MigrationError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Scalar accepted as a meta value in the config file. Everything is kept
/// as its string form.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum MetaScalar {
    Text(String),
    Flag(bool),
    Integer(i64),
    Float(f64),
}

impl From<MetaScalar> for String {
    fn from(value: MetaScalar) -> Self {
        match value {
            MetaScalar::Text(s) => s,
            MetaScalar::Flag(b) => b.to_string(),
            MetaScalar::Integer(i) => i.to_string(),
            MetaScalar::Float(f) => f.to_string(),
        }
    }
}

/// A single resolved entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Meta {
    pub key: String,
    pub value: String,
}

/// Ordered meta maps from the config file and `--meta`.
///
/// The locker selection reads it through [`Metas::get_value`]. [`Metas::is_true`],
/// [`Metas::get_long`] and [`Metas::remove`] are the typed accessors for
/// migration options given as flags or numbers, and for handing a migration
/// the metas without the keys another step has consumed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<BTreeMap<String, MetaScalar>>")]
pub struct Metas(Vec<BTreeMap<String, String>>);

impl From<Vec<BTreeMap<String, MetaScalar>>> for Metas {
    fn from(raw: Vec<BTreeMap<String, MetaScalar>>) -> Self {
        Self(
            raw.into_iter()
                .map(|map| map.into_iter().map(|(k, v)| (k, v.into())).collect())
                .collect(),
        )
    }
}

impl Metas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Prepend a single-entry map so it shadows anything loaded earlier.
    pub fn push_front(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0
            .insert(0, BTreeMap::from([(key.into(), value.into())]));
    }

    /// Append a single-entry map.
    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.push(BTreeMap::from([(key.into(), value.into())]));
    }

    pub fn get_meta(&self, keys: &[&str]) -> Option<Meta> {
        self.0.iter().find_map(|map| {
            keys.iter().find_map(|key| {
                map.get(*key).map(|value| Meta {
                    key: (*key).to_string(),
                    value: value.clone(),
                })
            })
        })
    }

    pub fn get_value(&self, keys: &[&str]) -> Option<String> {
        self.get_meta(keys).map(|m| m.value)
    }

    /// `"true"` check with a fallback when no key is present.
    pub fn is_true(&self, default: bool, keys: &[&str]) -> bool {
        self.get_meta(keys)
            .map_or(default, |m| m.value == "true")
    }

    pub fn get_long(&self, keys: &[&str]) -> Result<Option<i64>> {
        self.get_meta(keys)
            .map(|m| {
                m.value.trim().parse::<i64>().map_err(|e| {
                    MigrationError::configuration(format!(
                        "meta '{}' is not an integer ('{}'): {}",
                        m.key, m.value, e
                    ))
                })
            })
            .transpose()
    }

    /// Copy without the maps that contain any of `keys`.
    pub fn remove(&self, keys: &[&str]) -> Metas {
        if keys.is_empty() {
            return self.clone();
        }
        Metas(
            self.0
                .iter()
                .filter(|map| !keys.iter().any(|key| map.contains_key(*key)))
                .cloned()
                .collect(),
        )
    }
}

/// Parse a `key=value` CLI argument.
pub fn parse_meta_arg(arg: &str) -> std::result::Result<(String, String), String> {
    match arg.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.trim().to_string()))
        }
        _ => Err(format!("expected key=value, got '{arg}'")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Holder {
        metas: Metas,
    }

    fn sample() -> Metas {
        let holder: Holder = toml::from_str(
            r#"
            [[metas]]
            migrateSynchronizedLocker = "StampedLock"

            [[metas]]
            dryRun = true
            limit = 12

            [[metas]]
            migrateSynchronizedLocker = "ReentrantReadWriteLock"
            "#,
        )
        .unwrap();
        holder.metas
    }

    #[test]
    fn test_first_map_wins() {
        let metas = sample();
        assert_eq!(metas.len(), 3);
        assert_eq!(
            metas.get_value(&["migrateSynchronizedLocker"]).as_deref(),
            Some("StampedLock")
        );
    }

    #[test]
    fn test_non_string_scalars_become_strings() {
        let metas = sample();
        assert!(metas.is_true(false, &["dryRun"]));
        assert_eq!(metas.get_long(&["limit"]).unwrap(), Some(12));
        assert_eq!(metas.get_long(&["missing"]).unwrap(), None);
    }

    #[test]
    fn test_is_true_default() {
        let metas = Metas::new();
        assert!(metas.is_true(true, &["anything"]));
        assert!(!metas.is_true(false, &["anything"]));
    }

    #[test]
    fn test_get_long_rejects_text() {
        let mut metas = Metas::new();
        metas.push("limit", "many");
        assert!(metas.get_long(&["limit"]).is_err());
    }

    #[test]
    fn test_remove_drops_matching_maps() {
        let metas = sample().remove(&["migrateSynchronizedLocker"]);
        assert_eq!(metas.len(), 1);
        assert_eq!(metas.get_value(&["migrateSynchronizedLocker"]), None);
        assert_eq!(sample().remove(&[]), sample());
    }

    #[test]
    fn test_push_front_shadows() {
        let mut metas = sample();
        metas.push_front("migrateSynchronizedLocker", "ReentrantReadWriteLock");
        assert_eq!(
            metas.get_value(&["migrateSynchronizedLocker"]).as_deref(),
            Some("ReentrantReadWriteLock")
        );
    }

    #[test]
    fn test_parse_meta_arg() {
        assert_eq!(
            parse_meta_arg("migrateSynchronizedLocker=StampedLock").unwrap(),
            ("migrateSynchronizedLocker".to_string(), "StampedLock".to_string())
        );
        assert!(parse_meta_arg("novalue").is_err());
        assert!(parse_meta_arg("=x").is_err());
    }
}
