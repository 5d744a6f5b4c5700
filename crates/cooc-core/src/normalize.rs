//! Entity name canonicalization.
//!
//! # Overview
//!
//! Raw mention strings coming out of the extractor are mapped to canonical
//! entity names before any edge is built. Two steps, in order:
//!
//! 1. Strip disallowed characters (`:` by default) and trim whitespace.
//! 2. Look the stripped string up in the [`AliasTable`]. A hit returns the
//!    canonical target, a miss returns the stripped string itself.
//!
//! Lookup is exact and case-sensitive per entry: `trump` and `Trump` are
//! separate aliases and must both be listed to be folded together.
//!
//! Normalization never fails and never mutates its input. Empty names are a
//! valid result; [`Normalizer::normalize_all`] drops them so they never reach
//! the edge builder.

use std::collections::{BTreeMap, BTreeSet};

use crate::error::{Coded, ErrorCode};

/// Characters removed from every mention before alias lookup.
pub const DEFAULT_STRIP_CHARS: &[char] = &[':'];

/// Errors raised while building an [`AliasTable`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AliasError {
    /// The same alias was claimed by two different canonical names.
    #[error("alias {alias:?} is claimed by both {first:?} and {second:?}")]
    Conflict {
        alias: String,
        first: String,
        second: String,
    },
}

impl Coded for AliasError {
    fn error_code(&self) -> ErrorCode {
        ErrorCode::AliasConflict
    }
}

// ---------------------------------------------------------------------------
// AliasTable
// ---------------------------------------------------------------------------

/// Validated alias → canonical mapping.
///
/// Built once from configuration and immutable afterwards. Construction
/// rejects an alias that points at two different canonical names; listing
/// the same alias twice for the same name is harmless.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AliasTable {
    map: BTreeMap<String, String>,
}

impl AliasTable {
    /// An empty table: every name normalizes to itself.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from `(alias, canonical)` pairs.
    ///
    /// # Errors
    ///
    /// Returns [`AliasError::Conflict`] if an alias maps to two different
    /// canonical names.
    pub fn from_pairs<I, A, C>(pairs: I) -> Result<Self, AliasError>
    where
        I: IntoIterator<Item = (A, C)>,
        A: Into<String>,
        C: Into<String>,
    {
        let mut map: BTreeMap<String, String> = BTreeMap::new();
        for (alias, canonical) in pairs {
            let alias = alias.into();
            let canonical = canonical.into();
            match map.get(&alias) {
                Some(existing) if *existing != canonical => {
                    // Report the pair in a stable order regardless of input order.
                    let (first, second) = if *existing < canonical {
                        (existing.clone(), canonical)
                    } else {
                        (canonical, existing.clone())
                    };
                    return Err(AliasError::Conflict {
                        alias,
                        first,
                        second,
                    });
                }
                Some(_) => {}
                None => {
                    map.insert(alias, canonical);
                }
            }
        }
        Ok(Self { map })
    }

    /// Build a table from the config layout: canonical name → aliases.
    ///
    /// # Errors
    ///
    /// Returns [`AliasError::Conflict`] if an alias is listed under two
    /// canonical names.
    pub fn from_groups(groups: &BTreeMap<String, Vec<String>>) -> Result<Self, AliasError> {
        Self::from_pairs(groups.iter().flat_map(|(canonical, aliases)| {
            aliases
                .iter()
                .map(move |alias| (alias.clone(), canonical.clone()))
        }))
    }

    /// Canonical target for `alias`, if one is configured.
    #[must_use]
    pub fn resolve(&self, alias: &str) -> Option<&str> {
        self.map.get(alias).map(String::as_str)
    }

    /// Number of alias entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// `true` if no alias rules are configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Distinct canonical targets.
    #[must_use]
    pub fn canonical_names(&self) -> BTreeSet<&str> {
        self.map.values().map(String::as_str).collect()
    }
}

// ---------------------------------------------------------------------------
// Normalizer
// ---------------------------------------------------------------------------

/// Alias table plus the set of characters stripped before lookup.
#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    aliases: AliasTable,
    strip: Vec<char>,
}

impl Normalizer {
    /// Create a normalizer that strips `strip` characters before lookup.
    #[must_use]
    pub fn new(aliases: AliasTable, strip: impl IntoIterator<Item = char>) -> Self {
        Self {
            aliases,
            strip: strip.into_iter().collect(),
        }
    }

    /// Create a normalizer that strips [`DEFAULT_STRIP_CHARS`].
    #[must_use]
    pub fn with_default_strip(aliases: AliasTable) -> Self {
        Self::new(aliases, DEFAULT_STRIP_CHARS.iter().copied())
    }

    /// The alias table in use.
    #[must_use]
    pub const fn aliases(&self) -> &AliasTable {
        &self.aliases
    }

    /// Canonical name for a single raw mention.
    #[must_use]
    pub fn normalize(&self, raw: &str) -> String {
        canonicalize(raw, &self.aliases, &self.strip)
    }

    /// Normalize a whole mention sequence into a new vector, dropping names
    /// that end up empty. Order and repeated mentions are preserved.
    #[must_use]
    pub fn normalize_all<S: AsRef<str>>(&self, raw: &[S]) -> Vec<String> {
        raw.iter()
            .map(|m| self.normalize(m.as_ref()))
            .filter(|name| !name.is_empty())
            .collect()
    }
}

/// Normalize `raw` against `aliases`, stripping [`DEFAULT_STRIP_CHARS`].
#[must_use]
pub fn normalize(raw: &str, aliases: &AliasTable) -> String {
    canonicalize(raw, aliases, DEFAULT_STRIP_CHARS)
}

fn canonicalize(raw: &str, aliases: &AliasTable, strip: &[char]) -> String {
    let stripped: String = raw.chars().filter(|c| !strip.contains(c)).collect();
    let stripped = stripped.trim();
    aliases
        .resolve(stripped)
        .map_or_else(|| stripped.to_string(), str::to_string)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
