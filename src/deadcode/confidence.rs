//! Risk-factor rules for dead-reference candidates.
//!
//! Assignment is a deterministic rule set, not a weighted score: each rule
//! either fires or does not, and confidence is derived purely from the
//! number of factors that fired (0 -> high, 1-2 -> medium, 3+ -> low).
//! The assessor is total; no input can make it fail.

use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;

use crate::core::{ExportFact, ImportFact};

pub const LIKELY_PUBLIC_API: &str = "likely public API";
pub const TEST_CONTEXT: &str = "test context";
pub const TYPE_ONLY_EXPORT: &str = "type-only export";
pub const DEFAULT_EXPORT: &str = "default export";
pub const DYNAMICALLY_LOADED: &str = "dynamically loaded";
pub const SIDE_EFFECT_IMPORT: &str = "side-effect import";
pub const FRAMEWORK_SENTINEL: &str = "framework sentinel";

static TEST_PATH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\.test\.|\.spec\.|__tests__|/tests?/)").unwrap());

static DYNAMIC_STEM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(config|setup|bootstrap)").unwrap());

static SIDE_EFFECT_SPECIFIER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\.(css|scss|sass|less|styl)$|polyfill)").unwrap());

const API_NAME_PREFIXES: &[&str] = &["create", "use", "get", "set", "init"];
const API_NAME_SUFFIXES: &[&str] = &["Config", "Utils", "Helper"];
const ENTRY_STEMS: &[&str] = &["index", "main"];
const PUBLIC_DIRS: &[&str] = &["lib", "public", "api"];
const FRAMEWORK_NAMES: &[&str] = &["React", "h", "jsx", "jsxs", "Fragment"];

/// Reasons an apparently-dead export may still be referenced in ways the
/// fact set cannot see
pub fn export_risk_factors(export: &ExportFact) -> Vec<String> {
    let mut factors = Vec::new();

    if is_likely_public_api(&export.module, &export.name) {
        factors.push(LIKELY_PUBLIC_API.to_string());
    }
    if is_test_path(&export.module) {
        factors.push(TEST_CONTEXT.to_string());
    }
    if export.kind.is_type_level() {
        factors.push(TYPE_ONLY_EXPORT.to_string());
    }
    if export.is_default {
        factors.push(DEFAULT_EXPORT.to_string());
    }
    if is_dynamically_loaded(&export.module) {
        factors.push(DYNAMICALLY_LOADED.to_string());
    }

    factors
}

/// Reasons an apparently-unmatched import may still be intentional
pub fn import_risk_factors(import: &ImportFact) -> Vec<String> {
    let mut factors = Vec::new();

    if is_test_path(&import.module) {
        factors.push(TEST_CONTEXT.to_string());
    }
    if SIDE_EFFECT_SPECIFIER.is_match(&import.source) {
        factors.push(SIDE_EFFECT_IMPORT.to_string());
    }
    if FRAMEWORK_NAMES.contains(&import.name.as_str()) {
        factors.push(FRAMEWORK_SENTINEL.to_string());
    }
    if import.type_only {
        factors.push(TYPE_ONLY_EXPORT.to_string());
    }

    factors
}

fn is_likely_public_api(module: &str, name: &str) -> bool {
    let path = Path::new(module);
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default();

    if ENTRY_STEMS.contains(&stem) {
        return true;
    }
    if path.components().any(|c| {
        c.as_os_str()
            .to_str()
            .map(|s| PUBLIC_DIRS.contains(&s))
            .unwrap_or(false)
    }) {
        return true;
    }
    if API_NAME_SUFFIXES.iter().any(|suffix| name.ends_with(suffix)) {
        return true;
    }
    API_NAME_PREFIXES.iter().any(|prefix| {
        name.strip_prefix(prefix)
            .and_then(|rest| rest.chars().next())
            .map(|c| c.is_uppercase())
            .unwrap_or(false)
    })
}

fn is_test_path(module: &str) -> bool {
    TEST_PATH.is_match(module)
}

fn is_dynamically_loaded(module: &str) -> bool {
    Path::new(module)
        .file_stem()
        .and_then(|s| s.to_str())
        .map(|stem| DYNAMIC_STEM.is_match(stem))
        .unwrap_or(false)
}
