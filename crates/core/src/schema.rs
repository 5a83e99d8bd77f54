//! Record schemas and the header classifier.
//!
//! A schema is plain data: signature columns that identify it, the columns
//! that must be present, the field rules, and the identity column used for
//! duplicate detection. Adding a record type means adding a
//! [`SchemaDefinition`] to the registry.
//!
//! Signature sets of the schemas in one registry must be mutually
//! exclusive. If a header satisfies more than one, the schema declared
//! first wins; the classifier does not try to break the tie any other way.

use std::collections::HashSet;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::normalize::canonical_key;
use crate::rules::{FieldKind, FieldRule};

// ── Defaults ─────────────────────────────────────────────────────────

/// 18-character CURP: four letters, birth date (YYMMDD), sex marker, state
/// code, three internal consonants, a homoclave character and a check digit.
pub const DEFAULT_CURP_PATTERN: &str =
    r"^[A-Z]{4}\d{2}(0[1-9]|1[0-2])(0[1-9]|[12]\d|3[01])[HMX][A-Z]{2}[B-DF-HJ-NP-TV-Z]{3}[A-Z0-9]\d$";

/// 12-character RFC for legal entities: three letters, incorporation date,
/// three-character homoclave.
pub const DEFAULT_RFC_PATTERN: &str = r"^[A-Z&Ñ]{3}\d{6}[A-Z0-9]{3}$";

pub const DEFAULT_SEX_CODES: &[&str] = &["H", "M"];
pub const DEFAULT_AGE_MIN: i64 = 0;
pub const DEFAULT_AGE_MAX: i64 = 120;

const POSTAL_CODE_PATTERN: &str = r"^\d{5}$";
const STATE_KEY_PATTERN: &str = r"^\d{2}$";
const MUNICIPALITY_KEY_PATTERN: &str = r"^\d{3}$";

// ── Types ────────────────────────────────────────────────────────────

/// The closed set of record types the validator knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchemaKind {
    PersonRecord,
    SocialActorRecord,
    Unrecognized,
}

impl SchemaKind {
    /// Name used in export file names (`<NAME>_VALIDATED.<ext>`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PersonRecord => "PUB_PERSONAS",
            Self::SocialActorRecord => "PUB_ACTORES_SOCIALES",
            Self::Unrecognized => "UNRECOGNIZED",
        }
    }
}

impl std::fmt::Display for SchemaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct SchemaDefinition {
    pub kind: SchemaKind,
    pub signature_columns: Vec<String>,
    pub required_columns: Vec<String>,
    pub rules: Vec<FieldRule>,
    pub identity_column: Option<String>,
}

impl SchemaDefinition {
    /// `true` when every signature column is in `header_keys` (canonical).
    fn matches(&self, header_keys: &HashSet<String>) -> bool {
        !self.signature_columns.is_empty()
            && self
                .signature_columns
                .iter()
                .all(|c| header_keys.contains(&canonical_key(c)))
    }

    /// Required columns absent from the header, in declaration order.
    pub fn missing_columns(&self, header: &[String]) -> Vec<String> {
        let keys = header_keys(header);
        self.required_columns
            .iter()
            .filter(|c| !keys.contains(&canonical_key(c)))
            .cloned()
            .collect()
    }
}

/// Parameters that vary between deployments of the registry form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryConfig {
    pub sex_codes: Vec<String>,
    pub curp_pattern: String,
    pub rfc_pattern: String,
    pub age_min: i64,
    pub age_max: i64,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            sex_codes: DEFAULT_SEX_CODES.iter().map(|s| s.to_string()).collect(),
            curp_pattern: DEFAULT_CURP_PATTERN.to_string(),
            rfc_pattern: DEFAULT_RFC_PATTERN.to_string(),
            age_min: DEFAULT_AGE_MIN,
            age_max: DEFAULT_AGE_MAX,
        }
    }
}

/// Ordered set of schemas; declaration order is classification priority.
#[derive(Debug, Clone)]
pub struct SchemaRegistry {
    schemas: Vec<SchemaDefinition>,
}

impl SchemaRegistry {
    pub fn new(schemas: Vec<SchemaDefinition>) -> Self {
        Self { schemas }
    }

    /// The built-in person and social-actor schemas, in that priority order.
    pub fn with_config(config: &RegistryConfig) -> Result<Self, CoreError> {
        if config.sex_codes.is_empty() {
            return Err(CoreError::Config("sex code list must not be empty".into()));
        }
        if config.age_min > config.age_max {
            return Err(CoreError::Config(format!(
                "age range is empty: min {} > max {}",
                config.age_min, config.age_max
            )));
        }

        let person = SchemaDefinition {
            kind: SchemaKind::PersonRecord,
            signature_columns: columns(&["CURP", "NOMBRE"]),
            required_columns: columns(&["CURP", "NOMBRE", "SEXO", "EDAD", "OCUPACION"]),
            rules: vec![
                FieldRule::required("CURP", pattern("CURP", &config.curp_pattern)?),
                FieldRule::required("NOMBRE", FieldKind::Required),
                FieldRule::required("SEXO", FieldKind::OneOf(config.sex_codes.clone())),
                FieldRule::required(
                    "EDAD",
                    FieldKind::BoundedInteger {
                        min: config.age_min,
                        max: config.age_max,
                    },
                ),
                FieldRule::required("OCUPACION", FieldKind::Required),
                FieldRule::optional("CODIGO_POSTAL", pattern("CODIGO_POSTAL", POSTAL_CODE_PATTERN)?),
                FieldRule::optional("ENTIDAD", pattern("ENTIDAD", STATE_KEY_PATTERN)?),
                FieldRule::optional("MUNICIPIO", pattern("MUNICIPIO", MUNICIPALITY_KEY_PATTERN)?),
            ],
            identity_column: Some("CURP".into()),
        };

        let social_actor = SchemaDefinition {
            kind: SchemaKind::SocialActorRecord,
            signature_columns: columns(&["RFC", "RAZON_SOCIAL"]),
            required_columns: columns(&["RFC", "RAZON_SOCIAL", "ENTIDAD", "MUNICIPIO"]),
            rules: vec![
                FieldRule::required("RFC", pattern("RFC", &config.rfc_pattern)?),
                FieldRule::required("RAZON_SOCIAL", FieldKind::Required),
                FieldRule::required("ENTIDAD", pattern("ENTIDAD", STATE_KEY_PATTERN)?),
                FieldRule::required("MUNICIPIO", pattern("MUNICIPIO", MUNICIPALITY_KEY_PATTERN)?),
                FieldRule::optional("CODIGO_POSTAL", pattern("CODIGO_POSTAL", POSTAL_CODE_PATTERN)?),
            ],
            identity_column: Some("RFC".into()),
        };

        Ok(Self::new(vec![person, social_actor]))
    }

    pub fn schemas(&self) -> &[SchemaDefinition] {
        &self.schemas
    }

    /// First schema (in declaration order) whose signature columns are all
    /// present in `header`, or `None` for an unrecognized file.
    pub fn classify(&self, header: &[String]) -> Option<&SchemaDefinition> {
        let keys = header_keys(header);
        self.schemas.iter().find(|s| s.matches(&keys))
    }

    /// Same as [`classify`](Self::classify) but reduced to the schema kind.
    pub fn classify_kind(&self, header: &[String]) -> SchemaKind {
        self.classify(header)
            .map(|s| s.kind)
            .unwrap_or(SchemaKind::Unrecognized)
    }
}

// ── Private helpers ──────────────────────────────────────────────────

fn header_keys(header: &[String]) -> HashSet<String> {
    header
        .iter()
        .map(|h| canonical_key(h))
        .filter(|k| !k.is_empty())
        .collect()
}

fn columns(names: &[&str]) -> Vec<String> {
    names.iter().map(|n| n.to_string()).collect()
}

fn pattern(column: &str, source: &str) -> Result<FieldKind, CoreError> {
    Regex::new(source)
        .map(FieldKind::Pattern)
        .map_err(|e| CoreError::Config(format!("invalid pattern for {column}: {e}")))
}
