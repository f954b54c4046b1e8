/// Reading, RawReading, Region, Parameter and the input error taxonomy.
///
/// Core data types for the pool chemistry service.
///
/// This module defines the shared domain model imported by all other modules.
/// Apart from field validation it contains no logic and no I/O.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ---------------------------------------------------------------------------
// Field names
// ---------------------------------------------------------------------------

/// Field keys as a form collaborator supplies them.
pub const FIELD_PH: &str = "ph";
pub const FIELD_ALKALINITY: &str = "alkalinity";
pub const FIELD_CALCIUM: &str = "calcium";
pub const FIELD_TEMPERATURE: &str = "temperature";
pub const FIELD_TDS: &str = "tds";
pub const FIELD_CYA: &str = "cyanuric";
pub const FIELD_FREE_CHLORINE: &str = "freechlorine";
pub const FIELD_SALT: &str = "salt";
pub const FIELD_SALT_DESIRED: &str = "salt_desired";
pub const FIELD_CAPACITY: &str = "capacity";

// ---------------------------------------------------------------------------
// Region
// ---------------------------------------------------------------------------

/// The fixed set of regions the service carries golden numbers for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Region {
    Arizona,
    Texas,
    Florida,
}

impl Region {
    pub const ALL: [Region; 3] = [Region::Arizona, Region::Texas, Region::Florida];

    /// Lowercase key, e.g. `"florida"`.
    pub fn key(&self) -> &'static str {
        match self {
            Region::Arizona => "arizona",
            Region::Texas => "texas",
            Region::Florida => "florida",
        }
    }

    /// Capitalised name for display, e.g. `"Florida"`.
    pub fn display_name(&self) -> &'static str {
        match self {
            Region::Arizona => "Arizona",
            Region::Texas => "Texas",
            Region::Florida => "Florida",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

impl FromStr for Region {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Region::ALL
            .iter()
            .copied()
            .find(|r| r.key() == wanted)
            .ok_or_else(|| ModelError::UnknownRegion(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Parameters
// ---------------------------------------------------------------------------

/// A water-chemistry parameter that can receive a dosing instruction.
/// These are the six keys of the dosing advice and the entries of a
/// weekly plan bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Parameter {
    Ph,
    Alkalinity,
    Calcium,
    Cya,
    Chlorine,
    Salt,
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Parameter::Ph => write!(f, "pH"),
            Parameter::Alkalinity => write!(f, "alkalinity"),
            Parameter::Calcium => write!(f, "calcium hardness"),
            Parameter::Cya => write!(f, "CYA"),
            Parameter::Chlorine => write!(f, "free chlorine"),
            Parameter::Salt => write!(f, "salt"),
        }
    }
}

// ---------------------------------------------------------------------------
// Reading types
// ---------------------------------------------------------------------------

/// One validated water test. All values are finite numbers.
///
/// `tds`, `cya` and `salt` are zero when the test did not include them.
/// `salt_desired` is the owner's chosen salt level for a salt-chlorine
/// generator pool, if they supplied one; absent means no salt is dosed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    pub ph: f64,
    pub alkalinity_ppm: f64,
    pub calcium_ppm: f64,
    pub temperature_f: f64,
    pub tds_ppm: f64,
    pub cya_ppm: f64,
    pub free_chlorine_ppm: f64,
    pub salt_ppm: f64,
    pub salt_desired_ppm: Option<f64>,
    pub pool_gallons: f64,
}

/// A reading as the collaborator hands it over: every field optional.
///
/// Deserializes from TOML or JSON using the form field names
/// (`ph`, `alkalinity`, `cyanuric`, `freechlorine`, `capacity`, ...).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawReading {
    pub ph: Option<f64>,
    pub alkalinity: Option<f64>,
    pub calcium: Option<f64>,
    pub temperature: Option<f64>,
    pub tds: Option<f64>,
    pub cyanuric: Option<f64>,
    pub freechlorine: Option<f64>,
    pub salt: Option<f64>,
    pub salt_desired: Option<f64>,
    pub capacity: Option<f64>,
    /// Region key; callers may override it.
    pub region: Option<String>,
}

impl RawReading {
    /// Builds a raw reading from text form fields.
    ///
    /// Blank values count as absent. Values that do not parse as a number
    /// are an error even for optional fields, so a typo is never silently
    /// treated as zero. Unknown keys are ignored.
    pub fn from_fields<'a, I>(fields: I) -> Result<Self, ModelError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut raw = RawReading::default();
        for (key, value) in fields {
            let value = value.trim();
            if value.is_empty() {
                continue;
            }
            let (field, slot) = match key {
                FIELD_PH => (FIELD_PH, &mut raw.ph),
                FIELD_ALKALINITY => (FIELD_ALKALINITY, &mut raw.alkalinity),
                FIELD_CALCIUM => (FIELD_CALCIUM, &mut raw.calcium),
                FIELD_TEMPERATURE => (FIELD_TEMPERATURE, &mut raw.temperature),
                FIELD_TDS => (FIELD_TDS, &mut raw.tds),
                FIELD_CYA => (FIELD_CYA, &mut raw.cyanuric),
                FIELD_FREE_CHLORINE => (FIELD_FREE_CHLORINE, &mut raw.freechlorine),
                FIELD_SALT => (FIELD_SALT, &mut raw.salt),
                FIELD_SALT_DESIRED => (FIELD_SALT_DESIRED, &mut raw.salt_desired),
                FIELD_CAPACITY => (FIELD_CAPACITY, &mut raw.capacity),
                "region" | "state" => {
                    raw.region = Some(value.to_string());
                    continue;
                }
                _ => continue,
            };
            *slot = Some(parse_number(field, value)?);
        }
        Ok(raw)
    }

    /// Validates the raw fields into a `Reading`.
    ///
    /// Required: pH, alkalinity, calcium, temperature, free chlorine and
    /// pool volume. TDS, CYA and salt default to zero.
    pub fn validate(&self) -> Result<Reading, ModelError> {
        Ok(Reading {
            ph: required(FIELD_PH, self.ph)?,
            alkalinity_ppm: required(FIELD_ALKALINITY, self.alkalinity)?,
            calcium_ppm: required(FIELD_CALCIUM, self.calcium)?,
            temperature_f: required(FIELD_TEMPERATURE, self.temperature)?,
            tds_ppm: optional(FIELD_TDS, self.tds)?,
            cya_ppm: optional(FIELD_CYA, self.cyanuric)?,
            free_chlorine_ppm: required(FIELD_FREE_CHLORINE, self.freechlorine)?,
            salt_ppm: optional(FIELD_SALT, self.salt)?,
            salt_desired_ppm: self
                .salt_desired
                .map(|v| finite(FIELD_SALT_DESIRED, v))
                .transpose()?,
            pool_gallons: required(FIELD_CAPACITY, self.capacity)?,
        })
    }
}

fn parse_number(field: &'static str, value: &str) -> Result<f64, ModelError> {
    value
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| ModelError::NotNumeric {
            field,
            value: value.to_string(),
        })
}

fn finite(field: &'static str, value: f64) -> Result<f64, ModelError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ModelError::NotNumeric {
            field,
            value: value.to_string(),
        })
    }
}

fn required(field: &'static str, value: Option<f64>) -> Result<f64, ModelError> {
    match value {
        Some(v) => finite(field, v),
        None => Err(ModelError::MissingInput { field }),
    }
}

fn optional(field: &'static str, value: Option<f64>) -> Result<f64, ModelError> {
    value.map(|v| finite(field, v)).unwrap_or(Ok(0.0))
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors raised while turning collaborator input into a `Reading`.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelError {
    /// A required numeric field was not supplied.
    MissingInput { field: &'static str },
    /// A field was supplied but is not a finite number.
    NotNumeric { field: &'static str, value: String },
    /// The region key is not one of arizona, texas, florida.
    UnknownRegion(String),
}

impl ModelError {
    /// True for the "please fill in all required fields" class of errors.
    pub fn is_missing_input(&self) -> bool {
        matches!(
            self,
            ModelError::MissingInput { .. } | ModelError::NotNumeric { .. }
        )
    }
}

impl fmt::Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelError::MissingInput { field } => write!(f, "Missing required field: {}", field),
            ModelError::NotNumeric { field, value } => {
                write!(f, "Field {} is not a number: {:?}", field, value)
            }
            ModelError::UnknownRegion(name) => write!(f, "Unknown region: {}", name),
        }
    }
}

impl std::error::Error for ModelError {}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
