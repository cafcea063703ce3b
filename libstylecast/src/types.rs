//! Core types for Stylecast
//!
//! Request/response payloads exchanged with the backend API plus the
//! persona and verbosity vocabulary shown to users.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Timestamp format used by the backend (`created_at` fields)
pub const BACKEND_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A writing-style profile known to this client
///
/// The persona travels to the backend as an opaque string; this table only
/// drives labels and the persona picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PersonaInfo {
    /// Wire identifier (e.g., "hitchens")
    pub id: &'static str,
    /// Full name shown in the picker
    pub display_name: &'static str,
    /// Short description of the style
    pub tagline: &'static str,
    /// Style badge
    pub style: &'static str,
    /// Signature appended to exported images
    pub signature: &'static str,
}

pub const PERSONAS: &[PersonaInfo] = &[
    PersonaInfo {
        id: "hitchens",
        display_name: "Christopher Hitchens",
        tagline: "Intellectual & Literary Analysis",
        style: "Intellectual Style",
        signature: "Christopher Hitchens",
    },
    PersonaInfo {
        id: "trump",
        display_name: "Donald Trump",
        tagline: "Bold & Direct Communication",
        style: "Direct Style",
        signature: "Donald J. Trump",
    },
    PersonaInfo {
        id: "friedman",
        display_name: "Milton Friedman",
        tagline: "Economic & Analytical Perspective",
        style: "Analytical Style",
        signature: "Milton Friedman",
    },
];

/// Look up a known persona by id (case-insensitive)
pub fn persona_info(id: &str) -> Option<&'static PersonaInfo> {
    PERSONAS.iter().find(|p| p.id.eq_ignore_ascii_case(id))
}

/// Persona after `current` in picker order, wrapping around
///
/// Unknown personas restart at the first entry.
pub fn next_persona(current: &str) -> &'static str {
    let pos = PERSONAS.iter().position(|p| p.id.eq_ignore_ascii_case(current));
    match pos {
        Some(i) => PERSONAS[(i + 1) % PERSONAS.len()].id,
        None => PERSONAS[0].id,
    }
}

/// Requested response length
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Verbosity {
    #[default]
    Concise = 1,
    Moderate = 2,
    Verbose = 3,
}

impl Verbosity {
    pub fn level(self) -> u8 {
        self as u8
    }

    pub fn label(self) -> &'static str {
        match self {
            Verbosity::Concise => "Concise - Brief Response",
            Verbosity::Moderate => "Moderate - Balanced Length",
            Verbosity::Verbose => "Verbose - Detailed Analysis",
        }
    }

    /// Next level, wrapping from Verbose back to Concise
    pub fn cycle(self) -> Self {
        match self {
            Verbosity::Concise => Verbosity::Moderate,
            Verbosity::Moderate => Verbosity::Verbose,
            Verbosity::Verbose => Verbosity::Concise,
        }
    }
}

impl TryFrom<u8> for Verbosity {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Verbosity::Concise),
            2 => Ok(Verbosity::Moderate),
            3 => Ok(Verbosity::Verbose),
            other => Err(format!("Invalid verbosity level: {} (expected 1, 2 or 3)", other)),
        }
    }
}

impl From<Verbosity> for u8 {
    fn from(v: Verbosity) -> u8 {
        v.level()
    }
}

impl FromStr for Verbosity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "1" | "concise" => Ok(Verbosity::Concise),
            "2" | "moderate" => Ok(Verbosity::Moderate),
            "3" | "verbose" => Ok(Verbosity::Verbose),
            _ => Err(format!(
                "Invalid verbosity: '{}'. Valid options: concise (1), moderate (2), verbose (3)",
                s
            )),
        }
    }
}

impl fmt::Display for Verbosity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verbosity::Concise => write!(f, "concise"),
            Verbosity::Moderate => write!(f, "moderate"),
            Verbosity::Verbose => write!(f, "verbose"),
        }
    }
}

/// Body of `POST /api/transform`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransformRequest {
    pub text: String,
    pub persona: String,
    pub verbosity: Verbosity,
    #[serde(rename = "api_provider", skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
}

/// Successful reply from `POST /api/transform`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransformResponse {
    pub transformed_text: String,
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub api_provider: Option<String>,
}

/// Reply from `GET /api/config/providers`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvidersResponse {
    pub providers: Vec<String>,
    pub default: String,
}

/// Account record as returned by the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub is_admin: bool,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// One stored transformation (history gallery and admin dashboard rows)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transformation {
    pub id: i64,
    pub input_text: String,
    pub output_text: String,
    pub verbosity_level: u8,
    pub created_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub persona: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_provider: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
    /// Author, present on admin listings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

impl Transformation {
    /// Parsed `created_at`, if the backend used its usual format
    pub fn created_at_parsed(&self) -> Option<NaiveDateTime> {
        NaiveDateTime::parse_from_str(&self.created_at, BACKEND_TIME_FORMAT).ok()
    }
}

/// Reply from login and registration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    #[serde(default)]
    pub message: Option<String>,
    pub user: User,
    pub token: String,
}

/// Reply from `GET /api/auth/user`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserEnvelope {
    pub user: User,
}

/// Error body the backend sends with non-2xx responses
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}
