use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

//
// ─── LANGUAGE ──────────────────────────────────────────────────────────────────
//

/// Language a quiz is played in. Questions are stored per language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Language {
    Uz,
    Ru,
}

impl Language {
    pub const ALL: [Language; 2] = [Language::Uz, Language::Ru];

    /// Storage and wire code (`uz`, `ru`).
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Language::Uz => "uz",
            Language::Ru => "ru",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Language {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "uz" => Ok(Language::Uz),
            "ru" => Ok(Language::Ru),
            other => Err(ValidationError::UnknownLanguage(other.to_string())),
        }
    }
}

//
// ─── CATEGORY ──────────────────────────────────────────────────────────────────
//

/// Quiz topic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Web,
    Capitals,
    Football,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Web, Category::Capitals, Category::Football];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Web => "web",
            Category::Capitals => "capitals",
            Category::Football => "football",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "web" => Ok(Category::Web),
            "capitals" => Ok(Category::Capitals),
            "football" => Ok(Category::Football),
            other => Err(ValidationError::UnknownCategory(other.to_string())),
        }
    }
}

//
// ─── QUESTION COUNT ────────────────────────────────────────────────────────────
//

/// Number of questions the user asked for. Restricted to `ALLOWED`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QuestionCount(u32);

impl QuestionCount {
    pub const ALLOWED: [u32; 3] = [3, 5, 10];

    /// Creates a count if it is one of the selectable values.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::UnsupportedCount` for any other value.
    pub fn new(value: u32) -> Result<Self, ValidationError> {
        if Self::ALLOWED.contains(&value) {
            Ok(Self(value))
        } else {
            Err(ValidationError::UnsupportedCount(value))
        }
    }

    #[must_use]
    pub fn value(self) -> u32 {
        self.0
    }

    #[must_use]
    pub fn as_usize(self) -> usize {
        usize::try_from(self.0).unwrap_or(usize::MAX)
    }
}

impl fmt::Display for QuestionCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for QuestionCount {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.trim().parse::<u32>().map_err(|_| ValidationError::Parse {
            kind: "QuestionCount",
            raw: s.to_string(),
        })?;
        Self::new(value)
    }
}
