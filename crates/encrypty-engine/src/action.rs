//! The processing verb forwarded to the engine.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Transformation requested from the engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProcessingAction {
    /// Encrypt every file under the target.
    #[default]
    Encrypt,
    /// Decrypt every file under the target.
    Decrypt,
}

impl ProcessingAction {
    /// Keyword written on the second directive line.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Encrypt => "encrypt",
            Self::Decrypt => "decrypt",
        }
    }

    /// Past tense used in human-readable summaries.
    #[must_use]
    pub const fn past_tense(self) -> &'static str {
        match self {
            Self::Encrypt => "encrypted",
            Self::Decrypt => "decrypted",
        }
    }
}

impl Display for ProcessingAction {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl FromStr for ProcessingAction {
    type Err = EngineError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "encrypt" => Ok(Self::Encrypt),
            "decrypt" => Ok(Self::Decrypt),
            _ => Err(EngineError::InvalidAction {
                value: value.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_case_insensitively() -> Result<(), EngineError> {
        assert_eq!("ENCRYPT".parse::<ProcessingAction>()?, ProcessingAction::Encrypt);
        assert_eq!(" Decrypt ".parse::<ProcessingAction>()?, ProcessingAction::Decrypt);
        Ok(())
    }

    #[test]
    fn rejects_unknown_verbs() {
        let err = "shred".parse::<ProcessingAction>();
        assert!(matches!(err, Err(EngineError::InvalidAction { value }) if value == "shred"));
    }

    #[test]
    fn renders_lowercase_and_past_tense() {
        assert_eq!(ProcessingAction::Decrypt.to_string(), "decrypt");
        assert_eq!(ProcessingAction::Encrypt.past_tense(), "encrypted");
        assert_eq!(ProcessingAction::default(), ProcessingAction::Encrypt);
    }
}
