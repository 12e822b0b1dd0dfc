//! Program entity definitions.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Academic program a member registers under.
///
/// Stored in the ledger and the registration log by its display name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Program {
    /// Engineering.
    #[default]
    #[serde(rename = "Ingeniería")]
    Ingenieria,
    /// Business administration.
    #[serde(rename = "Administración")]
    Administracion,
    /// Design.
    #[serde(rename = "Diseño")]
    Diseno,
    /// Psychology.
    #[serde(rename = "Psicología")]
    Psicologia,
    /// Economics.
    #[serde(rename = "Economía")]
    Economia,
    /// Law.
    #[serde(rename = "Derecho")]
    Derecho,
    /// Medicine.
    #[serde(rename = "Medicina")]
    Medicina,
    /// Anything else.
    #[serde(rename = "Otra")]
    Otra,
}

impl Program {
    /// Every program, in the order offered by the registration form.
    pub const ALL: [Program; 8] = [
        Program::Ingenieria,
        Program::Administracion,
        Program::Diseno,
        Program::Psicologia,
        Program::Economia,
        Program::Derecho,
        Program::Medicina,
        Program::Otra,
    ];

    /// Returns the display name, which is also the persisted value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Program::Ingenieria => "Ingeniería",
            Program::Administracion => "Administración",
            Program::Diseno => "Diseño",
            Program::Psicologia => "Psicología",
            Program::Economia => "Economía",
            Program::Derecho => "Derecho",
            Program::Medicina => "Medicina",
            Program::Otra => "Otra",
        }
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string does not name one of the fixed programs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown program: {0}")]
pub struct UnknownProgram(pub String);

impl FromStr for Program {
    type Err = UnknownProgram;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Program::ALL
            .into_iter()
            .find(|program| program.as_str() == s)
            .ok_or_else(|| UnknownProgram(s.to_string()))
    }
}
