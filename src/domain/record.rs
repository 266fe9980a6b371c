use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

pub type RecordId = i64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Label {
    Spam,
    Ham,
}

impl Label {
    pub fn as_str(&self) -> &'static str {
        match self {
            Label::Spam => "Spam",
            Label::Ham => "Ham",
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Label {
    type Err = String;

    /// Accepts the display names as well as the model's numeric classes
    /// (`1` spam, `0` ham), ignoring case and surrounding whitespace.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "spam" | "1" => Ok(Label::Spam),
            "ham" | "0" => Ok(Label::Ham),
            other => Err(format!("unknown classification label: {other:?}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationRecord {
    pub id: RecordId,
    pub text: String,
    pub classification: Label,
}

/// Payload sent to the save endpoint; the backend assigns its own id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewRecord {
    pub text: String,
    pub classification: Label,
}
