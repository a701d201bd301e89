use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

#[derive(Debug)]
pub struct ParseCadenceError(String);

impl fmt::Display for ParseCadenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
impl std::error::Error for ParseCadenceError {}

// when the diagnostic plot gets written
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default, Deserialize)]
#[serde(try_from = "String")]
pub enum RenderCadence {
    #[default]
    EveryEpoch,
    FinalOnly,
    Never,
}

impl FromStr for RenderCadence {
    type Err = ParseCadenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "every" | "epoch" | "every-epoch" => Ok(RenderCadence::EveryEpoch),
            "final" | "final-only" | "end" => Ok(RenderCadence::FinalOnly),
            "never" | "none" | "off" => Ok(RenderCadence::Never),
            other => Err(ParseCadenceError(format!("invalid render cadence: {other}"))),
        }
    }
}

impl TryFrom<String> for RenderCadence {
    type Error = ParseCadenceError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl fmt::Display for RenderCadence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderCadence::EveryEpoch => write!(f, "every"),
            RenderCadence::FinalOnly => write!(f, "final"),
            RenderCadence::Never => write!(f, "never"),
        }
    }
}
