//! Platform classification
//!
//! The platform class decides which pairing shortcuts are worth trying. It
//! is computed once at startup and never changes during a session.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Host platform class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Android,
    Ios,
    Other,
}

impl Platform {
    /// Classifies the platform this binary was compiled for
    pub fn detect() -> Self {
        Self::from_os(std::env::consts::OS)
    }

    /// Classifies an OS name as reported by `std::env::consts::OS`
    pub fn from_os(os: &str) -> Self {
        match os {
            "android" => Self::Android,
            "ios" => Self::Ios,
            _ => Self::Other,
        }
    }

    /// Classifies a browser-style user agent string
    pub fn from_user_agent(user_agent: &str) -> Self {
        let ua = user_agent.to_ascii_lowercase();
        if ua.contains("android") {
            Self::Android
        } else if ua.contains("iphone") || ua.contains("ipad") || ua.contains("ipod") {
            Self::Ios
        } else {
            Self::Other
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Android => "android",
            Self::Ios => "ios",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "android" => Ok(Self::Android),
            "ios" => Ok(Self::Ios),
            "other" => Ok(Self::Other),
            other => Err(format!(
                "unknown platform '{}' (expected android, ios or other)",
                other
            )),
        }
    }
}
