//! Routing decision produced by the evaluator.

use std::fmt;

/// Decision represents the route chosen for a hostname.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Decision {
    /// Route directly without proxy
    #[default]
    Direct,
    /// Route through proxy
    Proxy,
}

impl Decision {
    /// Get the string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Decision::Direct => "DIRECT",
            Decision::Proxy => "PROXY",
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Decision {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "DIRECT" => Ok(Decision::Direct),
            "PROXY" => Ok(Decision::Proxy),
            _ => Err(()),
        }
    }
}
