use serde::Deserialize;
use serde::Serialize;

/// Which of the two bearer token flavors a token is.
/// Serialized into the `type` claim as `"access"` or `"refresh"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    Access,
    Refresh,
}

impl Kind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Access => "access",
            Self::Refresh => "refresh",
        }
    }
}

impl std::fmt::Display for Kind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Kind {
    type Error = String;
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s {
            "access" => Ok(Self::Access),
            "refresh" => Ok(Self::Refresh),
            other => Err(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_names() {
        assert_eq!(Kind::Access.to_string(), "access");
        assert_eq!(Kind::Refresh.to_string(), "refresh");
        assert_eq!(Kind::try_from("refresh"), Ok(Kind::Refresh));
        assert!(Kind::try_from("bearer").is_err());
    }
}
