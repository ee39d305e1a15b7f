use serde::{
    Deserialize,
    Serialize,
};

/// Error that may occur while parsing a [`SearchMode`].
#[derive(Debug, thiserror::Error)]
#[error("invalid search mode '{0}', expected 'color' or 'bovw'")]
pub struct FromStrError(String);

/// The ranking algorithm the service uses for a results page
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    /// Global color histogram similarity
    #[default]
    Color,

    /// Bag-of-visual-words feature similarity
    Bovw,
}

impl SearchMode {
    /// The path segment for this mode.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Color => "color",
            Self::Bovw => "bovw",
        }
    }
}

impl std::str::FromStr for SearchMode {
    type Err = FromStrError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input {
            "color" => Ok(Self::Color),
            "bovw" => Ok(Self::Bovw),
            _ => Err(FromStrError(input.to_string())),
        }
    }
}

impl std::fmt::Display for SearchMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
