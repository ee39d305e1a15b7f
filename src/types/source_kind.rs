use serde::{
    Deserialize,
    Serialize,
};

/// The site a matched image was originally posted to.
///
/// This comes straight from the label on the results page.
/// Labels without a dedicated variant are passed through in [`SourceKind::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SourceKind {
    Pixiv,
    Twitter,
    Amazon,
    DlSite,
    Tinami,

    /// ニコニコ静画
    NicoNicoSeiga,

    /// An unrecognized site label
    Other(String),
}

impl SourceKind {
    /// The label the results page uses for this site.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Pixiv => "pixiv",
            Self::Twitter => "twitter",
            Self::Amazon => "amazon",
            Self::DlSite => "dlsite",
            Self::Tinami => "tinami",
            Self::NicoNicoSeiga => "ニコニコ静画",
            Self::Other(label) => label.as_str(),
        }
    }
}

impl From<&str> for SourceKind {
    fn from(label: &str) -> Self {
        match label {
            "pixiv" => Self::Pixiv,
            "twitter" => Self::Twitter,
            "amazon" => Self::Amazon,
            "dlsite" => Self::DlSite,
            "tinami" => Self::Tinami,
            "ニコニコ静画" => Self::NicoNicoSeiga,
            _ => Self::Other(label.to_string()),
        }
    }
}

impl From<String> for SourceKind {
    fn from(label: String) -> Self {
        Self::from(label.as_str())
    }
}

impl From<SourceKind> for String {
    fn from(kind: SourceKind) -> Self {
        match kind {
            SourceKind::Other(label) => label,
            kind => kind.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn known_labels() {
        for kind in [
            SourceKind::Pixiv,
            SourceKind::Twitter,
            SourceKind::Amazon,
            SourceKind::DlSite,
            SourceKind::Tinami,
            SourceKind::NicoNicoSeiga,
        ] {
            assert_eq!(SourceKind::from(kind.as_str()), kind);
        }
    }

    #[test]
    fn unknown_labels_pass_through() {
        let kind = SourceKind::from("fanbox");
        assert_eq!(kind, SourceKind::Other("fanbox".into()));
        assert_eq!(String::from(kind), "fanbox");
    }
}
