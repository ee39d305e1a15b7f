use serde::{
    Deserialize,
    Serialize,
};

/// The file type of a matched image, as reported by the results page.
///
/// Unknown types are kept as-is in [`FileType::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FileType {
    Jpeg,
    Png,

    /// A type with no dedicated variant, lower-cased
    Other(String),
}

impl FileType {
    /// The lower-cased name of this type.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Jpeg => "jpeg",
            Self::Png => "png",
            Self::Other(name) => name.as_str(),
        }
    }
}

impl From<&str> for FileType {
    fn from(name: &str) -> Self {
        let name = name.to_lowercase();
        match name.as_str() {
            "jpeg" => Self::Jpeg,
            "png" => Self::Png,
            _ => Self::Other(name),
        }
    }
}

impl From<String> for FileType {
    fn from(name: String) -> Self {
        Self::from(name.as_str())
    }
}

impl From<FileType> for String {
    fn from(file_type: FileType) -> Self {
        match file_type {
            FileType::Other(name) => name,
            file_type => file_type.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for FileType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn from_page_text() {
        assert_eq!(FileType::from("JPEG"), FileType::Jpeg);
        assert_eq!(FileType::from("PNG"), FileType::Png);
        assert_eq!(FileType::from("WEBP"), FileType::Other("webp".into()));
        assert_eq!(FileType::from("GIF").as_str(), "gif");
    }
}
