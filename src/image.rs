use reqwest::Body;
use std::{
    borrow::Cow,
    path::Path,
};
use tokio_util::codec::{
    BytesCodec,
    FramedRead,
};

/// An image to search for
#[derive(Debug)]
pub enum Image {
    /// A url to an image
    Url(String),

    /// An image file, streamed into the request body
    File { name: String, body: Body },
}

impl Image {
    /// Make an [`Image`] from a path, opening the file asynchronously.
    ///
    /// The file is read lazily while the request is sent,
    /// and is closed when the body is dropped.
    pub async fn from_path(path: &Path) -> std::io::Result<Self> {
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy())
            .unwrap_or(Cow::Borrowed("image.png"))
            .into();
        let file = tokio::fs::File::open(path).await?;
        Ok(Self::from_file(name, file))
    }

    /// Make an [`Image`] from a file and a name.
    pub fn from_file(name: String, file: tokio::fs::File) -> Self {
        let stream = FramedRead::new(file, BytesCodec::new());
        let body = Body::wrap_stream(stream);
        Self::File { name, body }
    }

    /// The name of the form field, and of the search endpoint, for this kind of image.
    pub fn field_name(&self) -> &'static str {
        match self {
            Self::Url(_) => "uri",
            Self::File { .. } => "file",
        }
    }

    /// Turn this into a multipart form for the search endpoint.
    pub(crate) fn into_form(self, token: &str) -> reqwest::multipart::Form {
        let field_name = self.field_name();
        let form =
            reqwest::multipart::Form::new().text("authenticity_token", token.to_string());

        match self {
            Self::Url(url) => form.text(field_name, url),
            Self::File { name, body } => {
                let part = reqwest::multipart::Part::stream(body).file_name(name);
                form.part(field_name, part)
            }
        }
    }
}

impl From<String> for Image {
    fn from(url: String) -> Self {
        Image::Url(url)
    }
}

impl From<&str> for Image {
    fn from(url: &str) -> Self {
        Image::Url(url.into())
    }
}

impl From<url::Url> for Image {
    fn from(url: url::Url) -> Self {
        Image::Url(url.into())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn field_names() {
        assert_eq!(Image::from("https://example.com/a.png").field_name(), "uri");

        let file = Image::File {
            name: "a.png".into(),
            body: Body::from(Vec::new()),
        };
        assert_eq!(file.field_name(), "file");
    }

    #[tokio::test]
    async fn from_missing_path_fails() {
        let error = Image::from_path(Path::new("./test_data/does-not-exist.png"))
            .await
            .expect_err("opened a missing file");
        assert_eq!(error.kind(), std::io::ErrorKind::NotFound);
    }
}
