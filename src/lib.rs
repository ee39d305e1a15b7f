//! A client for the ascii2d.net reverse image search.

mod byte_size;
mod client;
mod image;
pub mod types;

pub use crate::{
    byte_size::{
        parse_byte_size,
        ParseByteSizeError,
    },
    client::Client,
    image::Image,
    types::{
        Author,
        ExternalSource,
        FileType,
        Item,
        ItemSource,
        MainPage,
        SearchMode,
        SearchResult,
        Source,
        SourceKind,
    },
};
pub use reqwest::StatusCode;
pub use scraper::Html;
pub use url::Url;

/// The url of the public site
pub const DEFAULT_BASE_URL: &str = "https://ascii2d.net";

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Reqwest Error
    #[error(transparent)]
    Reqwest(#[from] reqwest::Error),

    /// Invalid HTTP Status
    #[error("invalid HTTP status '{0}'")]
    InvalidStatus(StatusCode),

    /// A url could not be built
    #[error("invalid url")]
    Url(#[from] url::ParseError),

    /// An image file could not be opened
    #[error("failed to open image file")]
    Io(#[from] std::io::Error),

    /// A tokio task failed to join
    #[error(transparent)]
    Join(#[from] tokio::task::JoinError),

    /// The landing page had no csrf token
    #[error("csrf token not found")]
    TokenNotFound(#[from] crate::types::main_page::FromHtmlError),

    /// The service did not redirect to a results page
    #[error("the query was rejected (HTTP status '{status}')")]
    QueryRejected { status: StatusCode },

    /// The redirect location had no search hash
    #[error("malformed redirect location '{location}'")]
    MalformedRedirect { location: String },

    /// Invalid Search Result
    #[error("invalid search result")]
    InvalidSearchResult(#[from] crate::types::search_result::FromHtmlError),
}
