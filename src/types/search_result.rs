use crate::{
    byte_size::{
        parse_byte_size,
        ParseByteSizeError,
    },
    FileType,
    SourceKind,
};
use once_cell::sync::Lazy;
use scraper::{
    node::Node,
    ElementRef,
    Html,
    Selector,
};
use serde::{
    Deserialize,
    Serialize,
};
use url::Url;

static ITEM_BOX_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".item-box").expect("invalid item box selector"));
static HASH_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".hash").expect("invalid hash selector"));
static INFO_LINE_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("small.text-muted").expect("invalid info line selector"));
static THUMBNAIL_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".image-box > img").expect("invalid thumbnail selector"));
static DETAIL_BOX_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".detail-box").expect("invalid detail box selector"));
static INFO_HEADER_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".info-header").expect("invalid info header selector"));
static EXTERNAL_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".external").expect("invalid external selector"));
static HEADING_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("h6").expect("invalid heading selector"));
static LINK_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a").expect("invalid link selector"));
static SMALL_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("small").expect("invalid small selector"));

/// The link text that marks an amazon source
const AMAZON_LINK_TEXT: &str = "amazon";

/// Error that may occur while parsing a [`SearchResult`] from [`Html`].
#[derive(Debug, thiserror::Error)]
pub enum FromHtmlError {
    /// A result card could not be parsed.
    ///
    /// `index` is the position of the card on the page, where 0 is the query image.
    #[error("malformed card {index}")]
    MalformedCard {
        index: usize,

        #[source]
        error: FromElementError,
    },
}

/// Error that may occur while parsing an [`Item`] from a result card.
#[derive(Debug, thiserror::Error)]
pub enum FromElementError {
    /// Missing the hash
    #[error("missing hash")]
    MissingHash,

    /// Missing the `<dimensions> <type> <size>` line
    #[error("missing info line")]
    MissingInfoLine,

    /// The info line did not have 3 parts
    #[error("invalid info line '{0}'")]
    InvalidInfoLine(String),

    /// The dimensions were not `<width>x<height>`
    #[error("invalid dimensions '{0}'")]
    InvalidDimensions(String),

    /// The file size was invalid
    #[error("invalid file size")]
    InvalidFileSize(#[source] ParseByteSizeError),

    /// The thumbnail url was invalid
    #[error("invalid thumbnail url")]
    InvalidThumbnailUrl(#[source] url::ParseError),

    /// An info header was present without an external block
    #[error("missing external source content")]
    MissingExternalContent,

    /// The source heading had no title link
    #[error("missing title link")]
    MissingTitleLink,

    /// The source heading had no author link
    #[error("missing author link")]
    MissingAuthorLink,

    /// The source heading had no site label
    #[error("missing source label")]
    MissingSourceLabel,

    /// A source link had no href
    #[error("missing link href")]
    MissingLinkHref,

    /// A source link href was invalid
    #[error("invalid link url")]
    InvalidLinkUrl(#[source] url::ParseError),
}

/// A results page
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    /// The url of the results page
    pub url: Url,

    /// The matches, in page order, without the query image
    pub items: Vec<Item>,
}

impl SearchResult {
    /// Make a [`SearchResult`] from the [`Html`] of the results page at `url`.
    ///
    /// Relative urls on the page are resolved against `base_url`, the root of the site.
    pub fn from_html(html: &Html, url: Url, base_url: &Url) -> Result<Self, FromHtmlError> {
        let items = parse_items(html, base_url)?;
        Ok(Self { url, items })
    }
}

/// Parse all result cards on a results page, skipping the query image.
pub fn parse_items(html: &Html, base_url: &Url) -> Result<Vec<Item>, FromHtmlError> {
    html.select(&ITEM_BOX_SELECTOR)
        .enumerate()
        // The first card echoes the query image.
        .skip(1)
        .map(|(index, element)| {
            Item::from_element(element, base_url)
                .map_err(|error| FromHtmlError::MalformedCard { index, error })
        })
        .collect()
}

/// A matched image
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// The hash the service assigned to the image
    pub hash: String,

    /// The thumbnail url
    pub thumbnail_url: Option<Url>,

    /// The width in pixels
    pub width: u32,

    /// The height in pixels
    pub height: u32,

    /// The file type
    pub file_type: FileType,

    /// The file size in bytes
    pub file_size: u64,

    /// Where the image came from, if the page knows
    pub source: Option<ItemSource>,
}

impl Item {
    /// Make an [`Item`] from a result card.
    pub fn from_element(element: ElementRef<'_>, base_url: &Url) -> Result<Self, FromElementError> {
        let hash = element
            .select(&HASH_SELECTOR)
            .next()
            .ok_or(FromElementError::MissingHash)?
            .text()
            .collect::<String>()
            .trim()
            .to_string();

        let info_line = element
            .select(&INFO_LINE_SELECTOR)
            .next()
            .ok_or(FromElementError::MissingInfoLine)?
            .text()
            .collect::<String>();
        let (dimensions, file_type, file_size) = {
            let mut iter = info_line.split_whitespace();
            match (iter.next(), iter.next(), iter.next()) {
                (Some(dimensions), Some(file_type), Some(file_size)) => {
                    (dimensions, file_type, file_size)
                }
                _ => return Err(FromElementError::InvalidInfoLine(info_line.clone())),
            }
        };

        let (width, height) = dimensions
            .split_once('x')
            .and_then(|(width, height)| Some((width.parse::<u32>().ok()?, height.parse::<u32>().ok()?)))
            .filter(|&(width, height)| width > 0 && height > 0)
            .ok_or_else(|| FromElementError::InvalidDimensions(dimensions.to_string()))?;
        let file_type = FileType::from(file_type);
        let file_size = parse_byte_size(file_size).map_err(FromElementError::InvalidFileSize)?;

        let thumbnail_url = element
            .select(&THUMBNAIL_SELECTOR)
            .next()
            .and_then(|img| img.value().attr("src"))
            .map(|src| base_url.join(src))
            .transpose()
            .map_err(FromElementError::InvalidThumbnailUrl)?;

        let detail_box = element.select(&DETAIL_BOX_SELECTOR).next();
        let source = DetailShape::classify(detail_box).into_source(base_url)?;

        Ok(Self {
            hash,
            thumbnail_url,
            width,
            height,
            file_type,
            file_size,
            source,
        })
    }
}

/// Provenance of a matched image. Only one kind can be present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemSource {
    /// A post on a site the page attributes
    Known(Source),

    /// Free text from an external database
    External(ExternalSource),
}

impl ItemSource {
    /// Get this as a [`Source`], if it is one.
    pub fn as_known(&self) -> Option<&Source> {
        match self {
            Self::Known(source) => Some(source),
            Self::External(_) => None,
        }
    }

    /// Get this as an [`ExternalSource`], if it is one.
    pub fn as_external(&self) -> Option<&ExternalSource> {
        match self {
            Self::Known(_) => None,
            Self::External(source) => Some(source),
        }
    }
}

/// A post on a known site
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    /// The site
    pub kind: SourceKind,

    /// The title of the post
    pub title: String,

    /// The url of the post
    pub url: Url,

    /// The author. Amazon sources do not have one.
    pub author: Option<Author>,
}

/// The author of a [`Source`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    /// The display name
    pub name: String,

    /// The profile url
    pub url: Url,
}

/// An unstructured source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalSource {
    /// The label of the external database
    #[serde(rename = "ref")]
    pub reference: String,

    /// The text the database has for the image
    pub content: String,
}

/// The layouts a detail box may have.
enum DetailShape<'a> {
    /// No detail box, or one without a recognized layout
    Absent,

    /// An info header and an external block
    External {
        detail_box: ElementRef<'a>,
        header: ElementRef<'a>,
    },

    /// A heading with leading title text and an amazon link
    Amazon {
        heading: ElementRef<'a>,
        link: ElementRef<'a>,
    },

    /// A heading with a title link, an author link, and a site label
    Typical { heading: ElementRef<'a> },
}

impl<'a> DetailShape<'a> {
    /// Classify a detail box.
    fn classify(detail_box: Option<ElementRef<'a>>) -> Self {
        let detail_box = match detail_box {
            Some(detail_box) => detail_box,
            None => return Self::Absent,
        };

        if detail_box.text().all(|text| text.trim().is_empty()) {
            return Self::Absent;
        }

        // In priority order.
        let detectors: [fn(ElementRef<'a>) -> Option<Self>; 3] = [
            Self::detect_external,
            Self::detect_amazon,
            Self::detect_typical,
        ];

        detectors
            .iter()
            .find_map(|detect| detect(detail_box))
            .unwrap_or(Self::Absent)
    }

    fn detect_external(detail_box: ElementRef<'a>) -> Option<Self> {
        let header = detail_box.select(&INFO_HEADER_SELECTOR).next()?;
        Some(Self::External { detail_box, header })
    }

    fn detect_amazon(detail_box: ElementRef<'a>) -> Option<Self> {
        let heading = detail_box.select(&HEADING_SELECTOR).next()?;
        let link = heading.select(&LINK_SELECTOR).next()?;
        if link.text().collect::<String>() != AMAZON_LINK_TEXT {
            return None;
        }

        Some(Self::Amazon { heading, link })
    }

    fn detect_typical(detail_box: ElementRef<'a>) -> Option<Self> {
        let heading = detail_box.select(&HEADING_SELECTOR).next()?;
        Some(Self::Typical { heading })
    }

    /// Extract the source for this shape.
    fn into_source(self, base_url: &Url) -> Result<Option<ItemSource>, FromElementError> {
        match self {
            Self::Absent => Ok(None),
            Self::External { detail_box, header } => {
                let content = detail_box
                    .select(&EXTERNAL_SELECTOR)
                    .next()
                    .ok_or(FromElementError::MissingExternalContent)?
                    .text()
                    .collect::<String>()
                    .trim()
                    .to_string();

                Ok(Some(ItemSource::External(ExternalSource {
                    reference: header.text().collect(),
                    content,
                })))
            }
            Self::Amazon { heading, link } => {
                let title = heading
                    .first_child()
                    .map(|node| match ElementRef::wrap(node) {
                        Some(element) => element.text().collect::<String>(),
                        None => match node.value() {
                            Node::Text(text) => {
                                let text: &str = text;
                                text.to_string()
                            }
                            _ => String::new(),
                        },
                    })
                    .unwrap_or_default()
                    .trim()
                    .to_string();

                Ok(Some(ItemSource::Known(Source {
                    kind: SourceKind::Amazon,
                    title,
                    url: link_url(link, base_url)?,
                    author: None,
                })))
            }
            Self::Typical { heading } => {
                // Links past the author link are ignored.
                let mut links = heading.select(&LINK_SELECTOR);
                let title_link = links.next().ok_or(FromElementError::MissingTitleLink)?;
                let author_link = links.next().ok_or(FromElementError::MissingAuthorLink)?;

                let kind = heading
                    .select(&SMALL_SELECTOR)
                    .next()
                    .ok_or(FromElementError::MissingSourceLabel)?
                    .text()
                    .collect::<String>();

                Ok(Some(ItemSource::Known(Source {
                    kind: SourceKind::from(kind.trim()),
                    title: title_link.text().collect(),
                    url: link_url(title_link, base_url)?,
                    author: Some(Author {
                        name: author_link.text().collect(),
                        url: link_url(author_link, base_url)?,
                    }),
                })))
            }
        }
    }
}

/// Get the absolute url of a link.
fn link_url(link: ElementRef<'_>, base_url: &Url) -> Result<Url, FromElementError> {
    let href = link
        .value()
        .attr("href")
        .ok_or(FromElementError::MissingLinkHref)?;

    base_url.join(href).map_err(FromElementError::InvalidLinkUrl)
}
