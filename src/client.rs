use crate::{
    Error,
    Image,
    MainPage,
    SearchMode,
    SearchResult,
    DEFAULT_BASE_URL,
};
use reqwest::{
    header::LOCATION,
    redirect::Policy,
};
use scraper::Html;
use std::path::Path;
use tracing::debug;
use url::Url;

/// An ascii2d client
#[derive(Clone, Debug)]
pub struct Client {
    client: reqwest::Client,
    base_url: Url,
}

impl Client {
    /// Make a new [`Client`] for the public site.
    ///
    /// # Panics
    /// Panics if the [`Client`] could not be created.
    pub fn new() -> Self {
        let base_url = Url::parse(DEFAULT_BASE_URL).expect("invalid default base url");
        Self::with_base_url(base_url)
    }

    /// Make a new [`Client`] for the site at `base_url`.
    ///
    /// # Panics
    /// Panics if the [`Client`] could not be created.
    pub fn with_base_url(base_url: Url) -> Self {
        Self::from_parts(base_url, None).expect("valid client")
    }

    /// Make a new [`Client`] for the site at `base_url`, optionally with a custom user agent.
    pub fn from_parts(base_url: Url, user_agent: Option<&str>) -> Result<Self, Error> {
        // The csrf token is tied to the session cookie.
        // Redirects are not followed, as the search hash lives in the `Location` header.
        let mut builder = reqwest::Client::builder()
            .cookie_store(true)
            .redirect(Policy::none());
        if let Some(user_agent) = user_agent {
            builder = builder.user_agent(user_agent);
        }

        Ok(Self::from_client(builder.build()?, base_url))
    }

    /// Make a new [`Client`] from a [`reqwest::Client`].
    ///
    /// The client should keep cookies and must not follow redirects.
    /// Endpoints are resolved under the path of `base_url`, so a site mounted at `/ascii2d` works.
    pub fn from_client(client: reqwest::Client, mut base_url: Url) -> Self {
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Self { client, base_url }
    }

    /// The base url of the site.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Get the landing page, which holds the csrf token needed to submit a search.
    pub async fn get_main_page(&self) -> Result<MainPage, Error> {
        let text = self.get_text(self.base_url.clone()).await?;
        let main_page = tokio::task::spawn_blocking(move || {
            let html = Html::parse_document(&text);
            MainPage::from_html(&html)
        })
        .await??;

        Ok(main_page)
    }

    /// Submit an image, returning the search hash that addresses its results.
    pub async fn get_search_hash(
        &self,
        main_page: &MainPage,
        image: impl Into<Image>,
    ) -> Result<String, Error> {
        let image = image.into();
        let url = self
            .base_url
            .join(&format!("search/{}", image.field_name()))?;
        let form = image.into_form(&main_page.csrf_token);

        let response = self.client.post(url).multipart(form).send().await?;
        let status = response.status();

        // The service responds without a redirect when it refuses the image, like when it is too large.
        let location = response
            .headers()
            .get(LOCATION)
            .ok_or(Error::QueryRejected { status })?;
        let location = location
            .to_str()
            .map_err(|_| Error::MalformedRedirect {
                location: String::from_utf8_lossy(location.as_bytes()).into_owned(),
            })?;
        debug!("search redirected to '{location}'");

        search_hash_from_location(location)
            .map(String::from)
            .ok_or_else(|| Error::MalformedRedirect {
                location: location.to_string(),
            })
    }

    /// Get the url of the results page for a search hash.
    pub fn search_result_url(&self, mode: SearchMode, hash: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(&format!("search/{mode}/{hash}"))?)
    }

    /// Get the results page for a search hash.
    pub async fn get_search_result(
        &self,
        mode: SearchMode,
        hash: &str,
    ) -> Result<SearchResult, Error> {
        let url = self.search_result_url(mode, hash)?;
        let text = self.get_text(url.clone()).await?;
        let base_url = self.base_url.clone();
        let search_result = tokio::task::spawn_blocking(move || {
            let html = Html::parse_document(&text);
            SearchResult::from_html(&html, url, &base_url)
        })
        .await??;
        debug!(
            "parsed {} items from '{}'",
            search_result.items.len(),
            search_result.url
        );

        Ok(search_result)
    }

    /// Look up an image.
    ///
    /// This fetches a fresh csrf token, submits the image, and parses the results page for `mode`.
    pub async fn search(
        &self,
        image: impl Into<Image>,
        mode: SearchMode,
    ) -> Result<SearchResult, Error> {
        let main_page = self.get_main_page().await?;
        let hash = self.get_search_hash(&main_page, image).await?;
        debug!("got search hash '{hash}'");

        self.get_search_result(mode, &hash).await
    }

    /// Look up an image by url.
    pub async fn search_by_url(&self, url: &str, mode: SearchMode) -> Result<SearchResult, Error> {
        self.search(url, mode).await
    }

    /// Look up an image file.
    ///
    /// The file is streamed and closed once the upload finishes or fails.
    pub async fn search_by_file(
        &self,
        path: &Path,
        mode: SearchMode,
    ) -> Result<SearchResult, Error> {
        let image = Image::from_path(path).await?;
        self.search(image, mode).await
    }

    /// Send a GET request and get the body as text.
    async fn get_text(&self, url: Url) -> Result<String, Error> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::InvalidStatus(status));
        }

        Ok(response.text().await?)
    }
}

impl Default for Client {
    fn default() -> Self {
        Self::new()
    }
}

/// Get the search hash from the last path segment of a redirect location.
fn search_hash_from_location(location: &str) -> Option<&str> {
    let (_, hash) = location.rsplit_once('/')?;
    if hash.is_empty() {
        return None;
    }

    Some(hash)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn search_hash_from_locations() {
        assert_eq!(
            search_hash_from_location("https://ascii2d.net/search/color/4d0a5e2b0c4e1f"),
            Some("4d0a5e2b0c4e1f")
        );
        assert_eq!(
            search_hash_from_location("/search/multi/4d0a5e2b0c4e1f"),
            Some("4d0a5e2b0c4e1f")
        );
        assert_eq!(
            search_hash_from_location("https://ascii2d.net/search/color/"),
            None
        );
        assert_eq!(search_hash_from_location("4d0a5e2b0c4e1f"), None);
        assert_eq!(search_hash_from_location(""), None);
    }

    #[test]
    fn search_result_urls() {
        let client = Client::new();
        assert_eq!(
            client
                .search_result_url(SearchMode::Bovw, "abc")
                .unwrap()
                .as_str(),
            "https://ascii2d.net/search/bovw/abc"
        );

        let client = Client::with_base_url(Url::parse("http://localhost:3000/ascii2d").unwrap());
        assert_eq!(client.base_url().as_str(), "http://localhost:3000/ascii2d/");
        assert_eq!(
            client
                .search_result_url(SearchMode::Color, "abc")
                .unwrap()
                .as_str(),
            "http://localhost:3000/ascii2d/search/color/abc"
        );
    }
}
