use once_cell::sync::Lazy;
use scraper::{
    Html,
    Selector,
};

static CSRF_TOKEN_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("meta[name=\"csrf-token\"]").expect("invalid csrf token selector")
});

/// Error that may occur while parsing a [`MainPage`] from [`Html`].
#[derive(Debug, thiserror::Error)]
pub enum FromHtmlError {
    /// Missing the csrf token meta tag, or its content
    #[error("missing csrf token")]
    MissingCsrfToken,
}

/// The landing page
#[derive(Debug, Clone)]
pub struct MainPage {
    /// The anti-forgery token, sent back as `authenticity_token`.
    ///
    /// It is tied to the session cookie of the client that fetched this page.
    pub csrf_token: String,
}

impl MainPage {
    /// Make a [`MainPage`] from [`Html`].
    pub fn from_html(html: &Html) -> Result<Self, FromHtmlError> {
        let csrf_token = html
            .select(&CSRF_TOKEN_SELECTOR)
            .find_map(|element| element.value().attr("content"))
            .ok_or(FromHtmlError::MissingCsrfToken)?
            .to_string();

        Ok(Self { csrf_token })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    const MAIN_PAGE: &str = include_str!("../../test_data/main_page.html");

    #[test]
    fn parse() {
        let html = Html::parse_document(MAIN_PAGE);
        let page = MainPage::from_html(&html).expect("failed to parse main page");
        assert_eq!(page.csrf_token, "q1w2e3r4t5y6u7i8o9p0/ASDFGHJKL+zxcvbnm==");
    }

    #[test]
    fn parse_missing_token() {
        let html = Html::parse_document(
            "<html><head><meta name=\"csrf-param\" content=\"authenticity_token\"></head></html>",
        );
        let error = MainPage::from_html(&html).expect_err("parsed a page without a token");
        assert!(matches!(error, FromHtmlError::MissingCsrfToken));
    }
}
