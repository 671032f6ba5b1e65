// src/volby/models.rs
use crate::utils::error::FetchError;
use reqwest::Url;
use serde::Serialize;

/// Where the district detail links of the 2017 Chamber of Deputies results point.
pub const DEFAULT_BASE_URL: &str = "https://www.volby.cz/pls/ps2017nss/";

/// One voting district as listed on a territorial unit's index page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct District {
    pub code: String,
    pub name: String,
    /// Link to the district's results page, relative to the site base.
    pub detail_link: String,
}

impl District {
    /// Resolves the detail link against `base_url`.
    pub fn detail_url(&self, base_url: &str) -> Result<String, FetchError> {
        let base = parse_url(base_url)?;
        base.join(&self.detail_link)
            .map(String::from)
            .map_err(|e| FetchError::InvalidUrl {
                url: self.detail_link.clone(),
                reason: e.to_string(),
            })
    }
}

pub fn parse_url(url: &str) -> Result<Url, FetchError> {
    Url::parse(url).map_err(|e| FetchError::InvalidUrl {
        url: url.to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn district(link: &str) -> District {
        District {
            code: "529303".to_string(),
            name: "Benešov".to_string(),
            detail_link: link.to_string(),
        }
    }

    #[test]
    fn test_detail_url_joins_relative_link() {
        let url = district("ps311?xjazyk=CZ&xkraj=2&xobec=529303&xvyber=2101")
            .detail_url(DEFAULT_BASE_URL)
            .unwrap();
        assert_eq!(
            url,
            "https://www.volby.cz/pls/ps2017nss/ps311?xjazyk=CZ&xkraj=2&xobec=529303&xvyber=2101"
        );
    }

    #[test]
    fn test_detail_url_keeps_absolute_link() {
        let url = district("https://example.org/page").detail_url(DEFAULT_BASE_URL).unwrap();
        assert_eq!(url, "https://example.org/page");
    }

    #[test]
    fn test_detail_url_rejects_bad_base() {
        let err = district("ps311").detail_url("not a url").unwrap_err();
        assert!(matches!(err, FetchError::InvalidUrl { .. }));
    }
}
