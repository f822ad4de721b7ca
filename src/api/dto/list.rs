//! Listing query parameters and response.

use serde::{Deserialize, Serialize};
use serde_with::{DefaultOnError, DisplayFromStr, serde_as};

use crate::api::dto::url::UrlResponse;
use crate::domain::pagination::Page;

/// Listing query parameters.
///
/// Uses `serde_with` to parse integers from query strings. A value that is
/// not an integer is treated as absent, so the page defaults apply.
#[serde_as]
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    #[serde_as(as = "DefaultOnError<Option<DisplayFromStr>>")]
    #[serde(default)]
    pub limit: Option<i64>,

    #[serde_as(as = "DefaultOnError<Option<DisplayFromStr>>")]
    #[serde(default)]
    pub offset: Option<i64>,
}

impl ListQuery {
    /// Clamps the raw parameters into an effective page.
    pub fn page(&self) -> Page {
        Page::new(self.limit, self.offset)
    }
}

/// Paginated listing. `total` counts every stored record.
#[derive(Debug, Serialize)]
pub struct ListUrlsResponse {
    pub urls: Vec<UrlResponse>,
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
}
