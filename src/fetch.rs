use reqwest::get;
use url::Url;

use crate::error::{RegroupError, Result};

/// Download the source playlist as text. Any transport error or non-2xx
/// status is returned as an error; there are no retries.
pub async fn fetch_playlist(url: &Url) -> Result<String> {
    let response = get(url.clone()).await?;

    let status = response.status();
    if !status.is_success() {
        return Err(RegroupError::HttpStatus {
            url: url.to_string(),
            status,
        });
    }

    Ok(response.text().await?)
}
