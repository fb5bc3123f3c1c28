//! Document viewer URLs.

use docqa_core::{DocqaError, Result};
use reqwest::Url;

/// Builds `<base>/pdf/<file>#page=<page>`, percent-encoding `file` as a
/// single path segment.
pub fn viewer_url(base: &Url, file: &str, page: u32) -> Result<Url> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| DocqaError::config(format!("'{base}' cannot be used as a base URL")))?
        .pop_if_empty()
        .push("pdf")
        .push(file);
    url.set_query(None);
    url.set_fragment(Some(&format!("page={page}")));
    Ok(url)
}
