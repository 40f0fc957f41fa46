//! Share links that reopen the widget at the same coordinates

use crate::Result;
use crate::error::WidgetError;
use crate::models::Coordinates;
use async_trait::async_trait;
use url::Url;

/// Write-only clipboard
#[async_trait]
pub trait Clipboard: Send + Sync {
    async fn write_text(&self, text: &str) -> Result<()>;
}

/// `page_url` with `lat`/`lon` set to the coordinates at 4 decimal places.
///
/// Existing `lat`/`lon` values are replaced in place; other parameters are kept.
/// Without coordinates the page URL is returned unchanged.
pub fn share_url(page_url: &str, coordinates: Option<Coordinates>) -> Result<String> {
    let mut url = Url::parse(page_url)
        .map_err(|e| WidgetError::config(format!("Invalid page URL '{page_url}': {e}")))?;

    let Some(coordinates) = coordinates else {
        return Ok(url.to_string());
    };

    let lat = format!("{:.4}", coordinates.latitude);
    let lon = format!("{:.4}", coordinates.longitude);

    let mut pairs: Vec<(String, String)> = Vec::new();
    let (mut has_lat, mut has_lon) = (false, false);
    for (key, value) in url.query_pairs() {
        match &*key {
            "lat" if has_lat => {}
            "lat" => {
                has_lat = true;
                pairs.push(("lat".to_string(), lat.clone()));
            }
            "lon" if has_lon => {}
            "lon" => {
                has_lon = true;
                pairs.push(("lon".to_string(), lon.clone()));
            }
            _ => pairs.push((key.to_string(), value.into_owned())),
        }
    }
    if !has_lat {
        pairs.push(("lat".to_string(), lat));
    }
    if !has_lon {
        pairs.push(("lon".to_string(), lon));
    }

    url.query_pairs_mut().clear().extend_pairs(pairs);
    Ok(url.to_string())
}
