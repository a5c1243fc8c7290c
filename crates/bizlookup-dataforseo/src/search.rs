//! Synchronous business search against the Google Maps SERP endpoint.

use crate::client::DataForSeoClient;
use crate::error::DataForSeoError;
use crate::location::location_code;
use crate::normalize::{
    is_listing, normalize_business, normalize_raw_place, parse_items, DiscoveredBusiness,
    RawPlaceResult,
};
use crate::outcome::{TaskMeta, TaskOutcome, STATUS_OK};
use crate::types::{ApiResponse, MapsItem, MapsSearchResult, MapsSearchTask};

pub const MAPS_SEARCH_ENDPOINT: &str = "v3/serp/google/maps/live/advanced";

/// Upper bound on the `depth` requested from the provider.
pub const MAX_SEARCH_DEPTH: u32 = 100;

/// Combines name and location into the single keyword the SERP expects.
#[must_use]
pub fn search_keyword(name: &str, location: &str) -> String {
    let (name, location) = (name.trim(), location.trim());
    if location.is_empty() {
        name.to_string()
    } else {
        format!("{name} {location}")
    }
}

impl DataForSeoClient {
    /// Finds up to `limit` business candidates matching `name` near
    /// `location`.
    ///
    /// A provider-side failure yields an empty list; the caller sees "no
    /// matches" rather than an error.
    ///
    /// # Errors
    ///
    /// Only transport failures: [`DataForSeoError::Status`],
    /// [`DataForSeoError::Http`], or [`DataForSeoError::Deserialize`].
    pub async fn search_businesses(
        &self,
        name: &str,
        location: &str,
        limit: usize,
    ) -> Result<Vec<DiscoveredBusiness>, DataForSeoError> {
        if limit == 0 {
            return Ok(Vec::new());
        }

        let (items, meta) = self.maps_listings(name, location, limit).await?;
        if !meta.is_success() {
            tracing::warn!(
                name,
                location,
                status_code = ?meta.status_code,
                status_message = ?meta.status_message,
                "business search failed; returning no matches"
            );
            return Ok(Vec::new());
        }

        Ok(items
            .iter()
            .filter(|item| is_listing(item))
            .take(limit)
            .map(normalize_business)
            .collect())
    }

    /// Same lookup as [`search_businesses`](Self::search_businesses) but
    /// returns the full record (rank, claim status, opening hours) together
    /// with the provider status.
    ///
    /// # Errors
    ///
    /// Only transport failures, as for `search_businesses`.
    pub async fn search_raw(
        &self,
        name: &str,
        location: &str,
        limit: usize,
    ) -> Result<TaskOutcome<Vec<RawPlaceResult>>, DataForSeoError> {
        if limit == 0 {
            let meta = TaskMeta::new(Some(STATUS_OK), Some("no results requested".to_string()));
            return Ok(TaskOutcome::success(Vec::new(), meta));
        }

        let (items, meta) = self.maps_listings(name, location, limit).await?;
        if !meta.is_success() {
            tracing::warn!(
                name,
                location,
                status_code = ?meta.status_code,
                status_message = ?meta.status_message,
                "raw business search failed"
            );
            return Ok(TaskOutcome::failure(meta));
        }

        let results = items
            .iter()
            .filter(|item| is_listing(item))
            .take(limit)
            .map(normalize_raw_place)
            .collect();
        Ok(TaskOutcome::success(results, meta))
    }

    /// Issues the single SERP request shared by both search flavours and
    /// returns the raw items with the task-level status.
    async fn maps_listings(
        &self,
        name: &str,
        location: &str,
        limit: usize,
    ) -> Result<(Vec<MapsItem>, TaskMeta), DataForSeoError> {
        let keyword = search_keyword(name, location);
        let depth = u32::try_from(limit).map_or(MAX_SEARCH_DEPTH, |l| l.min(MAX_SEARCH_DEPTH));
        let payload = [MapsSearchTask {
            keyword: &keyword,
            location_code: location_code(location),
            language_code: &self.language_code,
            depth,
        }];

        let envelope: ApiResponse<MapsSearchResult> =
            self.post(MAPS_SEARCH_ENDPOINT, &payload).await?;

        let envelope_meta = TaskMeta::new(envelope.status_code, envelope.status_message.clone());
        let Some(task) = envelope.into_first_task() else {
            return Ok((Vec::new(), envelope_meta));
        };

        let meta = TaskMeta::new(task.status_code, task.status_message.clone());
        let items = task
            .into_first_result()
            .map(|result| parse_items::<MapsItem>(result.items, MAPS_SEARCH_ENDPOINT))
            .unwrap_or_default();

        tracing::debug!(%keyword, depth, items = items.len(), "maps search returned");
        Ok((items, meta))
    }
}
