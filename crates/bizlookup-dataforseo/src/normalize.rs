//! Normalization of DataForSEO payloads into the stable types handed to
//! callers.
//!
//! Every optional provider field maps to `None` (JSON `null`) when absent.
//! Mapping never fails; items that cannot be deserialized at all are skipped
//! by [`parse_items`] and logged.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::types::{MapsItem, ReviewItem, ReviewsTaskResult, WorkHours};

/// Maps SERP item type for business listings.
pub const LISTING_ITEM_TYPE: &str = "maps_search";

/// Reviews task item type for individual reviews.
pub const REVIEW_ITEM_TYPE: &str = "google_reviews_search";

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// A business candidate returned by a name + location search.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscoveredBusiness {
    pub name: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub rating: Option<f64>,
    pub review_count: Option<u64>,
    pub category: Option<String>,
    pub place_id: Option<String>,
    pub cid: Option<String>,
    pub coordinates: Option<Coordinates>,
}

/// Full capture of a Maps listing for persistence: the normalized business
/// plus ranking, claim status, and opening hours.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPlaceResult {
    #[serde(flatten)]
    pub business: DiscoveredBusiness,
    pub rank: Option<u32>,
    pub is_claimed: Option<bool>,
    /// Weekday → `"09:00-17:00"`; `"Closed"` for days without intervals.
    pub work_hours: Option<BTreeMap<String, String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub review_id: Option<String>,
    pub text: Option<String>,
    /// Defaults to `0.0` when the provider omits it, so an unrated review
    /// is indistinguishable from a zero-star one.
    pub rating: f64,
    pub reviewer_name: Option<String>,
    pub owner_response: Option<String>,
    pub images: Option<Vec<String>>,
    pub timestamp: Option<String>,
}

/// Reviews for one place. `rating` and `review_count` come from the result
/// envelope and are never recomputed from `reviews`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewsResult {
    pub place_id: String,
    pub cid: Option<String>,
    pub reviews: Vec<Review>,
    pub rating: Option<f64>,
    pub review_count: Option<u64>,
}

/// Deserializes each raw item on its own so one malformed entry does not
/// sink the whole page.
pub fn parse_items<T: DeserializeOwned>(
    items: Option<Vec<serde_json::Value>>,
    context: &str,
) -> Vec<T> {
    items
        .unwrap_or_default()
        .into_iter()
        .enumerate()
        .filter_map(|(index, value)| {
            serde_json::from_value::<T>(value)
                .map_err(|e| {
                    tracing::warn!(context, index, error = %e, "skipping malformed item");
                })
                .ok()
        })
        .collect()
}

#[must_use]
pub fn is_listing(item: &MapsItem) -> bool {
    item.item_type.as_deref() == Some(LISTING_ITEM_TYPE)
}

#[must_use]
pub fn normalize_business(item: &MapsItem) -> DiscoveredBusiness {
    let coordinates = match (item.latitude, item.longitude) {
        (Some(latitude), Some(longitude)) => Some(Coordinates {
            latitude,
            longitude,
        }),
        _ => None,
    };

    DiscoveredBusiness {
        name: item.title.clone().unwrap_or_default(),
        address: item.address.clone(),
        phone: item.phone.clone(),
        website: item.url.clone(),
        rating: item.rating.as_ref().and_then(|r| r.value()),
        review_count: item.rating.as_ref().and_then(|r| r.votes_count()),
        category: item.category.clone(),
        place_id: item.place_id.clone(),
        cid: item.cid.clone(),
        coordinates,
    }
}

#[must_use]
pub fn normalize_raw_place(item: &MapsItem) -> RawPlaceResult {
    RawPlaceResult {
        business: normalize_business(item),
        rank: item.rank_absolute,
        is_claimed: item.is_claimed,
        work_hours: item.work_hours.as_ref().and_then(format_work_hours),
    }
}

/// Renders the provider timetable as weekday → `"HH:MM-HH:MM"` strings.
///
/// Returns `None` when the listing has no timetable at all.
#[must_use]
pub fn format_work_hours(hours: &WorkHours) -> Option<BTreeMap<String, String>> {
    let timetable = hours.timetable.as_ref()?;
    let formatted = timetable
        .iter()
        .map(|(day, intervals)| {
            let spans: Vec<String> = intervals
                .iter()
                .flatten()
                .filter_map(|interval| {
                    let (open, close) = (interval.open?, interval.close?);
                    Some(format!(
                        "{:02}:{:02}-{:02}:{:02}",
                        open.hour, open.minute, close.hour, close.minute
                    ))
                })
                .collect();
            let rendered = if spans.is_empty() {
                "Closed".to_string()
            } else {
                spans.join(", ")
            };
            (day.clone(), rendered)
        })
        .collect();
    Some(formatted)
}

#[must_use]
pub fn normalize_review(item: &ReviewItem) -> Review {
    let images = item.images.as_ref().map(|images| {
        images
            .iter()
            .filter_map(|img| img.image_url.clone().or_else(|| img.url.clone()))
            .collect()
    });

    Review {
        review_id: item.review_id.clone(),
        text: item.review_text.clone(),
        rating: item.rating.as_ref().and_then(|r| r.value()).unwrap_or(0.0),
        reviewer_name: item.profile_name.clone(),
        owner_response: item.owner_answer.clone(),
        images,
        timestamp: item.timestamp.clone(),
    }
}

/// Wraps the review items of a fetched task with the envelope aggregates.
#[must_use]
pub fn normalize_reviews(result: ReviewsTaskResult) -> ReviewsResult {
    let reviews = parse_items::<ReviewItem>(result.items, "reviews task_get")
        .iter()
        .filter(|item| item.item_type.as_deref() == Some(REVIEW_ITEM_TYPE))
        .map(normalize_review)
        .collect();

    ReviewsResult {
        place_id: result.place_id.unwrap_or_default(),
        cid: result.cid,
        reviews,
        rating: result.rating.as_ref().and_then(|r| r.value()),
        review_count: result.reviews_count,
    }
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
