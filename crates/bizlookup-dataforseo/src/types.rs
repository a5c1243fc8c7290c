//! DataForSEO API response types.
//!
//! Every v3 response is wrapped in the same envelope:
//! `{ "status_code": 20000, "status_message": "Ok.", "tasks": [...] }`, and
//! each task carries its own status pair plus a `result` array. [`ApiResponse`]
//! and [`ApiTask`] capture that pattern generically.
//!
//! Item arrays are kept as raw [`serde_json::Value`]s so the caller can
//! deserialize each item individually and skip the ones that do not fit.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

/// Top-level envelope for all DataForSEO responses.
#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    #[serde(default)]
    pub status_code: Option<i64>,
    #[serde(default)]
    pub status_message: Option<String>,
    pub tasks: Option<Vec<ApiTask<T>>>,
}

impl<T> ApiResponse<T> {
    /// Every request this client sends posts exactly one task, so only the
    /// first entry is meaningful.
    pub fn into_first_task(self) -> Option<ApiTask<T>> {
        self.tasks.and_then(|tasks| tasks.into_iter().next())
    }
}

/// One task inside an [`ApiResponse`].
#[derive(Debug, Deserialize)]
pub struct ApiTask<T> {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub status_code: Option<i64>,
    #[serde(default)]
    pub status_message: Option<String>,
    pub result: Option<Vec<T>>,
}

impl<T> ApiTask<T> {
    pub fn into_first_result(self) -> Option<T> {
        self.result.and_then(|r| r.into_iter().next())
    }
}

// ---------------------------------------------------------------------------
// Shared fragments
// ---------------------------------------------------------------------------

/// Ratings arrive either as a bare number or as DataForSEO's rating object
/// (`{ "rating_type": "Max5", "value": 4.5, "votes_count": 12 }`).
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RatingField {
    Scalar(f64),
    Detailed(RatingInfo),
}

impl RatingField {
    #[must_use]
    pub fn value(&self) -> Option<f64> {
        match self {
            RatingField::Scalar(v) => Some(*v),
            RatingField::Detailed(info) => info.value,
        }
    }

    #[must_use]
    pub fn votes_count(&self) -> Option<u64> {
        match self {
            RatingField::Scalar(_) => None,
            RatingField::Detailed(info) => info.votes_count,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RatingInfo {
    #[serde(default)]
    pub value: Option<f64>,
    #[serde(default)]
    pub votes_count: Option<u64>,
}

/// Accepts a JSON string or number and yields it as a string. DataForSEO
/// emits `cid` as a string, but numeric ids have been observed too.
fn opt_string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

// ---------------------------------------------------------------------------
// serp/google/maps/live/advanced
// ---------------------------------------------------------------------------

/// Search task payload sent to the Maps SERP endpoint.
#[derive(Debug, Serialize)]
pub struct MapsSearchTask<'a> {
    pub keyword: &'a str,
    pub location_code: u32,
    pub language_code: &'a str,
    pub depth: u32,
}

#[derive(Debug, Deserialize)]
pub struct MapsSearchResult {
    #[serde(default)]
    pub items: Option<Vec<serde_json::Value>>,
}

/// One Maps SERP item. Only `maps_search` items are business listings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MapsItem {
    #[serde(rename = "type", default)]
    pub item_type: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub rating: Option<RatingField>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub place_id: Option<String>,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub cid: Option<String>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub rank_absolute: Option<u32>,
    #[serde(default)]
    pub is_claimed: Option<bool>,
    #[serde(default)]
    pub work_hours: Option<WorkHours>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WorkHours {
    /// Weekday name → opening intervals. `null` means closed that day.
    #[serde(default)]
    pub timetable: Option<BTreeMap<String, Option<Vec<WorkInterval>>>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WorkInterval {
    #[serde(default)]
    pub open: Option<TimeOfDay>,
    #[serde(default)]
    pub close: Option<TimeOfDay>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct TimeOfDay {
    pub hour: u8,
    pub minute: u8,
}

// ---------------------------------------------------------------------------
// business_data/google/reviews
// ---------------------------------------------------------------------------

/// Reviews task payload sent to `task_post`.
#[derive(Debug, Serialize)]
pub struct ReviewsTaskPost<'a> {
    pub cid: &'a str,
    pub location_name: &'a str,
    pub language_name: &'a str,
    pub depth: u32,
    pub sort_by: &'a str,
}

/// One entry of the `tasks_ready` list.
#[derive(Debug, Deserialize)]
pub struct ReadyTask {
    #[serde(default)]
    pub id: Option<String>,
}

/// The `task_get` result envelope for a reviews task.
#[derive(Debug, Deserialize)]
pub struct ReviewsTaskResult {
    #[serde(default)]
    pub place_id: Option<String>,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub cid: Option<String>,
    #[serde(default)]
    pub rating: Option<RatingField>,
    #[serde(default)]
    pub reviews_count: Option<u64>,
    #[serde(default)]
    pub items: Option<Vec<serde_json::Value>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReviewItem {
    #[serde(rename = "type", default)]
    pub item_type: Option<String>,
    #[serde(default)]
    pub review_id: Option<String>,
    #[serde(default)]
    pub review_text: Option<String>,
    #[serde(default)]
    pub rating: Option<RatingField>,
    #[serde(default)]
    pub profile_name: Option<String>,
    #[serde(default)]
    pub owner_answer: Option<String>,
    #[serde(default)]
    pub images: Option<Vec<ReviewImage>>,
    #[serde(default)]
    pub timestamp: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReviewImage {
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

// ---------------------------------------------------------------------------
// appendix/user_data
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct UserDataResult {
    #[serde(default)]
    pub money: Option<Money>,
}

#[derive(Debug, Deserialize)]
pub struct Money {
    #[serde(default)]
    pub balance: Option<f64>,
    #[serde(default)]
    pub currency: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rating_accepts_number_or_object() {
        let scalar: RatingField = serde_json::from_value(serde_json::json!(4.5)).unwrap();
        assert_eq!(scalar.value(), Some(4.5));
        assert_eq!(scalar.votes_count(), None);

        let detailed: RatingField = serde_json::from_value(serde_json::json!({
            "rating_type": "Max5",
            "value": 3.9,
            "votes_count": 211,
            "rating_max": null
        }))
        .unwrap();
        assert_eq!(detailed.value(), Some(3.9));
        assert_eq!(detailed.votes_count(), Some(211));
    }

    #[test]
    fn cid_accepts_number_or_string() {
        let item: MapsItem =
            serde_json::from_value(serde_json::json!({ "cid": 1_234_567_890_u64 })).unwrap();
        assert_eq!(item.cid.as_deref(), Some("1234567890"));

        let item: MapsItem =
            serde_json::from_value(serde_json::json!({ "cid": "98765" })).unwrap();
        assert_eq!(item.cid.as_deref(), Some("98765"));

        let item: MapsItem = serde_json::from_value(serde_json::json!({ "cid": null })).unwrap();
        assert!(item.cid.is_none());
    }

    #[test]
    fn envelope_tolerates_null_tasks() {
        let body = serde_json::json!({
            "status_code": 40100,
            "status_message": "You are not authorized to access this resource.",
            "tasks": null
        });
        let envelope: ApiResponse<serde_json::Value> = serde_json::from_value(body).unwrap();
        assert_eq!(envelope.status_code, Some(40100));
        assert!(envelope.into_first_task().is_none());
    }

    #[test]
    fn typed_envelope_tolerates_missing_tasks_and_result() {
        let body = serde_json::json!({ "status_code": 40200, "status_message": "Payment Required." });
        let envelope: ApiResponse<MapsSearchResult> = serde_json::from_value(body).unwrap();
        assert_eq!(envelope.status_code, Some(40200));
        assert!(envelope.into_first_task().is_none());

        let body = serde_json::json!({
            "status_code": 20000,
            "tasks": [{ "id": "t-1", "status_code": 20000 }]
        });
        let envelope: ApiResponse<UserDataResult> = serde_json::from_value(body).unwrap();
        let task = envelope.into_first_task().expect("one task");
        assert_eq!(task.id.as_deref(), Some("t-1"));
        assert!(task.into_first_result().is_none());
    }

    #[test]
    fn ready_list_reads_ids_and_ignores_extra_fields() {
        let body = serde_json::json!({
            "tasks": [{
                "result": [{ "id": "abc", "endpoint": "/v3/business_data/google/reviews/task_get/abc" }]
            }]
        });
        let envelope: ApiResponse<ReadyTask> = serde_json::from_value(body).unwrap();
        let ready = envelope
            .into_first_task()
            .and_then(ApiTask::into_first_result)
            .expect("one ready entry");
        assert_eq!(ready.id.as_deref(), Some("abc"));
    }
}
