use serde_json::json;

use super::*;
use crate::types::ReviewsTaskResult;

fn maps_item(value: serde_json::Value) -> MapsItem {
    serde_json::from_value(value).expect("fixture should deserialize")
}

fn full_listing() -> serde_json::Value {
    json!({
        "type": "maps_search",
        "rank_group": 1,
        "rank_absolute": 3,
        "title": "Hamilton Roofing Co.",
        "address": "12 King St W, Hamilton, ON L8P 1A1",
        "phone": "+1 905-555-0134",
        "url": "https://hamiltonroofing.example",
        "rating": { "rating_type": "Max5", "value": 4.7, "votes_count": 128 },
        "category": "Roofing contractor",
        "place_id": "ChIJ123abc",
        "cid": "1234567890123456789",
        "latitude": 43.2557,
        "longitude": -79.8711,
        "is_claimed": true,
        "work_hours": {
            "timetable": {
                "monday": [
                    { "open": { "hour": 8, "minute": 0 }, "close": { "hour": 12, "minute": 0 } },
                    { "open": { "hour": 13, "minute": 30 }, "close": { "hour": 17, "minute": 0 } }
                ],
                "sunday": null
            },
            "current_status": "open"
        }
    })
}

#[test]
fn listing_with_every_field_is_preserved() {
    let business = normalize_business(&maps_item(full_listing()));
    assert_eq!(
        business,
        DiscoveredBusiness {
            name: "Hamilton Roofing Co.".to_string(),
            address: Some("12 King St W, Hamilton, ON L8P 1A1".to_string()),
            phone: Some("+1 905-555-0134".to_string()),
            website: Some("https://hamiltonroofing.example".to_string()),
            rating: Some(4.7),
            review_count: Some(128),
            category: Some("Roofing contractor".to_string()),
            place_id: Some("ChIJ123abc".to_string()),
            cid: Some("1234567890123456789".to_string()),
            coordinates: Some(Coordinates {
                latitude: 43.2557,
                longitude: -79.8711,
            }),
        }
    );
}

#[test]
fn listing_without_optional_fields_maps_to_explicit_nulls() {
    let business = normalize_business(&maps_item(json!({
        "type": "maps_search",
        "title": "Bare Listing"
    })));
    assert_eq!(business.name, "Bare Listing");
    assert!(business.address.is_none());
    assert!(business.phone.is_none());
    assert!(business.website.is_none());
    assert!(business.rating.is_none());
    assert!(business.review_count.is_none());
    assert!(business.category.is_none());
    assert!(business.place_id.is_none());
    assert!(business.cid.is_none());
    assert!(business.coordinates.is_none());

    let serialized = serde_json::to_value(&business).unwrap();
    for key in [
        "address",
        "phone",
        "website",
        "rating",
        "reviewCount",
        "category",
        "placeId",
        "cid",
        "coordinates",
    ] {
        assert_eq!(serialized.get(key), Some(&serde_json::Value::Null), "{key}");
    }
}

#[test]
fn coordinates_require_both_axes() {
    let business = normalize_business(&maps_item(json!({
        "type": "maps_search",
        "title": "Half Located",
        "latitude": 39.7392
    })));
    assert!(business.coordinates.is_none());
}

#[test]
fn raw_place_keeps_rank_claim_and_hours() {
    let raw = normalize_raw_place(&maps_item(full_listing()));
    assert_eq!(raw.rank, Some(3));
    assert_eq!(raw.is_claimed, Some(true));
    let hours = raw.work_hours.expect("hours should be formatted");
    assert_eq!(hours["monday"], "08:00-12:00, 13:30-17:00");
    assert_eq!(hours["sunday"], "Closed");
    assert_eq!(raw.business.name, "Hamilton Roofing Co.");
}

#[test]
fn raw_place_serializes_flat() {
    let raw = normalize_raw_place(&maps_item(full_listing()));
    let value = serde_json::to_value(&raw).unwrap();
    assert_eq!(value["name"], "Hamilton Roofing Co.");
    assert_eq!(value["rank"], 3);
    assert_eq!(value["isClaimed"], true);
    assert_eq!(value["workHours"]["sunday"], "Closed");
}

#[test]
fn missing_timetable_yields_no_hours() {
    let raw = normalize_raw_place(&maps_item(json!({
        "type": "maps_search",
        "title": "No Hours",
        "work_hours": { "timetable": null }
    })));
    assert!(raw.work_hours.is_none());
}

#[test]
fn is_listing_only_accepts_maps_search() {
    assert!(is_listing(&maps_item(json!({ "type": "maps_search" }))));
    assert!(!is_listing(&maps_item(json!({ "type": "maps_paid_item" }))));
    assert!(!is_listing(&maps_item(json!({}))));
}

#[test]
fn parse_items_skips_malformed_entries() {
    let items = Some(vec![
        json!({ "type": "maps_search", "title": "Good" }),
        json!({ "type": "maps_search", "title": 42 }),
        json!({ "type": "maps_search", "title": "Also Good" }),
    ]);
    let parsed: Vec<MapsItem> = parse_items(items, "test");
    assert_eq!(parsed.len(), 2);
    assert_eq!(parsed[1].title.as_deref(), Some("Also Good"));
}

#[test]
fn review_without_rating_defaults_to_zero() {
    let item: ReviewItem = serde_json::from_value(json!({
        "type": "google_reviews_search",
        "review_id": "r-1"
    }))
    .unwrap();
    let review = normalize_review(&item);
    assert!(review.rating.abs() < f64::EPSILON);
    assert!(review.text.is_none());
    assert!(review.reviewer_name.is_none());
    assert!(review.owner_response.is_none());
    assert!(review.images.is_none());
}

#[test]
fn review_with_every_field_is_preserved() {
    let item: ReviewItem = serde_json::from_value(json!({
        "type": "google_reviews_search",
        "review_id": "r-2",
        "review_text": "Fixed our leak the same day.",
        "rating": { "rating_type": "Max5", "value": 5, "votes_count": null },
        "profile_name": "Dana P.",
        "owner_answer": "Thanks Dana!",
        "images": [
            { "type": "review_image", "image_url": "https://img.example/1.jpg" },
            { "type": "review_image", "url": "https://img.example/2.jpg" }
        ],
        "timestamp": "2024-05-01 14:03:11 +00:00"
    }))
    .unwrap();
    let review = normalize_review(&item);
    assert_eq!(review.review_id.as_deref(), Some("r-2"));
    assert_eq!(review.text.as_deref(), Some("Fixed our leak the same day."));
    assert!((review.rating - 5.0).abs() < f64::EPSILON);
    assert_eq!(review.reviewer_name.as_deref(), Some("Dana P."));
    assert_eq!(review.owner_response.as_deref(), Some("Thanks Dana!"));
    assert_eq!(
        review.images,
        Some(vec![
            "https://img.example/1.jpg".to_string(),
            "https://img.example/2.jpg".to_string()
        ])
    );
}

#[test]
fn reviews_use_envelope_aggregates_and_filter_item_types() {
    let result: ReviewsTaskResult = serde_json::from_value(json!({
        "place_id": "ChIJ123abc",
        "cid": "1234567890123456789",
        "rating": { "rating_type": "Max5", "value": 4.2, "votes_count": 310 },
        "reviews_count": 310,
        "items": [
            { "type": "google_reviews_search", "review_id": "a", "rating": { "value": 1 } },
            { "type": "google_reviews_topic", "title": "pricing" },
            { "type": "google_reviews_search", "review_id": "b", "rating": { "value": 1 } }
        ]
    }))
    .unwrap();

    let reviews = normalize_reviews(result);
    assert_eq!(reviews.place_id, "ChIJ123abc");
    assert_eq!(reviews.cid.as_deref(), Some("1234567890123456789"));
    assert_eq!(reviews.reviews.len(), 2);
    // The envelope says 4.2 even though both sampled reviews are 1-star.
    assert_eq!(reviews.rating, Some(4.2));
    assert_eq!(reviews.review_count, Some(310));
}
