//! DataForSEO business lookup client.
//!
//! Resolves a business by name and location through the Google Maps SERP
//! endpoint, and retrieves its reviews through the asynchronous
//! task-post / tasks-ready / task-get protocol. Provider payloads are
//! normalized into the stable types in [`normalize`]; business-level
//! failures come back as [`TaskOutcome`] values while transport failures are
//! returned as [`DataForSeoError`].

pub mod balance;
pub mod client;
pub mod error;
pub mod location;
pub mod normalize;
pub mod outcome;
pub mod reviews;
pub mod search;
pub mod types;

pub use balance::Balance;
pub use client::{ClientOptions, DataForSeoClient, PollConfig};
pub use error::DataForSeoError;
pub use location::{classify_location, country_name, LocationTarget};
pub use normalize::{Coordinates, DiscoveredBusiness, RawPlaceResult, Review, ReviewsResult};
pub use outcome::{TaskMeta, TaskOutcome, STATUS_CANCELLED, STATUS_OK, STATUS_TIMEOUT};
pub use reviews::ReviewSort;

pub use tokio_util::sync::CancellationToken;
