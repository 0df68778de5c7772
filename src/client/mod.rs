//! Typed client for the talent directory API.
//!
//! `TalentFilters` turns UI selections into query parameters, `ClientSession`
//! owns the bearer token, `ApiClient` talks HTTP and `ExploreController`
//! decides when the talent listing needs to be fetched again.

pub mod api;
pub mod explore;
pub mod query;
pub mod session;

pub use api::{ApiClient, ClientError, Listing};
pub use explore::{ExploreController, ListingView, TalentSource};
pub use query::TalentFilters;
pub use session::ClientSession;
