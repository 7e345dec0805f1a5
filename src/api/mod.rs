pub mod failover;
pub mod overpass;

pub use failover::{AttemptFailure, Endpoint, FailoverFetcher, FetchOutcome};
pub use overpass::{
    Element, FetchError, HttpTransport, OverpassResponse, RawResponse, Transport, build_query,
};
