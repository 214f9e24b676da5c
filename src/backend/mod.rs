pub mod fixture;
pub mod http;

pub use fixture::FixtureJobLookup;
pub use http::HttpJobLookup;
