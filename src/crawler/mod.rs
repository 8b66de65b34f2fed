pub mod fetch;
pub mod normalize;
pub mod resolver;

pub use fetch::{Fetch, HttpFetcher, Page};
pub use normalize::{normalize, Normalized};
pub use resolver::{resolve, Resolved};
