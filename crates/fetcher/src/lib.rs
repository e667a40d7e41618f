mod cache;
mod decode;
mod descriptor;
mod fetch;

pub use cache::{ImageCache, UrlCache, image_cache};
pub use decode::{Decode, RawDecoder};
pub use descriptor::{DEFAULT_SCALE, UrlFetcher};
pub use fetch::{Fetch, HttpFetcher};
