pub mod lru;

pub use lru::LruMap;
