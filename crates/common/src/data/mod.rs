mod response;

pub use response::{Response, Scaled};
