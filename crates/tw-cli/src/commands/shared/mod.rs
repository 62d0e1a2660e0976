pub mod limit;
pub mod reviews;
