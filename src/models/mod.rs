pub mod common;
pub mod content;
pub mod overview;
pub mod premium;
pub mod ticker;
