pub mod coins;
pub mod content;
pub mod overview;
pub mod premium;
