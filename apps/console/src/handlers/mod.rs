pub mod cache;
pub mod content;
pub mod translations;
