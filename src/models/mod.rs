pub mod book;

pub use book::{ReadingStatus, StatusFilter};
