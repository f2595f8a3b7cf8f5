pub mod book_value;
pub mod salvage;
pub mod schedule;
pub mod straight_line;
pub mod summary;
