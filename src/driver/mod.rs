pub mod domain;
pub mod slider;
pub mod summary;
