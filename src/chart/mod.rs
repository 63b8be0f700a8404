pub mod dashboard;
pub mod figure;
pub mod font;
