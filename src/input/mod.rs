pub mod prompt;

pub use prompt::{collect_scenario, Prompter};
