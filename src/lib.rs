pub mod config;
pub mod error;
pub mod evaluator;
pub mod logging;
pub mod machine;
pub mod reverse_search;
pub mod types;
