pub mod output;
pub mod report;

pub use output::Output;
