//! Score Command
//!
//! Print the per-signal clarity and completeness tables for one prompt.

use std::path::Path;

use crate::cli::ui::{Output, report};
use crate::cli::util::{CommandContext, ReportFormat, read_prompt, rejection, serialize};
use crate::types::Result;

pub fn run(
    prompt: Option<String>,
    domain: Option<&str>,
    format: ReportFormat,
    config_path: Option<&Path>,
) -> Result<()> {
    let ctx = CommandContext::load(config_path)?;
    let scores = match read_prompt(prompt).and_then(|p| ctx.analyzer.score(&p, domain)) {
        Ok(scores) => scores,
        Err(e) => {
            if let Some(text) = rejection(&e, format)? {
                println!("{}", text);
            }
            return Err(e);
        }
    };

    match serialize(&scores, format)? {
        Some(text) => println!("{}", text),
        None => report::print_scores(&Output::new(), &scores),
    }
    Ok(())
}
