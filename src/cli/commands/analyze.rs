//! Analyze Command
//!
//! Draft, score and critique one prompt.
//!
//! Usage:
//!   promptspec analyze "Summarize the attached report" [--domain docs] [-f json]
//!   cat prompt.txt | promptspec analyze

use std::path::Path;

use crate::analysis::{AnalysisOptions, AnalysisRequest};
use crate::cli::ui::{Output, report};
use crate::cli::util::{CommandContext, ReportFormat, read_prompt, rejection, serialize};
use crate::types::Result;

pub struct AnalyzeArgs {
    pub prompt: Option<String>,
    pub domain: Option<String>,
    pub options: AnalysisOptions,
    pub format: ReportFormat,
}

pub fn run(args: AnalyzeArgs, config_path: Option<&Path>) -> Result<()> {
    let ctx = CommandContext::load(config_path)?;
    let outcome = read_prompt(args.prompt).and_then(|prompt| {
        let mut request = AnalysisRequest::new(prompt).with_options(args.options);
        request.domain = args.domain;
        ctx.analyzer.analyze(&request)
    });

    let analysis = match outcome {
        Ok(analysis) => analysis,
        Err(e) => {
            if let Some(text) = rejection(&e, args.format)? {
                println!("{}", text);
            }
            return Err(e);
        }
    };

    match serialize(analysis.report.as_ref(), args.format)? {
        Some(text) => println!("{}", text),
        None => report::print_analysis(&Output::new(), &analysis),
    }
    Ok(())
}
