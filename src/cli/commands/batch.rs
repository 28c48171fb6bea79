//! Batch Command
//!
//! Analyze a file of prompts (one per line) concurrently through one shared
//! analyzer and cache, with the expiry sweeper running alongside.
//!
//! Usage:
//!   promptspec batch prompts.txt [--domain code] [--concurrency 8] [-f json]

use futures::StreamExt;
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

use crate::analysis::{AnalysisRequest, Analyzer};
use crate::cache::{CacheStats, spawn_cleanup};
use crate::cli::ui::{Output, report};
use crate::cli::util::{CommandContext, ReportFormat, read_batch_file, serialize};
use crate::types::{InputErrorCode, PromptSpecError, Result};

/// One line of batch output
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchRow {
    pub line: usize,
    pub prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clarity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completeness: Option<f64>,
    pub issues: usize,
    pub cache_hit: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<InputErrorCode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
struct BatchSummary {
    rows: Vec<BatchRow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    cache: Option<CacheStats>,
}

pub async fn run(
    file: &Path,
    domain: Option<String>,
    concurrency: usize,
    format: ReportFormat,
    config_path: Option<&Path>,
) -> Result<()> {
    let ctx = CommandContext::load(config_path)?;
    let prompts = read_batch_file(file)?;
    info!(prompts = prompts.len(), concurrency, "starting batch");

    let analyzer = Arc::new(ctx.analyzer);
    let sweeper = analyzer
        .cache()
        .map(|cache| spawn_cleanup(cache.clone(), ctx.config.cache.cleanup_interval()));

    let rows = analyze_all(analyzer.clone(), prompts, domain, concurrency).await;

    if let Some(handle) = sweeper {
        handle.abort();
    }

    let summary = BatchSummary {
        rows,
        cache: analyzer.cache().map(|c| c.stats()),
    };

    match serialize(&summary, format)? {
        Some(text) => println!("{}", text),
        None => print_summary(&summary),
    }
    Ok(())
}

/// Analyze prompts with bounded concurrency, keeping input order
pub async fn analyze_all(
    analyzer: Arc<Analyzer>,
    prompts: Vec<String>,
    domain: Option<String>,
    concurrency: usize,
) -> Vec<BatchRow> {
    futures::stream::iter(prompts.into_iter().enumerate())
        .map(|(i, prompt)| {
            let analyzer = Arc::clone(&analyzer);
            let mut request = AnalysisRequest::new(prompt.clone());
            request.domain = domain.clone();
            async move {
                let outcome = tokio::task::spawn_blocking(move || analyzer.analyze(&request))
                    .await
                    .map_err(|e| PromptSpecError::component("batch", e.to_string()))
                    .and_then(|r| r);
                to_row(i + 1, prompt, outcome)
            }
        })
        .buffered(concurrency.max(1))
        .collect()
        .await
}

fn to_row(line: usize, prompt: String, outcome: Result<crate::analysis::Analysis>) -> BatchRow {
    match outcome {
        Ok(analysis) => BatchRow {
            line,
            prompt,
            clarity: Some(analysis.report.gaps.scores.clarity),
            completeness: Some(analysis.report.gaps.scores.completeness),
            issues: analysis.report.gaps.issues.len(),
            cache_hit: analysis.cache_hit,
            code: None,
            error: None,
        },
        Err(e) => {
            warn!(line, error = %e, "prompt rejected");
            BatchRow {
                line,
                prompt,
                clarity: None,
                completeness: None,
                issues: 0,
                cache_hit: false,
                code: e.input_code(),
                error: Some(e.to_string()),
            }
        }
    }
}

fn print_summary(summary: &BatchSummary) {
    let out = Output::new();
    out.header("Batch results");
    println!(
        "  {:>4}  {:>7}  {:>12}  {:>6}  prompt",
        "line", "clarity", "completeness", "issues"
    );
    for row in &summary.rows {
        let prompt: String = row.prompt.chars().take(48).collect();
        match &row.error {
            Some(e) => out.error(&format!("{:>4}  {}  ({})", row.line, prompt, e)),
            None => println!(
                "  {:>4}  {:>7.2}  {:>12.2}  {:>6}  {}{}",
                row.line,
                row.clarity.unwrap_or_default(),
                row.completeness.unwrap_or_default(),
                row.issues,
                prompt,
                if row.cache_hit { " (cached)" } else { "" }
            ),
        }
    }
    if let Some(stats) = &summary.cache {
        report::print_cache_stats(&out, stats);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::scoring::ScoringSettings;
    use crate::cache::ResultCache;
    use crate::config::InputLimits;
    use std::num::NonZeroUsize;
    use std::time::Duration;

    fn analyzer() -> Arc<Analyzer> {
        let cache = ResultCache::new(NonZeroUsize::new(16).unwrap(), Duration::from_secs(60));
        Arc::new(
            Analyzer::new(ScoringSettings::default(), InputLimits::default())
                .with_cache(Arc::new(cache)),
        )
    }

    #[tokio::test]
    async fn test_rows_keep_input_order() {
        let prompts = vec![
            "Explain tides".to_string(),
            "Compare Rust and Go".to_string(),
            "Summarize the meeting notes".to_string(),
        ];
        let rows = analyze_all(analyzer(), prompts.clone(), None, 3).await;
        let seen: Vec<&str> = rows.iter().map(|r| r.prompt.as_str()).collect();
        assert_eq!(seen, prompts.iter().map(String::as_str).collect::<Vec<_>>());
        assert_eq!(rows[0].line, 1);
        assert!(rows.iter().all(|r| r.error.is_none()));
    }

    #[tokio::test]
    async fn test_duplicates_served_from_shared_cache() {
        let analyzer = analyzer();
        let prompts = vec!["Explain tides".to_string(); 4];
        let rows = analyze_all(analyzer.clone(), prompts, None, 1).await;
        assert_eq!(rows.iter().filter(|r| r.cache_hit).count(), 3);

        let stats = analyzer.cache().unwrap().stats();
        assert_eq!((stats.hits, stats.misses, stats.size), (3, 1, 1));
    }

    #[tokio::test]
    async fn test_bad_domain_reported_per_row() {
        let rows = analyze_all(
            analyzer(),
            vec!["Explain tides".to_string()],
            Some("finance".to_string()),
            2,
        )
        .await;
        let err = rows[0].error.as_deref().unwrap();
        assert!(err.contains(&InputErrorCode::InvalidDomain.to_string()));
        assert_eq!(rows[0].code, Some(InputErrorCode::InvalidDomain));

        let value = serde_json::to_value(&rows[0]).unwrap();
        assert_eq!(value["code"], "INVALID_DOMAIN");
    }
}
