//! Human-readable rendering of analysis and score reports

use super::Output;
use crate::analysis::scoring::ScoreBreakdown;
use crate::analysis::{Analysis, ScoreReport, improved_prompt};
use crate::cache::CacheStats;

pub fn print_analysis(out: &Output, analysis: &Analysis) {
    let report = &analysis.report;
    let spec = &report.spec;

    out.header(spec.title.as_deref().unwrap_or("Untitled prompt"));
    println!("  intent: {}", spec.intent);
    if let Some(domain) = spec.context.domain {
        println!("  domain: {}", domain);
    }
    if let Some(format) = spec.io.format {
        println!("  format: {}", format);
    }
    if analysis.cache_hit {
        out.info("Served from cache");
    }

    out.section("Scores");
    out.score("clarity", report.gaps.scores.clarity);
    out.score("completeness", report.gaps.scores.completeness);

    if !spec.constraints.is_empty() {
        out.section("Constraints");
        for c in &spec.constraints {
            println!("  - {}", c);
        }
    }

    if !spec.context.inputs.is_empty() {
        out.section("Inputs");
        for input in &spec.context.inputs {
            println!("  [{}] {}", input.kind.as_str(), first_line(&input.value));
        }
    }

    out.section("Gaps");
    if report.gaps.issues.is_empty() {
        out.success("No gaps found");
    }
    for issue in &report.gaps.issues {
        out.issue(issue.severity, &issue.path, &issue.message);
    }

    if !report.patches.is_empty() {
        out.section("Suggested patches");
        for patch in &report.patches {
            let value = patch
                .value
                .as_ref()
                .map(|v| v.to_string())
                .unwrap_or_default();
            println!("  {} {} {}", patch.op, patch.path, value);
        }

        out.section("Improved prompt");
        for line in improved_prompt(spec, &report.patches).lines() {
            println!("  {}", line);
        }
    }

    if let Some(validation) = &report.validation {
        out.section("Structure");
        if validation.valid {
            out.success("Specification is structurally valid");
        } else {
            for v in &validation.errors {
                out.warning(&format!("{} {}", v.path, v.message));
            }
        }
    }
}

pub fn print_scores(out: &Output, scores: &ScoreReport) {
    out.header("Score breakdown");
    if let Some(domain) = scores.domain {
        println!("  domain: {}", domain);
    }
    print_breakdown(out, "Clarity", &scores.clarity);
    print_breakdown(out, "Completeness", &scores.completeness);
    println!();
    out.info(&format!("pattern library v{}", scores.pattern_version));
}

fn print_breakdown(out: &Output, title: &str, breakdown: &ScoreBreakdown) {
    out.section(title);
    println!("  {:<26}{:>6}{:>9}", "signal", "count", "delta");
    println!("  {:<26}{:>6}{:>+9.2}", "base", "", breakdown.base);
    for s in &breakdown.signals {
        println!("  {:<26}{:>6}{:>+9.2}", s.signal.to_string(), s.count, s.delta);
    }
    out.score("score", breakdown.score);
}

pub fn print_cache_stats(out: &Output, stats: &CacheStats) {
    out.section("Cache");
    println!(
        "  {} hits, {} misses ({:.0}% hit rate)",
        stats.hits,
        stats.misses,
        stats.hit_rate * 100.0
    );
    println!(
        "  {}/{} entries, ~{} KB, {} evicted",
        stats.size,
        stats.capacity,
        stats.memory_bytes / 1024,
        stats.evictions
    );
}

fn first_line(text: &str) -> String {
    let line = text.lines().next().unwrap_or("");
    if line.chars().count() > 60 {
        format!("{}…", line.chars().take(60).collect::<String>())
    } else {
        line.to_string()
    }
}
