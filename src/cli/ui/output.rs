use console::style;

use crate::types::Severity;

pub struct Output;

impl Output {
    pub fn new() -> Self {
        Self
    }

    pub fn success(&self, message: &str) {
        println!("{} {}", style("✓").green(), message);
    }

    pub fn error(&self, message: &str) {
        eprintln!("{} {}", style("✗").red(), message);
    }

    pub fn warning(&self, message: &str) {
        println!("{} {}", style("⚠").yellow(), message);
    }

    pub fn info(&self, message: &str) {
        println!("{} {}", style("ℹ").blue(), message);
    }

    pub fn header(&self, message: &str) {
        println!("\n{}", style(message).bold().underlined());
    }

    pub fn section(&self, message: &str) {
        println!("\n{}", style(message).bold());
        println!("{}", "─".repeat(40));
    }

    /// `label  0.53 ██████████░░░░░░░░░░`
    pub fn score(&self, label: &str, value: f64) {
        let filled = (value.clamp(0.0, 1.0) * 20.0).round() as usize;
        let bar = format!("{}{}", "█".repeat(filled), "░".repeat(20 - filled));
        let styled = if value >= 0.7 {
            style(bar).green()
        } else if value >= 0.4 {
            style(bar).yellow()
        } else {
            style(bar).red()
        };
        println!("  {:<14}{:.2} {}", label, value, styled);
    }

    pub fn issue(&self, severity: Severity, path: &str, message: &str) {
        let badge = match severity {
            Severity::Error => style(severity.to_string()).red().bold(),
            Severity::Warn => style(severity.to_string()).yellow().bold(),
            Severity::Info => style(severity.to_string()).blue(),
        };
        println!("  {:<5} {} {}", badge, style(path).dim(), message);
    }
}

impl Default for Output {
    fn default() -> Self {
        Self::new()
    }
}
