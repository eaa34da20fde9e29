//! Data-quality diagnostics for hierarchy branches.
//!
//! Physics samples can legitimately contain malformed records (a non-primary
//! particle with no true parent, a parent index pointing outside its event).
//! Those are surfaced here as report entries rather than crashes, so a run
//! completes and the caller can decide what to do with the findings.

use std::collections::HashMap;
use std::fmt;

/// Severity level for a data-quality finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    /// Informational, not a problem.
    Info,
    /// Inconsistent data that was tolerated.
    Warning,
    /// A problem that invalidates the affected entries.
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Info => write!(f, "INFO"),
            Severity::Warning => write!(f, "WARN"),
            Severity::Error => write!(f, "ERROR"),
        }
    }
}

/// A single data-quality finding, located by event and particle index.
#[derive(Debug, Clone)]
pub struct QualityIssue {
    /// Severity of the finding.
    pub severity: Severity,
    /// Human-readable description.
    pub message: String,
    /// Event index, if the finding is localized.
    pub event: Option<usize>,
    /// Particle index within the event, if localized.
    pub particle: Option<usize>,
}

impl QualityIssue {
    /// Create a new finding.
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
            event: None,
            particle: None,
        }
    }

    /// Attach an (event, particle) location.
    pub fn at(mut self, event: usize, particle: usize) -> Self {
        self.event = Some(event);
        self.particle = Some(particle);
        self
    }
}

impl fmt::Display for QualityIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.severity, self.message)?;
        if let (Some(e), Some(p)) = (self.event, self.particle) {
            write!(f, " (event {e}, particle {p})")?;
        }
        Ok(())
    }
}

/// Accumulated findings from one classification or validation pass.
#[derive(Debug, Clone, Default)]
pub struct QualityReport {
    /// All findings, in discovery order.
    pub issues: Vec<QualityIssue>,
}

impl QualityReport {
    /// Create an empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a finding.
    pub fn add(&mut self, issue: QualityIssue) {
        self.issues.push(issue);
    }

    /// Add a warning located at (event, particle).
    pub fn warn_at(&mut self, event: usize, particle: usize, message: impl Into<String>) {
        self.add(QualityIssue::new(Severity::Warning, message).at(event, particle));
    }

    /// Add an error located at (event, particle).
    pub fn error_at(&mut self, event: usize, particle: usize, message: impl Into<String>) {
        self.add(QualityIssue::new(Severity::Error, message).at(event, particle));
    }

    /// Whether no findings were recorded.
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    /// Findings counted by severity.
    pub fn counts(&self) -> HashMap<Severity, usize> {
        let mut counts = HashMap::new();
        for issue in &self.issues {
            *counts.entry(issue.severity).or_default() += 1;
        }
        counts
    }

    /// Fold another report's findings into this one.
    pub fn merge(&mut self, other: QualityReport) {
        self.issues.extend(other.issues);
    }
}

impl fmt::Display for QualityReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_clean() {
            return write!(f, "data quality: no issues found");
        }
        writeln!(f, "data quality: {} issue(s)", self.issues.len())?;
        for issue in &self.issues {
            writeln!(f, "  {issue}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_counts() {
        let mut report = QualityReport::new();
        assert!(report.is_clean());

        report.warn_at(0, 3, "true parent missing");
        report.error_at(0, 4, "parent index out of range");
        report.add(QualityIssue::new(Severity::Info, "empty selection"));

        assert!(!report.is_clean());
        assert_eq!(report.counts()[&Severity::Warning], 1);
        assert_eq!(report.counts()[&Severity::Error], 1);
        assert_eq!(report.counts()[&Severity::Info], 1);
    }

    #[test]
    fn test_issue_display_includes_location() {
        let issue = QualityIssue::new(Severity::Warning, "orphaned particle").at(2, 5);
        let s = issue.to_string();
        assert!(s.contains("WARN"));
        assert!(s.contains("event 2, particle 5"));
    }
}
