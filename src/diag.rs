//! Syntax diagnostics.
//!
//! Scanning, grammar matching, and lowering all record problems as [`Diag`]
//! values: plain data a pass can build without knowing anything about
//! rendering. A parse works over exactly one anonymous source string, so
//! there is no file table here; once a parse finishes, [`into_reports`]
//! turns the collected batch into [`miette::Report`]s with that source
//! attached, clamping any span that has drifted out of bounds rather than
//! letting the renderer panic.

use crate::ast::Span;
use miette::{LabeledSpan, MietteDiagnostic, Report, Severity as ReportSeverity, SourceSpan};

/// Diagnostic severity. The syntax phase is single-shot: an error means the
/// parse produced no AST, a warning rides along with a successful one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Severity {
    #[default]
    Error,
    Warning,
}

/// One problem found in the source text.
///
/// A diagnostic points at the place it was raised (`primary`) with a short
/// text printed under the span; `context` carries any further spans worth
/// showing alongside it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diag {
    pub severity: Severity,
    pub message: String,
    /// The offending span and the text printed under it.
    pub primary: Option<(Span, String)>,
    /// Supporting locations, rendered as secondary labels.
    pub context: Vec<(Span, String)>,
    pub help: Option<String>,
    /// Stable machine-readable tag, e.g. `cypher::syntax_error`.
    pub code: Option<&'static str>,
}

impl Diag {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
            primary: None,
            context: Vec::new(),
            help: None,
            code: None,
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            ..Self::error(message)
        }
    }

    /// Points the diagnostic at `span`, with `text` printed under it.
    pub fn at(mut self, span: Span, text: impl Into<String>) -> Self {
        self.primary = Some((span, text.into()));
        self
    }

    /// Adds a supporting span.
    pub fn also(mut self, span: Span, text: impl Into<String>) -> Self {
        self.context.push((span, text.into()));
        self
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    pub fn with_code(mut self, code: &'static str) -> Self {
        self.code = Some(code);
        self
    }

    /// Renders this diagnostic against the source it was produced from.
    pub fn into_report(self, source: &str) -> Report {
        let diagnostic = self.to_miette(source.len());
        Report::new(diagnostic).with_source_code(source.to_owned())
    }

    fn to_miette(&self, source_len: usize) -> MietteDiagnostic {
        let mut labels = Vec::with_capacity(self.context.len() + 1);
        if let Some((span, text)) = &self.primary {
            labels.push(LabeledSpan::new_primary_with_span(
                Some(text.clone()),
                clamp(span, source_len),
            ));
        }
        for (span, text) in &self.context {
            labels.push(LabeledSpan::new_with_span(
                Some(text.clone()),
                clamp(span, source_len),
            ));
        }

        let mut diagnostic = MietteDiagnostic::new(self.message.clone()).with_severity(
            match self.severity {
                Severity::Error => ReportSeverity::Error,
                Severity::Warning => ReportSeverity::Warning,
            },
        );
        if let Some(code) = self.code {
            diagnostic = diagnostic.with_code(code);
        }
        if let Some(help) = &self.help {
            diagnostic = diagnostic.with_help(help.clone());
        }
        if !labels.is_empty() {
            diagnostic = diagnostic.with_labels(labels);
        }
        diagnostic
    }
}

/// Renders a batch of diagnostics in the order it was collected.
pub fn into_reports(diagnostics: Vec<Diag>, source: &str) -> Vec<Report> {
    diagnostics
        .into_iter()
        .map(|diag| diag.into_report(source))
        .collect()
}

/// Forces `span` into the source bounds, collapsing inverted ranges, so a
/// stale span can never panic the renderer.
fn clamp(span: &Span, source_len: usize) -> SourceSpan {
    let start = span.start.min(source_len);
    let end = span.end.min(source_len).max(start);
    (start, end - start).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_builder_fills_every_slot() {
        let diag = Diag::error("unterminated thing")
            .at(4..9, "opened here")
            .also(0..2, "inside this clause")
            .with_help("close it")
            .with_code("cypher::test");

        assert_eq!(diag.severity, Severity::Error);
        assert_eq!(diag.primary, Some((4..9, "opened here".to_string())));
        assert_eq!(diag.context.len(), 1);
        assert_eq!(diag.help.as_deref(), Some("close it"));
        assert_eq!(diag.code, Some("cypher::test"));
    }

    #[test]
    fn warning_keeps_the_message() {
        let diag = Diag::warning("odd but legal");
        assert_eq!(diag.severity, Severity::Warning);
        assert_eq!(diag.message, "odd but legal");
    }

    #[test]
    fn clamp_forces_spans_into_bounds() {
        assert_eq!(clamp(&(0..10), 5), SourceSpan::from((0, 5)));
        assert_eq!(clamp(&(10..20), 5), SourceSpan::from((5, 0)));
        assert_eq!(clamp(&(2..4), 5), SourceSpan::from((2, 2)));
        let inverted = std::ops::Range { start: 3, end: 2 };
        assert_eq!(clamp(&inverted, 5), SourceSpan::from((3, 0)));
    }

    #[test]
    fn to_miette_carries_severity_code_help_and_labels() {
        let diag = Diag::warning("w")
            .at(0..3, "primary")
            .also(4..5, "secondary")
            .with_help("try this")
            .with_code("cypher::w");
        let rendered = diag.to_miette(10);

        assert_eq!(rendered.severity, Some(ReportSeverity::Warning));
        assert_eq!(rendered.code.as_deref(), Some("cypher::w"));
        assert_eq!(rendered.help.as_deref(), Some("try this"));
        let labels = rendered.labels.expect("expected labels");
        assert_eq!(labels.len(), 2);
        assert!(labels[0].primary());
        assert!(!labels[1].primary());
    }

    #[test]
    fn to_miette_omits_labels_when_there_are_none() {
        let rendered = Diag::error("bare").to_miette(0);
        assert!(rendered.labels.is_none());
    }

    #[test]
    fn report_rendering_survives_out_of_bounds_spans() {
        let report = Diag::error("boom")
            .at(0..100, "way past the end")
            .into_report("short");
        assert_eq!(report.to_string(), "boom");
    }

    #[test]
    fn batch_rendering_keeps_collection_order() {
        let reports = into_reports(
            vec![
                Diag::error("first").at(0..4, "here"),
                Diag::warning("second").at(5..11, "there"),
            ],
            "test source",
        );
        assert_eq!(reports.len(), 2);
        assert_eq!(reports[0].to_string(), "first");
        assert_eq!(reports[1].to_string(), "second");
    }
}
