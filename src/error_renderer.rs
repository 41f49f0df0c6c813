//! Error reports rendered with ariadne.
//!
//! Parse and runtime errors are drawn against the program text they came
//! from, with the offending span labelled. Resource errors carry no location
//! and are written as a single line.

use crate::{Diagnostic, Error};
use ariadne::{ColorGenerator, Config, Label, Report, ReportKind, Source};
use std::io::Write;
use std::ops::Range;

const SOURCE_ID: &str = "<program>";

/// Writes a colored report for `error` to stderr.
///
/// # Example
/// ```no_run
/// use ambeval::{Interpreter, render_error};
///
/// let mut interpreter = Interpreter::default();
/// if let Err(e) = interpreter.all_solutions("1 + ;") {
///     render_error(&e);
/// }
/// ```
pub fn render_error(error: &Error) {
    let _ = write_report(error, &mut std::io::stderr(), true);
}

/// Writes a colored report for `error` to `writer`.
pub fn render_error_to(error: &Error, writer: &mut dyn Write) -> std::io::Result<()> {
    write_report(error, writer, true)
}

/// Colored report as a string, for REPLs and logs.
pub fn render_error_to_string(error: &Error) -> String {
    report_string(error, true)
}

/// Plain report as a string, without ANSI escapes.
pub fn render_error_to_string_no_color(error: &Error) -> String {
    report_string(error, false)
}

fn report_string(error: &Error, color: bool) -> String {
    let mut out = Vec::new();
    let _ = write_report(error, &mut out, color);
    String::from_utf8_lossy(&out).into_owned()
}

fn write_report(error: &Error, writer: &mut dyn Write, color: bool) -> std::io::Result<()> {
    match error {
        Error::Parse { diagnostic, source } | Error::Runtime { diagnostic, source } => {
            build_report(diagnostic, color)
                .write((SOURCE_ID, Source::from(source.as_str())), writer)
        }
        Error::ResourceExceeded(_) => writeln!(writer, "{error}"),
    }
}

fn build_report(diagnostic: &Diagnostic, color: bool) -> Report<'_, (&'static str, Range<usize>)> {
    let span = (SOURCE_ID, diagnostic.span.0.clone());

    // Skip the header color.
    let mut palette = ColorGenerator::new();
    palette.next();

    let mut builder = Report::build(ReportKind::Error, span.clone())
        .with_config(Config::default().with_color(color))
        .with_message(&diagnostic.message)
        .with_label(
            Label::new(span)
                .with_message(&diagnostic.message)
                .with_color(palette.next()),
        );
    if let Some(code) = &diagnostic.code {
        builder = builder.with_code(code);
    }
    if let Some(help) = &diagnostic.help {
        builder = builder.with_help(help);
    }
    builder.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Interpreter;

    #[test]
    fn test_parse_error_shows_code_and_source() {
        let source = "1 + + ;";
        let err = Interpreter::default().all_solutions(source).unwrap_err();
        let output = render_error_to_string_no_color(&err);

        assert!(output.contains("Error"));
        assert!(output.contains("E0001"));
        assert!(output.contains(source));
    }

    #[test]
    fn test_runtime_error_is_drawn_against_its_line() {
        let err = Interpreter::default()
            .all_solutions("let x = 1;\nx + \"a\";")
            .unwrap_err();
        let output = render_error_to_string_no_color(&err);

        assert!(output.contains("E0107"));
        assert!(output.contains("x + \"a\";"));
        assert!(output.lines().count() > 2);
    }

    #[test]
    fn test_runtime_report_is_headed_as_error() {
        let err = Interpreter::default()
            .all_solutions("amb(1, 2) + true;")
            .unwrap_err();
        let output = render_error_to_string_no_color(&err);
        let header = output.lines().next().unwrap_or_default();

        assert!(header.contains("Error:"), "{header}");
        assert!(!output.contains("Warning"));
        assert!(!output.contains("Advice"));
    }

    #[test]
    fn test_help_is_rendered() {
        let err = Interpreter::default()
            .all_solutions("const c = 1; c = 2;")
            .unwrap_err();
        let output = render_error_to_string_no_color(&err);

        assert!(output.contains("declare it with `let`"));
    }

    #[test]
    fn test_resource_error_is_one_line() {
        let err = Error::ResourceExceeded("evaluation stack overflow".to_string());
        assert_eq!(
            render_error_to_string_no_color(&err),
            "Resource limit exceeded: evaluation stack overflow\n"
        );
    }
}
