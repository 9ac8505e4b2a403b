use crate::{Diagnostic, DiagnosticBag, LabelStyle};
use serde::Serialize;
use vitte_span::{SourceMap, Span};

/// Renders every diagnostic in `bag` using the human-readable format:
/// a headline, a `--> file:line:col` pointer, a source window with `^`
/// carets under the primary span, indented secondary-label notes, and
/// trailing `help:`/`note:` lines. No color codes (§4.2's default).
pub fn render_human(bag: &DiagnosticBag, sources: &SourceMap) -> String {
    let mut out = String::new();
    for diag in bag.iter() {
        render_one_human(diag, sources, &mut out);
        out.push('\n');
    }
    out
}

fn render_one_human(diag: &Diagnostic, sources: &SourceMap, out: &mut String) {
    let primary = diag.primary_label();
    out.push_str(&format!("{}[{}]: {}\n", diag.severity.as_str(), diag.code, diag.message));
    if let Some(file) = sources.get(primary.span.file_id) {
        out.push_str(&format!("  --> {}:{}:{}\n", file.path, primary.span.line, primary.span.col));
        if let Some(line_text) = source_line(file, primary.span.line as usize) {
            let gutter = format!("{} | ", primary.span.line);
            out.push_str(&gutter);
            out.push_str(line_text.trim_end_matches('\n'));
            out.push('\n');
            let col = primary.span.col.max(1) as usize;
            let width = (primary.span.len().max(1)) as usize;
            out.push_str(&" ".repeat(gutter.len() + col - 1));
            out.push_str(&"^".repeat(width));
            out.push('\n');
        }
    } else {
        out.push_str("  --> <unknown location>\n");
    }

    for label in diag.labels.iter().filter(|l| l.style == LabelStyle::Secondary) {
        let msg = label.message.as_deref().unwrap_or("");
        if let Some(file) = sources.get(label.span.file_id) {
            out.push_str(&format!("  note: {} --> {}:{}:{}\n", msg, file.path, label.span.line, label.span.col));
        } else {
            out.push_str(&format!("  note: {msg}\n"));
        }
    }

    if let Some(help) = &diag.help {
        out.push_str(&format!("  help: {help}\n"));
    }
    for note in &diag.notes {
        out.push_str(&format!("  note: {note}\n"));
    }
}

fn source_line<'a>(file: &'a vitte_span::SourceFile, line: usize) -> Option<&'a str> {
    let start = file.line_index.line_start(line)?;
    let end = file
        .line_index
        .line_start(line + 1)
        .unwrap_or(file.text.len())
        .min(file.text.len());
    file.text.get(start..end)
}

#[derive(Serialize)]
struct JsonSpan {
    file_id: u32,
    lo: u32,
    hi: u32,
}

impl From<Span> for JsonSpan {
    fn from(s: Span) -> Self {
        JsonSpan { file_id: s.file_id.0, lo: s.lo, hi: s.hi }
    }
}

#[derive(Serialize)]
struct JsonLabel {
    style: &'static str,
    span: JsonSpan,
    message: Option<String>,
}

#[derive(Serialize)]
struct JsonDiagnostic<'a> {
    severity: &'static str,
    code: &'a str,
    message: &'a str,
    file: Option<String>,
    line: u32,
    col: u32,
    span: JsonSpan,
    labels: Vec<JsonLabel>,
    help: Option<&'a str>,
    notes: &'a [String],
}

fn to_json_value(diag: &Diagnostic, sources: &SourceMap) -> JsonDiagnostic<'_> {
    let primary = diag.primary_label();
    let file = sources.get(primary.span.file_id).map(|f| f.path.clone());
    let labels = diag
        .labels
        .iter()
        .map(|l| JsonLabel {
            style: match l.style {
                LabelStyle::Primary => "primary",
                LabelStyle::Secondary => "secondary",
            },
            span: l.span.into(),
            message: l.message.clone(),
        })
        .collect();
    JsonDiagnostic {
        severity: diag.severity.as_str(),
        code: diag.code.as_str(),
        message: &diag.message,
        file,
        line: primary.span.line,
        col: primary.span.col,
        span: primary.span.into(),
        labels,
        help: diag.help.as_deref(),
        notes: &diag.notes,
    }
}

/// One JSON object per diagnostic, one per line (the JSON rendering default).
pub fn render_json_lines(bag: &DiagnosticBag, sources: &SourceMap) -> String {
    let mut out = String::new();
    for diag in bag.iter() {
        let value = to_json_value(diag, sources);
        out.push_str(&serde_json::to_string(&value).unwrap_or_default());
        out.push('\n');
    }
    out
}

/// All diagnostics wrapped in a single JSON array.
pub fn render_json_array(bag: &DiagnosticBag, sources: &SourceMap) -> String {
    let values: Vec<_> = bag.iter().map(|d| to_json_value(d, sources)).collect();
    serde_json::to_string(&values).unwrap_or_else(|_| "[]".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Code, LabelStyle, Severity};
    use vitte_span::SourceMap;

    #[test]
    fn human_render_includes_code_and_location() {
        let mut sources = SourceMap::new();
        let file_id = sources.add_file("a.vitte", "fn f() -> i32\n  return 0\n.end\n");
        let mut bag = DiagnosticBag::new();
        let span = Span { file_id, lo: 0, hi: 2, line: 1, col: 1 };
        bag.push(Severity::Error, Code::new("E001"), span, "bad token");
        let rendered = render_human(&bag, &sources);
        assert!(rendered.contains("error[E001]: bad token"));
        assert!(rendered.contains("a.vitte:1:1"));
    }

    #[test]
    fn json_lines_has_one_object_per_line() {
        let mut sources = SourceMap::new();
        let file_id = sources.add_file("a.vitte", "x\n");
        let mut bag = DiagnosticBag::new();
        let span = Span { file_id, lo: 0, hi: 1, line: 1, col: 1 };
        bag.push(Severity::Warning, Code::new("V1001"), span, "unused");
        bag.push(Severity::Warning, Code::new("V1002"), span, "shadow");
        let rendered = render_json_lines(&bag, &sources);
        assert_eq!(rendered.lines().count(), 2);
        assert!(rendered.contains("\"code\":\"V1001\""));
    }

    #[test]
    fn secondary_labels_render_as_notes() {
        let mut sources = SourceMap::new();
        let file_id = sources.add_file("a.vitte", "set x = 1\nset x = 2\n");
        let mut bag = DiagnosticBag::new();
        let span = Span { file_id, lo: 10, hi: 11, line: 2, col: 5 };
        let outer = Span { file_id, lo: 4, hi: 5, line: 1, col: 5 };
        let h = bag.push(Severity::Warning, Code::new("V1002"), span, "shadowed binding");
        bag.add_label(h, LabelStyle::Secondary, outer, Some("outer binding here".into()));
        let rendered = render_human(&bag, &sources);
        assert!(rendered.contains("note: outer binding here"));
    }
}
