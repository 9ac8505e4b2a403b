use crate::{Code, Diagnostic, Label, LabelStyle, Severity};
use vitte_span::Span;

/// Handle to a diagnostic previously pushed into a [`DiagnosticBag`]. `None`
/// (represented as `DiagHandle(None)`) means the push failed because the
/// bag is poisoned; every API that takes a handle is a no-op on `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiagHandle(Option<u32>);

/// Append-only collection of diagnostics for one compile session.
///
/// Real allocator-exhaustion in Rust aborts the process rather than
/// returning an error, so there is no literal analogue of the spec's
/// "allocation failure drops the last diagnostic" path. `poison` exists for
/// the cases this crate treats the same way — an internal invariant
/// violation encountered while building a diagnostic — so the rest of the
/// pipeline can keep calling `push` without checking a `Result` at every
/// call site, exactly as the spec intends.
#[derive(Default)]
pub struct DiagnosticBag {
    diagnostics: Vec<Diagnostic>,
    error_count: usize,
    poisoned: bool,
}

impl DiagnosticBag {
    pub fn new() -> Self {
        DiagnosticBag::default()
    }

    pub fn push(&mut self, severity: Severity, code: Code, primary_span: Span, message: impl Into<String>) -> DiagHandle {
        if self.poisoned {
            return DiagHandle(None);
        }
        let index = self.diagnostics.len() as u32;
        if severity == Severity::Error {
            self.error_count += 1;
        }
        self.diagnostics.push(Diagnostic {
            severity,
            code,
            message: message.into(),
            labels: vec![Label { style: LabelStyle::Primary, span: primary_span, message: None }],
            notes: Vec::new(),
            help: None,
            insertion_index: index,
        });
        DiagHandle(Some(index))
    }

    /// Appends a secondary label. Refuses to add a second primary label;
    /// callers that need one should push a new diagnostic instead.
    pub fn add_label(&mut self, handle: DiagHandle, style: LabelStyle, span: Span, message: Option<String>) {
        let Some(diag) = self.get_mut(handle) else { return };
        if style == LabelStyle::Primary {
            return;
        }
        diag.labels.push(Label { style, span, message });
    }

    pub fn add_note(&mut self, handle: DiagHandle, text: impl Into<String>) {
        if let Some(diag) = self.get_mut(handle) {
            diag.notes.push(text.into());
        }
    }

    pub fn set_help(&mut self, handle: DiagHandle, text: impl Into<String>) {
        if let Some(diag) = self.get_mut(handle) {
            diag.help = Some(text.into());
        }
    }

    /// Promotes every warning currently in the bag to an error, so
    /// `has_errors`/`error_count` account for it too. Used by `--werror` (§6).
    pub fn promote_warnings_to_errors(&mut self) {
        for diag in self.diagnostics.iter_mut() {
            if diag.severity == Severity::Warning {
                diag.severity = Severity::Error;
                self.error_count += 1;
            }
        }
    }

    pub fn mark_poisoned(&mut self) {
        self.diagnostics.pop();
        self.poisoned = true;
    }

    pub fn is_poisoned(&self) -> bool {
        self.poisoned
    }

    pub fn has_errors(&self) -> bool {
        self.error_count > 0
    }

    pub fn error_count(&self) -> usize {
        self.error_count
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter()
    }

    /// Stable sort by `(file_id, lo, hi, severity_rank, code, insertion_index)`.
    pub fn sort_by_location(&mut self) {
        self.diagnostics.sort_by(|a, b| {
            let a_span = a.primary_span();
            let b_span = b.primary_span();
            (a_span.file_id, a_span.lo, a_span.hi, a.severity.rank(), a.code, a.insertion_index).cmp(&(
                b_span.file_id,
                b_span.lo,
                b_span.hi,
                b.severity.rank(),
                b.code,
                b.insertion_index,
            ))
        });
    }

    fn get_mut(&mut self, handle: DiagHandle) -> Option<&mut Diagnostic> {
        self.diagnostics.get_mut(handle.0? as usize)
    }
}
