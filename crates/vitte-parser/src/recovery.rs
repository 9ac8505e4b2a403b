use vitte_token::TokenKind;

use crate::cursor::Parser;

impl<'a> Parser<'a> {
    /// Skips forward to the next synchronization point: a `;`, the block
    /// terminator `END` (from `.end`), end of input, or a line boundary
    /// (the lexer doesn't emit a newline token, so a line boundary is
    /// detected by comparing `span.line` against the line recovery started
    /// on). Never consumes the sync token itself — the caller's main loop
    /// re-examines it on the next iteration.
    ///
    /// Does not itself guarantee progress: if the cursor is already sitting
    /// on a sync point, this consumes nothing. Callers implement the
    /// mandatory-forward-progress rule by checking whether `self.pos`
    /// advanced and force-consuming one token if it didn't.
    pub(crate) fn recover_to_sync_point(&mut self) {
        self.tracker.record_recovery();
        let start_line = self.peek().span.line;
        let mut consumed_any = false;
        loop {
            if self.at_eof() || self.at(TokenKind::Semicolon) || self.at(TokenKind::End) {
                return;
            }
            if consumed_any && self.peek().span.line != start_line {
                return;
            }
            self.bump();
            consumed_any = true;
        }
    }

    /// Call after an item/statement attempt that may have made zero
    /// progress (e.g. recovery landed back on the same sync point it
    /// started from). Force-consumes one token so the enclosing loop
    /// cannot spin forever.
    pub(crate) fn ensure_progress(&mut self, pos_before: usize) {
        if self.pos == pos_before && !self.at_eof() {
            self.bump();
        }
    }
}

#[cfg(test)]
mod tests {
    use vitte_arena::Interner;
    use vitte_diagnostics::DiagnosticBag;
    use vitte_lexer::Lexer;
    use vitte_span::FileId;

    use crate::budget::ParseBudget;
    use crate::cursor::Parser;

    #[test]
    fn recovery_stops_before_semicolon() {
        let tokens = Lexer::tokenize("+ + ; let", FileId(1));
        let mut interner = Interner::new();
        let mut diags = DiagnosticBag::new();
        let mut p = Parser::new(tokens, &mut interner, &mut diags, ParseBudget::unlimited());
        p.recover_to_sync_point();
        assert!(p.at(vitte_token::TokenKind::Semicolon));
    }

    #[test]
    fn recovery_on_a_sync_point_makes_no_progress_by_itself() {
        let tokens = Lexer::tokenize(";", FileId(1));
        let mut interner = Interner::new();
        let mut diags = DiagnosticBag::new();
        let mut p = Parser::new(tokens, &mut interner, &mut diags, ParseBudget::unlimited());
        let before = p.pos;
        p.recover_to_sync_point();
        assert_eq!(p.pos, before);
        p.ensure_progress(before);
        assert_ne!(p.pos, before);
    }
}
