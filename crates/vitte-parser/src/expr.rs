use vitte_ast::{BinOp, NodeId, NodeKind, UnOp};
use vitte_diagnostics::{Code, Severity};
use vitte_token::TokenKind;

use crate::cursor::Parser;

/// Expression grammar shared by the core and phrase surfaces, standard
/// precedence climbing: `||` < `&&` < equality < relational < additive <
/// multiplicative < unary < postfix (`()`, `.`, `[]`) < primary.
impl<'a> Parser<'a> {
    pub(crate) fn parse_expr(&mut self) -> NodeId {
        self.parse_or()
    }

    fn parse_or(&mut self) -> NodeId {
        let mut lhs = self.parse_and();
        while self.at(TokenKind::OrOr) {
            self.bump();
            let rhs = self.parse_and();
            lhs = self.binary(BinOp::Or, lhs, rhs);
        }
        lhs
    }

    fn parse_and(&mut self) -> NodeId {
        let mut lhs = self.parse_equality();
        while self.at(TokenKind::AndAnd) {
            self.bump();
            let rhs = self.parse_equality();
            lhs = self.binary(BinOp::And, lhs, rhs);
        }
        lhs
    }

    fn parse_equality(&mut self) -> NodeId {
        let mut lhs = self.parse_relational();
        loop {
            let op = match self.peek_kind() {
                TokenKind::EqEq => BinOp::Eq,
                TokenKind::NotEq => BinOp::NotEq,
                _ => break,
            };
            self.bump();
            let rhs = self.parse_relational();
            lhs = self.binary(op, lhs, rhs);
        }
        lhs
    }

    fn parse_relational(&mut self) -> NodeId {
        let mut lhs = self.parse_additive();
        loop {
            let op = match self.peek_kind() {
                TokenKind::Lt => BinOp::Lt,
                TokenKind::Gt => BinOp::Gt,
                TokenKind::LtEq => BinOp::LtEq,
                TokenKind::GtEq => BinOp::GtEq,
                _ => break,
            };
            self.bump();
            let rhs = self.parse_additive();
            lhs = self.binary(op, lhs, rhs);
        }
        lhs
    }

    fn parse_additive(&mut self) -> NodeId {
        let mut lhs = self.parse_multiplicative();
        loop {
            let op = match self.peek_kind() {
                TokenKind::Plus => BinOp::Add,
                TokenKind::Minus => BinOp::Sub,
                _ => break,
            };
            self.bump();
            let rhs = self.parse_multiplicative();
            lhs = self.binary(op, lhs, rhs);
        }
        lhs
    }

    fn parse_multiplicative(&mut self) -> NodeId {
        let mut lhs = self.parse_unary();
        loop {
            let op = match self.peek_kind() {
                TokenKind::Star => BinOp::Mul,
                TokenKind::Slash => BinOp::Div,
                TokenKind::Percent => BinOp::Rem,
                _ => break,
            };
            self.bump();
            let rhs = self.parse_unary();
            lhs = self.binary(op, lhs, rhs);
        }
        lhs
    }

    fn parse_unary(&mut self) -> NodeId {
        let op = match self.peek_kind() {
            TokenKind::Minus => Some(UnOp::Neg),
            TokenKind::Bang => Some(UnOp::Not),
            _ => None,
        };
        let Some(op) = op else { return self.parse_postfix() };
        let op_span = self.bump().span;
        let operand = self.parse_unary();
        let span = self.join(op_span, self.span_of(operand));
        self.alloc(NodeKind::Unary { op, operand }, span)
    }

    fn parse_postfix(&mut self) -> NodeId {
        let mut expr = self.parse_primary();
        loop {
            match self.peek_kind() {
                TokenKind::LParen => {
                    self.bump();
                    let mut args = Vec::new();
                    if !self.at(TokenKind::RParen) {
                        loop {
                            args.push(self.parse_expr());
                            if self.at(TokenKind::Comma) {
                                self.bump();
                                continue;
                            }
                            break;
                        }
                    }
                    let close = self.expect(TokenKind::RParen, "`)`");
                    let span = match close {
                        Some(tok) => self.join(self.span_of(expr), tok.span),
                        None => self.span_of(expr),
                    };
                    expr = self.alloc(NodeKind::Call { callee: expr, args }, span);
                }
                TokenKind::Dot => {
                    self.bump();
                    let Some(name_tok) = self.expect(TokenKind::Identifier, "a field name") else {
                        let span = self.span_of(expr);
                        expr = self.alloc(NodeKind::MissingIdentifier, span);
                        continue;
                    };
                    let name = self.intern(&name_tok.text);
                    let span = self.join(self.span_of(expr), name_tok.span);
                    expr = self.alloc(NodeKind::Field { base: expr, name }, span);
                }
                TokenKind::LBracket => {
                    self.bump();
                    let index = self.parse_expr();
                    let close = self.expect(TokenKind::RBracket, "`]`");
                    let span = match close {
                        Some(tok) => self.join(self.span_of(expr), tok.span),
                        None => self.span_of(expr),
                    };
                    expr = self.alloc(NodeKind::Index { base: expr, index }, span);
                }
                _ => break,
            }
        }
        expr
    }

    fn parse_primary(&mut self) -> NodeId {
        let tok = self.peek().clone();
        match tok.kind {
            TokenKind::Number => {
                self.bump();
                let text = self.intern(&tok.text);
                self.alloc(NodeKind::Number { text, int_val: tok.int_val, float_val: None }, tok.span)
            }
            TokenKind::Float => {
                self.bump();
                let text = self.intern(&tok.text);
                let float_val = tok.text.replace('_', "").parse::<f64>().ok();
                self.alloc(NodeKind::Number { text, int_val: None, float_val }, tok.span)
            }
            TokenKind::String => {
                self.bump();
                let text = self.intern(&tok.text);
                self.alloc(NodeKind::StringLit { text }, tok.span)
            }
            TokenKind::Identifier => {
                self.bump();
                let name = self.intern(&tok.text);
                self.alloc(NodeKind::Identifier { name }, tok.span)
            }
            TokenKind::LParen => {
                self.bump();
                let inner = self.parse_expr();
                self.expect(TokenKind::RParen, "`)`");
                inner
            }
            TokenKind::UnterminatedLiteral => {
                self.bump();
                let message = if tok.text.starts_with('\'') { "unterminated character literal" } else { "unterminated string" };
                self.diags.push(Severity::Error, Code::new("E0104"), tok.span, message);
                self.alloc(NodeKind::MissingExpr, tok.span)
            }
            _ => {
                self.diags.push(Severity::Error, Code::new("E0102"), tok.span, "expected an expression");
                self.alloc(NodeKind::MissingExpr, tok.span)
            }
        }
    }

    fn binary(&mut self, op: BinOp, lhs: NodeId, rhs: NodeId) -> NodeId {
        let span = self.join(self.span_of(lhs), self.span_of(rhs));
        self.alloc(NodeKind::Binary { op, lhs, rhs }, span)
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
    use vitte_ast::NodeKind;

    fn parse_one_expr(src: &str) -> (vitte_ast::Ast, vitte_ast::NodeId) {
        let tokens = Lexer::tokenize(src, FileId(1));
        let mut interner = Interner::new();
        let mut diags = DiagnosticBag::new();
        let mut p = Parser::new(tokens, &mut interner, &mut diags, ParseBudget::unlimited());
        let id = p.parse_expr();
        (p.ast, id)
    }

    #[test]
    fn multiplication_binds_tighter_than_addition() {
        let (ast, id) = parse_one_expr("1 + 2 * 3");
        match ast.kind(id) {
            NodeKind::Binary { op: vitte_ast::BinOp::Add, rhs, .. } => {
                assert!(matches!(ast.kind(*rhs), NodeKind::Binary { op: vitte_ast::BinOp::Mul, .. }));
            }
            other => panic!("expected Add at the top, got {other:?}"),
        }
    }

    #[test]
    fn call_and_field_chain() {
        let (ast, id) = parse_one_expr("a.b(1)");
        match ast.kind(id) {
            NodeKind::Call { callee, args } => {
                assert_eq!(args.len(), 1);
                assert!(matches!(ast.kind(*callee), NodeKind::Field { .. }));
            }
            other => panic!("expected Call, got {other:?}"),
        }
    }

    #[test]
    fn unary_negation() {
        let (ast, id) = parse_one_expr("-5");
        assert!(matches!(ast.kind(id), NodeKind::Unary { op: vitte_ast::UnOp::Neg, .. }));
    }

    #[test]
    fn unterminated_string_points_at_the_opening_quote() {
        let tokens = Lexer::tokenize("\"abc\n", FileId(1));
        let mut interner = Interner::new();
        let mut diags = DiagnosticBag::new();
        let mut p = Parser::new(tokens, &mut interner, &mut diags, ParseBudget::unlimited());
        p.parse_expr();
        assert_eq!(diags.error_count(), 1);
        let diag = diags.iter().next().expect("one diagnostic");
        assert_eq!(diag.code.as_str(), "E0104");
        assert_eq!(diag.message, "unterminated string");
        assert_eq!(diag.primary_span().lo, 0);
    }
}
