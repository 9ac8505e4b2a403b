use crate::kind::NodeKind;
use vitte_span::Span;

/// 1-based handle into an [`Ast`]; `0` is null. Node storage is append-only:
/// nodes are never moved or removed, so a `NodeId` is valid for the whole
/// session once allocated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    pub const NULL: NodeId = NodeId(0);

    pub fn is_null(self) -> bool {
        self.0 == 0
    }
}

struct NodeRecord {
    kind: NodeKind,
    span: Span,
}

/// Arena-backed store for every node produced during one parse. Indices are
/// [`NodeId`]s; nothing here is ever freed individually — disposing the
/// owning session drops the whole `Vec` at once.
#[derive(Default)]
pub struct Ast {
    nodes: Vec<NodeRecord>,
}

impl Ast {
    pub fn new() -> Self {
        Ast { nodes: Vec::new() }
    }

    /// Appends a new node and returns its id. Children referenced by `kind`
    /// must already have smaller ids than the id this call returns — callers
    /// build children bottom-up, which a recursive-descent parser does
    /// naturally.
    pub fn alloc(&mut self, kind: NodeKind, span: Span) -> NodeId {
        self.nodes.push(NodeRecord { kind, span });
        NodeId(self.nodes.len() as u32)
    }

    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.nodes[id.0 as usize - 1].kind
    }

    pub fn span(&self, id: NodeId) -> Span {
        self.nodes[id.0 as usize - 1].span
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Direct children of `id`, in source order. Used by the span-coverage
    /// property test and by any AST walk that doesn't need variant-specific
    /// structure (the linter and symbol pass match on `kind` directly
    /// instead, since they care what each child *means*).
    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        use NodeKind::*;
        match self.kind(id) {
            Module { items, .. } => items.clone(),
            Use { .. } | Export { .. } => vec![],
            Fn { params, body, .. } => {
                let mut v = params.clone();
                v.push(*body);
                v
            }
            Param { .. } => vec![],
            Entry { body, .. } => vec![*body],
            Let { init, .. } => vec![*init],
            If { cond, then_branch, else_branch } => {
                let mut v = vec![*cond, *then_branch];
                if let Some(e) = else_branch {
                    v.push(*e);
                }
                v
            }
            While { cond, body } => vec![*cond, *body],
            For { iter, body, .. } => vec![*iter, *body],
            Match { scrutinee, arms } => {
                let mut v = vec![*scrutinee];
                v.extend(arms.iter().copied());
                v
            }
            MatchArm { pattern, body } => vec![*pattern, *body],
            Return { value } | Ret { value } => value.iter().copied().collect(),
            Block { stmts } => stmts.clone(),
            ExprStatement { expr } => vec![*expr],
            Set { value, .. } => vec![*value],
            Say { value } => vec![*value],
            DoCall { .. } => vec![],
            When { arms } => arms.clone(),
            WhenArm { cond, body, .. } => {
                let mut v: Vec<NodeId> = cond.iter().copied().collect();
                v.push(*body);
                v
            }
            PhraseLoop { from, to, step, body, .. } => {
                let mut v = vec![*from, *to];
                if let Some(s) = step {
                    v.push(*s);
                }
                v.push(*body);
                v
            }
            Binary { lhs, rhs, .. } => vec![*lhs, *rhs],
            Unary { operand, .. } => vec![*operand],
            Call { callee, args } => {
                let mut v = vec![*callee];
                v.extend(args.iter().copied());
                v
            }
            Field { base, .. } => vec![*base],
            Index { base, index } => vec![*base, *index],
            Number { .. } | StringLit { .. } | Identifier { .. } => vec![],
            Error { .. } | MissingExpr | MissingStatement | MissingIdentifier | MissingBlock => vec![],
        }
    }
}
