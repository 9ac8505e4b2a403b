/// Binary operators recognized by the expression grammar shared by both surfaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Eq,
    NotEq,
    Lt,
    Gt,
    LtEq,
    GtEq,
    And,
    Or,
}

/// Unary prefix operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnOp {
    Neg,
    Not,
}

/// The entrypoint-kind keyword an item was declared with
/// (`prog`/`program`, `service`, `kernel`, `driver`, `tool`, `pipeline`,
/// or `scn`/`scenario`). Kept distinct from [`crate::NodeKind::Fn`] since
/// entrypoint items have no parameter list or return type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Scenario,
    Program,
    Service,
    Kernel,
    Driver,
    Tool,
    Pipeline,
}
