//! Syntax tree nodes.
//!
//! One [`NodeKind`] variant per node kind. Children are named fields rather
//! than a positional list so the evaluator can match on them directly and the
//! compiler checks that every kind is handled.

use crate::{BinaryOp, IncDecOp, LogicalOp, Position, TypeTag, UnaryOp};

/// Identifier text (variable, function, record or field name).
pub type Name = String;

/// A syntax tree node.
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    pub kind: NodeKind,
    pub pos: Position,
}

impl Node {
    #[inline]
    pub fn new(kind: NodeKind, pos: Position) -> Self {
        Node { kind, pos }
    }

    /// Replace this node's position.
    #[must_use]
    pub fn at(mut self, line: u32, column: u32) -> Self {
        self.pos = Position::new(line, column);
        self
    }
}

/// A function parameter.
#[derive(Clone, Debug, PartialEq)]
pub struct Param {
    pub name: Name,
    pub ty: TypeTag,
    /// Record type name when `ty` is [`TypeTag::Record`].
    pub record: Option<Name>,
}

/// A field in a record definition.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldDecl {
    pub name: Name,
    pub ty: TypeTag,
    /// Default value expression, evaluated once when the record is defined.
    pub default: Option<Node>,
}

/// A user function definition.
#[derive(Clone, Debug, PartialEq)]
pub struct FuncDef {
    pub name: Name,
    pub params: Vec<Param>,
    pub ret: TypeTag,
    pub body: Node,
}

/// Node kinds with their payloads.
#[derive(Clone, Debug, PartialEq)]
pub enum NodeKind {
    /// Empty statement.
    Nop,

    // Literals
    Int(i32),
    UInt(u32),
    Long(i64),
    Float(f32),
    Bool(bool),
    /// Character literal; evaluates to an `int`.
    Char(u8),
    Str(String),
    /// `[a, b, c]`. `elem` pins the element type of an empty literal;
    /// otherwise it is taken from the first item.
    ArrayLit {
        elem: Option<TypeTag>,
        items: Vec<Node>,
    },
    /// `Name { field = expr, ... }`: defaults overridden by the listed fields.
    RecordLit {
        record: Name,
        fields: Vec<(Name, Node)>,
    },

    // Access
    Var(Name),
    Index {
        target: Box<Node>,
        index: Box<Node>,
    },
    Field {
        target: Box<Node>,
        field: Name,
    },

    // Operators
    Binary {
        op: BinaryOp,
        lhs: Box<Node>,
        rhs: Box<Node>,
    },
    Logical {
        op: LogicalOp,
        lhs: Box<Node>,
        rhs: Box<Node>,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Node>,
    },
    Cast {
        target: TypeTag,
        operand: Box<Node>,
    },
    Call {
        name: Name,
        args: Vec<Node>,
    },

    // Assignment (usable as statements or expressions)
    Assign {
        target: Box<Node>,
        value: Box<Node>,
    },
    CompoundAssign {
        op: BinaryOp,
        target: Box<Node>,
        value: Box<Node>,
    },
    IncDec {
        op: IncDecOp,
        target: Box<Node>,
    },

    // Statements
    Seq(Vec<Node>),
    /// A sequence evaluated in its own scope.
    Block(Box<Node>),
    Print(Box<Node>),
    /// `println` with an optional argument; bare `println` emits a newline.
    Println(Option<Box<Node>>),
    VarDecl {
        name: Name,
        ty: TypeTag,
        /// Record type name when `ty` is [`TypeTag::Record`].
        record: Option<Name>,
        init: Option<Box<Node>>,
    },
    /// Zero-initialized, possibly multi-dimensional array declaration.
    ArrayDecl {
        name: Name,
        elem: TypeTag,
        dims: Vec<Node>,
    },
    RecordDef {
        name: Name,
        fields: Vec<FieldDecl>,
    },
    If {
        cond: Box<Node>,
        then_branch: Box<Node>,
        else_branch: Option<Box<Node>>,
    },
    For {
        init: Box<Node>,
        cond: Box<Node>,
        step: Box<Node>,
        body: Box<Node>,
    },
    While {
        cond: Box<Node>,
        body: Box<Node>,
    },
    Break,
    Continue,
    Return(Option<Box<Node>>),
    FuncDef(Box<FuncDef>),
}

impl NodeKind {
    /// Short kind name for internal diagnostics.
    pub const fn name(&self) -> &'static str {
        match self {
            NodeKind::Nop => "nop",
            NodeKind::Int(_) => "int literal",
            NodeKind::UInt(_) => "unsigned literal",
            NodeKind::Long(_) => "long literal",
            NodeKind::Float(_) => "float literal",
            NodeKind::Bool(_) => "bool literal",
            NodeKind::Char(_) => "char literal",
            NodeKind::Str(_) => "string literal",
            NodeKind::ArrayLit { .. } => "array literal",
            NodeKind::RecordLit { .. } => "record literal",
            NodeKind::Var(_) => "variable",
            NodeKind::Index { .. } => "index",
            NodeKind::Field { .. } => "field access",
            NodeKind::Binary { .. } => "binary operation",
            NodeKind::Logical { .. } => "logical operation",
            NodeKind::Unary { .. } => "unary operation",
            NodeKind::Cast { .. } => "cast",
            NodeKind::Call { .. } => "call",
            NodeKind::Assign { .. } => "assignment",
            NodeKind::CompoundAssign { .. } => "compound assignment",
            NodeKind::IncDec { .. } => "increment/decrement",
            NodeKind::Seq(_) => "sequence",
            NodeKind::Block(_) => "block",
            NodeKind::Print(_) => "print",
            NodeKind::Println(_) => "println",
            NodeKind::VarDecl { .. } => "variable declaration",
            NodeKind::ArrayDecl { .. } => "array declaration",
            NodeKind::RecordDef { .. } => "record definition",
            NodeKind::If { .. } => "if",
            NodeKind::For { .. } => "for",
            NodeKind::While { .. } => "while",
            NodeKind::Break => "break",
            NodeKind::Continue => "continue",
            NodeKind::Return(_) => "return",
            NodeKind::FuncDef(_) => "function definition",
        }
    }
}
