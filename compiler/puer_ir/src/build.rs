//! Builder functions, one per node kind.
//!
//! Nodes are created at [`Position::DUMMY`]; chain [`Node::at`] to attach a
//! source position.
//!
//! ```
//! use puer_ir::{build, BinaryOp, TypeTag};
//!
//! let program = build::seq(vec![
//!     build::var_decl("x", TypeTag::Int, Some(build::int(5))),
//!     build::assign(
//!         build::var("x"),
//!         build::binary(BinaryOp::Add, build::var("x"), build::int(3)),
//!     ),
//!     build::print(build::var("x")),
//! ]);
//! assert_eq!(program.kind.name(), "sequence");
//! ```

use crate::{
    BinaryOp, FieldDecl, FuncDef, IncDecOp, LogicalOp, Name, Node, NodeKind, Param, Position,
    TypeTag, UnaryOp,
};

#[inline]
fn node(kind: NodeKind) -> Node {
    Node::new(kind, Position::DUMMY)
}

pub fn nop() -> Node {
    node(NodeKind::Nop)
}

pub fn int(value: i32) -> Node {
    node(NodeKind::Int(value))
}

pub fn uint(value: u32) -> Node {
    node(NodeKind::UInt(value))
}

pub fn long(value: i64) -> Node {
    node(NodeKind::Long(value))
}

pub fn float(value: f32) -> Node {
    node(NodeKind::Float(value))
}

pub fn boolean(value: bool) -> Node {
    node(NodeKind::Bool(value))
}

pub fn char_lit(value: u8) -> Node {
    node(NodeKind::Char(value))
}

pub fn string(value: impl Into<String>) -> Node {
    node(NodeKind::Str(value.into()))
}

pub fn array_lit(items: Vec<Node>) -> Node {
    node(NodeKind::ArrayLit { elem: None, items })
}

/// Empty or explicitly typed array literal.
pub fn typed_array_lit(elem: TypeTag, items: Vec<Node>) -> Node {
    node(NodeKind::ArrayLit {
        elem: Some(elem),
        items,
    })
}

pub fn record_lit(record: impl Into<Name>, fields: Vec<(&str, Node)>) -> Node {
    node(NodeKind::RecordLit {
        record: record.into(),
        fields: fields
            .into_iter()
            .map(|(name, value)| (name.to_string(), value))
            .collect(),
    })
}

pub fn var(name: impl Into<Name>) -> Node {
    node(NodeKind::Var(name.into()))
}

pub fn index(target: Node, index: Node) -> Node {
    node(NodeKind::Index {
        target: Box::new(target),
        index: Box::new(index),
    })
}

pub fn field(target: Node, field: impl Into<Name>) -> Node {
    node(NodeKind::Field {
        target: Box::new(target),
        field: field.into(),
    })
}

pub fn binary(op: BinaryOp, lhs: Node, rhs: Node) -> Node {
    node(NodeKind::Binary {
        op,
        lhs: Box::new(lhs),
        rhs: Box::new(rhs),
    })
}

pub fn logical(op: LogicalOp, lhs: Node, rhs: Node) -> Node {
    node(NodeKind::Logical {
        op,
        lhs: Box::new(lhs),
        rhs: Box::new(rhs),
    })
}

pub fn unary(op: UnaryOp, operand: Node) -> Node {
    node(NodeKind::Unary {
        op,
        operand: Box::new(operand),
    })
}

pub fn cast(target: TypeTag, operand: Node) -> Node {
    node(NodeKind::Cast {
        target,
        operand: Box::new(operand),
    })
}

pub fn call(name: impl Into<Name>, args: Vec<Node>) -> Node {
    node(NodeKind::Call {
        name: name.into(),
        args,
    })
}

pub fn assign(target: Node, value: Node) -> Node {
    node(NodeKind::Assign {
        target: Box::new(target),
        value: Box::new(value),
    })
}

pub fn compound_assign(op: BinaryOp, target: Node, value: Node) -> Node {
    node(NodeKind::CompoundAssign {
        op,
        target: Box::new(target),
        value: Box::new(value),
    })
}

pub fn increment(target: Node) -> Node {
    node(NodeKind::IncDec {
        op: IncDecOp::Increment,
        target: Box::new(target),
    })
}

pub fn decrement(target: Node) -> Node {
    node(NodeKind::IncDec {
        op: IncDecOp::Decrement,
        target: Box::new(target),
    })
}

pub fn seq(stmts: Vec<Node>) -> Node {
    node(NodeKind::Seq(stmts))
}

/// A scoped block around `stmts`.
pub fn block(stmts: Vec<Node>) -> Node {
    node(NodeKind::Block(Box::new(seq(stmts))))
}

pub fn print(value: Node) -> Node {
    node(NodeKind::Print(Box::new(value)))
}

pub fn println(value: Option<Node>) -> Node {
    node(NodeKind::Println(value.map(Box::new)))
}

pub fn var_decl(name: impl Into<Name>, ty: TypeTag, init: Option<Node>) -> Node {
    node(NodeKind::VarDecl {
        name: name.into(),
        ty,
        record: None,
        init: init.map(Box::new),
    })
}

pub fn record_decl(name: impl Into<Name>, record: impl Into<Name>, init: Option<Node>) -> Node {
    node(NodeKind::VarDecl {
        name: name.into(),
        ty: TypeTag::Record,
        record: Some(record.into()),
        init: init.map(Box::new),
    })
}

pub fn array_decl(name: impl Into<Name>, elem: TypeTag, dims: Vec<Node>) -> Node {
    node(NodeKind::ArrayDecl {
        name: name.into(),
        elem,
        dims,
    })
}

pub fn field_decl(name: impl Into<Name>, ty: TypeTag, default: Option<Node>) -> FieldDecl {
    FieldDecl {
        name: name.into(),
        ty,
        default,
    }
}

pub fn record_def(name: impl Into<Name>, fields: Vec<FieldDecl>) -> Node {
    node(NodeKind::RecordDef {
        name: name.into(),
        fields,
    })
}

pub fn if_then(cond: Node, then_branch: Node) -> Node {
    node(NodeKind::If {
        cond: Box::new(cond),
        then_branch: Box::new(then_branch),
        else_branch: None,
    })
}

pub fn if_else(cond: Node, then_branch: Node, else_branch: Node) -> Node {
    node(NodeKind::If {
        cond: Box::new(cond),
        then_branch: Box::new(then_branch),
        else_branch: Some(Box::new(else_branch)),
    })
}

pub fn for_loop(init: Node, cond: Node, step: Node, body: Node) -> Node {
    node(NodeKind::For {
        init: Box::new(init),
        cond: Box::new(cond),
        step: Box::new(step),
        body: Box::new(body),
    })
}

pub fn while_loop(cond: Node, body: Node) -> Node {
    node(NodeKind::While {
        cond: Box::new(cond),
        body: Box::new(body),
    })
}

pub fn break_stmt() -> Node {
    node(NodeKind::Break)
}

pub fn continue_stmt() -> Node {
    node(NodeKind::Continue)
}

pub fn return_stmt(value: Option<Node>) -> Node {
    node(NodeKind::Return(value.map(Box::new)))
}

pub fn param(name: impl Into<Name>, ty: TypeTag) -> Param {
    Param {
        name: name.into(),
        ty,
        record: None,
    }
}

pub fn record_param(name: impl Into<Name>, record: impl Into<Name>) -> Param {
    Param {
        name: name.into(),
        ty: TypeTag::Record,
        record: Some(record.into()),
    }
}

pub fn func_def(name: impl Into<Name>, params: Vec<Param>, ret: TypeTag, body: Node) -> Node {
    node(NodeKind::FuncDef(Box::new(FuncDef {
        name: name.into(),
        params,
        ret,
        body,
    })))
}
