//! Expression evaluation.
//!
//! Every reference value an expression produces is pinned before it is
//! returned, so a parent expression can hold it across further evaluation
//! (and across calls that run statements) without it being collected.

use puer_ir::{BinaryOp, LogicalOp, Name, Node, NodeKind, TypeTag};
use puer_value::errors::{
    index_out_of_bounds, malformed_node, record_mismatch, type_mismatch, EvalError,
};
use puer_value::{cast_to, implicit_convert, EvalResult, GcRef, Value};

use crate::operators::{evaluate_binary, evaluate_unary};
use crate::stack::ensure_sufficient_stack;
use crate::Interpreter;

/// Bounds-check `index` against a container of `len` items.
pub(crate) fn checked_index(index: i64, len: usize) -> Result<usize, EvalError> {
    usize::try_from(index)
        .ok()
        .filter(|i| *i < len)
        .ok_or_else(|| index_out_of_bounds(index, len))
}

impl<'a> Interpreter<'a> {
    /// Evaluate an expression. Errors without a position pick up this
    /// node's.
    pub(crate) fn eval_expr(&mut self, node: &'a Node) -> EvalResult {
        let value =
            ensure_sufficient_stack(|| self.eval_expr_inner(node)).map_err(|e| e.or_at(node.pos))?;
        self.pin(value);
        Ok(value)
    }

    fn eval_expr_inner(&mut self, node: &'a Node) -> EvalResult {
        match &node.kind {
            NodeKind::Int(v) => Ok(Value::Int(*v)),
            NodeKind::UInt(v) => Ok(Value::UInt(*v)),
            NodeKind::Long(v) => Ok(Value::Long(*v)),
            NodeKind::Float(v) => Ok(Value::Float(*v)),
            NodeKind::Bool(v) => Ok(Value::Bool(*v)),
            NodeKind::Char(c) => Ok(Value::Int(i32::from(*c))),
            NodeKind::Str(s) => self.heap.alloc_string(s.as_bytes()),
            NodeKind::ArrayLit { elem, items } => self.eval_array_lit(*elem, items),
            NodeKind::RecordLit { record, fields } => self.eval_record_lit(record, fields),

            NodeKind::Var(name) => self.env.get(&self.heap, name),
            NodeKind::Index { target, index } => {
                let container = self.eval_expr(target)?;
                let index = self.eval_index(index)?;
                self.read_index(container, index)
            }
            NodeKind::Field { target, field } => {
                let record = self.eval_expr(target)?;
                self.read_field(record, field)
            }

            NodeKind::Binary { op, lhs, rhs } => {
                let lhs = self.eval_expr(lhs)?;
                let rhs = self.eval_expr(rhs)?;
                self.apply_binary(*op, lhs, rhs)
            }
            NodeKind::Logical { op, lhs, rhs } => {
                let lhs = self.eval_condition(lhs)?;
                let result = match (*op, lhs) {
                    (LogicalOp::And, false) => false,
                    (LogicalOp::Or, true) => true,
                    _ => self.eval_condition(rhs)?,
                };
                Ok(Value::Bool(result))
            }
            NodeKind::Unary { op, operand } => {
                let value = self.eval_expr(operand)?;
                evaluate_unary(*op, value)
            }
            NodeKind::Cast { target, operand } => {
                let value = self.eval_expr(operand)?;
                cast_to(value, *target)
            }
            NodeKind::Call { name, args } => self.eval_call(name, args),

            NodeKind::Assign { target, value } => {
                let value = self.eval_expr(value)?;
                let place = self.resolve_place(target)?;
                self.store(&place, value)
            }
            NodeKind::CompoundAssign { op, target, value } => {
                let place = self.resolve_place(target)?;
                let current = self.load(&place)?;
                // The right-hand side may rebind the target and collect.
                self.pin(current);
                let rhs = self.eval_expr(value)?;
                let result = self.apply_binary(*op, current, rhs)?;
                self.store(&place, result)
            }
            NodeKind::IncDec { op, target } => {
                let place = self.resolve_place(target)?;
                let current = self.load(&place)?;
                let result = evaluate_binary(op.binary_op(), current, Value::Int(1))?;
                self.store(&place, result)
            }

            NodeKind::Nop
            | NodeKind::Seq(_)
            | NodeKind::Block(_)
            | NodeKind::Print(_)
            | NodeKind::Println(_)
            | NodeKind::VarDecl { .. }
            | NodeKind::ArrayDecl { .. }
            | NodeKind::RecordDef { .. }
            | NodeKind::If { .. }
            | NodeKind::For { .. }
            | NodeKind::While { .. }
            | NodeKind::Break
            | NodeKind::Continue
            | NodeKind::Return(_)
            | NodeKind::FuncDef(_) => Err(malformed_node(format!(
                "{} used as an expression",
                node.kind.name()
            ))),
        }
    }

    /// `+` on two strings concatenates; everything else goes through the
    /// operator table.
    pub(crate) fn apply_binary(&mut self, op: BinaryOp, lhs: Value, rhs: Value) -> EvalResult {
        if let (BinaryOp::Add, Value::Str(a), Value::Str(b)) = (op, lhs, rhs) {
            let mut bytes = self.heap.string(a)?.bytes.clone();
            bytes.extend_from_slice(&self.heap.string(b)?.bytes);
            return self.heap.alloc_string(bytes);
        }
        evaluate_binary(op, lhs, rhs)
    }

    /// Evaluate an index expression to an integer.
    pub(crate) fn eval_index(&mut self, index: &'a Node) -> Result<i64, EvalError> {
        let value = self.eval_expr(index)?;
        value.as_index().ok_or_else(|| {
            type_mismatch("array index", TypeTag::Int, value.type_tag()).or_at(index.pos)
        })
    }

    /// `container[index]`: an array element, or a string byte as an `int`.
    fn read_index(&self, container: Value, index: i64) -> EvalResult {
        match container {
            Value::Array(r) => {
                let array = self.heap.array(r)?;
                let i = checked_index(index, array.len())?;
                Ok(array.items[i])
            }
            Value::Str(r) => {
                let string = self.heap.string(r)?;
                let i = checked_index(index, string.len())?;
                Ok(Value::Int(i32::from(string.bytes[i])))
            }
            other => Err(type_mismatch("indexing", TypeTag::Array, other.type_tag())),
        }
    }

    fn read_field(&self, record: Value, field: &str) -> EvalResult {
        let (r, index) = self.field_slot(record, field)?;
        Ok(self.heap.record(r)?.fields[index])
    }

    /// Handle and field position for `record.field`.
    pub(crate) fn field_slot(&self, record: Value, field: &str) -> Result<(GcRef, usize), EvalError> {
        let Value::Record(r) = record else {
            return Err(type_mismatch("field access", TypeTag::Record, record.type_tag()));
        };
        let def = self.records.get(self.heap.record(r)?.def)?;
        Ok((r, def.field_index(field)?))
    }

    /// Check that `value` is a record, of schema `expected` if given.
    pub(crate) fn check_record(
        &self,
        value: Value,
        expected: Option<&str>,
        context: impl FnOnce() -> String,
    ) -> Result<(), EvalError> {
        let Value::Record(r) = value else {
            return Err(type_mismatch(context(), TypeTag::Record, value.type_tag()));
        };
        if let Some(expected) = expected {
            let def = self.records.get(self.heap.record(r)?.def)?;
            if def.name != expected {
                return Err(record_mismatch(context(), expected, &def.name));
            }
        }
        Ok(())
    }

    /// Fresh instance of `record` holding copies of its defaults. String and
    /// array defaults are deep-copied so instances never share them.
    pub(crate) fn instantiate_record(&mut self, record: &str) -> EvalResult {
        let id = self.records.lookup(record)?;
        let defaults = self.records.get(id)?.defaults.clone();
        let mut fields = Vec::with_capacity(defaults.len());
        for value in defaults {
            fields.push(self.heap.clone_value(value)?);
        }
        self.heap.alloc_record(id, fields)
    }

    fn eval_array_lit(&mut self, elem: Option<TypeTag>, items: &'a [Node]) -> EvalResult {
        let mut values = Vec::with_capacity(items.len());
        for item in items {
            values.push(self.eval_expr(item)?);
        }
        let elem = match (elem, values.first()) {
            (Some(elem), _) => elem,
            (None, Some(first)) => first.type_tag(),
            (None, None) => {
                return Err(malformed_node("empty array literal without an element type"))
            }
        };
        for (value, item) in values.iter_mut().zip(items) {
            let converted = implicit_convert(*value, elem).ok_or_else(|| {
                type_mismatch("array element", elem, value.type_tag()).or_at(item.pos)
            })?;
            *value = converted;
        }
        if let Some(Value::Array(first)) = values.first().copied() {
            for (value, item) in values.iter().zip(items).skip(1) {
                let Value::Array(row) = *value else { continue };
                if let Some((expected, got)) = self.heap.array_shape_mismatch(first, row)? {
                    return Err(type_mismatch("array element", expected, got).or_at(item.pos));
                }
            }
        }
        self.heap.alloc_array(elem, values)
    }

    /// `Name { field = expr, ... }`: an instance with the listed fields
    /// overwritten.
    fn eval_record_lit(&mut self, record: &str, fields: &'a [(Name, Node)]) -> EvalResult {
        let instance = self.instantiate_record(record)?;
        self.pin(instance);
        for (field, expr) in fields {
            let value = self.eval_expr(expr)?;
            let (r, index) = self.field_slot(instance, field)?;
            self.store_field(r, index, value)
                .map_err(|e| e.or_at(expr.pos))?;
        }
        Ok(instance)
    }
}
