//! Statement evaluation.

use puer_ir::{FieldDecl, Name, Node, NodeKind, TypeTag};
use puer_value::errors::{
    invalid_array_size, malformed_node, missing_default, redeclaration, type_mismatch, EvalError,
};
use puer_value::{implicit_convert, EvalResult, RecordDef, Value};
use smallvec::SmallVec;

use super::ControlSignal;
use crate::stack::ensure_sufficient_stack;
use crate::Interpreter;

type StmtResult = Result<ControlSignal, EvalError>;

impl<'a> Interpreter<'a> {
    /// Evaluate a statement and report how control left it.
    ///
    /// Errors without a position pick up this node's.
    pub(crate) fn eval_stmt(&mut self, node: &'a Node) -> StmtResult {
        ensure_sufficient_stack(|| self.eval_stmt_inner(node)).map_err(|e| e.or_at(node.pos))
    }

    fn eval_stmt_inner(&mut self, node: &'a Node) -> StmtResult {
        match &node.kind {
            NodeKind::Nop => Ok(ControlSignal::None),
            NodeKind::Seq(stmts) => self.eval_seq(stmts),
            NodeKind::Block(inner) => {
                let mut scoped = self.scoped()?;
                scoped.eval_stmt(inner)
            }
            NodeKind::Print(value) => {
                let text = self.eval_to_text(value)?;
                self.print_handler.print(&text);
                Ok(ControlSignal::None)
            }
            NodeKind::Println(value) => {
                let text = match value {
                    Some(value) => self.eval_to_text(value)?,
                    None => String::new(),
                };
                self.print_handler.println(&text);
                Ok(ControlSignal::None)
            }
            NodeKind::VarDecl {
                name,
                ty,
                record,
                init,
            } => {
                self.eval_var_decl(name, *ty, record.as_deref(), init.as_deref())?;
                Ok(ControlSignal::None)
            }
            NodeKind::ArrayDecl { name, elem, dims } => {
                self.eval_array_decl(name, *elem, dims)?;
                Ok(ControlSignal::None)
            }
            NodeKind::RecordDef { name, fields } => {
                self.eval_record_def(name, fields)?;
                Ok(ControlSignal::None)
            }
            NodeKind::If {
                cond,
                then_branch,
                else_branch,
            } => {
                if self.eval_condition(cond)? {
                    self.eval_stmt(then_branch)
                } else if let Some(else_branch) = else_branch {
                    self.eval_stmt(else_branch)
                } else {
                    Ok(ControlSignal::None)
                }
            }
            NodeKind::For {
                init,
                cond,
                step,
                body,
            } => self.eval_for(init, cond, step, body),
            NodeKind::While { cond, body } => self.eval_while(cond, body),
            NodeKind::Break => Ok(ControlSignal::Break),
            NodeKind::Continue => Ok(ControlSignal::Continue),
            NodeKind::Return(value) => {
                let value = match value {
                    Some(expr) => self.eval_expr(expr)?,
                    None => Value::Void,
                };
                self.set_return(value);
                Ok(ControlSignal::Return)
            }
            NodeKind::FuncDef(def) => {
                self.functions.define(def)?;
                Ok(ControlSignal::None)
            }
            _ => {
                self.eval_expr(node)?;
                Ok(ControlSignal::None)
            }
        }
    }

    /// Statements in order. Temporaries pinned by a statement are released
    /// once it finishes, and the collector gets a step.
    fn eval_seq(&mut self, stmts: &'a [Node]) -> StmtResult {
        let mark = self.env.pin_mark();
        for stmt in stmts {
            let signal = self.eval_stmt(stmt)?;
            self.env.truncate_pins(mark);
            if self.config.gc.step_per_statement {
                self.gc_step();
            }
            if !signal.is_none() {
                return Ok(signal);
            }
        }
        Ok(ControlSignal::None)
    }

    fn eval_to_text(&mut self, expr: &'a Node) -> Result<String, EvalError> {
        let value = self.eval_expr(expr)?;
        self.format_value(value)
    }

    /// Evaluate a loop or branch condition. An empty condition (`for (;;)`)
    /// is true.
    pub(crate) fn eval_condition(&mut self, cond: &'a Node) -> Result<bool, EvalError> {
        if matches!(cond.kind, NodeKind::Nop) {
            return Ok(true);
        }
        self.eval_expr(cond)?.truthy().map_err(|e| e.or_at(cond.pos))
    }

    /// `init` runs in a scope of its own that lasts for the whole loop.
    /// `continue` still runs `step`.
    fn eval_for(
        &mut self,
        init: &'a Node,
        cond: &'a Node,
        step: &'a Node,
        body: &'a Node,
    ) -> StmtResult {
        let mut scoped = self.scoped()?;
        scoped.eval_stmt(init)?;
        let mark = scoped.env.pin_mark();
        loop {
            scoped.env.truncate_pins(mark);
            if !scoped.eval_condition(cond)? {
                break;
            }
            match scoped.eval_stmt(body)? {
                ControlSignal::Break => break,
                ControlSignal::Return => return Ok(ControlSignal::Return),
                ControlSignal::Continue | ControlSignal::None => {}
            }
            scoped.eval_stmt(step)?;
        }
        scoped.env.truncate_pins(mark);
        Ok(ControlSignal::None)
    }

    fn eval_while(&mut self, cond: &'a Node, body: &'a Node) -> StmtResult {
        let mark = self.env.pin_mark();
        loop {
            self.env.truncate_pins(mark);
            if !self.eval_condition(cond)? {
                break;
            }
            match self.eval_stmt(body)? {
                ControlSignal::Break => break,
                ControlSignal::Return => return Ok(ControlSignal::Return),
                ControlSignal::Continue | ControlSignal::None => {}
            }
        }
        self.env.truncate_pins(mark);
        Ok(ControlSignal::None)
    }

    fn ensure_undeclared(&self, name: &str) -> Result<(), EvalError> {
        if self.env.get_top(&self.heap, name)?.is_some() {
            return Err(redeclaration(name));
        }
        Ok(())
    }

    /// `T name [= init];`
    ///
    /// Without an initializer the variable gets its type's zero value, or a
    /// fresh instance for a record type.
    fn eval_var_decl(
        &mut self,
        name: &str,
        ty: TypeTag,
        record: Option<&str>,
        init: Option<&'a Node>,
    ) -> Result<(), EvalError> {
        self.ensure_undeclared(name)?;
        let value = match (init, ty) {
            (Some(expr), TypeTag::Record) => {
                let value = self.eval_expr(expr)?;
                self.check_record(value, record, || format!("initialization of '{name}'"))?;
                value
            }
            (Some(expr), _) => {
                let value = self.eval_expr(expr)?;
                implicit_convert(value, ty).ok_or_else(|| {
                    type_mismatch(
                        format!("initialization of '{name}'"),
                        ty,
                        value.type_tag(),
                    )
                })?
            }
            (None, TypeTag::Record) => {
                let record =
                    record.ok_or_else(|| malformed_node("record declaration without a type"))?;
                self.instantiate_record(record)?
            }
            (None, _) => self.heap.zero_value(ty)?,
        };
        self.declare(name, value)
    }

    /// `T name[d0][d1]...;` - nested arrays filled with zero values.
    fn eval_array_decl(
        &mut self,
        name: &str,
        elem: TypeTag,
        dims: &'a [Node],
    ) -> Result<(), EvalError> {
        self.ensure_undeclared(name)?;
        if dims.is_empty() {
            return Err(malformed_node("array declaration without dimensions"));
        }
        let mut sizes: SmallVec<[usize; 4]> = SmallVec::with_capacity(dims.len());
        for dim in dims {
            let value = self.eval_expr(dim)?;
            let size = value
                .as_index()
                .ok_or_else(|| type_mismatch("array size", TypeTag::Int, value.type_tag()))?;
            let size = usize::try_from(size).map_err(|_| invalid_array_size(size))?;
            sizes.push(size);
        }
        let array = self.zero_array(elem, &sizes)?;
        self.declare(name, array)
    }

    fn zero_array(&mut self, elem: TypeTag, sizes: &[usize]) -> EvalResult {
        match sizes {
            [] => Err(malformed_node("array declaration without dimensions")),
            [len] => {
                let mut items = Vec::with_capacity(*len);
                for _ in 0..*len {
                    items.push(self.heap.zero_value(elem)?);
                }
                self.heap.alloc_array(elem, items)
            }
            [len, rest @ ..] => {
                let mut items = Vec::with_capacity(*len);
                for _ in 0..*len {
                    items.push(self.zero_array(elem, rest)?);
                }
                self.heap.alloc_array(TypeTag::Array, items)
            }
        }
    }

    /// `record Name { fields }`: evaluate defaults once and register the
    /// schema. Defaults are roots from then on.
    fn eval_record_def(&mut self, name: &Name, fields: &'a [FieldDecl]) -> Result<(), EvalError> {
        if self.records.find(name).is_some() {
            return Err(redeclaration(name));
        }
        let mut entries: Vec<(Name, TypeTag, Value)> = Vec::with_capacity(fields.len());
        for field in fields {
            if entries.iter().any(|(seen, _, _)| *seen == field.name) {
                return Err(redeclaration(&field.name));
            }
            let value = self.field_default(name, field)?;
            self.pin(value);
            entries.push((field.name.clone(), field.ty, value));
        }
        let def = RecordDef::new(name.clone(), entries);
        for value in &def.defaults {
            self.heap.shade_value(*value);
        }
        self.records.register(def)?;
        Ok(())
    }

    fn field_default(&mut self, record: &str, field: &'a FieldDecl) -> EvalResult {
        let Some(expr) = &field.default else {
            return match field.ty {
                TypeTag::Array | TypeTag::Record | TypeTag::Void | TypeTag::Any => {
                    Err(missing_default(record, &field.name))
                }
                ty => self.heap.zero_value(ty),
            };
        };
        let value = self.eval_expr(expr)?;
        if field.ty == TypeTag::Record {
            self.check_record(value, None, || format!("default of field '{}'", field.name))?;
            return Ok(value);
        }
        implicit_convert(value, field.ty).ok_or_else(|| {
            type_mismatch(
                format!("default of field '{}'", field.name),
                field.ty,
                value.type_tag(),
            )
            .or_at(expr.pos)
        })
    }
}
