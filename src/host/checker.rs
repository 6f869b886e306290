use std::collections::HashMap;
use std::mem;

use log::debug;

use crate::analysis::{Diagnostic, DiagnosticCollector};
use crate::host::TypeChecker;
use crate::host::symbols::{FunctionSymbol, ScopeId, Symbol, SymbolTable, VariableSymbol};
use crate::parser::ast::*;
use crate::types::{TypeFlags, TypeInfo};

/// Types and diagnostics computed for one file
#[derive(Debug, Clone)]
pub struct CheckedFile {
    file_name: String,
    declaration_types: HashMap<usize, TypeInfo>, // keyed by name start
    diagnostics: Vec<Diagnostic>,
}

impl CheckedFile {
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Type of the declaration whose name starts at `name_start`
    pub fn declaration_type(&self, name_start: usize) -> Option<&TypeInfo> {
        self.declaration_types.get(&name_start)
    }
}

impl TypeChecker for CheckedFile {
    fn type_at_location(&self, file: &SourceFile, declaration: &VariableDeclaration) -> Option<TypeInfo> {
        if file.file_name != self.file_name {
            return None;
        }
        self.declaration_types.get(&declaration.name.range.start).cloned()
    }
}

struct FunctionFrame {
    declared: Option<TypeInfo>,
    returns: Vec<TypeInfo>,
}

/// Single-file type checker.
///
/// Functions are hoisted per statement list. Unannotated return types are
/// inferred by checking the body speculatively first, with diagnostics
/// suppressed, so every error is reported once from the real pass.
pub struct Checker {
    symbols: SymbolTable,
    current_scope: ScopeId,
    function_scope: ScopeId,
    diagnostics: DiagnosticCollector,
    declaration_types: HashMap<usize, TypeInfo>,
    frames: Vec<FunctionFrame>,
    speculative: usize,
}

impl Checker {
    fn new(file_name: &str) -> Self {
        let symbols = SymbolTable::new();
        let file_scope = symbols.file_scope();
        Self {
            symbols,
            current_scope: file_scope,
            function_scope: file_scope,
            diagnostics: DiagnosticCollector::new(file_name),
            declaration_types: HashMap::new(),
            frames: Vec::new(),
            speculative: 0,
        }
    }

    pub fn check(file: &SourceFile) -> CheckedFile {
        let mut checker = Checker::new(&file.file_name);
        checker.check_statements(&file.statements);

        let diagnostics = checker.diagnostics.into_diagnostics();
        debug!(
            "checked {}: {} declaration(s) typed, {} diagnostic(s)",
            file.file_name,
            checker.declaration_types.len(),
            diagnostics.len()
        );

        CheckedFile {
            file_name: file.file_name.clone(),
            declaration_types: checker.declaration_types,
            diagnostics,
        }
    }

    fn report(&mut self, code: u32, message: String, range: TextRange) {
        if self.speculative > 0 {
            return;
        }
        let duplicate = self
            .diagnostics
            .diagnostics()
            .iter()
            .any(|d| d.code == code && d.start == range.start);
        if !duplicate {
            self.diagnostics.report_error(None, code, message, range);
        }
    }

    /// Conflicting declarations are reported at both names
    fn report_redeclaration(&mut self, code: u32, message: String, existing: &Symbol, range: TextRange) {
        self.report(code, message.clone(), existing.range());
        self.report(code, message, range);
    }

    fn enter_scope(&mut self) {
        self.current_scope = self.symbols.create_scope(Some(self.current_scope));
    }

    fn exit_scope(&mut self) {
        if let Some(parent) = self.symbols.get_parent_scope(self.current_scope) {
            self.current_scope = parent;
        }
    }

    fn lookup(&self, name: &str) -> Option<Symbol> {
        self.symbols
            .lookup_symbol(self.current_scope, name)
            .cloned()
            .or_else(|| ambient_symbol(name))
    }

    fn check_statements(&mut self, statements: &[Statement]) {
        self.hoist_functions(statements);
        for statement in statements {
            self.check_statement(statement);
        }
    }

    fn hoist_functions(&mut self, statements: &[Statement]) {
        let functions: Vec<&FunctionDeclaration> = statements
            .iter()
            .filter_map(|s| match s {
                Statement::Function(func) => Some(func),
                _ => None,
            })
            .collect();

        // Declare everything first so bodies can call each other
        for func in &functions {
            let return_type = func
                .return_type
                .as_ref()
                .map_or_else(TypeInfo::any, |ty| self.type_from_node(ty));
            self.declare_function(func, return_type);
        }

        for func in functions.iter().filter(|f| f.return_type.is_none()) {
            self.speculative += 1;
            let inferred = self.check_function_body(func, None);
            self.speculative -= 1;

            self.symbols.replace_symbol(
                self.current_scope,
                &func.name.text,
                Symbol::Function(FunctionSymbol {
                    return_type: inferred,
                    arity: Some(func.parameters.len()),
                    range: func.name.range,
                }),
            );
        }
    }

    fn declare_function(&mut self, func: &FunctionDeclaration, return_type: TypeInfo) {
        let symbol = Symbol::Function(FunctionSymbol {
            return_type,
            arity: Some(func.parameters.len()),
            range: func.name.range,
        });
        match self.symbols.add_symbol(self.current_scope, &func.name.text, symbol) {
            Ok(()) => {}
            Err(existing @ Symbol::Function(_)) => self.report_redeclaration(
                2393,
                "Duplicate function implementation.".to_string(),
                &existing,
                func.name.range,
            ),
            Err(existing @ Symbol::Variable(_)) => self.report_redeclaration(
                2300,
                format!("Duplicate identifier '{}'.", func.name.text),
                &existing,
                func.name.range,
            ),
        }
    }

    fn check_statement(&mut self, statement: &Statement) {
        match statement {
            Statement::Variable(var_stmt) => self.check_declaration_list(&var_stmt.list),
            Statement::Function(func) => {
                let declared = func.return_type.as_ref().map(|ty| self.resolve_annotation(ty));
                self.check_function_body(func, declared);
            }
            Statement::Block(block) => {
                self.enter_scope();
                self.check_statements(&block.statements);
                self.exit_scope();
            }
            Statement::If(if_stmt) => {
                self.type_of_expression(&if_stmt.condition);
                self.check_statement(&if_stmt.then_branch);
                if let Some(else_branch) = &if_stmt.else_branch {
                    self.check_statement(else_branch);
                }
            }
            Statement::While(while_stmt) => {
                self.type_of_expression(&while_stmt.condition);
                self.check_statement(&while_stmt.body);
            }
            Statement::For(for_stmt) => {
                self.enter_scope();
                match &for_stmt.initializer {
                    Some(ForInitializer::Variables(list)) => self.check_declaration_list(list),
                    Some(ForInitializer::Expression(expr)) => {
                        self.type_of_expression(expr);
                    }
                    None => {}
                }
                if let Some(condition) = &for_stmt.condition {
                    self.type_of_expression(condition);
                }
                if let Some(update) = &for_stmt.update {
                    self.type_of_expression(update);
                }
                self.check_statement(&for_stmt.body);
                self.exit_scope();
            }
            Statement::Return(ret) => self.check_return(ret),
            Statement::Expression(expr_stmt) => {
                self.type_of_expression(&expr_stmt.expression);
            }
        }
    }

    /// Checks parameters and body in a fresh function scope and returns the
    /// union of the returned types, `void` when nothing is returned
    fn check_function_body(&mut self, func: &FunctionDeclaration, declared: Option<TypeInfo>) -> TypeInfo {
        self.enter_scope();
        let outer_function_scope = mem::replace(&mut self.function_scope, self.current_scope);

        for param in &func.parameters {
            let ty = param
                .type_annotation
                .as_ref()
                .map_or_else(TypeInfo::any, |ty| self.resolve_annotation(ty));
            let symbol = Symbol::Variable(VariableSymbol {
                ty,
                kind: None,
                range: param.name.range,
            });
            if let Err(existing) = self.symbols.add_symbol(self.current_scope, &param.name.text, symbol) {
                self.report_redeclaration(
                    2300,
                    format!("Duplicate identifier '{}'.", param.name.text),
                    &existing,
                    param.name.range,
                );
            }
        }

        self.frames.push(FunctionFrame {
            declared,
            returns: Vec::new(),
        });
        self.check_statements(&func.body.statements);
        let frame = self.frames.pop();

        self.function_scope = outer_function_scope;
        self.exit_scope();

        let Some(frame) = frame else {
            return TypeInfo::void();
        };

        if let (Some(declared), Some(annotation)) = (&frame.declared, &func.return_type) {
            let returns_nothing = declared
                .flags
                .intersects(TypeFlags::ANY | TypeFlags::UNKNOWN | TypeFlags::VOID | TypeFlags::UNDEFINED);
            if frame.returns.is_empty() && !returns_nothing {
                self.report(
                    2355,
                    "A function whose declared type is neither 'undefined', 'void', nor 'any' must return a value."
                        .to_string(),
                    annotation.range(),
                );
            }
        }

        if frame.returns.is_empty() {
            TypeInfo::void()
        } else {
            TypeInfo::union(frame.returns.iter().map(TypeInfo::widened))
        }
    }

    fn check_return(&mut self, ret: &ReturnStatement) {
        let ty = match &ret.value {
            Some(value) => self.type_of_expression(value),
            None => Some(TypeInfo::void()),
        };

        let Some(frame) = self.frames.last() else {
            self.report(
                1108,
                "A 'return' statement can only be used within a function body.".to_string(),
                ret.range,
            );
            return;
        };

        if let (Some(value), Some(ty), Some(declared)) = (&ret.value, &ty, frame.declared.clone()) {
            if !is_assignable(ty, &declared) {
                self.report(2322, not_assignable_message(ty, &declared), value.range());
            }
        }

        if let Some(frame) = self.frames.last_mut() {
            frame.returns.push(ty.unwrap_or_else(TypeInfo::any));
        }
    }

    fn check_declaration_list(&mut self, list: &VariableDeclarationList) {
        for decl in &list.declarations {
            self.check_variable_declaration(decl);
        }
    }

    fn check_variable_declaration(&mut self, decl: &VariableDeclaration) {
        let annotation = decl.type_annotation.as_ref().map(|ty| self.resolve_annotation(ty));
        let initializer = decl.initializer.as_ref().map(|init| self.type_of_expression(init));

        let declared = match (annotation, initializer) {
            (Some(annotated), initializer) => {
                if let Some(Some(init)) = initializer {
                    if !is_assignable(&init, &annotated) {
                        self.report(2322, not_assignable_message(&init, &annotated), decl.name.range);
                    }
                }
                Some(annotated)
            }
            (None, Some(Some(init))) if decl.kind == DeclarationKind::Const => Some(init),
            (None, Some(Some(init))) => Some(init.widened()),
            // the initializer did not resolve
            (None, Some(None)) => None,
            (None, None) => Some(TypeInfo::any()),
        };

        if self.speculative == 0 {
            if let Some(ty) = &declared {
                self.declaration_types.insert(decl.name.range.start, ty.clone());
            }
        }

        self.declare_variable(decl, declared.unwrap_or_else(TypeInfo::any));
    }

    fn declare_variable(&mut self, decl: &VariableDeclaration, ty: TypeInfo) {
        let scope = if decl.kind.is_block_scoped() {
            self.current_scope
        } else {
            self.function_scope
        };
        let name = &decl.name.text;
        let symbol = Symbol::Variable(VariableSymbol {
            ty,
            kind: Some(decl.kind),
            range: decl.name.range,
        });

        match self.symbols.add_symbol(scope, name, symbol.clone()) {
            Ok(()) => {}
            // `var` may be redeclared over another `var` or a parameter
            Err(Symbol::Variable(existing))
                if decl.kind == DeclarationKind::Var
                    && matches!(existing.kind, None | Some(DeclarationKind::Var)) =>
            {
                self.symbols.replace_symbol(scope, name, symbol);
            }
            Err(existing @ (Symbol::Variable(VariableSymbol { kind: None, .. }) | Symbol::Function(_))) => {
                self.report_redeclaration(
                    2300,
                    format!("Duplicate identifier '{name}'."),
                    &existing,
                    decl.name.range,
                );
            }
            Err(existing) => {
                self.report_redeclaration(
                    2451,
                    format!("Cannot redeclare block-scoped variable '{name}'."),
                    &existing,
                    decl.name.range,
                );
            }
        }
    }

    /// Resolves an annotation, reporting names that do not denote a type
    fn resolve_annotation(&mut self, node: &TypeNode) -> TypeInfo {
        self.check_type_references(node);
        self.type_from_node(node)
    }

    fn check_type_references(&mut self, node: &TypeNode) {
        match node {
            TypeNode::Keyword { .. } | TypeNode::Literal { .. } => {}
            TypeNode::Reference(name) => {
                if !is_ambient_type(&name.text) {
                    self.report(2304, format!("Cannot find name '{}'.", name.text), name.range);
                }
            }
            TypeNode::Array { element, .. } => self.check_type_references(element),
            TypeNode::Union { types, .. } => {
                for ty in types {
                    self.check_type_references(ty);
                }
            }
        }
    }

    fn type_from_node(&self, node: &TypeNode) -> TypeInfo {
        match node {
            TypeNode::Keyword { keyword, .. } => match keyword {
                TypeKeyword::Boolean => TypeInfo::boolean(),
                TypeKeyword::Number => TypeInfo::number(),
                TypeKeyword::String => TypeInfo::string(),
                TypeKeyword::Any => TypeInfo::any(),
                TypeKeyword::Unknown => TypeInfo::unknown(),
                TypeKeyword::Void => TypeInfo::void(),
                TypeKeyword::Never => TypeInfo::never(),
                TypeKeyword::Object => TypeInfo::object("object"),
                TypeKeyword::Null => TypeInfo::null(),
                TypeKeyword::Undefined => TypeInfo::undefined(),
            },
            TypeNode::Literal { value, .. } => TypeInfo::boolean_literal(*value),
            TypeNode::Reference(name) if is_ambient_type(&name.text) => TypeInfo::object(name.text.as_str()),
            TypeNode::Reference(_) => TypeInfo::any(),
            TypeNode::Array { element, .. } => TypeInfo::array_of(&self.type_from_node(element)),
            TypeNode::Union { types, .. } => TypeInfo::union(types.iter().map(|t| self.type_from_node(t))),
        }
    }

    /// Type of an expression, `None` when it depends on a name that could
    /// not be resolved
    fn type_of_expression(&mut self, expr: &Expression) -> Option<TypeInfo> {
        match expr {
            Expression::NumericLiteral { value, .. } => Some(TypeInfo::number_literal(*value)),
            Expression::StringLiteral { value, .. } => Some(TypeInfo::string_literal(value)),
            Expression::BooleanLiteral { value, .. } => Some(TypeInfo::boolean_literal(*value)),
            Expression::Null { .. } => Some(TypeInfo::null()),
            Expression::Identifier(name) => match self.lookup(&name.text) {
                Some(Symbol::Variable(var)) => Some(var.ty),
                Some(Symbol::Function(_)) => Some(TypeInfo::object("Function")),
                None => {
                    self.report(2304, format!("Cannot find name '{}'.", name.text), name.range);
                    None
                }
            },
            Expression::Binary {
                left,
                operator,
                right,
                range,
            } => {
                let left_ty = self.type_of_expression(left);
                let right_ty = self.type_of_expression(right);
                if operator.is_comparison() {
                    return Some(TypeInfo::boolean());
                }
                let (left_ty, right_ty) = (left_ty?, right_ty?);
                Some(self.binary_result(*operator, &left_ty, &right_ty, *range))
            }
            Expression::Unary {
                operator, operand, ..
            } => {
                let operand_ty = self.type_of_expression(operand);
                match operator {
                    UnaryOperator::Not => Some(TypeInfo::boolean()),
                    UnaryOperator::Negative => match operand.as_ref() {
                        Expression::NumericLiteral { value, .. } => Some(TypeInfo::number_literal(-value)),
                        _ => operand_ty.map(|_| TypeInfo::number()),
                    },
                    UnaryOperator::Positive => operand_ty.map(|_| TypeInfo::number()),
                }
            }
            Expression::TypeOf { operand, .. } => {
                self.type_of_expression(operand);
                Some(TypeInfo::string())
            }
            Expression::Assignment {
                target,
                operator,
                value,
                ..
            } => self.check_assignment(target, *operator, value),
            Expression::Conditional {
                condition,
                when_true,
                when_false,
                ..
            } => {
                self.type_of_expression(condition);
                let when_true = self.type_of_expression(when_true);
                let when_false = self.type_of_expression(when_false);
                Some(TypeInfo::union([when_true?, when_false?]))
            }
            Expression::Call {
                callee, arguments, ..
            } => {
                let result = match callee.as_ref() {
                    Expression::Identifier(name) => match self.lookup(&name.text) {
                        Some(Symbol::Function(func)) => {
                            if let Some(arity) = func.arity.filter(|&arity| arity != arguments.len()) {
                                self.report(
                                    2554,
                                    format!("Expected {arity} arguments, but got {}.", arguments.len()),
                                    expr.range(),
                                );
                            }
                            Some(func.return_type)
                        }
                        Some(Symbol::Variable(var)) => Some(self.call_result(&var.ty, callee.range())),
                        None => {
                            self.report(2304, format!("Cannot find name '{}'.", name.text), name.range);
                            None
                        }
                    },
                    other => self
                        .type_of_expression(other)
                        .map(|ty| self.call_result(&ty, other.range())),
                };
                for argument in arguments {
                    self.type_of_expression(argument);
                }
                result
            }
            Expression::PropertyAccess { object, name, .. } => {
                let object_ty = self.type_of_expression(object)?;
                if object_ty.is_any() {
                    return Some(TypeInfo::any());
                }
                let has_length = object_ty.flags.intersects(TypeFlags::STRING_LIKE)
                    || object_ty.array_element().is_some();
                if name.text == "length" && has_length {
                    return Some(TypeInfo::number());
                }
                self.report(
                    2339,
                    format!("Property '{}' does not exist on type '{}'.", name.text, object_ty),
                    name.range,
                );
                Some(TypeInfo::any())
            }
            Expression::ElementAccess { object, index, .. } => {
                let object_ty = self.type_of_expression(object);
                self.type_of_expression(index);
                let object_ty = object_ty?;
                if let Some(element) = object_ty.array_element() {
                    Some(element)
                } else if object_ty.flags.intersects(TypeFlags::STRING_LIKE) {
                    Some(TypeInfo::string())
                } else {
                    Some(TypeInfo::any())
                }
            }
            Expression::Parenthesized { expression, .. } => self.type_of_expression(expression),
            Expression::ArrayLiteral { elements, .. } => {
                let mut element_types = Vec::with_capacity(elements.len());
                let mut resolved = true;
                for element in elements {
                    match self.type_of_expression(element) {
                        Some(ty) => element_types.push(ty.widened()),
                        None => resolved = false,
                    }
                }
                if !resolved {
                    return None;
                }
                let element = if element_types.is_empty() {
                    TypeInfo::any()
                } else {
                    TypeInfo::union(element_types)
                };
                Some(TypeInfo::array_of(&element))
            }
        }
    }

    fn call_result(&mut self, callee: &TypeInfo, range: TextRange) -> TypeInfo {
        if !callee.is_any() && callee.display != "Function" {
            self.report(2349, "This expression is not callable.".to_string(), range);
        }
        TypeInfo::any()
    }

    fn binary_result(
        &mut self,
        operator: BinaryOperator,
        left: &TypeInfo,
        right: &TypeInfo,
        range: TextRange,
    ) -> TypeInfo {
        match operator {
            BinaryOperator::And => TypeInfo::union([falsy_part(left), right.clone()]),
            BinaryOperator::Or => TypeInfo::union([truthy_part(left), right.clone()]),
            BinaryOperator::Coalesce => TypeInfo::union([left.non_nullable(), right.clone()]),
            BinaryOperator::Add => self.addition_result("+", left, right, range),
            _ => {
                if !is_numeric(left) {
                    self.report(
                        2362,
                        "The left-hand side of an arithmetic operation must be of type 'any', 'number', 'bigint' or an enum type."
                            .to_string(),
                        range,
                    );
                } else if !is_numeric(right) {
                    self.report(
                        2363,
                        "The right-hand side of an arithmetic operation must be of type 'any', 'number', 'bigint' or an enum type."
                            .to_string(),
                        range,
                    );
                }
                TypeInfo::number()
            }
        }
    }

    fn addition_result(&mut self, operator: &str, left: &TypeInfo, right: &TypeInfo, range: TextRange) -> TypeInfo {
        if left.is_any() || right.is_any() {
            TypeInfo::any()
        } else if is_string(left) || is_string(right) {
            TypeInfo::string()
        } else if is_numeric(left) && is_numeric(right) {
            TypeInfo::number()
        } else {
            self.report(
                2365,
                format!(
                    "Operator '{operator}' cannot be applied to types '{}' and '{}'.",
                    left.widened(),
                    right.widened()
                ),
                range,
            );
            TypeInfo::any()
        }
    }

    fn check_assignment(
        &mut self,
        target: &Expression,
        operator: AssignmentOperator,
        value: &Expression,
    ) -> Option<TypeInfo> {
        let target_ty = match target {
            Expression::Identifier(name) => match self.lookup(&name.text) {
                Some(Symbol::Variable(var)) if var.kind == Some(DeclarationKind::Const) => {
                    self.report(
                        2588,
                        format!("Cannot assign to '{}' because it is a constant.", name.text),
                        name.range,
                    );
                    None
                }
                Some(Symbol::Variable(var)) => Some(var.ty),
                Some(Symbol::Function(_)) => {
                    self.report(
                        2630,
                        format!("Cannot assign to '{}' because it is a function.", name.text),
                        name.range,
                    );
                    Some(TypeInfo::any())
                }
                None => {
                    self.report(2304, format!("Cannot find name '{}'.", name.text), name.range);
                    None
                }
            },
            other => self.type_of_expression(other),
        };
        let value_ty = self.type_of_expression(value)?;

        let assigned = match operator {
            AssignmentOperator::Simple => value_ty,
            AssignmentOperator::Add => {
                let current = target_ty.clone()?;
                self.addition_result("+=", &current, &value_ty, target.range().cover(value.range()))
            }
            AssignmentOperator::Subtract => {
                let current = target_ty.clone()?;
                if !is_numeric(&current) || !is_numeric(&value_ty) {
                    self.report(
                        2365,
                        format!(
                            "Operator '-=' cannot be applied to types '{}' and '{}'.",
                            current.widened(),
                            value_ty.widened()
                        ),
                        target.range().cover(value.range()),
                    );
                }
                TypeInfo::number()
            }
        };

        if let Some(target_ty) = &target_ty {
            if !is_assignable(&assigned, target_ty) {
                self.report(2322, not_assignable_message(&assigned, target_ty), target.range());
            }
        }
        Some(assigned)
    }
}

/// Whether a value of type `source` may be stored where `target` is expected
pub fn is_assignable(source: &TypeInfo, target: &TypeInfo) -> bool {
    if target.flags.intersects(TypeFlags::ANY | TypeFlags::UNKNOWN)
        || source.flags.intersects(TypeFlags::ANY | TypeFlags::NEVER)
    {
        return true;
    }
    if source.flags.contains(TypeFlags::UNION) {
        return source.members().iter().all(|member| is_assignable(member, target));
    }
    if target.flags.contains(TypeFlags::UNION) {
        return target.members().iter().any(|member| is_assignable(source, member));
    }
    if source == target || source.widened() == *target {
        return true;
    }
    if target.flags.contains(TypeFlags::VOID) {
        return source.flags.contains(TypeFlags::UNDEFINED);
    }
    if let (Some(source_element), Some(target_element)) = (source.array_element(), target.array_element()) {
        return is_assignable(&source_element, &target_element);
    }
    if !target.flags.contains(TypeFlags::OBJECT) {
        return false;
    }
    match target.display.as_str() {
        "Boolean" => source.flags.intersects(TypeFlags::BOOLEAN_LIKE),
        "Number" => source.flags.intersects(TypeFlags::NUMBER_LIKE),
        "String" => source.flags.intersects(TypeFlags::STRING_LIKE),
        "Object" => !source.flags.intersects(TypeFlags::NULLABLE | TypeFlags::VOID),
        "object" => source.flags.contains(TypeFlags::OBJECT),
        _ => false,
    }
}

fn not_assignable_message(source: &TypeInfo, target: &TypeInfo) -> String {
    let literal_target = target.members().iter().any(|member| {
        member
            .flags
            .intersects(TypeFlags::BOOLEAN_LITERAL | TypeFlags::NUMBER_LITERAL | TypeFlags::STRING_LITERAL)
    });
    let shown = if literal_target { source.clone() } else { source.widened() };
    format!("Type '{shown}' is not assignable to type '{target}'.")
}

fn is_numeric(ty: &TypeInfo) -> bool {
    ty.members()
        .iter()
        .all(|m| m.flags.intersects(TypeFlags::NUMBER_LIKE | TypeFlags::ANY))
}

fn is_string(ty: &TypeInfo) -> bool {
    ty.members().iter().all(|m| m.flags.intersects(TypeFlags::STRING_LIKE))
}

fn is_falsy_literal(ty: &TypeInfo) -> bool {
    matches!(ty.display.as_str(), "false" | "0" | "\"\"")
}

/// The part of `ty` a falsy value can have, the result of `ty && x` when
/// `ty` is falsy
fn falsy_part(ty: &TypeInfo) -> TypeInfo {
    TypeInfo::union(ty.members().into_iter().map(|member| {
        let flags = member.flags;
        if flags.intersects(TypeFlags::ANY | TypeFlags::UNKNOWN | TypeFlags::NULLABLE | TypeFlags::VOID) {
            member
        } else if flags.contains(TypeFlags::BOOLEAN) {
            TypeInfo::boolean_literal(false)
        } else if flags.contains(TypeFlags::NUMBER) {
            TypeInfo::number_literal(0.0)
        } else if flags.contains(TypeFlags::STRING) {
            TypeInfo::string_literal("")
        } else if is_falsy_literal(&member) {
            member
        } else {
            TypeInfo::never()
        }
    }))
}

/// `ty` without the members that are always falsy
fn truthy_part(ty: &TypeInfo) -> TypeInfo {
    TypeInfo::union(ty.members().into_iter().map(|member| {
        let flags = member.flags;
        if flags.intersects(TypeFlags::ANY | TypeFlags::UNKNOWN) {
            member
        } else if flags.contains(TypeFlags::BOOLEAN) {
            TypeInfo::boolean_literal(true)
        } else if flags.intersects(TypeFlags::NULLABLE | TypeFlags::VOID) || is_falsy_literal(&member) {
            TypeInfo::never()
        } else {
            member
        }
    }))
}

fn is_ambient_type(name: &str) -> bool {
    matches!(name, "Boolean" | "Number" | "String" | "Object" | "Function" | "Date")
}

/// Globals every script can see
fn ambient_symbol(name: &str) -> Option<Symbol> {
    let value = |ty: TypeInfo| {
        Symbol::Variable(VariableSymbol {
            ty,
            kind: Some(DeclarationKind::Var),
            range: TextRange::default(),
        })
    };
    let function = |return_type: TypeInfo| {
        Symbol::Function(FunctionSymbol {
            return_type,
            arity: None,
            range: TextRange::default(),
        })
    };

    match name {
        "console" | "Math" | "JSON" | "Object" | "Array" | "Date" => Some(value(TypeInfo::any())),
        "undefined" => Some(value(TypeInfo::undefined())),
        "NaN" | "Infinity" => Some(value(TypeInfo::number())),
        "parseInt" | "parseFloat" | "Number" => Some(function(TypeInfo::number())),
        "isNaN" | "isFinite" | "Boolean" => Some(function(TypeInfo::boolean())),
        "String" => Some(function(TypeInfo::string())),
        _ => None,
    }
}
