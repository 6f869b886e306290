use std::fmt;

/// A half-open byte range `start..end` into the source text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TextRange {
    pub start: usize,
    pub end: usize,
}

impl TextRange {
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end, "invalid range {start}..{end}");
        Self { start, end }
    }

    pub fn empty(offset: usize) -> Self {
        Self::new(offset, offset)
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Smallest range covering both `self` and `other`
    pub fn cover(self, other: TextRange) -> TextRange {
        TextRange::new(self.start.min(other.start), self.end.max(other.end))
    }

    pub fn contains_range(&self, other: TextRange) -> bool {
        self.start <= other.start && other.end <= self.end
    }
}

impl fmt::Display for TextRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// Tag identifying the shape of a node, independent of the borrowed data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SyntaxKind {
    SourceFile,
    VariableStatement,
    VariableDeclarationList,
    VariableDeclaration,
    FunctionDeclaration,
    Parameter,
    Block,
    IfStatement,
    WhileStatement,
    ForStatement,
    ReturnStatement,
    ExpressionStatement,
    Identifier,
    NumericLiteral,
    StringLiteral,
    TrueKeyword,
    FalseKeyword,
    NullKeyword,
    BinaryExpression,
    PrefixUnaryExpression,
    TypeOfExpression,
    AssignmentExpression,
    ConditionalExpression,
    CallExpression,
    PropertyAccessExpression,
    ElementAccessExpression,
    ParenthesizedExpression,
    ArrayLiteralExpression,
    KeywordType,
    LiteralType,
    TypeReference,
    ArrayType,
    UnionType,
}

/// The root of the tree for one parsed file
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub file_name: String,
    pub text: String,
    pub statements: Vec<Statement>,
}

impl SourceFile {
    pub fn range(&self) -> TextRange {
        TextRange::new(0, self.text.len())
    }

    /// Source text covered by `range`, empty when out of bounds
    pub fn slice(&self, range: TextRange) -> &str {
        self.text.get(range.start..range.end).unwrap_or_default()
    }
}

/// Borrowed view over every node type, in a single enum
#[derive(Debug, Clone, Copy)]
pub enum AstNode<'a> {
    SourceFile(&'a SourceFile),
    Statement(&'a Statement),
    VariableDeclarationList(&'a VariableDeclarationList),
    VariableDeclaration(&'a VariableDeclaration),
    Parameter(&'a Parameter),
    Block(&'a Block),
    Identifier(&'a Identifier),
    Expression(&'a Expression),
    Type(&'a TypeNode),
}

impl<'a> AstNode<'a> {
    pub fn kind(&self) -> SyntaxKind {
        match self {
            AstNode::SourceFile(_) => SyntaxKind::SourceFile,
            AstNode::Statement(stmt) => match stmt {
                Statement::Variable(_) => SyntaxKind::VariableStatement,
                Statement::Function(_) => SyntaxKind::FunctionDeclaration,
                Statement::Block(_) => SyntaxKind::Block,
                Statement::If(_) => SyntaxKind::IfStatement,
                Statement::While(_) => SyntaxKind::WhileStatement,
                Statement::For(_) => SyntaxKind::ForStatement,
                Statement::Return(_) => SyntaxKind::ReturnStatement,
                Statement::Expression(_) => SyntaxKind::ExpressionStatement,
            },
            AstNode::VariableDeclarationList(_) => SyntaxKind::VariableDeclarationList,
            AstNode::VariableDeclaration(_) => SyntaxKind::VariableDeclaration,
            AstNode::Parameter(_) => SyntaxKind::Parameter,
            AstNode::Block(_) => SyntaxKind::Block,
            AstNode::Identifier(_) => SyntaxKind::Identifier,
            AstNode::Expression(expr) => match expr {
                Expression::NumericLiteral { .. } => SyntaxKind::NumericLiteral,
                Expression::StringLiteral { .. } => SyntaxKind::StringLiteral,
                Expression::BooleanLiteral { value: true, .. } => SyntaxKind::TrueKeyword,
                Expression::BooleanLiteral { value: false, .. } => SyntaxKind::FalseKeyword,
                Expression::Null { .. } => SyntaxKind::NullKeyword,
                Expression::Identifier(_) => SyntaxKind::Identifier,
                Expression::Binary { .. } => SyntaxKind::BinaryExpression,
                Expression::Unary { .. } => SyntaxKind::PrefixUnaryExpression,
                Expression::TypeOf { .. } => SyntaxKind::TypeOfExpression,
                Expression::Assignment { .. } => SyntaxKind::AssignmentExpression,
                Expression::Conditional { .. } => SyntaxKind::ConditionalExpression,
                Expression::Call { .. } => SyntaxKind::CallExpression,
                Expression::PropertyAccess { .. } => SyntaxKind::PropertyAccessExpression,
                Expression::ElementAccess { .. } => SyntaxKind::ElementAccessExpression,
                Expression::Parenthesized { .. } => SyntaxKind::ParenthesizedExpression,
                Expression::ArrayLiteral { .. } => SyntaxKind::ArrayLiteralExpression,
            },
            AstNode::Type(ty) => match ty {
                TypeNode::Keyword { .. } => SyntaxKind::KeywordType,
                TypeNode::Literal { .. } => SyntaxKind::LiteralType,
                TypeNode::Reference(_) => SyntaxKind::TypeReference,
                TypeNode::Array { .. } => SyntaxKind::ArrayType,
                TypeNode::Union { .. } => SyntaxKind::UnionType,
            },
        }
    }

    pub fn range(&self) -> TextRange {
        match self {
            AstNode::SourceFile(file) => file.range(),
            AstNode::Statement(stmt) => stmt.range(),
            AstNode::VariableDeclarationList(list) => list.range,
            AstNode::VariableDeclaration(decl) => decl.range,
            AstNode::Parameter(param) => param.range,
            AstNode::Block(block) => block.range,
            AstNode::Identifier(ident) => ident.range,
            AstNode::Expression(expr) => expr.range(),
            AstNode::Type(ty) => ty.range(),
        }
    }

    /// Calls `f` on each direct child, in source order
    pub fn for_each_child<F: FnMut(AstNode<'a>)>(&self, mut f: F) {
        match *self {
            AstNode::SourceFile(file) => {
                file.statements.iter().for_each(|s| f(AstNode::Statement(s)));
            }
            AstNode::Statement(stmt) => match stmt {
                Statement::Variable(var_stmt) => {
                    f(AstNode::VariableDeclarationList(&var_stmt.list));
                }
                Statement::Function(func) => {
                    f(AstNode::Identifier(&func.name));
                    func.parameters.iter().for_each(|p| f(AstNode::Parameter(p)));
                    if let Some(ty) = &func.return_type {
                        f(AstNode::Type(ty));
                    }
                    f(AstNode::Block(&func.body));
                }
                Statement::Block(block) => {
                    block.statements.iter().for_each(|s| f(AstNode::Statement(s)));
                }
                Statement::If(if_stmt) => {
                    f(AstNode::Expression(&if_stmt.condition));
                    f(AstNode::Statement(&if_stmt.then_branch));
                    if let Some(else_branch) = &if_stmt.else_branch {
                        f(AstNode::Statement(else_branch));
                    }
                }
                Statement::While(while_stmt) => {
                    f(AstNode::Expression(&while_stmt.condition));
                    f(AstNode::Statement(&while_stmt.body));
                }
                Statement::For(for_stmt) => {
                    match &for_stmt.initializer {
                        Some(ForInitializer::Variables(list)) => {
                            f(AstNode::VariableDeclarationList(list))
                        }
                        Some(ForInitializer::Expression(expr)) => f(AstNode::Expression(expr)),
                        None => {}
                    }
                    if let Some(condition) = &for_stmt.condition {
                        f(AstNode::Expression(condition));
                    }
                    if let Some(update) = &for_stmt.update {
                        f(AstNode::Expression(update));
                    }
                    f(AstNode::Statement(&for_stmt.body));
                }
                Statement::Return(ret) => {
                    if let Some(value) = &ret.value {
                        f(AstNode::Expression(value));
                    }
                }
                Statement::Expression(expr_stmt) => f(AstNode::Expression(&expr_stmt.expression)),
            },
            AstNode::VariableDeclarationList(list) => {
                list.declarations
                    .iter()
                    .for_each(|d| f(AstNode::VariableDeclaration(d)));
            }
            AstNode::VariableDeclaration(decl) => {
                f(AstNode::Identifier(&decl.name));
                if let Some(ty) = &decl.type_annotation {
                    f(AstNode::Type(ty));
                }
                if let Some(init) = &decl.initializer {
                    f(AstNode::Expression(init));
                }
            }
            AstNode::Parameter(param) => {
                f(AstNode::Identifier(&param.name));
                if let Some(ty) = &param.type_annotation {
                    f(AstNode::Type(ty));
                }
            }
            AstNode::Block(block) => {
                block.statements.iter().for_each(|s| f(AstNode::Statement(s)));
            }
            AstNode::Identifier(_) => {}
            AstNode::Expression(expr) => match expr {
                Expression::NumericLiteral { .. }
                | Expression::StringLiteral { .. }
                | Expression::BooleanLiteral { .. }
                | Expression::Null { .. }
                | Expression::Identifier(_) => {}
                Expression::Binary { left, right, .. } => {
                    f(AstNode::Expression(left));
                    f(AstNode::Expression(right));
                }
                Expression::Unary { operand, .. } | Expression::TypeOf { operand, .. } => {
                    f(AstNode::Expression(operand))
                }
                Expression::Assignment { target, value, .. } => {
                    f(AstNode::Expression(target));
                    f(AstNode::Expression(value));
                }
                Expression::Conditional {
                    condition,
                    when_true,
                    when_false,
                    ..
                } => {
                    f(AstNode::Expression(condition));
                    f(AstNode::Expression(when_true));
                    f(AstNode::Expression(when_false));
                }
                Expression::Call {
                    callee, arguments, ..
                } => {
                    f(AstNode::Expression(callee));
                    arguments.iter().for_each(|a| f(AstNode::Expression(a)));
                }
                Expression::PropertyAccess { object, name, .. } => {
                    f(AstNode::Expression(object));
                    f(AstNode::Identifier(name));
                }
                Expression::ElementAccess { object, index, .. } => {
                    f(AstNode::Expression(object));
                    f(AstNode::Expression(index));
                }
                Expression::Parenthesized { expression, .. } => f(AstNode::Expression(expression)),
                Expression::ArrayLiteral { elements, .. } => {
                    elements.iter().for_each(|e| f(AstNode::Expression(e)));
                }
            },
            AstNode::Type(ty) => match ty {
                TypeNode::Keyword { .. } | TypeNode::Literal { .. } => {}
                TypeNode::Reference(name) => f(AstNode::Identifier(name)),
                TypeNode::Array { element, .. } => f(AstNode::Type(element)),
                TypeNode::Union { types, .. } => types.iter().for_each(|t| f(AstNode::Type(t))),
            },
        }
    }
}

/// A name token together with its position
#[derive(Debug, Clone, PartialEq)]
pub struct Identifier {
    pub text: String,
    pub range: TextRange,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclarationKind {
    Var,
    Let,
    Const,
}

impl DeclarationKind {
    pub fn is_block_scoped(&self) -> bool {
        !matches!(self, DeclarationKind::Var)
    }
}

/// Statements at file level or inside a `Block`
#[derive(Debug, Clone)]
pub enum Statement {
    Variable(VariableStatement),
    Function(FunctionDeclaration),
    Block(Block),
    If(IfStatement),
    While(WhileStatement),
    For(ForStatement),
    Return(ReturnStatement),
    Expression(ExpressionStatement),
}

impl Statement {
    pub fn range(&self) -> TextRange {
        match self {
            Statement::Variable(s) => s.range,
            Statement::Function(s) => s.range,
            Statement::Block(s) => s.range,
            Statement::If(s) => s.range,
            Statement::While(s) => s.range,
            Statement::For(s) => s.range,
            Statement::Return(s) => s.range,
            Statement::Expression(s) => s.range,
        }
    }
}

/// `let a = 1, b = 2;`
#[derive(Debug, Clone)]
pub struct VariableStatement {
    pub list: VariableDeclarationList,
    pub range: TextRange,
}

#[derive(Debug, Clone)]
pub struct VariableDeclarationList {
    pub kind: DeclarationKind,
    pub declarations: Vec<VariableDeclaration>,
    pub range: TextRange,
}

/// A single declarator; its range starts at the name
#[derive(Debug, Clone)]
pub struct VariableDeclaration {
    pub name: Identifier,
    pub kind: DeclarationKind,
    pub type_annotation: Option<TypeNode>,
    pub initializer: Option<Expression>,
    pub range: TextRange,
}

#[derive(Debug, Clone)]
pub struct FunctionDeclaration {
    pub name: Identifier,
    pub parameters: Vec<Parameter>,
    pub return_type: Option<TypeNode>,
    pub body: Block,
    pub range: TextRange,
}

#[derive(Debug, Clone)]
pub struct Parameter {
    pub name: Identifier,
    pub type_annotation: Option<TypeNode>,
    pub range: TextRange,
}

/// A block of statements with its own scope
#[derive(Debug, Clone)]
pub struct Block {
    pub statements: Vec<Statement>,
    pub range: TextRange,
}

#[derive(Debug, Clone)]
pub struct IfStatement {
    pub condition: Expression,
    pub then_branch: Box<Statement>,
    pub else_branch: Option<Box<Statement>>,
    pub range: TextRange,
}

#[derive(Debug, Clone)]
pub struct WhileStatement {
    pub condition: Expression,
    pub body: Box<Statement>,
    pub range: TextRange,
}

#[derive(Debug, Clone)]
pub enum ForInitializer {
    Variables(VariableDeclarationList),
    Expression(Expression),
}

#[derive(Debug, Clone)]
pub struct ForStatement {
    pub initializer: Option<ForInitializer>,
    pub condition: Option<Expression>,
    pub update: Option<Expression>,
    pub body: Box<Statement>,
    pub range: TextRange,
}

#[derive(Debug, Clone)]
pub struct ReturnStatement {
    pub value: Option<Expression>,
    pub range: TextRange,
}

#[derive(Debug, Clone)]
pub struct ExpressionStatement {
    pub expression: Expression,
    pub range: TextRange,
}

/// An expression
#[derive(Debug, Clone)]
pub enum Expression {
    NumericLiteral {
        value: f64,
        range: TextRange,
    },
    StringLiteral {
        value: String,
        range: TextRange,
    },
    BooleanLiteral {
        value: bool,
        range: TextRange,
    },
    Null {
        range: TextRange,
    },
    Identifier(Identifier),
    Binary {
        left: Box<Expression>,
        operator: BinaryOperator,
        right: Box<Expression>,
        range: TextRange,
    },
    Unary {
        operator: UnaryOperator,
        operand: Box<Expression>,
        range: TextRange,
    },
    TypeOf {
        operand: Box<Expression>,
        range: TextRange,
    },
    Assignment {
        target: Box<Expression>,
        operator: AssignmentOperator,
        value: Box<Expression>,
        range: TextRange,
    },
    Conditional {
        condition: Box<Expression>,
        when_true: Box<Expression>,
        when_false: Box<Expression>,
        range: TextRange,
    },
    Call {
        callee: Box<Expression>,
        arguments: Vec<Expression>,
        range: TextRange,
    },
    PropertyAccess {
        object: Box<Expression>,
        name: Identifier,
        range: TextRange,
    },
    ElementAccess {
        object: Box<Expression>,
        index: Box<Expression>,
        range: TextRange,
    },
    Parenthesized {
        expression: Box<Expression>,
        range: TextRange,
    },
    ArrayLiteral {
        elements: Vec<Expression>,
        range: TextRange,
    },
}

impl Expression {
    pub fn range(&self) -> TextRange {
        match self {
            Expression::NumericLiteral { range, .. }
            | Expression::StringLiteral { range, .. }
            | Expression::BooleanLiteral { range, .. }
            | Expression::Null { range }
            | Expression::Binary { range, .. }
            | Expression::Unary { range, .. }
            | Expression::TypeOf { range, .. }
            | Expression::Assignment { range, .. }
            | Expression::Conditional { range, .. }
            | Expression::Call { range, .. }
            | Expression::PropertyAccess { range, .. }
            | Expression::ElementAccess { range, .. }
            | Expression::Parenthesized { range, .. }
            | Expression::ArrayLiteral { range, .. } => *range,
            Expression::Identifier(ident) => ident.range,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    // Arithmetic
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,

    // Comparison
    Equal,
    NotEqual,
    StrictEqual,
    StrictNotEqual,
    LessThan,
    LessThanOrEqual,
    GreaterThan,
    GreaterThanOrEqual,

    // Logical
    And,
    Or,
    Coalesce,

    // Bitwise
    BitwiseAnd,
    BitwiseOr,
    BitwiseXor,
    LeftShift,
    RightShift,
}

impl BinaryOperator {
    pub fn is_comparison(&self) -> bool {
        matches!(
            self,
            BinaryOperator::Equal
                | BinaryOperator::NotEqual
                | BinaryOperator::StrictEqual
                | BinaryOperator::StrictNotEqual
                | BinaryOperator::LessThan
                | BinaryOperator::LessThanOrEqual
                | BinaryOperator::GreaterThan
                | BinaryOperator::GreaterThanOrEqual
        )
    }

    pub fn is_logical(&self) -> bool {
        matches!(
            self,
            BinaryOperator::And | BinaryOperator::Or | BinaryOperator::Coalesce
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOperator {
    Positive,
    Negative,
    Not,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignmentOperator {
    Simple,   // =
    Add,      // +=
    Subtract, // -=
}

/// Keyword types usable in annotations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKeyword {
    Boolean,
    Number,
    String,
    Any,
    Unknown,
    Void,
    Never,
    Object,
    Null,
    Undefined,
}

/// A type annotation
#[derive(Debug, Clone)]
pub enum TypeNode {
    Keyword {
        keyword: TypeKeyword,
        range: TextRange,
    },
    /// `true` or `false` used as a type
    Literal {
        value: bool,
        range: TextRange,
    },
    Reference(Identifier),
    Array {
        element: Box<TypeNode>,
        range: TextRange,
    },
    Union {
        types: Vec<TypeNode>,
        range: TextRange,
    },
}

impl TypeNode {
    pub fn range(&self) -> TextRange {
        match self {
            TypeNode::Keyword { range, .. }
            | TypeNode::Literal { range, .. }
            | TypeNode::Array { range, .. }
            | TypeNode::Union { range, .. } => *range,
            TypeNode::Reference(ident) => ident.range,
        }
    }
}
