//! Arena-backed construction of syntax trees.
//!
//! The parser that normally produces Venice trees lives outside this
//! workspace. [`AstBuilder`] lets hosts, tests, and benchmarks build the same
//! trees directly; every node is allocated in the given arena and carries
//! the builder's current span.
//!
//! ```
//! use bumpalo::Bump;
//! use venice_ast::build::AstBuilder;
//!
//! let arena = Bump::new();
//! let b = AstBuilder::new(&arena);
//! // let x = 1 + 2
//! let module = b.module(&[b.let_stmt("x", b.infix(b.int(1), "+", b.int(2)))]);
//! assert_eq!(module.stmts().len(), 1);
//! ```

use bumpalo::Bump;
use venice_core::Span;

use crate::*;

/// Builds nodes in an arena.
#[derive(Clone, Copy)]
pub struct AstBuilder<'ast> {
    arena: &'ast Bump,
    span: Span,
}

impl<'ast> AstBuilder<'ast> {
    /// A builder stamping every node with the default span.
    pub fn new(arena: &'ast Bump) -> Self {
        Self {
            arena,
            span: Span::default(),
        }
    }

    /// A builder stamping nodes with `span`.
    pub fn at(self, span: Span) -> Self {
        Self { span, ..self }
    }

    /// The arena nodes are allocated in.
    pub fn arena(&self) -> &'ast Bump {
        self.arena
    }

    fn alloc<T>(&self, value: T) -> &'ast T {
        self.arena.alloc(value)
    }

    fn slice<T: Copy>(&self, items: &[T]) -> &'ast [T] {
        self.arena.alloc_slice_copy(items)
    }

    /// An identifier.
    pub fn ident(&self, name: &'ast str) -> Ident<'ast> {
        Ident::new(name, self.span)
    }

    /// A module from its top-level statements.
    pub fn module(&self, stmts: &[Stmt<'ast>]) -> Module<'ast> {
        Module::new(self.slice(stmts), self.span)
    }

    // =========================================================================
    // Expressions
    // =========================================================================

    fn literal(&self, kind: LiteralKind<'ast>) -> Expr<'ast> {
        Expr::Literal(LiteralExpr {
            kind,
            span: self.span,
        })
    }

    /// An integer literal.
    pub fn int(&self, value: i64) -> Expr<'ast> {
        self.literal(LiteralKind::Int(value))
    }

    /// A real literal.
    pub fn real(&self, value: f64) -> Expr<'ast> {
        self.literal(LiteralKind::Real(value))
    }

    /// A string literal.
    pub fn string(&self, value: &'ast str) -> Expr<'ast> {
        self.literal(LiteralKind::String(value))
    }

    /// A boolean literal.
    pub fn boolean(&self, value: bool) -> Expr<'ast> {
        self.literal(LiteralKind::Bool(value))
    }

    /// A character literal.
    pub fn character(&self, value: u8) -> Expr<'ast> {
        self.literal(LiteralKind::Char(value))
    }

    /// A name reference.
    pub fn sym(&self, name: &'ast str) -> Expr<'ast> {
        Expr::Symbol(self.ident(name))
    }

    /// `scope::name`
    pub fn qualified(&self, scope: &'ast str, name: &'ast str) -> Expr<'ast> {
        Expr::Qualified(QualifiedExpr {
            scope: self.ident(scope),
            name: self.ident(name),
            span: self.span,
        })
    }

    /// `callee(args...)`
    pub fn call(&self, callee: Expr<'ast>, args: &[Expr<'ast>]) -> Expr<'ast> {
        Expr::Call(self.alloc(CallExpr {
            callee: self.alloc(callee),
            args: self.slice(args),
            span: self.span,
        }))
    }

    /// `object.name`
    pub fn field(&self, object: Expr<'ast>, name: &'ast str) -> Expr<'ast> {
        Expr::Field(self.alloc(FieldExpr {
            object: self.alloc(object),
            field: self.ident(name),
            span: self.span,
        }))
    }

    /// `object.name(args...)`
    pub fn method_call(
        &self,
        object: Expr<'ast>,
        name: &'ast str,
        args: &[Expr<'ast>],
    ) -> Expr<'ast> {
        self.call(self.field(object, name), args)
    }

    /// `object[index]`
    pub fn index(&self, object: Expr<'ast>, index: Expr<'ast>) -> Expr<'ast> {
        Expr::Index(self.alloc(IndexExpr {
            object: self.alloc(object),
            index: self.alloc(index),
            span: self.span,
        }))
    }

    /// `object.N`
    pub fn tuple_field(&self, object: Expr<'ast>, index: usize) -> Expr<'ast> {
        Expr::TupleField(self.alloc(TupleFieldExpr {
            object: self.alloc(object),
            index,
            span: self.span,
        }))
    }

    /// `left op right`
    pub fn infix(&self, left: Expr<'ast>, op: &'ast str, right: Expr<'ast>) -> Expr<'ast> {
        Expr::Infix(self.alloc(InfixExpr {
            left: self.alloc(left),
            op,
            right: self.alloc(right),
            span: self.span,
        }))
    }

    /// `op operand`
    pub fn unary(&self, op: &'ast str, operand: Expr<'ast>) -> Expr<'ast> {
        Expr::Unary(self.alloc(UnaryExpr {
            op,
            operand: self.alloc(operand),
            span: self.span,
        }))
    }

    /// `condition ? then_expr : else_expr`
    pub fn ternary(
        &self,
        condition: Expr<'ast>,
        then_expr: Expr<'ast>,
        else_expr: Expr<'ast>,
    ) -> Expr<'ast> {
        Expr::Ternary(self.alloc(TernaryExpr {
            condition: self.alloc(condition),
            then_expr: self.alloc(then_expr),
            else_expr: self.alloc(else_expr),
            span: self.span,
        }))
    }

    /// `[items...]`
    pub fn list(&self, items: &[Expr<'ast>]) -> Expr<'ast> {
        Expr::List(ListExpr {
            items: self.slice(items),
            span: self.span,
        })
    }

    /// `{key: value, ...}`
    pub fn map(&self, entries: &[(Expr<'ast>, Expr<'ast>)]) -> Expr<'ast> {
        let entries: Vec<MapEntry<'ast>> = entries
            .iter()
            .map(|&(key, value)| MapEntry { key, value })
            .collect();
        Expr::Map(MapExpr {
            entries: self.slice(&entries),
            span: self.span,
        })
    }

    /// `(items...)`
    pub fn tuple(&self, items: &[Expr<'ast>]) -> Expr<'ast> {
        Expr::Tuple(TupleExpr {
            items: self.slice(items),
            span: self.span,
        })
    }

    // =========================================================================
    // Types
    // =========================================================================

    /// A named type without arguments.
    pub fn ty(&self, name: &'ast str) -> TypeExpr<'ast> {
        TypeExpr::named(name, self.span)
    }

    /// A named type with arguments, e.g. `Optional<int>`.
    pub fn ty_args(&self, name: &'ast str, args: &[TypeExpr<'ast>]) -> TypeExpr<'ast> {
        TypeExpr {
            kind: TypeExprKind::Named {
                name: self.ident(name),
                args: self.slice(args),
            },
            span: self.span,
        }
    }

    /// `list<item>`
    pub fn list_ty(&self, item: TypeExpr<'ast>) -> TypeExpr<'ast> {
        TypeExpr {
            kind: TypeExprKind::List(self.alloc(item)),
            span: self.span,
        }
    }

    /// `map<key, value>`
    pub fn map_ty(&self, key: TypeExpr<'ast>, value: TypeExpr<'ast>) -> TypeExpr<'ast> {
        TypeExpr {
            kind: TypeExprKind::Map(self.alloc(key), self.alloc(value)),
            span: self.span,
        }
    }

    /// `(items...)`
    pub fn tuple_ty(&self, items: &[TypeExpr<'ast>]) -> TypeExpr<'ast> {
        TypeExpr {
            kind: TypeExprKind::Tuple(self.slice(items)),
            span: self.span,
        }
    }

    /// `func(params...) -> ret`
    pub fn func_ty(&self, params: &[TypeExpr<'ast>], ret: Option<TypeExpr<'ast>>) -> TypeExpr<'ast> {
        TypeExpr {
            kind: TypeExprKind::Function {
                params: self.slice(params),
                ret: ret.map(|r| self.alloc(r)),
            },
            span: self.span,
        }
    }

    // =========================================================================
    // Statements
    // =========================================================================

    /// A block.
    pub fn block(&self, stmts: &[Stmt<'ast>]) -> Block<'ast> {
        Block {
            stmts: self.slice(stmts),
            span: self.span,
        }
    }

    fn binding(
        &self,
        name: &'ast str,
        ty: Option<TypeExpr<'ast>>,
        mutable: bool,
        value: Expr<'ast>,
    ) -> Stmt<'ast> {
        Stmt::Let(LetStmt {
            name: self.ident(name),
            ty: ty.map(|t| self.alloc(t)),
            mutable,
            value: self.alloc(value),
            span: self.span,
        })
    }

    /// `let name = value`
    pub fn let_stmt(&self, name: &'ast str, value: Expr<'ast>) -> Stmt<'ast> {
        self.binding(name, None, false, value)
    }

    /// `var name = value`
    pub fn var_stmt(&self, name: &'ast str, value: Expr<'ast>) -> Stmt<'ast> {
        self.binding(name, None, true, value)
    }

    /// `let name: ty = value` or `var name: ty = value`
    pub fn typed_binding(
        &self,
        name: &'ast str,
        ty: TypeExpr<'ast>,
        mutable: bool,
        value: Expr<'ast>,
    ) -> Stmt<'ast> {
        self.binding(name, Some(ty), mutable, value)
    }

    /// `target = value`
    pub fn assign(&self, target: Expr<'ast>, value: Expr<'ast>) -> Stmt<'ast> {
        Stmt::Assign(AssignStmt {
            target: self.alloc(target),
            value: self.alloc(value),
            span: self.span,
        })
    }

    /// `return` or `return value`
    pub fn return_stmt(&self, value: Option<Expr<'ast>>) -> Stmt<'ast> {
        Stmt::Return(ReturnStmt {
            value: value.map(|v| self.alloc(v)),
            span: self.span,
        })
    }

    /// An expression statement.
    pub fn expr_stmt(&self, expr: Expr<'ast>) -> Stmt<'ast> {
        Stmt::Expr(ExprStmt {
            expr: self.alloc(expr),
            span: self.span,
        })
    }

    fn if_node(
        &self,
        condition: Expr<'ast>,
        body: &[Stmt<'ast>],
        else_branch: Option<ElseBranch<'ast>>,
    ) -> &'ast IfStmt<'ast> {
        self.alloc(IfStmt {
            condition: self.alloc(condition),
            body: self.block(body),
            else_branch,
            span: self.span,
        })
    }

    /// `if condition { body }`
    pub fn if_stmt(&self, condition: Expr<'ast>, body: &[Stmt<'ast>]) -> Stmt<'ast> {
        Stmt::If(self.if_node(condition, body, None))
    }

    /// `if condition { body } else { else_body }`
    pub fn if_else(
        &self,
        condition: Expr<'ast>,
        body: &[Stmt<'ast>],
        else_body: &[Stmt<'ast>],
    ) -> Stmt<'ast> {
        let else_branch = ElseBranch::Block(self.block(else_body));
        Stmt::If(self.if_node(condition, body, Some(else_branch)))
    }

    /// `if condition { body } else <else_if>`, where `else_if` is an if
    /// statement.
    pub fn if_else_if(
        &self,
        condition: Expr<'ast>,
        body: &[Stmt<'ast>],
        else_if: Stmt<'ast>,
    ) -> Stmt<'ast> {
        let else_branch = match else_if {
            Stmt::If(nested) => ElseBranch::If(nested),
            other => ElseBranch::Block(self.block(&[other])),
        };
        Stmt::If(self.if_node(condition, body, Some(else_branch)))
    }

    /// `while condition { body }`
    pub fn while_stmt(&self, condition: Expr<'ast>, body: &[Stmt<'ast>]) -> Stmt<'ast> {
        Stmt::While(self.alloc(WhileStmt {
            condition: self.alloc(condition),
            body: self.block(body),
            span: self.span,
        }))
    }

    /// `for vars... in iterable { body }`
    pub fn for_stmt(
        &self,
        variables: &[&'ast str],
        iterable: Expr<'ast>,
        body: &[Stmt<'ast>],
    ) -> Stmt<'ast> {
        let variables: Vec<Ident<'ast>> = variables.iter().map(|v| self.ident(v)).collect();
        Stmt::For(self.alloc(ForStmt {
            variables: self.slice(&variables),
            iterable: self.alloc(iterable),
            body: self.block(body),
            span: self.span,
        }))
    }

    /// `break`
    pub fn break_stmt(&self) -> Stmt<'ast> {
        Stmt::Break(BreakStmt { span: self.span })
    }

    /// `continue`
    pub fn continue_stmt(&self) -> Stmt<'ast> {
        Stmt::Continue(ContinueStmt { span: self.span })
    }

    /// `match scrutinee { case pattern { body } ... default { ... } }`
    pub fn match_stmt(
        &self,
        scrutinee: Expr<'ast>,
        clauses: &[(Pattern<'ast>, &[Stmt<'ast>])],
        default: Option<&[Stmt<'ast>]>,
    ) -> Stmt<'ast> {
        let clauses: Vec<MatchClause<'ast>> = clauses
            .iter()
            .map(|&(pattern, body)| MatchClause {
                pattern,
                body: self.block(body),
                span: self.span,
            })
            .collect();
        Stmt::Match(self.alloc(MatchStmt {
            scrutinee: self.alloc(scrutinee),
            clauses: self.slice(&clauses),
            default: default.map(|body| self.block(body)),
            span: self.span,
        }))
    }

    /// `Label(patterns...)`, or `Scope::Label(...)` with a scope.
    pub fn compound_pattern(
        &self,
        scope: Option<&'ast str>,
        label: &'ast str,
        patterns: &[Pattern<'ast>],
        elided: bool,
    ) -> Pattern<'ast> {
        Pattern::Compound(self.alloc(CompoundPattern {
            scope: scope.map(|s| self.ident(s)),
            label: self.ident(label),
            patterns: self.slice(patterns),
            elided,
            span: self.span,
        }))
    }

    /// A binding pattern.
    pub fn symbol_pattern(&self, name: &'ast str) -> Pattern<'ast> {
        Pattern::Symbol(self.ident(name))
    }

    /// `_`
    pub fn wildcard(&self) -> Pattern<'ast> {
        Pattern::Wildcard(self.span)
    }

    // =========================================================================
    // Declarations
    // =========================================================================

    /// A function declaration.
    pub fn function(
        &self,
        name: &'ast str,
        generics: &[&'ast str],
        params: &[(&'ast str, TypeExpr<'ast>)],
        return_type: Option<TypeExpr<'ast>>,
        body: &[Stmt<'ast>],
    ) -> FunctionDecl<'ast> {
        let generics: Vec<Ident<'ast>> = generics.iter().map(|g| self.ident(g)).collect();
        let params: Vec<Param<'ast>> = params
            .iter()
            .map(|&(name, ty)| Param {
                name: self.ident(name),
                ty,
                span: self.span,
            })
            .collect();
        FunctionDecl {
            name: self.ident(name),
            generics: self.slice(&generics),
            params: self.slice(&params),
            return_type: return_type.map(|t| self.alloc(t)),
            body: self.block(body),
            span: self.span,
        }
    }

    /// A function declaration statement.
    pub fn function_stmt(&self, function: FunctionDecl<'ast>) -> Stmt<'ast> {
        Stmt::Function(self.alloc(function))
    }

    /// A class method.
    pub fn method(&self, visibility: Visibility, function: FunctionDecl<'ast>) -> MethodDecl<'ast> {
        MethodDecl {
            visibility,
            function,
        }
    }

    /// A class declaration statement.
    pub fn class(
        &self,
        name: &'ast str,
        fields: &[(Visibility, &'ast str, TypeExpr<'ast>)],
        methods: &[MethodDecl<'ast>],
    ) -> Stmt<'ast> {
        let fields: Vec<FieldDecl<'ast>> = fields
            .iter()
            .map(|&(visibility, name, ty)| FieldDecl {
                name: self.ident(name),
                ty,
                visibility,
                span: self.span,
            })
            .collect();
        Stmt::Class(self.alloc(ClassDecl {
            name: self.ident(name),
            fields: self.slice(&fields),
            methods: self.slice(methods),
            span: self.span,
        }))
    }

    /// An enum declaration statement.
    pub fn enumeration(
        &self,
        name: &'ast str,
        generics: &[&'ast str],
        cases: &[(&'ast str, &[TypeExpr<'ast>])],
    ) -> Stmt<'ast> {
        let generics: Vec<Ident<'ast>> = generics.iter().map(|g| self.ident(g)).collect();
        let cases: Vec<EnumCaseDecl<'ast>> = cases
            .iter()
            .map(|&(label, payload)| EnumCaseDecl {
                label: self.ident(label),
                payload: self.slice(payload),
                span: self.span,
            })
            .collect();
        Stmt::Enum(self.alloc(EnumDecl {
            name: self.ident(name),
            generics: self.slice(&generics),
            cases: self.slice(&cases),
            span: self.span,
        }))
    }

    /// `import "path" as alias`
    pub fn import(&self, path: &'ast str, alias: &'ast str) -> Stmt<'ast> {
        Stmt::Import(ImportDecl {
            path,
            alias: self.ident(alias),
            span: self.span,
        })
    }
}
