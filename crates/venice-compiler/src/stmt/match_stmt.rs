//! Match statement and pattern compilation.
//!
//! Each clause tests a copy of the scrutinee. A pattern consumes the value
//! it is given and leaves a `bool` saying whether it matched, binding any
//! names along the way:
//!
//! ```text
//!     <scrutinee>
//!     DUP_TOP                   per clause
//!     <pattern>
//!     REL_JUMP_IF_FALSE next
//!     POP_TOP
//!     <body>
//!     REL_JUMP end
//! next:
//!     ...
//!     POP_TOP
//!     <default body>
//! end:
//! ```

use rustc_hash::FxHashSet;
use venice_ast::{CompoundPattern, MatchClause, MatchStmt, Pattern};
use venice_core::{CompileError, Span};

use super::{Result, StmtCompiler};
use crate::bytecode::Instruction;
use crate::emit::{JumpIntent, JumpLabel};
use crate::symbols::{FrameKind, Symbol};
use crate::types::{EnumRef, VeniceType};

impl<'a, 'l> StmtCompiler<'a, 'l> {
    /// Compile a match statement over an enum value.
    ///
    /// Without a default body the clauses must cover every case, either
    /// through a catch-all pattern or one clause per label whose payload
    /// patterns all match unconditionally.
    pub fn compile_match(&mut self, stmt: &MatchStmt<'_>) -> Result<()> {
        let scrutinee = self.expr_compiler().infer(stmt.scrutinee)?;
        let VeniceType::Enum(enum_ref) = &scrutinee else {
            return Err(CompileError::TypeMismatch {
                expected: "an enum".to_string(),
                found: scrutinee.to_string(),
                span: stmt.scrutinee.span(),
            });
        };

        let mut ends = Vec::with_capacity(stmt.clauses.len());
        for clause in stmt.clauses {
            self.emitter.emit(Instruction::DupTop);
            self.ctx.push_scope(FrameKind::Block);
            let end = self.compile_clause(clause, &scrutinee);
            self.ctx.pop_scope();
            ends.push(end?);
        }

        self.emitter.emit(Instruction::PopTop);
        if let Some(default) = &stmt.default {
            self.compile_block(default)?;
        } else {
            self.check_exhaustive(stmt, enum_ref)?;
        }
        for end in ends {
            self.emitter.patch_here(end);
        }
        Ok(())
    }

    /// Compile one clause, returning its jump to the end of the match.
    fn compile_clause(&mut self, clause: &MatchClause<'_>, ty: &VeniceType) -> Result<JumpLabel> {
        self.compile_pattern(&clause.pattern, ty)?;
        let skip = self.emitter.emit_placeholder(JumpIntent::SkipClause);
        self.emitter.emit(Instruction::PopTop);
        self.compile_block(&clause.body)?;
        let end = self.emitter.emit_placeholder(JumpIntent::EndOfMatch);
        self.emitter.patch_here(skip);
        Ok(end)
    }

    /// Compile a pattern against a value of type `ty` on top of the stack.
    fn compile_pattern(&mut self, pattern: &Pattern<'_>, ty: &VeniceType) -> Result<()> {
        match pattern {
            Pattern::Symbol(ident) => {
                let slot = self.ctx.slot_for(ident.name);
                self.emitter.emit(Instruction::StoreName(slot.clone()));
                self.ctx
                    .values
                    .put(ident.name, Symbol::variable(ty.clone(), false, slot), ident.span)?;
                self.emitter.emit(Instruction::PushConstBool(true));
            }
            Pattern::Wildcard(_) => {
                self.emitter.emit(Instruction::PopTop);
                self.emitter.emit(Instruction::PushConstBool(true));
            }
            Pattern::Compound(compound) => self.compile_compound(compound, ty)?,
        }
        Ok(())
    }

    fn compile_compound(&mut self, pattern: &CompoundPattern<'_>, ty: &VeniceType) -> Result<()> {
        let VeniceType::Enum(enum_ref) = ty else {
            return Err(invalid(
                format!("pattern '{}' cannot match a value of type {ty}", pattern.label.name),
                pattern.span,
            ));
        };
        if let Some(scope) = &pattern.scope {
            let same_enum = matches!(
                self.ctx.types.get(scope.name),
                Some(VeniceType::Enum(named)) if named.id == enum_ref.id
            );
            if !same_enum {
                return Err(invalid(
                    format!("'{}' does not name the enum {ty}", scope.name),
                    scope.span,
                ));
            }
        }

        let label = pattern.label.name;
        let (_, payload) = self
            .ctx
            .registry
            .case_payload(enum_ref, label)
            .ok_or_else(|| invalid(format!("{ty} has no case '{label}'"), pattern.label.span))?;
        let count = pattern.patterns.len();
        let fits = if pattern.elided {
            count <= payload.len()
        } else {
            count == payload.len()
        };
        if !fits {
            return Err(invalid(
                format!(
                    "case '{label}' carries {} value(s), pattern gives {count}",
                    payload.len()
                ),
                pattern.span,
            ));
        }

        self.emitter.emit(Instruction::CheckLabel(label.to_string()));
        let mut fails = vec![self.emitter.emit_placeholder(JumpIntent::PatternFail)];
        for (index, (sub, sub_ty)) in pattern.patterns.iter().zip(&payload).enumerate() {
            self.emitter.emit(Instruction::PushEnumIndex(index));
            self.compile_pattern(sub, sub_ty)?;
            fails.push(self.emitter.emit_placeholder(JumpIntent::PatternFail));
        }

        self.emitter.emit(Instruction::PopTop);
        self.emitter.emit(Instruction::PushConstBool(true));
        self.emitter.emit(Instruction::RelJump(3));
        for fail in fails {
            self.emitter.patch_here(fail);
        }
        self.emitter.emit(Instruction::PopTop);
        self.emitter.emit(Instruction::PushConstBool(false));
        Ok(())
    }

    fn check_exhaustive(&self, stmt: &MatchStmt<'_>, enum_ref: &EnumRef) -> Result<()> {
        let mut covered = FxHashSet::default();
        for clause in stmt.clauses {
            match &clause.pattern {
                Pattern::Symbol(_) | Pattern::Wildcard(_) => return Ok(()),
                Pattern::Compound(compound) if is_irrefutable(compound.patterns) => {
                    covered.insert(compound.label.name);
                }
                Pattern::Compound(_) => {}
            }
        }

        let Some(decl) = self.ctx.registry.enum_decl(enum_ref.id) else {
            return Ok(());
        };
        let missing: Vec<&str> = decl
            .cases
            .iter()
            .map(|case| case.label.as_str())
            .filter(|label| !covered.contains(label))
            .collect();
        if missing.is_empty() {
            return Ok(());
        }
        Err(CompileError::NonExhaustiveMatch {
            ty: VeniceType::Enum(enum_ref.clone()).to_string(),
            missing: missing.join(", "),
            span: stmt.span,
        })
    }
}

fn is_irrefutable(patterns: &[Pattern<'_>]) -> bool {
    patterns
        .iter()
        .all(|p| matches!(p, Pattern::Symbol(_) | Pattern::Wildcard(_)))
}

fn invalid(message: String, span: Span) -> CompileError {
    CompileError::InvalidPattern { message, span }
}

#[cfg(test)]
mod tests {
    use crate::bytecode::{FunctionRef, Instruction};
    use crate::stmt::test_support::*;
    use bumpalo::Bump;
    use pretty_assertions::assert_eq;
    use venice_ast::build::AstBuilder;
    use venice_core::{Builtin, CompileError};

    #[test]
    fn optional_match_layout() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let some = b.call(b.qualified("Optional", "Some"), &[b.int(1)]);
        let print_x = [b.expr_stmt(b.call(b.sym("print"), &[b.sym("x")]))];
        let stmts = [
            b.let_stmt("o", some),
            b.match_stmt(
                b.sym("o"),
                &[
                    (b.compound_pattern(None, "Some", &[b.symbol_pattern("x")], false), &print_x),
                    (b.compound_pattern(None, "None", &[], false), &[]),
                ],
                None,
            ),
        ];
        let code = compile_top_level(&stmts).unwrap();
        assert_eq!(
            code[4..],
            [
                Instruction::PushName("o".to_string()),
                // case Some(x)
                Instruction::DupTop,
                Instruction::CheckLabel("Some".to_string()),
                Instruction::RelJumpIfFalse(8),
                Instruction::PushEnumIndex(0),
                Instruction::StoreName("x".to_string()),
                Instruction::PushConstBool(true),
                Instruction::RelJumpIfFalse(4),
                Instruction::PopTop,
                Instruction::PushConstBool(true),
                Instruction::RelJump(3),
                Instruction::PopTop,
                Instruction::PushConstBool(false),
                Instruction::RelJumpIfFalse(6),
                Instruction::PopTop,
                Instruction::PushName("x".to_string()),
                Instruction::PushConstFunction(FunctionRef::Builtin(Builtin::Print)),
                Instruction::CallFunction(1),
                Instruction::RelJump(13),
                // case None
                Instruction::DupTop,
                Instruction::CheckLabel("None".to_string()),
                Instruction::RelJumpIfFalse(4),
                Instruction::PopTop,
                Instruction::PushConstBool(true),
                Instruction::RelJump(3),
                Instruction::PopTop,
                Instruction::PushConstBool(false),
                Instruction::RelJumpIfFalse(3),
                Instruction::PopTop,
                Instruction::RelJump(2),
                // no clause matched
                Instruction::PopTop,
            ]
        );
    }

    #[test]
    fn missing_case_is_reported() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let stmts = [
            b.let_stmt("o", b.call(b.qualified("Optional", "Some"), &[b.int(1)])),
            b.match_stmt(
                b.sym("o"),
                &[(b.compound_pattern(None, "Some", &[b.wildcard()], false), &[])],
                None,
            ),
        ];
        let err = compile_top_level(&stmts).unwrap_err();
        assert!(matches!(
            err,
            CompileError::NonExhaustiveMatch { missing, .. } if missing == "None"
        ));
    }

    #[test]
    fn refutable_sub_pattern_does_not_cover_label() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let nested = b.compound_pattern(None, "Some", &[b.wildcard()], false);
        let stmts = [
            b.let_stmt(
                "o",
                b.call(
                    b.qualified("Optional", "Some"),
                    &[b.call(b.qualified("Optional", "Some"), &[b.int(1)])],
                ),
            ),
            b.match_stmt(
                b.sym("o"),
                &[
                    (b.compound_pattern(None, "Some", &[nested], false), &[]),
                    (b.compound_pattern(Some("Optional"), "None", &[], false), &[]),
                ],
                None,
            ),
        ];
        let err = compile_top_level(&stmts).unwrap_err();
        assert!(matches!(
            err,
            CompileError::NonExhaustiveMatch { missing, .. } if missing == "Some"
        ));
    }

    #[test]
    fn default_or_catch_all_makes_match_exhaustive() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let some = || b.call(b.qualified("Optional", "Some"), &[b.int(1)]);
        let with_default = [
            b.let_stmt("o", some()),
            b.match_stmt(
                b.sym("o"),
                &[(b.compound_pattern(None, "Some", &[b.wildcard()], false), &[])],
                Some(&[]),
            ),
        ];
        assert!(compile_top_level(&with_default).is_ok());

        let with_binding = [
            b.let_stmt("o", some()),
            b.match_stmt(b.sym("o"), &[(b.symbol_pattern("whole"), &[])], None),
        ];
        assert!(compile_top_level(&with_binding).is_ok());
    }

    #[test]
    fn invalid_patterns() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let matching = |pattern| {
            [
                b.let_stmt("o", b.call(b.qualified("Optional", "Some"), &[b.int(1)])),
                b.match_stmt(b.sym("o"), &[(pattern, &[])], Some(&[])),
            ]
        };

        let unknown = matching(b.compound_pattern(None, "Maybe", &[], false));
        let too_many = matching(b.compound_pattern(
            None,
            "Some",
            &[b.wildcard(), b.wildcard()],
            false,
        ));
        let too_few = matching(b.compound_pattern(None, "Some", &[], false));
        let wrong_scope = matching(b.compound_pattern(Some("int"), "Some", &[], true));
        for stmts in [unknown, too_many, too_few, wrong_scope] {
            let err = compile_top_level(&stmts).unwrap_err();
            assert!(matches!(err, CompileError::InvalidPattern { .. }), "{err:?}");
        }

        let elided = matching(b.compound_pattern(None, "Some", &[], true));
        assert!(compile_top_level(&elided).is_ok());
    }

    #[test]
    fn scrutinee_must_be_enum() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let stmt = b.match_stmt(b.int(1), &[(b.wildcard(), &[])], None);
        let err = compile_top_level(&[stmt]).unwrap_err();
        assert!(matches!(err, CompileError::TypeMismatch { .. }));
    }

    #[test]
    fn bindings_are_scoped_to_their_clause() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let stmts = [
            b.let_stmt("o", b.call(b.qualified("Optional", "Some"), &[b.int(1)])),
            b.match_stmt(
                b.sym("o"),
                &[(b.compound_pattern(None, "Some", &[b.symbol_pattern("x")], false), &[])],
                Some(&[]),
            ),
            b.expr_stmt(b.sym("x")),
        ];
        let err = compile_top_level(&stmts).unwrap_err();
        assert!(matches!(err, CompileError::UndefinedSymbol { name, .. } if name == "x"));
    }
}
