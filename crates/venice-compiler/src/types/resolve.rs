//! Resolution of source type annotations.

use venice_ast::{TypeExpr, TypeExprKind};
use venice_core::TypeError;

use super::{EnumRef, FunctionType, VeniceType};
use crate::symbols::TypeTable;

/// Turn a type annotation into a [`VeniceType`].
///
/// Names are looked up in the type table: atomic types, `any`, declared
/// classes and enums, and generic parameters in scope. Type arguments are
/// only accepted by generic enums, and their count must match.
pub fn resolve_type(expr: &TypeExpr<'_>, types: &TypeTable) -> Result<VeniceType, TypeError> {
    match expr.kind {
        TypeExprKind::Named { name, args } => {
            let base = types.get(name.name).ok_or_else(|| TypeError::UnknownType {
                name: name.name.to_string(),
            })?;
            match base {
                VeniceType::Enum(e) => {
                    if args.len() != e.args.len() {
                        return Err(TypeError::TypeArgCount {
                            name: e.name.clone(),
                            expected: e.args.len(),
                            found: args.len(),
                        });
                    }
                    Ok(VeniceType::Enum(EnumRef {
                        id: e.id,
                        name: e.name.clone(),
                        args: resolve_all(args, types)?,
                    }))
                }
                other if !args.is_empty() => Err(TypeError::TypeArgCount {
                    name: other.to_string(),
                    expected: 0,
                    found: args.len(),
                }),
                other => Ok(other.clone()),
            }
        }
        TypeExprKind::List(item) => Ok(VeniceType::list(resolve_type(item, types)?)),
        TypeExprKind::Map(key, value) => Ok(VeniceType::map(
            resolve_type(key, types)?,
            resolve_type(value, types)?,
        )),
        TypeExprKind::Tuple(items) => Ok(VeniceType::Tuple(resolve_all(items, types)?)),
        TypeExprKind::Function { params, ret } => {
            Ok(VeniceType::Function(Box::new(FunctionType {
                params: resolve_all(params, types)?,
                ret: ret.map(|r| resolve_type(r, types)).transpose()?,
                generics: Vec::new(),
            })))
        }
    }
}

fn resolve_all(items: &[TypeExpr<'_>], types: &TypeTable) -> Result<Vec<VeniceType>, TypeError> {
    items.iter().map(|item| resolve_type(item, types)).collect()
}
