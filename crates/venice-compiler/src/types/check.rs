//! Type compatibility and generic substitution.

use rustc_hash::FxHashMap;
use venice_core::TypeError;

use super::{EnumRef, FunctionType, VeniceType};

/// Generic parameter bindings collected at one call site.
pub type GenericBindings = FxHashMap<String, VeniceType>;

/// Whether a value of type `actual` may be used where `expected` is required.
///
/// `Any` matches anything and atomic types match by tag. Lists, maps,
/// tuples, and function types match position by position. Classes and enums
/// match only when they come from the same declaration, with their type
/// arguments matched in turn. A generic parameter of the enclosing
/// declaration matches only itself; an [`Unknown`](VeniceType::Unknown)
/// argument, such as the `T` of `Optional::None`, matches anything.
pub fn check_type(expected: &VeniceType, actual: &VeniceType) -> bool {
    use VeniceType::*;

    match (expected, actual) {
        (Any, _) | (_, Any) => true,
        (Unknown(_), _) | (_, Unknown(_)) => true,
        (Atomic(a), Atomic(b)) => a == b,
        (List(a), List(b)) => check_type(a, b),
        (Map(ak, av), Map(bk, bv)) => check_type(ak, bk) && check_type(av, bv),
        (Tuple(a), Tuple(b)) => all_compatible(a, b),
        (Function(a), Function(b)) => {
            all_compatible(&a.params, &b.params)
                && match (&a.ret, &b.ret) {
                    (None, None) => true,
                    (Some(a), Some(b)) => check_type(a, b),
                    _ => false,
                }
        }
        (Class(a), Class(b)) => a.id == b.id,
        (Enum(a), Enum(b)) => a.id == b.id && all_compatible(&a.args, &b.args),
        (Generic(a), Generic(b)) => a == b,
        (Module(a), Module(b)) => a == b,
        _ => false,
    }
}

fn all_compatible(expected: &[VeniceType], actual: &[VeniceType]) -> bool {
    expected.len() == actual.len() && expected.iter().zip(actual).all(|(e, a)| check_type(e, a))
}

/// Bind the generic parameters listed in `declared` that occur in `param`
/// against `arg`.
///
/// The first occurrence of a parameter binds it. Later occurrences must be
/// compatible with the existing binding, otherwise the call fails with
/// [`TypeError::GenericConflict`]. A binding that is still open is replaced
/// by a fully known compatible type. Parameters not in `declared` belong to
/// the enclosing declaration and are left for [`check_type`].
pub fn match_generics(
    param: &VeniceType,
    arg: &VeniceType,
    declared: &[String],
    bindings: &mut GenericBindings,
) -> Result<(), TypeError> {
    use VeniceType::*;

    match (param, arg) {
        (Generic(name), _) if !declared.contains(name) => Ok(()),
        (Generic(name), _) => match bindings.get(name) {
            Some(bound) if check_type(bound, arg) => {
                if bound.is_open() && !arg.is_open() {
                    bindings.insert(name.clone(), arg.clone());
                }
                Ok(())
            }
            Some(bound) => Err(TypeError::GenericConflict {
                name: name.clone(),
                first: bound.to_string(),
                second: arg.to_string(),
            }),
            None => {
                bindings.insert(name.clone(), arg.clone());
                Ok(())
            }
        },
        (List(p), List(a)) => match_generics(p, a, declared, bindings),
        (Map(pk, pv), Map(ak, av)) => {
            match_generics(pk, ak, declared, bindings)?;
            match_generics(pv, av, declared, bindings)
        }
        (Tuple(p), Tuple(a)) if p.len() == a.len() => match_all(p, a, declared, bindings),
        (Enum(p), Enum(a)) if p.id == a.id && p.args.len() == a.args.len() => {
            match_all(&p.args, &a.args, declared, bindings)
        }
        (Function(p), Function(a)) if p.params.len() == a.params.len() => {
            match_all(&p.params, &a.params, declared, bindings)?;
            match (&p.ret, &a.ret) {
                (Some(p), Some(a)) => match_generics(p, a, declared, bindings),
                _ => Ok(()),
            }
        }
        _ => Ok(()),
    }
}

fn match_all(
    params: &[VeniceType],
    args: &[VeniceType],
    declared: &[String],
    bindings: &mut GenericBindings,
) -> Result<(), TypeError> {
    params
        .iter()
        .zip(args)
        .try_for_each(|(p, a)| match_generics(p, a, declared, bindings))
}

/// Replace every generic parameter in `ty` with its binding.
///
/// Fails with [`TypeError::UnboundGeneric`] if a parameter was never bound.
pub fn substitute_generics(
    ty: &VeniceType,
    bindings: &GenericBindings,
) -> Result<VeniceType, TypeError> {
    substitute(ty, &mut |name| {
        bindings
            .get(name)
            .cloned()
            .ok_or_else(|| TypeError::UnboundGeneric {
                name: name.to_string(),
            })
    })
}

/// Replace the generic parameters of a callee's result type.
///
/// Parameters listed in `declared` belong to the callee and must be bound.
/// Any other parameter belongs to the enclosing generic function and stays
/// as it is unless bound.
pub fn substitute_declared(
    ty: &VeniceType,
    bindings: &GenericBindings,
    declared: &[String],
) -> Result<VeniceType, TypeError> {
    substitute(ty, &mut |name| match bindings.get(name) {
        Some(bound) => Ok(bound.clone()),
        None if declared.iter().any(|d| d == name) => Err(TypeError::UnboundGeneric {
            name: name.to_string(),
        }),
        None => Ok(VeniceType::generic(name)),
    })
}

/// Replace the bound generic parameters in `ty`, leaving unbound ones as is.
pub fn substitute_partial(ty: &VeniceType, bindings: &GenericBindings) -> VeniceType {
    let result: Result<VeniceType, TypeError> = substitute(ty, &mut |name| {
        Ok(bindings
            .get(name)
            .cloned()
            .unwrap_or_else(|| VeniceType::generic(name)))
    });
    result.unwrap_or_else(|_| ty.clone())
}

fn substitute(
    ty: &VeniceType,
    lookup: &mut dyn FnMut(&str) -> Result<VeniceType, TypeError>,
) -> Result<VeniceType, TypeError> {
    use VeniceType::*;

    Ok(match ty {
        Generic(name) => lookup(name)?,
        List(item) => VeniceType::list(substitute(item, lookup)?),
        Map(k, v) => VeniceType::map(substitute(k, lookup)?, substitute(v, lookup)?),
        Tuple(items) => Tuple(substitute_all(items, lookup)?),
        Function(f) => Function(Box::new(FunctionType {
            params: substitute_all(&f.params, lookup)?,
            ret: f.ret.as_ref().map(|r| substitute(r, lookup)).transpose()?,
            generics: f.generics.clone(),
        })),
        Enum(e) => Enum(EnumRef {
            id: e.id,
            name: e.name.clone(),
            args: substitute_all(&e.args, lookup)?,
        }),
        Atomic(_) | Class(_) | Module(_) | Unknown(_) | Any => ty.clone(),
    })
}

fn substitute_all(
    items: &[VeniceType],
    lookup: &mut dyn FnMut(&str) -> Result<VeniceType, TypeError>,
) -> Result<Vec<VeniceType>, TypeError> {
    items.iter().map(|item| substitute(item, lookup)).collect()
}
