//! Operator semantics.

use std::cmp::Ordering;

use venice_compiler::Instruction;
use venice_core::RuntimeError;

use super::value::Value;

type Result<T> = std::result::Result<T, RuntimeError>;

fn overflow() -> RuntimeError {
    RuntimeError::panic("integer overflow")
}

fn division_by_zero() -> RuntimeError {
    RuntimeError::panic("division by zero")
}

/// Apply a two-operand instruction. `left` was pushed first.
pub(crate) fn binary(instruction: &Instruction, left: Value, right: Value) -> Result<Value> {
    use Instruction::*;

    let value = match instruction {
        BinaryAdd => Value::Integer(left.as_int()?.checked_add(right.as_int()?).ok_or_else(overflow)?),
        BinarySub => Value::Integer(left.as_int()?.checked_sub(right.as_int()?).ok_or_else(overflow)?),
        BinaryMul => Value::Integer(left.as_int()?.checked_mul(right.as_int()?).ok_or_else(overflow)?),
        BinaryModulo => {
            let divisor = right.as_int()?;
            if divisor == 0 {
                return Err(division_by_zero());
            }
            Value::Integer(left.as_int()?.checked_rem(divisor).ok_or_else(overflow)?)
        }
        BinaryRealAdd => Value::RealNumber(left.as_real()? + right.as_real()?),
        BinaryRealSub => Value::RealNumber(left.as_real()? - right.as_real()?),
        BinaryRealMul => Value::RealNumber(left.as_real()? * right.as_real()?),
        BinaryRealDiv => {
            let divisor = right.as_real()?;
            if divisor == 0.0 {
                return Err(division_by_zero());
            }
            Value::RealNumber(left.as_real()? / divisor)
        }
        BinaryConcat => concat(&left, &right)?,
        BinaryEq => Value::Boolean(left == right),
        BinaryNotEq => Value::Boolean(left != right),
        BinaryLt => Value::Boolean(order(&left, &right)? == Ordering::Less),
        BinaryLtEq => Value::Boolean(order(&left, &right)? != Ordering::Greater),
        BinaryGt => Value::Boolean(order(&left, &right)? == Ordering::Greater),
        BinaryGtEq => Value::Boolean(order(&left, &right)? != Ordering::Less),
        BinaryIn => Value::Boolean(contains(&right, &left)?),
        BinaryListIndex => {
            let items = left.as_list()?.borrow();
            let index = checked_index(right.as_int()?, items.len())?;
            items[index].clone()
        }
        BinaryMapIndex => Value::optional(left.as_map()?.borrow().get(&right).cloned()),
        BinaryStringIndex => {
            let text = left.as_str()?;
            let index = checked_index(right.as_int()?, text.len())?;
            Value::Character(text.as_bytes()[index])
        }
        other => {
            return Err(RuntimeError::internal(format!(
                "{} is not a binary operator",
                other.opcode()
            )));
        }
    };
    Ok(value)
}

/// Apply a one-operand instruction.
pub(crate) fn unary(instruction: &Instruction, operand: Value) -> Result<Value> {
    match (instruction, operand) {
        (Instruction::UnaryMinus, Value::Integer(i)) => {
            Ok(Value::Integer(i.checked_neg().ok_or_else(overflow)?))
        }
        (Instruction::UnaryMinus, Value::RealNumber(r)) => Ok(Value::RealNumber(-r)),
        (Instruction::UnaryNot, Value::Boolean(b)) => Ok(Value::Boolean(!b)),
        (instruction, operand) => Err(RuntimeError::internal(format!(
            "{} cannot apply to {}",
            instruction.opcode(),
            operand.kind()
        ))),
    }
}

/// Convert a Venice index into a position in a sequence of `len` items.
pub(crate) fn checked_index(index: i64, len: usize) -> Result<usize> {
    usize::try_from(index)
        .ok()
        .filter(|i| *i < len)
        .ok_or_else(|| RuntimeError::panic("index out of bounds"))
}

fn order(left: &Value, right: &Value) -> Result<Ordering> {
    left.compare(right).ok_or_else(|| {
        RuntimeError::internal(format!(
            "cannot compare {} with {}",
            left.kind(),
            right.kind()
        ))
    })
}

fn concat(left: &Value, right: &Value) -> Result<Value> {
    match (left, right) {
        (Value::String(a), Value::String(b)) => Ok(Value::string(format!("{a}{b}"))),
        (Value::List(a), Value::List(b)) => {
            let mut items = a.borrow().clone();
            items.extend(b.borrow().iter().cloned());
            Ok(Value::list(items))
        }
        _ => Err(RuntimeError::internal(format!(
            "cannot concatenate {} with {}",
            left.kind(),
            right.kind()
        ))),
    }
}

fn contains(container: &Value, item: &Value) -> Result<bool> {
    match (container, item) {
        (Value::List(items), _) => Ok(items.borrow().contains(item)),
        (Value::Map(map), _) => Ok(map.borrow().contains_key(item)),
        (Value::String(text), Value::String(needle)) => Ok(text.contains(&**needle)),
        (Value::String(text), Value::Character(c)) => Ok(text.as_bytes().contains(c)),
        _ => Err(RuntimeError::internal(format!(
            "cannot test membership of {} in {}",
            item.kind(),
            container.kind()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vm::value::VeniceMap;

    fn int(i: i64) -> Value {
        Value::Integer(i)
    }

    #[test]
    fn integer_arithmetic() {
        assert_eq!(binary(&Instruction::BinaryAdd, int(1), int(2)).unwrap(), int(3));
        assert_eq!(binary(&Instruction::BinarySub, int(1), int(2)).unwrap(), int(-1));
        assert_eq!(binary(&Instruction::BinaryMul, int(4), int(5)).unwrap(), int(20));
        assert_eq!(binary(&Instruction::BinaryModulo, int(-7), int(3)).unwrap(), int(-1));
    }

    #[test]
    fn overflow_and_division_by_zero_panic() {
        let err = binary(&Instruction::BinaryAdd, int(i64::MAX), int(1)).unwrap_err();
        assert_eq!(err, RuntimeError::panic("integer overflow"));
        let err = binary(&Instruction::BinaryModulo, int(1), int(0)).unwrap_err();
        assert_eq!(err, RuntimeError::panic("division by zero"));
        let err = binary(&Instruction::BinaryRealDiv, int(1), int(0)).unwrap_err();
        assert_eq!(err, RuntimeError::panic("division by zero"));
        let err = unary(&Instruction::UnaryMinus, int(i64::MIN)).unwrap_err();
        assert!(err.is_panic());
    }

    #[test]
    fn division_widens_integers() {
        assert_eq!(
            binary(&Instruction::BinaryRealDiv, int(7), int(2)).unwrap(),
            Value::RealNumber(3.5)
        );
        assert_eq!(
            binary(&Instruction::BinaryRealDiv, Value::RealNumber(1.0), int(4)).unwrap(),
            Value::RealNumber(0.25)
        );
    }

    #[test]
    fn comparisons() {
        assert_eq!(binary(&Instruction::BinaryLt, int(1), int(2)).unwrap(), Value::Boolean(true));
        assert_eq!(binary(&Instruction::BinaryGtEq, int(2), int(2)).unwrap(), Value::Boolean(true));
        assert_eq!(
            binary(&Instruction::BinaryGt, Value::string("a"), Value::string("b")).unwrap(),
            Value::Boolean(false)
        );
        assert_eq!(
            binary(&Instruction::BinaryNotEq, Value::list(vec![int(1)]), Value::list(vec![int(1)])).unwrap(),
            Value::Boolean(false)
        );
        assert!(binary(&Instruction::BinaryLt, Value::list(vec![]), int(1)).is_err());
    }

    #[test]
    fn indexing() {
        let list = Value::list(vec![int(1), int(2), int(3)]);
        assert_eq!(binary(&Instruction::BinaryListIndex, list.clone(), int(2)).unwrap(), int(3));
        let err = binary(&Instruction::BinaryListIndex, list, int(500)).unwrap_err();
        assert_eq!(err, RuntimeError::panic("index out of bounds"));

        assert_eq!(
            binary(&Instruction::BinaryStringIndex, Value::string("abc"), int(1)).unwrap(),
            Value::Character(b'b')
        );

        let map: VeniceMap = [(Value::string("k"), int(1))].into_iter().collect();
        let map = Value::map(map);
        assert_eq!(
            binary(&Instruction::BinaryMapIndex, map.clone(), Value::string("k")).unwrap(),
            Value::some(int(1))
        );
        assert_eq!(
            binary(&Instruction::BinaryMapIndex, map, Value::string("x")).unwrap(),
            Value::none()
        );
    }

    #[test]
    fn concat_and_membership() {
        assert_eq!(
            binary(&Instruction::BinaryConcat, Value::string("ab"), Value::string("cd")).unwrap(),
            Value::string("abcd")
        );
        assert_eq!(
            binary(&Instruction::BinaryConcat, Value::list(vec![int(1)]), Value::list(vec![int(2)])).unwrap(),
            Value::list(vec![int(1), int(2)])
        );
        assert_eq!(
            binary(&Instruction::BinaryIn, int(2), Value::list(vec![int(1), int(2)])).unwrap(),
            Value::Boolean(true)
        );
        assert_eq!(
            binary(&Instruction::BinaryIn, Value::Character(b'z'), Value::string("abc")).unwrap(),
            Value::Boolean(false)
        );
        assert_eq!(
            binary(&Instruction::BinaryIn, Value::string("bc"), Value::string("abc")).unwrap(),
            Value::Boolean(true)
        );
    }

    #[test]
    fn unary_operators() {
        assert_eq!(unary(&Instruction::UnaryMinus, int(3)).unwrap(), int(-3));
        assert_eq!(unary(&Instruction::UnaryNot, Value::Boolean(true)).unwrap(), Value::Boolean(false));
        assert!(unary(&Instruction::UnaryNot, int(1)).is_err());
    }
}
