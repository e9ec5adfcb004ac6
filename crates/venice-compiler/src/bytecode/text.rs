//! Text encoding of compiled programs.
//!
//! ```text
//! version 1
//! import "lib/geometry.vn" "Geometry"
//!
//! main:
//!   PUSH_CONST_INT 1
//!   PUSH_CONST_INT 2
//!   BINARY_ADD
//!   STORE_NAME "x"
//! ```
//!
//! Operands are whitespace separated: strings are double-quoted with
//! backslash escapes, integers are bare, booleans are `0` or `1`.

use std::fmt::Write;

use ordered_float::OrderedFloat;
use venice_core::{Builtin, BytecodeError};

use super::instruction::write_quoted;
use super::{CompiledProgram, FunctionRef, Import, Instruction};

type Result<T> = std::result::Result<T, BytecodeError>;

impl CompiledProgram {
    /// Serialize to the text format.
    ///
    /// The entry function comes first and the others follow in name order,
    /// so equal programs always serialize identically.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = self.write_text(&mut out);
        out
    }

    fn write_text(&self, out: &mut String) -> std::fmt::Result {
        writeln!(out, "version {}", self.version)?;
        for import in &self.imports {
            out.push_str("import ");
            write_quoted(out, &import.path)?;
            out.push(' ');
            write_quoted(out, &import.alias)?;
            out.push('\n');
        }
        for name in self.function_names() {
            writeln!(out)?;
            writeln!(out, "{name}:")?;
            for instruction in self.functions.get(name).into_iter().flatten() {
                writeln!(out, "  {instruction}")?;
            }
        }
        Ok(())
    }

    /// Parse the text format.
    pub fn parse(text: &str) -> Result<CompiledProgram> {
        let mut lines = text
            .lines()
            .enumerate()
            .map(|(i, line)| (i + 1, line))
            .filter(|(_, line)| !line.trim().is_empty());

        let version = match lines.next() {
            Some((line, text)) => text
                .trim()
                .strip_prefix("version ")
                .and_then(|v| v.trim().parse::<u32>().ok())
                .ok_or(BytecodeError::MissingVersion { line })?,
            None => return Err(BytecodeError::MissingVersion { line: 1 }),
        };

        let mut program = CompiledProgram::new(version);
        let mut current: Option<(String, Vec<Instruction>)> = None;

        for (line, raw) in lines {
            let indented = raw.starts_with(char::is_whitespace);
            let text = raw.trim();

            if indented {
                let Some((_, code)) = current.as_mut() else {
                    return Err(BytecodeError::UnexpectedLine {
                        line,
                        text: text.to_string(),
                    });
                };
                code.push(parse_instruction(line, text)?);
            } else if let Some(rest) = text.strip_prefix("import ") {
                if current.is_some() {
                    return Err(BytecodeError::UnexpectedLine {
                        line,
                        text: text.to_string(),
                    });
                }
                let mut operands = Operands::new(line, "import", rest)?;
                let path = operands.string()?;
                let alias = operands.string()?;
                operands.finish()?;
                program.imports.push(Import { path, alias });
            } else if let Some(name) = text.strip_suffix(':') {
                if let Some((name, code)) = current.take() {
                    program.functions.insert(name, code);
                }
                current = Some((name.to_string(), Vec::new()));
            } else {
                return Err(BytecodeError::UnexpectedLine {
                    line,
                    text: text.to_string(),
                });
            }
        }

        if let Some((name, code)) = current {
            program.functions.insert(name, code);
        }
        Ok(program)
    }
}

fn parse_instruction(line: usize, text: &str) -> Result<Instruction> {
    use Instruction::*;

    let (opcode, rest) = text.split_once(char::is_whitespace).unwrap_or((text, ""));
    let mut ops = Operands::new(line, opcode, rest)?;

    let instruction = match opcode {
        "BINARY_ADD" => BinaryAdd,
        "BINARY_SUB" => BinarySub,
        "BINARY_MUL" => BinaryMul,
        "BINARY_MODULO" => BinaryModulo,
        "BINARY_REAL_ADD" => BinaryRealAdd,
        "BINARY_REAL_SUB" => BinaryRealSub,
        "BINARY_REAL_MUL" => BinaryRealMul,
        "BINARY_REAL_DIV" => BinaryRealDiv,
        "BINARY_CONCAT" => BinaryConcat,
        "BINARY_EQ" => BinaryEq,
        "BINARY_NOT_EQ" => BinaryNotEq,
        "BINARY_LT" => BinaryLt,
        "BINARY_LT_EQ" => BinaryLtEq,
        "BINARY_GT" => BinaryGt,
        "BINARY_GT_EQ" => BinaryGtEq,
        "BINARY_IN" => BinaryIn,
        "BINARY_LIST_INDEX" => BinaryListIndex,
        "BINARY_MAP_INDEX" => BinaryMapIndex,
        "BINARY_STRING_INDEX" => BinaryStringIndex,
        "UNARY_MINUS" => UnaryMinus,
        "UNARY_NOT" => UnaryNot,
        "BUILD_CLASS" => BuildClass(ops.string()?, ops.count()?),
        "BUILD_LIST" => BuildList(ops.count()?),
        "BUILD_MAP" => BuildMap(ops.count()?),
        "BUILD_TUPLE" => BuildTuple(ops.count()?),
        "PUSH_ENUM" => PushEnum(ops.string()?, ops.count()?),
        "CALL_FUNCTION" => CallFunction(ops.count()?),
        "LOOKUP_METHOD" => LookupMethod(ops.function()?),
        "PUSH_CONST_FUNCTION" => PushConstFunction(ops.function()?),
        "RETURN" => Return,
        "CHECK_LABEL" => CheckLabel(ops.string()?),
        "PUSH_ENUM_INDEX" => PushEnumIndex(ops.count()?),
        "DUP_TOP" => DupTop,
        "POP_TOP" => PopTop,
        "GET_ITER" => GetIter,
        "FOR_ITER" => ForIter(ops.integer()?),
        "UNPACK_TUPLE" => UnpackTuple,
        "PUSH_CONST_BOOL" => PushConstBool(ops.boolean()?),
        "PUSH_CONST_INT" => PushConstInt(ops.integer()?),
        "PUSH_CONST_REAL_NUMBER" => PushConstReal(ops.real()?),
        "PUSH_CONST_STR" => PushConstStr(ops.string()?),
        "PUSH_CONST_CHAR" => PushConstChar(ops.byte()?),
        "PUSH_NAME" => PushName(ops.string()?),
        "STORE_NAME" => StoreName(ops.string()?),
        "STORE_GLOBAL" => StoreGlobal(ops.string()?),
        "PUSH_FIELD" => PushField(ops.count()?),
        "PUSH_TUPLE_FIELD" => PushTupleField(ops.count()?),
        "STORE_FIELD" => StoreField(ops.count()?),
        "STORE_INDEX" => StoreIndex,
        "STORE_MAP_INDEX" => StoreMapIndex,
        "REL_JUMP" => RelJump(ops.integer()?),
        "REL_JUMP_IF_FALSE" => RelJumpIfFalse(ops.integer()?),
        "REL_JUMP_IF_FALSE_OR_POP" => RelJumpIfFalseOrPop(ops.integer()?),
        "REL_JUMP_IF_TRUE_OR_POP" => RelJumpIfTrueOrPop(ops.integer()?),
        "PLACEHOLDER" => Placeholder,
        _ => {
            return Err(BytecodeError::UnknownOpcode {
                line,
                opcode: opcode.to_string(),
            });
        }
    };
    ops.finish()?;
    Ok(instruction)
}

#[derive(Debug)]
enum Token {
    Quoted(String),
    Bare(String),
}

/// Operand cursor for one line.
struct Operands<'a> {
    line: usize,
    opcode: &'a str,
    tokens: std::vec::IntoIter<Token>,
}

impl<'a> Operands<'a> {
    fn new(line: usize, opcode: &'a str, text: &str) -> Result<Self> {
        let mut tokens = Vec::new();
        let mut chars = text.chars().peekable();
        while let Some(&c) = chars.peek() {
            if c.is_whitespace() {
                chars.next();
            } else if c == '"' {
                chars.next();
                let mut s = String::new();
                loop {
                    match chars.next() {
                        Some('"') => break,
                        Some('\\') => match chars.next() {
                            Some('n') => s.push('\n'),
                            Some('t') => s.push('\t'),
                            Some('r') => s.push('\r'),
                            Some(other @ ('"' | '\\')) => s.push(other),
                            other => {
                                return Err(BytecodeError::InvalidOperand {
                                    line,
                                    opcode: opcode.to_string(),
                                    message: format!("invalid escape {other:?}"),
                                });
                            }
                        },
                        Some(other) => s.push(other),
                        None => {
                            return Err(BytecodeError::InvalidOperand {
                                line,
                                opcode: opcode.to_string(),
                                message: "unterminated string".to_string(),
                            });
                        }
                    }
                }
                tokens.push(Token::Quoted(s));
            } else {
                let mut s = String::new();
                while let Some(&c) = chars.peek() {
                    if c.is_whitespace() {
                        break;
                    }
                    s.push(c);
                    chars.next();
                }
                tokens.push(Token::Bare(s));
            }
        }
        Ok(Self {
            line,
            opcode,
            tokens: tokens.into_iter(),
        })
    }

    fn error(&self, message: impl Into<String>) -> BytecodeError {
        BytecodeError::InvalidOperand {
            line: self.line,
            opcode: self.opcode.to_string(),
            message: message.into(),
        }
    }

    fn string(&mut self) -> Result<String> {
        match self.tokens.next() {
            Some(Token::Quoted(s)) => Ok(s),
            Some(Token::Bare(s)) => Err(self.error(format!("expected string, found {s}"))),
            None => Err(self.error("missing string operand")),
        }
    }

    fn bare(&mut self) -> Result<String> {
        match self.tokens.next() {
            Some(Token::Bare(s)) => Ok(s),
            Some(Token::Quoted(s)) => Err(self.error(format!("unexpected string \"{s}\""))),
            None => Err(self.error("missing operand")),
        }
    }

    fn integer(&mut self) -> Result<i64> {
        let token = self.bare()?;
        token
            .parse()
            .map_err(|_| self.error(format!("expected integer, found {token}")))
    }

    fn count(&mut self) -> Result<usize> {
        let token = self.bare()?;
        token
            .parse()
            .map_err(|_| self.error(format!("expected count, found {token}")))
    }

    fn byte(&mut self) -> Result<u8> {
        let token = self.bare()?;
        token
            .parse()
            .map_err(|_| self.error(format!("expected character code, found {token}")))
    }

    fn real(&mut self) -> Result<OrderedFloat<f64>> {
        let token = self.bare()?;
        token
            .parse::<f64>()
            .map(OrderedFloat)
            .map_err(|_| self.error(format!("expected real number, found {token}")))
    }

    fn boolean(&mut self) -> Result<bool> {
        match self.bare()?.as_str() {
            "0" => Ok(false),
            "1" => Ok(true),
            other => Err(self.error(format!("expected 0 or 1, found {other}"))),
        }
    }

    fn function(&mut self) -> Result<FunctionRef> {
        let name = self.string()?;
        if self.boolean()? {
            Builtin::from_name(&name)
                .map(FunctionRef::Builtin)
                .ok_or_else(|| self.error(format!("unknown builtin {name}")))
        } else {
            Ok(FunctionRef::User(name))
        }
    }

    fn finish(mut self) -> Result<()> {
        match self.tokens.next() {
            None => Ok(()),
            Some(Token::Bare(s) | Token::Quoted(s)) => {
                Err(self.error(format!("unexpected operand {s}")))
            }
        }
    }
}
