// ABOUTME: Lowers a subset of the AST to a linear bytecode instruction stream

use thiserror::Error;

use crate::ast::{Expression, Program, Statement};
use crate::bytecode::{make, Opcode};
use crate::object::Object;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum CompileError {
    #[error("unknown operator {0}")]
    UnknownOperator(String),
}

/// A compiled program: the flat instruction stream plus the constant pool it indexes
/// into via `OpConstant`. Handed off to the VM as-is.
#[derive(Debug, Clone)]
pub struct Bytecode {
    pub instructions: Vec<u8>,
    pub constants: Vec<Object>,
}

/// Growing instruction buffer and constant pool. `Compile` is called once per AST node
/// and recurses; unsupported constructs in this core profile are silently skipped —
/// only program/expression-statement/infix-arithmetic/integer/boolean lower to
/// instructions.
pub struct Compiler {
    instructions: Vec<u8>,
    constants: Vec<Object>,
}

impl Compiler {
    pub fn new() -> Self {
        Compiler {
            instructions: Vec::new(),
            constants: Vec::new(),
        }
    }

    pub fn compile_program(&mut self, program: &Program) -> Result<(), CompileError> {
        for statement in &program.statements {
            self.compile_statement(statement)?;
        }
        Ok(())
    }

    fn compile_statement(&mut self, statement: &Statement) -> Result<(), CompileError> {
        match statement {
            Statement::Expression(s) => {
                self.compile_expression(&s.expression)?;
                self.emit(Opcode::Pop, &[]);
                Ok(())
            }
            // Every other statement kind is outside this core compiler's supported
            // construct list and is silently skipped.
            _ => Ok(()),
        }
    }

    fn compile_expression(&mut self, expression: &Expression) -> Result<(), CompileError> {
        match expression {
            Expression::Infix(e) => {
                self.compile_expression(&e.left)?;
                self.compile_expression(&e.right)?;
                match e.operator.as_str() {
                    "+" => self.emit(Opcode::Add, &[]),
                    "-" => self.emit(Opcode::Sub, &[]),
                    "*" => self.emit(Opcode::Mul, &[]),
                    "/" => self.emit(Opcode::Div, &[]),
                    other => return Err(CompileError::UnknownOperator(other.to_string())),
                };
                Ok(())
            }
            Expression::IntegerLiteral { value, .. } => {
                let constant = self.add_constant(Object::Integer(*value));
                self.emit(Opcode::Constant, &[constant]);
                Ok(())
            }
            Expression::Boolean { value, .. } => {
                if *value {
                    self.emit(Opcode::True, &[]);
                } else {
                    self.emit(Opcode::False, &[]);
                }
                Ok(())
            }
            // Unsupported in this core profile (only the constructs above lower to
            // instructions); a fuller compiler would extend coverage here.
            _ => Ok(()),
        }
    }

    pub fn bytecode(self) -> Bytecode {
        Bytecode {
            instructions: self.instructions,
            constants: self.constants,
        }
    }

    fn add_constant(&mut self, obj: Object) -> usize {
        self.constants.push(obj);
        self.constants.len() - 1
    }

    fn emit(&mut self, op: Opcode, operands: &[usize]) -> usize {
        let ins = make(op, operands);
        self.add_instruction(ins)
    }

    fn add_instruction(&mut self, ins: Vec<u8>) -> usize {
        let pos = self.instructions.len();
        self.instructions.extend(ins);
        pos
    }
}

impl Default for Compiler {
    fn default() -> Self {
        Self::new()
    }
}

/// Compiles a complete program in one call, the shape `main.rs`/`repl.rs` use.
pub fn compile(program: &Program) -> Result<Bytecode, CompileError> {
    let mut compiler = Compiler::new();
    compiler.compile_program(program)?;
    Ok(compiler.bytecode())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    fn compile_source(input: &str) -> Bytecode {
        let (program, errors) = parse(input);
        assert!(errors.is_empty(), "parser errors: {:?}", errors);
        compile(&program).expect("compile error")
    }

    #[test]
    fn compiles_integer_addition_per_spec_scenario() {
        let bytecode = compile_source("1 + 2;");
        assert_eq!(bytecode.constants, vec![Object::Integer(1), Object::Integer(2)]);

        let expected = {
            let mut ins = Vec::new();
            ins.extend(make(Opcode::Constant, &[0]));
            ins.extend(make(Opcode::Constant, &[1]));
            ins.extend(make(Opcode::Add, &[]));
            ins.extend(make(Opcode::Pop, &[]));
            ins
        };
        assert_eq!(bytecode.instructions, expected);
    }

    #[test]
    fn compiles_boolean_literal_without_constant_pool_slot() {
        let bytecode = compile_source("true;");
        assert!(bytecode.constants.is_empty());
        assert_eq!(
            bytecode.instructions,
            [make(Opcode::True, &[]), make(Opcode::Pop, &[])].concat()
        );
    }

    #[test]
    fn every_expression_statement_emits_exactly_one_pop() {
        let bytecode = compile_source("1 + 2; 3 - 4; true;");
        let pop_count = bytecode
            .instructions
            .iter()
            .filter(|&&b| b == Opcode::Pop as u8)
            .count();
        assert_eq!(pop_count, 3);
    }

    #[test]
    fn unknown_infix_operator_is_a_compile_error() {
        // The parser would never itself produce `%`, so construct the AST node by hand
        // to exercise the compiler's own defensive check.
        use crate::ast::{Expression, InfixExpression};
        use crate::token::{Token, TokenType};

        let node = Expression::Infix(InfixExpression {
            token: Token::new(TokenType::Illegal, "%"),
            left: Box::new(Expression::IntegerLiteral {
                token: Token::new(TokenType::Int, "1"),
                value: 1,
            }),
            operator: "%".to_string(),
            right: Box::new(Expression::IntegerLiteral {
                token: Token::new(TokenType::Int, "2"),
                value: 2,
            }),
        });

        let mut compiler = Compiler::new();
        let err = compiler.compile_expression(&node).unwrap_err();
        assert_eq!(err, CompileError::UnknownOperator("%".to_string()));
    }
}
