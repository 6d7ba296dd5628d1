//! Static properties of statement trees.
//!
//! Every analysis takes the tree by shared reference, so running one leaves
//! the tree exactly as it was.

use crate::ast::{self, Program, Statement};

/// Counts the calls to primitive instructions in `statement`.
///
/// Loop bodies are counted once and calls to user-defined instructions are not
/// followed, so this is a property of the text rather than of an execution.
pub fn count_primitive_calls(statement: &Statement) -> usize {
    match *statement {
        Statement::Block(ref block) => block.iter().map(count_primitive_calls).sum(),
        Statement::If(ref stmt) => count_primitive_calls(&stmt.consequent),
        Statement::IfElse(ref stmt) => {
            count_primitive_calls(&stmt.consequent) + count_primitive_calls(&stmt.alternate)
        }
        Statement::While(ref stmt) => count_primitive_calls(&stmt.body),
        Statement::Call(ref name) => {
            if ast::is_primitive(name) {
                1
            } else {
                0
            }
        }
    }
}

/// Counts the primitive calls in the program body and in every instruction
/// body.
pub fn count_primitive_calls_in_program(program: &Program) -> usize {
    let in_instructions: usize = program
        .context()
        .iter()
        .map(|instruction| count_primitive_calls(&instruction.body))
        .sum();

    in_instructions + count_primitive_calls(program.body())
}
