use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::error::ParseError;

/// The built-in instructions. User instructions may not reuse these names.
pub const PRIMITIVE_INSTRUCTIONS: &[&str] = &["move", "turnleft", "turnright", "infect", "skip"];

const INDENT: usize = 2;

pub fn is_primitive(name: &str) -> bool {
    PRIMITIVE_INSTRUCTIONS.contains(&name)
}

#[derive(Clone, Debug, PartialEq)]
pub struct Program {
    name: String,
    context: Context,
    body: Statement,
}

impl Program {
    pub fn new(name: String, context: Context, body: Statement) -> Self {
        Self {
            name,
            context,
            body,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn context(&self) -> &Context {
        &self.context
    }

    pub fn body(&self) -> &Statement {
        &self.body
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "PROGRAM {} IS", self.name)?;
        writeln!(f)?;

        for instruction in self.context.iter() {
            indent(f, 1)?;
            writeln!(f, "INSTRUCTION {} IS", instruction.name)?;
            write_statement(f, &instruction.body, 2)?;
            indent(f, 1)?;
            writeln!(f, "END {}", instruction.name)?;
            writeln!(f)?;
        }

        writeln!(f, "BEGIN")?;
        write_statement(f, &self.body, 1)?;
        writeln!(f, "END {}", self.name)
    }
}

/// The user-defined instructions of a program.
///
/// Declaration order is kept for printing but two contexts are equal when
/// they map the same names to the same bodies.
#[derive(Clone, Debug, Default)]
pub struct Context {
    instructions: Vec<Instruction>,
    index: HashMap<String, usize>,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&Statement> {
        self.index.get(name).map(|&i| &self.instructions[i].body)
    }

    /// Adds an instruction, handing it back if its name is already taken.
    pub fn add(&mut self, instruction: Instruction) -> Result<(), Instruction> {
        match self.index.entry(instruction.name.clone()) {
            Entry::Occupied(_) => Err(instruction),
            Entry::Vacant(entry) => {
                entry.insert(self.instructions.len());
                self.instructions.push(instruction);
                Ok(())
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Instruction> {
        self.instructions.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.instructions.iter().map(|instruction| instruction.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }
}

impl PartialEq for Context {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .all(|instruction| other.get(&instruction.name) == Some(&instruction.body))
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Instruction {
    pub name: String,
    pub body: Statement,
}

impl Instruction {
    pub fn new(name: String, body: Statement) -> Self {
        Self { name, body }
    }
}

pub type Block = Vec<Statement>;

#[derive(Clone, Debug, PartialEq)]
pub enum Statement {
    Block(Block),
    If(IfStmt),
    IfElse(IfElseStmt),
    While(WhileStmt),
    Call(String),
}

impl Statement {
    pub fn kind(&self) -> Kind {
        match *self {
            Statement::Block(_) => Kind::Block,
            Statement::If(_) => Kind::If,
            Statement::IfElse(_) => Kind::IfElse,
            Statement::While(_) => Kind::While,
            Statement::Call(_) => Kind::Call,
        }
    }

    pub fn call<S: Into<String>>(name: S) -> Self {
        Statement::Call(name.into())
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write_statement(f, self, 0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Kind {
    Block,
    If,
    IfElse,
    While,
    Call,
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match *self {
            Kind::Block => "BLOCK",
            Kind::If => "IF",
            Kind::IfElse => "IF_ELSE",
            Kind::While => "WHILE",
            Kind::Call => "CALL",
        })
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct IfStmt {
    pub test: Condition,
    pub consequent: Box<Statement>,
}

impl IfStmt {
    pub fn new(test: Condition, consequent: Statement) -> Self {
        Self {
            test,
            consequent: Box::new(consequent),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct IfElseStmt {
    pub test: Condition,
    pub consequent: Box<Statement>,
    pub alternate: Box<Statement>,
}

impl IfElseStmt {
    pub fn new(test: Condition, consequent: Statement, alternate: Statement) -> Self {
        Self {
            test,
            consequent: Box::new(consequent),
            alternate: Box::new(alternate),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct WhileStmt {
    pub test: Condition,
    pub body: Box<Statement>,
}

impl WhileStmt {
    pub fn new(test: Condition, body: Statement) -> Self {
        Self {
            test,
            body: Box::new(body),
        }
    }
}

/// A test on the robot's surroundings.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Condition {
    NextIsEmpty,
    NextIsNotEmpty,
    NextIsWall,
    NextIsNotWall,
    NextIsFriend,
    NextIsNotFriend,
    NextIsEnemy,
    NextIsNotEnemy,
    Random,
    True,
}

impl Condition {
    pub fn as_str(&self) -> &'static str {
        match *self {
            Condition::NextIsEmpty => "next-is-empty",
            Condition::NextIsNotEmpty => "next-is-not-empty",
            Condition::NextIsWall => "next-is-wall",
            Condition::NextIsNotWall => "next-is-not-wall",
            Condition::NextIsFriend => "next-is-friend",
            Condition::NextIsNotFriend => "next-is-not-friend",
            Condition::NextIsEnemy => "next-is-enemy",
            Condition::NextIsNotEnemy => "next-is-not-enemy",
            Condition::Random => "random",
            Condition::True => "true",
        }
    }
}

impl FromStr for Condition {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "next-is-empty" => Condition::NextIsEmpty,
            "next-is-not-empty" => Condition::NextIsNotEmpty,
            "next-is-wall" => Condition::NextIsWall,
            "next-is-not-wall" => Condition::NextIsNotWall,
            "next-is-friend" => Condition::NextIsFriend,
            "next-is-not-friend" => Condition::NextIsNotFriend,
            "next-is-enemy" => Condition::NextIsEnemy,
            "next-is-not-enemy" => Condition::NextIsNotEnemy,
            "random" => Condition::Random,
            "true" => Condition::True,
            _ => return Err(ParseError::InvalidCondition(s.to_string())),
        })
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn indent(f: &mut fmt::Formatter, level: usize) -> fmt::Result {
    write!(f, "{:width$}", "", width = level * INDENT)
}

fn write_statement(f: &mut fmt::Formatter, statement: &Statement, level: usize) -> fmt::Result {
    match *statement {
        Statement::Block(ref block) => {
            for child in block {
                write_statement(f, child, level)?;
            }
            Ok(())
        }
        Statement::If(ref stmt) => {
            indent(f, level)?;
            writeln!(f, "IF {} THEN", stmt.test)?;
            write_statement(f, &stmt.consequent, level + 1)?;
            indent(f, level)?;
            writeln!(f, "END IF")
        }
        Statement::IfElse(ref stmt) => {
            indent(f, level)?;
            writeln!(f, "IF {} THEN", stmt.test)?;
            write_statement(f, &stmt.consequent, level + 1)?;
            indent(f, level)?;
            writeln!(f, "ELSE")?;
            write_statement(f, &stmt.alternate, level + 1)?;
            indent(f, level)?;
            writeln!(f, "END IF")
        }
        Statement::While(ref stmt) => {
            indent(f, level)?;
            writeln!(f, "WHILE {} DO", stmt.test)?;
            write_statement(f, &stmt.body, level + 1)?;
            indent(f, level)?;
            writeln!(f, "END WHILE")
        }
        Statement::Call(ref name) => {
            indent(f, level)?;
            writeln!(f, "{}", name)
        }
    }
}
