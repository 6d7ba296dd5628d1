use std::result;

use crate::ast::{self, Condition, Context, IfElseStmt, IfStmt, Instruction, Program, Statement, WhileStmt};
use crate::error::ParseError;
use crate::lexer::{self, TokenStream};

pub type ParseResult<T> = result::Result<T, ParseError>;

struct Parser<'tokens> {
    tokens: &'tokens mut TokenStream,
}

impl<'tokens> Parser<'tokens> {
    fn new(tokens: &'tokens mut TokenStream) -> Self {
        Self { tokens }
    }

    fn parse_program(&mut self) -> ParseResult<Program> {
        self.expect("PROGRAM")?;
        let name = self.expect_identifier("program")?;
        self.expect("IS")?;

        let mut context = Context::new();
        while self.tokens.front() == "INSTRUCTION" {
            let instruction = self.parse_instruction()?;
            context
                .add(instruction)
                .map_err(|duplicate| ParseError::DuplicateInstruction(duplicate.name))?;
        }

        self.expect("BEGIN")?;
        let body = self.parse_block()?;
        self.expect("END")?;
        self.expect_closing_name("program", &name)?;

        if !self.tokens.is_at_end() {
            return Err(ParseError::TrailingTokens(self.tokens.front().to_string()));
        }

        debug!("parsed program {} with {} instructions", name, context.len());
        Ok(Program::new(name, context, body))
    }

    fn parse_instruction(&mut self) -> ParseResult<Instruction> {
        self.expect("INSTRUCTION")?;
        let name = self.expect_identifier("instruction")?;
        if ast::is_primitive(&name) {
            return Err(ParseError::PrimitiveRedefined(name));
        }

        self.expect("IS")?;
        let body = self.parse_block()?;
        self.expect("END")?;
        self.expect_closing_name("instruction", &name)?;

        debug!("parsed instruction {}", name);
        Ok(Instruction::new(name, body))
    }

    /// Parses statements up to, but not including, the `END` or `ELSE` that
    /// closes the enclosing construct.
    fn parse_block(&mut self) -> ParseResult<Statement> {
        let mut block = Vec::new();

        while !is_block_terminator(self.tokens.front()) {
            let statement = self.parse_statement()?;
            block.push(statement);
        }

        Ok(Statement::Block(block))
    }

    fn parse_statement(&mut self) -> ParseResult<Statement> {
        let token = self.tokens.front().to_string();

        match token.as_str() {
            "IF" => self.parse_if(),
            "WHILE" => self.parse_while(),
            _ if lexer::is_identifier(&token) => {
                let name = self.next_token("statement")?;
                Ok(Statement::Call(name))
            }
            _ if self.tokens.is_at_end() => Err(ParseError::UnexpectedEndOfInput { expected: "statement" }),
            _ => Err(ParseError::UnrecognizedStatement(token)),
        }
    }

    fn parse_if(&mut self) -> ParseResult<Statement> {
        self.expect("IF")?;
        let test = self.parse_condition()?;
        self.expect("THEN")?;
        let consequent = self.parse_block()?;

        let statement = if self.tokens.front() == "ELSE" {
            self.expect("ELSE")?;
            let alternate = self.parse_block()?;
            Statement::IfElse(IfElseStmt::new(test, consequent, alternate))
        } else {
            Statement::If(IfStmt::new(test, consequent))
        };

        self.expect("END")?;
        self.expect("IF")?;

        Ok(statement)
    }

    fn parse_while(&mut self) -> ParseResult<Statement> {
        self.expect("WHILE")?;
        let test = self.parse_condition()?;
        self.expect("DO")?;
        let body = self.parse_block()?;
        self.expect("END")?;
        self.expect("WHILE")?;

        Ok(Statement::While(WhileStmt::new(test, body)))
    }

    fn parse_condition(&mut self) -> ParseResult<Condition> {
        self.next_token("condition")?.parse()
    }

    fn next_token(&mut self, expected: &'static str) -> ParseResult<String> {
        let token = self
            .tokens
            .dequeue()
            .ok_or(ParseError::UnexpectedEndOfInput { expected })?;
        trace!("consumed {}", token);
        Ok(token)
    }

    fn expect(&mut self, keyword: &'static str) -> ParseResult<()> {
        let token = self.next_token(keyword)?;
        if token == keyword {
            Ok(())
        } else {
            Err(ParseError::UnexpectedToken {
                expected: keyword,
                found: token,
            })
        }
    }

    fn expect_identifier(&mut self, what: &'static str) -> ParseResult<String> {
        let token = self.next_token("name")?;
        if lexer::is_identifier(&token) {
            Ok(token)
        } else {
            Err(ParseError::InvalidIdentifier { what, found: token })
        }
    }

    fn expect_closing_name(&mut self, what: &'static str, name: &str) -> ParseResult<()> {
        let token = self.next_token("closing name")?;
        if token == name {
            Ok(())
        } else {
            Err(ParseError::NameMismatch {
                what,
                start: name.to_string(),
                end: token,
            })
        }
    }
}

fn is_block_terminator(token: &str) -> bool {
    token == "END" || token == "ELSE"
}

/// Parses a whole program. The stream must hold nothing after the closing
/// program name.
pub fn parse(tokens: &mut TokenStream) -> ParseResult<Program> {
    Parser::new(tokens).parse_program()
}

/// Parses one `INSTRUCTION name IS ... END name` definition from the front of
/// `tokens`.
pub fn parse_instruction(tokens: &mut TokenStream) -> ParseResult<Instruction> {
    Parser::new(tokens).parse_instruction()
}

pub fn parse_block(tokens: &mut TokenStream) -> ParseResult<Statement> {
    Parser::new(tokens).parse_block()
}

pub fn parse_statement(tokens: &mut TokenStream) -> ParseResult<Statement> {
    Parser::new(tokens).parse_statement()
}

pub fn parse_str(src: &str) -> ParseResult<Program> {
    parse(&mut lexer::tokenize(src))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::PRIMITIVE_INSTRUCTIONS;

    fn block(statements: Vec<Statement>) -> Statement {
        Statement::Block(statements)
    }

    #[test]
    fn simple() {
        let program = parse_str("PROGRAM foo IS BEGIN move turnleft END foo").unwrap();
        assert_eq!(program.name(), "foo");
        assert!(program.context().is_empty());
        assert_eq!(
            program.body(),
            &block(vec![Statement::call("move"), Statement::call("turnleft")]),
        );
    }

    #[test]
    fn empty_body() {
        let program = parse_str("PROGRAM foo IS BEGIN END foo").unwrap();
        assert_eq!(program.body(), &block(vec![]));
    }

    #[test]
    fn if_else() {
        let program =
            parse_str("PROGRAM foo IS BEGIN IF next-is-empty THEN move ELSE turnleft END IF END foo").unwrap();
        assert_eq!(
            program.body(),
            &block(vec![Statement::IfElse(IfElseStmt::new(
                Condition::NextIsEmpty,
                block(vec![Statement::call("move")]),
                block(vec![Statement::call("turnleft")]),
            ))]),
        );
    }

    #[test]
    fn nested() {
        let src = "
            PROGRAM Nested IS
            BEGIN
                WHILE true DO
                    IF next-is-enemy THEN
                        infect
                    END IF
                    IF next-is-wall THEN
                    ELSE
                        move
                    END IF
                END WHILE
            END Nested
        ";
        let program = parse_str(src).unwrap();
        assert_eq!(
            program.body(),
            &block(vec![Statement::While(WhileStmt::new(
                Condition::True,
                block(vec![
                    Statement::If(IfStmt::new(Condition::NextIsEnemy, block(vec![Statement::call("infect")]))),
                    Statement::IfElse(IfElseStmt::new(
                        Condition::NextIsWall,
                        block(vec![]),
                        block(vec![Statement::call("move")]),
                    )),
                ]),
            ))]),
        );
    }

    #[test]
    fn instructions() {
        let src = "
            PROGRAM Walker IS
                INSTRUCTION step IS
                    move
                END step
                INSTRUCTION turn-around IS
                    turnleft turnleft
                END turn-around
            BEGIN
                step turn-around step unknown
            END Walker
        ";
        let program = parse_str(src).unwrap();
        let context = program.context();

        assert_eq!(context.names().collect::<Vec<_>>(), vec!["step", "turn-around"]);
        assert_eq!(context.get("step"), Some(&block(vec![Statement::call("move")])));
        assert_eq!(
            context.get("turn-around"),
            Some(&block(vec![Statement::call("turnleft"), Statement::call("turnleft")])),
        );
        assert_eq!(
            program.body(),
            &block(vec![
                Statement::call("step"),
                Statement::call("turn-around"),
                Statement::call("step"),
                Statement::call("unknown"),
            ]),
        );
    }

    #[test]
    fn block_leaves_terminator() {
        let mut tokens = TokenStream::new(vec!["move", "skip", "ELSE", "infect"]);
        assert_eq!(
            parse_block(&mut tokens).unwrap(),
            block(vec![Statement::call("move"), Statement::call("skip")]),
        );
        assert_eq!(tokens.front(), "ELSE");
    }

    #[test]
    fn single_statement() {
        let mut tokens = lexer::tokenize("WHILE random DO skip END WHILE move");
        assert_eq!(
            parse_statement(&mut tokens).unwrap(),
            Statement::While(WhileStmt::new(Condition::Random, block(vec![Statement::call("skip")]))),
        );
        assert_eq!(tokens.front(), "move");
    }

    #[test]
    fn single_instruction() {
        let mut tokens = lexer::tokenize("INSTRUCTION dance IS turnleft turnright END dance BEGIN");
        let instruction = parse_instruction(&mut tokens).unwrap();
        assert_eq!(instruction.name, "dance");
        assert_eq!(
            instruction.body,
            block(vec![Statement::call("turnleft"), Statement::call("turnright")]),
        );
        assert_eq!(tokens.front(), "BEGIN");
    }

    #[test]
    fn pretty_printed_program_parses_to_itself() {
        let src = "
            PROGRAM Roundtrip IS
                INSTRUCTION hunt IS
                    WHILE next-is-not-enemy DO
                        IF next-is-wall THEN turnright ELSE move END IF
                    END WHILE
                    infect
                END hunt
                INSTRUCTION wait IS END wait
            BEGIN
                WHILE true DO hunt wait IF random THEN skip END IF END WHILE
            END Roundtrip
        ";
        let program = parse_str(src).unwrap();
        assert_eq!(parse_str(&program.to_string()).unwrap(), program);
    }

    #[test]
    fn instruction_order_does_not_affect_equality() {
        let first = parse_str("PROGRAM p IS INSTRUCTION a IS move END a INSTRUCTION b IS skip END b BEGIN a b END p");
        let second = parse_str("PROGRAM p IS INSTRUCTION b IS skip END b INSTRUCTION a IS move END a BEGIN a b END p");
        assert_eq!(first.unwrap(), second.unwrap());
    }

    #[test]
    fn program_name_mismatch() {
        assert_eq!(
            parse_str("PROGRAM foo IS BEGIN move END bar").unwrap_err(),
            ParseError::NameMismatch {
                what: "program",
                start: "foo".into(),
                end: "bar".into(),
            },
        );
    }

    #[test]
    fn instruction_name_mismatch() {
        assert_eq!(
            parse_str("PROGRAM foo IS INSTRUCTION a IS move END b BEGIN END foo").unwrap_err(),
            ParseError::NameMismatch {
                what: "instruction",
                start: "a".into(),
                end: "b".into(),
            },
        );
    }

    #[test]
    fn primitive_redefined() {
        for primitive in PRIMITIVE_INSTRUCTIONS {
            let src = format!(
                "PROGRAM foo IS INSTRUCTION {name} IS skip END {name} BEGIN END foo",
                name = primitive
            );
            assert_eq!(
                parse_str(&src).unwrap_err(),
                ParseError::PrimitiveRedefined(primitive.to_string()),
            );
        }
    }

    #[test]
    fn duplicate_instruction() {
        let src = "PROGRAM p IS INSTRUCTION a IS move END a INSTRUCTION a IS skip END a BEGIN a END p";
        assert_eq!(
            parse_str(src).unwrap_err(),
            ParseError::DuplicateInstruction("a".into()),
        );
    }

    #[test]
    fn trailing_tokens() {
        assert_eq!(
            parse_str("PROGRAM foo IS BEGIN move END foo move").unwrap_err(),
            ParseError::TrailingTokens("move".into()),
        );
    }

    #[test]
    fn invalid_names() {
        assert_eq!(
            parse_str("PROGRAM IS IS BEGIN END IS").unwrap_err(),
            ParseError::InvalidIdentifier {
                what: "program",
                found: "IS".into(),
            },
        );
        assert_eq!(
            parse_str("PROGRAM foo IS INSTRUCTION random IS END random BEGIN END foo").unwrap_err(),
            ParseError::InvalidIdentifier {
                what: "instruction",
                found: "random".into(),
            },
        );
    }

    #[test]
    fn unexpected_tokens() {
        assert_eq!(
            parse_str("PROGRAMME foo IS BEGIN END foo").unwrap_err(),
            ParseError::UnexpectedToken {
                expected: "PROGRAM",
                found: "PROGRAMME".into(),
            },
        );
        assert_eq!(
            parse_str("PROGRAM foo IS BEGIN IF true DO move END IF END foo").unwrap_err(),
            ParseError::UnexpectedToken {
                expected: "THEN",
                found: "DO".into(),
            },
        );
        assert_eq!(
            parse_str("PROGRAM foo IS BEGIN WHILE true DO move END IF END foo").unwrap_err(),
            ParseError::UnexpectedToken {
                expected: "WHILE",
                found: "IF".into(),
            },
        );
        assert_eq!(
            parse_str("PROGRAM foo IS BEGIN IF true THEN move ELSE skip ELSE move END IF END foo").unwrap_err(),
            ParseError::UnexpectedToken {
                expected: "END",
                found: "ELSE".into(),
            },
        );
    }

    #[test]
    fn invalid_condition() {
        assert_eq!(
            parse_str("PROGRAM foo IS BEGIN WHILE next-is-foe DO move END WHILE END foo").unwrap_err(),
            ParseError::InvalidCondition("next-is-foe".into()),
        );
    }

    #[test]
    fn unrecognized_statement() {
        assert_eq!(
            parse_str("PROGRAM foo IS BEGIN move; END foo").unwrap_err(),
            ParseError::UnrecognizedStatement(";".into()),
        );
        assert_eq!(
            parse_str("PROGRAM foo IS BEGIN THEN END foo").unwrap_err(),
            ParseError::UnrecognizedStatement("THEN".into()),
        );
    }

    #[test]
    fn truncated_input() {
        assert_eq!(
            parse_str("PROGRAM foo IS BEGIN move").unwrap_err(),
            ParseError::UnexpectedEndOfInput { expected: "statement" },
        );
        assert_eq!(
            parse_str("PROGRAM foo IS BEGIN move END").unwrap_err(),
            ParseError::UnexpectedEndOfInput {
                expected: "closing name",
            },
        );
        assert_eq!(
            parse_str("").unwrap_err(),
            ParseError::UnexpectedEndOfInput { expected: "PROGRAM" },
        );
    }
}
