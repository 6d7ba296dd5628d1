use failure::Fail;

/// A violated rule of the BL grammar. Parsing stops at the first one.
#[derive(Debug, Fail, PartialEq)]
pub enum ParseError {
    #[fail(display = "expected {}, found {}", expected, found)]
    UnexpectedToken {
        expected: &'static str,
        found: String,
    },

    #[fail(display = "expected {}, found end of input", expected)]
    UnexpectedEndOfInput { expected: &'static str },

    #[fail(display = "invalid {} name: {}", what, found)]
    InvalidIdentifier { what: &'static str, found: String },

    #[fail(display = "invalid condition: {}", _0)]
    InvalidCondition(String),

    #[fail(display = "instruction {} redefines a primitive instruction", _0)]
    PrimitiveRedefined(String),

    #[fail(display = "instruction {} already exists", _0)]
    DuplicateInstruction(String),

    #[fail(display = "{} {} ends with {}", what, start, end)]
    NameMismatch {
        what: &'static str,
        start: String,
        end: String,
    },

    #[fail(display = "unrecognized start of statement: {}", _0)]
    UnrecognizedStatement(String),

    #[fail(display = "unexpected {} after end of program", _0)]
    TrailingTokens(String),
}
