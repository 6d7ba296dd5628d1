use std::collections::VecDeque;
use std::str::Chars;

use crate::ast::Condition;

/// The marker closing every token stream. It can never be produced by the
/// lexer since it contains whitespace.
pub const END_OF_INPUT: &str = "### END OF INPUT ###";

const KEYWORDS: &[&str] = &[
    "PROGRAM",
    "INSTRUCTION",
    "IS",
    "BEGIN",
    "END",
    "IF",
    "ELSE",
    "THEN",
    "WHILE",
    "DO",
];

pub struct Lexer<'input> {
    src: Chars<'input>,
    peek: Option<char>,
}

impl<'input> Lexer<'input> {
    pub fn new(src: &'input str) -> Self {
        Self {
            src: src.chars(),
            peek: None,
        }
    }

    fn next_char(&mut self) -> Option<char> {
        self.peek.take().or_else(|| self.src.next())
    }

    fn push_char(&mut self, c: char) {
        assert!(self.peek.is_none());
        self.peek = Some(c);
    }
}

impl<'input> Iterator for Lexer<'input> {
    type Item = String;

    fn next(&mut self) -> Option<Self::Item> {
        let mut buf = String::new();

        while let Some(c) = self.next_char() {
            if c.is_whitespace() {
                if buf.is_empty() {
                    // Ignore consecutive whitespace.
                    continue;
                } else {
                    // At the end of a token.
                    break;
                }
            }

            if !is_word_char(c) {
                if buf.is_empty() {
                    return Some(c.to_string());
                } else {
                    self.push_char(c);
                    break;
                }
            }

            buf.push(c);
        }

        if buf.is_empty() {
            None
        } else {
            Some(buf)
        }
    }
}

/// A queue of tokens that always ends with [`END_OF_INPUT`].
///
/// The marker can be inspected with `front` but is never removed, so a parser
/// running off the end of its input sees the marker instead of an empty queue.
#[derive(Debug)]
pub struct TokenStream {
    tokens: VecDeque<String>,
}

impl TokenStream {
    /// Builds a stream from `tokens`, ending it at the first end of input
    /// marker if there is one. Tokens after that marker are dropped.
    pub fn new<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut tokens: VecDeque<String> = tokens
            .into_iter()
            .map(Into::into)
            .take_while(|token| token != END_OF_INPUT)
            .collect();
        tokens.push_back(END_OF_INPUT.into());

        Self { tokens }
    }

    pub fn front(&self) -> &str {
        self.tokens.front().map_or(END_OF_INPUT, String::as_str)
    }

    /// Removes and returns the front token, or `None` when only the end of
    /// input marker is left.
    pub fn dequeue(&mut self) -> Option<String> {
        if self.is_at_end() {
            None
        } else {
            self.tokens.pop_front()
        }
    }

    pub fn is_at_end(&self) -> bool {
        self.front() == END_OF_INPUT
    }

    /// Number of tokens left, not counting the end of input marker.
    pub fn len(&self) -> usize {
        self.tokens.len().saturating_sub(1)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub fn tokenize(src: &str) -> TokenStream {
    let tokens = TokenStream::new(Lexer::new(src));
    trace!("tokenized {} tokens", tokens.len());
    tokens
}

pub fn is_keyword(token: &str) -> bool {
    KEYWORDS.contains(&token)
}

pub fn is_condition(token: &str) -> bool {
    token.parse::<Condition>().is_ok()
}

/// Reports whether `token` can name a program or an instruction: a letter
/// followed by letters, digits and hyphens, that is not a keyword or a
/// condition.
pub fn is_identifier(token: &str) -> bool {
    let mut chars = token.chars();
    let starts_with_letter = chars.next().map_or(false, |c| c.is_ascii_alphabetic());

    starts_with_letter && chars.all(is_word_char) && !is_keyword(token) && !is_condition(token)
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-'
}
