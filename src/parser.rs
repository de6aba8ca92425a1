use serde_json::{Map, Number, Value};

use crate::ast::*;
use crate::field::{ArgumentError, FieldArgument};
use crate::lexer::{LexError, Lexer, Token};

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Lex error: {0}")]
    Lex(#[from] LexError),
    #[error("Unexpected token: {0:?}, expected {1}")]
    Unexpected(Token, &'static str),
    #[error("Unexpected end of input")]
    UnexpectedEof,
    #[error("Invalid argument for field {field}: {source}")]
    InvalidArgument {
        field: String,
        source: ArgumentError,
    },
    #[error("Unknown schema key: {0}")]
    UnknownSeedKey(String),
    #[error("Invalid value for schema key {key}: expected {expected}")]
    InvalidSeed { key: String, expected: &'static str },
}

fn unexpected(tok: Token, expected: &'static str) -> ParseError {
    match tok {
        Token::Eof => ParseError::UnexpectedEof,
        tok => ParseError::Unexpected(tok, expected),
    }
}

pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    pub fn new(input: &str) -> Result<Self, ParseError> {
        let tokens = Lexer::new(input).tokenize()?;
        Ok(Self { tokens, pos: 0 })
    }

    fn peek(&self) -> &Token {
        self.tokens.get(self.pos).unwrap_or(&Token::Eof)
    }

    fn advance(&mut self) -> &Token {
        let tok = self.tokens.get(self.pos).unwrap_or(&Token::Eof);
        self.pos += 1;
        tok
    }

    fn expect_ident(&mut self) -> Result<String, ParseError> {
        match self.advance().clone() {
            Token::Ident(s) => Ok(s),
            tok => Err(unexpected(tok, "identifier")),
        }
    }

    fn expect_str(&mut self) -> Result<String, ParseError> {
        match self.advance().clone() {
            Token::Str(s) => Ok(s),
            tok => Err(unexpected(tok, "string")),
        }
    }

    fn expect(&mut self, expected: Token, what: &'static str) -> Result<(), ParseError> {
        let tok = self.advance().clone();
        if tok == expected {
            Ok(())
        } else {
            Err(unexpected(tok, what))
        }
    }

    fn check_ident(&self, name: &str) -> bool {
        matches!(self.peek(), Token::Ident(s) if s == name)
    }

    pub fn parse(&mut self) -> Result<Declarations, ParseError> {
        let mut classes = Vec::new();

        while *self.peek() != Token::Eof {
            if self.check_ident("class") {
                self.advance();
                classes.push(self.parse_class()?);
            } else {
                return Err(unexpected(self.peek().clone(), "class"));
            }
        }

        Ok(Declarations { classes })
    }

    fn parse_class(&mut self) -> Result<Class, ParseError> {
        let ident = self.expect_ident()?;

        let mut model = None;
        if self.check_ident("model") {
            self.advance();
            let name = self.expect_str()?;
            let embedded = self.check_ident("embedded");
            if embedded {
                self.advance();
            }
            model = Some(Model { name, embedded });
        }

        self.expect(Token::LBrace, "{")?;

        let mut members = Vec::new();
        while *self.peek() != Token::RBrace {
            if *self.peek() == Token::At {
                members.push(Member::Seed(self.parse_seed()?));
            } else {
                members.push(Member::Field(self.parse_field()?));
            }
        }

        self.expect(Token::RBrace, "}")?;

        Ok(Class {
            ident,
            model,
            members,
        })
    }

    fn parse_field(&mut self) -> Result<Field, ParseError> {
        let name = self.expect_ident()?;
        if !matches!(self.peek(), Token::Str(_) | Token::LBrace) {
            return Err(unexpected(self.advance().clone(), "type string or { config }"));
        }
        let value = self.parse_value()?;
        let argument = FieldArgument::from_value(value).map_err(|source| {
            ParseError::InvalidArgument {
                field: name.clone(),
                source,
            }
        })?;
        Ok(Field { name, argument })
    }

    /// `@schema.<key> = <value>`
    fn parse_seed(&mut self) -> Result<Seed, ParseError> {
        self.expect(Token::At, "@")?;
        if !self.check_ident("schema") {
            return Err(unexpected(self.advance().clone(), "schema"));
        }
        self.advance();
        self.expect(Token::Dot, ".")?;
        let key = self.expect_ident()?;
        self.expect(Token::Eq, "=")?;
        let value = self.parse_value()?;

        let invalid = |expected: &'static str| ParseError::InvalidSeed {
            key: key.clone(),
            expected,
        };
        match key.as_str() {
            "name" => value
                .as_str()
                .map(|s| Seed::Name(s.to_string()))
                .ok_or_else(|| invalid("string")),
            "primaryKey" => value
                .as_str()
                .map(|s| Seed::PrimaryKey(s.to_string()))
                .ok_or_else(|| invalid("string")),
            "embedded" => value.as_bool().map(Seed::Embedded).ok_or_else(|| invalid("boolean")),
            "asymmetric" => value.as_bool().map(Seed::Asymmetric).ok_or_else(|| invalid("boolean")),
            _ => Err(ParseError::UnknownSeedKey(key.clone())),
        }
    }

    fn parse_value(&mut self) -> Result<Value, ParseError> {
        match self.advance().clone() {
            Token::Str(s) => Ok(Value::String(s)),
            Token::Int(n) => Ok(Value::Number(n.into())),
            Token::Float(f) => Number::from_f64(f)
                .map(Value::Number)
                .ok_or(ParseError::Unexpected(Token::Float(f), "finite number")),
            Token::Ident(s) => match s.as_str() {
                "true" => Ok(Value::Bool(true)),
                "false" => Ok(Value::Bool(false)),
                "null" => Ok(Value::Null),
                _ => Err(ParseError::Unexpected(Token::Ident(s), "value")),
            },
            Token::LBracket => self.parse_array(),
            Token::LBrace => self.parse_object(),
            tok => Err(unexpected(tok, "value")),
        }
    }

    /// Elements after `[`; a trailing comma is allowed.
    fn parse_array(&mut self) -> Result<Value, ParseError> {
        let mut items = Vec::new();
        while *self.peek() != Token::RBracket {
            items.push(self.parse_value()?);
            if *self.peek() == Token::Comma {
                self.advance();
            } else {
                break;
            }
        }
        self.expect(Token::RBracket, "]")?;
        Ok(Value::Array(items))
    }

    /// Entries after `{`; keys are identifiers or strings.
    fn parse_object(&mut self) -> Result<Value, ParseError> {
        let mut map = Map::new();
        while *self.peek() != Token::RBrace {
            let key = match self.advance().clone() {
                Token::Ident(s) | Token::Str(s) => s,
                tok => return Err(unexpected(tok, "key")),
            };
            self.expect(Token::Colon, ":")?;
            let value = self.parse_value()?;
            map.insert(key, value);
            if *self.peek() == Token::Comma {
                self.advance();
            } else {
                break;
            }
        }
        self.expect(Token::RBrace, "}")?;
        Ok(Value::Object(map))
    }
}
