//! Shared helpers for the integration tests.
//!
//! `eval` runs the small slice of Ruby the buffer strategies emit, so tests
//! can compare rendered text instead of generated source. Supported:
//! assignments, `;`/newline separated statements, string and integer
//! literals, `[]`, `<<`, `||`, `+ - *`, `Const::Path`, and the methods
//! `to_s`, `join`, `freeze`, `new` and `safe_concat`. Anything else is an
//! error, which keeps the tests honest about what the generator produces.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use tplgen::{build, Node, Renderer, StrategyKind, StrategyOptions};

/// A runtime value. Strings and lists are shared and mutable, as in Ruby.
#[derive(Debug, Clone)]
pub enum Value {
    Nil,
    Int(i64),
    Str(Rc<RefCell<String>>),
    List(Rc<RefCell<Vec<Value>>>),
    Class(String),
}

impl Value {
    fn string(text: impl Into<String>) -> Self {
        Value::Str(Rc::new(RefCell::new(text.into())))
    }

    fn truthy(&self) -> bool {
        !matches!(self, Value::Nil)
    }

    fn to_s(&self) -> Result<Value, String> {
        match self {
            Value::Str(_) => Ok(self.clone()),
            Value::Nil => Ok(Value::string("")),
            Value::Int(n) => Ok(Value::string(n.to_string())),
            Value::Class(name) => Ok(Value::string(name.clone())),
            Value::List(_) => Err("Array#to_s would inspect the list".to_string()),
        }
    }

    fn as_str(&self) -> Result<String, String> {
        match self {
            Value::Str(s) => Ok(s.borrow().clone()),
            other => Err(format!("expected a String, got {other:?}")),
        }
    }

    /// Rendered text; lists are joined with `""` the way a caller would.
    pub fn text(&self) -> String {
        match self {
            Value::Nil => String::new(),
            Value::Int(n) => n.to_string(),
            Value::Str(s) => s.borrow().clone(),
            Value::List(items) => items.borrow().iter().map(Value::text).collect(),
            Value::Class(name) => name.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Ident(String),
    Const(String),
    Str(String),
    Int(i64),
    Assign,
    Shovel,
    Or,
    Plus,
    Minus,
    Star,
    Dot,
    Comma,
    LParen,
    RParen,
    LBracket,
    RBracket,
    PathSep,
    Sep,
}

fn tokenize(source: &str) -> Result<Vec<Token>, String> {
    let chars: Vec<char> = source.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let ch = chars[i];
        let next = chars.get(i + 1).copied();
        match ch {
            ' ' | '\t' => i += 1,
            '\n' | ';' => {
                tokens.push(Token::Sep);
                i += 1;
            }
            '"' => {
                let (text, end) = read_string(&chars, i + 1)?;
                tokens.push(Token::Str(text));
                i = end;
            }
            '0'..='9' => {
                let start = i;
                while i < chars.len() && chars[i].is_ascii_digit() {
                    i += 1;
                }
                let digits: String = chars[start..i].iter().collect();
                tokens.push(Token::Int(digits.parse().map_err(|e| format!("{e}"))?));
            }
            c if c == '@' || c == '_' || c.is_ascii_alphabetic() => {
                let start = i;
                i += 1;
                while i < chars.len() && (chars[i] == '_' || chars[i].is_ascii_alphanumeric()) {
                    i += 1;
                }
                let word: String = chars[start..i].iter().collect();
                if c.is_ascii_uppercase() {
                    tokens.push(Token::Const(word));
                } else {
                    tokens.push(Token::Ident(word));
                }
            }
            '=' if next != Some('=') => {
                tokens.push(Token::Assign);
                i += 1;
            }
            '<' if next == Some('<') => {
                tokens.push(Token::Shovel);
                i += 2;
            }
            '|' if next == Some('|') => {
                tokens.push(Token::Or);
                i += 2;
            }
            ':' if next == Some(':') => {
                tokens.push(Token::PathSep);
                i += 2;
            }
            '+' | '-' | '*' | '.' | ',' | '(' | ')' | '[' | ']' => {
                tokens.push(match ch {
                    '+' => Token::Plus,
                    '-' => Token::Minus,
                    '*' => Token::Star,
                    '.' => Token::Dot,
                    ',' => Token::Comma,
                    '(' => Token::LParen,
                    ')' => Token::RParen,
                    '[' => Token::LBracket,
                    _ => Token::RBracket,
                });
                i += 1;
            }
            other => return Err(format!("unexpected character {other:?} at {i}")),
        }
    }
    Ok(tokens)
}

/// Read a double-quoted literal body starting after the opening quote.
fn read_string(chars: &[char], mut i: usize) -> Result<(String, usize), String> {
    let mut out = String::new();
    loop {
        let Some(&ch) = chars.get(i) else {
            return Err("unterminated string".to_string());
        };
        i += 1;
        match ch {
            '"' => return Ok((out, i)),
            '#' if matches!(chars.get(i).copied(), Some('{' | '$' | '@')) => {
                return Err(format!("unescaped interpolation at {}", i - 1));
            }
            '\\' => {
                let Some(&esc) = chars.get(i) else {
                    return Err("unterminated escape".to_string());
                };
                i += 1;
                match esc {
                    '"' | '\\' | '#' => out.push(esc),
                    'n' => out.push('\n'),
                    't' => out.push('\t'),
                    'r' => out.push('\r'),
                    'e' => out.push('\u{1b}'),
                    'a' => out.push('\u{07}'),
                    'b' => out.push('\u{08}'),
                    'v' => out.push('\u{0b}'),
                    'f' => out.push('\u{0c}'),
                    '0' => out.push('\0'),
                    'u' => {
                        if chars.get(i) != Some(&'{') {
                            return Err("expected '{' after \\u".to_string());
                        }
                        let start = i + 1;
                        let end = start
                            + chars[start..]
                                .iter()
                                .position(|&c| c == '}')
                                .ok_or("unterminated \\u{")?;
                        let hex: String = chars[start..end].iter().collect();
                        let code = u32::from_str_radix(&hex, 16).map_err(|e| format!("{e}"))?;
                        out.push(char::from_u32(code).ok_or("invalid code point")?);
                        i = end + 1;
                    }
                    other => return Err(format!("unknown escape \\{other}")),
                }
            }
            c => out.push(c),
        }
    }
}

struct Interpreter {
    tokens: Vec<Token>,
    pos: usize,
    vars: HashMap<String, Value>,
}

impl Interpreter {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn eat(&mut self, token: &Token) -> bool {
        if self.peek() == Some(token) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, token: Token) -> Result<(), String> {
        if self.eat(&token) {
            Ok(())
        } else {
            Err(format!("expected {token:?}, found {:?}", self.peek()))
        }
    }

    fn program(&mut self) -> Result<Value, String> {
        let mut last = Value::Nil;
        loop {
            while self.eat(&Token::Sep) {}
            if self.peek().is_none() {
                return Ok(last);
            }
            last = self.statement()?;
            if self.peek().is_some() {
                self.expect(Token::Sep)?;
            }
        }
    }

    fn statement(&mut self) -> Result<Value, String> {
        if let (Some(Token::Ident(name)), Some(Token::Assign)) =
            (self.tokens.get(self.pos), self.tokens.get(self.pos + 1))
        {
            let name = name.clone();
            self.pos += 2;
            let value = self.expr()?;
            self.vars.insert(name, value.clone());
            return Ok(value);
        }
        self.expr()
    }

    // Both sides are evaluated; nothing the generator emits on the right of
    // `||` has side effects.
    fn expr(&mut self) -> Result<Value, String> {
        let mut left = self.shovel()?;
        while self.eat(&Token::Or) {
            let right = self.shovel()?;
            if !left.truthy() {
                left = right;
            }
        }
        Ok(left)
    }

    fn shovel(&mut self) -> Result<Value, String> {
        let left = self.additive()?;
        while self.eat(&Token::Shovel) {
            let right = self.additive()?;
            append(&left, &right)?;
        }
        Ok(left)
    }

    fn additive(&mut self) -> Result<Value, String> {
        let mut left = self.multiplicative()?;
        loop {
            if self.eat(&Token::Plus) {
                let right = self.multiplicative()?;
                left = match (&left, &right) {
                    (Value::Int(a), Value::Int(b)) => Value::Int(a + b),
                    (Value::Str(_), Value::Str(_)) => {
                        Value::string(left.as_str()? + &right.as_str()?)
                    }
                    _ => return Err(format!("cannot add {left:?} and {right:?}")),
                };
            } else if self.eat(&Token::Minus) {
                let right = self.multiplicative()?;
                left = match (&left, &right) {
                    (Value::Int(a), Value::Int(b)) => Value::Int(a - b),
                    _ => return Err(format!("cannot subtract {right:?} from {left:?}")),
                };
            } else {
                return Ok(left);
            }
        }
    }

    fn multiplicative(&mut self) -> Result<Value, String> {
        let mut left = self.postfix()?;
        while self.eat(&Token::Star) {
            let right = self.postfix()?;
            left = match (&left, &right) {
                (Value::Int(a), Value::Int(b)) => Value::Int(a * b),
                (Value::Str(_), Value::Int(n)) if *n >= 0 => {
                    Value::string(left.as_str()?.repeat(*n as usize))
                }
                _ => return Err(format!("cannot multiply {left:?} by {right:?}")),
            };
        }
        Ok(left)
    }

    fn postfix(&mut self) -> Result<Value, String> {
        let mut value = self.primary()?;
        while self.eat(&Token::Dot) {
            let method = match self.peek().cloned() {
                Some(Token::Ident(m)) => m,
                other => return Err(format!("expected method name, found {other:?}")),
            };
            self.pos += 1;
            let mut args = Vec::new();
            if self.eat(&Token::LParen) {
                if !self.eat(&Token::RParen) {
                    loop {
                        args.push(self.expr()?);
                        if self.eat(&Token::RParen) {
                            break;
                        }
                        self.expect(Token::Comma)?;
                    }
                }
            }
            value = call(&value, &method, &args)?;
        }
        Ok(value)
    }

    fn primary(&mut self) -> Result<Value, String> {
        let token = self.peek().cloned().ok_or("unexpected end of input")?;
        self.pos += 1;
        match token {
            Token::Str(text) => Ok(Value::string(text)),
            Token::Int(n) => Ok(Value::Int(n)),
            Token::Ident(name) => Ok(self.vars.get(&name).cloned().unwrap_or(Value::Nil)),
            Token::Const(mut path) => {
                while self.eat(&Token::PathSep) {
                    match self.peek().cloned() {
                        Some(Token::Const(part)) => {
                            self.pos += 1;
                            path.push_str("::");
                            path.push_str(&part);
                        }
                        other => return Err(format!("expected constant, found {other:?}")),
                    }
                }
                Ok(Value::Class(path))
            }
            Token::LParen => {
                let value = self.expr()?;
                self.expect(Token::RParen)?;
                Ok(value)
            }
            Token::LBracket => {
                let mut items = Vec::new();
                if !self.eat(&Token::RBracket) {
                    loop {
                        items.push(self.expr()?);
                        if self.eat(&Token::RBracket) {
                            break;
                        }
                        self.expect(Token::Comma)?;
                    }
                }
                Ok(Value::List(Rc::new(RefCell::new(items))))
            }
            other => Err(format!("unexpected token {other:?}")),
        }
    }
}

fn append(target: &Value, value: &Value) -> Result<(), String> {
    match target {
        Value::Str(s) => {
            // Read first so `buf << buf` does not double-borrow.
            let text = value.as_str()?;
            s.borrow_mut().push_str(&text);
            Ok(())
        }
        Value::List(items) => {
            items.borrow_mut().push(value.clone());
            Ok(())
        }
        other => Err(format!("cannot append to {other:?}")),
    }
}

fn call(receiver: &Value, method: &str, args: &[Value]) -> Result<Value, String> {
    match (receiver, method, args) {
        (_, "to_s", []) => receiver.to_s(),
        (_, "freeze", []) => Ok(receiver.clone()),
        (Value::Class(_), "new", []) => Ok(Value::string("")),
        (Value::List(items), "join", [sep]) => {
            let sep = sep.as_str()?;
            let parts = items
                .borrow()
                .iter()
                .map(|item| item.to_s().and_then(|s| s.as_str()))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Value::string(parts.join(&sep)))
        }
        (Value::Str(_), "safe_concat", [value]) => {
            append(receiver, value)?;
            Ok(receiver.clone())
        }
        _ => Err(format!("unsupported call {receiver:?}.{method}({args:?})")),
    }
}

/// Evaluate `source` and return the value of its last statement.
pub fn eval(source: &str) -> Result<Value, String> {
    let mut interpreter = Interpreter {
        tokens: tokenize(source)?,
        pos: 0,
        vars: HashMap::new(),
    };
    interpreter.program()
}

/// Evaluate `source`, panicking with the source on failure.
pub fn eval_text(source: &str) -> String {
    match eval(source) {
        Ok(value) => value.text(),
        Err(e) => panic!("failed to evaluate `{source}`: {e}"),
    }
}

/// Render `tree` with `kind` and evaluate the result.
pub fn rendered_text(kind: StrategyKind, options: &StrategyOptions, tree: &Node) -> String {
    let renderer = build(kind, options).unwrap_or_else(|e| panic!("failed to build {kind}: {e}"));
    let source = renderer
        .render(tree)
        .unwrap_or_else(|e| panic!("{kind} failed to render {tree}: {e}"));
    eval_text(&source)
}

/// The strategies whose output the evaluator understands.
pub const BUFFER_KINDS: [StrategyKind; 4] = [
    StrategyKind::Array,
    StrategyKind::ArrayBuffer,
    StrategyKind::StringBuffer,
    StrategyKind::SafeBuffer,
];

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

