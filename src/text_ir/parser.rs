//! Textual IR parser.

use crate::core::{CompileError, CompileResult, Node};

/// Parse exactly one IR node from `text`.
pub fn parse_ir(text: &str) -> CompileResult<Node> {
    let mut parser = Parser::new(text);
    parser.skip_whitespace();
    let node = parser.parse_node()?;
    parser.skip_whitespace();
    if !parser.is_eof() {
        return Err(parser.syntax("unexpected content after the root node"));
    }
    Ok(node)
}

struct Parser<'a> {
    text: &'a str,
    pos: usize,
    line: usize,
    column: usize,
}

impl<'a> Parser<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            text,
            pos: 0,
            line: 1,
            column: 1,
        }
    }

    fn is_eof(&self) -> bool {
        self.pos >= self.text.len()
    }

    fn current_char(&self) -> Option<char> {
        self.text[self.pos..].chars().next()
    }

    fn advance(&mut self) {
        if let Some(ch) = self.current_char() {
            self.pos += ch.len_utf8();
            if ch == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
    }

    fn syntax(&self, message: impl Into<String>) -> CompileError {
        CompileError::Syntax {
            line: self.line,
            column: self.column,
            message: message.into(),
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.current_char() {
            if ch == ';' {
                // Comment runs to end of line
                while let Some(ch) = self.current_char() {
                    self.advance();
                    if ch == '\n' {
                        break;
                    }
                }
            } else if ch.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn try_read(&mut self, ch: char) -> bool {
        self.skip_whitespace();
        if self.current_char() == Some(ch) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, ch: char) -> CompileResult<()> {
        if !self.try_read(ch) {
            return Err(match self.current_char() {
                Some(found) => self.syntax(format!("expected '{ch}' but found '{found}'")),
                None => self.syntax(format!("expected '{ch}' but found end of input")),
            });
        }
        Ok(())
    }

    fn read_identifier(&mut self) -> CompileResult<&'a str> {
        self.skip_whitespace();
        let start = self.pos;
        match self.current_char() {
            Some(ch) if ch.is_alphabetic() || ch == '_' || ch == '@' => self.advance(),
            Some(ch) => return Err(self.syntax(format!("expected identifier but found '{ch}'"))),
            None => return Err(self.syntax("expected identifier but found end of input")),
        }
        while let Some(ch) = self.current_char() {
            if ch.is_alphanumeric() || ch == '_' || ch == '-' {
                self.advance();
            } else {
                break;
            }
        }
        Ok(&self.text[start..self.pos])
    }

    fn read_string(&mut self) -> CompileResult<String> {
        self.expect('"')?;
        let mut out = String::new();
        loop {
            match self.current_char() {
                None => return Err(self.syntax("unterminated string")),
                Some('"') => {
                    self.advance();
                    return Ok(out);
                }
                Some('\\') => {
                    self.advance();
                    let escaped = match self.current_char() {
                        Some('"') => '"',
                        Some('\\') => '\\',
                        Some('n') => '\n',
                        Some('t') => '\t',
                        Some('r') => '\r',
                        Some('0') => '\0',
                        Some(other) => {
                            return Err(self.syntax(format!("unknown escape '\\{other}'")))
                        }
                        None => return Err(self.syntax("unterminated string")),
                    };
                    out.push(escaped);
                    self.advance();
                }
                Some(ch) => {
                    out.push(ch);
                    self.advance();
                }
            }
        }
    }

    fn peek_is(&mut self, ch: char) -> bool {
        self.skip_whitespace();
        self.current_char() == Some(ch)
    }

    fn parse_node(&mut self) -> CompileResult<Node> {
        self.expect('(')?;
        self.skip_whitespace();
        let (line, column) = (self.line, self.column);
        let tag = self.read_identifier()?;

        let node = match tag {
            "multi" => {
                let mut children = Vec::new();
                while !self.peek_is(')') {
                    if self.is_eof() {
                        return Err(self.syntax("unterminated multi node"));
                    }
                    if !self.peek_is('(') {
                        return Err(malformed("multi", "children must be nodes"));
                    }
                    children.push(self.parse_node()?);
                }
                Node::Multi(children)
            }
            "static" => Node::Static(self.parse_text_payload("static")?),
            "dynamic" => Node::Dynamic(self.parse_text_payload("dynamic")?),
            "code" => Node::Code(self.parse_text_payload("code")?),
            "capture" => {
                let name = if self.peek_is('"') {
                    self.read_string()?
                } else if self.peek_is('(') || self.peek_is(')') {
                    return Err(malformed("capture", "missing variable name"));
                } else {
                    self.read_identifier()?.to_string()
                };
                if !self.peek_is('(') {
                    return Err(malformed("capture", format!("`{name}` has no child node")));
                }
                let body = self.parse_node()?;
                if !self.peek_is(')') {
                    return Err(malformed(
                        "capture",
                        format!("`{name}` takes exactly one child node"),
                    ));
                }
                Node::Capture {
                    name,
                    body: Box::new(body),
                }
            }
            other => {
                return Err(CompileError::UnsupportedNode {
                    tag: other.to_string(),
                    line,
                    column,
                })
            }
        };

        self.expect(')')?;
        Ok(node)
    }

    fn parse_text_payload(&mut self, tag: &'static str) -> CompileResult<String> {
        if !self.peek_is('"') {
            return Err(malformed(tag, "expected one string payload"));
        }
        let text = self.read_string()?;
        if !self.peek_is(')') {
            if self.is_eof() {
                return Err(self.syntax(format!("unterminated {tag} node")));
            }
            return Err(malformed(tag, "takes exactly one string payload"));
        }
        Ok(text)
    }
}

fn malformed(tag: &'static str, reason: impl Into<String>) -> CompileError {
    CompileError::MalformedNode {
        tag,
        reason: reason.into(),
    }
}
