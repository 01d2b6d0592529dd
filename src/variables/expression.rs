//! Placeholder expression parser
//!
//! Parses the body of a `{{ ... }}` placeholder into an [`Expression`] tree.
//!
//! ```text
//! expression  := literal | call | variable
//! literal     := "'" chars-except-"'" "'" | '"' chars-except-'"' '"'
//! call        := identifier "(" ( expression ( "," expression )* )? ")"
//! variable    := identifier
//! identifier  := chars other than whitespace, quotes, "(", ")" and ","
//! ```
//!
//! Whitespace is allowed between tokens. Literals are taken verbatim; there
//! are no escape sequences.

use super::error::VarError;
use std::fmt;

/// Default nesting limit for function calls
pub const DEFAULT_MAX_DEPTH: usize = 32;

/// Parsed placeholder expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expression {
    /// Quoted string, without its quotes
    Literal(String),
    /// Name looked up in the environment mapping
    Variable(String),
    /// Function call with argument expressions
    Call { name: String, args: Vec<Expression> },
}

impl Expression {
    /// Parses `source` with the default nesting limit.
    ///
    /// # Example
    ///
    /// ```
    /// use rq_core::variables::Expression;
    ///
    /// let expr = Expression::parse("join(USER, 'x', '-')").unwrap();
    /// assert_eq!(
    ///     expr,
    ///     Expression::Call {
    ///         name: "join".to_string(),
    ///         args: vec![
    ///             Expression::Variable("USER".to_string()),
    ///             Expression::Literal("x".to_string()),
    ///             Expression::Literal("-".to_string()),
    ///         ],
    ///     }
    /// );
    /// ```
    pub fn parse(source: &str) -> Result<Expression, VarError> {
        parse_expression(source, DEFAULT_MAX_DEPTH)
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Literal(value) if value.contains('\'') => write!(f, "\"{}\"", value),
            Expression::Literal(value) => write!(f, "'{}'", value),
            Expression::Variable(name) => write!(f, "{}", name),
            Expression::Call { name, args } => {
                write!(f, "{}(", name)?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", arg)?;
                }
                write!(f, ")")
            }
        }
    }
}

/// Parses `source`, rejecting calls nested deeper than `max_depth`.
pub fn parse_expression(source: &str, max_depth: usize) -> Result<Expression, VarError> {
    let mut parser = Parser {
        source,
        pos: 0,
        max_depth,
    };

    parser.skip_whitespace();
    if parser.peek().is_none() {
        return Err(VarError::syntax(0, "empty expression"));
    }

    let expression = parser.parse_expression(0)?;

    parser.skip_whitespace();
    if let Some(c) = parser.peek() {
        return Err(VarError::syntax(
            parser.pos,
            format!("unexpected '{}' after expression", c),
        ));
    }

    Ok(expression)
}

fn unclosed(open: usize, name: &str) -> VarError {
    VarError::syntax(open, format!("unclosed '(' in call to {}()", name))
}

fn is_identifier_char(c: char) -> bool {
    !c.is_whitespace() && !matches!(c, '\'' | '"' | '(' | ')' | ',')
}

struct Parser<'a> {
    source: &'a str,
    pos: usize,
    max_depth: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<char> {
        self.source[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    fn parse_expression(&mut self, depth: usize) -> Result<Expression, VarError> {
        self.skip_whitespace();

        match self.peek() {
            Some(quote @ ('\'' | '"')) => self.parse_literal(quote),
            Some(c) if is_identifier_char(c) => {
                let name = self.parse_identifier();
                self.skip_whitespace();
                if self.peek() == Some('(') {
                    self.parse_call(name, depth)
                } else {
                    Ok(Expression::Variable(name))
                }
            }
            Some(c) => Err(VarError::syntax(self.pos, format!("unexpected '{}'", c))),
            None => Err(VarError::syntax(self.pos, "unexpected end of expression")),
        }
    }

    fn parse_literal(&mut self, quote: char) -> Result<Expression, VarError> {
        let start = self.pos;
        self.bump();

        let body_start = self.pos;
        match self.source[body_start..].find(quote) {
            Some(len) => {
                self.pos = body_start + len + quote.len_utf8();
                Ok(Expression::Literal(
                    self.source[body_start..body_start + len].to_string(),
                ))
            }
            None => Err(VarError::syntax(start, "unterminated string literal")),
        }
    }

    fn parse_identifier(&mut self) -> String {
        let start = self.pos;
        while self.peek().is_some_and(is_identifier_char) {
            self.bump();
        }
        self.source[start..self.pos].to_string()
    }

    fn parse_call(&mut self, name: String, depth: usize) -> Result<Expression, VarError> {
        let open = self.pos;
        if depth >= self.max_depth {
            return Err(VarError::syntax(
                open,
                format!("calls nested deeper than {} levels", self.max_depth),
            ));
        }
        self.bump();

        let mut args = Vec::new();
        self.skip_whitespace();
        if self.peek() == Some(')') {
            self.bump();
            return Ok(Expression::Call { name, args });
        }

        loop {
            self.skip_whitespace();
            match self.peek() {
                Some(',') | Some(')') => {
                    return Err(VarError::syntax(self.pos, "empty argument"));
                }
                None => return Err(unclosed(open, &name)),
                Some(_) => {}
            }

            args.push(self.parse_expression(depth + 1)?);

            self.skip_whitespace();
            match self.bump() {
                Some(',') => continue,
                Some(')') => break,
                Some(c) => {
                    return Err(VarError::syntax(
                        self.pos - c.len_utf8(),
                        format!("expected ',' or ')' but found '{}'", c),
                    ))
                }
                None => return Err(unclosed(open, &name)),
            }
        }

        Ok(Expression::Call { name, args })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn var(name: &str) -> Expression {
        Expression::Variable(name.to_string())
    }

    fn lit(value: &str) -> Expression {
        Expression::Literal(value.to_string())
    }

    fn call(name: &str, args: Vec<Expression>) -> Expression {
        Expression::Call {
            name: name.to_string(),
            args,
        }
    }

    fn syntax_position(result: Result<Expression, VarError>) -> usize {
        match result {
            Err(VarError::InvalidSyntax { position, .. }) => position,
            other => panic!("Expected InvalidSyntax, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_variable() {
        assert_eq!(Expression::parse("BASE_URL").unwrap(), var("BASE_URL"));
        assert_eq!(Expression::parse("  api-key  ").unwrap(), var("api-key"));
        assert_eq!(Expression::parse("user.id").unwrap(), var("user.id"));
    }

    #[test]
    fn test_parse_literals() {
        assert_eq!(Expression::parse("'hello world'").unwrap(), lit("hello world"));
        assert_eq!(Expression::parse("\"it's\"").unwrap(), lit("it's"));
        assert_eq!(Expression::parse("''").unwrap(), lit(""));
    }

    #[test]
    fn test_literal_is_verbatim() {
        assert_eq!(Expression::parse(r"'a\nb'").unwrap(), lit(r"a\nb"));
        assert_eq!(Expression::parse("'a,b(c)'").unwrap(), lit("a,b(c)"));
    }

    #[test]
    fn test_parse_call_without_args() {
        assert_eq!(Expression::parse("uuid()").unwrap(), call("uuid", vec![]));
        assert_eq!(Expression::parse("uuid( )").unwrap(), call("uuid", vec![]));
    }

    #[test]
    fn test_parse_call_with_args() {
        assert_eq!(
            Expression::parse("join('a', B , \"-\")").unwrap(),
            call("join", vec![lit("a"), var("B"), lit("-")])
        );
    }

    #[test]
    fn test_parse_nested_calls() {
        assert_eq!(
            Expression::parse("sha256(join(uuid(), base64(X), ':'))").unwrap(),
            call(
                "sha256",
                vec![call(
                    "join",
                    vec![call("uuid", vec![]), call("base64", vec![var("X")]), lit(":")]
                )]
            )
        );
    }

    #[test]
    fn test_whitespace_before_paren() {
        assert_eq!(Expression::parse("uuid ()").unwrap(), call("uuid", vec![]));
    }

    #[test]
    fn test_empty_expression() {
        assert_eq!(syntax_position(Expression::parse("")), 0);
        assert_eq!(syntax_position(Expression::parse("   ")), 0);
    }

    #[test]
    fn test_unterminated_literal() {
        assert_eq!(syntax_position(Expression::parse("join('a, '-')")), 10);
        assert_eq!(syntax_position(Expression::parse("'open")), 0);
    }

    #[test]
    fn test_unclosed_call() {
        assert_eq!(syntax_position(Expression::parse("join('a', 'b'")), 4);
        assert_eq!(syntax_position(Expression::parse("uuid(")), 4);
    }

    #[test]
    fn test_empty_argument() {
        assert_eq!(syntax_position(Expression::parse("join('a',,'-')")), 9);
        assert_eq!(syntax_position(Expression::parse("join('a',)")), 9);
        assert_eq!(syntax_position(Expression::parse("join(,'a')")), 5);
    }

    #[test]
    fn test_trailing_input() {
        assert_eq!(syntax_position(Expression::parse("uuid() extra")), 7);
        assert_eq!(syntax_position(Expression::parse("A B")), 2);
        assert_eq!(syntax_position(Expression::parse("'a' 'b'")), 4);
    }

    #[test]
    fn test_unexpected_character() {
        assert_eq!(syntax_position(Expression::parse(")")), 0);
        assert_eq!(syntax_position(Expression::parse("join('a' 'b')")), 9);
    }

    #[test]
    fn test_depth_limit() {
        let nested = "f(".repeat(5) + "x" + &")".repeat(5);
        assert!(parse_expression(&nested, 5).is_ok());
        assert!(parse_expression(&nested, 4).is_err());
    }

    #[test]
    fn test_display_round_trip() {
        let source = "join(uuid(), \"it's\", 'x', NAME)";
        let expr = Expression::parse(source).unwrap();
        assert_eq!(expr.to_string(), source);
        assert_eq!(Expression::parse(&expr.to_string()).unwrap(), expr);
    }
}
