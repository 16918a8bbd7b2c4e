/// Lexer for word-definition source text
///
/// Tokens are whitespace separated, except parentheses which always stand
/// alone. `\` starts a comment that runs to the end of the line.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    Colon,
    Semicolon,
    LeftParen,
    RightParen,
    /// `--` inside an effect signature
    Dash,
    Const,
    IntLiteral,
    BoolLiteral,
    Ident,
    Eof,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    pub line: usize,
    pub column: usize,
}

pub struct Lexer<'a> {
    chars: std::iter::Peekable<std::str::Chars<'a>>,
    line: usize,
    column: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Lexer {
            chars: input.chars().peekable(),
            line: 1,
            column: 1,
        }
    }

    pub fn tokenize(&mut self) -> Vec<Token> {
        let mut tokens = Vec::new();

        while let Some(&c) = self.chars.peek() {
            let (line, column) = (self.line, self.column);

            if c.is_whitespace() {
                self.bump();
            } else if c == '\\' {
                while let Some(&c) = self.chars.peek() {
                    if c == '\n' {
                        break;
                    }
                    self.bump();
                }
            } else if c == '(' || c == ')' {
                self.bump();
                let kind = if c == '(' {
                    TokenKind::LeftParen
                } else {
                    TokenKind::RightParen
                };
                tokens.push(Token {
                    kind,
                    lexeme: c.to_string(),
                    line,
                    column,
                });
            } else {
                let mut lexeme = String::new();
                while let Some(&c) = self.chars.peek() {
                    if c.is_whitespace() || c == '(' || c == ')' {
                        break;
                    }
                    lexeme.push(c);
                    self.bump();
                }
                tokens.push(Token {
                    kind: classify(&lexeme),
                    lexeme,
                    line,
                    column,
                });
            }
        }

        tokens.push(Token {
            kind: TokenKind::Eof,
            lexeme: String::new(),
            line: self.line,
            column: self.column,
        });
        tokens
    }

    fn bump(&mut self) {
        if let Some(c) = self.chars.next() {
            if c == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
    }
}

fn classify(lexeme: &str) -> TokenKind {
    match lexeme {
        ":" => TokenKind::Colon,
        ";" => TokenKind::Semicolon,
        "--" => TokenKind::Dash,
        "const" => TokenKind::Const,
        "true" | "false" => TokenKind::BoolLiteral,
        _ if is_int_literal(lexeme) => TokenKind::IntLiteral,
        _ => TokenKind::Ident,
    }
}

fn is_int_literal(lexeme: &str) -> bool {
    let digits = lexeme.strip_prefix('-').unwrap_or(lexeme);
    !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit())
}
