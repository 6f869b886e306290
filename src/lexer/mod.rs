use std::iter::Peekable;
use std::str::CharIndices;

use thiserror::Error;

use crate::parser::ast::TextRange;

#[derive(PartialEq, Debug, Clone)]
pub enum Token {
    // Keywords
    Let,
    Const,
    Var,
    Function,
    Return,
    If,
    Else,
    For,
    While,
    True,
    False,
    Null,
    Typeof,

    // Type keywords
    Boolean,
    Number,
    String,
    Any,
    Unknown,
    Void,
    Never,
    Object,

    // Identifiers and literals
    Identifier(String),
    StringLiteral(String),
    NumberLiteral(f64),

    // Operators and punctuation
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Equal,
    EqualEqual,
    EqualEqualEqual,
    NotEqual,
    NotEqualEqual,
    PlusEqual,
    MinusEqual,
    Greater,
    GreaterEqual,
    Less,
    LessEqual,
    LeftBrace,
    RightBrace,
    LeftParen,
    RightParen,
    LeftBracket,
    RightBracket,
    Comma,
    Colon,
    Semicolon,
    Question,
    QuestionQuestion,
    Or,
    BitwiseOr,
    And,
    BitwiseAnd,
    BitwiseXor,
    LeftShift,
    RightShift,
    Not,
    Dot,

    // End of file
    EOF,
}

#[derive(PartialEq, Debug, Clone)]
pub struct SpannedToken {
    pub token: Token,
    pub range: TextRange,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum LexError {
    #[error("Invalid character '{character}'")]
    UnexpectedCharacter { character: char, range: TextRange },
    #[error("Unterminated string literal")]
    UnterminatedString { range: TextRange },
    #[error("Unterminated comment")]
    UnterminatedComment { range: TextRange },
    #[error("Invalid escape sequence '\\{escape}'")]
    InvalidEscape { escape: char, range: TextRange },
    #[error("Invalid number '{text}'")]
    InvalidNumber { text: String, range: TextRange },
}

impl LexError {
    pub fn range(&self) -> TextRange {
        match self {
            LexError::UnexpectedCharacter { range, .. }
            | LexError::UnterminatedString { range }
            | LexError::UnterminatedComment { range }
            | LexError::InvalidEscape { range, .. }
            | LexError::InvalidNumber { range, .. } => *range,
        }
    }
}

pub struct Lexer<'src> {
    source: &'src str,
    chars: Peekable<CharIndices<'src>>,
}

impl<'src> Lexer<'src> {
    pub fn new(source: &'src str) -> Self {
        Lexer {
            source,
            chars: source.char_indices().peekable(),
        }
    }

    /// Byte offset of the next unread character.
    fn offset(&mut self) -> usize {
        self.chars.peek().map_or(self.source.len(), |&(i, _)| i)
    }

    fn advance(&mut self) -> Option<char> {
        self.chars.next().map(|(_, c)| c)
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().map(|&(_, c)| c)
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn skip_line_comment(&mut self) {
        while let Some(c) = self.peek() {
            if c == '\n' {
                break;
            }
            self.advance();
        }
    }

    fn skip_block_comment(&mut self, start: usize) -> Result<(), LexError> {
        while let Some(c) = self.advance() {
            if c == '*' && self.eat('/') {
                return Ok(());
            }
        }
        Err(LexError::UnterminatedComment {
            range: TextRange::new(start, self.source.len()),
        })
    }

    fn read_identifier(&mut self, start: usize) -> &'src str {
        while let Some(c) = self.peek() {
            if c.is_alphanumeric() || c == '_' || c == '$' {
                self.advance();
            } else {
                break;
            }
        }
        let source = self.source;
        &source[start..self.offset()]
    }

    fn read_number(&mut self, start: usize) -> Result<f64, LexError> {
        let mut has_decimal = false;

        while let Some(c) = self.peek() {
            if c.is_ascii_digit() || c == '_' {
                self.advance();
            } else if c == '.' && !has_decimal {
                has_decimal = true;
                self.advance();
            } else {
                break;
            }
        }

        let end = self.offset();
        let text = &self.source[start..end];
        text.replace('_', "")
            .parse::<f64>()
            .map_err(|_| LexError::InvalidNumber {
                text: text.to_string(),
                range: TextRange::new(start, end),
            })
    }

    fn read_string(&mut self, quote: char, start: usize) -> Result<String, LexError> {
        let mut string = String::new();

        while let Some(c) = self.advance() {
            if c == quote {
                return Ok(string);
            } else if c == '\n' {
                break;
            } else if c == '\\' {
                let escape_start = self.offset();
                match self.advance() {
                    Some('n') => string.push('\n'),
                    Some('t') => string.push('\t'),
                    Some('r') => string.push('\r'),
                    Some('\\') => string.push('\\'),
                    Some('"') => string.push('"'),
                    Some('\'') => string.push('\''),
                    Some(escape) => {
                        return Err(LexError::InvalidEscape {
                            escape,
                            range: TextRange::new(escape_start - 1, self.offset()),
                        });
                    }
                    None => break,
                }
            } else {
                string.push(c);
            }
        }

        Err(LexError::UnterminatedString {
            range: TextRange::new(start, self.offset()),
        })
    }

    pub fn next_token(&mut self) -> Result<SpannedToken, LexError> {
        loop {
            self.skip_whitespace();

            let start = self.offset();

            let Some(c) = self.advance() else {
                return Ok(SpannedToken {
                    token: Token::EOF,
                    range: TextRange::empty(start),
                });
            };

            let token = match c {
                '{' => Token::LeftBrace,
                '}' => Token::RightBrace,
                '(' => Token::LeftParen,
                ')' => Token::RightParen,
                '[' => Token::LeftBracket,
                ']' => Token::RightBracket,
                ',' => Token::Comma,
                ':' => Token::Colon,
                ';' => Token::Semicolon,
                '.' => Token::Dot,
                '*' => Token::Star,
                '%' => Token::Percent,
                '^' => Token::BitwiseXor,
                '+' => {
                    if self.eat('=') {
                        Token::PlusEqual
                    } else {
                        Token::Plus
                    }
                }
                '-' => {
                    if self.eat('=') {
                        Token::MinusEqual
                    } else {
                        Token::Minus
                    }
                }
                '/' => {
                    if self.eat('/') {
                        self.skip_line_comment();
                        continue;
                    } else if self.eat('*') {
                        self.skip_block_comment(start)?;
                        continue;
                    } else {
                        Token::Slash
                    }
                }
                '=' => {
                    if self.eat('=') {
                        if self.eat('=') {
                            Token::EqualEqualEqual
                        } else {
                            Token::EqualEqual
                        }
                    } else {
                        Token::Equal
                    }
                }
                '!' => {
                    if self.eat('=') {
                        if self.eat('=') {
                            Token::NotEqualEqual
                        } else {
                            Token::NotEqual
                        }
                    } else {
                        Token::Not
                    }
                }
                '>' => {
                    if self.eat('=') {
                        Token::GreaterEqual
                    } else if self.eat('>') {
                        Token::RightShift
                    } else {
                        Token::Greater
                    }
                }
                '<' => {
                    if self.eat('=') {
                        Token::LessEqual
                    } else if self.eat('<') {
                        Token::LeftShift
                    } else {
                        Token::Less
                    }
                }
                '|' => {
                    if self.eat('|') {
                        Token::Or
                    } else {
                        Token::BitwiseOr
                    }
                }
                '&' => {
                    if self.eat('&') {
                        Token::And
                    } else {
                        Token::BitwiseAnd
                    }
                }
                '?' => {
                    if self.eat('?') {
                        Token::QuestionQuestion
                    } else {
                        Token::Question
                    }
                }
                '"' | '\'' => Token::StringLiteral(self.read_string(c, start)?),
                '0'..='9' => Token::NumberLiteral(self.read_number(start)?),
                c if c.is_alphabetic() || c == '_' || c == '$' => {
                    match self.read_identifier(start) {
                        "let" => Token::Let,
                        "const" => Token::Const,
                        "var" => Token::Var,
                        "function" => Token::Function,
                        "return" => Token::Return,
                        "if" => Token::If,
                        "else" => Token::Else,
                        "for" => Token::For,
                        "while" => Token::While,
                        "true" => Token::True,
                        "false" => Token::False,
                        "null" => Token::Null,
                        "typeof" => Token::Typeof,
                        "boolean" => Token::Boolean,
                        "number" => Token::Number,
                        "string" => Token::String,
                        "any" => Token::Any,
                        "unknown" => Token::Unknown,
                        "void" => Token::Void,
                        "never" => Token::Never,
                        "object" => Token::Object,
                        identifier => Token::Identifier(identifier.to_string()),
                    }
                }
                character => {
                    return Err(LexError::UnexpectedCharacter {
                        character,
                        range: TextRange::new(start, self.offset()),
                    });
                }
            };

            return Ok(SpannedToken {
                token,
                range: TextRange::new(start, self.offset()),
            });
        }
    }

    pub fn tokenize(&mut self) -> Result<Vec<SpannedToken>, LexError> {
        let mut tokens = Vec::new();

        loop {
            let token = self.next_token()?;
            let is_eof = token.token == Token::EOF;
            tokens.push(token);

            if is_eof {
                break;
            }
        }

        Ok(tokens)
    }
}

impl Token {
    /// Type keywords double as identifiers in value and binding positions.
    pub fn keyword_identifier(&self) -> Option<&'static str> {
        match self {
            Token::Boolean => Some("boolean"),
            Token::Number => Some("number"),
            Token::String => Some("string"),
            Token::Any => Some("any"),
            Token::Unknown => Some("unknown"),
            Token::Never => Some("never"),
            Token::Object => Some("object"),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_SOURCE: &str = r#"
// comments should be ignored
let isReady = true;
const count: number = 1_000;
/* block
   comment */
function isEven(n: number): boolean {
    return n % 2 === 0;
}
let label = 'it\'s';
"#;

    fn tokens(source: &str) -> Vec<Token> {
        Lexer::new(source)
            .tokenize()
            .unwrap()
            .into_iter()
            .map(|t| t.token)
            .collect()
    }

    #[test]
    fn test_lexer() {
        let tokens = tokens(TEST_SOURCE);
        assert_eq!(tokens[0], Token::Let);
        assert_eq!(tokens[1], Token::Identifier("isReady".to_string()));
        assert_eq!(tokens[2], Token::Equal);
        assert_eq!(tokens[3], Token::True);
        assert!(tokens.contains(&Token::NumberLiteral(1000.0)));
        assert!(tokens.contains(&Token::EqualEqualEqual));
        assert!(tokens.contains(&Token::StringLiteral("it's".to_string())));
        assert_eq!(tokens.last(), Some(&Token::EOF));
    }

    #[test]
    fn ranges_are_byte_offsets() {
        let source = "let isReady = 1;";
        let tokens = Lexer::new(source).tokenize().unwrap();
        let name = &tokens[1];
        assert_eq!(name.range, TextRange::new(4, 11));
        assert_eq!(&source[name.range.start..name.range.end], "isReady");
    }

    #[test]
    fn multi_byte_text_keeps_offsets_consistent() {
        let source = "let é = \"ü\"; let isX = 1";
        let tokens = Lexer::new(source).tokenize().unwrap();
        let is_x = tokens
            .iter()
            .find(|t| t.token == Token::Identifier("isX".to_string()))
            .unwrap();
        assert_eq!(&source[is_x.range.start..is_x.range.end], "isX");
    }

    #[test]
    fn compound_operators() {
        assert_eq!(
            tokens("a !== b ?? c && d || e"),
            vec![
                Token::Identifier("a".into()),
                Token::NotEqualEqual,
                Token::Identifier("b".into()),
                Token::QuestionQuestion,
                Token::Identifier("c".into()),
                Token::And,
                Token::Identifier("d".into()),
                Token::Or,
                Token::Identifier("e".into()),
                Token::EOF,
            ]
        );
    }

    #[test]
    fn reports_unexpected_character() {
        let err = Lexer::new("let a = #;").tokenize().unwrap_err();
        assert_eq!(
            err,
            LexError::UnexpectedCharacter {
                character: '#',
                range: TextRange::new(8, 9),
            }
        );
    }

    #[test]
    fn reports_unterminated_string() {
        let err = Lexer::new("let a = \"abc").tokenize().unwrap_err();
        assert!(matches!(err, LexError::UnterminatedString { .. }));
        assert_eq!(err.range().start, 8);
    }

    #[test]
    fn reports_unterminated_comment() {
        let err = Lexer::new("/* never closed").tokenize().unwrap_err();
        assert!(matches!(err, LexError::UnterminatedComment { .. }));
    }
}
