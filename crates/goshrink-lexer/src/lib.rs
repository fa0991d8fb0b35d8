// Allow unwrap in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]

//! Lexical analysis for Go source.
//!
//! Tokenization is done with logos. Two details matter downstream:
//!
//! - Literal tokens keep their **raw source text** (quotes, prefixes,
//!   underscores included) so the printer can re-emit them verbatim and the
//!   literal-shrinking rule can compare against `0` / `""` textually.
//! - Go terminates statements with semicolons the programmer rarely writes.
//!   [`insert_semicolons`] replays the language's insertion rule over the
//!   token/span sequence so the parser only ever sees explicit `;`.
//!
//! Comments are stripped during lexing and never reach the parser.

use logos::Logos;
use std::fmt;
use std::ops::Range;
use std::rc::Rc;

/// Go token.
///
/// Covers the pre-generics language surface: all keywords, operators,
/// delimiters, and literal forms. Identifier and literal payloads use
/// `Rc<str>` for cheap cloning through the parser.
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r\n]+")] // Skip whitespace (newlines handled by insert_semicolons)
#[logos(skip r"//[^\n]*")] // Skip // comments
#[logos(skip r"/\*([^*]|\*[^/])*\*/")] // Skip /* */ comments
pub enum Token {
    // === Keywords ===
    #[token("break")]
    Break,
    #[token("case")]
    Case,
    #[token("chan")]
    Chan,
    #[token("const")]
    Const,
    #[token("continue")]
    Continue,
    #[token("default")]
    Default,
    #[token("defer")]
    Defer,
    #[token("else")]
    Else,
    #[token("fallthrough")]
    Fallthrough,
    #[token("for")]
    For,
    #[token("func")]
    Func,
    #[token("go")]
    Go,
    #[token("goto")]
    Goto,
    #[token("if")]
    If,
    #[token("import")]
    Import,
    #[token("interface")]
    Interface,
    #[token("map")]
    Map,
    #[token("package")]
    Package,
    #[token("range")]
    Range,
    #[token("return")]
    Return,
    #[token("select")]
    Select,
    #[token("struct")]
    Struct,
    #[token("switch")]
    Switch,
    #[token("type")]
    Type,
    #[token("var")]
    Var,

    // === Operators ===
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("&")]
    Amp,
    #[token("|")]
    Pipe,
    #[token("^")]
    Caret,
    #[token("<<")]
    Shl,
    #[token(">>")]
    Shr,
    #[token("&^")]
    AmpCaret,

    #[token("+=")]
    PlusEq,
    #[token("-=")]
    MinusEq,
    #[token("*=")]
    StarEq,
    #[token("/=")]
    SlashEq,
    #[token("%=")]
    PercentEq,
    #[token("&=")]
    AmpEq,
    #[token("|=")]
    PipeEq,
    #[token("^=")]
    CaretEq,
    #[token("<<=")]
    ShlEq,
    #[token(">>=")]
    ShrEq,
    #[token("&^=")]
    AmpCaretEq,

    #[token("&&")]
    AmpAmp,
    #[token("||")]
    PipePipe,
    #[token("<-")]
    Arrow,
    #[token("++")]
    Inc,
    #[token("--")]
    Dec,

    #[token("==")]
    EqEq,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
    #[token("=")]
    Eq,
    #[token("!")]
    Bang,
    #[token("!=")]
    BangEq,
    #[token("<=")]
    LtEq,
    #[token(">=")]
    GtEq,
    #[token(":=")]
    ColonEq,
    #[token("...")]
    Ellipsis,

    // === Delimiters ===
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token(",")]
    Comma,
    #[token(".")]
    Dot,
    #[token(";")]
    Semi,
    #[token(":")]
    Colon,

    // === Literals ===
    /// Integer literal, raw text (covers decimal, hex, octal, binary forms).
    #[regex(r"0[xX][0-9a-fA-F_]+|0[oO][0-7_]+|0[bB][01_]+|[0-9][0-9_]*", |lex| Rc::from(lex.slice()))]
    Int(Rc<str>),

    /// Float literal, raw text.
    #[regex(r"[0-9][0-9_]*\.[0-9_]*([eE][+-]?[0-9]+)?", |lex| Rc::from(lex.slice()), priority = 5)]
    #[regex(r"[0-9][0-9_]*[eE][+-]?[0-9]+", |lex| Rc::from(lex.slice()))]
    #[regex(r"\.[0-9][0-9_]*([eE][+-]?[0-9]+)?", |lex| Rc::from(lex.slice()), priority = 5)]
    Float(Rc<str>),

    /// Rune literal, raw text including the quotes.
    #[regex(r"'([^'\\\n]|\\.)*'", |lex| Rc::from(lex.slice()))]
    Rune(Rc<str>),

    /// String literal, raw text including the quotes or backticks.
    #[regex(r#""([^"\\\n]|\\.)*""#, |lex| Rc::from(lex.slice()))]
    #[regex(r"`[^`]*`", |lex| Rc::from(lex.slice()))]
    String(Rc<str>),

    /// Identifier.
    #[regex(r"[A-Za-z_][A-Za-z0-9_]*", |lex| Rc::from(lex.slice()))]
    Ident(Rc<str>),
}

impl Token {
    /// Whether a newline after this token triggers semicolon insertion.
    fn ends_statement(&self) -> bool {
        matches!(
            self,
            Token::Ident(_)
                | Token::Int(_)
                | Token::Float(_)
                | Token::Rune(_)
                | Token::String(_)
                | Token::Break
                | Token::Continue
                | Token::Fallthrough
                | Token::Return
                | Token::Inc
                | Token::Dec
                | Token::RParen
                | Token::RBracket
                | Token::RBrace
        )
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Int(s) | Token::Float(s) | Token::Rune(s) | Token::String(s)
            | Token::Ident(s) => write!(f, "{}", s),
            Token::Break => write!(f, "break"),
            Token::Case => write!(f, "case"),
            Token::Chan => write!(f, "chan"),
            Token::Const => write!(f, "const"),
            Token::Continue => write!(f, "continue"),
            Token::Default => write!(f, "default"),
            Token::Defer => write!(f, "defer"),
            Token::Else => write!(f, "else"),
            Token::Fallthrough => write!(f, "fallthrough"),
            Token::For => write!(f, "for"),
            Token::Func => write!(f, "func"),
            Token::Go => write!(f, "go"),
            Token::Goto => write!(f, "goto"),
            Token::If => write!(f, "if"),
            Token::Import => write!(f, "import"),
            Token::Interface => write!(f, "interface"),
            Token::Map => write!(f, "map"),
            Token::Package => write!(f, "package"),
            Token::Range => write!(f, "range"),
            Token::Return => write!(f, "return"),
            Token::Select => write!(f, "select"),
            Token::Struct => write!(f, "struct"),
            Token::Switch => write!(f, "switch"),
            Token::Type => write!(f, "type"),
            Token::Var => write!(f, "var"),
            Token::Plus => write!(f, "+"),
            Token::Minus => write!(f, "-"),
            Token::Star => write!(f, "*"),
            Token::Slash => write!(f, "/"),
            Token::Percent => write!(f, "%"),
            Token::Amp => write!(f, "&"),
            Token::Pipe => write!(f, "|"),
            Token::Caret => write!(f, "^"),
            Token::Shl => write!(f, "<<"),
            Token::Shr => write!(f, ">>"),
            Token::AmpCaret => write!(f, "&^"),
            Token::PlusEq => write!(f, "+="),
            Token::MinusEq => write!(f, "-="),
            Token::StarEq => write!(f, "*="),
            Token::SlashEq => write!(f, "/="),
            Token::PercentEq => write!(f, "%="),
            Token::AmpEq => write!(f, "&="),
            Token::PipeEq => write!(f, "|="),
            Token::CaretEq => write!(f, "^="),
            Token::ShlEq => write!(f, "<<="),
            Token::ShrEq => write!(f, ">>="),
            Token::AmpCaretEq => write!(f, "&^="),
            Token::AmpAmp => write!(f, "&&"),
            Token::PipePipe => write!(f, "||"),
            Token::Arrow => write!(f, "<-"),
            Token::Inc => write!(f, "++"),
            Token::Dec => write!(f, "--"),
            Token::EqEq => write!(f, "=="),
            Token::Lt => write!(f, "<"),
            Token::Gt => write!(f, ">"),
            Token::Eq => write!(f, "="),
            Token::Bang => write!(f, "!"),
            Token::BangEq => write!(f, "!="),
            Token::LtEq => write!(f, "<="),
            Token::GtEq => write!(f, ">="),
            Token::ColonEq => write!(f, ":="),
            Token::Ellipsis => write!(f, "..."),
            Token::LParen => write!(f, "("),
            Token::RParen => write!(f, ")"),
            Token::LBracket => write!(f, "["),
            Token::RBracket => write!(f, "]"),
            Token::LBrace => write!(f, "{{"),
            Token::RBrace => write!(f, "}}"),
            Token::Comma => write!(f, ","),
            Token::Dot => write!(f, "."),
            Token::Semi => write!(f, ";"),
            Token::Colon => write!(f, ":"),
        }
    }
}

/// A lexing failure: byte offset of the offending input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexError {
    pub offset: usize,
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid token at byte offset {}", self.offset)
    }
}

impl std::error::Error for LexError {}

/// Tokenize `source` and apply Go's automatic semicolon insertion.
///
/// Returns tokens paired with their byte spans. Inserted semicolons carry a
/// zero-length span at the end of the token they terminate.
pub fn tokenize(source: &str) -> Result<Vec<(Token, Range<usize>)>, LexError> {
    let mut tokens = Vec::new();
    let mut lexer = Token::lexer(source);
    while let Some(result) = lexer.next() {
        match result {
            Ok(tok) => tokens.push((tok, lexer.span())),
            Err(()) => return Err(LexError { offset: lexer.span().start }),
        }
    }
    Ok(insert_semicolons(source, tokens))
}

/// Replay Go's semicolon-insertion rule over a raw token sequence.
///
/// A `;` is inserted after identifiers, literals, `break`, `continue`,
/// `fallthrough`, `return`, `++`, `--`, `)`, `]`, and `}` when the gap to the
/// next token contains a newline, or at end of input.
pub fn insert_semicolons(
    source: &str,
    tokens: Vec<(Token, Range<usize>)>,
) -> Vec<(Token, Range<usize>)> {
    let mut out = Vec::with_capacity(tokens.len());
    let count = tokens.len();
    for (i, (tok, span)) in tokens.into_iter().enumerate() {
        let end = span.end;
        let ends_statement = tok.ends_statement();
        out.push((tok, span));
        if !ends_statement {
            continue;
        }
        let gap_end = if i + 1 < count {
            // Peek the next token's start by scanning forward from `end`.
            // The gap is everything up to the next non-gap byte; a newline
            // anywhere in it (including inside a block comment) terminates
            // the statement.
            match next_token_start(source, end) {
                Some(start) => start,
                None => source.len(),
            }
        } else {
            source.len()
        };
        let gap = &source[end..gap_end];
        if gap.contains('\n') || gap_end == source.len() {
            out.push((Token::Semi, end..end));
        }
    }
    out
}

/// Find the byte offset of the next token after `from`, skipping whitespace
/// and comments. Returns None at end of input.
fn next_token_start(source: &str, from: usize) -> Option<usize> {
    let bytes = source.as_bytes();
    let mut i = from;
    while i < bytes.len() {
        match bytes[i] {
            b' ' | b'\t' | b'\r' | b'\n' => i += 1,
            b'/' if i + 1 < bytes.len() && bytes[i + 1] == b'/' => {
                while i < bytes.len() && bytes[i] != b'\n' {
                    i += 1;
                }
            }
            b'/' if i + 1 < bytes.len() && bytes[i + 1] == b'*' => {
                i += 2;
                while i + 1 < bytes.len() && !(bytes[i] == b'*' && bytes[i + 1] == b'/') {
                    i += 1;
                }
                i = (i + 2).min(bytes.len());
            }
            _ => return Some(i),
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Test helper: tokenize and strip spans.
    fn lex(source: &str) -> Vec<Token> {
        tokenize(source)
            .expect("lexing failed")
            .into_iter()
            .map(|(tok, _)| tok)
            .collect()
    }

    fn ident(s: &str) -> Token {
        Token::Ident(Rc::from(s))
    }

    fn int(s: &str) -> Token {
        Token::Int(Rc::from(s))
    }

    fn string(s: &str) -> Token {
        Token::String(Rc::from(s))
    }

    #[test]
    fn test_keywords() {
        let tokens = lex("package import func var");
        assert_eq!(
            tokens,
            vec![Token::Package, Token::Import, Token::Func, Token::Var]
        );
    }

    #[test]
    fn test_operators() {
        let tokens = lex("+ - * / % == != <= >= && || &^ <<= :=");
        assert_eq!(
            tokens,
            vec![
                Token::Plus,
                Token::Minus,
                Token::Star,
                Token::Slash,
                Token::Percent,
                Token::EqEq,
                Token::BangEq,
                Token::LtEq,
                Token::GtEq,
                Token::AmpAmp,
                Token::PipePipe,
                Token::AmpCaret,
                Token::ShlEq,
                Token::ColonEq,
            ]
        );
    }

    #[test]
    fn test_numbers_keep_raw_text() {
        let tokens = lex("42 0x1F 0b1010 3.14 1e10 1_000");
        assert_eq!(
            tokens,
            vec![
                int("42"),
                int("0x1F"),
                int("0b1010"),
                Token::Float(Rc::from("3.14")),
                Token::Float(Rc::from("1e10")),
                int("1_000"),
            ]
        );
    }

    #[test]
    fn test_strings_keep_quotes() {
        let tokens = lex(r#""hello" `raw` 'x'"#);
        assert_eq!(
            tokens,
            vec![
                string("\"hello\""),
                string("`raw`"),
                Token::Rune(Rc::from("'x'")),
            ]
        );
    }

    #[test]
    fn test_selector_vs_float() {
        let tokens = lex("a.b 1.5 s[0]");
        assert_eq!(
            tokens,
            vec![
                ident("a"),
                Token::Dot,
                ident("b"),
                Token::Float(Rc::from("1.5")),
                ident("s"),
                Token::LBracket,
                int("0"),
                Token::RBracket,
            ]
        );
    }

    #[test]
    fn test_comments_skipped() {
        let tokens = lex("var /* block */ x // line\n");
        assert_eq!(tokens, vec![Token::Var, ident("x"), Token::Semi]);
    }

    #[test]
    fn test_semicolon_after_ident_at_newline() {
        let tokens = lex("x = 1\ny = 2\n");
        assert_eq!(
            tokens,
            vec![
                ident("x"),
                Token::Eq,
                int("1"),
                Token::Semi,
                ident("y"),
                Token::Eq,
                int("2"),
                Token::Semi,
            ]
        );
    }

    #[test]
    fn test_no_semicolon_after_operator() {
        // A trailing binary operator continues the statement.
        let tokens = lex("x = a +\nb\n");
        assert_eq!(
            tokens,
            vec![
                ident("x"),
                Token::Eq,
                ident("a"),
                Token::Plus,
                ident("b"),
                Token::Semi,
            ]
        );
    }

    #[test]
    fn test_semicolon_after_closing_brace() {
        let tokens = lex("func f() {\n}\n");
        assert_eq!(
            tokens,
            vec![
                Token::Func,
                ident("f"),
                Token::LParen,
                Token::RParen,
                Token::LBrace,
                Token::RBrace,
                Token::Semi,
            ]
        );
    }

    #[test]
    fn test_semicolon_at_eof_without_newline() {
        let tokens = lex("x");
        assert_eq!(tokens, vec![ident("x"), Token::Semi]);
    }

    #[test]
    fn test_line_comment_gap_counts_as_newline() {
        let tokens = lex("x // trailing\ny");
        assert_eq!(
            tokens,
            vec![ident("x"), Token::Semi, ident("y"), Token::Semi]
        );
    }

    #[test]
    fn test_multiline_block_comment_counts_as_newline() {
        let tokens = lex("x /* a\nb */ y");
        assert_eq!(
            tokens,
            vec![ident("x"), Token::Semi, ident("y"), Token::Semi]
        );
    }

    #[test]
    fn test_single_line_block_comment_does_not() {
        let tokens = lex("x /* a */ = 1\n");
        assert_eq!(tokens, vec![ident("x"), Token::Eq, int("1"), Token::Semi]);
    }

    #[test]
    fn test_invalid_token_reports_offset() {
        let err = tokenize("var x @").unwrap_err();
        assert_eq!(err.offset, 6);
    }

    #[test]
    fn test_crasher_program() {
        let source = "package p\n\nimport \"sync\"\n\nfunc Crasher() {\n\tvar a []int\n\t_ = sync.Once{}\n\tprintln(a[0])\n}\n";
        let tokens = lex(source);
        assert!(tokens.contains(&Token::Package));
        assert!(tokens.contains(&string("\"sync\"")));
        // Every statement line ends in an inserted semicolon.
        let semis = tokens.iter().filter(|t| matches!(t, Token::Semi)).count();
        assert!(semis >= 5, "expected inserted semicolons, got {}", semis);
    }
}
