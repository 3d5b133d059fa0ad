use std::str::FromStr;

use crate::error::{AsmError, ErrorKind};
use crate::lexer::{tokenize, LTokenKind};
use crate::span::{Idx, Span};

/// Suffix marking the first token of a line as a label.
pub const LABEL_DELIMITER: char = ',';
/// Final token of a memory-reference line requesting indirect addressing.
pub const INDIRECT_MARKER: &str = "I";

/// Pseudo-ops understood by both passes.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum DirKind {
    /// Set the location counter
    Org,
    /// Stop assembling
    End,
    /// Signed decimal data word
    Dec,
    /// Hexadecimal data word
    Hex,
}

impl FromStr for DirKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ORG" => Ok(DirKind::Org),
            "END" => Ok(DirKind::End),
            "DEC" => Ok(DirKind::Dec),
            "HEX" => Ok(DirKind::Hex),
            _ => Err(()),
        }
    }
}

/// Single whitespace-separated word of a line, with its location in the whole source.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Token<'a> {
    pub text: &'a str,
    pub span: Span,
}

/// Non-blank, non-comment line with its label split off.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct SourceLine<'a> {
    /// 1-based line number
    pub number: usize,
    /// Label name without the delimiter
    pub label: Option<Token<'a>>,
    /// Mnemonic followed by operands, never empty
    pub tokens: Vec<Token<'a>>,
}

impl<'a> SourceLine<'a> {
    /// Tokenize one line starting at byte `offset` of the source.
    /// Returns `None` for blank and comment lines.
    pub fn parse(number: usize, offset: usize, text: &'a str) -> Result<Option<Self>, AsmError> {
        let mut words = Vec::new();
        let mut pos = 0;
        for tok in tokenize(text) {
            let len = tok.len as usize;
            match tok.kind {
                LTokenKind::Word => words.push(Token {
                    text: &text[pos..pos + len],
                    span: Span::new(Idx((offset + pos) as u32), len as u16),
                }),
                LTokenKind::Comment | LTokenKind::Eof => break,
                LTokenKind::Whitespace => {}
            }
            pos += len;
        }
        if words.is_empty() {
            return Ok(None);
        }

        let first = words[0].text;
        let label = match first.strip_suffix(LABEL_DELIMITER) {
            Some(name) => {
                let tok = words.remove(0);
                if name.is_empty() {
                    return Err(AsmError::at(
                        ErrorKind::MalformedLine {
                            expected: "a label name before `,`",
                        },
                        number,
                        tok.span,
                    ));
                }
                if words.is_empty() {
                    return Err(AsmError::at(
                        ErrorKind::MalformedLine {
                            expected: "an instruction or directive after the label",
                        },
                        number,
                        tok.span,
                    ));
                }
                Some(Token {
                    text: name,
                    span: Span::new(Idx(tok.span.offs() as u32), name.len() as u16),
                })
            }
            None => None,
        };

        Ok(Some(SourceLine {
            number,
            label,
            tokens: words,
        }))
    }

    /// First token after the label.
    pub fn mnemonic(&self) -> Token<'a> {
        self.tokens[0]
    }

    pub fn directive(&self) -> Option<DirKind> {
        self.mnemonic().text.parse().ok()
    }

    /// Token following the mnemonic, required for `expected`.
    pub fn operand(&self, expected: &'static str) -> Result<Token<'a>, AsmError> {
        self.tokens.get(1).copied().ok_or_else(|| {
            AsmError::at(
                ErrorKind::MalformedLine { expected },
                self.number,
                self.mnemonic().span,
            )
        })
    }

    /// An indirect marker counts only when it follows an operand.
    pub fn is_indirect(&self) -> bool {
        self.tokens.len() > 2
            && self
                .tokens
                .last()
                .is_some_and(|tok| tok.text == INDIRECT_MARKER)
    }

    pub fn error(&self, kind: ErrorKind, token: Token) -> AsmError {
        AsmError::at(kind, self.number, token.span)
    }
}

/// Lazily scan source lines, skipping blank and comment lines.
/// Byte offsets assume the lines are joined with `\n`.
pub fn scan<S: AsRef<str>>(
    lines: &[S],
) -> impl Iterator<Item = Result<SourceLine<'_>, AsmError>> + '_ {
    let mut offset = 0;
    lines.iter().enumerate().filter_map(move |(i, line)| {
        let text = line.as_ref();
        let start = offset;
        offset += text.len() + 1;
        SourceLine::parse(i + 1, start, text).transpose()
    })
}

/// Parse an `ORG` or `HEX` operand.
pub fn parse_hex(line: &SourceLine, tok: Token) -> Result<u16, AsmError> {
    u16::from_str_radix(tok.text, 16).map_err(|_| {
        line.error(
            ErrorKind::MalformedLiteral {
                literal: tok.text.into(),
                radix: 16,
            },
            tok,
        )
    })
}

/// Parse a `DEC` operand. Negative values are stored as 16-bit two's complement.
pub fn parse_dec(line: &SourceLine, tok: Token) -> Result<u16, AsmError> {
    match tok.text.parse::<i32>() {
        Ok(value @ 0..=0xFFFF) => Ok(value as u16),
        Ok(value @ -0x8000..=-1) => Ok((value + 0x1_0000) as u16),
        _ => Err(line.error(
            ErrorKind::MalformedLiteral {
                literal: tok.text.into(),
                radix: 10,
            },
            tok,
        )),
    }
}
