use crate::lexer::cursor::Cursor;

pub mod cursor;

/// A 'light' token that only carries basic and easily derivable info
#[derive(Debug, PartialEq, Eq)]
pub struct LToken {
    pub kind: LTokenKind,
    pub len: u32,
}

impl LToken {
    pub fn new(kind: LTokenKind, len: u32) -> Self {
        LToken { kind, len }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum LTokenKind {
    /// Any run of non-whitespace characters: labels, mnemonics, literals and `I`
    Word,
    /// From a `/` that starts a token to the end of the line
    Comment,
    Whitespace,
    Eof,
}

/// Lazily tokenize a single source line, including whitespace and comments.
pub fn tokenize(input: &str) -> impl Iterator<Item = LToken> + '_ {
    let mut cursor = Cursor::new(input);
    std::iter::from_fn(move || {
        let token = cursor.advance_token();
        if token.kind != LTokenKind::Eof {
            Some(token)
        } else {
            None
        }
    })
}

/// Comment marker, only meaningful at the start of a token.
pub(crate) const COMMENT: char = '/';

/// Test if a character separates tokens.
pub(crate) fn is_whitespace(c: char) -> bool {
    c.is_whitespace()
}

impl Cursor<'_> {
    pub fn advance_token(&mut self) -> LToken {
        let first_char = match self.bump() {
            Some(c) => c,
            None => return LToken::new(LTokenKind::Eof, 0),
        };
        let token_kind = match first_char {
            COMMENT => {
                self.take_while(|_| true);
                LTokenKind::Comment
            }
            c if is_whitespace(c) => {
                self.take_while(is_whitespace);
                LTokenKind::Whitespace
            }
            _ => {
                self.take_while(|c| !is_whitespace(c));
                LTokenKind::Word
            }
        };
        let res = LToken::new(token_kind, self.pos_in_token());
        self.reset_pos();
        res
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<(LTokenKind, u32)> {
        tokenize(input).map(|tok| (tok.kind, tok.len)).collect()
    }

    #[test]
    fn words_and_whitespace() {
        use LTokenKind::*;
        assert_eq!(
            kinds("MIN, DEC 83"),
            vec![(Word, 4), (Whitespace, 1), (Word, 3), (Whitespace, 1), (Word, 2)]
        );
        assert_eq!(kinds("\tLDA  PTR I"), vec![
            (Whitespace, 1),
            (Word, 3),
            (Whitespace, 2),
            (Word, 3),
            (Whitespace, 1),
            (Word, 1),
        ]);
    }

    #[test]
    fn comments_run_to_end_of_line() {
        use LTokenKind::*;
        assert_eq!(kinds("/ whole line"), vec![(Comment, 12)]);
        assert_eq!(
            kinds("CLA /clear AC"),
            vec![(Word, 3), (Whitespace, 1), (Comment, 9)]
        );
        // Slash inside a word is not a comment
        assert_eq!(kinds("A/B"), vec![(Word, 3)]);
    }

    #[test]
    fn empty_line() {
        assert!(kinds("").is_empty());
    }
}
