use crate::encoder::Word;
use crate::error::AsmError;

/// Something the assembler did, reported to an optional observer as it happens.
#[derive(Clone, Copy, Debug)]
pub enum Event<'a> {
    /// Pass 1 bound a label
    Label { name: &'a str, address: u16 },
    /// `ORG` moved the location counter
    Origin { pass: u8, address: u16 },
    /// Pass 2 produced a word
    Emit {
        line: usize,
        address: u16,
        word: Word,
        source: Emitted<'a>,
    },
    /// Recoverable problem, assembly continues
    Diagnostic(&'a AsmError),
}

/// What produced an emitted word.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Emitted<'a> {
    MemoryReference {
        mnemonic: &'a str,
        operand: &'a str,
        indirect: bool,
    },
    NonMemoryReference { mnemonic: &'a str },
    Data { directive: &'a str, literal: &'a str },
}

/// Observer that ignores everything.
pub fn ignore(_: &Event) {}
