use std::fmt;

use crate::error::{AsmError, ErrorKind};
use crate::event::{Emitted, Event};
use crate::opcode::{OpcodeKind, OpcodeTable};
use crate::source::{parse_dec, parse_hex, scan, DirKind, SourceLine};
use crate::symbol::{origin, LocationCounter, SymbolTable};

/// Largest address a memory-reference instruction can hold.
pub const ADDRESS_MAX: u16 = 0x0FFF;

/// Single 16-bit machine word.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Word(pub u16);

impl Word {
    /// Indirect bit, 3-bit opcode, then 12-bit address.
    pub fn memory_reference(indirect: bool, opcode: u8, address: u16) -> Self {
        let indirect = u16::from(indirect) << 15;
        let opcode = u16::from(opcode & 0b111) << 12;
        Word(indirect | opcode | (address & ADDRESS_MAX))
    }

    pub fn is_indirect(&self) -> bool {
        self.0 & 0x8000 != 0
    }

    /// 16-character string of `0` and `1`, most significant bit first.
    pub fn bits(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016b}", self.0)
    }
}

/// Words in the order their lines appear in the source, with their addresses.
/// Addresses are not necessarily increasing when the source uses several `ORG`s.
#[derive(Clone, Default, PartialEq, Eq, Debug)]
pub struct BinaryOutput {
    words: Vec<(u16, Word)>,
}

impl BinaryOutput {
    fn push(&mut self, address: u16, word: Word) {
        self.words.push((address, word))
    }

    pub fn get(&self, idx: usize) -> Option<(u16, Word)> {
        self.words.get(idx).copied()
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u16, Word)> + '_ {
        self.words.iter().copied()
    }
}

impl<'a> IntoIterator for &'a BinaryOutput {
    type Item = (u16, Word);
    type IntoIter = std::iter::Copied<std::slice::Iter<'a, (u16, Word)>>;

    fn into_iter(self) -> Self::IntoIter {
        self.words.iter().copied()
    }
}

/// Result of pass 2.
#[derive(Clone, Default, PartialEq, Eq, Debug)]
pub struct Encoded {
    pub output: BinaryOutput,
    /// Recoverable errors, empty in strict mode
    pub diagnostics: Vec<AsmError>,
}

/// Pass 2: encode every instruction and data line using the symbols from pass 1.
///
/// In strict mode undefined symbols and unrecognized mnemonics are returned as errors.
/// Otherwise they are collected as diagnostics: an undefined symbol encodes as address 0 and
/// an unrecognized line emits nothing.
pub fn second_pass<S: AsRef<str>>(
    lines: &[S],
    symbols: &SymbolTable,
    opcodes: &OpcodeTable,
    strict: bool,
    observer: &mut dyn FnMut(&Event),
) -> Result<Encoded, AsmError> {
    let mut encoder = Encoder {
        symbols,
        opcodes,
        strict,
        observer,
        diagnostics: Vec::new(),
    };
    let output = encoder.run(lines)?;
    Ok(Encoded {
        output,
        diagnostics: encoder.diagnostics,
    })
}

struct Encoder<'a, 'o> {
    symbols: &'a SymbolTable,
    opcodes: &'a OpcodeTable,
    strict: bool,
    observer: &'o mut dyn FnMut(&Event),
    diagnostics: Vec<AsmError>,
}

impl Encoder<'_, '_> {
    fn run<S: AsRef<str>>(&mut self, lines: &[S]) -> Result<BinaryOutput, AsmError> {
        let mut output = BinaryOutput::default();
        let mut counter = LocationCounter::default();

        for line in scan(lines) {
            let line = line?;
            let mnemonic = line.mnemonic();

            let (word, source) = match (line.directive(), self.opcodes.get(mnemonic.text)) {
                (Some(DirKind::Org), _) => {
                    let address = origin(&line)?;
                    counter.set(address);
                    (self.observer)(&Event::Origin { pass: 2, address });
                    continue;
                }
                (Some(DirKind::End), _) => break,
                (_, Some(kind)) => self.instruction(&line, kind)?,
                (Some(directive), None) => self.data(&line, directive)?,
                (None, None) => {
                    self.recover(line.error(
                        ErrorKind::UnrecognizedMnemonic {
                            mnemonic: mnemonic.text.into(),
                        },
                        mnemonic,
                    ))?;
                    continue;
                }
            };

            let address = counter.current(&line, mnemonic)?;
            output.push(address, word);
            (self.observer)(&Event::Emit {
                line: line.number,
                address,
                word,
                source,
            });
            counter.advance();
        }
        Ok(output)
    }

    fn instruction<'l>(
        &mut self,
        line: &SourceLine<'l>,
        kind: OpcodeKind,
    ) -> Result<(Word, Emitted<'l>), AsmError> {
        let mnemonic = line.mnemonic().text;
        match kind {
            OpcodeKind::MemoryReference(opcode) => {
                let tok = line.operand("an address label after the instruction")?;
                let operand = tok.text.trim_matches(',');
                let address = match self.symbols.get(operand) {
                    Some(address) => address,
                    None => {
                        self.recover(line.error(
                            ErrorKind::UndefinedSymbol {
                                label: operand.into(),
                            },
                            tok,
                        ))?;
                        0
                    }
                };
                if address > ADDRESS_MAX {
                    return Err(line.error(
                        ErrorKind::AddressOverflow {
                            address: address.into(),
                            bits: 12,
                        },
                        tok,
                    ));
                }
                let indirect = line.is_indirect();
                Ok((
                    Word::memory_reference(indirect, opcode, address),
                    Emitted::MemoryReference {
                        mnemonic,
                        operand,
                        indirect,
                    },
                ))
            }
            OpcodeKind::NonMemoryReference(code) => {
                Ok((Word(code), Emitted::NonMemoryReference { mnemonic }))
            }
        }
    }

    fn data<'l>(
        &self,
        line: &SourceLine<'l>,
        directive: DirKind,
    ) -> Result<(Word, Emitted<'l>), AsmError> {
        let (tok, value) = match directive {
            DirKind::Dec => {
                let tok = line.operand("a decimal value after `DEC`")?;
                (tok, parse_dec(line, tok)?)
            }
            DirKind::Hex => {
                let tok = line.operand("a hexadecimal value after `HEX`")?;
                (tok, parse_hex(line, tok)?)
            }
            DirKind::Org | DirKind::End => unreachable!("handled before encoding"),
        };
        Ok((
            Word(value),
            Emitted::Data {
                directive: line.mnemonic().text,
                literal: tok.text,
            },
        ))
    }

    /// Fail in strict mode, otherwise record the diagnostic and carry on.
    fn recover(&mut self, err: AsmError) -> Result<(), AsmError> {
        if self.strict {
            return Err(err);
        }
        (self.observer)(&Event::Diagnostic(&err));
        self.diagnostics.push(err);
        Ok(())
    }
}
