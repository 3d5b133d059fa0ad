use crate::encoder::{second_pass, BinaryOutput};
use crate::error::AsmError;
use crate::event::{ignore, Event};
use crate::opcode::OpcodeTable;
use crate::symbol::{first_pass, SymbolTable};

/// Two-pass assembler over a fixed opcode table.
#[derive(Clone, Debug, Default)]
pub struct Assembler {
    opcodes: OpcodeTable,
    strict: bool,
}

/// Everything produced by assembling one source unit.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Assembly {
    symbols: SymbolTable,
    output: BinaryOutput,
    diagnostics: Vec<AsmError>,
}

impl Assembler {
    /// Assembler for the basic computer instruction set, in lenient mode.
    pub fn new() -> Self {
        Self::with_opcodes(OpcodeTable::basic())
    }

    pub fn with_opcodes(opcodes: OpcodeTable) -> Self {
        Assembler {
            opcodes,
            strict: false,
        }
    }

    /// Turn undefined symbols and unrecognized mnemonics into hard errors.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Run pass 1 only.
    pub fn symbols<S: AsRef<str>>(&self, lines: &[S]) -> Result<SymbolTable, AsmError> {
        first_pass(lines, &mut ignore)
    }

    pub fn assemble<S: AsRef<str>>(&self, lines: &[S]) -> Result<Assembly, AsmError> {
        self.assemble_with(lines, &mut ignore)
    }

    /// Assemble, reporting progress to `observer`. Pass 2 only starts once pass 1 has
    /// completed without error.
    pub fn assemble_with<S: AsRef<str>>(
        &self,
        lines: &[S],
        observer: &mut dyn FnMut(&Event),
    ) -> Result<Assembly, AsmError> {
        let symbols = first_pass(lines, observer)?;
        let encoded = second_pass(lines, &symbols, &self.opcodes, self.strict, observer)?;
        Ok(Assembly {
            symbols,
            output: encoded.output,
            diagnostics: encoded.diagnostics,
        })
    }
}

impl Assembly {
    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    pub fn output(&self) -> &BinaryOutput {
        &self.output
    }

    /// Recoverable errors encountered in lenient mode.
    pub fn diagnostics(&self) -> &[AsmError] {
        &self.diagnostics
    }

    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

/// Assemble with the basic instruction set in lenient mode.
pub fn assemble<S: AsRef<str>>(lines: &[S]) -> Result<Assembly, AsmError> {
    Assembler::new().assemble(lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::Word;
    use crate::error::ErrorKind;

    const SUBTRACT: &[&str] = &[
        "ORG 100", "LDA SUB", "CMA", "INC", "ADD MIN", "STA DIF", "HLT",
        "MIN, DEC 83", "SUB, DEC -23", "DIF, HEX 0", "END",
    ];

    #[test]
    fn subtraction_program() {
        let assembly = assemble(SUBTRACT).unwrap();
        assert!(assembly.is_clean());

        let symbols: Vec<_> = assembly.symbols().iter().collect();
        assert_eq!(symbols, [("MIN", 0x106), ("SUB", 0x107), ("DIF", 0x108)]);

        #[rustfmt::skip]
        let expected = [
            (0x100, "0010000100000111"), // LDA SUB
            (0x101, "0111001000000000"), // CMA
            (0x102, "0111000000100000"), // INC
            (0x103, "0001000100000110"), // ADD MIN
            (0x104, "0011000100001000"), // STA DIF
            (0x105, "0111000000000001"), // HLT
            (0x106, "0000000001010011"), // DEC 83
            (0x107, "1111111111101001"), // DEC -23
            (0x108, "0000000000000000"), // HEX 0
        ];
        let actual: Vec<_> = assembly
            .output()
            .iter()
            .map(|(addr, word)| (addr, word.bits()))
            .collect();
        assert_eq!(actual.len(), expected.len());
        for ((addr, bits), (exp_addr, exp_bits)) in actual.iter().zip(expected) {
            assert_eq!(*addr, exp_addr);
            assert_eq!(bits, exp_bits, "word at {addr:03X}");
        }
    }

    #[test]
    fn every_word_is_sixteen_bits() {
        let assembly = assemble(SUBTRACT).unwrap();
        for (_, word) in assembly.output() {
            let bits = word.bits();
            assert_eq!(bits.len(), 16);
            assert!(bits.chars().all(|c| c == '0' || c == '1'));
        }
    }

    #[test]
    fn idempotent() {
        let assembler = Assembler::new();
        let first = assembler.assemble(SUBTRACT).unwrap();
        let second = assembler.assemble(SUBTRACT).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn indirect_bit_tracks_marker() {
        let src = ["LDA P I", "LDA P", "ADD P, I", "P, HEX 0"];
        let words: Vec<_> = assemble(&src).unwrap().output().iter().collect();
        assert!(words[0].1.is_indirect());
        assert!(!words[1].1.is_indirect());
        assert!(words[2].1.is_indirect());
    }

    #[test]
    fn word_count_matches_consumed_lines() {
        let src = [
            "/ program", "", "ORG 10", "A, CLA", "   / indented comment", "INC",
            "B, HEX 3", "END", "CLA",
        ];
        let assembly = assemble(&src).unwrap();
        assert_eq!(assembly.output().len(), 3);
    }

    #[test]
    fn strict_mode() {
        let src = ["LDA MISSING"];
        let lenient = Assembler::new().assemble(&src).unwrap();
        assert_eq!(lenient.diagnostics().len(), 1);
        assert_eq!(lenient.output().get(0), Some((0, Word(0x2000))));

        let err = Assembler::new().strict(true).assemble(&src).unwrap_err();
        assert_eq!(
            err.kind,
            ErrorKind::UndefinedSymbol {
                label: "MISSING".into()
            }
        );
    }

    #[test]
    fn pass_one_errors_stop_pass_two() {
        let mut emitted = 0;
        let err = Assembler::new()
            .assemble_with(&["CLA", "ORG XYZ"], &mut |event: &Event| {
                if let Event::Emit { .. } = event {
                    emitted += 1;
                }
            })
            .unwrap_err();
        assert!(matches!(err.kind, ErrorKind::MalformedLiteral { .. }));
        assert_eq!(emitted, 0);
    }

    #[test]
    fn custom_opcode_table() {
        let table = OpcodeTable::from_entries(&[("NOP", "0000"), ("JMP", "111")]).unwrap();
        let assembly = Assembler::with_opcodes(table)
            .assemble(&["JMP L", "L, NOP"])
            .unwrap();
        let words: Vec<_> = assembly.output().iter().map(|(_, w)| w).collect();
        assert_eq!(words, [Word(0x7001), Word(0x0000)]);
    }
}
