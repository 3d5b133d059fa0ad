use fxhash::FxHashMap;

use crate::error::{AsmError, ErrorKind};

/// Mnemonics and codes of the basic computer, as written in its reference table.
#[rustfmt::skip]
pub const BASIC_OPCODES: &[(&str, &str)] = &[
    // Memory-reference
    ("AND", "000"), ("ADD", "001"), ("LDA", "010"), ("STA", "011"),
    ("BUN", "100"), ("BSA", "101"), ("ISZ", "110"),
    // Register-reference
    ("CLA", "7800"), ("CLE", "7400"), ("CMA", "7200"), ("CIR", "7080"),
    ("CIL", "7040"), ("INC", "7020"), ("SPA", "7010"), ("SNA", "7008"),
    ("SZA", "7004"), ("SZE", "7002"), ("HLT", "7001"),
    // Input-output
    ("INP", "F800"), ("OUT", "F400"), ("SKI", "F200"), ("SKO", "F100"),
    ("ION", "F080"), ("IOF", "F040"),
];

/// Instruction class, resolved once when the table is built.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum OpcodeKind {
    /// 3-bit opcode placed between the indirect bit and the 12-bit address
    MemoryReference(u8),
    /// Complete instruction word, operands are not consulted
    NonMemoryReference(u16),
}

impl OpcodeKind {
    /// Classify a textual code: 3 binary digits or 4 hex digits.
    pub fn parse(mnemonic: &str, code: &str) -> Result<Self, AsmError> {
        let invalid = || {
            AsmError::new(ErrorKind::InvalidOpcodeFormat {
                mnemonic: mnemonic.into(),
                code: code.into(),
            })
        };
        let is_digits = |radix: u32| code.chars().all(|c| c.is_digit(radix));
        match code.len() {
            3 if is_digits(2) => u8::from_str_radix(code, 2)
                .map(OpcodeKind::MemoryReference)
                .map_err(|_| invalid()),
            4 if is_digits(16) => u16::from_str_radix(code, 16)
                .map(OpcodeKind::NonMemoryReference)
                .map_err(|_| invalid()),
            _ => Err(invalid()),
        }
    }
}

/// Read-only mapping of mnemonic to instruction class. Mnemonics are case-sensitive.
#[derive(Clone, Debug)]
pub struct OpcodeTable {
    table: FxHashMap<String, OpcodeKind>,
}

impl OpcodeTable {
    /// Table for the basic computer instruction set.
    pub fn basic() -> Self {
        Self::from_entries(BASIC_OPCODES)
            .unwrap_or_else(|err| unreachable!("built-in opcode table is malformed: {err}"))
    }

    /// Build a table from `(mnemonic, code)` pairs, rejecting any code of the wrong shape.
    /// A repeated mnemonic keeps its last code.
    pub fn from_entries<M, C>(entries: &[(M, C)]) -> Result<Self, AsmError>
    where
        M: AsRef<str>,
        C: AsRef<str>,
    {
        let mut table = FxHashMap::default();
        for (mnemonic, code) in entries {
            let mnemonic = mnemonic.as_ref();
            let kind = OpcodeKind::parse(mnemonic, code.as_ref())?;
            table.insert(mnemonic.to_owned(), kind);
        }
        Ok(OpcodeTable { table })
    }

    pub fn get(&self, mnemonic: &str) -> Option<OpcodeKind> {
        self.table.get(mnemonic).copied()
    }

    pub fn contains(&self, mnemonic: &str) -> bool {
        self.table.contains_key(mnemonic)
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

impl Default for OpcodeTable {
    fn default() -> Self {
        Self::basic()
    }
}
