use fxhash::FxBuildHasher;
use indexmap::IndexMap;

use crate::error::{AsmError, ErrorKind};
use crate::event::Event;
use crate::source::{parse_hex, scan, DirKind, SourceLine, Token};

// Symbol table of symbol -> memory address, in order of first definition
type FxMap<K, V> = IndexMap<K, V, FxBuildHasher>;

/// Label bindings produced by pass 1. Read-only once built.
#[derive(Clone, Default, PartialEq, Eq, Debug)]
pub struct SymbolTable {
    table: FxMap<String, u16>,
}

impl SymbolTable {
    pub fn new() -> Self {
        SymbolTable {
            table: IndexMap::with_hasher(FxBuildHasher::default()),
        }
    }

    /// Bind a label. Redefinition overwrites the address but keeps the original position.
    fn insert(&mut self, name: &str, address: u16) {
        self.table.insert(name.to_owned(), address);
    }

    pub fn get(&self, name: &str) -> Option<u16> {
        self.table.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u16)> {
        self.table.iter().map(|(name, addr)| (name.as_str(), *addr))
    }
}

/// Address of the next word. Wider than a word so running off the end of memory is caught
/// where a word or label is placed, not where the counter advances.
#[derive(Clone, Copy, Default, Debug)]
pub(crate) struct LocationCounter(u32);

impl LocationCounter {
    pub fn set(&mut self, address: u16) {
        self.0 = address.into();
    }

    pub fn advance(&mut self) {
        self.0 += 1;
    }

    /// Current address, as used by `tok` on `line`.
    pub fn current(&self, line: &SourceLine, tok: Token) -> Result<u16, AsmError> {
        u16::try_from(self.0).map_err(|_| {
            line.error(
                ErrorKind::AddressOverflow {
                    address: self.0,
                    bits: 16,
                },
                tok,
            )
        })
    }
}

/// Read `ORG`'s operand.
pub(crate) fn origin(line: &SourceLine) -> Result<u16, AsmError> {
    let tok = line.operand("an address after `ORG`")?;
    parse_hex(line, tok)
}

/// Pass 1: bind every label to the location counter value at its line.
pub fn first_pass<S: AsRef<str>>(
    lines: &[S],
    observer: &mut dyn FnMut(&Event),
) -> Result<SymbolTable, AsmError> {
    let mut symbols = SymbolTable::new();
    let mut counter = LocationCounter::default();

    for line in scan(lines) {
        let line = line?;

        if let Some(label) = line.label {
            let address = counter.current(&line, label)?;
            symbols.insert(label.text, address);
            observer(&Event::Label {
                name: label.text,
                address,
            });
        }

        match line.directive() {
            Some(DirKind::Org) => {
                let address = origin(&line)?;
                counter.set(address);
                observer(&Event::Origin { pass: 1, address });
            }
            Some(DirKind::End) => break,
            _ => counter.advance(),
        }
    }
    Ok(symbols)
}
