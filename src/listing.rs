use std::fmt;

use crate::assembler::Assembly;
use crate::encoder::BinaryOutput;
use crate::symbol::SymbolTable;

/// One `LABEL: XXX` line per symbol, in order of definition.
impl fmt::Display for SymbolTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, address) in self.iter() {
            writeln!(f, "{}: {:03X}", name, address)?;
        }
        Ok(())
    }
}

/// One `XXX: BBBBBBBBBBBBBBBB` line per word, in source order.
impl fmt::Display for BinaryOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (address, word) in self {
            writeln!(f, "{:03X}: {}", address, word)?;
        }
        Ok(())
    }
}

/// Symbol table followed by machine code, with headings.
impl fmt::Display for Assembly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Symbol Table:")?;
        write!(f, "{}", self.symbols())?;
        writeln!(f, "\nMachine Code:")?;
        write!(f, "{}", self.output())
    }
}
