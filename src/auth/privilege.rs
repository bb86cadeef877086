//! Module `privilege`
//!
//! Access levels a user may hold on an (application, perimeter).

use serde::Deserialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Privilege {
    Read,
    Write,
}

impl Privilege {
    /// Verb used in diagnostics ("read" / "write").
    pub fn action(&self) -> &'static str {
        match self {
            Privilege::Read => "read",
            Privilege::Write => "write",
        }
    }

    /// Whether holding `self` authorizes an operation requiring `required`.
    ///
    /// WRITE covers READ; READ never covers WRITE.
    pub fn grants(&self, required: Privilege) -> bool {
        match required {
            Privilege::Read => true,
            Privilege::Write => *self == Privilege::Write,
        }
    }
}

impl fmt::Display for Privilege {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.action())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_grants_read() {
        assert!(Privilege::Write.grants(Privilege::Read));
        assert!(Privilege::Write.grants(Privilege::Write));
    }

    #[test]
    fn test_read_never_grants_write() {
        assert!(Privilege::Read.grants(Privilege::Read));
        assert!(!Privilege::Read.grants(Privilege::Write));
    }
}
