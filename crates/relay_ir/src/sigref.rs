//! Signal references.
//!
//! A [`SigRef`] identifies one boolean signal in the environment. Latch
//! outputs are a distinct variant rather than a mangled name: the original
//! formulation of this simulator derived a latch's output name by appending
//! a marker character, which a user-declared signal could collide with.
//! Keeping the distinction structural makes that collision unrepresentable;
//! the marker survives only as a display convention.

use relay_common::{Name, NameTable};
use serde::{Deserialize, Serialize};

/// The marker appended to a latch name when rendering its registered output.
pub const LATCH_OUT_MARKER: char = '\'';

/// A reference to one boolean signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SigRef {
    /// A user-declared signal (input, output, latch input, or internal).
    Named(Name),
    /// The registered output of the latch with the given name.
    LatchOut(Name),
}

impl SigRef {
    /// Returns the underlying declared name.
    ///
    /// For a latch output this is the latch's own name, without the marker.
    pub fn name(self) -> Name {
        match self {
            SigRef::Named(n) | SigRef::LatchOut(n) => n,
        }
    }

    /// Returns `true` if this reference is a latch's registered output.
    pub fn is_latch_out(self) -> bool {
        matches!(self, SigRef::LatchOut(_))
    }

    /// Renders this reference for display, resolving through `names`.
    ///
    /// Latch outputs get the conventional marker: latch `D` renders as `D'`.
    pub fn display(self, names: &NameTable) -> String {
        match self {
            SigRef::Named(n) => names.resolve(n).to_string(),
            SigRef::LatchOut(n) => format!("{}{}", names.resolve(n), LATCH_OUT_MARKER),
        }
    }
}
