/// Primitive cell contents and their kinds.
///
/// Defines `Datum`, the integer/real/text magnitude stored in a cell, the
/// `ValueKind` discriminator, and `KindSet`, the set of kinds an argument slot
/// accepts or a node may return. Binding works entirely in terms of kind sets.
pub mod datum;
/// Provenance metadata carried by every value.
///
/// Defines `Rank`, which distinguishes per-process variants of the same
/// logical variable, and `ErrorKind`, which names how an uncertainty was
/// measured.
pub mod rank;

pub mod core;

pub use self::{
    core::Value,
    datum::{Datum, KindSet, ValueKind},
    rank::{ErrorKind, Rank},
};
