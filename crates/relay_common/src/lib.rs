//! Shared foundational types for the Relay circuit simulator.
//!
//! This crate provides interned names: every signal and function name in a
//! circuit is interned once into a [`NameTable`] and referred to everywhere
//! else by a copyable [`Name`] key.

#![warn(missing_docs)]

pub mod name;

pub use name::{Name, NameTable};
