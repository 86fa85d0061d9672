//! # Pattern Abstract Syntax Tree
//!
//! This module defines the AST for the restricted numeric-regex dialect the
//! normalizer accepts. Patterns are written against natural decimal notation
//! (`-?\d+(\.\d+)?` shaped values) and rewritten by the transform into
//! patterns over the encoded alphabet.
//!
//! ## Architecture Overview
//!
//! - **[tokens]** - Lexical tokens produced by the lexer
//! - **[nodes]** - Node kinds and quantifiers
//! - **[tree]** - The arena that owns every node
//!
//! ## Tree shape
//!
//! Nodes live in a flat arena owned by [`PatternTree`] and refer to each
//! other by [`NodeId`] index; every node keeps a back-reference to its
//! parent, so diagnostics and tests can walk upward as well as down. The
//! root is always an `Expression`. Two shape rules matter to every consumer:
//!
//! - a `Repetition` node is the immediate following sibling of the node it
//!   quantifies, not its parent;
//! - anchors appear only as the first/last children of the root.
//!
//! ```text
//! "-12(3|4)"         Expression
//!                    ├── SingleChar('-')
//!                    ├── SingleChar('1')
//!                    ├── SingleChar('2')
//!                    └── Group
//!                        └── Alternation
//!                            ├── Expression ── SingleChar('3')
//!                            └── Expression ── SingleChar('4')
//! ```
pub mod tokens;
pub mod nodes;
pub mod tree;

pub use tokens::Token;
pub use nodes::{NodeKind, Quantifier};
pub use tree::{NodeId, PatternTree};
