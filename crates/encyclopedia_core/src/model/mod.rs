//! Domain model for player-authored encyclopedia descriptions.
//!
//! # Responsibility
//! - Define the identifier shape shared by store, codec and UI glue.
//! - Provide one annotatable-entity capability for every encyclopedia page kind.
//!
//! # Invariants
//! - Entity identifiers are opaque; core never validates or interprets them.
//! - Empty or absent text always means "no description".

pub mod entity;
