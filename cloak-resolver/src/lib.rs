//! # Cloak Resolver
//!
//! Resolves human-readable names to recipients' published stealth keys.
//!
//! Resolution is a two-step lookup against external collaborators:
//!
//! 1. A [`cloak_core::traits::NameService`] (ENS, CNS, ...) maps the name to
//!    an address
//! 2. The stealth key registry maps the address to published keys
//!
//! Three failure states stay distinguishable for callers: the name has no
//! registration (`NameNotRegistered`), the resolved address has no keys
//! (`NoKeysRegistered`), and the lookup service was unreachable
//! (`ResolutionFailed` / transport kinds). The resolver never collapses a
//! transport failure into a false "no keys" answer.

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

pub mod directory;
pub mod resolver;

pub use directory::StaticNameService;
pub use resolver::{DomainResolver, ResolverConfig};
