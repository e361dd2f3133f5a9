//! # hallsym: Hall symbols to space-group operations
//!
//! `hallsym` expands Hall symbols (S. R. Hall, *Acta Cryst.* A37, 517, 1981) and their magnetic
//! extension into the complete sets of symmetry operations they denote, with the following
//! capabilities:
//! - parsing of standard and magnetic Hall symbols, including the history-dependent default axes,
//! - group closure via cyclic subgroups, lattice centerings, and origin shifts,
//! - breadth-first coset enumeration for magnetic space groups with time reversal,
//! - changes of basis between crystallographic settings, including the transformations to the
//!   ITA standard settings, and
//! - a compact bijective integer encoding of operations for embedding in static tables.
//!
//! All arithmetic is exact: linear parts are integer matrices and translations are rationals, so
//! no tolerance enters any comparison.
//!
//! ## Examples and usage
//!
//! For most items (structs, enums, functions, and traits), their usages are illustrated in test
//! functions.
//!
//! ```
//! use hallsym::hall::HallSymbol;
//! use hallsym::hall::magnetic_hall::MagneticHallSymbol;
//!
//! let pbca = HallSymbol::new("-P 2ac 2ab").unwrap();
//! assert_eq!(pbca.order(), 8);
//!
//! let mhall = MagneticHallSymbol::new("P 6c 2c' -1'").unwrap();
//! assert_eq!(mhall.coset().len(), 24);
//! ```
//!
//! ## Logging
//!
//! Diagnostics are emitted through the [`log`](https://docs.rs/log) facade. No logger is
//! installed by this crate.
//!
//! ## License
//!
//! GNU Lesser General Public License v3.0.

pub mod codec;
pub mod hall;
pub mod operation;
pub mod transformation;
