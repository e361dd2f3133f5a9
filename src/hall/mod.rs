//! Expansion of Hall symbols into complete sets of space-group operations.
//!
//! A Hall symbol (S. R. Hall, *Acta Cryst.* A37, 517, 1981; ITB Section A1.4.2.3) lists a
//! lattice symbol, a small number of generators, and an optional origin shift. [`HallSymbol`]
//! expands it into every coset representative of the space group over its primitive translation
//! subgroup within the conventional cell, and [`magnetic_hall::MagneticHallSymbol`] does the same
//! for magnetic Hall symbols carrying time reversal.

use std::error::Error;
use std::fmt;

use indexmap::IndexSet;
use itertools::Itertools;
use nalgebra::{Matrix3, Vector3};
use num::rational::Rational64;
use num_traits::Zero;

use crate::operation::{Operation, MAX_ROTATION_ORDER};

pub mod generator;
pub mod hall_parser;
pub mod hall_tables;
pub mod magnetic_hall;

use hall_parser::{HallNotation, HallSymbolParseError, HallSymbolParser, ParsedHallSymbol};
use hall_tables::{LatticeSymbol, TableLookupError};
use magnetic_hall::CosetNonterminationError;


// =================
// Error definitions
// =================

/// Error for a violated invariant while closing a set of generators into a group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClosureInvariantError {
    /// The Hall symbol being expanded.
    pub hall_symbol: String,

    /// A description of the violated invariant.
    pub reason: String,
}

impl fmt::Display for ClosureInvariantError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Closure invariant violated for Hall symbol `{}`: {}.",
            self.hall_symbol, self.reason
        )
    }
}

impl Error for ClosureInvariantError {}

/// Enumerated type for all failures that can occur while expanding a Hall symbol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HallSymbolError {
    /// The symbol does not conform to the grammar.
    Parse(HallSymbolParseError),

    /// A rotation or translation code is missing from the fixed tables.
    TableLookup(TableLookupError),

    /// The closure engine produced an inconsistent group.
    ClosureInvariant(ClosureInvariantError),

    /// The breadth-first coset enumeration did not terminate within its bound.
    CosetNontermination(CosetNonterminationError),
}

impl fmt::Display for HallSymbolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(err) => write!(f, "{err}"),
            Self::TableLookup(err) => write!(f, "{err}"),
            Self::ClosureInvariant(err) => write!(f, "{err}"),
            Self::CosetNontermination(err) => write!(f, "{err}"),
        }
    }
}

impl Error for HallSymbolError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Parse(err) => Some(err),
            Self::TableLookup(err) => Some(err),
            Self::ClosureInvariant(err) => Some(err),
            Self::CosetNontermination(err) => Some(err),
        }
    }
}

impl From<HallSymbolParseError> for HallSymbolError {
    fn from(err: HallSymbolParseError) -> Self {
        Self::Parse(err)
    }
}

impl From<TableLookupError> for HallSymbolError {
    fn from(err: TableLookupError) -> Self {
        Self::TableLookup(err)
    }
}

impl From<ClosureInvariantError> for HallSymbolError {
    fn from(err: ClosureInvariantError) -> Self {
        Self::ClosureInvariant(err)
    }
}

impl From<CosetNonterminationError> for HallSymbolError {
    fn from(err: CosetNonterminationError) -> Self {
        Self::CosetNontermination(err)
    }
}

// ======================================
// Struct definitions and implementations
// ======================================

/// A structure holding a Hall symbol together with its fully expanded operations.
#[derive(Clone, Debug)]
pub struct HallSymbol {
    /// The Hall symbol as given.
    symbol: String,

    /// The decomposition of the symbol.
    parsed: ParsedHallSymbol,

    /// The resolved generators, in order of appearance, excluding the implicit inversion.
    generators: Vec<Operation>,

    /// The expanded operations. The first operation is always the identity, and every
    /// translation lies in $`[0, 1)`$.
    operations: Vec<Operation>,
}

impl HallSymbol {
    /// Parses a Hall symbol in standard notation and expands it into its operations.
    ///
    /// # Errors
    ///
    /// Errors if the symbol cannot be parsed, if a table lookup fails, or if the expanded
    /// operations violate a closure invariant.
    pub fn new(symbol: &str) -> Result<Self, HallSymbolError> {
        let parsed = HallSymbolParser::new(symbol, HallNotation::Standard).parse()?;
        let generators = parsed
            .generators
            .iter()
            .map(|descriptor| descriptor.resolve())
            .collect::<Result<Vec<_>, _>>()?;
        let operations = ClosureEngine::new(symbol).expand(&parsed, &generators)?;
        log::debug!(
            "Hall symbol `{symbol}` expanded into {} operation(s).",
            operations.len()
        );
        Ok(Self {
            symbol: symbol.to_string(),
            parsed,
            generators,
            operations,
        })
    }

    /// The Hall symbol.
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// The lattice symbol.
    pub fn lattice(&self) -> LatticeSymbol {
        self.parsed.lattice
    }

    /// Returns `true` if inversion at the origin is an implicit generator.
    pub fn inversion_at_origin(&self) -> bool {
        self.parsed.inversion_at_origin
    }

    /// The origin shift, if any.
    pub fn origin_shift(&self) -> Option<&Vector3<Rational64>> {
        self.parsed.origin_shift.as_ref()
    }

    /// The resolved generators in their original setting, before any origin shift.
    pub fn generators(&self) -> &[Operation] {
        &self.generators
    }

    /// The expanded operations, with the identity first.
    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    /// The number of expanded operations.
    pub fn order(&self) -> usize {
        self.operations.len()
    }
}

impl fmt::Display for HallSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Hall symbol `{}` ({} operations)", self.symbol, self.order())?;
        for (i, op) in self.operations.iter().enumerate() {
            writeln!(f, "{:>4}: {op}", i + 1)?;
        }
        Ok(())
    }
}

/// The generator-closure algorithm for standard Hall symbols.
struct ClosureEngine<'a> {
    symbol: &'a str,
}

impl<'a> ClosureEngine<'a> {
    fn new(symbol: &'a str) -> Self {
        Self { symbol }
    }

    fn invariant_error(&self, reason: String) -> ClosureInvariantError {
        let err = ClosureInvariantError {
            hall_symbol: self.symbol.to_string(),
            reason,
        };
        log::error!("{err}");
        err
    }

    /// Runs the full expansion: cyclic subgroups, products, origin shift, centering, and
    /// identity canonicalisation.
    fn expand(
        &self,
        parsed: &ParsedHallSymbol,
        generators: &[Operation],
    ) -> Result<Vec<Operation>, ClosureInvariantError> {
        let mut group = if parsed.inversion_at_origin {
            vec![
                Operation::identity(),
                Operation::from_linear(-Matrix3::<i32>::identity()),
            ]
        } else {
            vec![Operation::identity()]
        };

        for generator in generators.iter() {
            let cyclic = self.cyclic_subgroup(generator)?;
            group = self.multiply(&cyclic, &group)?;
        }

        if let Some(shift) = parsed.origin_shift.as_ref() {
            group = group
                .iter()
                .map(|op| op.with_origin_shift(shift))
                .collect();
        }

        let centered = parsed
            .lattice
            .centering_translations()
            .iter()
            .flat_map(|centering| group.iter().map(move |op| op.translated(centering).reduced()))
            .collect::<Vec<_>>();

        self.canonicalise_identity(centered)
    }

    /// Generates $`g, g^2, \ldots, g^n`$ where $`n`$ is the order of the linear part of $`g`$.
    /// The last power, whose linear part is the identity, is moved to the front.
    fn cyclic_subgroup(&self, generator: &Operation) -> Result<Vec<Operation>, ClosureInvariantError> {
        let mut powers = vec![generator.clone()];
        while let Some(last) = powers.last().filter(|op| !op.is_pure_translation()) {
            if powers.len() >= MAX_ROTATION_ORDER as usize {
                return Err(self.invariant_error(format!(
                    "generator {generator} has no crystallographic order"
                )));
            }
            let next = last * generator;
            powers.push(next);
        }
        powers.rotate_right(1);
        log::trace!(
            "Cyclic subgroup of {generator} has order {}.",
            powers.len()
        );
        Ok(powers)
    }

    /// Forms $`\{hg : h \in H, g \in G\}`$, which must contain $`|H||G|`$ distinct operations
    /// modulo lattice translations.
    fn multiply(
        &self,
        cyclic: &[Operation],
        group: &[Operation],
    ) -> Result<Vec<Operation>, ClosureInvariantError> {
        let product = cyclic
            .iter()
            .cartesian_product(group.iter())
            .map(|(h, g)| h * g)
            .collect::<Vec<_>>();
        let distinct = product
            .iter()
            .map(Operation::reduced)
            .collect::<IndexSet<_>>()
            .len();
        if distinct != cyclic.len() * group.len() {
            return Err(self.invariant_error(format!(
                "the product of a cyclic subgroup of order {} with a group of order {} has only {distinct} distinct operations",
                cyclic.len(),
                group.len()
            )));
        }
        Ok(product)
    }

    /// Ensures that the first operation is the identity, removing a common translation offset
    /// if necessary, and that no other operation equals the identity.
    fn canonicalise_identity(
        &self,
        operations: Vec<Operation>,
    ) -> Result<Vec<Operation>, ClosureInvariantError> {
        let offset = operations
            .first()
            .map(|op| *op.translation())
            .ok_or_else(|| self.invariant_error("no operations were generated".to_string()))?;
        let operations = if offset.iter().all(Zero::is_zero) {
            operations
        } else {
            log::debug!(
                "Removing translation offset ({}) from every operation of `{}`.",
                offset.iter().join(", "),
                self.symbol
            );
            operations
                .iter()
                .map(|op| op.translated(&(-offset)).reduced())
                .collect()
        };

        if !operations[0].is_identity() {
            return Err(self.invariant_error(format!(
                "the first operation {} is not the identity",
                operations[0]
            )));
        }
        let identity_count = operations.iter().filter(|op| op.is_identity()).count();
        if identity_count != 1 {
            return Err(self.invariant_error(format!(
                "the identity occurs {identity_count} times"
            )));
        }
        Ok(operations)
    }
}
