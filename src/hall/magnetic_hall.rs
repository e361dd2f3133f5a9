//! Magnetic Hall symbols and breadth-first coset enumeration.

use std::collections::VecDeque;
use std::error::Error;
use std::fmt;

use derive_builder::Builder;
use indexmap::IndexSet;
use nalgebra::{Matrix3, Vector3};
use serde::{Deserialize, Serialize};

use crate::hall::hall_parser::{HallNotation, HallSymbolParser, ParsedHallSymbol};
use crate::hall::hall_tables::LatticeSymbol;
use crate::hall::HallSymbolError;
use crate::operation::Operation;

#[cfg(test)]
#[path = "magnetic_hall_tests.rs"]
mod magnetic_hall_tests;

/// The default bound on the number of queue pops during coset enumeration.
const DEFAULT_MAX_STEPS: usize = 4096;

// ----------
// Parameters
// ----------

/// A structure containing control parameters for breadth-first coset enumeration.
#[derive(Clone, Builder, Debug, Serialize, Deserialize)]
pub struct CosetTraversalParams {
    /// The maximum number of operations to be taken off the work queue before the enumeration is
    /// deemed not to terminate. A magnetic space group has at most 384 coset representatives in
    /// its conventional cell.
    #[builder(default = "DEFAULT_MAX_STEPS")]
    pub max_steps: usize,
}

impl CosetTraversalParams {
    /// Returns a builder to construct a [`CosetTraversalParams`] structure.
    pub fn builder() -> CosetTraversalParamsBuilder {
        CosetTraversalParamsBuilder::default()
    }
}

impl Default for CosetTraversalParams {
    fn default() -> Self {
        Self {
            max_steps: DEFAULT_MAX_STEPS,
        }
    }
}

impl fmt::Display for CosetTraversalParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Coset traversal step bound: {}", self.max_steps)
    }
}

// =================
// Error definitions
// =================

/// Error for a breadth-first coset enumeration that exceeds its step bound.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CosetNonterminationError {
    /// The magnetic Hall symbol whose generators were being traversed, if known.
    pub hall_symbol: Option<String>,

    /// The step bound that was exceeded.
    pub max_steps: usize,
}

impl fmt::Display for CosetNonterminationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.hall_symbol.as_ref() {
            Some(symbol) => write!(
                f,
                "Coset enumeration for `{symbol}` did not terminate within {} steps.",
                self.max_steps
            ),
            None => write!(
                f,
                "Coset enumeration did not terminate within {} steps.",
                self.max_steps
            ),
        }
    }
}

impl Error for CosetNonterminationError {}

// ======================================
// Struct definitions and implementations
// ======================================

/// A structure holding a magnetic Hall symbol together with its coset representatives over the
/// translation subgroup.
#[derive(Clone, Debug)]
pub struct MagneticHallSymbol {
    /// The magnetic Hall symbol as given.
    symbol: String,

    /// The decomposition of the symbol.
    parsed: ParsedHallSymbol,

    /// The magnetic generators: non-zero centerings, then inversion at the origin if present,
    /// then the listed generators, all with the origin shift applied.
    generators: Vec<Operation>,

    /// The coset representatives, with the identity first.
    coset: Vec<Operation>,
}

impl MagneticHallSymbol {
    /// Parses a magnetic Hall symbol and enumerates its coset with default traversal parameters.
    ///
    /// # Errors
    ///
    /// Errors if the symbol cannot be parsed, if a table lookup fails, or if the enumeration
    /// does not terminate.
    pub fn new(symbol: &str) -> Result<Self, HallSymbolError> {
        Self::with_params(symbol, &CosetTraversalParams::default())
    }

    /// Parses a magnetic Hall symbol and enumerates its coset.
    ///
    /// # Errors
    ///
    /// Errors if the symbol cannot be parsed, if a table lookup fails, or if the enumeration
    /// does not terminate within `params.max_steps`.
    pub fn with_params(symbol: &str, params: &CosetTraversalParams) -> Result<Self, HallSymbolError> {
        let parsed = HallSymbolParser::new(symbol, HallNotation::Magnetic).parse()?;
        let generators = magnetic_generators(&parsed)?;
        let coset = traverse(&generators, params).map_err(|err| {
            let err = CosetNonterminationError {
                hall_symbol: Some(symbol.to_string()),
                ..err
            };
            log::error!("{err}");
            err
        })?;
        log::debug!(
            "Magnetic Hall symbol `{symbol}` has {} coset representative(s).",
            coset.len()
        );
        Ok(Self {
            symbol: symbol.to_string(),
            parsed,
            generators,
            coset,
        })
    }

    /// The magnetic Hall symbol.
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

    /// The magnetic generators used for the enumeration.
    pub fn generators(&self) -> &[Operation] {
        &self.generators
    }

    /// The coset representatives, with the identity first.
    pub fn coset(&self) -> &[Operation] {
        &self.coset
    }

    /// The representatives without time reversal, which form the unitary halving subgroup (or
    /// the whole coset if no representative carries time reversal).
    pub fn unitary_operations(&self) -> Vec<Operation> {
        self.coset
            .iter()
            .filter(|op| !op.time_reversal())
            .cloned()
            .collect()
    }

    /// Returns `true` if pure time reversal is itself a coset representative, *i.e.* if the group
    /// is a grey group.
    pub fn is_grey(&self) -> bool {
        self.coset
            .contains(&Operation::identity().with_time_reversal(true))
    }
}

/// Builds the magnetic generators of a parsed symbol.
fn magnetic_generators(parsed: &ParsedHallSymbol) -> Result<Vec<Operation>, HallSymbolError> {
    let shift = parsed.origin_shift.unwrap_or_else(Vector3::zeros);

    let mut generators = parsed
        .lattice
        .centering_translations()
        .into_iter()
        .skip(1)
        .map(Operation::from_translation)
        .collect::<Vec<_>>();

    if parsed.inversion_at_origin {
        generators.push(Operation::from_linear(-Matrix3::<i32>::identity()).with_origin_shift(&shift));
    }

    for descriptor in parsed.generators.iter() {
        generators.push(descriptor.resolve()?.with_origin_shift(&shift));
    }
    Ok(generators)
}

/// Enumerates every operation reachable from the identity by right-multiplication with the
/// given generators, with translations reduced modulo lattice translations.
///
/// # Arguments
///
/// * `generators` - The generating operations.
/// * `params` - Control parameters bounding the enumeration.
///
/// # Returns
///
/// The reachable operations in breadth-first discovery order, with the identity first.
///
/// # Errors
///
/// Errors if more than `params.max_steps` operations are taken off the work queue.
pub fn traverse(
    generators: &[Operation],
    params: &CosetTraversalParams,
) -> Result<Vec<Operation>, CosetNonterminationError> {
    let identity = Operation::identity();
    let mut found = IndexSet::from([identity.clone()]);
    let mut queue = VecDeque::from([identity]);
    let mut steps = 0;

    while let Some(g) = queue.pop_front() {
        steps += 1;
        if steps > params.max_steps {
            return Err(CosetNonterminationError {
                hall_symbol: None,
                max_steps: params.max_steps,
            });
        }
        for h in generators.iter() {
            let gh = (&g * h).reduced();
            if found.insert(gh.clone()) {
                queue.push_back(gh);
            }
        }
    }

    log::trace!(
        "Coset traversal over {} generator(s) finished after {steps} step(s).",
        generators.len()
    );
    Ok(found.into_iter().collect())
}
