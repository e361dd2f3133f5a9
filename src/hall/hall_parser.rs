//! Tokenisation and decomposition of Hall symbols.
//!
//! The grammar, with the magnetic extension, is
//!
//! ```text
//! <Hall symbol>    := <L> <N>+ <V>?
//! <L>              := "-"? <lattice symbol>
//! <lattice symbol> := [PABCIRHF]
//! <N>              := "-"? <nfold> <A>? <T>* "'"?
//! <nfold>          := "1" | "2" | "3" | "4" | "6"
//! <A>              := <marker>? ([xyz] | "*")?
//! <marker>         := "'" | '"' | "="          (standard notation)
//!                   | "^" | '"' | "="          (magnetic notation)
//! <T>              := [abcnuvwd] | [1-5]
//! <V>              := "(" <int> <int> <int> ")"
//! ```
//!
//! The trailing `'` of `<N>` marks time reversal and is only recognised in magnetic notation.
//! The axis of a rotation without an explicit axis letter depends on its position in the list
//! and on the preceding rotation, so the parser threads an explicit [`ParserState`] through the
//! generator tokens.

use std::error::Error;
use std::fmt;

use nalgebra::Vector3;
use num::rational::Rational64;
use serde::{Deserialize, Serialize};

use crate::hall::hall_tables::{Axis, LatticeSymbol};
use crate::operation::DENOMINATOR;

#[cfg(test)]
#[path = "hall_parser_tests.rs"]
mod hall_parser_tests;

// ================
// Enum definitions
// ================

/// Enumerated type for the two flavours of Hall notation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HallNotation {
    /// Standard Hall symbols, where `'` is an axis marker.
    Standard,

    /// Magnetic Hall symbols, where `^` replaces `'` as the axis marker and a trailing `'`
    /// denotes time reversal.
    Magnetic,
}

impl HallNotation {
    /// The character marking a face-diagonal axis with a minus sign.
    fn prime_marker(&self) -> char {
        match self {
            Self::Standard => '\'',
            Self::Magnetic => '^',
        }
    }
}

/// Axis markers that may precede (or replace) an axis letter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum AxisMarker {
    None,
    Prime,
    DoublePrime,
}

impl AxisMarker {
    /// The axis obtained by attaching this marker to a principal axis.
    fn attach(&self, principal: Axis) -> Axis {
        match (self, principal) {
            (Self::None, axis) => axis,
            (Self::Prime, Axis::X) => Axis::PrimeX,
            (Self::Prime, Axis::Y) => Axis::PrimeY,
            (Self::Prime, _) => Axis::PrimeZ,
            (Self::DoublePrime, Axis::X) => Axis::DoublePrimeX,
            (Self::DoublePrime, Axis::Y) => Axis::DoublePrimeY,
            (Self::DoublePrime, _) => Axis::DoublePrimeZ,
        }
    }
}

// ======================================
// Struct definitions and implementations
// ======================================

/// A structure describing one generator token of a Hall symbol, with its axis already inferred.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratorDescriptor {
    /// The token from which this descriptor was parsed.
    pub token: String,

    /// Boolean indicating if the rotation is improper.
    pub improper: bool,

    /// The order of the rotation.
    pub order: u8,

    /// The rotation axis.
    pub axis: Axis,

    /// Screw subscripts, each contributing `digit / order` along [`Self::axis`].
    pub screws: Vec<u8>,

    /// Glide subscript letters, each contributing a fixed vector.
    pub glides: Vec<char>,

    /// Boolean indicating if the generator carries time reversal.
    pub time_reversal: bool,
}

/// The decomposition of a Hall symbol.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedHallSymbol {
    /// Boolean indicating if the lattice symbol was prefixed by `-`, *i.e.* if inversion at the
    /// origin is an implicit generator.
    pub inversion_at_origin: bool,

    /// The lattice symbol.
    pub lattice: LatticeSymbol,

    /// The generators in the order of appearance.
    pub generators: Vec<GeneratorDescriptor>,

    /// The origin shift, if any.
    pub origin_shift: Option<Vector3<Rational64>>,
}

/// Parse history on which default axes depend.
#[derive(Clone, Debug, Default)]
struct ParserState {
    /// The zero-based position of the next generator.
    generator_index: usize,

    /// The order of the previous generator.
    previous_order: Option<u8>,

    /// The axis of the previous generator.
    previous_axis: Option<Axis>,
}

/// A parser for a single Hall symbol. Every parser owns a fresh [`ParserState`].
pub struct HallSymbolParser<'a> {
    symbol: &'a str,
    notation: HallNotation,
    state: ParserState,
}

impl<'a> HallSymbolParser<'a> {
    /// Creates a parser for `symbol` written in the given notation.
    #[must_use]
    pub fn new(symbol: &'a str, notation: HallNotation) -> Self {
        Self {
            symbol,
            notation,
            state: ParserState::default(),
        }
    }

    /// Decomposes the Hall symbol into its lattice symbol, generators, and origin shift.
    ///
    /// # Errors
    ///
    /// Errors if any character of the symbol cannot be assigned a role in the grammar.
    pub fn parse(mut self) -> Result<ParsedHallSymbol, HallSymbolParseError> {
        let tokens = self.symbol.split_whitespace().collect::<Vec<_>>();
        let (inversion_at_origin, lattice) = match tokens.first() {
            Some(token) => self.parse_lattice(token)?,
            None => return Err(self.error("", 0, "empty Hall symbol")),
        };

        let mut generators = Vec::with_capacity(tokens.len() - 1);
        let mut origin_shift = None;
        for (i, token) in tokens.iter().enumerate().skip(1) {
            if token.starts_with('(') {
                origin_shift = Some(self.parse_origin_shift(&tokens[i..])?);
                break;
            }
            generators.push(self.parse_generator(token)?);
        }

        log::trace!(
            "Hall symbol `{}` decomposed into {} generator(s){}.",
            self.symbol,
            generators.len(),
            if origin_shift.is_some() {
                " with an origin shift"
            } else {
                ""
            }
        );

        Ok(ParsedHallSymbol {
            inversion_at_origin,
            lattice,
            generators,
            origin_shift,
        })
    }

    fn parse_lattice(&self, token: &str) -> Result<(bool, LatticeSymbol), HallSymbolParseError> {
        let (inversion, letters) = match token.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, token),
        };
        let offset = usize::from(inversion);
        letters
            .parse::<LatticeSymbol>()
            .map(|lattice| (inversion, lattice))
            .map_err(|_| self.error(token, offset, "unknown lattice symbol"))
    }

    fn parse_generator(&mut self, token: &str) -> Result<GeneratorDescriptor, HallSymbolParseError> {
        let chars = token.chars().collect::<Vec<_>>();
        let mut pos = 0;

        let improper = chars.first() == Some(&'-');
        if improper {
            pos += 1;
        }

        let order = match chars.get(pos) {
            Some(&c) if matches!(c, '1' | '2' | '3' | '4' | '6') => {
                pos += 1;
                c as u8 - b'0'
            }
            _ => {
                return Err(self.error(
                    token,
                    pos,
                    "expected a rotation order of 1, 2, 3, 4, or 6",
                ))
            }
        };

        let marker = match chars.get(pos) {
            Some(&c) if c == self.notation.prime_marker() => AxisMarker::Prime,
            Some('"') | Some('=') => AxisMarker::DoublePrime,
            _ => AxisMarker::None,
        };
        if marker != AxisMarker::None {
            pos += 1;
        }

        let explicit_axis = match chars.get(pos) {
            Some('x') => Some(Axis::X),
            Some('y') => Some(Axis::Y),
            Some('z') => Some(Axis::Z),
            Some('*') => Some(Axis::BodyDiagonal),
            _ => None,
        };
        if explicit_axis.is_some() {
            pos += 1;
        }

        let axis = self
            .infer_axis(order, marker, explicit_axis)
            .ok_or_else(|| self.error(token, pos, "no default axis for this rotation here"))?;

        let mut screws = vec![];
        let mut glides = vec![];
        while let Some(&c) = chars.get(pos) {
            match c {
                '1'..='5' => screws.push(c as u8 - b'0'),
                'a' | 'b' | 'c' | 'n' | 'u' | 'v' | 'w' | 'd' => glides.push(c),
                _ => break,
            }
            pos += 1;
        }

        let time_reversal =
            self.notation == HallNotation::Magnetic && chars.get(pos) == Some(&'\'');
        if time_reversal {
            pos += 1;
        }

        if pos != chars.len() {
            return Err(self.error(token, pos, "unexpected character"));
        }

        self.state.generator_index += 1;
        self.state.previous_order = Some(order);
        self.state.previous_axis = Some(axis);

        Ok(GeneratorDescriptor {
            token: token.to_string(),
            improper,
            order,
            axis,
            screws,
            glides,
            time_reversal,
        })
    }

    /// Resolves the axis of a rotation from its explicit parts and the parse history.
    fn infer_axis(&self, order: u8, marker: AxisMarker, explicit: Option<Axis>) -> Option<Axis> {
        if order == 1 {
            return Some(Axis::Z);
        }
        if explicit.is_some() {
            return explicit;
        }
        if marker != AxisMarker::None {
            if let Some(previous) = self
                .state
                .previous_axis
                .filter(|axis| axis.principal_index().is_some())
            {
                return Some(marker.attach(previous));
            }
        }
        match self.state.generator_index {
            0 => Some(marker.attach(Axis::Z)),
            1 => match self.state.previous_order {
                Some(2) | Some(4) => Some(marker.attach(Axis::X)),
                Some(3) | Some(6) => Some(Axis::PrimeZ),
                _ => None,
            },
            2 => match (order, marker) {
                (3, AxisMarker::None) => Some(Axis::BodyDiagonal),
                (2, AxisMarker::None) => Some(Axis::PrimeZ),
                _ => None,
            },
            _ => None,
        }
    }

    fn parse_origin_shift(&self, tokens: &[&str]) -> Result<Vector3<Rational64>, HallSymbolParseError> {
        let joined = tokens.join(" ");
        if tokens.len() != 3 {
            return Err(self.error(&joined, 0, "an origin shift needs exactly three components"));
        }
        let first = tokens[0]
            .strip_prefix('(')
            .ok_or_else(|| self.error(tokens[0], 0, "expected `(`"))?;
        let last = tokens[2]
            .strip_suffix(')')
            .ok_or_else(|| self.error(tokens[2], tokens[2].len(), "expected `)`"))?;
        let numerators = [first, tokens[1], last]
            .iter()
            .map(|component| {
                component.parse::<i64>().map_err(|_| {
                    self.error(component, 0, "origin-shift components must be integers")
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Vector3::from_iterator(
            numerators
                .into_iter()
                .map(|n| Rational64::new(n, DENOMINATOR)),
        ))
    }

    fn error(&self, token: &str, position: usize, reason: &str) -> HallSymbolParseError {
        HallSymbolParseError {
            symbol: self.symbol.to_string(),
            token: token.to_string(),
            position,
            reason: reason.to_string(),
        }
    }
}

// =================
// Error definitions
// =================

/// Error for a Hall symbol that does not conform to the grammar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HallSymbolParseError {
    /// The full Hall symbol being parsed.
    pub symbol: String,

    /// The offending token.
    pub token: String,

    /// The character position within [`Self::token`] at which parsing failed.
    pub position: usize,

    /// A description of the failure.
    pub reason: String,
}

impl fmt::Display for HallSymbolParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Hall symbol parsing error in `{}`: {} (token `{}`, position {}).",
            self.symbol, self.reason, self.token, self.position
        )
    }
}

impl Error for HallSymbolParseError {}
