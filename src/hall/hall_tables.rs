//! Fixed lookup tables for Hall-symbol rotations, translations, and lattice centerings.

use std::error::Error;
use std::fmt;
use std::str::FromStr;

use nalgebra::{Matrix3, Vector3};
use num::rational::Rational64;
use phf::phf_map;
use serde::{Deserialize, Serialize};

use crate::operation::twelfths;

// ======
// Tables
// ======

/// Rotation matrices keyed by order and axis code. The axis codes `px`/`ppx` (and their `y`/`z`
/// counterparts) denote the face diagonals $`\mathbf{b}-\mathbf{c}`$ and
/// $`\mathbf{b}+\mathbf{c}`$ perpendicular to the corresponding principal axis, and `*` denotes
/// the body diagonal $`\mathbf{a}+\mathbf{b}+\mathbf{c}`$.
static ROTATION_MATRICES: phf::Map<&'static str, [[i32; 3]; 3]> = phf_map! {
    "1x" => [[1, 0, 0], [0, 1, 0], [0, 0, 1]],
    "1y" => [[1, 0, 0], [0, 1, 0], [0, 0, 1]],
    "1z" => [[1, 0, 0], [0, 1, 0], [0, 0, 1]],
    "2x" => [[1, 0, 0], [0, -1, 0], [0, 0, -1]],
    "2y" => [[-1, 0, 0], [0, 1, 0], [0, 0, -1]],
    "2z" => [[-1, 0, 0], [0, -1, 0], [0, 0, 1]],
    "3x" => [[1, 0, 0], [0, 0, -1], [0, 1, -1]],
    "3y" => [[-1, 0, 1], [0, 1, 0], [-1, 0, 0]],
    "3z" => [[0, -1, 0], [1, -1, 0], [0, 0, 1]],
    "4x" => [[1, 0, 0], [0, 0, -1], [0, 1, 0]],
    "4y" => [[0, 0, 1], [0, 1, 0], [-1, 0, 0]],
    "4z" => [[0, -1, 0], [1, 0, 0], [0, 0, 1]],
    "6x" => [[1, 0, 0], [0, 1, -1], [0, 1, 0]],
    "6y" => [[0, 0, 1], [0, 1, 0], [-1, 0, 1]],
    "6z" => [[1, -1, 0], [1, 0, 0], [0, 0, 1]],
    // b-c
    "2px" => [[-1, 0, 0], [0, 0, -1], [0, -1, 0]],
    // b+c
    "2ppx" => [[-1, 0, 0], [0, 0, 1], [0, 1, 0]],
    // a-c
    "2py" => [[0, 0, -1], [0, -1, 0], [-1, 0, 0]],
    // a+c
    "2ppy" => [[0, 0, 1], [0, -1, 0], [1, 0, 0]],
    // a-b
    "2pz" => [[0, -1, 0], [-1, 0, 0], [0, 0, -1]],
    // a+b
    "2ppz" => [[0, 1, 0], [1, 0, 0], [0, 0, -1]],
    // a+b+c
    "3*" => [[0, 0, 1], [1, 0, 0], [0, 1, 0]],
};

/// Glide and half-translation vectors keyed by their subscript letter, as numerators over 12.
static GLIDE_TRANSLATIONS: phf::Map<char, [i64; 3]> = phf_map! {
    'a' => [6, 0, 0],
    'b' => [0, 6, 0],
    'c' => [0, 0, 6],
    'n' => [6, 6, 6],
    'u' => [3, 0, 0],
    'v' => [0, 3, 0],
    'w' => [0, 0, 3],
    'd' => [3, 3, 3],
};

// ================
// Enum definitions
// ================

/// Enumerated type for rotation-axis directions that can appear in a Hall symbol.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    /// The $`\mathbf{a}`$ axis.
    X,

    /// The $`\mathbf{b}`$ axis.
    Y,

    /// The $`\mathbf{c}`$ axis.
    Z,

    /// The face diagonal with a minus sign perpendicular to $`\mathbf{a}`$, *i.e.*
    /// $`\mathbf{b}-\mathbf{c}`$.
    PrimeX,

    /// $`\mathbf{a}-\mathbf{c}`$.
    PrimeY,

    /// $`\mathbf{a}-\mathbf{b}`$.
    PrimeZ,

    /// The face diagonal with a plus sign perpendicular to $`\mathbf{a}`$, *i.e.*
    /// $`\mathbf{b}+\mathbf{c}`$.
    DoublePrimeX,

    /// $`\mathbf{a}+\mathbf{c}`$.
    DoublePrimeY,

    /// $`\mathbf{a}+\mathbf{b}`$.
    DoublePrimeZ,

    /// The body diagonal $`\mathbf{a}+\mathbf{b}+\mathbf{c}`$.
    BodyDiagonal,
}

impl Axis {
    /// The axis code used as part of a rotation-table key.
    pub fn code(&self) -> &'static str {
        match self {
            Self::X => "x",
            Self::Y => "y",
            Self::Z => "z",
            Self::PrimeX => "px",
            Self::PrimeY => "py",
            Self::PrimeZ => "pz",
            Self::DoublePrimeX => "ppx",
            Self::DoublePrimeY => "ppy",
            Self::DoublePrimeZ => "ppz",
            Self::BodyDiagonal => "*",
        }
    }

    /// The index of the fractional coordinate along this axis, for principal axes only.
    pub fn principal_index(&self) -> Option<usize> {
        match self {
            Self::X => Some(0),
            Self::Y => Some(1),
            Self::Z => Some(2),
            _ => None,
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Enumerated type for the lattice symbols of Hall symbols.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LatticeSymbol {
    /// Primitive.
    P,

    /// A-face centred.
    A,

    /// B-face centred.
    B,

    /// C-face centred.
    C,

    /// Body centred.
    I,

    /// Rhombohedrally centred, obverse setting on hexagonal axes.
    R,

    /// Hexagonally centred.
    H,

    /// All-face centred.
    F,
}

impl LatticeSymbol {
    /// The centering translations of this lattice as numerators over 12, starting with the zero
    /// translation.
    fn centering_twelfths(&self) -> &'static [[i64; 3]] {
        match self {
            Self::P => &[[0, 0, 0]],
            Self::A => &[[0, 0, 0], [0, 6, 6]],
            Self::B => &[[0, 0, 0], [6, 0, 6]],
            Self::C => &[[0, 0, 0], [6, 6, 0]],
            Self::I => &[[0, 0, 0], [6, 6, 6]],
            Self::R => &[[0, 0, 0], [8, 4, 4], [4, 8, 8]],
            Self::H => &[[0, 0, 0], [8, 4, 0], [4, 8, 0]],
            Self::F => &[[0, 0, 0], [0, 6, 6], [6, 0, 6], [6, 6, 0]],
        }
    }

    /// The centering translations of this lattice, the first of which is always zero.
    pub fn centering_translations(&self) -> Vec<Vector3<Rational64>> {
        self.centering_twelfths()
            .iter()
            .map(|&numerators| twelfths(numerators))
            .collect()
    }

    /// The number of lattice points in the conventional cell.
    pub fn multiplicity(&self) -> usize {
        self.centering_twelfths().len()
    }
}

impl TryFrom<char> for LatticeSymbol {
    type Error = TableLookupError;

    fn try_from(c: char) -> Result<Self, Self::Error> {
        match c {
            'P' => Ok(Self::P),
            'A' => Ok(Self::A),
            'B' => Ok(Self::B),
            'C' => Ok(Self::C),
            'I' => Ok(Self::I),
            'R' => Ok(Self::R),
            'H' => Ok(Self::H),
            'F' => Ok(Self::F),
            _ => Err(TableLookupError::new(c.to_string())),
        }
    }
}

impl FromStr for LatticeSymbol {
    type Err = TableLookupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Self::try_from(c),
            _ => Err(TableLookupError::new(s.to_string())),
        }
    }
}

impl fmt::Display for LatticeSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letter = match self {
            Self::P => "P",
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::I => "I",
            Self::R => "R",
            Self::H => "H",
            Self::F => "F",
        };
        write!(f, "{letter}")
    }
}

// =================
// Error definitions
// =================

/// Error for a rotation, translation, or lattice code that is absent from the fixed tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableLookupError {
    /// The key that could not be found.
    pub key: String,
}

impl TableLookupError {
    pub(crate) fn new(key: String) -> Self {
        Self { key }
    }
}

impl fmt::Display for TableLookupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Table lookup error: no table entry for `{}`.", self.key)
    }
}

impl Error for TableLookupError {}

// =========
// Functions
// =========

/// Looks up the rotation matrix of the given order about the given axis.
pub fn rotation_matrix(order: u8, axis: Axis) -> Result<Matrix3<i32>, TableLookupError> {
    let key = format!("{order}{}", axis.code());
    ROTATION_MATRICES
        .get(key.as_str())
        .map(|rows| Matrix3::from_fn(|i, j| rows[i][j]))
        .ok_or(TableLookupError::new(key))
}

/// Looks up the translation vector of a glide subscript letter.
pub fn glide_translation(letter: char) -> Result<Vector3<Rational64>, TableLookupError> {
    GLIDE_TRANSLATIONS
        .get(&letter)
        .map(|&numerators| twelfths(numerators))
        .ok_or_else(|| TableLookupError::new(letter.to_string()))
}
