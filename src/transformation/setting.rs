//! Transformations from tabulated Hall settings to the ITA standard settings.

use std::fmt;

use nalgebra::{Matrix3, Vector3};
use num::rational::Rational64;
use phf::phf_map;
use serde::{Deserialize, Serialize};

use crate::operation::to_rational_matrix;
use crate::transformation::{Transformation, TransformationError};

// ======
// Tables
// ======

/// Monoclinic changes of basis to unique axis $`b`$ and cell choice 1 (ITA Table 1.5.1.1),
/// stored row by row.
static MONOCLINIC_MATRICES: phf::Map<&'static str, [[i32; 3]; 3]> = phf_map! {
    // (a, b, c) -> (c, a, b)
    "a_to_b" => [[0, 1, 0], [0, 0, 1], [1, 0, 0]],
    // (a, b, c) -> (b, -a, c)
    "-a_to_b" => [[0, -1, 0], [1, 0, 0], [0, 0, 1]],
    // (a, b, c) -> (c, -b, a)
    "-b_to_b" => [[0, 0, 1], [0, -1, 0], [1, 0, 0]],
    // (a, b, c) -> (b, c, a)
    "c_to_b" => [[0, 0, 1], [1, 0, 0], [0, 1, 0]],
    // (a, b, c) -> (a, -c, b)
    "-c_to_b" => [[1, 0, 0], [0, 0, 1], [0, -1, 0]],
    // P -> P, A -> C
    "b2_to_b1" => [[0, 0, -1], [0, 1, 0], [1, 0, -1]],
    // P -> P, I -> C
    "b3_to_b1" => [[-1, 0, 1], [0, 1, 0], [-1, 0, 0]],
};

/// Orthorhombic changes of basis to the `abc` setting, stored row by row.
static ORTHORHOMBIC_MATRICES: phf::Map<&'static str, [[i32; 3]; 3]> = phf_map! {
    "abc" => [[1, 0, 0], [0, 1, 0], [0, 0, 1]],
    "ba-c" => [[0, 1, 0], [1, 0, 0], [0, 0, -1]],
    "cab" => [[0, 0, 1], [1, 0, 0], [0, 1, 0]],
    "-cba" => [[0, 0, -1], [0, 1, 0], [1, 0, 0]],
    "bca" => [[0, 1, 0], [0, 0, 1], [1, 0, 0]],
    "a-cb" => [[1, 0, 0], [0, 0, -1], [0, 1, 0]],
};

/// Primitive rhombohedral cell to the triple hexagonal cell, obverse setting.
const RHOMBOHEDRAL_TO_HEXAGONAL: [[i32; 3]; 3] = [[1, 0, 1], [-1, 1, 1], [0, -1, 1]];

/// Origin shifts from origin choice 1 to origin choice 2, keyed by ITA number, as numerators
/// over 8.
static ORIGIN_CHOICE_SHIFTS: phf::Map<u8, [i64; 3]> = phf_map! {
    48u8 => [2, 2, 2],
    50u8 => [2, 2, 0],
    59u8 => [2, 2, 0],
    68u8 => [0, 2, 2],
    70u8 => [1, 1, 1],
    85u8 => [-2, 2, 0],
    86u8 => [-2, -2, -2],
    88u8 => [0, 2, 1],
    125u8 => [-2, -2, 0],
    126u8 => [-2, -2, -2],
    129u8 => [-2, 2, 0],
    130u8 => [-2, 2, 0],
    133u8 => [-2, 2, -2],
    134u8 => [-2, 2, -2],
    137u8 => [-2, 2, -2],
    138u8 => [-2, 2, -2],
    141u8 => [4, 2, 1],
    142u8 => [4, 2, 1],
    201u8 => [2, 2, 2],
    203u8 => [1, 1, 1],
    222u8 => [2, 2, 2],
    224u8 => [2, 2, 2],
    227u8 => [1, 1, 1],
    228u8 => [3, 3, 3],
};

/// Hall numbers of the ITA standard settings, indexed by ITA number minus one.
#[rustfmt::skip]
static STANDARD_HALL_NUMBERS: [u16; 230] = [
    1, 2, 3, 6, 9, 18, 21, 30, 39, 57,
    60, 63, 72, 81, 90, 108, 109, 112, 115, 116,
    119, 122, 123, 124, 125, 128, 134, 137, 143, 149,
    155, 161, 164, 170, 173, 176, 182, 185, 191, 197,
    203, 209, 212, 215, 218, 221, 227, 229, 230, 234,
    239, 245, 251, 257, 263, 266, 269, 275, 279, 284,
    290, 292, 298, 304, 310, 313, 316, 323, 334, 336,
    337, 338, 341, 343, 349, 350, 351, 352, 353, 354,
    355, 356, 357, 358, 360, 362, 363, 365, 366, 367,
    368, 369, 370, 371, 372, 373, 374, 375, 376, 377,
    378, 379, 380, 381, 382, 383, 384, 385, 386, 387,
    388, 389, 390, 391, 392, 393, 394, 395, 396, 397,
    398, 399, 400, 401, 403, 405, 406, 407, 409, 411,
    412, 413, 415, 417, 418, 419, 421, 423, 424, 425,
    427, 429, 430, 431, 432, 433, 435, 436, 438, 439,
    440, 441, 442, 443, 444, 446, 447, 448, 449, 450,
    452, 454, 455, 456, 457, 458, 460, 462, 463, 464,
    465, 466, 467, 468, 469, 470, 471, 472, 473, 474,
    475, 476, 477, 478, 479, 480, 481, 482, 483, 484,
    485, 486, 487, 488, 489, 490, 491, 492, 493, 494,
    496, 497, 499, 500, 501, 502, 503, 504, 505, 506,
    507, 508, 509, 510, 511, 512, 513, 514, 515, 516,
    517, 519, 520, 522, 523, 524, 526, 528, 529, 530,
];

// ================
// Enum definitions
// ================

/// Enumerated type for the seven crystal systems.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CrystalSystem {
    Triclinic,
    Monoclinic,
    Orthorhombic,
    Tetragonal,
    Trigonal,
    Hexagonal,
    Cubic,
}

impl CrystalSystem {
    /// Determines the crystal system of a Hall number in $`[1, 530]`$.
    ///
    /// # Errors
    ///
    /// Errors if the Hall number is out of range.
    pub fn from_hall_number(hall_number: u16) -> Result<Self, TransformationError> {
        match hall_number {
            1..=2 => Ok(Self::Triclinic),
            3..=107 => Ok(Self::Monoclinic),
            108..=348 => Ok(Self::Orthorhombic),
            349..=429 => Ok(Self::Tetragonal),
            430..=461 => Ok(Self::Trigonal),
            462..=488 => Ok(Self::Hexagonal),
            489..=530 => Ok(Self::Cubic),
            _ => Err(TransformationError::UnknownSetting(format!(
                "Hall number {hall_number}"
            ))),
        }
    }
}

impl fmt::Display for CrystalSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Triclinic => "triclinic",
            Self::Monoclinic => "monoclinic",
            Self::Orthorhombic => "orthorhombic",
            Self::Tetragonal => "tetragonal",
            Self::Trigonal => "trigonal",
            Self::Hexagonal => "hexagonal",
            Self::Cubic => "cubic",
        };
        write!(f, "{name}")
    }
}

// =========
// Functions
// =========

/// Returns the Hall number of the ITA standard setting of the space group with the given ITA
/// number.
///
/// # Errors
///
/// Errors if the ITA number is not in $`[1, 230]`$.
pub fn standard_hall_number(ita_number: u8) -> Result<u16, TransformationError> {
    usize::from(ita_number)
        .checked_sub(1)
        .and_then(|i| STANDARD_HALL_NUMBERS.get(i))
        .copied()
        .ok_or_else(|| TransformationError::UnknownSetting(format!("ITA number {ita_number}")))
}

fn lookup(
    table: &phf::Map<&'static str, [[i32; 3]; 3]>,
    key: &str,
) -> Result<Matrix3<i32>, TransformationError> {
    table
        .get(key)
        .map(|rows| Matrix3::from_fn(|i, j| rows[i][j]))
        .ok_or_else(|| TransformationError::UnknownSetting(key.to_string()))
}

/// The monoclinic change of basis for a choice of the form `-?[abc][1-3]?`.
fn monoclinic_linear(choice: &str) -> Result<Matrix3<i32>, TransformationError> {
    let (setting, cell) = match choice.char_indices().last() {
        Some((i, c)) if c.is_ascii_digit() => (&choice[..i], &choice[i..]),
        _ => (choice, ""),
    };
    let axis = match setting {
        "" | "b" => Matrix3::identity(),
        _ => lookup(&MONOCLINIC_MATRICES, &format!("{setting}_to_b"))?,
    };
    let cell_change = match cell {
        "" | "1" => Matrix3::identity(),
        "2" => lookup(&MONOCLINIC_MATRICES, "b2_to_b1")?,
        "3" => lookup(&MONOCLINIC_MATRICES, "b3_to_b1")?,
        _ => return Err(TransformationError::UnknownSetting(choice.to_string())),
    };
    Ok(axis * cell_change)
}

impl Transformation {
    /// Constructs the transformation from a tabulated setting to the ITA standard setting.
    ///
    /// # Arguments
    ///
    /// * `hall_number` - The Hall number of the tabulated setting, in $`[1, 530]`$.
    /// * `choice` - The setting choice, *e.g.* `b1`, `-c3`, `ba-c`, `1`, `2cab`, `R`, or `H`. A
    /// leading `1` or `2` denotes the origin choice.
    /// * `ita_number` - The ITA number of the space group.
    ///
    /// # Errors
    ///
    /// Errors if the Hall number or the choice is not recognised, or if origin choice 1 is
    /// requested for a space group with a single origin choice.
    pub fn to_standard(
        hall_number: u16,
        choice: &str,
        ita_number: u8,
    ) -> Result<Self, TransformationError> {
        let (origin_choice, axes_choice) = match choice.chars().next() {
            Some(c @ ('1' | '2')) => (Some(c), &choice[1..]),
            _ => (None, choice),
        };

        let system = CrystalSystem::from_hall_number(hall_number)?;
        let linear = match system {
            CrystalSystem::Monoclinic => monoclinic_linear(axes_choice)?,
            CrystalSystem::Orthorhombic => {
                let key = if axes_choice.is_empty() { "abc" } else { axes_choice };
                lookup(&ORTHORHOMBIC_MATRICES, key)?
            }
            CrystalSystem::Trigonal if choice == "R" => {
                Matrix3::from_fn(|i, j| RHOMBOHEDRAL_TO_HEXAGONAL[i][j])
            }
            _ => Matrix3::identity(),
        };
        let linear = to_rational_matrix(&linear);

        let origin_shift = if origin_choice == Some('1') {
            let numerators = ORIGIN_CHOICE_SHIFTS.get(&ita_number).ok_or_else(|| {
                TransformationError::UnknownSetting(format!(
                    "origin choice 1 of ITA number {ita_number}"
                ))
            })?;
            let shift = Vector3::from_iterator(numerators.iter().map(|&n| Rational64::new(n, 8)));
            linear * shift
        } else {
            Vector3::zeros()
        };

        log::debug!(
            "Hall number {hall_number} ({system}, choice `{choice}`) to standard setting of ITA number {ita_number}."
        );
        Self::new(linear, origin_shift)
    }
}
