use std::collections::HashSet;

use nalgebra::{Matrix3, Vector3};
use num::rational::Rational64;
use num_traits::Signed;

use crate::hall::HallSymbol;
use crate::operation::{twelfths, Operation};
use crate::transformation::setting::{standard_hall_number, CrystalSystem};
use crate::transformation::{Transformation, TransformationError};

fn r(numer: i64, denom: i64) -> Rational64 {
    Rational64::new(numer, denom)
}

/// Conventional C-centred cell to the primitive cell with a' = (a-b)/2, b' = (a+b)/2, c' = c.
fn c_to_primitive() -> Transformation {
    Transformation::new(
        Matrix3::new(
            r(1, 2), r(1, 2), r(0, 1),
            r(-1, 2), r(1, 2), r(0, 1),
            r(0, 1), r(0, 1), r(1, 1),
        ),
        Vector3::zeros(),
    )
    .unwrap()
}

#[test]
fn test_transformation_coset_to_primitive_and_back() {
    let hall = HallSymbol::new("C 2y").unwrap();
    let t = c_to_primitive();
    assert_eq!(t.determinant(), r(1, 2));

    let primitive = t.transform_coset(hall.operations()).unwrap();
    assert_eq!(primitive.len(), 2);
    assert_eq!(primitive[0], Operation::identity());
    assert!(primitive.contains(&Operation::from_linear(Matrix3::new(
        0, -1, 0, -1, 0, 0, 0, 0, -1
    ))));

    let back = t.inverse().unwrap().transform_coset(&primitive).unwrap();
    assert_eq!(back.len(), 2);
    let recentred = hall
        .lattice()
        .centering_translations()
        .iter()
        .flat_map(|c| back.iter().map(move |op| op.translated(c).reduced()))
        .collect::<HashSet<_>>();
    let original = hall.operations().iter().cloned().collect::<HashSet<_>>();
    assert_eq!(recentred, original);
}

#[test]
fn test_transformation_operation() {
    let inversion = Operation::from_linear(-Matrix3::<i32>::identity()).with_time_reversal(true);
    let shift = Transformation::new(Matrix3::identity(), twelfths([3, 3, 3])).unwrap();
    let shifted = shift.transform_operation(&inversion).unwrap();
    assert_eq!(shifted.linear(), inversion.linear());
    assert_eq!(shifted.translation(), &twelfths([-6, -6, -6]));
    assert!(shifted.time_reversal());

    let stretch = Transformation::from_integer_linear(&Matrix3::new(2, 0, 0, 0, 1, 0, 0, 0, 1))
        .unwrap();
    let c4 = Operation::from_linear(Matrix3::new(0, -1, 0, 1, 0, 0, 0, 0, 1));
    assert!(matches!(
        stretch.transform_operation(&c4),
        Err(TransformationError::NonIntegralLinearPart(_))
    ));
}

#[test]
fn test_transformation_algebra() {
    let t = Transformation::new(*c_to_primitive().linear(), twelfths([3, 0, 0])).unwrap();
    let t_inv = t.inverse().unwrap();
    assert_eq!(t.compose(&t_inv), Transformation::identity());
    assert_eq!(t_inv.compose(&t), Transformation::identity());
    assert_eq!(t_inv.determinant(), r(2, 1));
    assert_eq!(Transformation::identity().determinant(), r(1, 1));

    let op = Operation::new(
        Matrix3::new(-1, 0, 0, 0, 1, 0, 0, 0, -1),
        twelfths([0, 6, 0]),
        false,
    );
    let composed = t.compose(&Transformation::identity());
    assert_eq!(
        composed.transform_operation(&op).unwrap(),
        t.transform_operation(&op).unwrap()
    );

    assert_eq!(
        Transformation::new(Matrix3::zeros(), Vector3::zeros()),
        Err(TransformationError::SingularLinearPart)
    );
}

#[test]
fn test_transformation_index_mismatch() {
    let hall = HallSymbol::new("P 2").unwrap();
    let halving = Transformation::new(
        Matrix3::new(r(1, 2), r(0, 1), r(0, 1), r(0, 1), r(1, 1), r(0, 1), r(0, 1), r(0, 1), r(1, 1)),
        Vector3::zeros(),
    )
    .unwrap();
    assert_eq!(
        halving.transform_coset(hall.operations()),
        Err(TransformationError::IndexMismatch {
            index: 2,
            original_order: 2,
            transformed_order: 2,
        })
    );

    let two_thirds = Transformation::new(
        Matrix3::new(r(2, 3), r(0, 1), r(0, 1), r(0, 1), r(1, 1), r(0, 1), r(0, 1), r(0, 1), r(1, 1)),
        Vector3::zeros(),
    )
    .unwrap();
    assert!(matches!(
        two_thirds.transform_coset(hall.operations()),
        Err(TransformationError::IndexMismatch { .. })
    ));
}

#[test]
fn test_crystal_systems() {
    assert_eq!(CrystalSystem::from_hall_number(1).unwrap(), CrystalSystem::Triclinic);
    assert_eq!(CrystalSystem::from_hall_number(107).unwrap(), CrystalSystem::Monoclinic);
    assert_eq!(CrystalSystem::from_hall_number(108).unwrap(), CrystalSystem::Orthorhombic);
    assert_eq!(CrystalSystem::from_hall_number(430).unwrap(), CrystalSystem::Trigonal);
    assert_eq!(CrystalSystem::from_hall_number(488).unwrap(), CrystalSystem::Hexagonal);
    assert_eq!(CrystalSystem::from_hall_number(530).unwrap(), CrystalSystem::Cubic);
    assert!(CrystalSystem::from_hall_number(0).is_err());
    assert!(CrystalSystem::from_hall_number(531).is_err());
    assert_eq!(CrystalSystem::Tetragonal.to_string(), "tetragonal");
}

#[test]
fn test_standard_hall_numbers() {
    assert_eq!(standard_hall_number(1).unwrap(), 1);
    assert_eq!(standard_hall_number(15).unwrap(), 90);
    assert_eq!(standard_hall_number(48).unwrap(), 229);
    assert_eq!(standard_hall_number(230).unwrap(), 530);
    assert!(standard_hall_number(0).is_err());
    assert!(standard_hall_number(231).is_err());
}

#[test]
fn test_transformation_to_standard() {
    // P 1 1 2 with unique axis a, tabulated as `P 2x`.
    let t = Transformation::to_standard(5, "a", 3).unwrap();
    let hall = HallSymbol::new("P 2x").unwrap();
    let standard = t.transform_coset(hall.operations()).unwrap();
    assert_eq!(
        standard[1],
        Operation::from_linear(Matrix3::new(-1, 0, 0, 0, 1, 0, 0, 0, -1))
    );

    let t = Transformation::to_standard(20, "a3", 5).unwrap();
    assert_eq!(t.determinant().abs(), r(1, 1));

    let t = Transformation::to_standard(112, "ba-c", 18).unwrap();
    assert_eq!(
        t.linear(),
        &Matrix3::new(r(0, 1), r(1, 1), r(0, 1), r(1, 1), r(0, 1), r(0, 1), r(0, 1), r(0, 1), r(-1, 1))
    );

    let t = Transformation::to_standard(434, "R", 146).unwrap();
    assert_eq!(t.determinant(), r(3, 1));

    let t = Transformation::to_standard(433, "H", 146).unwrap();
    assert_eq!(t, Transformation::identity());

    let t = Transformation::to_standard(228, "1", 48).unwrap();
    assert_eq!(t.origin_shift(), &twelfths([3, 3, 3]));

    let t = Transformation::to_standard(229, "2", 48).unwrap();
    assert_eq!(t, Transformation::identity());

    assert!(matches!(
        Transformation::to_standard(228, "1", 47),
        Err(TransformationError::UnknownSetting(_))
    ));
    assert!(matches!(
        Transformation::to_standard(112, "xyz", 18),
        Err(TransformationError::UnknownSetting(_))
    ));
    assert!(Transformation::to_standard(0, "", 1).is_err());
}
