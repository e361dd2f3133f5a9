use nalgebra::{Matrix3, Vector3};
use num::rational::Rational64;
use num_traits::{Inv, Pow};

use crate::operation::{reduce_modulo_one, twelfths, Operation};

fn fourfold_z() -> Matrix3<i32> {
    Matrix3::new(0, -1, 0, 1, 0, 0, 0, 0, 1)
}

fn threefold_z() -> Matrix3<i32> {
    Matrix3::new(0, -1, 0, 1, -1, 0, 0, 0, 1)
}

#[test]
fn test_operation_composition() {
    let c4_screw = Operation::new(fourfold_z(), twelfths([0, 0, 3]), false);
    let c2_screw = &c4_screw * &c4_screw;
    assert_eq!(c2_screw.linear(), &Matrix3::new(-1, 0, 0, 0, -1, 0, 0, 0, 1));
    assert_eq!(c2_screw.translation(), &twelfths([0, 0, 6]));

    assert_eq!((&c4_screw).pow(2), c2_screw);
    assert_eq!((&c4_screw).pow(0), Operation::identity());

    let full_turn = (&c4_screw).pow(4);
    assert!(full_turn.is_pure_translation());
    assert!(!full_turn.is_identity());
    assert_eq!(full_turn.translation(), &twelfths([0, 0, 12]));
    assert!(full_turn.reduced().is_identity());
    assert!(full_turn.is_equivalent(&Operation::identity()));

    // The right-hand operand acts first.
    let shift = Operation::from_translation(twelfths([6, 0, 0]));
    let rotation = Operation::from_linear(fourfold_z());
    assert_eq!((&rotation * &shift).translation(), &twelfths([0, 6, 0]));
    assert_eq!((&shift * &rotation).translation(), &twelfths([6, 0, 0]));
    assert_eq!(rotation.clone() * shift.clone(), &rotation * &shift);
    assert_eq!(rotation.clone() * &shift, &rotation * shift);
}

#[test]
fn test_operation_time_reversal_composition() {
    let theta = Operation::identity().with_time_reversal(true);
    let c2 = Operation::from_linear(Matrix3::new(-1, 0, 0, 0, -1, 0, 0, 0, 1));
    let c2_theta = &c2 * &theta;
    assert!(c2_theta.time_reversal());
    assert!(!(&c2_theta * &theta).time_reversal());
    assert_eq!(&c2_theta * &c2_theta, Operation::identity());
    assert!(!theta.is_identity());
}

#[test]
fn test_operation_inverse() {
    let c4_screw = Operation::new(fourfold_z(), twelfths([0, 0, 3]), true);
    let c4_screw_inv = (&c4_screw).inv().expect("Unimodular operations are invertible.");
    assert_eq!(
        c4_screw_inv.linear(),
        &Matrix3::new(0, 1, 0, -1, 0, 0, 0, 0, 1)
    );
    assert_eq!(c4_screw_inv.translation(), &twelfths([0, 0, -3]));
    assert!(c4_screw_inv.time_reversal());
    assert_eq!(&c4_screw * &c4_screw_inv, Operation::identity());
    assert_eq!(&c4_screw_inv * &c4_screw, Operation::identity());
    assert_eq!(c4_screw.clone().inv(), Some(c4_screw_inv));

    let stretch = Operation::from_linear(Matrix3::new(2, 0, 0, 0, 1, 0, 0, 0, 1));
    assert!(stretch.inverse().is_none());
}

#[test]
fn test_operation_rotation_order() {
    assert_eq!(Operation::identity().rotation_order(), Some(1));
    assert_eq!(
        Operation::from_linear(-Matrix3::<i32>::identity()).rotation_order(),
        Some(2)
    );
    assert_eq!(Operation::from_linear(threefold_z()).rotation_order(), Some(3));
    assert_eq!(Operation::from_linear(fourfold_z()).rotation_order(), Some(4));
    assert_eq!(
        Operation::from_linear(Matrix3::new(1, -1, 0, 1, 0, 0, 0, 0, 1)).rotation_order(),
        Some(6)
    );
    assert_eq!(
        Operation::from_linear(-threefold_z()).rotation_order(),
        Some(6)
    );
    assert_eq!(
        Operation::from_linear(Matrix3::new(1, 1, 0, 0, 1, 0, 0, 0, 1)).rotation_order(),
        None
    );
}

#[test]
fn test_operation_origin_shift() {
    let inversion = Operation::from_linear(-Matrix3::<i32>::identity());
    assert_eq!(inversion.determinant(), -1);
    let shifted = inversion.with_origin_shift(&twelfths([3, 3, 3]));
    assert_eq!(shifted.translation(), &twelfths([6, 6, 6]));

    let translation = Operation::from_translation(twelfths([1, 2, 3]));
    assert_eq!(translation.with_origin_shift(&twelfths([5, 7, 11])), translation);
}

#[test]
fn test_operation_reduction() {
    let v = Vector3::new(
        Rational64::new(-1, 4),
        Rational64::new(5, 4),
        Rational64::new(1, 1),
    );
    assert_eq!(reduce_modulo_one(&v), twelfths([9, 3, 0]));

    let op = Operation::new(fourfold_z(), v, false);
    let reduced = op.reduced();
    assert_eq!(reduced.linear(), op.linear());
    assert_eq!(reduced.translation(), &twelfths([9, 3, 0]));
    assert!(op.is_equivalent(&reduced));
    assert_ne!(op, reduced);
}

#[test]
fn test_operation_display() {
    assert_eq!(Operation::identity().to_string(), "x,y,z");
    let c3_screw = Operation::new(threefold_z(), twelfths([0, 0, 4]), false);
    assert_eq!(c3_screw.to_string(), "-y,x-y,z+1/3");
    assert_eq!(
        c3_screw.with_time_reversal(true).to_string(),
        "-y,x-y,z+1/3,-1"
    );
    let glide = Operation::new(
        Matrix3::new(1, 0, 0, 0, -1, 0, 0, 0, 1),
        twelfths([-3, 0, 6]),
        false,
    );
    assert_eq!(glide.to_string(), "x-1/4,-y,z+1/2");
}
