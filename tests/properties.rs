//! Property-based tests for the multiplication dispatcher.

use proptest::prelude::*;

use modfft::{
    circular_mul_with, mul_with, negacyclic_mul_with, sqr_with, wrap_len, FftContext, FftOptions, Mod1000000007,
    Mod998244353, ModInt,
};
use modfft_tests::{fold_cyclic, fold_negacyclic, reference_mul};

type F = Mod998244353;

fn context() -> &'static FftContext {
    modfft::default_context()
}

fn poly<const M: u64>(max_len: usize) -> impl Strategy<Value = Vec<ModInt<M>>> {
    prop::collection::vec(0..M, 0..max_len).prop_map(|v| v.into_iter().map(ModInt::new).collect())
}

fn transform_only() -> FftOptions {
    FftOptions::transform_only()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    /// The transform agrees with schoolbook convolution.
    #[test]
    fn transform_matches_reference(a in poly::<998_244_353>(96), b in poly::<998_244_353>(96)) {
        let mut got = a.clone();
        mul_with(context(), &transform_only(), &mut got, &b);
        prop_assert_eq!(got, reference_mul(&a, &b));
    }

    /// Same for a modulus whose residues fill the full 30-bit range.
    #[test]
    fn transform_matches_reference_wide(a in poly::<1_000_000_007>(96), b in poly::<1_000_000_007>(96)) {
        let mut got = a.clone();
        mul_with(context(), &transform_only(), &mut got, &b);
        prop_assert_eq!(got, reference_mul(&a, &b));
    }

    /// Default routing agrees with schoolbook convolution either side of
    /// the naive threshold.
    #[test]
    fn default_routing_matches_reference(a in poly::<1_000_000_007>(400), b in poly::<1_000_000_007>(400)) {
        let mut got = a.clone();
        modfft::mul(&mut got, &b);
        prop_assert_eq!(got, reference_mul(&a, &b));
    }

    /// Multiplying by one is the identity.
    #[test]
    fn one_is_identity(a in poly::<998_244_353>(64)) {
        let mut got = a.clone();
        mul_with(context(), &transform_only(), &mut got, &[F::new(1)]);
        prop_assert_eq!(got, a);
    }

    /// Either operand empty gives an empty product.
    #[test]
    fn empty_operand_gives_empty(a in poly::<998_244_353>(64)) {
        let mut got = a.clone();
        mul_with(context(), &transform_only(), &mut got, &[]);
        prop_assert!(got.is_empty());
        let mut got: Vec<F> = Vec::new();
        mul_with(context(), &transform_only(), &mut got, &a);
        prop_assert!(got.is_empty());
    }

    /// Operand order does not matter.
    #[test]
    fn commutative(a in poly::<1_000_000_007>(80), b in poly::<1_000_000_007>(80)) {
        let mut ab = a.clone();
        mul_with(context(), &transform_only(), &mut ab, &b);
        let mut ba = b.clone();
        mul_with(context(), &transform_only(), &mut ba, &a);
        prop_assert_eq!(ab, ba);
    }

    /// Squaring equals multiplying by a copy.
    #[test]
    fn sqr_matches_mul(a in poly::<998_244_353>(128)) {
        for options in [FftOptions::default(), transform_only()] {
            let mut squared = a.clone();
            sqr_with(context(), &options, &mut squared);
            let mut product = a.clone();
            mul_with(context(), &options, &mut product, &a.clone());
            prop_assert_eq!(squared, product);
        }
    }

    /// Circular product is the linear product folded modulo the wrap length.
    #[test]
    fn circular_is_cyclic_fold(a in poly::<1_000_000_007>(40), b in poly::<1_000_000_007>(40)) {
        let len = wrap_len(a.len(), b.len());
        for options in [FftOptions::default(), transform_only()] {
            let mut got = a.clone();
            circular_mul_with(context(), &options, &mut got, &b);
            prop_assert_eq!(&got, &fold_cyclic(&reference_mul(&a, &b), len));
        }
    }

    /// Negacyclic product is the linear product folded with sign.
    #[test]
    fn negacyclic_is_signed_fold(a in poly::<998_244_353>(40), b in poly::<998_244_353>(40)) {
        let len = wrap_len(a.len(), b.len());
        for options in [FftOptions::default(), transform_only()] {
            let mut got = a.clone();
            negacyclic_mul_with(context(), &options, &mut got, &b);
            prop_assert_eq!(&got, &fold_negacyclic(&reference_mul(&a, &b), len));
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    /// Float products stay within rounding noise of the reference.
    #[test]
    fn float_transform_close_to_reference(
        a in prop::collection::vec(-100.0f64..100.0, 1..64),
        b in prop::collection::vec(-100.0f64..100.0, 1..64),
    ) {
        let mut got = a.clone();
        mul_with(context(), &transform_only(), &mut got, &b);
        let expected = reference_mul(&a, &b);
        prop_assert_eq!(got.len(), expected.len());
        for (g, e) in got.iter().zip(&expected) {
            prop_assert!((g - e).abs() < 1e-6, "{} vs {}", g, e);
        }
    }

    /// Float circular product matches the folded reference.
    #[test]
    fn float_circular_close_to_fold(
        a in prop::collection::vec(-10.0f64..10.0, 1..40),
        b in prop::collection::vec(-10.0f64..10.0, 1..40),
    ) {
        let len = wrap_len(a.len(), b.len());
        let mut got = a.clone();
        circular_mul_with(context(), &transform_only(), &mut got, &b);
        let expected = fold_cyclic(&reference_mul(&a, &b), len);
        prop_assert_eq!(got.len(), len);
        for (g, e) in got.iter().zip(&expected) {
            prop_assert!((g - e).abs() < 1e-6, "{} vs {}", g, e);
        }
    }
}

#[test]
fn mixed_moduli_types_coexist() {
    let mut a = vec![Mod1000000007::new(3)];
    mul_with(context(), &transform_only(), &mut a, &[Mod1000000007::new(5)]);
    assert_eq!(a, vec![Mod1000000007::new(15)]);
}
