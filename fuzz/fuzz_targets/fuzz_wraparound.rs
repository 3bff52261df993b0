#![no_main]

use libfuzzer_sys::fuzz_target;

use modfft::{circular_mul_with, negacyclic_mul_with, FftOptions, Mod998244353};

fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }
    let words: Vec<Mod998244353> = data[1..]
        .chunks(2)
        .map(|c| Mod998244353::new(u64::from(c[0]) << 22 | u64::from(*c.get(1).unwrap_or(&0)) << 7))
        .collect();
    let split = usize::from(data[0]) % (words.len() + 1);
    let (a, b) = words.split_at(split);

    let ctx = modfft::default_context();
    let circular = [FftOptions::default(), FftOptions::transform_only()].map(|options| {
        let mut x = a.to_vec();
        circular_mul_with(ctx, &options, &mut x, b);
        x
    });
    assert_eq!(circular[0], circular[1]);

    let negacyclic = [FftOptions::default(), FftOptions::transform_only()].map(|options| {
        let mut x = a.to_vec();
        negacyclic_mul_with(ctx, &options, &mut x, b);
        x
    });
    assert_eq!(negacyclic[0], negacyclic[1]);
    assert_eq!(circular[0].len(), negacyclic[0].len());
});
