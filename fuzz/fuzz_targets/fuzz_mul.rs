#![no_main]

use libfuzzer_sys::fuzz_target;

use modfft::{mul_with, naive_mul, sqr_with, FftOptions, Mod1000000007};

fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }
    // First byte splits the remaining words between the two operands.
    let words: Vec<Mod1000000007> = data[1..]
        .chunks(4)
        .map(|c| {
            let mut buf = [0u8; 4];
            buf[..c.len()].copy_from_slice(c);
            Mod1000000007::new(u64::from(u32::from_le_bytes(buf)))
        })
        .collect();
    let split = usize::from(data[0]) % (words.len() + 1);
    let (a, b) = words.split_at(split);

    let options = FftOptions::transform_only();
    let ctx = modfft::default_context();

    let mut expected = a.to_vec();
    naive_mul(&mut expected, b);
    let mut got = a.to_vec();
    mul_with(ctx, &options, &mut got, b);
    assert_eq!(got, expected);

    let mut squared = a.to_vec();
    sqr_with(ctx, &options, &mut squared);
    let mut expected = a.to_vec();
    naive_mul(&mut expected, a);
    assert_eq!(squared, expected);
});
