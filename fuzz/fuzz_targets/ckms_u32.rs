#![no_main]

use std::io::Cursor;

use byteorder::{BigEndian, ReadBytesExt};
use libfuzzer_sys::fuzz_target;

use biased_quantiles::ckms::{Bias, CKMS};
use biased_quantiles::util::Xorshift;

fuzz_target!(|data: &[u8]| {
    let mut cursor = Cursor::new(data);

    // unbounded; construction must reject anything outside (0, 0.5)
    let error: f64 = if let Ok(res) = cursor.read_f64::<BigEndian>() {
        res
    } else {
        return;
    };
    let bias = match data.len() % 3 {
        0 => Bias::Low,
        1 => Bias::High,
        _ => Bias::Uniform,
    };
    // bounded 2**18 points per run
    let upper_bound: u32 = if let Ok(res) = cursor.read_u32::<BigEndian>() {
        res % 262_144
    } else {
        return;
    };
    // unbounded
    let seed: u64 = if let Ok(res) = cursor.read_u64::<BigEndian>() {
        res
    } else {
        return;
    };

    let mut ckms = match CKMS::<u32>::new(bias, error) {
        Ok(ckms) => ckms,
        Err(_) => return,
    };

    let mut xshft = Xorshift::new(seed);
    for _ in 0..(upper_bound as usize) {
        let val = xshft.next_val();
        ckms.insert(val);
    }

    for phi in [0.0, 0.01, 0.5, 0.99, 1.0] {
        let _ = ckms.quantile(phi);
    }
});
