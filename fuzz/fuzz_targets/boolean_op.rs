#![no_main]

use arbitrary::Unstructured;
use libfuzzer_sys::fuzz_target;
use sweepclip::{arbitrary as arb, binary_op};

fn run(u: &mut Unstructured) -> Result<(), arbitrary::Error> {
    let a = arb::stars(4, 1000.0, u)?;
    let b = arb::stars(4, 1000.0, u)?;
    let op = arb::binary_op(u)?;

    let contours = binary_op(a, b, op).unwrap_or_else(|e| panic!("{op:?} failed: {e}"));
    for c in contours.contours() {
        assert!(c.points.len() >= 4);
        assert_eq!(c.points.first(), c.points.last());
    }
    Ok(())
}

fuzz_target!(|data: &[u8]| {
    let _ = run(&mut Unstructured::new(data));
});
