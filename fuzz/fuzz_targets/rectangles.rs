#![no_main]

use arbitrary::Unstructured;
use libfuzzer_sys::fuzz_target;
use sweepclip::{arbitrary as arb, binary_op, BinaryOp};

// Grid-aligned rectangles share lots of vertices and edges. The results may
// not be exact when rings of one polygon overlap each other, but the
// operation should never panic.
fn run(u: &mut Unstructured) -> Result<(), arbitrary::Error> {
    let a = arb::rectangles(4, 10.0, true, u)?;
    let b = arb::rectangles(4, 10.0, true, u)?;

    for op in [
        BinaryOp::Intersection,
        BinaryOp::Union,
        BinaryOp::Difference,
        BinaryOp::Xor,
    ] {
        let _ = binary_op(a.clone(), b.clone(), op);
    }
    Ok(())
}

fuzz_target!(|data: &[u8]| {
    let _ = run(&mut Unstructured::new(data));
});
