#![no_main]

use arbitrary::{Arbitrary, Unstructured};

use libfuzzer_sys::fuzz_target;
use sweepclip::status::StatusLine;

#[derive(Arbitrary, Debug)]
enum Op {
    Insert { val: i16 },
    Remove { val: i16 },
}

fn arbitrary_ops(mut u: Unstructured) -> Result<(), arbitrary::Error> {
    let len = u.arbitrary_len::<Op>()?;
    let mut vec: Vec<i16> = Vec::new();
    let mut status = StatusLine::<i16, 4>::default();
    for _ in 0..len {
        let op: Op = u.arbitrary()?;
        match op {
            Op::Insert { val } => {
                let cursor = status.insert(val, i16::cmp);
                assert_eq!(*status.get(cursor), val);
                let idx = vec.partition_point(|x| *x <= val);
                vec.insert(idx, val);
            }
            Op::Remove { val } => {
                let found = status.find(&val, i16::cmp);
                match vec.iter().position(|x| *x == val) {
                    Some(idx) => {
                        let cursor = found.expect("missing element");
                        assert_eq!(status.remove(cursor), val);
                        vec.remove(idx);
                    }
                    None => assert!(found.is_none()),
                }
            }
        }
        status.check_invariants(i16::cmp);

        assert_eq!(status.len(), vec.len());
        assert_eq!(status.iter().cloned().collect::<Vec<_>>(), vec);
    }
    Ok(())
}

fuzz_target!(|data: &[u8]| {
    let u = Unstructured::new(data);
    let _ = arbitrary_ops(u);
});
