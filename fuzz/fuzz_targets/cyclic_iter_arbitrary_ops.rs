#![no_main]

use libfuzzer_sys::fuzz_target;
use replaykit::ds::CyclicIter;

// Fuzz arbitrary next/reset sequences against a shadow position.
//
// The first byte sizes the snapshot (0 to 31 elements); every following byte
// is an operation.
fuzz_target!(|data: &[u8]| {
    let Some((&len, ops)) = data.split_first() else {
        return;
    };
    let len = usize::from(len % 32);
    let iter = CyclicIter::new((0..len).collect::<Vec<_>>());
    let mut expected = 0usize;

    for &op in ops {
        match op % 4 {
            0 => {
                iter.reset();
                expected = 0;
            },
            1 => {
                assert!(iter.remove().is_err());
            },
            _ => {
                assert!(iter.has_next());
                match iter.next() {
                    Some(&value) => {
                        assert!(len > 0);
                        assert_eq!(value, expected);
                        expected = (expected + 1) % len;
                    },
                    None => assert_eq!(len, 0),
                }
            },
        }
    }
    assert_eq!(iter.len(), len);
});
