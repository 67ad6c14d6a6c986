//! Fuzz target for snapshot decoding.
//!
//! Arbitrary bytes must either decode into a snapshot that passes validation
//! and restores into a working stream, or fail with an error. Never panic.

#![no_main]

use fuzz_stream::{MutatingStream, StreamSnapshot};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(snapshot) = StreamSnapshot::decode(data) else {
        return;
    };
    assert!(snapshot.verify().is_ok());
    let encoded = snapshot.encode().expect("valid snapshots re-encode");
    assert_eq!(encoded, data);

    // Huge budgets are legal but make the default engine slow
    if snapshot.mutation_budget > 4096 {
        return;
    }
    if let Ok(mut stream) = MutatingStream::resume(snapshot) {
        let _ = stream.read(Some(1));
    }
});
