#![no_main]

use libfuzzer_sys::fuzz_target;
use loglog_sketch::{Sketch, MAX_RANK};
use wyhash::wyhash;

fuzz_target!(|data: &[u8]| {
    if data.is_empty() {
        return;
    }

    // pick precision from the input so small sketches hit the large range correction too
    let precision = (wyhash(data, 0) % 16) as u32 + 1;
    let mut sketch = Sketch::with_precision(precision).unwrap();
    for chunk in data.chunks(8) {
        let mut buf = [0u8; 8];
        buf[..chunk.len()].copy_from_slice(chunk);
        sketch.insert_hash(u64::from_le_bytes(buf));

        let estimate = sketch.estimate();
        assert!(estimate.is_finite());
        assert!(estimate > 0.0);
        assert!(sketch.size_of() > 0);
    }
    for idx in 0..sketch.register_count() {
        assert!(sketch.register(idx) <= MAX_RANK);
    }
});
