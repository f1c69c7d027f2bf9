#![no_main]

use libfuzzer_sys::fuzz_target;
use loglog_sketch::Sketch;

fuzz_target!(|data: &[u8]| {
    if let Ok(mut sketch) = serde_json::from_slice::<Sketch>(data) {
        sketch.insert(&1);
        assert!(sketch.estimate() > 0.0);
    }
});
