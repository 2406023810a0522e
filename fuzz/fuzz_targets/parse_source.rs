#![no_main]

use goscan::{GoSource, TagSet};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(src) = GoSource::parse(text) else {
        return;
    };

    let tags = TagSet::from(["parser", ""]);
    let _ = src.scalar_values::<String>(&tags);
    let _ = src.scalar_values::<f32>(&tags);
    let _ = src.sequence_values::<i64>(&tags);
    let _ = src.mapping_values::<String, f64>(&tags);
    let _ = src.function_names("", &["Context"]);
});
