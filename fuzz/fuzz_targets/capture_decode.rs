#![no_main]

use libfuzzer_sys::fuzz_target;
use wire::Limits;

fuzz_target!(|data: &[u8]| {
    let limits = Limits::for_testing();
    let _ = tools::inspect_capture(data, &limits);
    if let Ok(capture) = tools::decode_capture_json(data, &limits) {
        let _ = tools::format_decode_pretty(&capture);
    }
});
