#![no_main]

use libfuzzer_sys::fuzz_target;
use wire::{decode_batch, BlockDecoder, Limits};

fuzz_target!(|data: &[u8]| {
    let mut decoder = BlockDecoder::new(Limits::for_testing());
    let mut idx = 0usize;

    // Split the input into frames so decoder state carries across them.
    while idx < data.len() && idx < 8192 {
        let len = (usize::from(data[idx]) % 200).saturating_add(1);
        idx += 1;
        let end = (idx + len).min(data.len());
        let frame = &data[idx..end];
        idx = end;

        if let Ok(batch) = decode_batch(frame, &mut decoder) {
            for block in &batch.blocks {
                // Whatever decodes must re-encode to a block that decodes again.
                let bytes = block.to_bytes();
                let mut reader = bitstream::ByteReader::new(&bytes);
                let again = BlockDecoder::new(Limits::for_testing()).decode(&mut reader);
                assert!(again.is_ok(), "re-encoded block failed: {again:?}");
            }
        }
    }
});
