#![no_main]

use libfuzzer_sys::fuzz_target;
use berwire::Mode;
use berwire::decode::{DecodeError, Reader};
use berwire::encode::Writer;

/// Walks all values, copying primitive values to the writer.
fn walk(
    reader: &mut Reader<'_>, writer: &mut Writer
) -> Result<(), DecodeError> {
    while reader.has_data_remaining() {
        let tag = reader.peek_tag()?;
        if tag.is_constructed() {
            let mut nested = reader.read_sequence(Some(tag))?;
            walk(&mut nested, &mut writer.push_sequence(Some(tag)))?;
            nested.finish()?;
        }
        else {
            // The reader has checked the value for the same mode.
            writer.write_encoded_value(reader.read_encoded_value()?)
                .unwrap();
        }
    }
    Ok(())
}

fuzz_target!(|data: &[u8]| {
    for mode in [Mode::Ber, Mode::Cer, Mode::Der] {
        let mut reader = Reader::new(data, mode);
        let mut writer = Writer::new(mode);
        if walk(&mut reader, &mut writer).is_ok() && mode == Mode::Der {
            // DER has exactly one encoding for the structure.
            assert_eq!(writer.encode().as_ref(), data);
        }
    }
});
