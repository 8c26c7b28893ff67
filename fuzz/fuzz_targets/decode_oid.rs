#![no_main]

use libfuzzer_sys::fuzz_target;
use berwire::Mode;
use berwire::decode::Reader;
use berwire::encode::Writer;

fuzz_target!(|data: &[u8]| {
    let mut reader = Reader::new(data, Mode::Ber);
    let dotted = match reader.read_object_identifier(None) {
        Ok(dotted) => dotted,
        Err(_) => return
    };

    // Every readable identifier can be written again and reads back the
    // same.
    let mut writer = Writer::new(Mode::Der);
    writer.write_object_identifier(None, &dotted).unwrap();
    let encoded = writer.encode();
    assert_eq!(
        Reader::new(&encoded, Mode::Der).read_object_identifier(None).ok(),
        Some(dotted)
    );
});
