#![no_main]

use libfuzzer_sys::fuzz_target;
use berwire::Mode;
use berwire::decode::Reader;
use berwire::encode::Writer;

macro_rules! decode_builtin {
    ( $data:expr, $mode:expr, $( $fn:ident ),* ) => {{
        $(
            let _ = Reader::new($data, $mode).$fn(None);
        )*
    }}
}

fuzz_target!(|data: &[u8]| {
    for mode in [Mode::Ber, Mode::Cer, Mode::Der] {
        let mut reader = Reader::new(data, mode);
        if let Ok(value) = reader.read_integer(None) {
            // Re-encoding yields the minimal form which is the only form
            // the restricted modes accept.
            let mut writer = Writer::new(mode);
            writer.write_integer(None, &value);
            let encoded = writer.encode();
            if mode != Mode::Ber {
                assert!(data.starts_with(&encoded));
            }
            assert_eq!(
                Reader::new(&encoded, mode).read_integer(None).ok(),
                Some(value)
            );
        }

        decode_builtin!(
            data, mode,
            read_i8, read_u8, read_i16, read_u16, read_i32, read_u32,
            read_i64, read_u64, read_i128, read_u128, read_enumerated
        );
    }
});
