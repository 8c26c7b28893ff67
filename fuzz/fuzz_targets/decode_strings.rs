#![no_main]

use libfuzzer_sys::fuzz_target;
use berwire::Mode;
use berwire::decode::Reader;
use berwire::string::{
    BmpString, Ia5String, NumericString, PrintableString, Utf8String,
    VisibleString,
};

macro_rules! decode_strings {
    ( $data:expr, [ $( $mode:ident ),* ] ) => {{
        $(
            let mut reader = Reader::new($data, Mode::$mode);
            if let Ok((unused, bits)) = reader.read_bit_string(None) {
                assert!(unused < 8);
                assert!(!bits.is_empty() || unused == 0);
            }

            let _ = Reader::new($data, Mode::$mode).read_octet_string(None);
            let _ = Reader::new($data, Mode::$mode)
                .read_character_string::<BmpString>(None);
            let _ = Reader::new($data, Mode::$mode)
                .read_character_string::<Ia5String>(None);
            let _ = Reader::new($data, Mode::$mode)
                .read_character_string::<NumericString>(None);
            let _ = Reader::new($data, Mode::$mode)
                .read_character_string::<PrintableString>(None);
            let _ = Reader::new($data, Mode::$mode)
                .read_character_string::<Utf8String>(None);
            let _ = Reader::new($data, Mode::$mode)
                .read_character_string::<VisibleString>(None);
            let _ = Reader::new($data, Mode::$mode).read_utc_time(None);
            let _ = Reader::new($data, Mode::$mode)
                .read_generalized_time(None);
        )*
    }}
}

fuzz_target!(|data: &[u8]| {
    decode_strings!(data, [Ber, Cer, Der]);
});
