//! Writing and reading certificate-like structures.

use berwire::{Class, Mode, Tag};
use berwire::decode::{DecodeError, Reader};
use berwire::encode::Writer;
use berwire::string::{
    Ia5String, NamedBits, PrintableString, Utf8String
};
use chrono::{TimeZone, Utc};
use hex_literal::hex;
use num_bigint::BigInt;


//------------ Fixtures ------------------------------------------------------

/// A to-be-signed certificate.
const TBS: [u8; 306] = hex!(
    "3082012ea00302010202103df70c5d9903f8d8868b9b8ccf20df69300d06092a"
    "864886f70d01010b05003034310b3009060355040613024e4c31133011060355"
    "040a0c0a4e4c6e6574204c6162733110300e06035504030c0754657374204341"
    "3020170d3234303130313030303030305a180f32303530303130313030303030"
    "305a30163114301206035504030c0b6578616d706c652e6f7267305930130607"
    "2a8648ce3d020106082a8648ce3d030107034200040102030405060708090a0b"
    "0c0d0e0f101112131415161718191a1b1c1d1e1f202122232425262728292a2b"
    "2c2d2e2f303132333435363738393a3b3c3d3e3f40a33b3039300e0603551d0f"
    "0101ff04040302028430270603551d110420301e820b6578616d706c652e6f72"
    "67820f7777772e6578616d706c652e6f7267"
);

/// A complete self-signed ECDSA certificate.
const CERT: [u8; 560] = hex!(
    "3082022c308201d2a003020102020100300a06082a8648ce3d040302307d310b"
    "3009060355040613024245310f300d060355040a1306476e75544c5331253023"
    "060355040b131c476e75544c5320636572746966696361746520617574686f72"
    "697479310f300d060355040813064c657576656e312530230603550403131c47"
    "6e75544c5320636572746966696361746520617574686f72697479301e170d31"
    "31303532333230333832315a170d3132313232323037343135315a307d310b30"
    "09060355040613024245310f300d060355040a1306476e75544c533125302306"
    "0355040b131c476e75544c5320636572746966696361746520617574686f7269"
    "7479310f300d060355040813064c657576656e312530230603550403131c476e"
    "75544c5320636572746966696361746520617574686f72697479305930130607"
    "2a8648ce3d020106082a8648ce3d0301070342000452d88d238ae367d78636b1"
    "200b097dc8c9baa220952fc54a63fa835fce782f8ff362cafdb7f780569d6e17"
    "b90e114c48b2c0af3b591716306809079917fedda7a3433041300f0603551d13"
    "0101ff040530030101ff300f0603551d0f0101ff04050303070600301d060355"
    "1d0e04160414f0b481fe9812bfb528b9644003cbcc1f664e2803300a06082a86"
    "48ce3d0403020348003045022031aec03d4a3f21be8517fcf0c7b231072a3856"
    "43d136d595e17e52c0064387a7022100978c0eb83c0a41afaea5cf067ed5c4d8"
    "2fffe262803410ba22dd35814693229a"
);

const SERIAL: &str = "82365655871428336739211871484630851433";
const SHA256_WITH_RSA: &str = "1.2.840.113549.1.1.11";


//------------ KeyUsage ------------------------------------------------------

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
struct KeyUsage(u64);

impl KeyUsage {
    const DIGITAL_SIGNATURE: u64 = 1 << 0;
    const KEY_CERT_SIGN: u64 = 1 << 5;
}

impl NamedBits for KeyUsage {
    const BIT_COUNT: usize = 9;

    fn to_bits(&self) -> u64 {
        self.0
    }

    fn from_bits(bits: u64) -> Self {
        KeyUsage(bits)
    }
}


//------------ Writing -------------------------------------------------------

fn write_name(writer: &mut Writer, rdns: &[(&str, &str)]) {
    let mut name = writer.push_sequence(None);
    for (oid, value) in rdns {
        let mut rdn = name.push_set_of(None);
        let mut atv = rdn.push_sequence(None);
        atv.write_object_identifier(None, oid).unwrap();
        if *oid == "2.5.4.6" {
            atv.write_character_string::<PrintableString>(None, value)
                .unwrap();
        }
        else {
            atv.write_character_string::<Utf8String>(None, value).unwrap();
        }
    }
}

fn write_tbs(writer: &mut Writer) {
    let mut tbs = writer.push_sequence(None);
    tbs.push_sequence(Some(Tag::ctx(0))).write_u64(None, 2);
    tbs.write_integer(None, &SERIAL.parse::<BigInt>().unwrap());
    {
        let mut alg = tbs.push_sequence(None);
        alg.write_object_identifier(None, SHA256_WITH_RSA).unwrap();
        alg.write_null(None);
    }
    write_name(&mut tbs, &[
        ("2.5.4.6", "NL"), ("2.5.4.10", "NLnet Labs"), ("2.5.4.3", "Test CA")
    ]);
    {
        let mut validity = tbs.push_sequence(None);
        validity.write_utc_time(
            None, &Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
        ).unwrap();
        validity.write_generalized_time(
            None, &Utc.with_ymd_and_hms(2050, 1, 1, 0, 0, 0).unwrap(), false
        ).unwrap();
    }
    write_name(&mut tbs, &[("2.5.4.3", "example.org")]);
    {
        let mut spki = tbs.push_sequence(None);
        {
            let mut alg = spki.push_sequence(None);
            alg.write_object_identifier(None, "1.2.840.10045.2.1").unwrap();
            alg.write_object_identifier(None, "1.2.840.10045.3.1.7")
                .unwrap();
        }
        let mut key = vec![4u8];
        key.extend(1..=64);
        spki.write_bit_string(None, 0, &key).unwrap();
    }
    let mut explicit = tbs.push_sequence(Some(Tag::ctx(3)));
    let mut extensions = explicit.push_sequence(None);
    {
        let mut ext = extensions.push_sequence(None);
        ext.write_object_identifier(None, "2.5.29.15").unwrap();
        ext.write_boolean(None, true);
        ext.push_octet_string(None).write_named_bit_list(
            None,
            &KeyUsage(KeyUsage::DIGITAL_SIGNATURE | KeyUsage::KEY_CERT_SIGN)
        );
    }
    let mut ext = extensions.push_sequence(None);
    ext.write_object_identifier(None, "2.5.29.17").unwrap();
    let mut value = ext.push_octet_string(None);
    let mut names = value.push_sequence(None);
    names.write_character_string::<Ia5String>(
        Some(Tag::ctx(2)), "example.org"
    ).unwrap();
    names.write_character_string::<Ia5String>(
        Some(Tag::ctx(2)), "www.example.org"
    ).unwrap();
}

#[test]
fn write_certificate() {
    let mut writer = Writer::new(Mode::Der);
    write_tbs(&mut writer);
    assert_eq!(writer.encoded_len(), TBS.len());
    assert!(writer.encoded_value_equals(&TBS));
    assert_eq!(writer.encode().as_ref(), TBS.as_ref());
}


//------------ Reading -------------------------------------------------------

fn read_name(
    reader: &mut Reader<'_>
) -> Result<Vec<(String, String)>, DecodeError> {
    let mut res = Vec::new();
    let mut name = reader.read_sequence(None)?;
    while name.has_data_remaining() {
        let mut rdn = name.read_set_of(None)?;
        let mut atv = rdn.read_sequence(None)?;
        let oid = atv.read_object_identifier(None)?;
        let value = if atv.peek_tag()? == Tag::PRINTABLE_STRING {
            atv.read_character_string::<PrintableString>(None)?
        }
        else {
            atv.read_character_string::<Utf8String>(None)?
        };
        res.push((oid, value));
        atv.finish()?;
        rdn.finish()?;
    }
    name.finish()?;
    Ok(res)
}

#[test]
fn read_certificate() {
    let mut reader = Reader::new(&TBS, Mode::Der);
    let mut tbs = reader.read_sequence(None).unwrap();

    let mut version = tbs.read_sequence(Some(Tag::ctx(0))).unwrap();
    assert_eq!(version.read_u8(None), Ok(2));
    version.finish().unwrap();

    assert!(tbs.read_u64(None).is_err());
    assert_eq!(
        Reader::clone(&tbs).read_integer_bytes(None).unwrap(),
        hex!("3df70c5d9903f8d8868b9b8ccf20df69")
    );
    assert_eq!(tbs.read_integer(None).unwrap().to_string(), SERIAL);

    let mut alg = tbs.read_sequence(None).unwrap();
    assert_eq!(alg.read_object_identifier(None).unwrap(), SHA256_WITH_RSA);
    alg.read_null(None).unwrap();
    alg.finish().unwrap();

    assert_eq!(
        read_name(&mut tbs).unwrap(),
        vec![
            ("2.5.4.6".into(), "NL".into()),
            ("2.5.4.10".into(), "NLnet Labs".into()),
            ("2.5.4.3".into(), "Test CA".into()),
        ]
    );

    let mut validity = tbs.read_sequence(None).unwrap();
    assert_eq!(
        validity.read_utc_time(None).unwrap(),
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    );
    assert_eq!(
        validity.read_generalized_time(None).unwrap(),
        Utc.with_ymd_and_hms(2050, 1, 1, 0, 0, 0).unwrap()
    );
    validity.finish().unwrap();

    assert_eq!(
        read_name(&mut tbs).unwrap(),
        vec![("2.5.4.3".into(), "example.org".into())]
    );

    let mut spki = tbs.read_sequence(None).unwrap();
    spki.skip_value().unwrap();
    let (unused, key) = spki.read_bit_string(None).unwrap();
    assert_eq!(unused, 0);
    assert_eq!(key.len(), 65);
    assert_eq!(key[0], 4);
    assert_eq!(key[64], 64);
    spki.finish().unwrap();

    let mut explicit = tbs.read_sequence(Some(Tag::ctx(3))).unwrap();
    let mut extensions = explicit.read_sequence(None).unwrap();
    {
        let mut ext = extensions.read_sequence(None).unwrap();
        assert_eq!(ext.read_object_identifier(None).unwrap(), "2.5.29.15");
        assert!(ext.read_boolean(None).unwrap());
        let mut value = ext.open_octet_string(None).unwrap();
        assert_eq!(
            value.read_named_bit_list::<KeyUsage>(None),
            Ok(KeyUsage(
                KeyUsage::DIGITAL_SIGNATURE | KeyUsage::KEY_CERT_SIGN
            ))
        );
    }
    {
        let mut ext = extensions.read_sequence(None).unwrap();
        assert_eq!(ext.read_object_identifier(None).unwrap(), "2.5.29.17");
        let mut value = ext.open_octet_string(None).unwrap();
        let mut names = value.read_sequence(None).unwrap();
        let mut dns = Vec::new();
        while names.has_data_remaining() {
            assert_eq!(names.peek_tag().unwrap().class(), Class::Context);
            dns.push(
                names.read_character_string::<Ia5String>(Some(Tag::ctx(2)))
                    .unwrap()
            );
        }
        assert_eq!(dns, ["example.org", "www.example.org"]);
    }
    extensions.finish().unwrap();
    explicit.finish().unwrap();
    tbs.finish().unwrap();
    reader.check_exhausted().unwrap();
}


//------------ Mirroring -----------------------------------------------------

/// Re-encodes all values from the reader into the writer.
///
/// Values of known universal types are decoded and encoded again,
/// everything else is copied as is.
fn mirror(
    reader: &mut Reader<'_>, writer: &mut Writer
) -> Result<(), DecodeError> {
    while reader.has_data_remaining() {
        let tag = reader.peek_tag()?;
        if tag.is_constructed() {
            if tag == Tag::SET {
                let mut nested = reader.read_set_of(None)?;
                mirror(&mut nested, &mut writer.push_set_of(None))?;
                nested.finish()?;
            }
            else {
                let mut nested = reader.read_sequence(Some(tag))?;
                mirror(&mut nested, &mut writer.push_sequence(Some(tag)))?;
                nested.finish()?;
            }
            continue
        }
        match tag {
            Tag::BOOLEAN => {
                writer.write_boolean(None, reader.read_boolean(None)?)
            }
            Tag::INTEGER => {
                writer.write_integer(None, &reader.read_integer(None)?)
            }
            Tag::BIT_STRING => {
                let (unused, data) = reader.read_bit_string(None)?;
                writer.write_bit_string(None, unused, &data).unwrap();
            }
            Tag::OCTET_STRING => {
                writer.write_octet_string(
                    None, &reader.read_octet_string(None)?
                )
            }
            Tag::NULL => {
                reader.read_null(None)?;
                writer.write_null(None)
            }
            Tag::OID => {
                writer.write_object_identifier(
                    None, &reader.read_object_identifier(None)?
                ).unwrap()
            }
            Tag::PRINTABLE_STRING => {
                writer.write_character_string::<PrintableString>(
                    None,
                    &reader.read_character_string::<PrintableString>(None)?
                ).unwrap()
            }
            Tag::UTF8_STRING => {
                writer.write_character_string::<Utf8String>(
                    None,
                    &reader.read_character_string::<Utf8String>(None)?
                ).unwrap()
            }
            Tag::UTC_TIME => {
                writer.write_utc_time(None, &reader.read_utc_time(None)?)
                    .unwrap()
            }
            Tag::GENERALIZED_TIME => {
                writer.write_generalized_time(
                    None, &reader.read_generalized_time(None)?, false
                ).unwrap()
            }
            _ => {
                writer.write_encoded_value(reader.read_encoded_value()?)
                    .unwrap()
            }
        }
    }
    Ok(())
}

fn assert_mirrors(data: &[u8]) {
    let mut reader = Reader::new(data, Mode::Der);
    let mut writer = Writer::new(Mode::Der);
    mirror(&mut reader, &mut writer).unwrap();
    reader.check_exhausted().unwrap();
    assert_eq!(writer.encode().as_ref(), data);
}

#[test]
fn mirror_tbs() {
    assert_mirrors(&TBS);
}

#[test]
fn mirror_real_certificate() {
    assert_mirrors(&CERT);
}

#[test]
fn mirror_as_ber() {
    // Reading DER as BER and writing BER changes nothing either.
    let mut reader = Reader::new(&CERT, Mode::Ber);
    let mut writer = Writer::new(Mode::Ber);
    mirror(&mut reader, &mut writer).unwrap();
    assert_eq!(writer.encode().as_ref(), CERT.as_ref());
}

#[test]
fn mirror_to_cer() {
    let mut reader = Reader::new(&CERT, Mode::Der);
    let mut writer = Writer::new(Mode::Cer);
    mirror(&mut reader, &mut writer).unwrap();
    let cer = writer.encode();
    assert_eq!(&cer[..4], b"\x30\x80\x30\x80");
    assert_eq!(&cer[cer.len() - 2..], b"\x00\x00");

    // And back to DER through a CER reader.
    let mut reader = Reader::new(&cer, Mode::Cer);
    let mut writer = Writer::new(Mode::Der);
    mirror(&mut reader, &mut writer).unwrap();
    reader.check_exhausted().unwrap();
    assert_eq!(writer.encode().as_ref(), CERT.as_ref());
}
