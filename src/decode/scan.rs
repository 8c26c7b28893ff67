//! Finding the end of indefinite length values.
//!
//! This is a private module.
//!
//! A value with indefinite length ends with an end-of-contents marker, two
//! zero octets. Since the content may contain further indefinite length
//! values, finding the right marker requires walking the content. This is
//! done iteratively with an explicit stack so that deeply nested input
//! can’t exhaust the call stack.

use smallvec::SmallVec;
use crate::length::Length;
use crate::mode::Mode;
use crate::tag::Tag;
use super::error::DecodeError;


/// Returns the index just past the end of an indefinite length value.
///
/// The content of the value starts at `start` in `data`. The data must
/// end where the enclosing value ends. At most `max_depth` indefinite
/// length values, including the one being scanned, may be nested.
pub(crate) fn indefinite_end(
    data: &[u8], start: usize, mode: Mode, max_depth: usize
) -> Result<usize, DecodeError> {
    // The start of the content of each open indefinite length value.
    let mut stack: SmallVec<[usize; 8]> = SmallVec::new();
    if max_depth == 0 {
        return Err(DecodeError::malformed_length(start, "nesting too deep"))
    }
    stack.push(start);
    let mut pos = start;
    while !stack.is_empty() {
        let (tag, tag_len) = Tag::take_from(
            &data[pos..], pos.into(), mode
        )?;
        let len_pos = pos + tag_len;

        // End-of-contents is exactly two zero octets.
        if tag.is_end_of_contents() {
            match data.get(len_pos) {
                Some(0) if tag_len == 1 => {
                    pos = len_pos + 1;
                    stack.pop();
                    continue
                }
                Some(_) => {
                    return Err(DecodeError::malformed_length(
                        len_pos, "invalid end-of-contents"
                    ))
                }
                None => return Err(DecodeError::truncated(len_pos))
            }
        }

        let (length, len_len) = Length::take_from(
            &data[len_pos..], len_pos.into(), mode
        )?;
        let content = len_pos + len_len;
        match length {
            Length::Definite(len) => {
                if tag.is_constructed() && !mode.allow_definite_constructed()
                {
                    return Err(DecodeError::non_canonical(
                        pos, "definite length constructed value in CER"
                    ))
                }
                pos = match content.checked_add(len) {
                    Some(end) if end <= data.len() => end,
                    _ => return Err(DecodeError::truncated(content))
                };
            }
            Length::Indefinite => {
                if !tag.is_constructed() {
                    return Err(DecodeError::malformed_length(
                        len_pos, "indefinite length for primitive value"
                    ))
                }
                if stack.len() >= max_depth {
                    return Err(DecodeError::malformed_length(
                        pos, "nesting too deep"
                    ))
                }
                stack.push(content);
                pos = content;
            }
        }
    }
    Ok(pos)
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;
    use crate::decode::ErrorKind;

    fn end(data: &[u8], max_depth: usize) -> Result<usize, DecodeError> {
        // All test data starts with a two octet header.
        indefinite_end(data, 2, Mode::Ber, max_depth)
    }

    #[test]
    fn flat() {
        assert_eq!(end(b"\x30\x80\x00\x00", 1), Ok(4));
        assert_eq!(end(b"\x30\x80\x02\x01\x05\x00\x00\xff", 1), Ok(7));
        assert_eq!(end(b"\x30\x80\x04\x02\x00\x00\x00\x00", 1), Ok(8));
    }

    #[test]
    fn nested() {
        let data = b"\x30\x80\x30\x80\x05\x00\x00\x00\x30\x02\x05\x00\
                     \x00\x00";
        assert_eq!(end(data, 2), Ok(14));
        assert_eq!(
            end(data, 1).unwrap_err().kind(), ErrorKind::MalformedLength
        );
        assert_eq!(
            end(data, 0).unwrap_err().kind(), ErrorKind::MalformedLength
        );
    }

    #[test]
    fn deep() {
        let mut data = Vec::new();
        for _ in 0..10_000 {
            data.extend_from_slice(b"\x30\x80");
        }
        for _ in 0..10_000 {
            data.extend_from_slice(b"\x00\x00");
        }
        assert_eq!(end(&data, 10_000), Ok(data.len()));
        assert_eq!(
            end(&data, 32).unwrap_err().kind(), ErrorKind::MalformedLength
        );
    }

    #[test]
    fn broken() {
        assert_eq!(
            end(b"\x30\x80\x05\x00", 1).unwrap_err().kind(),
            ErrorKind::Truncated
        );
        assert_eq!(
            end(b"\x30\x80\x05\x00\x00", 1).unwrap_err().kind(),
            ErrorKind::Truncated
        );
        assert_eq!(
            end(b"\x30\x80\x00\x01\x00", 1).unwrap_err().kind(),
            ErrorKind::MalformedLength
        );
        assert_eq!(
            end(b"\x30\x80\x1f\x00\x00", 1).unwrap_err().kind(),
            ErrorKind::MalformedLength
        );
        assert_eq!(
            end(b"\x30\x80\x04\x80\x00\x00", 1).unwrap_err().kind(),
            ErrorKind::MalformedLength
        );
        assert_eq!(
            end(b"\x30\x80\x04\x05\x00\x00", 1).unwrap_err().kind(),
            ErrorKind::Truncated
        );
    }

    #[test]
    fn cer_definite_constructed() {
        assert_eq!(
            indefinite_end(b"\x30\x80\x30\x00\x00\x00", 2, Mode::Cer, 2)
                .unwrap_err().kind(),
            ErrorKind::NonCanonical
        );
        assert_eq!(
            indefinite_end(b"\x30\x80\x30\x00\x00\x00", 2, Mode::Ber, 2),
            Ok(6)
        );
    }
}
