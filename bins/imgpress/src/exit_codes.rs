//! Process exit codes.

use imgpress_engine::ErrorKind;

pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;
pub const INVALID_INPUT: i32 = 2;
pub const UNSUPPORTED_FORMAT: i32 = 3;
pub const DECODE_ERROR: i32 = 4;
pub const ENCODE_ERROR: i32 = 5;
pub const TIMEOUT: i32 = 124;

pub fn for_kind(kind: ErrorKind) -> i32 {
    match kind {
        ErrorKind::InvalidInput => INVALID_INPUT,
        ErrorKind::UnsupportedFormat => UNSUPPORTED_FORMAT,
        ErrorKind::DecodeError => DECODE_ERROR,
        ErrorKind::EncodeError => ENCODE_ERROR,
    }
}
