mod property_partition;
mod tiny_buffers;

use crate::CodePoint;

/// The reference vectors: "foo♠bar" as code points and as UTF-8.
pub(crate) const SPADE_POINTS: [CodePoint; 7] = [0x66, 0x6F, 0x6F, 0x2660, 0x62, 0x61, 0x72];
pub(crate) const SPADE_UTF8: [u8; 9] = [0x66, 0x6F, 0x6F, 0xE2, 0x99, 0xA0, 0x62, 0x61, 0x72];
