//! Report codec: fixed 28-byte ASCII counter frame.
//!
//! Wire format (no terminator):
//! ```text
//! ┌──┬────────┬─┬────────┬─┬────────┐
//! │C:│AAAAAAAA│:│BBBBBBBB│:│CCCCCCCC│
//! └──┴────────┴─┴────────┴─┴────────┘
//!   2     8     1    8     1    8      = 28 bytes
//! ```
//!
//! `A`, `B`, `C` are `counter_a`, `counter_b` and `elapsed_seconds` as
//! zero-padded, uppercase, most-significant-nibble-first hex.
//!
//! Only the encoder runs on the node.  [`decode_report`] exists for the
//! receiver side and for tests.

use core::fmt::Write;

use super::state::CounterSnapshot;

/// Exact length of an encoded report.
pub const REPORT_LEN: usize = 28;

const PREFIX: &[u8; 2] = b"C:";
const SEPARATOR: u8 = b':';
const HEX_DIGITS: usize = 8;

/// Byte offsets of the three hex fields.
const FIELD_OFFSETS: [usize; 3] = [2, 11, 20];

/// One encoded report payload.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct ReportFrame([u8; REPORT_LEN]);

impl ReportFrame {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// The frame is pure ASCII by construction.
    pub fn as_str(&self) -> &str {
        core::str::from_utf8(&self.0).unwrap_or("")
    }
}

impl core::fmt::Debug for ReportFrame {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "ReportFrame({:?})", self.as_str())
    }
}

impl core::fmt::Display for ReportFrame {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Encode a snapshot into the fixed report format.
pub fn encode_report(snapshot: &CounterSnapshot) -> ReportFrame {
    let mut text = heapless::String::<REPORT_LEN>::new();
    // Three u32 fields at exactly eight hex digits each always fill the
    // buffer and never overflow it.
    let _ = write!(
        text,
        "C:{:08X}:{:08X}:{:08X}",
        snapshot.counter_a, snapshot.counter_b, snapshot.elapsed_seconds
    );
    let mut buf = [0u8; REPORT_LEN];
    buf.copy_from_slice(text.as_bytes());
    ReportFrame(buf)
}

/// Reasons a received report is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodecError {
    /// Payload is not exactly [`REPORT_LEN`] bytes.
    BadLength(usize),
    /// Missing `C:` prefix or a `:` separator.
    BadFraming,
    /// A field contains something other than uppercase hex digits.
    BadHexDigit { offset: usize },
}

impl core::fmt::Display for CodecError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::BadLength(len) => write!(f, "expected {} bytes, got {}", REPORT_LEN, len),
            Self::BadFraming => write!(f, "bad prefix or separator"),
            Self::BadHexDigit { offset } => write!(f, "invalid hex digit at offset {}", offset),
        }
    }
}

/// Parse a report payload back into a snapshot.
pub fn decode_report(payload: &[u8]) -> Result<CounterSnapshot, CodecError> {
    if payload.len() != REPORT_LEN {
        return Err(CodecError::BadLength(payload.len()));
    }
    if &payload[..2] != PREFIX {
        return Err(CodecError::BadFraming);
    }
    if FIELD_OFFSETS[1..]
        .iter()
        .any(|&off| payload[off - 1] != SEPARATOR)
    {
        return Err(CodecError::BadFraming);
    }

    let mut fields = [0u32; 3];
    for (value, &offset) in fields.iter_mut().zip(FIELD_OFFSETS.iter()) {
        *value = parse_hex_field(&payload[offset..offset + HEX_DIGITS], offset)?;
    }

    Ok(CounterSnapshot {
        counter_a: fields[0],
        counter_b: fields[1],
        elapsed_seconds: fields[2],
    })
}

fn parse_hex_field(digits: &[u8], base_offset: usize) -> Result<u32, CodecError> {
    digits.iter().enumerate().try_fold(0u32, |acc, (i, &c)| {
        let nibble = match c {
            b'0'..=b'9' => c - b'0',
            b'A'..=b'F' => c - b'A' + 10,
            _ => {
                return Err(CodecError::BadHexDigit {
                    offset: base_offset + i,
                });
            }
        };
        Ok((acc << 4) | u32::from(nibble))
    })
}
