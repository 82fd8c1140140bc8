//! Deflate decoding with gzip or zlib framing

use super::error::{DecompressError, DecompressResult};
use super::{Codec, GZIP_WINDOW_SIZE, OutputSink};
use flate2::bufread::GzDecoder;
use flate2::{Decompress, FlushDecompress, Status};
use std::io::{ErrorKind, Read};

/// gzip member magic bytes
const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Inflate a whole gzip or zlib stream into `sink`
///
/// The framing is detected from the first two bytes. Both paths drain a
/// 1 MiB output window until the stream reports its end.
pub(super) fn inflate(data: &[u8], sink: &mut OutputSink) -> DecompressResult<()> {
    if data.starts_with(&GZIP_MAGIC) {
        inflate_gzip(data, sink)
    } else {
        inflate_zlib(data, sink)
    }
}

fn inflate_gzip(data: &[u8], sink: &mut OutputSink) -> DecompressResult<()> {
    let mut decoder = GzDecoder::new(data);
    let mut window = vec![0u8; GZIP_WINDOW_SIZE];

    loop {
        let produced = decoder.read(&mut window).map_err(|e| {
            if e.kind() == ErrorKind::UnexpectedEof {
                DecompressError::Truncated {
                    codec: Codec::Gzip,
                    consumed: data.len() as u64,
                }
            } else {
                DecompressError::Corrupt {
                    codec: Codec::Gzip,
                    reason: e.to_string(),
                }
            }
        })?;

        // GzDecoder only reports 0 after the trailer CRC and size matched
        if produced == 0 {
            return Ok(());
        }
        sink.extend(&window[..produced])?;
    }
}

fn inflate_zlib(data: &[u8], sink: &mut OutputSink) -> DecompressResult<()> {
    let mut stream = Decompress::new(true);
    let mut window = vec![0u8; GZIP_WINDOW_SIZE];

    loop {
        let in_before = stream.total_in();
        let out_before = stream.total_out();
        let remaining = &data[in_before as usize..];

        let status = stream
            .decompress(remaining, &mut window, FlushDecompress::None)
            .map_err(|e| DecompressError::Corrupt {
                codec: Codec::Gzip,
                reason: e.to_string(),
            })?;

        let produced = (stream.total_out() - out_before) as usize;
        sink.extend(&window[..produced])?;

        if status == Status::StreamEnd {
            return Ok(());
        }

        // Neither side moved: the input is exhausted before the adler32 trailer
        if produced == 0 && stream.total_in() == in_before {
            return Err(DecompressError::Truncated {
                codec: Codec::Gzip,
                consumed: stream.total_in(),
            });
        }
    }
}
