//! XZ container decoding

use super::error::{DecompressError, DecompressResult};
use super::{Codec, OutputSink, XZ_CHUNK_SIZE};
use liblzma::stream::{Action, Status, Stream};

/// Decode a whole XZ stream into `sink`
///
/// Input is handed to the decoder in 64 KiB steps and output is drained
/// through a window of the same size, until the decoder reports the end of
/// the stream.
pub(super) fn unpack(data: &[u8], sink: &mut OutputSink) -> DecompressResult<()> {
    let mut stream = Stream::new_stream_decoder(u64::MAX, 0).map_err(|e| DecompressError::Init {
        codec: Codec::Xz,
        reason: e.to_string(),
    })?;
    let mut window = vec![0u8; XZ_CHUNK_SIZE];

    loop {
        let consumed = stream.total_in() as usize;
        let step = (data.len() - consumed).min(XZ_CHUNK_SIZE);
        let input = &data[consumed..consumed + step];
        let action = if step == 0 { Action::Finish } else { Action::Run };
        let out_before = stream.total_out();

        let status = stream
            .process(input, &mut window, action)
            .map_err(|e| DecompressError::Corrupt {
                codec: Codec::Xz,
                reason: e.to_string(),
            })?;

        let produced = (stream.total_out() - out_before) as usize;
        sink.extend(&window[..produced])?;

        match status {
            Status::StreamEnd => return Ok(()),
            // liblzma reports "no progress possible" as MemNeeded
            Status::MemNeeded => {
                return Err(DecompressError::Truncated {
                    codec: Codec::Xz,
                    consumed: stream.total_in(),
                });
            }
            Status::Ok | Status::GetCheck => {
                if step == 0 && produced == 0 && stream.total_in() as usize == consumed {
                    return Err(DecompressError::Truncated {
                        codec: Codec::Xz,
                        consumed: stream.total_in(),
                    });
                }
            }
        }
    }
}
