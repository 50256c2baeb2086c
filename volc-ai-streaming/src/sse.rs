//! Server-Sent Events line decoding.
//!
//! The response body of a streaming completion arrives as byte chunks split
//! at arbitrary boundaries, including in the middle of a multi-byte character
//! or a CRLF pair. [`SseLineDecoder`] carries the undecoded tail and the
//! partial last line across calls so the extracted payload sequence is
//! identical no matter how the bytes were chunked.

use std::borrow::Cow;

use crate::error::{StreamError, StreamResult};

/// Upper bound on the residual line buffer. A single SSE line longer than
/// this indicates a broken or hostile peer.
const MAX_BUFFER_SIZE: usize = 1024 * 1024;

const DATA_PREFIX: &str = "data:";
const DONE_SENTINEL: &str = "[DONE]";

/// Incremental decoder from body bytes to SSE `data:` payloads.
///
/// Feed it each chunk of one HTTP response body, in order. Lines without the
/// `data:` prefix (blank lines, comments, `event:` fields) are discarded
/// silently. The literal payload `[DONE]` is terminal: decoding stops and any
/// remaining or later bytes are ignored.
///
/// # Example
///
/// ```
/// use volc_ai_streaming::sse::SseLineDecoder;
///
/// let mut decoder = SseLineDecoder::new();
/// let payloads = decoder.feed(b"data: {\"x\":1}\n\ndata: [DONE]\n").unwrap();
/// assert_eq!(payloads, vec!["{\"x\":1}".to_string()]);
/// assert!(decoder.is_done());
/// ```
#[derive(Debug, Default)]
pub struct SseLineDecoder {
    /// Incomplete trailing UTF-8 sequence from the previous chunk.
    carry: Vec<u8>,
    /// Decoded text not yet terminated by a newline.
    buffer: String,
    done: bool,
}

impl SseLineDecoder {
    /// Create a decoder for one response body.
    pub fn new() -> Self {
        Self::default()
    }

    /// True once the `[DONE]` sentinel has been seen.
    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Decode the next body chunk and return every complete `data:` payload
    /// it finished, prefix and surrounding whitespace stripped.
    ///
    /// After the sentinel has been seen this returns an empty vector without
    /// touching the input.
    pub fn feed(&mut self, bytes: &[u8]) -> StreamResult<Vec<String>> {
        if self.done {
            return Ok(Vec::new());
        }

        self.decode_utf8(bytes)?;
        if self.buffer.len() > MAX_BUFFER_SIZE {
            return Err(StreamError::BufferOverflow {
                limit: MAX_BUFFER_SIZE,
            });
        }

        let mut payloads = Vec::new();
        while let Some(pos) = self.buffer.find('\n') {
            let line: String = self.buffer.drain(..=pos).collect();
            let line = line.trim();
            let Some(rest) = line.strip_prefix(DATA_PREFIX) else {
                continue;
            };
            let payload = rest.trim();
            if payload == DONE_SENTINEL {
                self.done = true;
                self.buffer.clear();
                self.carry.clear();
                break;
            }
            if !payload.is_empty() {
                payloads.push(payload.to_string());
            }
        }
        Ok(payloads)
    }

    /// Append `bytes` to the text buffer, keeping an incomplete trailing
    /// multi-byte sequence aside for the next call.
    fn decode_utf8(&mut self, bytes: &[u8]) -> StreamResult<()> {
        let data: Cow<'_, [u8]> = if self.carry.is_empty() {
            Cow::Borrowed(bytes)
        } else {
            let mut combined = std::mem::take(&mut self.carry);
            combined.extend_from_slice(bytes);
            Cow::Owned(combined)
        };

        match std::str::from_utf8(&data) {
            Ok(text) => self.buffer.push_str(text),
            Err(err) if err.error_len().is_some() => {
                return Err(StreamError::Utf8(err.to_string()));
            }
            Err(err) => {
                let (head, tail) = data.split_at(err.valid_up_to());
                let text = std::str::from_utf8(head)
                    .map_err(|head_err| StreamError::Utf8(head_err.to_string()))?;
                self.buffer.push_str(text);
                self.carry = tail.to_vec();
            }
        }
        Ok(())
    }
}
