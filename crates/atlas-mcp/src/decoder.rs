//! Line reassembly over a chunked byte stream.
//!
//! Chunks may end anywhere: inside a line, or inside a multi-byte UTF-8
//! character. Lines are split on the raw `\n` byte before any text decoding
//! happens. `\n` never occurs inside a multi-byte UTF-8 sequence, so a
//! character cut by a chunk boundary stays buffered as bytes until the rest
//! of its line arrives.

use std::collections::VecDeque;
use std::pin::Pin;

use bytes::Bytes;
use futures::{Stream, StreamExt};

use crate::error::{McpError, Result};

/// Incremental byte-to-line decoder.
///
/// Holds the unterminated tail of the stream between calls to [`push`].
///
/// [`push`]: LineDecoder::push
#[derive(Debug, Default)]
pub struct LineDecoder {
    buffer: Vec<u8>,
}

impl LineDecoder {
    /// Create an empty decoder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one chunk and return every line it completes, in order.
    ///
    /// Returned lines have their terminator (and a preceding `\r`, if any)
    /// removed.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        let scan_from = self.buffer.len();
        self.buffer.extend_from_slice(chunk);

        let Some(last_newline) = self.buffer[scan_from..].iter().rposition(|&b| b == b'\n')
        else {
            return Vec::new();
        };

        let tail = self.buffer.split_off(scan_from + last_newline + 1);
        let complete = std::mem::replace(&mut self.buffer, tail);

        complete[..complete.len() - 1]
            .split(|&b| b == b'\n')
            .map(decode_line)
            .collect()
    }

    /// Number of buffered bytes not yet terminated by a newline.
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }

    /// Signal end of stream.
    ///
    /// Returns the unterminated remainder as a final line only when it is
    /// non-empty and valid UTF-8. The decoder is empty afterwards.
    pub fn finish(&mut self) -> Option<String> {
        let rest = std::mem::take(&mut self.buffer);
        if rest.is_empty() {
            return None;
        }
        let rest = strip_cr(&rest);
        match std::str::from_utf8(rest) {
            Ok(text) => Some(text.to_string()),
            Err(e) => {
                tracing::debug!(
                    bytes = rest.len(),
                    error = %e,
                    "dropping malformed trailing data at end of stream"
                );
                None
            }
        }
    }
}

fn strip_cr(line: &[u8]) -> &[u8] {
    line.strip_suffix(b"\r").unwrap_or(line)
}

fn decode_line(line: &[u8]) -> String {
    String::from_utf8_lossy(strip_cr(line)).into_owned()
}

/// One logical line produced by [`decode_lines`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedLine {
    /// Line text without its terminator.
    pub text: String,
    /// False for the unterminated remainder emitted at end of stream.
    pub terminated: bool,
}

impl DecodedLine {
    fn terminated(text: String) -> Self {
        Self {
            text,
            terminated: true,
        }
    }

    fn trailing(text: String) -> Self {
        Self {
            text,
            terminated: false,
        }
    }
}

struct DecodeState<S> {
    byte_stream: Pin<Box<S>>,
    decoder: LineDecoder,
    ready: VecDeque<DecodedLine>,
    done: bool,
}

/// Turn a byte stream into a lazy stream of logical lines.
///
/// A read error on the underlying stream is yielded once as
/// [`McpError::Transport`] and ends the stream; lines already yielded are
/// unaffected.
pub fn decode_lines<S, E>(byte_stream: S) -> impl Stream<Item = Result<DecodedLine>>
where
    S: Stream<Item = std::result::Result<Bytes, E>>,
    E: std::fmt::Display,
{
    futures::stream::unfold(
        DecodeState {
            byte_stream: Box::pin(byte_stream),
            decoder: LineDecoder::new(),
            ready: VecDeque::new(),
            done: false,
        },
        |mut state| async move {
            loop {
                if let Some(line) = state.ready.pop_front() {
                    return Some((Ok(line), state));
                }
                if state.done {
                    return None;
                }

                match state.byte_stream.next().await {
                    Some(Ok(bytes)) => {
                        let lines = state.decoder.push(&bytes);
                        state
                            .ready
                            .extend(lines.into_iter().map(DecodedLine::terminated));
                    }
                    Some(Err(e)) => {
                        state.done = true;
                        return Some((
                            Err(McpError::transport(format!(
                                "failed to read response body: {}",
                                e
                            ))),
                            state,
                        ));
                    }
                    None => {
                        state.done = true;
                        if let Some(rest) = state.decoder.finish() {
                            state.ready.push_back(DecodedLine::trailing(rest));
                        }
                    }
                }
            }
        },
    )
}
