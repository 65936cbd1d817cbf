// SPDX-License-Identifier: Apache-2.0 OR MIT
//! Line reassembly for the collector's single inbound connection.
//!
//! Reads arrive as arbitrary byte chunks; this module buffers them and hands
//! out complete newline-delimited records in arrival order. A trailing
//! partial fragment stays buffered until the next read.

/// Stateful reassembler for newline-delimited records.
///
/// `push_bytes` is called with whatever the socket read returned; it appends
/// to the internal accumulator and extracts every complete `\n`-terminated
/// line. The terminator is stripped from the returned lines.
pub struct LineReader {
    buffer: Vec<u8>,
}

impl LineReader {
    pub fn new() -> Self {
        Self {
            buffer: Vec::with_capacity(4096),
        }
    }

    /// Append newly read bytes and return any complete lines
    pub fn push_bytes(&mut self, new_bytes: &[u8]) -> Vec<String> {
        self.buffer.extend_from_slice(new_bytes);
        let mut lines = Vec::new();

        while let Some(pos) = self.buffer.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=pos).collect();
            lines.push(String::from_utf8_lossy(&line[..pos]).into_owned());
        }

        lines
    }

    /// Size of the buffered partial fragment, if any.
    ///
    /// At orderly peer close this fragment is discarded, not flushed.
    pub fn buffered_len(&self) -> usize {
        self.buffer.len()
    }
}

impl Default for LineReader {
    fn default() -> Self {
        Self::new()
    }
}
