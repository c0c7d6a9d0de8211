//! Codec trait and the line codec.
//!
//! A "codec" (coder/decoder) converts between protocol types and what the
//! transport carries. The server only depends on the [`Codec`] trait, so a
//! different framing could be swapped in without touching rooms or games.

use crate::{Command, Notification, ProtocolError};

/// Maximum accepted inbound line length, in bytes.
pub const DEFAULT_MAX_LINE_LEN: usize = 512;

/// Encodes notifications and decodes commands.
///
/// `Send + Sync + 'static` because one codec is shared by every
/// connection task.
pub trait Codec: Send + Sync + 'static {
    /// Renders a notification as one outbound message.
    fn encode(&self, notification: &Notification) -> String;

    /// Parses one inbound message into a command.
    ///
    /// # Errors
    /// Returns [`ProtocolError::MalformedInput`] for lines that break the
    /// framing rules or the command grammar.
    fn decode(&self, line: &str) -> Result<Command, ProtocolError>;
}

// ---------------------------------------------------------------------------
// LineCodec
// ---------------------------------------------------------------------------

/// A [`Codec`] for single-line, space-separated text messages.
///
/// A message must fit in `max_line_len` bytes and contain no `\n` or
/// `\r`; anything else is malformed.
///
/// ```rust
/// use boomcats_protocol::{Codec, Command, LineCodec, Notification};
///
/// let codec = LineCodec::default();
/// assert_eq!(codec.decode("draw").unwrap(), Command::Draw);
/// assert!(codec.decode("draw\nstart").is_err());
/// assert_eq!(codec.encode(&Notification::Defusing), "defusing");
/// ```
#[derive(Debug, Clone, Copy)]
pub struct LineCodec {
    max_line_len: usize,
}

impl LineCodec {
    /// Creates a codec with a custom line-length cap.
    pub fn new(max_line_len: usize) -> Self {
        Self { max_line_len }
    }

    /// Returns the line-length cap.
    pub fn max_line_len(&self) -> usize {
        self.max_line_len
    }
}

impl Default for LineCodec {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_LINE_LEN)
    }
}

impl Codec for LineCodec {
    fn encode(&self, notification: &Notification) -> String {
        notification.to_string()
    }

    fn decode(&self, line: &str) -> Result<Command, ProtocolError> {
        if line.len() > self.max_line_len {
            return Err(ProtocolError::malformed(format!(
                "line of {} bytes exceeds {}",
                line.len(),
                self.max_line_len
            )));
        }
        if line.contains(['\n', '\r']) {
            return Err(ProtocolError::malformed("embedded line break"));
        }
        line.parse()
    }
}
