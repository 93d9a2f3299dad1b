//! Wire-format event decoding.

use serde::Deserialize;
use serde_json::value::RawValue;
use thiserror::Error;

use notely_core::NewNote;

/// Raw envelope as it appears on the wire. `data` is captured without being
/// interpreted so the payload can be decoded directly into the variant type.
#[derive(Debug, Deserialize)]
struct Envelope<'a> {
    #[serde(rename = "type")]
    kind: String,
    #[serde(borrow)]
    data: Option<&'a RawValue>,
}

/// A decoded queue event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteEvent {
    Create(NewNote),
}

/// Why a message body could not be turned into a [`NoteEvent`].
///
/// Consumers treat all three the same way (log and drop), but they are kept
/// distinct so the logs say which contract was broken.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The body is not a valid envelope object.
    #[error("malformed event envelope: {0}")]
    Envelope(#[source] serde_json::Error),

    /// The envelope was fine but `data` does not match the payload shape for
    /// its `type`.
    #[error("malformed `{kind}` payload: {source}")]
    Payload {
        kind: String,
        #[source]
        source: serde_json::Error,
    },

    /// The discriminator names no known event type.
    #[error("unknown event type `{0}`")]
    UnknownType(String),
}

/// Decode a message body into a [`NoteEvent`].
pub fn decode(body: &[u8]) -> Result<NoteEvent, DecodeError> {
    let envelope: Envelope<'_> = serde_json::from_slice(body).map_err(DecodeError::Envelope)?;

    match envelope.kind.as_str() {
        "create" => {
            // An absent `data` is decoded as `null` so it fails with the same
            // payload error as an ill-typed one.
            let data = envelope.data.map(RawValue::get).unwrap_or("null");
            let new_note = serde_json::from_str(data).map_err(|source| DecodeError::Payload {
                kind: envelope.kind,
                source,
            })?;
            Ok(NoteEvent::Create(new_note))
        }
        _ => Err(DecodeError::UnknownType(envelope.kind)),
    }
}
