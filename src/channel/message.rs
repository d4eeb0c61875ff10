use crate::foundation::error::{CanvasError, CanvasResult};
use crate::params::store::{AttributeList, Configuration};

/// Correlation id carried by a request and its response.
pub type RequestId = u64;

/// Messages posted to the host frame.
///
/// The wire form is a JSON object whose `type` field names the variant.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutboundMessage {
    /// Frame size the host should give the embedded surface.
    SetSize {
        /// Width in pixels.
        width: u32,
        /// Height in pixels.
        height: u32,
    },
    /// PNG thumbnail of the current surface.
    SaveThumbnail {
        /// Encoded image bytes.
        blob: Vec<u8>,
    },
    /// Full configuration; never a partial update.
    SaveParams {
        /// Configuration to persist.
        params: Configuration,
    },
    /// Display attributes derived from the configuration.
    SaveAttributes {
        /// Ordered attribute pairs.
        attrs: AttributeList,
    },
    /// Enable the host's thumbnail button.
    EnableThumbnail,
    /// Enable the host's prepare button.
    EnablePrepare,
    /// Final actions for an update are done.
    ConfirmUpdate,
    /// The frame is ready to receive host messages.
    Ready {
        /// Params files the host should restore, if any.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        restore: Option<Vec<String>>,
    },
    /// Save a text file into the params bundle.
    SaveTextFile {
        /// File contents.
        text: String,
        /// Directory inside the bundle.
        path: String,
        /// File name.
        fname: String,
    },
    /// Save binary data that originated as a blob.
    SaveBinaryFileFromBlob {
        /// File contents.
        blob: Vec<u8>,
        /// Directory inside the bundle.
        path: String,
        /// File name.
        fname: String,
    },
    /// Save binary data that originated as a byte array.
    SaveBinaryFileFromUint8 {
        /// File contents.
        uint8: Vec<u8>,
        /// Directory inside the bundle.
        path: String,
        /// File name.
        fname: String,
    },
    /// Ask the host to load an image saved in the params bundle.
    #[serde(rename = "loadImage")]
    LoadImage {
        /// File name inside the params bundle.
        fname: String,
    },
    /// Request a params file as a binary object; answered by
    /// [`InboundMessage::LoadedParamsFileAsBlob`] with the same `request_id`.
    LoadParamsFileAsBlob {
        /// Correlation id.
        request_id: RequestId,
        /// File name inside the params bundle.
        fname: String,
        /// Expected MIME type.
        mime: String,
    },
}

impl OutboundMessage {
    /// Wire `type` tag.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::SetSize { .. } => "set_size",
            Self::SaveThumbnail { .. } => "save_thumbnail",
            Self::SaveParams { .. } => "save_params",
            Self::SaveAttributes { .. } => "save_attributes",
            Self::EnableThumbnail => "enable_thumbnail",
            Self::EnablePrepare => "enable_prepare",
            Self::ConfirmUpdate => "confirm_update",
            Self::Ready { .. } => "ready",
            Self::SaveTextFile { .. } => "save_text_file",
            Self::SaveBinaryFileFromBlob { .. } => "save_binary_file_from_blob",
            Self::SaveBinaryFileFromUint8 { .. } => "save_binary_file_from_uint8",
            Self::LoadImage { .. } => "loadImage",
            Self::LoadParamsFileAsBlob { .. } => "load_params_file_as_blob",
        }
    }

    /// File name a correlated request is about, if any.
    pub(crate) fn correlation_name(&self) -> Option<&str> {
        match self {
            Self::LoadParamsFileAsBlob { fname, .. } => Some(fname),
            _ => None,
        }
    }

    /// Encode to the JSON wire form.
    pub fn to_json(&self) -> CanvasResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Body of a `restore` message.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RestorePayload {
    /// Previously saved configuration; absent when the host has nothing saved.
    ///
    /// Kept as raw JSON: it is untrusted until the parameter store validates it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restored: Option<serde_json::Value>,
}

/// Messages received from the host frame.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InboundMessage {
    /// User pressed the thumbnail button.
    SaveThumbnail,
    /// User pressed the prepare button.
    ConfirmUpdate,
    /// Host pushes the saved configuration, if there is one.
    Restore {
        /// Restore body. A body that is not `{ restored?: .. }` is kept as the restored value,
        /// so the parameter store can reject it and the frame still re-renders.
        #[serde(default, deserialize_with = "lenient_restore")]
        params: RestorePayload,
    },
    /// Response to [`OutboundMessage::LoadParamsFileAsBlob`].
    LoadedParamsFileAsBlob {
        /// Correlation id; hosts that predate ids omit it.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        request_id: Option<RequestId>,
        /// Echoed file name.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        fname: Option<String>,
        /// MIME type of `blob`.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        mime: Option<String>,
        /// File contents.
        #[serde(default)]
        blob: Vec<u8>,
    },
    /// Any type this frame does not know about.
    #[serde(other)]
    Unknown,
}

fn lenient_restore<'de, D>(de: D) -> Result<RestorePayload, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = <Option<serde_json::Value> as serde::Deserialize>::deserialize(de)?;
    let restored = match raw {
        None | Some(serde_json::Value::Null) => None,
        Some(serde_json::Value::Object(mut body)) => {
            body.remove("restored").filter(|v| !v.is_null())
        }
        Some(other) => Some(other),
    };
    Ok(RestorePayload { restored })
}

impl InboundMessage {
    /// Build a `restore` message from an optional configuration.
    pub fn restore(restored: Option<&Configuration>) -> CanvasResult<Self> {
        let restored = restored.map(serde_json::to_value).transpose()?;
        Ok(Self::Restore {
            params: RestorePayload { restored },
        })
    }

    /// Wire `type` tag (`"unknown"` for unrecognized messages).
    pub fn kind(&self) -> &'static str {
        match self {
            Self::SaveThumbnail => "save_thumbnail",
            Self::ConfirmUpdate => "confirm_update",
            Self::Restore { .. } => "restore",
            Self::LoadedParamsFileAsBlob { .. } => "loaded_params_file_as_blob",
            Self::Unknown => "unknown",
        }
    }

    /// True for messages that answer a correlated request.
    pub fn is_response(&self) -> bool {
        matches!(self, Self::LoadedParamsFileAsBlob { .. })
    }

    /// Decode the JSON wire form.
    ///
    /// Messages that are not objects or have no string `type` are protocol errors; objects with
    /// an unknown `type` decode to [`InboundMessage::Unknown`].
    pub fn from_json(raw: &str) -> CanvasResult<Self> {
        let value: serde_json::Value = serde_json::from_str(raw)?;
        let has_type = value
            .as_object()
            .and_then(|o| o.get("type"))
            .is_some_and(serde_json::Value::is_string);
        if !has_type {
            return Err(CanvasError::protocol("inbound message has no string 'type'"));
        }
        Ok(serde_json::from_value(value)?)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/channel/message.rs"]
mod tests;
