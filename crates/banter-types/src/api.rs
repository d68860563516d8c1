use serde::{Deserialize, Serialize};

// -- Auth --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub username: String,
}

// -- Messages --

/// Inline image attachment: a base64 payload plus a file-extension tag
/// (e.g. "png"). Decoded and stored externally; only the resulting URL
/// ends up on the message.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ImageData {
    pub data: String,
    #[serde(rename = "type")]
    pub kind: String,
}

/// A post declares its author in the payload; the server rejects it
/// unless the declared author matches the session identity.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewMessageRequest {
    pub username: String,
    pub text: String,
    #[serde(default)]
    pub image_data: Option<ImageData>,
}
