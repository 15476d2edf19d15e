//! Response body parsing

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::response::{FetchResponse, RawResponse, Response, ResponseData};

/// Reader used for the response body
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ResponseType {
    /// JSON document
    #[default]
    Json,
    /// Binary body with media type
    Blob,
    /// Form-urlencoded fields
    FormData,
    /// Raw bytes
    ArrayBuffer,
    /// Text; also used for any unrecognized name
    Text,
}

impl ResponseType {
    /// Name as used in configuration
    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseType::Json => "json",
            ResponseType::Blob => "blob",
            ResponseType::FormData => "formData",
            ResponseType::ArrayBuffer => "arrayBuffer",
            ResponseType::Text => "text",
        }
    }
}

impl fmt::Display for ResponseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for ResponseType {
    fn from(name: &str) -> Self {
        match name {
            "json" => ResponseType::Json,
            "blob" => ResponseType::Blob,
            "formData" => ResponseType::FormData,
            "arrayBuffer" => ResponseType::ArrayBuffer,
            _ => ResponseType::Text,
        }
    }
}

impl From<String> for ResponseType {
    fn from(name: String) -> Self {
        ResponseType::from(name.as_str())
    }
}

impl From<ResponseType> for String {
    fn from(response_type: ResponseType) -> Self {
        response_type.as_str().to_string()
    }
}

impl FromStr for ResponseType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(ResponseType::from(s))
    }
}

/// Read the body of `response` with the reader matching `response_type`
///
/// Reader failures are returned as they are; nothing is caught here.
pub async fn parse_data(
    response: RawResponse,
    response_type: ResponseType,
) -> Response<FetchResponse> {
    let head = response.head().clone();
    let data = match response_type {
        ResponseType::Json => ResponseData::Json(response.json().await?),
        ResponseType::Blob => ResponseData::Blob(response.blob().await?),
        ResponseType::FormData => ResponseData::FormData(response.form_data().await?),
        ResponseType::ArrayBuffer => ResponseData::ArrayBuffer(response.array_buffer().await?),
        ResponseType::Text => ResponseData::Text(response.text().await?),
    };

    Ok(FetchResponse::new(head, data))
}
