//! Content-negotiated responses
//!
//! Serializes success and error bodies as JSON or XML depending on the
//! client's `Accept` header.

use crate::utils::error::{AppError, AppResult};
use axum::{
    http::{header::CONTENT_TYPE, StatusCode},
    response::{IntoResponse, Response},
};
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use serde::Serialize;
use serde_json::Value;
use tracing::error;

/// Root element wrapping every XML body
pub const XML_ROOT: &str = "doc";

/// Serialization format of a response body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Xml,
}

impl OutputFormat {
    /// Pick the format from the raw `Accept` header
    ///
    /// Any header mentioning `xml` selects XML; everything else, including a
    /// missing header, is JSON.
    pub fn negotiate(accept: Option<&str>) -> Self {
        match accept {
            Some(accept) if accept.contains("xml") => OutputFormat::Xml,
            _ => OutputFormat::Json,
        }
    }

    /// Content type announced for this format
    pub fn content_type(&self) -> &'static str {
        match self {
            OutputFormat::Json => "application/json",
            OutputFormat::Xml => "application/xml",
        }
    }
}

/// Serialize `body` in the requested format
pub fn render<T: Serialize>(body: &T, format: OutputFormat) -> AppResult<Vec<u8>> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_vec(body)?),
        OutputFormat::Xml => to_xml(&serde_json::to_value(body)?),
    }
}

/// Write `body` with `status`, degrading to plain text if serialization fails
pub fn write_response<T: Serialize>(body: &T, format: OutputFormat, status: StatusCode) -> Response {
    match render(body, format) {
        Ok(bytes) => (status, [(CONTENT_TYPE, format.content_type())], bytes).into_response(),
        Err(e) => {
            error!("Error in encoding: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
    }
}

/// Log `err` and answer with its error body
pub fn error_response(err: &AppError, format: OutputFormat) -> Response {
    err.log();
    write_response(&err.to_error_body(), format, err.status_code())
}

/// Map a JSON value onto indented XML under the `doc` root
pub fn to_xml(value: &Value) -> AppResult<Vec<u8>> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 1);
    write_element(&mut writer, XML_ROOT, value)?;
    Ok(writer.into_inner())
}

fn write_element(writer: &mut Writer<Vec<u8>>, tag: &str, value: &Value) -> AppResult<()> {
    match value {
        Value::Object(map) => {
            writer.write_event(Event::Start(BytesStart::new(tag)))?;
            for (key, child) in map {
                write_element(writer, key, child)?;
            }
            writer.write_event(Event::End(BytesEnd::new(tag)))?;
        }
        // repeated elements, one per item
        Value::Array(items) => {
            for item in items {
                write_element(writer, tag, item)?;
            }
        }
        Value::Null => {
            writer.write_event(Event::Empty(BytesStart::new(tag)))?;
        }
        Value::String(text) => write_text(writer, tag, text)?,
        Value::Number(number) => write_text(writer, tag, &number.to_string())?,
        Value::Bool(flag) => write_text(writer, tag, &flag.to_string())?,
    }
    Ok(())
}

fn write_text(writer: &mut Writer<Vec<u8>>, tag: &str, text: &str) -> AppResult<()> {
    writer.write_event(Event::Start(BytesStart::new(tag)))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new(tag)))?;
    Ok(())
}
