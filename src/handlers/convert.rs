//! Currency conversion handler
//!
//! GET /convert?amount=<int>&currency=<code>
//!
//! Each request runs once, start to finish: client address, query string,
//! presence checks, validation, conversion, response. The first failing step
//! answers with its error body in the negotiated format.

use crate::handlers::responder::{error_response, write_response, OutputFormat};
use crate::handlers::AppState;
use crate::models::{ConversionRequest, ConversionResult};
use crate::utils::error::{AppError, AppResult};
use axum::{
    extract::{ConnectInfo, Query, State},
    http::{header::ACCEPT, HeaderMap, StatusCode, Uri},
    response::Response,
};
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use tracing::{debug, info};

/// Header set by proxies in front of the service
pub const X_FORWARDED_FOR: &str = "x-forwarded-for";

/// Handle currency conversion requests
pub async fn convert_currency(
    State(state): State<Arc<AppState>>,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    headers: HeaderMap,
    uri: Uri,
) -> Response {
    let accept = headers.get(ACCEPT).and_then(|value| value.to_str().ok());
    let format = OutputFormat::negotiate(accept);
    let peer = connect_info.map(|ConnectInfo(addr)| addr);

    match run_conversion(&state, peer, &headers, &uri).await {
        Ok(result) => {
            debug!("Converted {} {} into {} currencies", result.amount, result.currency, result.converted.len());
            write_response(&result, format, StatusCode::OK)
        }
        Err(err) => error_response(&err, format),
    }
}

async fn run_conversion(
    state: &AppState,
    peer: Option<SocketAddr>,
    headers: &HeaderMap,
    uri: &Uri,
) -> AppResult<ConversionResult> {
    let client = client_address(headers, peer)?;
    info!("Request came from: {} by {}", client, protocol_family(&client));

    let params = QueryParams::parse(uri)?;
    let request = params.conversion_request()?;

    state.converter.convert(&request).await
}

/// Resolve the client IP, preferring the proxy header over the peer address
pub fn client_address(headers: &HeaderMap, peer: Option<SocketAddr>) -> AppResult<IpAddr> {
    match headers.get(X_FORWARDED_FOR) {
        Some(value) if !value.is_empty() => {
            let raw = value
                .to_str()
                .map_err(|_| AppError::BadRequest("Invalid address: non-ASCII X-Forwarded-For".to_string()))?;
            raw.trim()
                .parse()
                .map_err(|_| AppError::BadRequest(format!("Invalid address: {}", raw)))
        }
        _ => peer
            .map(|addr| addr.ip())
            .ok_or_else(|| AppError::BadRequest("Invalid address: unknown peer".to_string())),
    }
}

/// "IPv4" for IPv4 and IPv4-mapped addresses, "IPv6" otherwise
pub fn protocol_family(ip: &IpAddr) -> &'static str {
    match ip {
        IpAddr::V4(_) => "IPv4",
        IpAddr::V6(v6) if v6.to_ipv4_mapped().is_some() => "IPv4",
        IpAddr::V6(_) => "IPv6",
    }
}

/// Decoded query string pairs in request order
#[derive(Debug, Clone, Default)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    /// Decode the query string of `uri`
    pub fn parse(uri: &Uri) -> AppResult<Self> {
        let raw = uri.query().unwrap_or("");
        if !has_valid_escapes(raw) {
            return Err(AppError::BadRequest(format!("malformed query string: {}", raw)));
        }

        let Query(pairs) = Query::<Vec<(String, String)>>::try_from_uri(uri)
            .map_err(|e| AppError::BadRequest(format!("malformed query string: {}", e)))?;

        Ok(Self { pairs })
    }

    /// First value for `key`; an empty first value counts as absent
    pub fn first(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
            .filter(|v| !v.is_empty())
    }

    /// Check presence of both parameters, then validate them
    pub fn conversion_request(&self) -> AppResult<ConversionRequest> {
        match (self.first("amount"), self.first("currency")) {
            (Some(amount), Some(currency)) => ConversionRequest::from_query(amount, currency),
            (None, None) => Err(AppError::MissingArguments(vec!["amount", "currency"])),
            (None, Some(_)) => Err(AppError::MissingArguments(vec!["amount"])),
            (Some(_), None) => Err(AppError::MissingArguments(vec!["currency"])),
        }
    }
}

/// Every `%` must start a two digit hex escape
fn has_valid_escapes(raw: &str) -> bool {
    let bytes = raw.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let escape = bytes.get(i + 1..i + 3);
            if !matches!(escape, Some([hi, lo]) if hi.is_ascii_hexdigit() && lo.is_ascii_hexdigit()) {
                return false;
            }
            i += 3;
        } else {
            i += 1;
        }
    }
    true
}
