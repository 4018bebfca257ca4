use std::fmt;

use crate::http::headers::Headers;

/// HTTP status codes the server knows a reason phrase for.
///
/// Any other code is carried through unchanged as `Other` and written with
/// an empty reason phrase, e.g. when relaying an upstream status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    /// 200 OK
    Ok,
    /// 400 Bad Request
    BadRequest,
    /// 404 Not Found
    NotFound,
    /// 500 Internal Server Error
    InternalServerError,
    /// 502 Bad Gateway
    BadGateway,
    Other(u16),
}

impl StatusCode {
    /// Returns the numeric HTTP status code.
    ///
    /// # Example
    ///
    /// ```
    /// # use tcphttp::http::response::StatusCode;
    /// assert_eq!(StatusCode::Ok.as_u16(), 200);
    /// assert_eq!(StatusCode::Other(418).as_u16(), 418);
    /// ```
    pub fn as_u16(&self) -> u16 {
        match self {
            StatusCode::Ok => 200,
            StatusCode::BadRequest => 400,
            StatusCode::NotFound => 404,
            StatusCode::InternalServerError => 500,
            StatusCode::BadGateway => 502,
            StatusCode::Other(code) => *code,
        }
    }

    /// Returns the standard reason phrase, or `""` for unmapped codes.
    ///
    /// # Example
    ///
    /// ```
    /// # use tcphttp::http::response::StatusCode;
    /// assert_eq!(StatusCode::BadRequest.reason_phrase(), "Bad Request");
    /// assert_eq!(StatusCode::Other(299).reason_phrase(), "");
    /// ```
    pub fn reason_phrase(&self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",
            StatusCode::BadRequest => "Bad Request",
            StatusCode::NotFound => "Not Found",
            StatusCode::InternalServerError => "Internal Server Error",
            StatusCode::BadGateway => "Bad Gateway",
            StatusCode::Other(_) => "",
        }
    }
}

impl From<u16> for StatusCode {
    fn from(code: u16) -> Self {
        match code {
            200 => StatusCode::Ok,
            400 => StatusCode::BadRequest,
            404 => StatusCode::NotFound,
            500 => StatusCode::InternalServerError,
            502 => StatusCode::BadGateway,
            other => StatusCode::Other(other),
        }
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.as_u16(), self.reason_phrase())
    }
}

/// Headers every fixed-length response starts from.
///
/// Handlers overwrite `Content-Type` as needed, or drop `Content-Length`
/// when switching to chunked framing.
pub fn default_headers(content_len: usize) -> Headers {
    let mut headers = Headers::new();
    headers.insert_static("Content-Length", content_len.to_string());
    headers.insert_static("Connection", "close".to_string());
    headers.insert_static("Content-Type", "text/plain".to_string());
    headers
}
