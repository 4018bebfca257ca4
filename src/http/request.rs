use crate::http::headers::Headers;
use crate::http::parser::ParseError;

/// The first line of an HTTP request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestLine {
    /// Uppercase method token, e.g. `GET`
    pub method: String,
    /// Request target exactly as sent, e.g. `/search?q=rust`
    pub target: String,
    /// Protocol version without the `HTTP/` prefix; always `1.1`
    pub version: String,
}

/// Progress of a [`Request`] through the parser.
///
/// Moves strictly forward; once `Done` the request is never touched again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ParseStatus {
    Initialized,
    ParsingHeaders,
    ParsingBody { content_length: usize },
    Done,
}

/// A fully parsed HTTP request.
///
/// Values of this type are only handed out by
/// [`request_from_reader`](crate::http::parser::request_from_reader) once
/// parsing has completed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub request_line: RequestLine,
    pub headers: Headers,
    /// Present only when a positive `Content-Length` was declared.
    pub body: Option<Vec<u8>>,
    pub(crate) status: ParseStatus,
}

impl Request {
    pub(crate) fn new() -> Self {
        Self {
            request_line: RequestLine {
                method: String::new(),
                target: String::new(),
                version: String::new(),
            },
            headers: Headers::new(),
            body: None,
            status: ParseStatus::Initialized,
        }
    }

    pub fn method(&self) -> &str {
        &self.request_line.method
    }

    pub fn target(&self) -> &str {
        &self.request_line.target
    }

    pub fn version(&self) -> &str {
        &self.request_line.version
    }

    /// Case-insensitive header lookup.
    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers.get(key)
    }

    /// The declared `Content-Length`, if any.
    ///
    /// A value that is not a non-negative integer is a parse error.
    pub fn content_length(&self) -> Result<Option<usize>, ParseError> {
        self.header("Content-Length")
            .map(|v| {
                let invalid = || ParseError::InvalidContentLength(v.to_string());
                // usize::from_str alone would also take a leading '+'
                if v.is_empty() || !v.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(invalid());
                }
                v.parse::<usize>().map_err(|_| invalid())
            })
            .transpose()
    }

    /// Serializes the request back to HTTP/1.1 wire format.
    pub fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::new();

        buf.extend_from_slice(
            format!(
                "{} {} HTTP/{}\r\n",
                self.request_line.method, self.request_line.target, self.request_line.version
            )
            .as_bytes(),
        );
        self.headers.encode_into(&mut buf);

        if let Some(body) = &self.body {
            buf.extend_from_slice(body);
        }

        buf
    }
}
