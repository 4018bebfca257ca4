use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt};
use url::Url;

use crate::http::headers::{find_crlf, HeaderError};
use crate::http::request::{ParseStatus, Request, RequestLine};

const INITIAL_BUFFER_SIZE: usize = 64;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("malformed request line: {0:?}")]
    MalformedRequestLine(String),
    #[error("invalid method: {0:?}")]
    InvalidMethod(String),
    #[error("invalid request target {0:?}")]
    InvalidTarget(String),
    #[error("unsupported HTTP version: {0:?}")]
    InvalidVersion(String),
    #[error("invalid header: {0}")]
    Header(#[from] HeaderError),
    #[error("invalid Content-Length: {0:?}")]
    InvalidContentLength(String),
    #[error("incomplete request")]
    IncompleteRequest,
    #[error("incomplete body: expected {expected} bytes, received {received}")]
    IncompleteBody { expected: usize, received: usize },
    #[error("request already parsed")]
    AlreadyParsed,
    #[error("error reading request: {0}")]
    Io(#[from] std::io::Error),
}

/// Reads exactly one request from `reader`.
///
/// Bytes are pulled in whatever sizes the reader hands out and fed to the
/// request state machine after every read. End of stream before the request
/// is complete is an error; no partially parsed request is ever returned.
pub async fn request_from_reader<R>(reader: &mut R) -> Result<Request, ParseError>
where
    R: AsyncRead + Unpin,
{
    let mut request = Request::new();
    let mut buf = ReadBuffer::with_capacity(INITIAL_BUFFER_SIZE);

    while request.status != ParseStatus::Done {
        let n = reader.read(buf.free_tail()).await?;
        if n == 0 {
            return Err(request.incomplete_error());
        }
        buf.fill(n);

        let consumed = request.parse(buf.unparsed())?;
        buf.consume(consumed);
    }

    Ok(request)
}

/// Owned byte arena holding bytes read but not yet parsed.
///
/// `data[..len]` is valid. The arena doubles when full and is compacted
/// after every parse pass.
#[derive(Debug)]
struct ReadBuffer {
    data: Vec<u8>,
    len: usize,
}

impl ReadBuffer {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            data: vec![0; capacity.max(1)],
            len: 0,
        }
    }

    fn free_tail(&mut self) -> &mut [u8] {
        if self.len == self.data.len() {
            let doubled = self.data.len() * 2;
            self.data.resize(doubled, 0);
        }
        &mut self.data[self.len..]
    }

    fn fill(&mut self, n: usize) {
        self.len += n;
    }

    fn unparsed(&self) -> &[u8] {
        &self.data[..self.len]
    }

    /// Drops `n` parsed bytes by sliding the remainder to the front.
    fn consume(&mut self, n: usize) {
        self.data.copy_within(n..self.len, 0);
        self.len -= n;
    }
}

impl Request {
    /// Feeds `data` to the state machine until it stops making progress.
    ///
    /// Returns the number of bytes consumed.
    pub(crate) fn parse(&mut self, data: &[u8]) -> Result<usize, ParseError> {
        if self.status == ParseStatus::Done {
            return Err(ParseError::AlreadyParsed);
        }

        let mut total = 0;
        while self.status != ParseStatus::Done {
            let n = self.parse_single(&data[total..])?;
            if n == 0 {
                break;
            }
            total += n;
        }
        Ok(total)
    }

    fn parse_single(&mut self, data: &[u8]) -> Result<usize, ParseError> {
        match self.status {
            ParseStatus::Initialized => {
                let Some((line, n)) = parse_request_line(data)? else {
                    tracing::trace!(buffered = data.len(), "request line incomplete");
                    return Ok(0);
                };
                self.request_line = line;
                self.status = ParseStatus::ParsingHeaders;
                Ok(n)
            }

            ParseStatus::ParsingHeaders => {
                let (n, done) = self.headers.parse(data)?;
                if done {
                    self.status = match self.content_length()? {
                        Some(content_length) if content_length > 0 => {
                            ParseStatus::ParsingBody { content_length }
                        }
                        _ => ParseStatus::Done,
                    };
                }
                Ok(n)
            }

            ParseStatus::ParsingBody { content_length } => {
                let body = self.body.get_or_insert_with(Vec::new);
                let take = (content_length - body.len()).min(data.len());
                body.extend_from_slice(&data[..take]);

                if body.len() == content_length {
                    self.status = ParseStatus::Done;
                }
                Ok(take)
            }

            ParseStatus::Done => Err(ParseError::AlreadyParsed),
        }
    }

    fn incomplete_error(&self) -> ParseError {
        match self.status {
            ParseStatus::ParsingBody { content_length } => ParseError::IncompleteBody {
                expected: content_length,
                received: self.body.as_ref().map_or(0, Vec::len),
            },
            _ => ParseError::IncompleteRequest,
        }
    }
}

/// Parses a CRLF-terminated request line from the front of `data`.
///
/// Returns `None` when no complete line is buffered yet.
fn parse_request_line(data: &[u8]) -> Result<Option<(RequestLine, usize)>, ParseError> {
    let Some(idx) = find_crlf(data) else {
        return Ok(None);
    };
    let line = std::str::from_utf8(&data[..idx])
        .map_err(|_| ParseError::MalformedRequestLine(String::from_utf8_lossy(&data[..idx]).into_owned()))?;

    let parts: Vec<&str> = line.split(' ').collect();
    let [method, target, version] = parts[..] else {
        return Err(ParseError::MalformedRequestLine(line.to_string()));
    };

    if method.is_empty() || !method.bytes().all(|b| b.is_ascii_uppercase()) {
        return Err(ParseError::InvalidMethod(method.to_string()));
    }

    validate_target(target)?;

    let version = match version.split('/').collect::<Vec<_>>()[..] {
        ["HTTP", "1.1"] => "1.1",
        _ => return Err(ParseError::InvalidVersion(version.to_string())),
    };

    let request_line = RequestLine {
        method: method.to_string(),
        target: target.to_string(),
        version: version.to_string(),
    };
    Ok(Some((request_line, idx + 2)))
}

/// Accepts origin-form (`/path?query#frag`), absolute-form and `*` targets.
fn validate_target(target: &str) -> Result<(), ParseError> {
    let invalid = || ParseError::InvalidTarget(target.to_string());

    if target == "*" {
        return Ok(());
    }
    if target.is_empty() || target.bytes().any(|b| b.is_ascii_control()) || !valid_escapes(target) {
        return Err(invalid());
    }

    if target.starts_with('/') {
        let base = Url::parse("http://localhost/").map_err(|_| invalid())?;
        base.join(target).map_err(|_| invalid())?;
    } else {
        Url::parse(target).map_err(|_| invalid())?;
    }
    Ok(())
}

fn valid_escapes(target: &str) -> bool {
    let bytes = target.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let pair = bytes.get(i + 1..i + 3);
            if !pair.is_some_and(|p| p.iter().all(u8::is_ascii_hexdigit)) {
                return false;
            }
            i += 3;
        } else {
            i += 1;
        }
    }
    true
}
