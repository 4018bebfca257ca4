use tokio::io::AsyncWrite;

use crate::http::response::{default_headers, StatusCode};
use crate::http::writer::Writer;

const OK_PAGE: &str = r#"<html>
  <head>
    <title>200 OK</title>
  </head>
  <body>
    <h1>Success!</h1>
    <p>Your request was an absolute banger.</p>
  </body>
</html>"#;

const BAD_REQUEST_PAGE: &str = r#"<html>
  <head>
    <title>400 Bad Request</title>
  </head>
  <body>
    <h1>Bad Request</h1>
    <p>Your request honestly kinda sucked.</p>
  </body>
</html>"#;

const INTERNAL_ERROR_PAGE: &str = r#"<html>
  <head>
    <title>500 Internal Server Error</title>
  </head>
  <body>
    <h1>Internal Server Error</h1>
    <p>Okay, you know what? This one is on me.</p>
  </body>
</html>"#;

pub async fn ok<W>(w: &mut Writer<W>) -> anyhow::Result<()>
where
    W: AsyncWrite + Unpin,
{
    write_html(w, StatusCode::Ok, OK_PAGE).await
}

pub async fn bad_request<W>(w: &mut Writer<W>) -> anyhow::Result<()>
where
    W: AsyncWrite + Unpin,
{
    write_html(w, StatusCode::BadRequest, BAD_REQUEST_PAGE).await
}

pub async fn internal_error<W>(w: &mut Writer<W>) -> anyhow::Result<()>
where
    W: AsyncWrite + Unpin,
{
    write_html(w, StatusCode::InternalServerError, INTERNAL_ERROR_PAGE).await
}

async fn write_html<W>(w: &mut Writer<W>, status: StatusCode, page: &str) -> anyhow::Result<()>
where
    W: AsyncWrite + Unpin,
{
    let mut headers = default_headers(page.len());
    headers.overwrite("Content-Type", "text/html")?;

    w.write_status_line(status).await?;
    w.write_headers(&headers).await?;
    w.write_body(page.as_bytes()).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn bad_request_page() {
        let mut w = Writer::new(Vec::new());
        bad_request(&mut w).await.unwrap();

        let out = String::from_utf8(w.into_inner()).unwrap();
        assert!(out.starts_with("HTTP/1.1 400 Bad Request\r\n"));
        assert!(out.contains(&format!("content-length: {}\r\n", BAD_REQUEST_PAGE.len())));
        assert!(out.contains("content-type: text/html\r\n"));
        assert!(out.ends_with(BAD_REQUEST_PAGE));
    }
}
