//! REST client for the OMDb API.
//!
//! Wraps the two OMDb GET forms (`?s=` search and `?i=` lookup) plus
//! poster downloads using [`reqwest`].

use serde::de::DeserializeOwned;
use serde::Deserialize;

use super::error::FetchError;
use crate::state::data::{MovieDetail, SearchPage};

/// OMDb's `Response` envelope. The tag is consumed here so it never
/// shows up in [`MovieDetail::attributes`].
#[derive(Debug, Deserialize)]
#[serde(tag = "Response")]
enum Envelope<T> {
    #[serde(rename = "True")]
    Found(T),
    #[serde(rename = "False")]
    Failed {
        #[serde(rename = "Error", default)]
        error: String,
    },
}

/// HTTP client for the OMDb API.
#[derive(Debug, Clone)]
pub struct OmdbClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl OmdbClient {
    /// Create a new client.
    ///
    /// * `base_url` - e.g. `https://www.omdbapi.com/`.
    pub fn new(base_url: String, api_key: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url,
            api_key,
        }
    }

    /// Fetch one page (1-based) of search results for `query`.
    pub async fn search(&self, query: &str, page: u32) -> Result<SearchPage, FetchError> {
        let page_param = page.to_string();
        let result = self
            .get::<SearchPage>(&[("s", query), ("page", page_param.as_str())])
            .await;
        match &result {
            Ok(found) => tracing::debug!(query, page, total = found.total_results, "Search page loaded"),
            Err(error) => tracing::warn!(query, page, %error, transport = error.is_transport(), "⚠️  Search request failed"),
        }
        result
    }

    /// Look up a single movie by IMDb id.
    pub async fn lookup(&self, imdb_id: &str) -> Result<MovieDetail, FetchError> {
        let result = self.get::<MovieDetail>(&[("i", imdb_id)]).await;
        if let Err(error) = &result {
            tracing::warn!(imdb_id, %error, "⚠️  Lookup failed");
        }
        result
    }

    /// Download raw poster bytes. Posters live on a CDN, not on OMDb,
    /// so no API key is sent.
    pub async fn poster(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let response = Self::ensure_success(self.http.get(url).send().await?).await?;
        let bytes = response.bytes().await?;
        Ok(bytes.to_vec())
    }

    // ---- private helpers ----

    async fn get<T: DeserializeOwned>(&self, params: &[(&str, &str)]) -> Result<T, FetchError> {
        let response = self
            .http
            .get(&self.base_url)
            .query(&[("apikey", self.api_key.as_str())])
            .query(params)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if status.is_success() {
            return decode_envelope(&body);
        }

        // OMDb reports some failures ("Invalid API key!") as an error
        // envelope behind a non-2xx status; keep that text for the user
        match serde_json::from_str::<Envelope<serde_json::Value>>(&body) {
            Ok(Envelope::Failed { error }) if !error.is_empty() => Err(FetchError::Api(error)),
            _ => Err(FetchError::Status {
                status: status.as_u16(),
                body,
            }),
        }
    }

    /// Returns the response unchanged on a 2xx status, or a
    /// [`FetchError::Status`] with the body text on failure.
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, FetchError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }
}

/// Decode an OMDb body, turning `Response: "False"` into [`FetchError::Api`].
pub fn decode_envelope<T: DeserializeOwned>(body: &str) -> Result<T, FetchError> {
    match serde_json::from_str::<Envelope<T>>(body)? {
        Envelope::Found(value) => Ok(value),
        Envelope::Failed { error } => Err(FetchError::Api(error)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::omdb::Failure;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve exactly one canned HTTP response and hand back the base URL
    /// plus the raw request line the client sent.
    async fn serve_once(
        status_line: &'static str,
        body: &'static str,
    ) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = vec![0u8; 4096];
            let n = socket.read(&mut buf).await.unwrap();
            let request = String::from_utf8_lossy(&buf[..n]).to_string();

            let response = format!(
                "{status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();

            request.lines().next().unwrap_or_default().to_string()
        });

        (format!("http://{addr}/"), handle)
    }

    #[test]
    fn test_decode_found_search() {
        let body = r#"{"Search":[{"Title":"Batman","Year":"1989","imdbID":"tt0096895","Type":"movie","Poster":"N/A"}],"totalResults":"573","Response":"True"}"#;
        let page: SearchPage = decode_envelope(body).unwrap();
        assert_eq!(page.total_results, 573);
        assert_eq!(page.results[0].title, "Batman");
    }

    #[test]
    fn test_decode_in_band_error() {
        let body = r#"{"Response":"False","Error":"Movie not found!"}"#;
        let error = decode_envelope::<SearchPage>(body).unwrap_err();
        assert!(matches!(error, FetchError::Api(ref msg) if msg == "Movie not found!"));
        assert!(!error.is_transport());
    }

    #[test]
    fn test_decode_detail_drops_response_tag() {
        let body = r#"{"Title":"Se7en","imdbID":"tt0114369","Poster":"N/A","Director":"David Fincher","Response":"True"}"#;
        let detail: MovieDetail = decode_envelope(body).unwrap();
        assert_eq!(detail.attribute("Director"), Some("David Fincher"));
        assert!(!detail.attributes.contains_key("Response"));
    }

    #[test]
    fn test_decode_garbage_is_transport() {
        let error = decode_envelope::<SearchPage>("<html>oops</html>").unwrap_err();
        assert!(matches!(error, FetchError::Decode(_)));
        assert!(error.is_transport());
    }

    #[tokio::test]
    async fn test_search_sends_key_query_and_page() {
        let (base, server) = serve_once(
            "HTTP/1.1 200 OK",
            r#"{"Search":[],"totalResults":"0","Response":"True"}"#,
        )
        .await;

        let client = OmdbClient::new(base, "secret".into());
        let page = client.search("star wars", 2).await.unwrap();
        assert_eq!(page.total_results, 0);

        let request_line = server.await.unwrap();
        assert!(request_line.starts_with("GET /?apikey=secret&s=star+wars&page=2 "));
    }

    #[tokio::test]
    async fn test_lookup_in_band_error() {
        let (base, _server) = serve_once(
            "HTTP/1.1 200 OK",
            r#"{"Response":"False","Error":"Incorrect IMDb ID."}"#,
        )
        .await;

        let client = OmdbClient::new(base, "secret".into());
        let error = client.lookup("tt-nope").await.unwrap_err();
        assert!(matches!(error, FetchError::Api(ref msg) if msg == "Incorrect IMDb ID."));
    }

    #[tokio::test]
    async fn test_invalid_key_envelope_behind_401_is_in_band() {
        let (base, _server) = serve_once(
            "HTTP/1.1 401 Unauthorized",
            r#"{"Response":"False","Error":"Invalid API key!"}"#,
        )
        .await;

        let client = OmdbClient::new(base, "wrong".into());
        let error = client.search("batman", 1).await.unwrap_err();
        assert!(matches!(error, FetchError::Api(ref msg) if msg == "Invalid API key!"));
        assert!(!error.is_transport());
        assert_eq!(Failure::from(error).user_message(), "Invalid API key!");
    }

    #[tokio::test]
    async fn test_non_success_status_without_envelope_is_transport() {
        let (base, _server) = serve_once("HTTP/1.1 503 Service Unavailable", "upstream down").await;

        let client = OmdbClient::new(base, "secret".into());
        let error = client.search("batman", 1).await.unwrap_err();
        assert!(matches!(error, FetchError::Status { status: 503, .. }));
        assert!(error.is_transport());
    }
}
