// Groq API HTTP client.
// Sends one chat completion request per call and normalizes the outcome.

use std::future::Future;

use reqwest::{
    Client, Response, StatusCode,
    header::{ACCEPT, HeaderMap, HeaderValue, USER_AGENT},
};
use tracing::debug;

use crate::error::ClientError;

use super::types::{ChatMessage, ChatRequest, ChatResponse};

pub const GROQ_API_BASE: &str = "https://api.groq.com/openai/v1";
pub const DEFAULT_MODEL: &str = "llama3-8b-8192";

/// A service that turns a single question into answer text.
///
/// Implementations make exactly one attempt per call; retrying is the
/// caller's business.
pub trait CompletionClient {
    fn complete(
        &self,
        api_key: &str,
        question: &str,
    ) -> impl Future<Output = Result<String, ClientError>> + Send;
}

/// Groq chat completions client.
///
/// No request timeout is configured, so reqwest's default applies: no
/// overall deadline, connects bounded only by the OS.
pub struct GroqClient {
    client: Client,
    base_url: String,
    model: String,
}

impl GroqClient {
    /// Create a client for the given API base URL and model.
    pub fn new(base_url: &str, model: &str) -> Result<Self, ClientError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(USER_AGENT, HeaderValue::from_static("exam-coach"));

        let client = Client::builder().default_headers(headers).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
        })
    }

    /// Model identifier sent with every request.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Check response status and convert errors.
    async fn check_response(response: Response) -> Result<Response, ClientError> {
        match response.status() {
            status if status.is_success() => Ok(response),
            status @ (StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) => {
                Err(ClientError::Unauthorized {
                    status,
                    body: response.text().await.unwrap_or_default(),
                })
            }
            status => Err(ClientError::Status {
                status,
                body: response.text().await.unwrap_or_default(),
            }),
        }
    }
}

impl CompletionClient for GroqClient {
    async fn complete(&self, api_key: &str, question: &str) -> Result<String, ClientError> {
        let url = format!("{}/chat/completions", self.base_url);
        let request = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage::user(question)],
        };

        debug!(model = %self.model, "sending chat completion request");
        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await?;

        let response = Self::check_response(response).await?;
        let body = response.text().await?;
        parse_completion(&body)
    }
}

/// Extract the first choice's text from a chat completion body.
pub fn parse_completion(body: &str) -> Result<String, ClientError> {
    let response: ChatResponse = serde_json::from_str(body)?;
    response
        .into_first_content()
        .ok_or(ClientError::EmptyResponse)
}

#[cfg(test)]
mod tests {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};
    use tokio::task::JoinHandle;

    use super::*;

    /// Read one full HTTP/1.1 request (headers plus Content-Length body).
    async fn read_request(stream: &mut TcpStream) -> String {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 1024];
        loop {
            let n = stream.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
            if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                let head = String::from_utf8_lossy(&buf[..pos]).to_lowercase();
                let body_len = head
                    .lines()
                    .find_map(|line| line.strip_prefix("content-length:"))
                    .and_then(|v| v.trim().parse::<usize>().ok())
                    .unwrap_or(0);
                if buf.len() >= pos + 4 + body_len {
                    break;
                }
            }
        }
        String::from_utf8_lossy(&buf).into_owned()
    }

    /// Serve each canned `(status line, body)` to one connection, in order.
    /// Resolves to the raw requests received.
    async fn serve(
        responses: Vec<(&'static str, &'static str)>,
    ) -> (String, JoinHandle<Vec<String>>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}/v1", listener.local_addr().unwrap());

        let handle = tokio::spawn(async move {
            let mut requests = Vec::new();
            for (status, body) in responses {
                let (mut stream, _) = listener.accept().await.unwrap();
                requests.push(read_request(&mut stream).await);
                let reply = format!(
                    "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    body.len(),
                    body
                );
                stream.write_all(reply.as_bytes()).await.unwrap();
                stream.shutdown().await.unwrap();
            }
            requests
        });

        (base_url, handle)
    }

    #[tokio::test]
    async fn test_status_mapping() {
        let (base_url, server) = serve(vec![
            ("401 Unauthorized", r#"{"error":{"message":"Invalid API Key"}}"#),
            ("403 Forbidden", r#"{"error":{"message":"Organization restricted"}}"#),
            ("500 Internal Server Error", "oops"),
            (
                "200 OK",
                r#"{"choices":[{"message":{"role":"assistant","content":" 4 "}}]}"#,
            ),
        ])
        .await;
        let client = GroqClient::new(&base_url, DEFAULT_MODEL).unwrap();

        match client.complete("key1", "What is 2+2?").await {
            Err(ClientError::Unauthorized { status, body }) => {
                assert_eq!(status, StatusCode::UNAUTHORIZED);
                assert!(body.contains("Invalid API Key"));
            }
            other => panic!("expected Unauthorized, got {:?}", other),
        }

        match client.complete("key1", "What is 2+2?").await {
            Err(ClientError::Unauthorized { status, body }) => {
                assert_eq!(status, StatusCode::FORBIDDEN);
                assert!(body.contains("Organization restricted"));
            }
            other => panic!("expected Unauthorized, got {:?}", other),
        }

        match client.complete("key1", "What is 2+2?").await {
            Err(ClientError::Status { status, body }) => {
                assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
                assert_eq!(body, "oops");
            }
            other => panic!("expected Status, got {:?}", other),
        }

        // Content comes back verbatim
        assert_eq!(
            client.complete("key1", "What is 2+2?").await.unwrap(),
            " 4 "
        );

        let requests = server.await.unwrap();
        assert_eq!(requests.len(), 4);
        let first = requests[0].to_lowercase();
        assert!(first.starts_with("post /v1/chat/completions "));
        assert!(first.contains("authorization: bearer key1"));
        assert!(requests[0].contains(r#""content":"What is 2+2?""#));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_transport_error() {
        let client = GroqClient::new("http://127.0.0.1:1/v1", DEFAULT_MODEL).unwrap();

        assert!(matches!(
            client.complete("key1", "q").await,
            Err(ClientError::Transport(_))
        ));
    }

    #[test]
    fn test_parse_first_choice() {
        let body = r#"{
            "id": "chatcmpl-1",
            "model": "llama3-8b-8192",
            "choices": [
                {"index": 0, "message": {"role": "assistant", "content": "  4\n"}, "finish_reason": "stop"},
                {"index": 1, "message": {"role": "assistant", "content": "four"}, "finish_reason": "stop"}
            ]
        }"#;

        // Returned verbatim, no trimming
        assert_eq!(parse_completion(body).unwrap(), "  4\n");
    }

    #[test]
    fn test_parse_empty_choices() {
        let body = r#"{"id": "chatcmpl-2", "choices": []}"#;
        assert!(matches!(
            parse_completion(body),
            Err(ClientError::EmptyResponse)
        ));
    }

    #[test]
    fn test_parse_missing_choices() {
        assert!(matches!(
            parse_completion("{}"),
            Err(ClientError::EmptyResponse)
        ));
    }

    #[test]
    fn test_parse_null_content() {
        let body = r#"{"choices": [{"message": {"role": "assistant", "content": null}}]}"#;
        assert!(matches!(
            parse_completion(body),
            Err(ClientError::EmptyResponse)
        ));
    }

    #[test]
    fn test_parse_malformed() {
        assert!(matches!(
            parse_completion("<html>Bad Gateway</html>"),
            Err(ClientError::Malformed(_))
        ));
    }

    #[test]
    fn test_request_shape() {
        let request = ChatRequest {
            model: DEFAULT_MODEL,
            messages: vec![ChatMessage::user("What is 2+2?")],
        };
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["model"], "llama3-8b-8192");
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["messages"][0]["content"], "What is 2+2?");
        assert_eq!(json["messages"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let client = GroqClient::new("https://example.test/v1/", DEFAULT_MODEL).unwrap();
        assert_eq!(client.base_url, "https://example.test/v1");
        assert_eq!(client.model(), DEFAULT_MODEL);
    }
}
