//! Requests to the question service.

use gloo_net::http::Request;

use crate::error::FetchError;
use crate::question::{parse_reply, Question};

/// The status and raw body of a completed request
#[derive(Clone, Debug)]
pub struct RawReply {
    pub status: u16,
    pub body: String,
}

impl RawReply {
    pub fn into_question(self) -> Result<Question, FetchError> {
        parse_reply(self.status, &self.body)
    }
}

fn transport(e: gloo_net::Error) -> FetchError {
    FetchError::Transport(e.to_string())
}

/// GET `url` and read the whole body as text, whatever the status
pub async fn get_text(url: &str) -> Result<RawReply, FetchError> {
    let resp = Request::get(url)
        .header("Accept", "application/json")
        .send()
        .await
        .map_err(transport)?;
    let status = resp.status();
    let body = resp.text().await.map_err(transport)?;
    Ok(RawReply { status, body })
}

/// Ask the question service for the next round
pub async fn next_question(endpoint: String) -> Result<Question, FetchError> {
    debug!("Fetching next question from {}", endpoint);
    let reply = get_text(&endpoint).await?;
    trace!("Reply {}: {}", reply.status, reply.body);
    reply.into_question()
}
