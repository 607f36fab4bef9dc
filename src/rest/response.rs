use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::detail::Detail;
use super::pagination::PaginationParams;

/// JSON body returned by every endpoint. Absent members are omitted on the wire.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    /// Correlation id, never a human readable message
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
}

/// Source of correlation ids. Must be safe to call from concurrent requests.
pub trait IdGenerator: Send + Sync {
    fn generate(&self) -> String;
}

/// Random v4 UUIDs
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn generate(&self) -> String {
        Uuid::new_v4().to_string()
    }
}

/// A built response together with the correlation id it was issued under
#[derive(Debug)]
pub struct Reply {
    status: StatusCode,
    envelope: Envelope,
    correlation_id: Option<String>,
}

impl Reply {
    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn envelope(&self) -> &Envelope {
        &self.envelope
    }

    /// Id to quote in server-side logs for this response.
    ///
    /// Data responses get a fresh id that is not written to the body; error
    /// responses carry the same id in `error`; 2xx plain messages have none.
    pub fn correlation_id(&self) -> Option<&str> {
        self.correlation_id.as_deref()
    }
}

impl IntoResponse for Reply {
    fn into_response(self) -> Response {
        (self.status, Json(self.envelope)).into_response()
    }
}

/// Builds envelopes. Cheap to clone; the only shared piece is the id generator.
#[derive(Clone)]
pub struct Responder {
    ids: Arc<dyn IdGenerator>,
}

impl Default for Responder {
    fn default() -> Self {
        Self::new(Arc::new(UuidGenerator))
    }
}

impl fmt::Debug for Responder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Responder").finish_non_exhaustive()
    }
}

impl Responder {
    pub fn new(ids: Arc<dyn IdGenerator>) -> Self {
        Self { ids }
    }

    /// `{result, message}` with the given status.
    ///
    /// At most one message is honoured; extras are logged and dropped. Without
    /// a message the status reason phrase is used.
    pub fn data<T: Serialize>(&self, status: StatusCode, payload: T, messages: &[&str]) -> Reply {
        let message = pick_message(status, messages);

        let result = match serde_json::to_value(payload) {
            Ok(Value::Null) => None,
            Ok(value) => Some(value),
            Err(e) => {
                tracing::error!("Failed to serialize response data: {}", e);
                return self.message(StatusCode::INTERNAL_SERVER_ERROR, &[]);
            }
        };

        Reply {
            status,
            envelope: Envelope {
                result,
                message: Some(message),
                ..Default::default()
            },
            correlation_id: Some(self.ids.generate()),
        }
    }

    /// `{message}` only. Statuses outside 200..=299 also get a fresh
    /// correlation id in `error`.
    pub fn message(&self, status: StatusCode, messages: &[&str]) -> Reply {
        let message = pick_message(status, messages);
        let failed = !status.is_success();

        if failed && !messages.is_empty() {
            tracing::debug!(status = status.as_u16(), "{}", message);
        }

        let error = failed.then(|| self.ids.generate());

        Reply {
            status,
            envelope: Envelope {
                error: error.clone(),
                message: Some(message),
                ..Default::default()
            },
            correlation_id: error,
        }
    }

    /// Full error envelope: correlation id, message and whatever `detail`
    /// resolves to. Shapes that resolve to nothing leave `detail` out.
    pub fn error(&self, status: StatusCode, detail: impl Into<Detail>, messages: &[&str]) -> Reply {
        let message = pick_message(status, messages);
        let correlation_id = self.ids.generate();

        let envelope = Envelope {
            error: Some(correlation_id.clone()),
            message: Some(message),
            detail: detail.into().into_map(),
            ..Default::default()
        };

        tracing::debug!(status = status.as_u16(), ?envelope, "error response");

        Reply {
            status,
            envelope,
            correlation_id: Some(correlation_id),
        }
    }

    /// Data response whose result is a `PaginationResult`
    pub fn pagination<T: Serialize>(&self, status: StatusCode, params: PaginationParams<T>) -> Reply {
        self.data(status, params.into_result(), &[])
    }
}

fn pick_message(status: StatusCode, messages: &[&str]) -> String {
    if messages.len() > 1 {
        tracing::warn!(
            count = messages.len(),
            "response cannot contain more than one message, proceeding with first message only"
        );
    }

    match messages.first() {
        Some(message) => (*message).to_string(),
        None => status.canonical_reason().unwrap_or_default().to_string(),
    }
}

/// Unwraps the `result` member of an envelope body. Missing `result` is `null`.
pub fn get_data(body: &[u8]) -> Result<Value, serde_json::Error> {
    let mut envelope: serde_json::Map<String, Value> = serde_json::from_slice(body)?;
    Ok(envelope.remove("result").unwrap_or(Value::Null))
}
