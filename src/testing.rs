//! Scripted doubles shared by the async test suites.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::driver::AuthorizationDriver;
use crate::transport::{HttpRequest, HttpResponse, HttpTransport};
use crate::{Error, Result};

/// Transport replaying queued responses and recording every request.
/// Unscripted calls answer `200 {}`.
pub(crate) struct MockTransport {
    responses: Mutex<VecDeque<Result<HttpResponse>>>,
    seen: Mutex<Vec<HttpRequest>>,
}

impl MockTransport {
    pub fn new() -> Self {
        MockTransport {
            responses: Mutex::new(VecDeque::new()),
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn push_ok(&self, status: u16, body: &str) {
        self.responses.lock().unwrap().push_back(Ok(HttpResponse {
            status,
            body: body.as_bytes().to_vec(),
        }));
    }

    pub fn push_err(&self, message: &str) {
        self.responses
            .lock()
            .unwrap()
            .push_back(Err(Error::Transport(message.to_string())));
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse> {
        self.seen.lock().unwrap().push(request);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                Ok(HttpResponse {
                    status: 200,
                    body: b"{}".to_vec(),
                })
            })
    }
}

/// Driver that records the authorization URL and immediately approves or
/// declines.
pub(crate) struct ScriptedDriver {
    callback: String,
    decline: bool,
    seen: Mutex<Vec<String>>,
}

impl ScriptedDriver {
    pub fn approving(callback: &str) -> Self {
        ScriptedDriver {
            callback: callback.to_string(),
            decline: false,
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn declining(callback: &str) -> Self {
        ScriptedDriver {
            callback: callback.to_string(),
            decline: true,
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn seen(&self) -> Vec<String> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl AuthorizationDriver for ScriptedDriver {
    fn callback_url(&self) -> &str {
        &self.callback
    }

    async fn authorize(&self, authorize_url: &str) -> Result<()> {
        self.seen.lock().unwrap().push(authorize_url.to_string());
        if self.decline {
            Err(Error::Transport("user declined authorization".to_string()))
        } else {
            Ok(())
        }
    }
}
