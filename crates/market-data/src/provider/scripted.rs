//! Scripted [`JsonFetcher`] for tests.
//!
//! Responses are matched by URL substring in registration order; the first
//! route whose needle appears in the URL and still has queued responses wins.
//! Every requested URL is recorded.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use crate::errors::MarketDataError;
use crate::provider::JsonFetcher;

type Scripted = Result<Value, String>;

struct Route {
    needle: String,
    responses: VecDeque<Scripted>,
    repeat_last: bool,
}

#[derive(Default)]
pub struct ScriptedFetcher {
    routes: Mutex<Vec<Route>>,
    requests: Mutex<Vec<String>>,
}

impl ScriptedFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue responses for URLs containing `needle`, consumed in order.
    pub fn route(self, needle: &str, responses: Vec<Value>) -> Self {
        self.push(needle, responses.into_iter().map(Ok).collect(), false)
    }

    /// Answer every URL containing `needle` with the same body.
    pub fn always(self, needle: &str, response: Value) -> Self {
        self.push(needle, vec![Ok(response)], true)
    }

    /// Fail URLs containing `needle` with a transport error.
    pub fn fail(self, needle: &str, message: &str) -> Self {
        self.push(needle, vec![Err(message.to_string())], true)
    }

    fn push(self, needle: &str, responses: Vec<Scripted>, repeat_last: bool) -> Self {
        self.routes
            .lock()
            .unwrap()
            .push(Route {
                needle: needle.to_string(),
                responses: responses.into(),
                repeat_last,
            });
        self
    }

    /// URLs requested so far, in order.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    /// Number of requested URLs containing `needle`.
    pub fn count(&self, needle: &str) -> usize {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|url| url.contains(needle))
            .count()
    }
}

#[async_trait]
impl JsonFetcher for ScriptedFetcher {
    async fn fetch_json(
        &self,
        url: &str,
        _headers: &[(&'static str, &'static str)],
    ) -> Result<Value, MarketDataError> {
        self.requests.lock().unwrap().push(url.to_string());

        let mut routes = self.routes.lock().unwrap();
        for route in routes.iter_mut() {
            if !url.contains(&route.needle) || route.responses.is_empty() {
                continue;
            }
            let next = if route.repeat_last && route.responses.len() == 1 {
                route.responses.front().cloned()
            } else {
                route.responses.pop_front()
            };
            if let Some(scripted) = next {
                return scripted.map_err(|message| MarketDataError::UpstreamTransport { message });
            }
        }

        Err(MarketDataError::UpstreamTransport {
            message: format!("no scripted response for {}", url),
        })
    }
}
