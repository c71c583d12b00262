//! Lazy paginated listings with optional bounded prefetch.
//!
//! [`RecordStream`] walks a listing one record at a time, fetching
//! pages on demand. With `parallelism = 1` (the default) pages are
//! fetched strictly one after another by following `next` links.
//!
//! With `parallelism > 1` the stream overlaps network latency: Peering
//! Manager's `next` links carry `limit`/`offset` parameters, so after
//! the first page the remaining page URLs are derived from the
//! envelope's `count` and fetched by up to `parallelism` concurrent
//! tasks. Results are buffered and released strictly in offset order,
//! so the consumer observes exactly the server-declared order regardless
//! of parallelism. When the `next` link carries an opaque cursor
//! instead, the stream falls back to sequential following, which
//! yields the same order.
//!
//! Failures are fail-fast: the first error in sequence order is
//! returned at the position where its page's items would have appeared,
//! every outstanding fetch is cancelled, and items already yielded stay
//! valid. Dropping the stream aborts all in-flight work.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use reqwest::Url;
use serde_json::Value;
use tokio::task::JoinHandle;

use crate::clients::{Page, RequestExecutor};
use crate::error::{ContentError, Error, RequestError};
use crate::rest::record::{EndpointContext, Record};
use crate::rest::schema::Schema;

/// A lazy, forward-only sequence of records backed by a paginated
/// listing.
///
/// Obtained from [`crate::Endpoint::all`] or [`crate::Endpoint::filter`].
/// Nothing is fetched until the first [`RecordStream::try_next`] call;
/// recreating the stream restarts the listing from the first page.
///
/// # Example
///
/// ```rust,ignore
/// let mut sessions = api
///     .endpoint("internet-exchange-peering-sessions")?
///     .all()
///     .with_parallelism(4);
///
/// while let Some(session) = sessions.try_next().await? {
///     println!("{session}");
/// }
/// ```
#[derive(Debug)]
pub struct RecordStream {
    ctx: EndpointContext,
    schema: Arc<Schema>,
    parallelism: usize,
    /// Items from received pages, awaiting hydration, in server order.
    buffer: VecDeque<Value>,
    state: StreamState,
}

#[derive(Debug)]
enum StreamState {
    /// First page not yet requested.
    Start {
        url: String,
        query: Option<HashMap<String, String>>,
    },
    /// Following `next` links one page at a time.
    Sequential { next: Option<String> },
    /// Remaining pages pre-planned and fetched concurrently.
    Prefetching(Prefetcher),
    /// Exhausted, or stopped after delivering an error.
    Done,
}

impl RecordStream {
    pub(crate) fn new(
        ctx: EndpointContext,
        schema: Arc<Schema>,
        url: String,
        query: Option<HashMap<String, String>>,
        parallelism: usize,
    ) -> Self {
        Self {
            ctx,
            schema,
            parallelism: parallelism.max(1),
            buffer: VecDeque::new(),
            state: StreamState::Start { url, query },
        }
    }

    /// Overrides the configured page-fetch parallelism for this stream.
    ///
    /// Has no effect once iteration has started. Values below 1 are
    /// clamped to 1.
    #[must_use]
    pub fn with_parallelism(mut self, parallelism: usize) -> Self {
        self.parallelism = parallelism.max(1);
        self
    }

    /// Yields the next record, fetching further pages as needed.
    ///
    /// Returns `Ok(None)` once the listing is exhausted. After an error
    /// has been returned the stream is finished and subsequent calls
    /// return `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Propagates the executor's request/content errors from page
    /// fetches and hydration failures for malformed items, each at the
    /// position in the sequence where the failing data would have
    /// appeared.
    pub async fn try_next(&mut self) -> Result<Option<Record>, Error> {
        loop {
            if let Some(item) = self.buffer.pop_front() {
                return self.hydrate_item(item).map(Some);
            }

            match std::mem::replace(&mut self.state, StreamState::Done) {
                StreamState::Start { url, query } => {
                    let page = self.ctx.executor.fetch_page(&url, query.as_ref()).await?;
                    self.state = self.plan_after_first_page(&page);
                    self.buffer.extend(page.items);
                }
                StreamState::Sequential { next } => match next {
                    None => return Ok(None),
                    Some(url) => {
                        let page = self.ctx.executor.fetch_page(&url, None).await?;
                        self.state = StreamState::Sequential { next: page.next };
                        self.buffer.extend(page.items);
                    }
                },
                StreamState::Prefetching(mut prefetcher) => {
                    match prefetcher.next_page().await? {
                        None => return Ok(None),
                        Some(page) => {
                            self.state = StreamState::Prefetching(prefetcher);
                            self.buffer.extend(page.items);
                        }
                    }
                }
                StreamState::Done => return Ok(None),
            }
        }
    }

    /// Decides how the remaining pages will be fetched, based on what
    /// the first page revealed.
    fn plan_after_first_page(&self, page: &Page) -> StreamState {
        let Some(next) = &page.next else {
            return StreamState::Sequential { next: None };
        };

        if self.parallelism > 1 {
            if let Some(count) = page.count {
                if let Some(urls) = plan_offset_urls(next, count) {
                    tracing::debug!(
                        pages = urls.len(),
                        parallelism = self.parallelism,
                        "prefetching remaining pages"
                    );
                    return StreamState::Prefetching(Prefetcher::new(
                        Arc::clone(&self.ctx.executor),
                        urls,
                        self.parallelism,
                    ));
                }
            }
            // Without a count and offset-based links, overlap is
            // impossible without guessing URLs.
            tracing::warn!(
                parallelism = self.parallelism,
                "remaining pages cannot be planned, fetching sequentially"
            );
        }

        StreamState::Sequential {
            next: Some(next.clone()),
        }
    }

    fn hydrate_item(&mut self, item: Value) -> Result<Record, Error> {
        let Value::Object(raw) = item else {
            self.state = StreamState::Done;
            self.buffer.clear();
            return Err(ContentError::NotAnObject {
                found: crate::clients::json_type_name(&item),
            }
            .into());
        };
        Ok(Record::hydrate(raw, &self.schema, self.ctx.clone())?)
    }
}

/// Bounded in-order page prefetcher.
///
/// Keeps up to `parallelism` page fetches in flight as spawned tasks.
/// Pages are handed out strictly in the order their URLs were planned;
/// a fetch error cancels everything still outstanding.
#[derive(Debug)]
struct Prefetcher {
    executor: Arc<RequestExecutor>,
    /// Fetches in flight, in page order.
    in_flight: VecDeque<JoinHandle<Result<Page, Error>>>,
    /// Page URLs not yet spawned, in page order.
    queued: VecDeque<String>,
    parallelism: usize,
}

impl Prefetcher {
    fn new(executor: Arc<RequestExecutor>, urls: Vec<String>, parallelism: usize) -> Self {
        let mut prefetcher = Self {
            executor,
            in_flight: VecDeque::new(),
            queued: urls.into(),
            parallelism,
        };
        prefetcher.fill();
        prefetcher
    }

    /// Tops the in-flight window back up to `parallelism`.
    fn fill(&mut self) {
        while self.in_flight.len() < self.parallelism {
            let Some(url) = self.queued.pop_front() else {
                break;
            };
            let executor = Arc::clone(&self.executor);
            self.in_flight
                .push_back(tokio::spawn(async move {
                    executor.fetch_page(&url, None).await
                }));
        }
    }

    /// Waits for the next page in order.
    ///
    /// On error, cancels all outstanding and queued fetches before
    /// returning it.
    async fn next_page(&mut self) -> Result<Option<Page>, Error> {
        let Some(handle) = self.in_flight.pop_front() else {
            return Ok(None);
        };

        // fetch_page returns its failures as values; a JoinError means
        // the task itself died (panic or external abort).
        let result = match handle.await {
            Ok(result) => result,
            Err(join_err) => {
                self.cancel();
                return Err(RequestError::from(join_err).into());
            }
        };
        match result {
            Ok(page) => {
                self.fill();
                Ok(Some(page))
            }
            Err(err) => {
                self.cancel();
                Err(err)
            }
        }
    }

    fn cancel(&mut self) {
        for handle in self.in_flight.drain(..) {
            handle.abort();
        }
        self.queued.clear();
    }
}

impl Drop for Prefetcher {
    /// Dropping the stream mid-iteration must not leak background
    /// fetches.
    fn drop(&mut self) {
        for handle in &self.in_flight {
            handle.abort();
        }
    }
}

/// Derives the URLs of all pages after the first from the first `next`
/// link and the envelope `count`.
///
/// Returns `None` when the link does not carry `limit`/`offset`
/// parameters (opaque cursor), in which case the caller falls back to
/// sequential following.
fn plan_offset_urls(next: &str, count: u64) -> Option<Vec<String>> {
    let template = Url::parse(next).ok()?;

    let mut limit: Option<u64> = None;
    let mut first_offset: Option<u64> = None;
    for (key, value) in template.query_pairs() {
        match key.as_ref() {
            "limit" => limit = value.parse().ok(),
            "offset" => first_offset = value.parse().ok(),
            _ => {}
        }
    }
    let limit = limit.filter(|l| *l > 0)?;
    let first_offset = first_offset?;

    let mut urls = Vec::new();
    let mut offset = first_offset;
    while offset < count {
        let pairs: Vec<(String, String)> = template
            .query_pairs()
            .map(|(key, value)| {
                if key == "offset" {
                    (key.to_string(), offset.to_string())
                } else {
                    (key.to_string(), value.to_string())
                }
            })
            .collect();
        let mut url = template.clone();
        url.query_pairs_mut().clear().extend_pairs(pairs);
        urls.push(url.to_string());
        offset += limit;
    }
    Some(urls)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ApiConfig;

    #[tokio::test]
    async fn test_aborted_fetch_task_surfaces_as_request_error() {
        let config = ApiConfig::builder()
            .url("http://localhost:8000")
            .build()
            .unwrap();
        let mut prefetcher = Prefetcher::new(
            Arc::new(RequestExecutor::new(&config)),
            vec!["http://localhost:8000/api/peering/routers/?offset=10".to_string()],
            1,
        );
        prefetcher.in_flight[0].abort();

        let err = prefetcher.next_page().await.unwrap_err();
        assert!(matches!(
            err,
            Error::Request(RequestError::Background(_))
        ));
        assert!(prefetcher.queued.is_empty());
    }

    #[test]
    fn test_plan_covers_all_remaining_offsets() {
        let urls =
            plan_offset_urls("http://pm/api/peering/routers/?limit=10&offset=10", 35).unwrap();
        assert_eq!(urls.len(), 3);
        assert!(urls[0].contains("offset=10"));
        assert!(urls[1].contains("offset=20"));
        assert!(urls[2].contains("offset=30"));
    }

    #[test]
    fn test_plan_preserves_other_query_params() {
        let urls = plan_offset_urls(
            "http://pm/api/peering/routers/?state=enabled&limit=10&offset=10",
            25,
        )
        .unwrap();
        assert!(urls.iter().all(|u| u.contains("state=enabled")));
        assert!(urls.iter().all(|u| u.contains("limit=10")));
    }

    #[test]
    fn test_plan_rejects_opaque_cursors() {
        assert!(plan_offset_urls("http://pm/api/peering/routers/?cursor=abc", 35).is_none());
    }

    #[test]
    fn test_plan_rejects_zero_limit() {
        assert!(plan_offset_urls("http://pm/api/x/?limit=0&offset=0", 35).is_none());
    }

    #[test]
    fn test_plan_is_empty_when_first_page_covered_everything() {
        let urls = plan_offset_urls("http://pm/api/x/?limit=50&offset=50", 40).unwrap();
        assert!(urls.is_empty());
    }
}
