use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Value, json};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use super::*;
use crate::core::error::{ErrorCategory, MediaError, MediaResult};

/// Provider that replays scripted status and result documents.
struct ScriptedProvider {
    configured: bool,
    sources: Vec<LanguageEntry>,
    targets: Vec<LanguageEntry>,
    statuses: Mutex<VecDeque<MediaResult<Value>>>,
    results: Mutex<VecDeque<MediaResult<Value>>>,
    submitted: Mutex<Vec<(i64, i64)>>,
    catalog_calls: AtomicUsize,
    status_calls: AtomicUsize,
    result_calls: AtomicUsize,
    catalog_delay: Duration,
    status_delay: Duration,
    result_delay: Duration,
}

impl ScriptedProvider {
    fn new() -> Self {
        Self {
            configured: true,
            sources: vec![
                LanguageEntry::new(1, Some("English (US)"), Some("en-us")),
                LanguageEntry::new(9, Some("Auto Detect"), Some("auto")),
            ],
            targets: vec![
                LanguageEntry::new(76, Some("English (United States)"), Some("en-us")),
                LanguageEntry::new(81, Some("Hindi (India)"), Some("hi-in")),
            ],
            statuses: Mutex::new(VecDeque::new()),
            results: Mutex::new(VecDeque::new()),
            submitted: Mutex::new(Vec::new()),
            catalog_calls: AtomicUsize::new(0),
            status_calls: AtomicUsize::new(0),
            result_calls: AtomicUsize::new(0),
            catalog_delay: Duration::ZERO,
            status_delay: Duration::ZERO,
            result_delay: Duration::ZERO,
        }
    }

    fn unconfigured() -> Self {
        Self {
            configured: false,
            ..Self::new()
        }
    }

    fn with_statuses(self, statuses: Vec<MediaResult<Value>>) -> Self {
        *self.statuses.lock().unwrap() = statuses.into();
        self
    }

    fn with_results(self, results: Vec<MediaResult<Value>>) -> Self {
        *self.results.lock().unwrap() = results.into();
        self
    }

    fn with_catalog_delay(mut self, delay: Duration) -> Self {
        self.catalog_delay = delay;
        self
    }

    fn with_status_delay(mut self, delay: Duration) -> Self {
        self.status_delay = delay;
        self
    }

    fn with_result_delay(mut self, delay: Duration) -> Self {
        self.result_delay = delay;
        self
    }

    fn status_calls(&self) -> usize {
        self.status_calls.load(Ordering::SeqCst)
    }

    fn result_calls(&self) -> usize {
        self.result_calls.load(Ordering::SeqCst)
    }

    fn network_calls(&self) -> usize {
        self.catalog_calls.load(Ordering::SeqCst)
            + self.submitted.lock().unwrap().len()
            + self.status_calls()
            + self.result_calls()
    }
}

#[async_trait]
impl DubbingProvider for ScriptedProvider {
    fn ensure_configured(&self) -> MediaResult<()> {
        if self.configured {
            Ok(())
        } else {
            Err(MediaError::Configuration("API key not configured".into()))
        }
    }

    async fn source_languages(&self) -> MediaResult<Vec<LanguageEntry>> {
        self.catalog_calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.catalog_delay).await;
        Ok(self.sources.clone())
    }

    async fn target_languages(&self) -> MediaResult<Vec<LanguageEntry>> {
        self.catalog_calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.catalog_delay).await;
        Ok(self.targets.clone())
    }

    async fn submit(&self, job: &DubJob) -> MediaResult<JobHandle> {
        self.submitted
            .lock()
            .unwrap()
            .push((job.source_language_id, job.target_language_id));
        Ok(JobHandle::new("task-1"))
    }

    async fn job_status(&self, _handle: &JobHandle) -> MediaResult<Value> {
        self.status_calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.status_delay).await;
        self.statuses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(json!({"status": "PROCESSING"})))
    }

    async fn job_result(&self, _run_id: &str) -> MediaResult<Value> {
        self.result_calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.result_delay).await;
        self.results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(json!({})))
    }

    fn provider_name(&self) -> &'static str {
        "scripted"
    }
}

fn orchestrator(provider: &Arc<ScriptedProvider>) -> DubbingOrchestrator {
    DubbingOrchestrator::new(provider.clone(), PollPolicy::default())
}

fn processing() -> MediaResult<Value> {
    Ok(json!({"status": "PROCESSING"}))
}

// =============================================================================
// Poller
// =============================================================================

#[tokio::test(start_paused = true)]
async fn test_direct_success_after_processing() {
    let provider = ScriptedProvider::new().with_statuses(vec![
        processing(),
        processing(),
        Ok(json!({"status": "SUCCESS", "data": {"result": {"dubbed_video_url": "https://x/y.mp4"}}})),
    ]);
    let handle = JobHandle::new("task-1");
    let started = Instant::now();

    let video = StatusPoller::new(&provider, PollPolicy::default())
        .run(&handle, &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(video.dubbed_video_url, "https://x/y.mp4");
    assert_eq!(video.payload["dubbed_video_url"], "https://x/y.mp4");
    assert_eq!(video.payload["status"], "SUCCESS");
    assert_eq!(provider.status_calls(), 3);
    assert_eq!(provider.result_calls(), 0);
    assert_eq!(started.elapsed(), Duration::from_secs(4));
}

#[tokio::test(start_paused = true)]
async fn test_indirect_success_fetches_result_once() {
    let provider = ScriptedProvider::new()
        .with_statuses(vec![Ok(json!({"status": "COMPLETED", "run_id": 4242}))])
        .with_results(vec![Ok(json!({"dubbed_video_url": "https://cdn/out.mp4", "transcript": []}))]);

    let video = StatusPoller::new(&provider, PollPolicy::default())
        .run(&JobHandle::new("task-1"), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(video.dubbed_video_url, "https://cdn/out.mp4");
    assert_eq!(video.payload["transcript"], json!([]));
    assert_eq!(provider.status_calls(), 1);
    assert_eq!(provider.result_calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_result_without_url_is_contract_error() {
    let provider = ScriptedProvider::new()
        .with_statuses(vec![Ok(json!({"status": "done", "data": {"run_id": "r-1"}}))])
        .with_results(vec![Ok(json!({"status": "done"}))]);

    let err = StatusPoller::new(&provider, PollPolicy::default())
        .run(&JobHandle::new("task-1"), &CancellationToken::new())
        .await
        .unwrap_err();

    assert_eq!(err.category(), ErrorCategory::ProviderContract);
    assert_eq!(provider.result_calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_cancelled_status_stops_on_that_iteration() {
    let provider = ScriptedProvider::new().with_statuses(vec![
        processing(),
        Ok(json!({"status": "Cancelled", "message": "Job cancelled by user"})),
    ]);

    let err = StatusPoller::new(&provider, PollPolicy::default())
        .run(&JobHandle::new("task-1"), &CancellationToken::new())
        .await
        .unwrap_err();

    assert!(matches!(err, MediaError::JobFailed(ref m) if m == "Job cancelled by user"));
    assert_eq!(provider.status_calls(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_times_out_after_deadline_over_interval_polls() {
    let provider = ScriptedProvider::new();
    let handle = JobHandle::new("task-1");
    let started = Instant::now();

    let err = StatusPoller::new(&provider, PollPolicy::default())
        .run(&handle, &CancellationToken::new())
        .await
        .unwrap_err();

    assert!(matches!(err, MediaError::TimedOut));
    assert_eq!(err.category(), ErrorCategory::Timeout);
    assert_eq!(provider.status_calls() as u128, PollPolicy::default().expected_polls());
    assert!(started.elapsed() >= DEFAULT_POLL_DEADLINE);
}

#[tokio::test(start_paused = true)]
async fn test_uneven_deadline_poll_count() {
    let provider = ScriptedProvider::new();
    let policy = PollPolicy::new(Duration::from_secs(2), Duration::from_secs(91));

    let err = StatusPoller::new(&provider, policy)
        .run(&JobHandle::new("task-1"), &CancellationToken::new())
        .await
        .unwrap_err();

    assert!(matches!(err, MediaError::TimedOut));
    let polls = provider.status_calls() as i64;
    assert!((polls - 46).abs() <= 1, "polls = {polls}");
}

#[tokio::test(start_paused = true)]
async fn test_deadline_counts_from_submission() {
    let provider = ScriptedProvider::new();
    let handle = JobHandle::new("task-1");
    tokio::time::advance(Duration::from_secs(119)).await;

    let err = StatusPoller::new(&provider, PollPolicy::default())
        .run(&handle, &CancellationToken::new())
        .await
        .unwrap_err();

    assert!(matches!(err, MediaError::TimedOut));
    assert_eq!(provider.status_calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_deadline_bounds_slow_status_request() {
    let provider = ScriptedProvider::new()
        .with_status_delay(Duration::from_secs(200))
        .with_statuses(vec![Ok(json!({"dubbed_video_url": "https://x/late.mp4"}))]);
    let handle = JobHandle::new("task-1");
    let started = Instant::now();

    let err = StatusPoller::new(&provider, PollPolicy::default())
        .run(&handle, &CancellationToken::new())
        .await
        .unwrap_err();

    assert!(matches!(err, MediaError::TimedOut));
    assert_eq!(started.elapsed(), DEFAULT_POLL_DEADLINE);
    assert_eq!(provider.status_calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_deadline_bounds_slow_result_fetch() {
    let provider = ScriptedProvider::new()
        .with_result_delay(Duration::from_secs(200))
        .with_statuses(vec![Ok(json!({"status": "SUCCESS", "run_id": "r-9"}))])
        .with_results(vec![Ok(json!({"dubbed_video_url": "https://x/late.mp4"}))]);
    let handle = JobHandle::new("task-1");
    let started = Instant::now();

    let err = StatusPoller::new(&provider, PollPolicy::default())
        .run(&handle, &CancellationToken::new())
        .await
        .unwrap_err();

    assert!(matches!(err, MediaError::TimedOut));
    assert_eq!(started.elapsed(), DEFAULT_POLL_DEADLINE);
    assert_eq!(provider.result_calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_status_error_ends_polling() {
    let provider = ScriptedProvider::new().with_statuses(vec![
        processing(),
        Err(MediaError::upstream(404, "Task not found")),
    ]);

    let err = StatusPoller::new(&provider, PollPolicy::default())
        .run(&JobHandle::new("task-1"), &CancellationToken::new())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        MediaError::ProviderTransport {
            status: Some(404),
            ..
        }
    ));
    assert_eq!(provider.status_calls(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_cancellation_stops_polling() {
    let provider = ScriptedProvider::new();
    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_secs(5)).await;
        trigger.cancel();
    });

    let err = StatusPoller::new(&provider, PollPolicy::default())
        .run(&JobHandle::new("task-1"), &cancel)
        .await
        .unwrap_err();

    assert!(matches!(err, MediaError::Cancelled));
    assert_eq!(provider.status_calls(), 3);
}

// =============================================================================
// Orchestrator
// =============================================================================

#[tokio::test(start_paused = true)]
async fn test_dub_resolves_ids_and_returns_url() {
    let provider = Arc::new(ScriptedProvider::new().with_statuses(vec![Ok(
        json!({"status": "SUCCESS", "dubbed_video_url": "https://x/hi.mp4"}),
    )]));

    let video = orchestrator(&provider)
        .dub(
            DubRequest::from_url("https://example.com/talk.mp4", "hi"),
            &CancellationToken::new(),
        )
        .await
        .unwrap();

    assert_eq!(video.dubbed_video_url, "https://x/hi.mp4");
    assert_eq!(*provider.submitted.lock().unwrap(), vec![(9, 81)]);
    assert_eq!(provider.catalog_calls.load(Ordering::SeqCst), 2);
}

#[tokio::test(start_paused = true)]
async fn test_dub_with_explicit_source() {
    let provider = Arc::new(ScriptedProvider::new().with_statuses(vec![Ok(
        json!({"data": {"dubbed_video_url": "https://x/en.mp4"}}),
    )]));

    let request = DubRequest::from_url("https://example.com/talk.mp4", "en_US")
        .with_source_language("EN");
    orchestrator(&provider)
        .dub(request, &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(*provider.submitted.lock().unwrap(), vec![(1, 76)]);
}

#[tokio::test(start_paused = true)]
async fn test_catalogs_fetched_concurrently() {
    let provider = Arc::new(
        ScriptedProvider::new()
            .with_catalog_delay(Duration::from_secs(1))
            .with_statuses(vec![Ok(json!({"dubbed_video_url": "https://x/hi.mp4"}))]),
    );
    let started = Instant::now();

    orchestrator(&provider)
        .dub(
            DubRequest::from_url("https://example.com/talk.mp4", "hi"),
            &CancellationToken::new(),
        )
        .await
        .unwrap();

    assert_eq!(started.elapsed(), Duration::from_secs(1));
    assert_eq!(provider.catalog_calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_invalid_url_makes_no_calls() {
    let provider = Arc::new(ScriptedProvider::new());

    let outcome = orchestrator(&provider)
        .run(
            DubRequest::from_url("not-a-url", "hi"),
            &CancellationToken::new(),
        )
        .await;

    assert!(!outcome.success);
    assert_eq!(outcome.error_category, Some(ErrorCategory::ClientInput));
    assert_eq!(
        outcome.error_message.as_deref(),
        Some("A valid video_url (http/https) is required")
    );
    assert_eq!(provider.network_calls(), 0);
}

#[tokio::test]
async fn test_missing_credential_makes_no_calls() {
    let provider = Arc::new(ScriptedProvider::unconfigured());

    let err = orchestrator(&provider)
        .dub(
            DubRequest::from_url("https://example.com/talk.mp4", "hi"),
            &CancellationToken::new(),
        )
        .await
        .unwrap_err();

    assert_eq!(err.category(), ErrorCategory::Configuration);
    assert_eq!(provider.network_calls(), 0);
}

#[tokio::test]
async fn test_unsupported_target_is_client_error() {
    let provider = Arc::new(ScriptedProvider::new());

    let err = orchestrator(&provider)
        .dub(
            DubRequest::from_url("https://example.com/talk.mp4", "klingon"),
            &CancellationToken::new(),
        )
        .await
        .unwrap_err();

    assert_eq!(err.category(), ErrorCategory::ClientInput);
    assert_eq!(
        err.to_string(),
        "Unsupported target language: klingon. Try a locale like \"hi-in\" or \"en-us\"."
    );
    assert!(provider.submitted.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_cancelled_before_catalogs() {
    let provider = Arc::new(ScriptedProvider::new());
    let cancel = CancellationToken::new();
    cancel.cancel();

    let outcome = orchestrator(&provider)
        .run(
            DubRequest::from_url("https://example.com/talk.mp4", "hi"),
            &cancel,
        )
        .await;

    assert_eq!(outcome.error_category, Some(ErrorCategory::Cancelled));
    assert_eq!(provider.network_calls(), 0);
}
