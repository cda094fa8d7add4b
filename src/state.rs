//! Shared application state handed to every handler.

use std::sync::Arc;

use tracing::warn;

use crate::config::ServerConfig;
use crate::core::camb::CambClient;
use crate::core::dubbing::{DubbingOrchestrator, SharedDubbingProvider};
use crate::core::error::MediaResult;
use crate::core::transcription::{SharedTranscriptionProvider, TranscriptionService};

pub struct AppState {
    pub config: ServerConfig,
    pub dubbing: DubbingOrchestrator,
    pub transcription: TranscriptionService,
}

impl AppState {
    /// Build state backed by the Camb.ai client described in `config`.
    ///
    /// A missing API key is not an error here; requests report it instead.
    pub fn new(config: ServerConfig) -> MediaResult<Arc<Self>> {
        let client = Arc::new(CambClient::new(config.camb_config())?);

        if !config.has_camb_api_key() {
            warn!("CAMB_API_KEY not configured; dubbing and transcription requests will fail");
        }

        Ok(Self::with_providers(config, client.clone(), client))
    }

    /// Build state around explicit providers.
    pub fn with_providers(
        config: ServerConfig,
        dubbing: SharedDubbingProvider,
        transcription: SharedTranscriptionProvider,
    ) -> Arc<Self> {
        let policy = config.poll_policy();
        Arc::new(Self {
            dubbing: DubbingOrchestrator::new(dubbing, policy),
            transcription: TranscriptionService::new(transcription),
            config,
        })
    }
}
