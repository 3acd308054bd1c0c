//! End-to-end conversion pipeline: URL → proxy fetch → model inference →
//! persisted artifact.
//!
//! One request runs start-to-finish before another can begin; there are no
//! retry transitions. Every step (start, each external call's success or
//! failure, save confirmation) is recorded in the activity log before any
//! error propagates to the caller.

use std::path::PathBuf;

use chrono::Local;
use tracing::{info, instrument};

use pagemark_fetcher::ProxyFetcher;
use pagemark_ollama::OllamaClient;
use pagemark_shared::{
    AppConfig, ConversionRequest, ConversionResult, ModelName, Result, artifact_filename,
};
use pagemark_store::{ActivityLog, ArtifactStore, LogLevel};

/// Outcome of one conversion request.
#[derive(Debug)]
pub struct ConversionOutcome {
    /// The conversion result (markdown, timestamp, source URL).
    pub result: ConversionResult,
    /// Where the artifact was written, when saving was enabled.
    pub saved_path: Option<PathBuf>,
}

/// The conversion pipeline context: all components constructed once at
/// startup and reused for every request. Holds the only handles to the
/// output directory and the activity log.
pub struct Converter {
    fetcher: ProxyFetcher,
    ollama: OllamaClient,
    store: ArtifactStore,
    log: ActivityLog,
}

impl Converter {
    /// Build a converter from explicitly constructed components.
    pub fn new(
        fetcher: ProxyFetcher,
        ollama: OllamaClient,
        store: ArtifactStore,
        log: ActivityLog,
    ) -> Self {
        Self {
            fetcher,
            ollama,
            store,
            log,
        }
    }

    /// Build a converter from the application config, creating the output
    /// and log directories if absent.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        Ok(Self::new(
            ProxyFetcher::new(config.proxy.base.as_str())?,
            OllamaClient::new(config.ollama.endpoint.as_str())?,
            ArtifactStore::new(&config.defaults.output_dir)?,
            ActivityLog::new(&config.defaults.log_dir)?,
        ))
    }

    /// The activity log owned by this context.
    pub fn activity_log(&self) -> &ActivityLog {
        &self.log
    }

    /// List the models installed on the inference service. Degrades to an
    /// empty list on failure; never errors.
    pub async fn list_models(&self) -> Vec<ModelName> {
        self.ollama.list_models(&self.log).await
    }

    /// Run one conversion: fetch cleaned content, invoke the model, and
    /// optionally persist the result.
    ///
    /// A fetch failure prevents any inference call; a conversion failure
    /// prevents any save. Errors are surfaced directly, never retried.
    #[instrument(skip(self), fields(url = %request.url, model = %request.model))]
    pub async fn convert_url(
        &self,
        request: &ConversionRequest,
        save_locally: bool,
    ) -> Result<ConversionOutcome> {
        self.log.record(
            LogLevel::Info,
            &format!(
                "Starting conversion for URL: {} using model: {}",
                request.url, request.model
            ),
        );
        self.log.record(
            LogLevel::Info,
            &format!("Processed URL: {}", self.fetcher.proxied_url(&request.url)),
        );

        // Fetching → Fetched | FetchFailed
        let cleaned_html = match self.fetcher.fetch_cleaned_html(&request.url).await {
            Ok(body) => body,
            Err(e) => {
                self.log
                    .record(LogLevel::Error, &format!("Error during conversion: {e}"));
                return Err(e);
            }
        };

        // Converting → Converted | ConversionFailed
        let markdown_content = match self.ollama.convert(&cleaned_html, &request.model).await {
            Ok(markdown) => markdown,
            Err(e) => {
                self.log
                    .record(LogLevel::Error, &format!("Error during conversion: {e}"));
                return Err(e);
            }
        };

        self.log.record(
            LogLevel::Info,
            &format!("Successfully converted URL: {}", request.url),
        );

        let result = ConversionResult {
            markdown_content,
            timestamp: Local::now(),
            source_url: request.url.clone(),
        };

        // (Saving → Saved | SaveFailed) — optional per request
        let saved_path = if save_locally {
            let filename = artifact_filename(result.timestamp);
            match self.store.save(&result.markdown_content, &filename) {
                Ok(path) => {
                    self.log.record(
                        LogLevel::Info,
                        &format!("Saved markdown file: {}", path.display()),
                    );
                    Some(path)
                }
                Err(e) => {
                    self.log
                        .record(LogLevel::Error, &format!("Error saving markdown file: {e}"));
                    return Err(e);
                }
            }
        } else {
            None
        };

        info!(
            url = %request.url,
            markdown_len = result.markdown_content.len(),
            saved = saved_path.is_some(),
            "conversion complete"
        );

        Ok(ConversionOutcome { result, saved_path })
    }
}
