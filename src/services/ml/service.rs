//! Shared generation service with lazy model construction

use super::generator::{GeneratorLoader, TextGenerator};
use crate::types::{GenerationError, GenerationRequest, GenerationResult, GenerationSettings};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};
use tokio::sync::OnceCell;

type SharedGenerator = Arc<Mutex<Box<dyn TextGenerator>>>;

/// Process-wide handle to the text generator.
///
/// The generator is expensive to build, so it is constructed on the first
/// request and reused afterwards. A failed construction is not remembered:
/// the next request tries again.
pub struct MLService {
    loader: Arc<GeneratorLoader>,
    generator: OnceCell<SharedGenerator>,
    timeout: Option<Duration>,
}

impl MLService {
    pub fn new(loader: GeneratorLoader, timeout: Option<Duration>) -> Self {
        Self {
            loader: Arc::new(loader),
            generator: OnceCell::new(),
            timeout,
        }
    }

    /// Check if the generator has been built
    pub fn is_loaded(&self) -> bool {
        self.generator.initialized()
    }

    async fn get_or_load(&self) -> Result<SharedGenerator, GenerationError> {
        self.generator
            .get_or_try_init(|| async {
                tracing::info!("[GENERATION] Loading generator on first use");
                let started = Instant::now();
                let loader = Arc::clone(&self.loader);

                let generator = tokio::task::spawn_blocking(move || {
                    let load = loader.as_ref();
                    load()
                })
                    .await
                    .map_err(|e| {
                        GenerationError::ResourceUnavailable(format!("loader task failed: {}", e))
                    })?
                    .map_err(|e| {
                        tracing::error!("[GENERATION] Generator construction failed: {}", e);
                        match e {
                            GenerationError::ResourceUnavailable(_) => e,
                            other => GenerationError::ResourceUnavailable(other.to_string()),
                        }
                    })?;

                tracing::info!(
                    "[GENERATION] ✅ Generator '{}' ready in {:?}",
                    generator.name(),
                    started.elapsed()
                );
                Ok::<_, GenerationError>(Arc::new(Mutex::new(generator)))
            })
            .await
            .cloned()
    }

    /// Runs one sampled generation for `prompt` and returns the first result.
    pub async fn generate(
        &self,
        prompt: String,
        settings: &GenerationSettings,
    ) -> Result<GenerationResult, GenerationError> {
        let generator = self.get_or_load().await?;
        let settings = *settings;

        let task = tokio::task::spawn_blocking(move || {
            let mut generator = generator
                .lock()
                // A panicked call leaves nothing half-done: prefill at position 0 resets the cache
                .unwrap_or_else(PoisonError::into_inner);
            let request = GenerationRequest::sampled(prompt, &settings, generator.eos_token_id());
            tracing::debug!(
                "[GENERATION] {} chars prompt, max_new_tokens={}, temperature={}",
                request.prompt.len(),
                request.max_new_tokens,
                request.temperature
            );
            generator.generate(&request)
        });

        let joined = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, task).await.map_err(|_| {
                tracing::warn!("[GENERATION] Timed out after {:?}", limit);
                GenerationError::Timeout(limit)
            })?,
            None => task.await,
        };

        let results = joined
            .map_err(|e| GenerationError::Inference(format!("generation task failed: {}", e)))??;

        let result = results
            .into_iter()
            .next()
            .ok_or_else(|| GenerationError::MalformedOutput("generator returned no sequences".into()))?;
        if result.generated_text.is_empty() {
            return Err(GenerationError::MalformedOutput("generator returned empty text".into()));
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Scripted {
        reply: Result<Vec<GenerationResult>, GenerationError>,
        delay: Option<Duration>,
    }

    impl TextGenerator for Scripted {
        fn eos_token_id(&self) -> u32 {
            2
        }

        fn generate(
            &mut self,
            request: &GenerationRequest,
        ) -> Result<Vec<GenerationResult>, GenerationError> {
            assert_eq!(request.pad_token_id, 2);
            if let Some(delay) = self.delay {
                std::thread::sleep(delay);
            }
            self.reply.clone()
        }

        fn name(&self) -> &str {
            "scripted"
        }
    }

    fn service_with(
        reply: Result<Vec<GenerationResult>, GenerationError>,
        delay: Option<Duration>,
        timeout: Option<Duration>,
    ) -> MLService {
        MLService::new(
            Box::new(move || {
                Ok(Box::new(Scripted {
                    reply: reply.clone(),
                    delay,
                }) as Box<dyn TextGenerator>)
            }),
            timeout,
        )
    }

    #[tokio::test]
    async fn test_lazy_load_once() {
        let loads = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&loads);
        let service = MLService::new(
            Box::new(move || {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(Box::new(Scripted {
                    reply: Ok(vec![GenerationResult::new("ok")]),
                    delay: None,
                }) as Box<dyn TextGenerator>)
            }),
            None,
        );

        assert!(!service.is_loaded());
        for _ in 0..3 {
            let result = service
                .generate("p".into(), &GenerationSettings::default())
                .await
                .unwrap();
            assert_eq!(result.generated_text, "ok");
        }
        assert!(service.is_loaded());
        assert_eq!(loads.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failed_load_is_retried() {
        let attempts = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&attempts);
        let service = MLService::new(
            Box::new(move || {
                if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                    Err(GenerationError::Inference("weights missing".into()))
                } else {
                    Ok(Box::new(Scripted {
                        reply: Ok(vec![GenerationResult::new("second try")]),
                        delay: None,
                    }) as Box<dyn TextGenerator>)
                }
            }),
            None,
        );

        let err = service
            .generate("p".into(), &GenerationSettings::default())
            .await
            .unwrap_err();
        assert!(matches!(err, GenerationError::ResourceUnavailable(_)));
        assert!(!service.is_loaded());

        let ok = service
            .generate("p".into(), &GenerationSettings::default())
            .await
            .unwrap();
        assert_eq!(ok.generated_text, "second try");
        assert_eq!(attempts.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_empty_results_are_malformed() {
        let service = service_with(Ok(vec![]), None, None);
        let err = service
            .generate("p".into(), &GenerationSettings::default())
            .await
            .unwrap_err();
        assert!(matches!(err, GenerationError::MalformedOutput(_)));
    }

    #[tokio::test]
    async fn test_empty_text_is_malformed() {
        let service = service_with(Ok(vec![GenerationResult::new("")]), None, None);
        let err = service
            .generate("p".into(), &GenerationSettings::default())
            .await
            .unwrap_err();
        assert!(matches!(err, GenerationError::MalformedOutput(_)));
    }

    #[tokio::test]
    async fn test_generator_error_passes_through() {
        let service = service_with(Err(GenerationError::Inference("nan logits".into())), None, None);
        let err = service
            .generate("p".into(), &GenerationSettings::default())
            .await
            .unwrap_err();
        assert!(matches!(err, GenerationError::Inference(_)));
    }

    struct PanicsOnce {
        calls: usize,
    }

    impl TextGenerator for PanicsOnce {
        fn eos_token_id(&self) -> u32 {
            2
        }

        fn generate(
            &mut self,
            _request: &GenerationRequest,
        ) -> Result<Vec<GenerationResult>, GenerationError> {
            self.calls += 1;
            if self.calls == 1 {
                panic!("forward pass blew up");
            }
            Ok(vec![GenerationResult::new(format!("call {}", self.calls))])
        }

        fn name(&self) -> &str {
            "panics-once"
        }
    }

    #[tokio::test]
    async fn test_recovers_after_generator_panic() {
        let service = MLService::new(
            Box::new(|| Ok(Box::new(PanicsOnce { calls: 0 }) as Box<dyn TextGenerator>)),
            None,
        );

        let err = service
            .generate("p".into(), &GenerationSettings::default())
            .await
            .unwrap_err();
        assert!(matches!(err, GenerationError::Inference(_)));

        for expected in ["call 2", "call 3"] {
            let ok = service
                .generate("p".into(), &GenerationSettings::default())
                .await
                .unwrap();
            assert_eq!(ok.generated_text, expected);
        }
    }

    #[tokio::test]
    async fn test_timeout() {
        let service = service_with(
            Ok(vec![GenerationResult::new("late")]),
            Some(Duration::from_millis(500)),
            Some(Duration::from_millis(20)),
        );
        let err = service
            .generate("p".into(), &GenerationSettings::default())
            .await
            .unwrap_err();
        assert!(matches!(err, GenerationError::Timeout(_)));
    }
}
