//! HTTP inference service: a health check and a single-image prediction
//! endpoint over the latest exported checkpoint.
//!
//! The model is process-lifetime and lazily initialized; the first caller
//! pays the load cost and all later callers share the result. Burn modules
//! are Send but not Sync, so the loaded model lives behind a mutex and each
//! prediction holds the lock for its forward pass. A missing artifact at
//! startup is only a warning: the service still comes up and answers
//! predictions with 503 until a checkpoint can be loaded. Once loaded, the
//! model is never invalidated or reloaded.

use crate::checkpoint::CheckpointStore;
use crate::dataset::ClassVocab;
use crate::error::{Error, Result};
use crate::model::{Classifier, ClassifierConfig};
use crate::vision;
use actix_web::http::header::CONTENT_TYPE;
use actix_web::{web, App, HttpRequest, HttpResponse, HttpServer, Responder};
use burn::backend::ndarray::{NdArray, NdArrayDevice};
use burn::tensor::activation::softmax;
use serde::Serialize;
use std::sync::Mutex;

/// Lazily loaded classifier shared for the life of the process.
pub struct LazyClassifier {
    store: CheckpointStore,
    slot: Mutex<Option<(Classifier<NdArray>, ClassVocab)>>,
}

impl LazyClassifier {
    pub fn new(store: CheckpointStore) -> Self {
        Self { store, slot: Mutex::new(None) }
    }

    /// Runs `f` against the model and vocabulary, loading them on first
    /// access. The lock is held for the duration of `f`.
    pub fn with_model<R>(
        &self,
        f: impl FnOnce(&Classifier<NdArray>, &ClassVocab) -> R,
    ) -> Result<R> {
        let mut slot = self
            .slot
            .lock()
            .map_err(|_| Error::CheckpointError("model lock poisoned".to_string()))?;

        if slot.is_none() {
            log::debug!("Loading model from '{}'", self.store.dir().display());
            let config: ClassifierConfig = self.store.load_model_config()?;
            let vocab = self.store.load_vocab()?;
            let model = self.store.load_model(&config, &NdArrayDevice::Cpu)?;
            *slot = Some((model, vocab));
        }

        match slot.as_ref() {
            Some((model, vocab)) => Ok(f(model, vocab)),
            None => Err(Error::CheckpointError("model slot empty after load".to_string())),
        }
    }

}

/// Shared application state.
pub struct ServiceState {
    pub classifier: LazyClassifier,
    pub image_size: u32,
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

#[derive(Serialize)]
struct PredictionResponse {
    label: String,
    class_index: usize,
    confidence: f32,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

async fn health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn predict(
    req: HttpRequest,
    body: web::Bytes,
    state: web::Data<ServiceState>,
) -> HttpResponse {
    let content_type = req
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    if !content_type.starts_with("image/") {
        return HttpResponse::BadRequest()
            .json(ErrorResponse { error: "request body must be an image".to_string() });
    }

    let img = match vision::decode_image(&body) {
        Ok(img) => img,
        Err(e) => {
            return HttpResponse::BadRequest()
                .json(ErrorResponse { error: format!("could not decode image: {}", e) })
        }
    };

    let device = NdArrayDevice::Cpu;
    let tensor =
        vision::preprocess::<NdArray>(&img, state.image_size, &device).unsqueeze::<4>();

    let outcome = state.classifier.with_model(move |model, vocab| {
        let probs = softmax(model.forward(tensor), 1);
        let values =
            probs.into_data().to_vec::<f32>().map_err(|e| format!("{:?}", e))?;

        let (class_index, confidence) = values
            .iter()
            .copied()
            .enumerate()
            .fold((0, f32::MIN), |best, (i, p)| if p > best.1 { (i, p) } else { best });

        let label = vocab.name_of(class_index).unwrap_or("unknown").to_string();
        Ok::<_, String>(PredictionResponse { label, class_index, confidence })
    });

    match outcome {
        Ok(Ok(prediction)) => HttpResponse::Ok().json(prediction),
        Ok(Err(e)) => HttpResponse::InternalServerError()
            .json(ErrorResponse { error: format!("inference failed: {}", e) }),
        Err(e) => HttpResponse::ServiceUnavailable()
            .json(ErrorResponse { error: format!("model is not available: {}", e) }),
    }
}

/// Registers the service routes; shared between the server and the tests.
pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health))
        .route("/predict", web::post().to(predict));
}

/// Runs the blocking HTTP server.
pub fn run_server(host: &str, port: u16, state: ServiceState) -> Result<()> {
    if !state.classifier.store.has_checkpoint() {
        log::warn!(
            "No checkpoint found in '{}'; /predict will answer 503 until one exists.",
            state.classifier.store.dir().display()
        );
    }

    let data = web::Data::new(state);
    log::info!("Serving on http://{}:{}", host, port);

    actix_web::rt::System::new().block_on(async move {
        HttpServer::new(move || App::new().app_data(data.clone()).configure(routes))
            .bind((host, port))?
            .run()
            .await
    })?;
    Ok(())
}
