//! Asynchronous decode dispatch.
//!
//! A call is classified and validated on the caller's thread; argument errors
//! come back immediately. The engine then runs on the rayon pool and the
//! outcome settles through either a callback or a [`PendingDecode`].

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use tracing::debug;

use crate::engine::{DecodingEngine, QrEngine};
use crate::error::{DecodeError, Result};
use crate::models::DecodeResult;

/// Callback and deferred completion
pub mod completion;
/// Image argument classification
pub mod input;
/// Engine output to public results
pub mod mapper;
/// Raster geometry validation
pub mod raster;

pub use completion::{Outcome, PendingDecode};
pub use input::{ImageArg, ImageInput, RasterImage, classify};
pub use mapper::map_symbols;
pub use raster::{Channels, RasterCandidate, RawRaster, validate_raster};

use completion::Completion;

/// Input that passed classification and validation
#[derive(Debug)]
enum Job {
    Encoded(Vec<u8>),
    Raw(RawRaster),
}

impl Job {
    fn prepare(image: ImageArg) -> Result<Self> {
        match classify(image)? {
            ImageInput::Encoded(bytes) => Ok(Job::Encoded(bytes)),
            ImageInput::Raw(candidate) => Ok(Job::Raw(validate_raster(candidate)?)),
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}

fn run<E: DecodingEngine>(engine: &E, job: &Job) -> Outcome {
    let symbols = panic::catch_unwind(AssertUnwindSafe(|| match job {
        Job::Encoded(bytes) => engine.decode_encoded(bytes),
        Job::Raw(raster) => engine.decode_raw(raster),
    }))
    .map_err(|payload| DecodeError::EnginePanicked(panic_message(payload.as_ref())))??;
    Ok(map_symbols(symbols))
}

/// Dispatches decode calls to a [`DecodingEngine`] on the rayon pool.
///
/// Cloning is cheap; clones share the engine.
pub struct Decoder<E = QrEngine> {
    engine: Arc<E>,
}

impl<E> Clone for Decoder<E> {
    fn clone(&self) -> Self {
        Self {
            engine: Arc::clone(&self.engine),
        }
    }
}

impl Decoder<QrEngine> {
    /// Decoder backed by the built-in engine
    pub fn new() -> Self {
        Self::with_engine(QrEngine::new())
    }
}

impl Default for Decoder<QrEngine> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: DecodingEngine> Decoder<E> {
    /// Decoder backed by `engine`
    pub fn with_engine(engine: E) -> Self {
        Self {
            engine: Arc::new(engine),
        }
    }

    /// Decoder sharing an existing engine
    pub fn from_shared(engine: Arc<E>) -> Self {
        Self { engine }
    }

    /// The engine this decoder dispatches to
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Start a decode and return a handle to await or wait on.
    ///
    /// # Errors
    /// Argument, dimension and channel-count errors are returned here,
    /// before any work is scheduled. Engine failures settle the handle.
    pub fn decode(&self, image: impl Into<ImageArg>) -> Result<PendingDecode> {
        let job = Job::prepare(image.into())?;
        let (completion, pending) = PendingDecode::channel();
        self.spawn(job, completion);
        Ok(pending)
    }

    /// Start a decode and deliver its outcome to `handler` on a worker thread.
    ///
    /// `handler` runs exactly once, and never before this call returns `Ok`.
    /// On `Err` it is dropped without being called.
    pub fn decode_with<F>(&self, image: impl Into<ImageArg>, handler: F) -> Result<()>
    where
        F: FnOnce(Outcome) + Send + 'static,
    {
        let job = Job::prepare(image.into())?;
        self.spawn(job, Completion::Callback(Box::new(handler)));
        Ok(())
    }

    /// Decode and block until the outcome is available
    pub fn decode_blocking(&self, image: impl Into<ImageArg>) -> Result<DecodeResult> {
        self.decode(image)?.wait()
    }

    fn spawn(&self, job: Job, completion: Completion) {
        match &job {
            Job::Encoded(bytes) => debug!(len = bytes.len(), "dispatching encoded image"),
            Job::Raw(raster) => debug!(
                width = raster.width(),
                height = raster.height(),
                channels = raster.channels().count(),
                "dispatching raw raster"
            ),
        }
        let engine = Arc::clone(&self.engine);
        rayon::spawn(move || {
            let outcome = run(engine.as_ref(), &job);
            completion.complete(outcome);
        });
    }
}
