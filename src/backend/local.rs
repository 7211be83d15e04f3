//! backend::local
//!
//! Fire backend backed by a dynamically loaded compiled module.
//!
//! # Module ABI
//!
//! The shared library exports two C functions:
//!
//! ```c
//! char *petri_fire(const char *net_json);   // next net JSON, or an error message
//! void  petri_free(char *s);                // releases a string returned above
//! ```
//!
//! Symbol names are configurable. The fire function is synchronous. A null
//! return is a failure; a non-JSON return is taken to be the module's error
//! message and is surfaced as-is.
//!
//! # Loading and firing
//!
//! Opening the library runs its initialisers and may touch the filesystem, so
//! [`load_async`] performs it on the blocking pool and the event loop only
//! sees the outcome. Fire calls go to the blocking pool as well; a slow
//! module never stalls the loop that awaits it.

use std::ffi::{c_char, CStr, CString};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use libloading::Library;
use tracing::{debug, info, instrument};

use super::traits::{ExecutionError, FireBackend};
use crate::core::codec::{self, NetError};
use crate::core::net::Net;

/// `char *fire(const char *)`
pub type FireFn = unsafe extern "C" fn(*const c_char) -> *mut c_char;

/// `void free(char *)`
pub type FreeFn = unsafe extern "C" fn(*mut c_char);

/// Local fire backend.
///
/// Clones share the loaded library.
#[derive(Clone)]
pub struct LocalBackend {
    path: PathBuf,
    fire_fn: FireFn,
    free_fn: FreeFn,
    /// Keeps `fire_fn` and `free_fn` mapped. Declared last so it drops last.
    _library: Option<Arc<Library>>,
}

impl std::fmt::Debug for LocalBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalBackend")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl LocalBackend {
    /// Open `path` and resolve the fire and free symbols.
    ///
    /// # Errors
    ///
    /// `ExecutionError::ModuleLoad` if the library cannot be opened or a
    /// symbol is missing.
    pub fn load(path: &Path, fire_symbol: &str, free_symbol: &str) -> Result<Self, ExecutionError> {
        // SAFETY: loading runs the library's initialisers. The module is
        // chosen by the user's configuration and trusted like any plugin.
        let library = unsafe { Library::new(path) }
            .map_err(|e| ExecutionError::ModuleLoad(format!("{}: {}", path.display(), e)))?;

        // SAFETY: the symbols are declared by the module ABI with exactly
        // these signatures. The copied fn pointers stay valid while
        // `library` is alive, which the struct guarantees.
        let fire_fn: FireFn = unsafe {
            *library.get::<FireFn>(fire_symbol.as_bytes()).map_err(|e| {
                ExecutionError::ModuleLoad(format!("symbol '{}': {}", fire_symbol, e))
            })?
        };
        let free_fn: FreeFn = unsafe {
            *library.get::<FreeFn>(free_symbol.as_bytes()).map_err(|e| {
                ExecutionError::ModuleLoad(format!("symbol '{}': {}", free_symbol, e))
            })?
        };

        info!(path = %path.display(), "local fire module loaded");
        Ok(Self {
            path: path.to_path_buf(),
            fire_fn,
            free_fn,
            _library: Some(Arc::new(library)),
        })
    }

    /// Wrap in-process functions that follow the module ABI.
    ///
    /// Useful for statically linked fire implementations and for tests.
    pub fn from_fns(name: impl Into<PathBuf>, fire_fn: FireFn, free_fn: FreeFn) -> Self {
        Self {
            path: name.into(),
            fire_fn,
            free_fn,
            _library: None,
        }
    }

    /// Path of the loaded module.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Call the module's fire function on raw net text.
    ///
    /// # Errors
    ///
    /// `ExecutionError::LocalModule` for a null result or text the FFI
    /// boundary cannot carry.
    pub fn fire_text(&self, input: &str) -> Result<String, ExecutionError> {
        let input = CString::new(input).map_err(|_| {
            ExecutionError::LocalModule("net text contains an interior NUL byte".to_string())
        })?;

        // SAFETY: `input` is a valid NUL-terminated string that outlives the
        // call; the module ABI forbids retaining the pointer.
        let raw = unsafe { (self.fire_fn)(input.as_ptr()) };
        if raw.is_null() {
            return Err(ExecutionError::LocalModule(
                "module returned no result".to_string(),
            ));
        }

        // SAFETY: non-null results are NUL-terminated strings owned by the
        // module until handed back through `free_fn`, exactly once.
        let text = unsafe { CStr::from_ptr(raw) }.to_string_lossy().into_owned();
        unsafe { (self.free_fn)(raw) };
        Ok(text)
    }

    /// Synchronous fire: serialize, call, parse and validate.
    pub fn fire_sync(&self, net: &Net) -> Result<Net, ExecutionError> {
        let output = self.fire_text(&codec::serialize_compact(net))?;
        match codec::parse_validated(&output) {
            Ok(next) => Ok(next),
            // The module reports failures as plain text instead of a net.
            Err(NetError::Parse(_)) => Err(ExecutionError::LocalModule(output.trim().to_string())),
            Err(NetError::Schema(e)) => Err(ExecutionError::InvalidNet(e)),
        }
    }
}

#[async_trait]
impl FireBackend for LocalBackend {
    fn name(&self) -> &'static str {
        "local"
    }

    #[instrument(skip_all, fields(module = %self.path.display()))]
    async fn fire(&self, net: &Net) -> Result<Net, ExecutionError> {
        debug!(tokens = net.token_count(), "calling local fire module");
        let backend = self.clone();
        let net = net.clone();
        tokio::task::spawn_blocking(move || backend.fire_sync(&net))
            .await
            .map_err(|e| ExecutionError::TaskFailed(e.to_string()))?
    }
}

/// Load a module on the blocking pool.
pub async fn load_async(
    path: PathBuf,
    fire_symbol: String,
    free_symbol: String,
) -> Result<LocalBackend, ExecutionError> {
    tokio::task::spawn_blocking(move || LocalBackend::load(&path, &fire_symbol, &free_symbol))
        .await
        .map_err(|e| ExecutionError::ModuleLoad(format!("loader task failed: {}", e)))?
}
