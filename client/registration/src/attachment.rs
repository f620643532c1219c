//! Payment receipt slot and its preview resource.
//!
//! A receipt may carry a *preview*: a locally created reference (think of a
//! browser object URL) that the presentation layer renders. Previews live in a
//! [`PreviewStore`] and are held through a [`PreviewHandle`], which releases
//! its entry exactly once when dropped. Replacing or clearing the receipt, or
//! dropping the [`AttachmentSlot`], therefore always frees the old preview.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use bytes::Bytes;
use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::errors::{RegistrationError, Result};

/// Exact allow-list of receipt media types. No wildcard matching.
pub const ACCEPTED_MEDIA_TYPES: [&str; 3] = ["image/jpeg", "image/jpg", "application/pdf"];

pub fn is_accepted_media_type(media_type: &str) -> bool {
    ACCEPTED_MEDIA_TYPES.contains(&media_type)
}

/// Media type for a receipt on disk, judged by its extension.
pub fn media_type_for_path(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("pdf") => "application/pdf",
        Some("png") => "image/png",
        _ => "application/octet-stream",
    }
}

/// A user-selected receipt file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiptFile {
    pub file_name: String,
    pub media_type: String,
    pub bytes: Bytes,
}

impl ReceiptFile {
    pub fn new(
        file_name: impl Into<String>,
        media_type: impl Into<String>,
        bytes: impl Into<Bytes>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            media_type: media_type.into(),
            bytes: bytes.into(),
        }
    }

    /// Read a receipt from disk, inferring its media type from the extension.
    pub async fn from_path(path: &Path) -> Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("receipt")
            .to_string();
        Ok(Self::new(file_name, media_type_for_path(path), bytes))
    }

    pub fn is_image(&self) -> bool {
        self.media_type.starts_with("image/")
    }
}

// ─────────────────────────────────────────────────────────
// Preview resources
// ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PreviewId(pub u64);

impl fmt::Display for PreviewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "preview:{}", self.0)
    }
}

/// Backing store for preview references.
pub trait PreviewStore: Send + Sync {
    fn create(&self, file: &ReceiptFile) -> Result<PreviewId>;
    fn release(&self, id: PreviewId) -> Result<()>;
}

/// In-memory table of live previews.
#[derive(Debug, Default)]
pub struct PreviewRegistry {
    next_id: AtomicU64,
    live: Mutex<HashMap<PreviewId, Bytes>>,
}

impl PreviewRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn live_count(&self) -> usize {
        self.live.lock().len()
    }

    pub fn is_live(&self, id: PreviewId) -> bool {
        self.live.lock().contains_key(&id)
    }

    /// Bytes behind a live preview, for rendering.
    pub fn resolve(&self, id: PreviewId) -> Option<Bytes> {
        self.live.lock().get(&id).cloned()
    }
}

impl PreviewStore for PreviewRegistry {
    fn create(&self, file: &ReceiptFile) -> Result<PreviewId> {
        let id = PreviewId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.live.lock().insert(id, file.bytes.clone());
        debug!("created {id} for {}", file.file_name);
        Ok(id)
    }

    fn release(&self, id: PreviewId) -> Result<()> {
        match self.live.lock().remove(&id) {
            Some(_) => {
                debug!("released {id}");
                Ok(())
            }
            None => Err(RegistrationError::Preview(format!("{id} is not live"))),
        }
    }
}

/// Owning reference to a live preview. Released on drop.
pub struct PreviewHandle {
    id: PreviewId,
    store: Arc<dyn PreviewStore>,
}

impl PreviewHandle {
    pub fn id(&self) -> PreviewId {
        self.id
    }
}

impl fmt::Debug for PreviewHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PreviewHandle").field(&self.id).finish()
    }
}

impl Drop for PreviewHandle {
    fn drop(&mut self) {
        // Only memory reclamation is at stake here.
        if let Err(e) = self.store.release(self.id) {
            warn!("failed to release {}: {e}", self.id);
        }
    }
}

// ─────────────────────────────────────────────────────────
// Attachment slot
// ─────────────────────────────────────────────────────────

#[derive(Debug)]
struct PaymentAttachment {
    file: ReceiptFile,
    preview: Option<PreviewHandle>,
}

/// Holds at most one receipt together with its preview.
pub struct AttachmentSlot {
    store: Arc<dyn PreviewStore>,
    current: Option<PaymentAttachment>,
}

impl AttachmentSlot {
    pub fn new(store: Arc<dyn PreviewStore>) -> Self {
        Self {
            store,
            current: None,
        }
    }

    pub fn file(&self) -> Option<&ReceiptFile> {
        self.current.as_ref().map(|a| &a.file)
    }

    pub fn preview(&self) -> Option<PreviewId> {
        self.current
            .as_ref()
            .and_then(|a| a.preview.as_ref())
            .map(PreviewHandle::id)
    }

    pub fn is_empty(&self) -> bool {
        self.current.is_none()
    }

    /// Store `file` as the receipt. A disallowed media type leaves the slot as
    /// it was and returns [`RegistrationError::UnsupportedMediaType`].
    pub fn attach(&mut self, file: ReceiptFile) -> Result<()> {
        if !is_accepted_media_type(&file.media_type) {
            return Err(RegistrationError::UnsupportedMediaType(file.media_type));
        }

        // Old preview goes before the new one is created.
        self.clear();

        let preview = if file.is_image() {
            match self.store.create(&file) {
                Ok(id) => Some(PreviewHandle {
                    id,
                    store: Arc::clone(&self.store),
                }),
                Err(e) => {
                    warn!("no preview for {}: {e}", file.file_name);
                    None
                }
            }
        } else {
            None
        };

        self.current = Some(PaymentAttachment { file, preview });
        Ok(())
    }

    /// Drop the receipt and its preview. Safe on an empty slot.
    pub fn clear(&mut self) {
        self.current = None;
    }
}

impl fmt::Debug for AttachmentSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AttachmentSlot")
            .field("current", &self.current)
            .finish()
    }
}
