use std::sync::Arc;

use futures::future::BoxFuture;
use log::{debug, info, warn};

use crate::{
    AsyncTask, BrushSettings, CropTool, DisplayTransform, EditorImages, EncodedImage, ExportError,
    LoadError, OverlayStyle, PointerEvent, RetouchTool, Tool,
};

/// Decoding progress of the session inputs. Tools exist only once `Loaded`.
#[derive(Debug)]
pub enum LoadState {
    NotLoaded,
    Loading(AsyncTask<Result<EditorImages, LoadError>>),
    Loaded(Arc<EditorImages>),
    Error(String),
}

impl LoadState {
    /// Starts loading on first call and polls the pending load afterwards.
    pub fn update(
        &mut self,
        loader: impl FnOnce() -> BoxFuture<'static, Result<EditorImages, LoadError>>,
    ) {
        match self {
            LoadState::NotLoaded => *self = LoadState::Loading(AsyncTask::new(loader())),
            LoadState::Loading(task) => {
                if let Some(result) = task.poll_once() {
                    *self = match result {
                        Ok(images) => LoadState::Loaded(Arc::new(images)),
                        Err(e) => {
                            warn!("{e}");
                            LoadState::Error(e.to_string())
                        }
                    }
                }
            }
            LoadState::Loaded(_) | LoadState::Error(_) => {}
        }
    }

    /// Replaces the loaded inputs with the outcome of a committed edit.
    pub fn advance(&mut self, images: EditorImages) {
        info!("Editing continues on {:?}", images.dimensions());
        *self = LoadState::Loaded(Arc::new(images));
    }

    pub fn images(&self) -> Option<&Arc<EditorImages>> {
        match self {
            LoadState::Loaded(images) => Some(images),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::NotLoaded | LoadState::Loading(_))
    }
}

/// The tool currently owning the editable state.
#[derive(Debug, Default)]
pub enum ToolSession {
    #[default]
    Idle,
    Cropping(CropTool),
    Retouching(RetouchTool),
}

impl ToolSession {
    pub fn crop(images: Arc<EditorImages>, style: OverlayStyle) -> Self {
        info!("Crop session started");
        Self::Cropping(CropTool::new(images, style))
    }

    pub fn retouch(images: Arc<EditorImages>, brush: BrushSettings, show_original: bool) -> Self {
        info!("Retouch session started");
        Self::Retouching(RetouchTool::new(images, brush, show_original))
    }

    pub fn tool(&self) -> Option<&dyn Tool> {
        match self {
            ToolSession::Idle => None,
            ToolSession::Cropping(t) => Some(t),
            ToolSession::Retouching(t) => Some(t),
        }
    }

    pub fn tool_mut(&mut self) -> Option<&mut dyn Tool> {
        match self {
            ToolSession::Idle => None,
            ToolSession::Cropping(t) => Some(t),
            ToolSession::Retouching(t) => Some(t),
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, ToolSession::Idle)
    }

    pub fn handle_pointer(&mut self, event: PointerEvent, transform: &DisplayTransform) {
        if let Some(tool) = self.tool_mut() {
            tool.handle_pointer(event, transform);
        }
    }

    /// Encodes the active tool's result and ends the session. When the tool
    /// has nothing to apply the session stays as it is and `None` is returned.
    pub fn commit(&mut self) -> Result<Option<EncodedImage>, ExportError> {
        self.commit_onto(None)
    }

    /// Like [`Self::commit`], and on success moves `load_state` on to the
    /// edited images so the next session starts from the committed result.
    pub fn commit_onto(
        &mut self,
        load_state: Option<&mut LoadState>,
    ) -> Result<Option<EncodedImage>, ExportError> {
        let Some(tool) = self.tool() else {
            debug!("Commit without active tool");
            return Ok(None);
        };
        let encoded = tool.commit()?;
        if encoded.is_some() {
            info!("Session committed");
            if let (Some(load_state), Some(images)) = (load_state, tool.edited_images()) {
                load_state.advance(images);
            }
            *self = ToolSession::Idle;
        }
        Ok(encoded)
    }

    /// Drops the session's editable state without producing anything.
    pub fn cancel(&mut self) {
        if !self.is_idle() {
            info!("Session cancelled");
        }
        *self = ToolSession::Idle;
    }
}
