// Directory-backed controller depot

use crate::document::ControllerDoc;
use crate::{DepotError, Result};
use lemachine::Controller;
use lescission::ControllerSink;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Controller document file extension
pub const CONTROLLER_EXTENSION: &str = "controller.json";

/// A depot rooted at a directory, storing one JSON document per controller.
///
/// Serves both collaborator roles around the partition engine: it loads
/// fully populated controllers for the caller and, as a [`ControllerSink`],
/// durably stores each extracted artifact.
#[derive(Debug)]
pub struct DirectoryDepot {
    root: PathBuf,
}

impl DirectoryDepot {
    /// Open a depot, creating the root directory if needed
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|source| DepotError::Io {
            context: "creating depot directory".to_string(),
            path: root.clone(),
            source,
        })?;
        Ok(Self { root })
    }

    /// The depot's root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the document stored under the given name
    pub fn controller_path(&self, name: &str) -> PathBuf {
        self.root.join(format!("{name}.{CONTROLLER_EXTENSION}"))
    }

    /// Store a controller under an explicit name, returning the written path
    pub fn save_as(&self, controller: &Controller, name: &str) -> Result<PathBuf> {
        let path = self.controller_path(name);
        Self::write_path(&path, controller)?;
        Ok(path)
    }

    /// Store a controller under its own name
    pub fn save(&self, controller: &Controller) -> Result<PathBuf> {
        self.save_as(controller, &controller.name)
    }

    /// Load a controller stored under the given name
    pub fn load(&self, name: &str) -> Result<Controller> {
        Self::load_path(&self.controller_path(name))
    }

    /// Write a controller document to an arbitrary path
    pub fn write_path(path: &Path, controller: &Controller) -> Result<()> {
        let doc = ControllerDoc::from_controller(controller);
        let json = serde_json::to_string_pretty(&doc)?;
        fs::write(path, json).map_err(|source| DepotError::Io {
            context: "writing controller document".to_string(),
            path: path.to_path_buf(),
            source,
        })?;
        info!(path = %path.display(), "stored controller document");
        Ok(())
    }

    /// Load a controller document from an arbitrary path
    pub fn load_path(path: &Path) -> Result<Controller> {
        let json = fs::read_to_string(path).map_err(|source| DepotError::Io {
            context: "reading controller document".to_string(),
            path: path.to_path_buf(),
            source,
        })?;
        let doc: ControllerDoc = serde_json::from_str(&json)?;
        doc.into_controller()
    }
}

impl ControllerSink for DirectoryDepot {
    fn persist(&mut self, controller: &Controller, name: &str) -> anyhow::Result<()> {
        self.save_as(controller, name)?;
        Ok(())
    }
}
