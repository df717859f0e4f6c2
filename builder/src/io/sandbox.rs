//! Sandbox abstraction for mounting projected forests.
//!
//! The [`Sandbox`] trait is the builder's only outbound contract: it receives
//! a complete mount descriptor each time the forest changes. Tests use a
//! recording sandbox; [`DirectorySandbox`] materializes descriptors on disk.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use tracing::{debug, info, instrument};

use crate::core::mount::{MountDescriptor, MountEntry};
use crate::io::config::SandboxConfig;

/// Target of a mount descriptor.
pub trait Sandbox {
    /// Mount `descriptor`, replacing files it names and creating missing ones.
    fn mount(&self, descriptor: &MountDescriptor) -> Result<()>;
}

/// Sandbox that writes each mount into a local directory.
///
/// Mounts overlay the directory: entries named by the descriptor are
/// created or overwritten, everything else is left in place.
#[derive(Debug, Clone)]
pub struct DirectorySandbox {
    root: PathBuf,
}

impl DirectorySandbox {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn from_config(config: &SandboxConfig) -> Self {
        Self::new(config.root.clone())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl Sandbox for DirectorySandbox {
    #[instrument(skip_all, fields(root = %self.root.display(), entries = descriptor.len()))]
    fn mount(&self, descriptor: &MountDescriptor) -> Result<()> {
        validate_names(&self.root, descriptor)?;
        fs::create_dir_all(&self.root)
            .with_context(|| format!("create sandbox root {}", self.root.display()))?;
        let written = write_entries(&self.root, descriptor)?;
        info!(files = written, "mounted descriptor");
        Ok(())
    }
}

/// Check every name in the descriptor before anything touches the disk.
fn validate_names(dir: &Path, entries: &MountDescriptor) -> Result<()> {
    for (name, entry) in entries {
        validate_entry_name(dir, name)?;
        if let MountEntry::Directory(children) = entry {
            validate_names(&dir.join(name), children)?;
        }
    }
    Ok(())
}

/// Write `entries` under `dir`, returning the number of files written.
fn write_entries(dir: &Path, entries: &MountDescriptor) -> Result<usize> {
    let mut written = 0;
    for (name, entry) in entries {
        let target = dir.join(name);
        match entry {
            MountEntry::Directory(children) => {
                fs::create_dir_all(&target)
                    .with_context(|| format!("create directory {}", target.display()))?;
                written += write_entries(&target, children)?;
            }
            MountEntry::File(file) => {
                debug!(path = %target.display(), bytes = file.contents.len(), "writing file");
                fs::write(&target, &file.contents)
                    .with_context(|| format!("write {}", target.display()))?;
                written += 1;
            }
        }
    }
    Ok(written)
}

fn validate_entry_name(dir: &Path, name: &str) -> Result<()> {
    if name.is_empty() || name == "." || name == ".." || name.contains(['/', '\\']) {
        return Err(anyhow!(
            "refusing to mount entry '{}' under {}",
            name,
            dir.display()
        ));
    }
    Ok(())
}
