//! External tools the pipeline drives, behind traits so tests can swap them out

use std::path::Path;

use crate::{
    domain::item::ItemId,
    tools::{error::ToolError, process::ToolOutput},
};

pub mod demucs;
pub mod error;
pub mod process;
pub mod ytdlp;

#[cfg(test)]
pub(crate) mod fake;

/// Downloads audio of items
pub trait Retriever {
    /// Lists the item ids of a collection without downloading anything
    fn list(&self, collection_url: &str) -> Result<Vec<ItemId>, ToolError>;

    /// Downloads one item into `dest_dir`, the file named after the item title
    fn fetch_one(&self, id: &ItemId, dest_dir: &Path) -> Result<(), ToolError>;
}

/// Splits an audio file into stems
pub trait StemSplitter {
    fn separate_one(&self, audio: &Path, out_dir: &Path) -> Result<ToolOutput, ToolError>;
}

impl<T: Retriever + ?Sized> Retriever for &T {
    fn list(&self, collection_url: &str) -> Result<Vec<ItemId>, ToolError> {
        (**self).list(collection_url)
    }

    fn fetch_one(&self, id: &ItemId, dest_dir: &Path) -> Result<(), ToolError> {
        (**self).fetch_one(id, dest_dir)
    }
}

impl<T: StemSplitter + ?Sized> StemSplitter for &T {
    fn separate_one(&self, audio: &Path, out_dir: &Path) -> Result<ToolOutput, ToolError> {
        (**self).separate_one(audio, out_dir)
    }
}
