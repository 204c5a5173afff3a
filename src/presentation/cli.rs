use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};

use crate::domain::{Document, MediaType, ProcessingResult};

#[derive(Debug, Parser)]
#[command(name = "folio")]
#[command(version)]
#[command(about = "Turn a scanned document into topic/subtopic study notes", long_about = None)]
pub struct Cli {
    /// Input image or PDF file
    #[arg(value_name = "FILE")]
    pub input: PathBuf,

    /// Topic hint passed to content generation
    #[arg(short, long)]
    pub topic: Option<String>,

    /// Override media type detection
    #[arg(long, value_enum)]
    pub media_type: Option<MediaTypeArg>,

    /// Print only the content items array
    #[arg(long)]
    pub items_only: bool,

    /// Single-line JSON instead of pretty-printed
    #[arg(long)]
    pub compact: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MediaTypeArg {
    Image,
    Pdf,
}

impl From<MediaTypeArg> for MediaType {
    fn from(arg: MediaTypeArg) -> Self {
        match arg {
            MediaTypeArg::Image => MediaType::Image,
            MediaTypeArg::Pdf => MediaType::Pdf,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot determine media type of {0}; pass --media-type")]
    UnknownMediaType(PathBuf),
    #[error("failed to serialize result: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Explicit override first, then the file extension, then magic bytes.
pub fn resolve_media_type(
    explicit: Option<MediaTypeArg>,
    path: &Path,
    data: &[u8],
) -> Option<MediaType> {
    explicit.map(MediaType::from).or_else(|| {
        path.file_name()
            .and_then(|name| name.to_str())
            .and_then(MediaType::from_extension)
            .or_else(|| MediaType::sniff(data))
    })
}

pub async fn load_document(
    path: &Path,
    explicit: Option<MediaTypeArg>,
) -> Result<Document, CliError> {
    let data = tokio::fs::read(path).await.map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let media_type = resolve_media_type(explicit, path, &data)
        .ok_or_else(|| CliError::UnknownMediaType(path.to_path_buf()))?;

    let filename = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    Ok(Document::new(filename, media_type, data))
}

pub fn render_output(
    result: &ProcessingResult,
    items_only: bool,
    compact: bool,
) -> Result<String, CliError> {
    let value = if items_only {
        serde_json::to_value(result.content_items())?
    } else {
        serde_json::to_value(result)?
    };

    let rendered = if compact {
        serde_json::to_string(&value)?
    } else {
        serde_json::to_string_pretty(&value)?
    };
    Ok(rendered)
}
