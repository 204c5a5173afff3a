pub mod cli;
pub mod config;
pub mod pipeline_factory;

pub use cli::{Cli, CliError, MediaTypeArg, load_document, render_output, resolve_media_type};
pub use config::{Environment, Settings};
pub use pipeline_factory::{PipelineFactory, PipelineFactoryError, PipelineParts};
