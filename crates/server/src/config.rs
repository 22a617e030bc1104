//! Server settings, from flags or environment.

use clap::Parser;
use docx2mdx_core::ConvertConfig;

/// 10 MiB
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Upload server that converts Word documents to MDX
#[derive(Parser, Debug, Clone)]
#[command(name = "docx2mdx-server")]
#[command(version)]
#[command(about = "HTTP upload server for docx2mdx", long_about = None)]
pub struct ServerConfig {
    /// Address to bind
    #[arg(long, env = "DOCX2MDX_ADDR", default_value = "127.0.0.1:3000")]
    pub addr: String,

    /// Largest accepted upload, in bytes
    #[arg(long, env = "DOCX2MDX_MAX_UPLOAD_BYTES", default_value_t = DEFAULT_MAX_UPLOAD_BYTES)]
    pub max_upload_bytes: usize,

    /// Front-matter description
    #[arg(long, env = "DOCX2MDX_DESCRIPTION")]
    pub description: Option<String>,

    /// Front-matter author
    #[arg(long, env = "DOCX2MDX_AUTHOR")]
    pub author: Option<String>,
}

impl ServerConfig {
    pub fn convert_config(&self) -> ConvertConfig {
        let mut builder = ConvertConfig::builder();
        if let Some(description) = &self.description {
            builder = builder.description(description);
        }
        if let Some(author) = &self.author {
            builder = builder.author(author);
        }
        builder.build()
    }
}
