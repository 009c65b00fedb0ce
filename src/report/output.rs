use crate::core::error::PipelineError;
use anyhow::{Context, Result};
use flate2::Compression;
use flate2::write::GzEncoder;
use resvg::{tiny_skia, usvg as rusvg};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use svg2pdf::usvg;
use svg2pdf::{ConversionOptions, PageOptions};

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum OutputFormat {
    #[default]
    Png,
    Svg,
    Svgz,
    Pdf,
}

impl OutputFormat {
    pub const ALL: [OutputFormat; 4] = [
        OutputFormat::Png,
        OutputFormat::Svg,
        OutputFormat::Svgz,
        OutputFormat::Pdf,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            OutputFormat::Png => "png",
            OutputFormat::Svg => "svg",
            OutputFormat::Svgz => "svgz",
            OutputFormat::Pdf => "pdf",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OutputFormat::ALL
            .into_iter()
            .find(|f| f.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| PipelineError::UnsupportedFormat(s.to_string()))
    }
}

/// Encodes a finished SVG document into `format`.
pub fn encode(svg: &str, format: OutputFormat) -> Result<Vec<u8>> {
    match format {
        OutputFormat::Svg => Ok(svg.as_bytes().to_vec()),
        OutputFormat::Svgz => svg_to_svgz(svg),
        OutputFormat::Pdf => svg_to_pdf(svg),
        OutputFormat::Png => svg_to_png(svg),
    }
}

fn svg_to_svgz(svg: &str) -> Result<Vec<u8>> {
    let mut enc = GzEncoder::new(Vec::new(), Compression::default());
    enc.write_all(svg.as_bytes())
        .with_context(|| "gzip compression failed")?;
    enc.finish().with_context(|| "gzip compression failed")
}

fn svg_to_pdf(svg: &str) -> Result<Vec<u8>> {
    let mut opt = usvg::Options::default();
    opt.fontdb_mut().load_system_fonts();
    let tree =
        usvg::Tree::from_str(svg, &opt).map_err(|e| anyhow::anyhow!("usvg parse failed: {e}"))?;
    let pdf = svg2pdf::to_pdf(&tree, ConversionOptions::default(), PageOptions::default())
        .map_err(|e| anyhow::anyhow!("svg2pdf conversion failed: {e}"))?;
    Ok(pdf)
}

fn svg_to_png(svg: &str) -> Result<Vec<u8>> {
    let mut opt = rusvg::Options::default();
    opt.fontdb_mut().load_system_fonts();
    let tree =
        rusvg::Tree::from_str(svg, &opt).map_err(|e| anyhow::anyhow!("usvg parse failed: {e}"))?;
    let size = tree.size().to_int_size();
    let mut pixmap = tiny_skia::Pixmap::new(size.width(), size.height())
        .ok_or_else(|| anyhow::anyhow!("pixmap allocation failed"))?;
    resvg::render(&tree, tiny_skia::Transform::default(), &mut pixmap.as_mut());
    pixmap
        .encode_png()
        .map_err(|e| anyhow::anyhow!("png encoding failed: {e}"))
}

/// Where the encoded chart goes; `-` means stdout.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Destination {
    Stdout,
    File(PathBuf),
}

impl Destination {
    pub fn from_path(path: &Path) -> Self {
        if path.as_os_str() == "-" {
            Destination::Stdout
        } else {
            Destination::File(path.to_path_buf())
        }
    }

    /// Writes `bytes` in full or not at all.
    ///
    /// Files are staged next to the target and renamed into place.
    pub fn write(&self, bytes: &[u8]) -> Result<()> {
        match self {
            Destination::Stdout => {
                let mut out = io::stdout().lock();
                out.write_all(bytes)
                    .and_then(|_| out.flush())
                    .with_context(|| "failed to write chart to stdout")
            }
            Destination::File(path) => write_atomic(path, bytes),
        }
    }
}

fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let mut tmp_name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    tmp_name.push(".tmp");
    let tmp_path = path.with_file_name(tmp_name);

    let result = fs::write(&tmp_path, bytes)
        .with_context(|| format!("failed to write {}", tmp_path.display()))
        .and_then(|_| {
            fs::rename(&tmp_path, path)
                .with_context(|| format!("failed to move chart to {}", path.display()))
        });
    if result.is_err() {
        let _ = fs::remove_file(&tmp_path);
    }
    result
}
