use anyhow::{Context, Result};
use flate2::read::MultiGzDecoder;
use memmap2::Mmap;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::Path;

const STREAM_BUF: usize = 1024 * 1024;

pub struct MmapSource {
    mmap: Mmap,
}

impl MmapSource {
    pub fn open(path: &Path) -> Result<Self> {
        let file =
            File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
        // SAFETY: read-only file mapping.
        let mmap = unsafe { Mmap::map(&file) }.with_context(|| "mmap failed")?;
        Ok(Self { mmap })
    }

    pub fn bytes(&self) -> &[u8] {
        &self.mmap
    }

    pub fn len(&self) -> usize {
        self.mmap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mmap.is_empty()
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum InputKind {
    Stdin,
    Plain,
    Gzip,
}

/// A single-pass source of input lines.
///
/// Plain files are memory-mapped and split in place; stdin and gzip input go
/// through a buffered reader. Line terminators (`\n`, `\r\n`) are stripped.
pub enum InputSource {
    Mmap { source: MmapSource, pos: usize },
    Stream { reader: Box<dyn BufRead>, buf: Vec<u8> },
}

impl InputSource {
    /// Opens `path`, treating `-` as stdin.
    pub fn open(path: &Path) -> Result<(Self, InputKind)> {
        let kind = detect_input_kind(path)?;
        let source = match kind {
            InputKind::Stdin => Self::from_reader(io::stdin().lock()),
            InputKind::Gzip => Self::from_reader(open_gzip_reader(path)?),
            InputKind::Plain => {
                let len = std::fs::metadata(path)
                    .with_context(|| format!("failed to stat {}", path.display()))?
                    .len();
                if len == 0 {
                    // zero-length files cannot be mapped on every platform
                    Self::from_reader(io::empty())
                } else {
                    InputSource::Mmap {
                        source: MmapSource::open(path)?,
                        pos: 0,
                    }
                }
            }
        };
        Ok((source, kind))
    }

    pub fn from_reader<R: Read + 'static>(reader: R) -> Self {
        InputSource::Stream {
            reader: Box::new(BufReader::with_capacity(STREAM_BUF, reader)),
            buf: Vec::new(),
        }
    }

    /// Returns the next line without its terminator, or `None` at end of input.
    pub fn next_line(&mut self) -> Result<Option<&[u8]>> {
        match self {
            InputSource::Mmap { source, pos } => {
                let bytes = source.bytes();
                if *pos >= bytes.len() {
                    return Ok(None);
                }
                let start = *pos;
                let end = memchr::memchr(b'\n', &bytes[start..])
                    .map(|i| start + i)
                    .unwrap_or(bytes.len());
                *pos = end + 1;
                Ok(Some(trim_cr(&bytes[start..end])))
            }
            InputSource::Stream { reader, buf } => {
                buf.clear();
                let n = reader
                    .read_until(b'\n', buf)
                    .with_context(|| "failed to read input line")?;
                if n == 0 {
                    return Ok(None);
                }
                let line: &[u8] = buf;
                let line = line.strip_suffix(b"\n").unwrap_or(line);
                Ok(Some(trim_cr(line)))
            }
        }
    }
}

fn trim_cr(line: &[u8]) -> &[u8] {
    line.strip_suffix(b"\r").unwrap_or(line)
}

pub fn detect_input_kind(path: &Path) -> Result<InputKind> {
    if path.as_os_str() == "-" {
        return Ok(InputKind::Stdin);
    }
    if let Some(ext) = path.extension().and_then(|s| s.to_str()) {
        let ext = ext.to_ascii_lowercase();
        if ext == "gz" {
            return Ok(InputKind::Gzip);
        }
    }
    let mut file =
        File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let mut magic = [0u8; 2];
    let n = file
        .read(&mut magic)
        .with_context(|| "failed to read magic bytes")?;
    if n == 2 && magic == [0x1f, 0x8b] {
        Ok(InputKind::Gzip)
    } else {
        Ok(InputKind::Plain)
    }
}

pub fn open_gzip_reader(path: &Path) -> Result<MultiGzDecoder<BufReader<File>>> {
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    Ok(MultiGzDecoder::new(BufReader::new(file)))
}
