//! File glue around the detector.
//!
//! Reader: parses a `recording.safetensors` holding
//!   `data`      [C, T]  F32 or F64
//!   `sfreq`     [1]     F32 or F64
//!   `ch_names`  U8      optional, newline-separated labels
//!
//! Writers: the event catalog as JSON, and a minimal safetensors writer for
//! dumping intermediate arrays.
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{bail, Context, Result};
use ndarray::Array2;

use crate::catalog::EventCatalog;
use crate::signal::MultiChannelSignal;

// ── Low-level safetensors parser: raw bytes → ndarray ────────────────────────

struct Tensors<'a> {
    header: HashMap<String, serde_json::Value>,
    body: &'a [u8],
}

impl<'a> Tensors<'a> {
    fn parse(bytes: &'a [u8]) -> Result<Self> {
        if bytes.len() < 8 {
            bail!("safetensors file too small");
        }
        let mut len = [0u8; 8];
        len.copy_from_slice(&bytes[..8]);
        let n = u64::from_le_bytes(len) as usize;
        let header_end = 8usize.checked_add(n).filter(|&e| e <= bytes.len())
            .context("safetensors header length exceeds file size")?;
        let header: HashMap<String, serde_json::Value> =
            serde_json::from_slice(&bytes[8..header_end])
                .context("failed to parse safetensors header")?;
        Ok(Self { header, body: &bytes[header_end..] })
    }

    fn entry(&self, key: &str) -> Option<&serde_json::Value> {
        self.header.get(key)
    }

    fn raw(&self, key: &str) -> Result<(&'a [u8], &str, Vec<usize>)> {
        let entry = self.entry(key).with_context(|| format!("missing '{key}' tensor"))?;
        let dtype = entry["dtype"].as_str().with_context(|| format!("'{key}': no dtype"))?;
        let offsets = entry["data_offsets"]
            .as_array()
            .filter(|o| o.len() == 2)
            .with_context(|| format!("'{key}': bad data_offsets"))?;
        let s = offsets[0].as_u64().context("bad offset")? as usize;
        let e = offsets[1].as_u64().context("bad offset")? as usize;
        if s > e || e > self.body.len() {
            bail!("'{key}': data_offsets [{s}, {e}) outside file body ({} bytes)", self.body.len());
        }
        let shape = entry["shape"]
            .as_array()
            .with_context(|| format!("'{key}': no shape"))?
            .iter()
            .map(|v| v.as_u64().map(|d| d as usize).context("bad shape"))
            .collect::<Result<Vec<_>>>()?;
        Ok((&self.body[s..e], dtype, shape))
    }

    /// Numeric tensor as `f64`, with its shape.
    fn floats(&self, key: &str) -> Result<(Vec<f64>, Vec<usize>)> {
        let (raw, dtype, shape) = self.raw(key)?;
        let vals = match dtype {
            "F32" => raw
                .chunks_exact(4)
                .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]) as f64)
                .collect(),
            "F64" => raw
                .chunks_exact(8)
                .map(|b| f64::from_le_bytes([b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7]]))
                .collect(),
            other => bail!("'{key}': unsupported dtype {other}"),
        };
        Ok((vals, shape))
    }
}

// ── Reader ────────────────────────────────────────────────────────────────────

/// Load a continuous recording from safetensors.
///
/// Channels without a stored name are labelled `ch0`, `ch1`, ….
pub fn load_recording(path: &Path) -> Result<MultiChannelSignal> {
    let bytes = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let st = Tensors::parse(&bytes)?;

    let (data, shape) = st.floats("data")?;
    if shape.len() != 2 {
        bail!("'data' must be 2-D [channels, samples], got shape {shape:?}");
    }
    let data = Array2::from_shape_vec((shape[0], shape[1]), data.into_iter().map(|v| v as f32).collect())
        .context("'data' shape does not match its byte length")?;

    let (sfreq, _) = st.floats("sfreq")?;
    let sfreq = *sfreq.first().context("'sfreq' is empty")?;

    let labels = if st.entry("ch_names").is_some() {
        let (raw, _, _) = st.raw("ch_names")?;
        std::str::from_utf8(raw)
            .context("'ch_names' is not UTF-8")?
            .split('\n')
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect()
    } else {
        (0..data.nrows()).map(|i| format!("ch{i}")).collect()
    };

    let signal = MultiChannelSignal::new(labels, data, sfreq)
        .with_context(|| format!("invalid recording {}", path.display()))?;
    Ok(signal)
}

// ── Writers ───────────────────────────────────────────────────────────────────

/// Write the catalog as pretty-printed JSON.
pub fn write_catalog_json(catalog: &EventCatalog, path: &Path) -> Result<()> {
    let f = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut w = BufWriter::new(f);
    serde_json::to_writer_pretty(&mut w, catalog)?;
    w.write_all(b"\n")?;
    w.flush()?;
    Ok(())
}

struct StEntry {
    name: String,
    dtype: &'static str,
    shape: Vec<usize>,
    bytes: Vec<u8>,
}

/// Simple safetensors file writer for F32, F64 and U8 tensors.
///
/// ```rust,no_run
/// use ieeg_ripples::io::StWriter;
/// use std::path::Path;
/// let mut w = StWriter::new();
/// w.add_f32("envelope", &[0.1f32, 0.2, 0.3], &[1, 3]);
/// w.add_f64("sfreq", &[1000.0], &[1]);
/// w.write(Path::new("/tmp/steps.safetensors")).unwrap();
/// ```
#[derive(Default)]
pub struct StWriter {
    entries: Vec<StEntry>,
}

impl StWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_f32(&mut self, name: &str, data: &[f32], shape: &[usize]) {
        let bytes = data.iter().flat_map(|v| v.to_le_bytes()).collect();
        self.push(name, "F32", shape, bytes);
    }

    pub fn add_f32_arr2(&mut self, name: &str, arr: &Array2<f32>) {
        let data: Vec<f32> = arr.iter().copied().collect();
        self.add_f32(name, &data, &[arr.nrows(), arr.ncols()]);
    }

    pub fn add_f64(&mut self, name: &str, data: &[f64], shape: &[usize]) {
        let bytes = data.iter().flat_map(|v| v.to_le_bytes()).collect();
        self.push(name, "F64", shape, bytes);
    }

    /// Boolean mask `[C, T]` stored as U8 (0 / 1).
    pub fn add_mask(&mut self, name: &str, rows: &[Vec<bool>]) {
        let n_t = rows.first().map_or(0, Vec::len);
        let bytes = rows.iter().flatten().map(|&b| u8::from(b)).collect();
        self.push(name, "U8", &[rows.len(), n_t], bytes);
    }

    /// Newline-separated strings stored as a U8 blob.
    pub fn add_strings(&mut self, name: &str, items: &[String]) {
        let bytes: Vec<u8> = items.join("\n").into_bytes();
        let n = bytes.len();
        self.push(name, "U8", &[n], bytes);
    }

    fn push(&mut self, name: &str, dtype: &'static str, shape: &[usize], bytes: Vec<u8>) {
        self.entries.push(StEntry { name: name.to_string(), dtype, shape: shape.to_vec(), bytes });
    }

    pub fn write(&self, path: &Path) -> Result<()> {
        let mut header_map = serde_json::Map::new();
        let mut offset: usize = 0;
        for e in &self.entries {
            header_map.insert(e.name.clone(), serde_json::json!({
                "dtype": e.dtype,
                "shape": e.shape,
                "data_offsets": [offset, offset + e.bytes.len()],
            }));
            offset += e.bytes.len();
        }
        let mut hdr = serde_json::to_vec(&header_map)?;
        // Header is space-padded to an 8-byte boundary.
        let pad = (8 - hdr.len() % 8) % 8;
        hdr.extend(std::iter::repeat(b' ').take(pad));

        let f = File::create(path).with_context(|| format!("creating {}", path.display()))?;
        let mut w = BufWriter::new(f);
        w.write_all(&(hdr.len() as u64).to_le_bytes())?;
        w.write_all(&hdr)?;
        for e in &self.entries {
            w.write_all(&e.bytes)?;
        }
        w.flush()?;
        Ok(())
    }
}
