//! 多序列比对：加载、校验与列重抽样

use anyhow::{anyhow, bail, Result};
use std::collections::HashSet;
use std::path::Path;

use crate::io::fasta::FastaReader;
use crate::util::dna;

pub mod resample;

pub use resample::{bootstrap_indices, bootstrap_replicate, replicate_rng, resample_columns};

/// 等长序列组成的比对（行 = 序列，列 = 比对位点）
///
/// 构造时保证：至少一条序列、名称唯一、所有序列长度相同。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alignment {
    names: Vec<String>,
    rows: Vec<Vec<u8>>,
    width: usize,
}

impl Alignment {
    pub fn new(names: Vec<String>, rows: Vec<Vec<u8>>) -> Result<Self> {
        if names.len() != rows.len() {
            bail!("{} names but {} sequences", names.len(), rows.len());
        }
        if names.is_empty() {
            bail!("alignment contains no sequences");
        }

        let mut seen = HashSet::with_capacity(names.len());
        for name in &names {
            if !seen.insert(name.as_str()) {
                bail!("duplicate sequence name '{}'", name);
            }
        }

        let width = rows[0].len();
        for (name, row) in names.iter().zip(&rows) {
            if row.len() != width {
                bail!(
                    "sequence '{}' has length {}, expected {} (sequences are not aligned)",
                    name,
                    row.len(),
                    width
                );
            }
        }

        Ok(Self { names, rows, width })
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn rows(&self) -> &[Vec<u8>] {
        &self.rows
    }

    pub fn num_seqs(&self) -> usize {
        self.rows.len()
    }

    /// 比对长度（列数）
    pub fn len(&self) -> usize {
        self.width
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0
    }

    pub fn column(&self, j: usize) -> Vec<u8> {
        self.rows.iter().map(|r| r[j]).collect()
    }

    /// `(name, residues)` pairs in input order.
    pub fn records(&self) -> impl Iterator<Item = (&str, &[u8])> {
        self.names
            .iter()
            .map(String::as_str)
            .zip(self.rows.iter().map(Vec::as_slice))
    }

    /// Build a new alignment with the same names and caller-supplied rows.
    /// Callers guarantee equal-length rows, one per sequence.
    pub(crate) fn with_rows(&self, rows: Vec<Vec<u8>>, width: usize) -> Self {
        debug_assert_eq!(rows.len(), self.names.len());
        debug_assert!(rows.iter().all(|r| r.len() == width));
        Self {
            names: self.names.clone(),
            rows,
            width,
        }
    }
}

/// 从 FASTA 读取 DNA 比对并校验
pub fn read_alignment<R: std::io::BufRead>(reader: R) -> Result<Alignment> {
    let mut names = Vec::new();
    let mut rows = Vec::new();

    for rec in FastaReader::new(reader) {
        let rec = rec?;
        if let Some(pos) = dna::first_invalid(&rec.seq) {
            bail!(
                "sequence '{}' has invalid DNA character '{}' at column {}",
                rec.id,
                rec.seq[pos] as char,
                pos + 1
            );
        }
        names.push(rec.id);
        rows.push(rec.seq);
    }

    Alignment::new(names, rows)
}

pub fn load_alignment<P: AsRef<Path>>(path: P) -> Result<Alignment> {
    let path = path.as_ref();
    let fh = std::fs::File::open(path)
        .map_err(|e| anyhow!("cannot open alignment '{}': {}", path.display(), e))?;
    let aln = read_alignment(std::io::BufReader::new(fh))
        .map_err(|e| anyhow!("invalid alignment '{}': {}", path.display(), e))?;

    if aln.is_empty() {
        log::warn!("alignment '{}' has zero columns", path.display());
    }
    log::info!(
        "loaded alignment '{}': {} sequences x {} columns",
        path.display(),
        aln.num_seqs(),
        aln.len()
    );
    Ok(aln)
}
