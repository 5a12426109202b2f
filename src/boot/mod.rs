//! Bootstrap 调度：列重抽样 → 建树 → 写文件 → 汇总输出

use anyhow::{anyhow, bail, Context, Result};
use rayon::prelude::*;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::msa::{self, Alignment};
use crate::tree::{InferConfig, TreeBuilder};

pub mod collect;

pub use collect::concat_trees;

/// 调度参数
#[derive(Debug, Clone)]
pub struct BootOpt {
    /// bootstrap 重复次数 B
    pub replicates: usize,
    /// 工作线程数 P（并行模式）
    pub threads: usize,
    /// 顺序执行（调试用）
    pub sequential: bool,
    /// 基础随机种子；第 i 个重复使用 `seed + i`
    pub seed: Option<u64>,
    /// 临时目录的父目录（默认系统临时目录）
    pub tmp_dir: Option<PathBuf>,
}

impl Default for BootOpt {
    fn default() -> Self {
        Self {
            replicates: 100,
            threads: 1,
            sequential: false,
            seed: None,
            tmp_dir: None,
        }
    }
}

impl BootOpt {
    pub fn resolve_seed(&self) -> u64 {
        self.seed.unwrap_or_else(rand::random)
    }
}

pub fn tree_file_name(index: usize) -> String {
    format!("boot{}.nwk", index)
}

/// 单个重复：抽样、建树、写入 `dir/boot{index}.nwk`
fn run_one<B: TreeBuilder + ?Sized>(
    index: usize,
    aln: &Alignment,
    builder: &B,
    cfg: &InferConfig,
    base_seed: u64,
    dir: &Path,
) -> Result<PathBuf> {
    log::info!("Inferring bootstrap tree: {}", index);

    let mut rng = msa::replicate_rng(base_seed, index);
    let boot = msa::bootstrap_replicate(aln, &mut rng);
    let tree = builder
        .infer(&boot, cfg)
        .with_context(|| format!("bootstrap replicate {} ({})", index, builder.name()))?;

    let path = dir.join(tree_file_name(index));
    std::fs::write(&path, tree.as_bytes())
        .map_err(|e| anyhow!("cannot write tree file '{}': {}", path.display(), e))?;
    Ok(path)
}

/// 运行重复 1..=B，返回按重复编号排列的树文件路径
///
/// 任一重复失败即中止整个运行，不返回部分结果。
pub fn run_replicates<B: TreeBuilder + ?Sized>(
    aln: &Alignment,
    builder: &B,
    cfg: &InferConfig,
    opt: &BootOpt,
    base_seed: u64,
    dir: &Path,
) -> Result<Vec<PathBuf>> {
    let indices: Vec<usize> = (1..=opt.replicates).collect();

    if opt.sequential {
        log::debug!("running {} replicates sequentially", indices.len());
        return indices
            .iter()
            .map(|&i| run_one(i, aln, builder, cfg, base_seed, dir))
            .collect();
    }

    if opt.threads == 0 {
        bail!("worker count must be at least 1");
    }
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(opt.threads)
        .thread_name(|i| format!("boot-worker-{}", i))
        .build()
        .map_err(|e| anyhow!("cannot start worker pool: {}", e))?;
    log::debug!(
        "running {} replicates on {} workers",
        indices.len(),
        opt.threads
    );

    // indexed collect keeps submission order
    pool.install(|| {
        indices
            .par_iter()
            .map(|&i| run_one(i, aln, builder, cfg, base_seed, dir))
            .collect()
    })
}

/// 完整流程：建立临时目录、运行全部重复、按顺序写出所有树
///
/// 临时目录在任何退出路径上都会被删除；B = 0 时不创建临时目录。
/// 返回写出的树数量。
pub fn bootstrap_trees<B, W>(
    aln: &Alignment,
    builder: &B,
    cfg: &InferConfig,
    opt: &BootOpt,
    out: &mut W,
) -> Result<usize>
where
    B: TreeBuilder + ?Sized,
    W: Write + ?Sized,
{
    if opt.replicates == 0 {
        log::warn!("0 bootstrap replicates requested; nothing to do");
        out.flush()?;
        return Ok(0);
    }

    let base_seed = opt.resolve_seed();
    log::info!(
        "bootstrapping {} replicates with {} (seed {})",
        opt.replicates,
        builder.name(),
        base_seed
    );

    let mut scratch = tempfile::Builder::new();
    scratch.prefix("boot-trees.");
    let scratch = match &opt.tmp_dir {
        Some(parent) => scratch.tempdir_in(parent),
        None => scratch.tempdir(),
    }
    .context("cannot create temporary directory")?;
    log::debug!("writing replicate trees to {}", scratch.path().display());

    let files = run_replicates(aln, builder, cfg, opt, base_seed, scratch.path())?;
    let bytes = concat_trees(&files, out)?;
    log::debug!("collected {} trees ({} bytes)", files.len(), bytes);

    let scratch_path = scratch.path().to_path_buf();
    scratch
        .close()
        .map_err(|e| anyhow!("cannot remove temporary directory '{}': {}", scratch_path.display(), e))?;
    Ok(files.len())
}
