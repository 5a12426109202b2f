use anyhow::{anyhow, bail, Context, Result};
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};

use super::{InferConfig, TreeBuilder};
use crate::io::fasta::write_fasta;
use crate::msa::Alignment;

/// 覆盖 FastTree 可执行文件路径的环境变量
pub const FASTTREE_ENV_BIN: &str = "FASTTREE_BIN";
pub const DEFAULT_FASTTREE_BIN: &str = "FastTree";

/// 调用外部 FastTree：比对经 stdin 以 FASTA 输入，树从 stdout 读出
#[derive(Debug, Clone)]
pub struct FastTree {
    program: PathBuf,
}

impl FastTree {
    /// Explicit path wins, then `$FASTTREE_BIN`, then `FastTree` on `PATH`.
    pub fn new(program: Option<PathBuf>) -> Self {
        let program = program
            .or_else(|| std::env::var_os(FASTTREE_ENV_BIN).map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_FASTTREE_BIN));
        Self { program }
    }

    pub fn program(&self) -> &std::path::Path {
        &self.program
    }

    pub fn args(cfg: &InferConfig) -> Vec<String> {
        let mut args = vec!["-quiet".to_string(), "-nopr".to_string()];
        if cfg.nucleotide {
            args.push("-nt".to_string());
        }
        args.push("-boot".to_string());
        args.push(cfg.bootstrap.to_string());
        args.extend(cfg.extra_args.iter().cloned());
        args
    }
}

impl TreeBuilder for FastTree {
    fn name(&self) -> &str {
        "fasttree"
    }

    fn infer(&self, aln: &Alignment, cfg: &InferConfig) -> Result<String> {
        let mut child = Command::new(&self.program)
            .args(Self::args(cfg))
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                anyhow!(
                    "cannot execute '{}' (set {} or --fasttree to override): {}",
                    self.program.display(),
                    FASTTREE_ENV_BIN,
                    e
                )
            })?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| anyhow!("FastTree stdin was not captured"))?;

        // stdin is fed from its own thread while stdout/stderr drain
        let (output, fed) = std::thread::scope(|s| -> Result<_> {
            let feeder = s.spawn(move || -> Result<()> {
                let mut w = std::io::BufWriter::new(&mut stdin);
                write_fasta(&mut w, aln.records())?;
                w.flush()?;
                Ok(())
            });
            let output = child.wait_with_output().context("waiting for FastTree")?;
            let fed = feeder
                .join()
                .map_err(|_| anyhow!("FastTree input thread panicked"))?;
            Ok((output, fed))
        })?;

        // exit status is reported ahead of any input-pipe error
        if output.status.success() {
            fed.context("writing alignment to FastTree")?;
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            let detail = if stderr.is_empty() {
                format!("exit status {}", output.status)
            } else {
                stderr
            };
            bail!("FastTree '{}' failed: {}", self.program.display(), detail);
        }

        let mut tree = String::from_utf8(output.stdout).context("FastTree wrote non-UTF-8 output")?;
        if tree.trim().is_empty() {
            bail!("FastTree '{}' produced no tree", self.program.display());
        }
        if !tree.ends_with('\n') {
            tree.push('\n');
        }
        Ok(tree)
    }
}
