//! 树推断引擎
//!
//! 抽象为单一操作 [`TreeBuilder::infer`]，调度器只依赖该 trait，
//! 可替换外部程序（FastTree）或内置的邻接法。

use anyhow::Result;

use crate::msa::Alignment;

pub mod fasttree;
pub mod newick;
pub mod nj;

pub use fasttree::FastTree;
pub use nj::NeighborJoining;

/// 推断参数
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InferConfig {
    /// 引擎内部 bootstrap 次数；列重抽样已由调用方完成，默认 0
    pub bootstrap: u32,
    /// 核苷酸模型（FastTree `-nt`）
    pub nucleotide: bool,
    /// 追加给外部程序的原样参数
    pub extra_args: Vec<String>,
}

impl Default for InferConfig {
    fn default() -> Self {
        Self {
            bootstrap: 0,
            nucleotide: true,
            extra_args: Vec::new(),
        }
    }
}

/// One alignment in, one Newick tree out (terminated by `;` and a newline).
///
/// Implementations are shared across worker threads and must not rely on
/// exclusive access to any global resource.
pub trait TreeBuilder: Send + Sync {
    fn name(&self) -> &str;

    fn infer(&self, aln: &Alignment, cfg: &InferConfig) -> Result<String>;
}
