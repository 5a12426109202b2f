//! # boot-trees
//!
//! 为 DNA 多序列比对生成逐个的 bootstrap 系统发育树。
//!
//! FastTree 只在最终树上标注 bootstrap 支持度，不会输出每个重复的树；
//! 本 crate 自行完成列重抽样，对每个重复调用建树引擎（关闭其内部 bootstrap），
//! 最后按重复编号顺序把所有 Newick 树写到标准输出。
//!
//! - **比对加载**：FASTA → [`msa::Alignment`]（名称唯一、等长校验）
//! - **列重抽样**：有放回抽取列下标，每个重复独立播种
//! - **建树**：[`tree::TreeBuilder`] trait，外部 FastTree 或内置邻接法
//! - **调度与汇总**：顺序或线程池并行，临时目录在任何退出路径上都会清理
//!
//! ## 快速示例
//!
//! ```rust,no_run
//! use boot_trees::boot::{bootstrap_trees, BootOpt};
//! use boot_trees::msa::load_alignment;
//! use boot_trees::tree::{InferConfig, NeighborJoining};
//!
//! let aln = load_alignment("aln.fasta")?;
//! let opt = BootOpt { replicates: 10, threads: 4, seed: Some(1), ..BootOpt::default() };
//! let mut out = std::io::stdout().lock();
//! let n = bootstrap_trees(&aln, &NeighborJoining, &InferConfig::default(), &opt, &mut out)?;
//! eprintln!("{} trees", n);
//! # Ok::<(), anyhow::Error>(())
//! ```
//!
//! ## 模块说明
//!
//! - [`io`] — FASTA 读写
//! - [`msa`] — 比对模型与 bootstrap 列重抽样
//! - [`tree`] — 建树引擎（FastTree / 邻接法）与 Newick 输出
//! - [`boot`] — 重复调度与树文件汇总
//! - [`util`] — DNA 字符工具函数

pub mod io;
pub mod msa;
pub mod tree;
pub mod boot;
pub mod util;
