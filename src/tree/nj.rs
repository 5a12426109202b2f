use anyhow::{bail, Result};

use super::newick::{self, Node};
use super::{InferConfig, TreeBuilder};
use crate::msa::Alignment;
use crate::util::dna;

/// 饱和或无可比位点时使用的距离上限
pub const MAX_DISTANCE: f64 = 3.0;

/// 内置邻接法（Jukes-Cantor 距离 + Saitou-Nei NJ）
#[derive(Debug, Default, Clone, Copy)]
pub struct NeighborJoining;

impl TreeBuilder for NeighborJoining {
    fn name(&self) -> &str {
        "nj"
    }

    fn infer(&self, aln: &Alignment, cfg: &InferConfig) -> Result<String> {
        if cfg.bootstrap > 0 {
            bail!("built-in NJ engine does not run internal bootstrap (got {})", cfg.bootstrap);
        }
        if !cfg.nucleotide {
            bail!("built-in NJ engine only supports nucleotide alignments");
        }
        if aln.num_seqs() < 2 {
            bail!("need at least 2 sequences to build a tree, got {}", aln.num_seqs());
        }
        if aln.is_empty() {
            bail!("cannot build a tree from a zero-length alignment");
        }
        let dist = jc_distance_matrix(aln);
        Ok(neighbor_joining(aln.names(), &dist))
    }
}

/// Jukes-Cantor 校正距离，仅统计两条序列均为 A/C/G/T 的位点
pub fn jc_distance(a: &[u8], b: &[u8]) -> f64 {
    let mut valid = 0usize;
    let mut diff = 0usize;
    for (&x, &y) in a.iter().zip(b) {
        if let (Some(cx), Some(cy)) = (dna::base_code(x), dna::base_code(y)) {
            valid += 1;
            if cx != cy {
                diff += 1;
            }
        }
    }
    if valid == 0 {
        return MAX_DISTANCE;
    }
    let p = diff as f64 / valid as f64;
    let arg = 1.0 - 4.0 * p / 3.0;
    if arg <= 0.0 {
        return MAX_DISTANCE;
    }
    (-0.75 * arg.ln()).min(MAX_DISTANCE)
}

/// 行优先的 n×n 对称矩阵
pub fn jc_distance_matrix(aln: &Alignment) -> Vec<f64> {
    let n = aln.num_seqs();
    let rows = aln.rows();
    let mut d = vec![0.0f64; n * n];
    for i in 0..n {
        for j in (i + 1)..n {
            let v = jc_distance(&rows[i], &rows[j]);
            d[i * n + j] = v;
            d[j * n + i] = v;
        }
    }
    d
}

/// 对 `labels.len()` 个叶子做 NJ，返回无根树（根为三叉节点）的 Newick
pub fn neighbor_joining(labels: &[String], dist: &[f64]) -> String {
    let n = labels.len();
    debug_assert!(n >= 2);
    debug_assert_eq!(dist.len(), n * n);

    let mut nodes: Vec<Node> = labels.iter().map(|l| Node::leaf(l)).collect();
    if n == 2 {
        let half = dist[1].max(0.0) / 2.0;
        nodes[0].branch_length = Some(half);
        nodes[1].branch_length = Some(half);
        nodes.push(Node::internal(vec![0, 1]));
        return newick::to_newick(&nodes, 2);
    }

    // Working matrix sized for every node ever created: n leaves + n-3 joins
    let cap = 2 * n - 2;
    let mut d = vec![0.0f64; cap * cap];
    for i in 0..n {
        for j in 0..n {
            d[i * cap + j] = dist[i * n + j];
        }
    }

    let mut active: Vec<usize> = (0..n).collect();
    let mut row_sum = vec![0.0f64; cap];

    while active.len() > 3 {
        let r = active.len() as f64;
        for &i in &active {
            row_sum[i] = active.iter().map(|&j| d[i * cap + j]).sum();
        }

        let mut best = (f64::INFINITY, 0usize, 0usize);
        for (ai, &i) in active.iter().enumerate() {
            for &j in &active[(ai + 1)..] {
                let q = (r - 2.0) * d[i * cap + j] - row_sum[i] - row_sum[j];
                if q < best.0 {
                    best = (q, i, j);
                }
            }
        }
        let (_, i, j) = best;

        let dij = d[i * cap + j];
        let li = dij / 2.0 + (row_sum[i] - row_sum[j]) / (2.0 * (r - 2.0));
        let lj = dij - li;

        let u = nodes.len();
        nodes.push(Node::internal(vec![i, j]));
        nodes[i].branch_length = Some(li.max(0.0));
        nodes[j].branch_length = Some(lj.max(0.0));

        for &k in &active {
            if k == i || k == j {
                continue;
            }
            let duk = (d[i * cap + k] + d[j * cap + k] - dij) / 2.0;
            d[u * cap + k] = duk;
            d[k * cap + u] = duk;
        }

        active.retain(|&x| x != i && x != j);
        active.push(u);
    }

    let (a, b, c) = (active[0], active[1], active[2]);
    let dab = d[a * cap + b];
    let dac = d[a * cap + c];
    let dbc = d[b * cap + c];
    nodes[a].branch_length = Some(((dab + dac - dbc) / 2.0).max(0.0));
    nodes[b].branch_length = Some(((dab + dbc - dac) / 2.0).max(0.0));
    nodes[c].branch_length = Some(((dac + dbc - dab) / 2.0).max(0.0));

    let root = nodes.len();
    nodes.push(Node::internal(vec![a, b, c]));
    newick::to_newick(&nodes, root)
}
