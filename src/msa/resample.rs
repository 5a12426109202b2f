use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::Alignment;

/// 有放回地从 `[0, len)` 中均匀抽取 `len` 个列下标（非参数 bootstrap）
pub fn bootstrap_indices<R: Rng + ?Sized>(rng: &mut R, len: usize) -> Vec<usize> {
    if len == 0 {
        return Vec::new();
    }
    (0..len).map(|_| rng.random_range(0..len)).collect()
}

/// 输出第 j 列 = 输入第 `idx[j]` 列
///
/// # Panics
/// 任一下标 `>= aln.len()` 时 panic。
pub fn resample_columns(aln: &Alignment, idx: &[usize]) -> Alignment {
    let rows = aln
        .rows()
        .iter()
        .map(|row| idx.iter().map(|&j| row[j]).collect())
        .collect();
    aln.with_rows(rows, idx.len())
}

pub fn bootstrap_replicate<R: Rng + ?Sized>(aln: &Alignment, rng: &mut R) -> Alignment {
    let idx = bootstrap_indices(rng, aln.len());
    resample_columns(aln, &idx)
}

/// Generator for replicate `index`, independent of which worker runs it.
pub fn replicate_rng(base_seed: u64, index: usize) -> StdRng {
    StdRng::seed_from_u64(base_seed.wrapping_add(index as u64))
}
