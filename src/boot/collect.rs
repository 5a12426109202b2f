use anyhow::{anyhow, Result};
use std::io::Write;
use std::path::Path;

/// 按给定顺序把各树文件的原始字节拷贝到 `out`，不做任何解析或改写
///
/// 返回拷贝的总字节数。
pub fn concat_trees<P, W>(paths: &[P], out: &mut W) -> Result<u64>
where
    P: AsRef<Path>,
    W: Write + ?Sized,
{
    let mut total = 0u64;
    for p in paths {
        let p = p.as_ref();
        let mut fh = std::fs::File::open(p)
            .map_err(|e| anyhow!("cannot open tree file '{}': {}", p.display(), e))?;
        total += std::io::copy(&mut fh, out)
            .map_err(|e| anyhow!("cannot copy tree file '{}': {}", p.display(), e))?;
    }
    out.flush()?;
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn concatenates_in_given_order_without_separators() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("boot1.nwk");
        let b = dir.path().join("boot2.nwk");
        std::fs::write(&a, "(x,y);\n").unwrap();
        std::fs::write(&b, "(y,x);").unwrap();

        let mut out: Vec<u8> = Vec::new();
        let n = concat_trees(&[&b, &a], &mut out).unwrap();
        assert_eq!(out, b"(y,x);(x,y);\n");
        assert_eq!(n, out.len() as u64);
    }

    #[test]
    fn collecting_twice_is_identical() {
        let dir = tempfile::tempdir().unwrap();
        let paths: Vec<_> = (1..=3)
            .map(|i| {
                let p = dir.path().join(format!("boot{i}.nwk"));
                std::fs::write(&p, format!("(a{i},b,c);\n")).unwrap();
                p
            })
            .collect();

        let mut first: Vec<u8> = Vec::new();
        let mut second: Vec<u8> = Vec::new();
        concat_trees(&paths, &mut first).unwrap();
        concat_trees(&paths, &mut second).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn empty_list_writes_nothing() {
        let mut out: Vec<u8> = Vec::new();
        assert_eq!(concat_trees::<&Path, _>(&[], &mut out).unwrap(), 0);
        assert!(out.is_empty());
    }

    #[test]
    fn missing_file_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let gone = dir.path().join("boot9.nwk");
        let err = concat_trees(&[&gone], &mut Vec::<u8>::new()).unwrap_err();
        assert!(err.to_string().contains("boot9.nwk"));
    }
}
