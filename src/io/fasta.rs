use anyhow::{bail, Context, Result};
use std::io::{BufRead, Write};

#[derive(Debug, Clone)]
pub struct FastaRecord {
    pub id: String,
    pub desc: Option<String>,
    pub seq: Vec<u8>,
}

pub struct FastaReader<R: BufRead> {
    reader: R,
    buf: String,
    line_no: usize,
    done: bool,
    peek_header: Option<String>,
}

impl<R: BufRead> FastaReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buf: String::new(),
            line_no: 0,
            done: false,
            peek_header: None,
        }
    }

    fn read_line(&mut self) -> Result<usize> {
        self.buf.clear();
        let n = self
            .reader
            .read_line(&mut self.buf)
            .with_context(|| format!("line {}", self.line_no + 1))?;
        if n > 0 {
            self.line_no += 1;
        }
        Ok(n)
    }

    pub fn next_record(&mut self) -> Result<Option<FastaRecord>> {
        if self.done {
            return Ok(None);
        }

        // Find header line; only blank lines may precede the first one
        let header = if let Some(h) = self.peek_header.take() {
            h
        } else {
            loop {
                if self.read_line()? == 0 {
                    self.done = true;
                    return Ok(None);
                }
                if let Some(rest) = self.buf.strip_prefix('>') {
                    break rest.trim().to_string();
                }
                if !self.buf.trim().is_empty() {
                    bail!("line {}: sequence data before first '>' header", self.line_no);
                }
            }
        };

        let mut parts = header.splitn(2, char::is_whitespace);
        let id = parts.next().unwrap_or("").to_string();
        if id.is_empty() {
            bail!("line {}: empty sequence name in header", self.line_no);
        }
        let desc = parts
            .next()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        let mut seq: Vec<u8> = Vec::new();
        loop {
            if self.read_line()? == 0 {
                self.done = true;
                break;
            }
            if let Some(rest) = self.buf.strip_prefix('>') {
                self.peek_header = Some(rest.trim().to_string());
                break;
            }
            for &b in self.buf.as_bytes() {
                match b {
                    b'\n' | b'\r' | b' ' | b'\t' => {}
                    _ => seq.push(b.to_ascii_uppercase()),
                }
            }
        }

        Ok(Some(FastaRecord { id, desc, seq }))
    }
}

impl<R: BufRead> Iterator for FastaReader<R> {
    type Item = Result<FastaRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_record().transpose()
    }
}

/// Write `(name, sequence)` pairs as unwrapped FASTA.
pub fn write_fasta<'a, W, I>(out: &mut W, records: I) -> Result<()>
where
    W: Write,
    I: IntoIterator<Item = (&'a str, &'a [u8])>,
{
    for (name, seq) in records {
        writeln!(out, ">{}", name)?;
        out.write_all(seq)?;
        out.write_all(b"\n")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn parse_simple_fasta() {
        let data = b">seq1 first\nACgT-N\n>seq2\nAA.\n";
        let mut r = FastaReader::new(Cursor::new(&data[..]));

        let r1 = r.next_record().unwrap().unwrap();
        assert_eq!(r1.id, "seq1");
        assert_eq!(r1.desc.as_deref(), Some("first"));
        assert_eq!(r1.seq, b"ACGT-N");

        let r2 = r.next_record().unwrap().unwrap();
        assert_eq!(r2.id, "seq2");
        assert_eq!(r2.desc, None);
        assert_eq!(r2.seq, b"AA.");

        assert!(r.next_record().unwrap().is_none());
    }

    #[test]
    fn parse_wrapped_lines_with_crlf() {
        let data = b">a desc\r\nAC g t\r\n ac-t\r\n>b \r\n N N N \r\n";
        let mut r = FastaReader::new(Cursor::new(&data[..]));

        let r1 = r.next_record().unwrap().unwrap();
        assert_eq!(r1.id, "a");
        assert_eq!(r1.seq, b"ACGTAC-T");

        let r2 = r.next_record().unwrap().unwrap();
        assert_eq!(r2.id, "b");
        assert_eq!(r2.desc, None);
        assert_eq!(r2.seq, b"NNN");

        assert!(r.next_record().unwrap().is_none());
    }

    #[test]
    fn leading_blank_lines_are_skipped() {
        let data = b"\n\n>a\nACGT\n";
        let records: Vec<_> = FastaReader::new(Cursor::new(&data[..]))
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].seq, b"ACGT");
    }

    #[test]
    fn header_with_empty_sequence() {
        let data = b">a\n>b\n";
        let records: Vec<_> = FastaReader::new(Cursor::new(&data[..]))
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(records.len(), 2);
        assert!(records[0].seq.is_empty());
        assert!(records[1].seq.is_empty());
    }

    #[test]
    fn data_before_header_is_an_error() {
        let data = b"ACGT\n>a\nACGT\n";
        let mut r = FastaReader::new(Cursor::new(&data[..]));
        let err = r.next_record().unwrap_err();
        assert!(err.to_string().contains("line 1"));
    }

    #[test]
    fn empty_name_is_an_error() {
        let data = b">\nACGT\n";
        let mut r = FastaReader::new(Cursor::new(&data[..]));
        assert!(r.next_record().is_err());
    }

    #[test]
    fn invalid_utf8_reports_line() {
        let data = b">a\nACGT\n>b\nAC\xff\xfeT\n";
        let mut r = FastaReader::new(Cursor::new(&data[..]));
        assert_eq!(r.next_record().unwrap().unwrap().id, "a");
        let err = r.next_record().unwrap_err();
        assert!(format!("{err:#}").starts_with("line 4:"), "{err:#}");
    }

    #[test]
    fn write_then_read_back() {
        let mut buf = Vec::new();
        write_fasta(&mut buf, [("x", &b"AC-T"[..]), ("y", &b""[..])]).unwrap();
        assert_eq!(buf, b">x\nAC-T\n>y\n\n");
    }
}
