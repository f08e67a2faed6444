use std::ffi::{OsStr, OsString};
use std::io::{self, BufRead};
use std::path::{Path, PathBuf};

use color_eyre::eyre::{eyre, WrapErr};
use color_eyre::Result;
use csv::{QuoteStyle, Writer, WriterBuilder};

/// Lines of a tab separated file with `#` headers and blank lines skipped.
/// Every item carries its 1-based line number in the file.
pub struct DataLines<R> {
    reader: R,
    buf: Vec<u8>,
    line_no: usize,
}

impl<R: BufRead> DataLines<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buf: Vec::new(),
            line_no: 0,
        }
    }
}

impl<R: BufRead> Iterator for DataLines<R> {
    type Item = io::Result<(usize, String)>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = match read_lossy_line(&mut self.reader, &mut self.buf) {
                Ok(line) => line?,
                Err(e) => return Some(Err(e)),
            };
            self.line_no += 1;

            if line.starts_with('#') || line.trim().is_empty() {
                continue;
            }

            return Some(Ok((self.line_no, line)));
        }
    }
}

/// Next line without its line ending, `None` at end of input.
/// Bytes that are not valid UTF-8 are replaced with U+FFFD instead of failing the read.
pub fn read_lossy_line<R: BufRead>(
    reader: &mut R,
    buf: &mut Vec<u8>,
) -> io::Result<Option<String>> {
    buf.clear();
    if reader.read_until(b'\n', buf)? == 0 {
        return Ok(None);
    }

    if buf.ends_with(b"\n") {
        buf.pop();
        if buf.ends_with(b"\r") {
            buf.pop();
        }
    }

    Ok(Some(String::from_utf8_lossy(buf).into_owned()))
}

pub fn read_data_lines(path: &Path) -> Result<DataLines<io::BufReader<Box<dyn io::Read>>>> {
    let input = get_input(Some(path.to_path_buf()))?;
    Ok(DataLines::new(io::BufReader::new(input)))
}

pub fn get_tsv_writer<W: io::Write>(output: W) -> Writer<W> {
    WriterBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .flexible(true)
        .double_quote(false)
        .quote_style(QuoteStyle::Never)
        .from_writer(output)
}

pub fn get_input(filename: Option<PathBuf>) -> Result<Box<dyn io::Read>> {
    let input: Box<dyn io::Read> = match filename {
        Some(name) => match name.to_str() {
            Some("-") => Box::new(io::stdin()),
            Some(name) => {
                let r = match niffler::from_path(name) {
                    Ok(x) => x.0,
                    Err(err) => {
                        let msg = format!("failed to open \"{name}\": {err}");
                        return Err(eyre!(msg))?;
                    }
                };
                Box::new(r)
            }
            None => return Err(eyre!("Unknown I/O error")),
        },
        None => Box::new(io::stdin()),
    };
    Ok(input)
}

pub fn get_output(filename: Option<PathBuf>) -> Result<Box<dyn io::Write>> {
    let output: Box<dyn io::Write> = match filename {
        Some(name) => match name.to_str() {
            Some("-") => Box::new(io::stdout()),
            Some(name) => Box::new(
                match std::fs::File::options()
                    .create(true)
                    .write(true)
                    .truncate(true)
                    .open(name)
                {
                    Ok(x) => io::BufWriter::new(x),
                    Err(err) => return Err(eyre!("failed to open \"{name}\": {err}"))?,
                },
            ),
            None => return Err(eyre!("Unknown I/O error")),
        },
        None => Box::new(io::stdout()),
    };
    Ok(output)
}

pub fn open_tsv_writer(name: PathBuf) -> Result<Writer<Box<dyn io::Write>>> {
    Ok(get_tsv_writer(get_output(Some(name))?))
}

pub fn create_output_dir(output: &Path) -> Result<()> {
    std::fs::create_dir_all(output).wrap_err(eyre!("Error creating directory {output:?}"))
}

/// Glue `name` and `suffix` to the end of a path prefix, e.g. `out/cov_` + `chr01` + `svg`
pub fn prefixed_output(prefix: &Path, name: &str, suffix: &str) -> PathBuf {
    let mut os_string: OsString = prefix.into();
    os_string.push(name);
    os_string.push(".");
    os_string.push(suffix);
    os_string.into()
}

pub fn append_ext(ext: impl AsRef<OsStr>, path: &Path) -> PathBuf {
    let mut os_string: OsString = path.into();
    os_string.push(".");
    os_string.push(ext.as_ref());
    os_string.into()
}
