use std::io::BufRead;

use crate::libs::error::MafError;

/// One `s` line of a MAF block.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MafComp {
    pub src: String,
    pub start: usize, // 0-based
    pub size: usize,  // ungapped length
    pub strand: char,
    pub src_size: usize,
    pub text: String,
}

/// An alignment block: everything between an `a` line and the next blank
/// line, `a` line, or end of input.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MafBlock {
    pub score: Option<f64>,
    pub components: Vec<MafComp>,
}

impl MafBlock {
    /// Builds an empty block from the fields following the `a` tag.
    ///
    /// ```
    /// use mafsplit::libs::maf::MafBlock;
    /// assert_eq!(MafBlock::from_header(&["score=23262.0"]).score, Some(23262.0));
    /// assert_eq!(MafBlock::from_header(&["pass=2"]).score, None);
    /// ```
    pub fn from_header(fields: &[&str]) -> Self {
        let score = fields
            .iter()
            .find_map(|f| f.strip_prefix("score="))
            .and_then(|s| s.parse().ok());

        Self {
            score,
            components: vec![],
        }
    }
}

/// Parses the six fields following the `s` tag.
fn parse_comp(fields: &[&str]) -> Result<MafComp, String> {
    if fields.len() < 6 {
        return Err(format!(
            "missing field(s): expected 6 fields after 's', found {}",
            fields.len()
        ));
    }
    if fields.len() > 6 {
        return Err(format!(
            "too many fields: expected 6 fields after 's', found {}",
            fields.len()
        ));
    }

    let start: usize = fields[1]
        .parse()
        .map_err(|_| format!("Invalid start: {}", fields[1]))?;
    let size: usize = fields[2]
        .parse()
        .map_err(|_| format!("Invalid size: {}", fields[2]))?;
    let strand = fields[3].chars().next().unwrap_or('+');
    let src_size: usize = fields[4]
        .parse()
        .map_err(|_| format!("Invalid srcSize: {}", fields[4]))?;

    Ok(MafComp {
        src: fields[0].to_string(),
        start,
        size,
        strand,
        src_size,
        text: fields[5].to_string(),
    })
}

/// Streams [`MafBlock`]s out of a MAF file, one block per `next()`.
///
/// Comments, `i`/`e`/`q` lines and blocks without any `s` line are skipped.
/// The iterator stops after the first error.
pub struct MafReader<R> {
    reader: R,
    line_buf: String,
    line_no: usize,
    // opened by an `a` line that also closed the previous block
    pending: Option<MafBlock>,
    done: bool,
}

impl<R: BufRead> MafReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line_buf: String::new(),
            line_no: 0,
            pending: None,
            done: false,
        }
    }

    fn read_line(&mut self) -> Result<usize, MafError> {
        self.line_buf.clear();
        let n = self
            .reader
            .read_line(&mut self.line_buf)
            .map_err(|source| MafError::Read {
                line: self.line_no + 1,
                source,
            })?;
        if n > 0 {
            self.line_no += 1;
        }
        Ok(n)
    }

    fn format_error(&self, reason: String) -> MafError {
        MafError::Format {
            line: self.line_no,
            content: self.line_buf.trim_end_matches(['\n', '\r']).to_string(),
            reason,
        }
    }

    fn next_block(&mut self) -> Result<Option<MafBlock>, MafError> {
        let mut current = self.pending.take();

        loop {
            if self.read_line()? == 0 {
                return Ok(current.filter(|b| !b.components.is_empty()));
            }

            let parts: Vec<&str> = self.line_buf.split_whitespace().collect();
            let Some(&tag) = parts.first() else {
                // a blank line closes the block
                if let Some(block) = current.take() {
                    if !block.components.is_empty() {
                        return Ok(Some(block));
                    }
                }
                continue;
            };

            if tag.starts_with('#') {
                continue;
            }

            match tag {
                "a" => {
                    let opened = MafBlock::from_header(&parts[1..]);
                    match current.take() {
                        Some(block) if !block.components.is_empty() => {
                            self.pending = Some(opened);
                            return Ok(Some(block));
                        }
                        _ => current = Some(opened),
                    }
                }
                "s" => {
                    let comp = match parse_comp(&parts[1..]) {
                        Ok(comp) => comp,
                        Err(reason) => return Err(self.format_error(reason)),
                    };

                    if comp.strand != '+' && comp.strand != '-' {
                        log::warn!(
                            "line {}: {} has unknown strand '{}'",
                            self.line_no,
                            comp.src,
                            parts[4]
                        );
                    }

                    let ungapped = comp.text.bytes().filter(|&b| b != b'-').count();
                    if ungapped != comp.size {
                        log::warn!(
                            "line {}: {} declares size {} but has {} ungapped bases",
                            self.line_no,
                            comp.src,
                            comp.size,
                            ungapped
                        );
                    }

                    match current.as_mut() {
                        Some(block) => block.components.push(comp),
                        None => {
                            return Err(self.format_error(
                                "sequence line outside of an alignment block".to_string(),
                            ))
                        }
                    }
                }
                "i" | "e" | "q" => continue,
                _ => {
                    log::debug!("line {}: skipping unknown line type '{}'", self.line_no, tag);
                }
            }
        }
    }
}

impl<R: BufRead> Iterator for MafReader<R> {
    type Item = Result<MafBlock, MafError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        match self.next_block() {
            Ok(Some(block)) => Some(Ok(block)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}
