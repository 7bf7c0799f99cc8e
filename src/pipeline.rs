use std::io::{BufRead, Write};

use anyhow::{Context, Result};

use reconlog_logs::{RecordFilter, RecordParser, Reassembler};
use reconlog_render::Renderer;

/// Counters for one pipeline run
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PipelineStats {
    /// Logical lines after reassembly
    pub lines: u64,
    /// Records rendered
    pub rendered: u64,
    /// Records dropped by the filter
    pub filtered: u64,
    /// Lines printed unmodified
    pub passed_through: u64,
}

/// Single-pass driver: reassemble, parse, filter, render, print
pub struct LogPipeline<'a> {
    filter: &'a RecordFilter,
    renderer: Renderer,
    reassembler: Reassembler,
    stats: PipelineStats,
}

impl<'a> LogPipeline<'a> {
    pub fn new(filter: &'a RecordFilter, renderer: Renderer) -> Self {
        Self {
            filter,
            renderer,
            reassembler: Reassembler::new(),
            stats: PipelineStats::default(),
        }
    }

    /// Process `reader` to EOF, writing one line per kept record to `out`
    pub fn run<R: BufRead, W: Write>(&mut self, mut reader: R, out: &mut W) -> Result<PipelineStats> {
        let mut buf = Vec::new();

        loop {
            buf.clear();
            let read = reader
                .read_until(b'\n', &mut buf)
                .context("failed to read input")?;
            if read == 0 {
                break;
            }

            if let Some(logical) = self.reassembler.push(trim_newline(&buf)) {
                self.process(&logical, out)?;
            }
        }

        if let Some(partial) = self.reassembler.finish() {
            self.process(&partial, out)?;
        }

        Ok(self.stats)
    }

    /// Handle one logical line; unparsable lines are written back byte for byte
    fn process<W: Write>(&mut self, raw: &[u8], out: &mut W) -> Result<()> {
        self.stats.lines += 1;

        let line = String::from_utf8_lossy(raw);
        let written = match RecordParser::parse(&line) {
            Ok(record) => {
                if !self.filter.keep(&record) {
                    self.stats.filtered += 1;
                    return Ok(());
                }
                self.stats.rendered += 1;
                writeln!(out, "{}", self.renderer.render(&record))
            }
            Err(e) => {
                tracing::trace!(error = %e, "passing line through");
                self.stats.passed_through += 1;
                out.write_all(raw).and_then(|()| out.write_all(b"\n"))
            }
        };

        written.context("failed to write output")
    }
}

/// Strip the line terminator (`\n` or `\r\n`)
fn trim_newline(buf: &[u8]) -> &[u8] {
    let buf = buf.strip_suffix(b"\n").unwrap_or(buf);
    buf.strip_suffix(b"\r").unwrap_or(buf)
}
