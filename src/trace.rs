use crate::error::{Error, Result};
use log::warn;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use std::str::FromStr;

/// Byte-references emitted per pixel, one for each color channel.
const CHANNELS_PER_PIXEL: u64 = 3;

/// Label suffixes in channel order.
const CHANNEL_SUFFIXES: [&str; 3] = ["r", "g", "b"];

/// The `AccessKind` enum distinguishes read from write references. The generator only ever emits
/// reads; writes parse so a hand-built trace can exercise the modified bit.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum AccessKind {
    Read,
    Write,
}

impl AccessKind {
    fn parse(token: &str) -> Option<Self> {
        match token {
            "R" => Some(AccessKind::Read),
            "W" => Some(AccessKind::Write),
            _ => None,
        }
    }
}

/// The `Reference` struct is one entry of the trace: a human-readable address tag, the page the
/// access lands on, the color channel that produced it, and the access kind.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Reference {
    pub label: String,
    pub page_number: usize,
    pub channel: u8,
    pub access: AccessKind,
}

/// The `TraceHeader` struct mirrors the five metadata lines at the top of a trace artifact:
/// page size (TP), image height (NF), image width (NC), total byte-references (NR), and the
/// page count (NP) sizing the page table for a replay.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct TraceHeader {
    pub page_size: u64,
    pub height: u32,
    pub width: u32,
    pub references: u64,
    pub pages: usize,
}

/// The `TraceGenerator` struct derives a page-reference sequence from image dimensions and a
/// page-size parameter. Emission is row-major with channels in R,G,B order, so identical inputs
/// always produce byte-identical artifacts.
///
/// Each record's page number is computed from the pixel index alone; the channel does not enter
/// the formula, while NR and NP count byte-references. Both formulas are part of the artifact
/// format and must not be reconciled.
pub struct TraceGenerator {
    width: u32,
    height: u32,
    page_size: u64,
}

impl TraceGenerator {
    /// Create a new generator for a `width` x `height` pixel image and a page size in bytes.
    ///
    /// # Arguments
    ///
    /// * `width` - image width in pixels.
    /// * `height` - image height in pixels.
    /// * `page_size` - page size in bytes, must be non-zero.
    pub fn build(width: u32, height: u32, page_size: u64) -> Self {
        Self {
            width,
            height,
            page_size,
        }
    }

    /// The metadata block for this generator's trace: `NR = width * height * 3` and
    /// `NP = ceil(NR / page_size)`.
    pub fn header(&self) -> TraceHeader {
        let references = self.width as u64 * self.height as u64 * CHANNELS_PER_PIXEL;
        TraceHeader {
            page_size: self.page_size,
            height: self.height,
            width: self.width,
            references,
            pages: references.div_ceil(self.page_size) as usize,
        }
    }

    /// Write the five header lines followed by one record per (row, column, channel) triple.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        let header = self.header();
        writeln!(writer, "TP={}", header.page_size)?;
        writeln!(writer, "NF={}", header.height)?;
        writeln!(writer, "NC={}", header.width)?;
        writeln!(writer, "NR={}", header.references)?;
        writeln!(writer, "NP={}", header.pages)?;
        for row in 0..self.height as u64 {
            for col in 0..self.width as u64 {
                let page = (row * self.width as u64 + col) / self.page_size;
                for (channel, suffix) in CHANNEL_SUFFIXES.iter().enumerate() {
                    writeln!(
                        writer,
                        "Image[{}][{}].{},{},{},R",
                        row, col, suffix, page, channel
                    )?;
                }
            }
        }
        Ok(())
    }

    /// Persist the trace artifact at `path`, returning the header that was written. A failed
    /// write aborts generation; no partial artifact is reported as success.
    pub fn write_file(&self, path: &Path) -> Result<TraceHeader> {
        let mut writer = BufWriter::new(File::create(path)?);
        self.write_to(&mut writer)?;
        writer.flush()?;
        Ok(self.header())
    }
}

/// The `TraceReader` struct sequentially parses a trace artifact: the five metadata lines are
/// consumed at open, after which the reader iterates over data records. Any malformed line ends
/// iteration with an error, which callers treat as fatal to loading.
pub struct TraceReader {
    reader: BufReader<File>,
    header: TraceHeader,
    pub line_number: u64,
}

impl TraceReader {
    /// Open the artifact at `path` and parse its metadata block.
    pub fn open(path: &Path) -> Result<Self> {
        let mut reader = BufReader::new(File::open(path)?);
        let mut line_number = 0;
        let page_size = read_header_field(&mut reader, &mut line_number, "TP")?;
        let height = read_header_field(&mut reader, &mut line_number, "NF")?;
        let width = read_header_field(&mut reader, &mut line_number, "NC")?;
        let references = read_header_field(&mut reader, &mut line_number, "NR")?;
        let pages = read_header_field(&mut reader, &mut line_number, "NP")?;
        Ok(Self {
            reader,
            header: TraceHeader {
                page_size,
                height,
                width,
                references,
                pages,
            },
            line_number,
        })
    }

    pub fn header(&self) -> TraceHeader {
        self.header
    }

    fn parse_line(line: &str, number: u64) -> Result<Reference> {
        let fields = line.split(',').collect::<Vec<&str>>();
        if fields.len() != 4 {
            return Err(Error::TraceParse {
                line: number,
                reason: format!("expected 4 comma-separated fields, found {}", fields.len()),
            });
        }
        let page_number = fields[1].trim().parse::<usize>().map_err(|_| Error::TraceParse {
            line: number,
            reason: format!("page number is not an integer: '{}'", fields[1]),
        })?;
        let channel = fields[2].trim().parse::<u8>().map_err(|_| Error::TraceParse {
            line: number,
            reason: format!("channel index is not an integer: '{}'", fields[2]),
        })?;
        let access = AccessKind::parse(fields[3].trim()).ok_or_else(|| Error::TraceParse {
            line: number,
            reason: format!("unrecognized access type: '{}'", fields[3]),
        })?;
        Ok(Reference {
            label: String::from(fields[0]),
            page_number,
            channel,
            access,
        })
    }
}

impl Iterator for TraceReader {
    type Item = Result<Reference>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut buffer = String::new();
        match self.reader.read_line(&mut buffer) {
            Err(err) => Some(Err(Error::Io(err))),
            Ok(0) => None,
            Ok(_) => {
                self.line_number += 1;
                Some(Self::parse_line(buffer.trim(), self.line_number))
            }
        }
    }
}

/// Load a trace artifact into memory. Records naming a page at or beyond the header's page count
/// are discarded with a warning and never reach the simulator; a malformed line aborts the whole
/// load before any simulation starts.
pub fn load_trace(path: &Path) -> Result<(TraceHeader, Vec<Reference>)> {
    let reader = TraceReader::open(path)?;
    let header = reader.header();
    let mut references = Vec::new();
    for record in reader {
        let record = record?;
        if record.page_number >= header.pages {
            warn!(
                "page reference out of range ignored: {} -> page {}",
                record.label, record.page_number
            );
            continue;
        }
        references.push(record);
    }
    Ok((header, references))
}

fn read_header_field<T: FromStr>(
    reader: &mut BufReader<File>,
    line_number: &mut u64,
    expected: &'static str,
) -> Result<T> {
    let mut buffer = String::new();
    let count = reader.read_line(&mut buffer)?;
    *line_number += 1;
    let line = *line_number;
    if count == 0 {
        return Err(Error::TraceHeader { line, expected });
    }
    match buffer.trim().split_once('=') {
        Some((key, value)) if key == expected => {
            value.parse().map_err(|_| Error::TraceHeader { line, expected })
        }
        _ => Err(Error::TraceHeader { line, expected }),
    }
}
