//! Per-generation statistics and their tabular log.

use std::io::{self, Write};

/// Outcome counts of one generation's tournament.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationRecord {
    /// 1-based generation number.
    pub generation: usize,
    pub x_wins: usize,
    pub o_wins: usize,
    pub draws: usize,
}

impl GenerationRecord {
    pub const CSV_HEADER: &'static str = "Generation,X Wins,O Wins,Draws";

    #[must_use]
    pub fn total(&self) -> usize {
        self.x_wins + self.o_wins + self.draws
    }

    #[must_use]
    pub fn to_csv_row(&self) -> String {
        format!(
            "{},{},{},{}",
            self.generation, self.x_wins, self.o_wins, self.draws
        )
    }
}

/// Append-only CSV log, one row per generation.
///
/// The header is written on creation and every row is flushed immediately,
/// so an interrupted run leaves a valid log of the completed generations.
///
/// ```
/// use evotac_training::{GenerationRecord, HistoryWriter};
///
/// let mut buf = Vec::new();
/// let mut writer = HistoryWriter::new(&mut buf).unwrap();
/// writer
///     .append(&GenerationRecord { generation: 1, x_wins: 10, o_wins: 4, draws: 2 })
///     .unwrap();
/// drop(writer);
/// assert_eq!(String::from_utf8(buf).unwrap(), "Generation,X Wins,O Wins,Draws\n1,10,4,2\n");
/// ```
#[derive(Debug)]
pub struct HistoryWriter<W>
where
    W: Write,
{
    writer: W,
}

impl<W> HistoryWriter<W>
where
    W: Write,
{
    pub fn new(mut writer: W) -> io::Result<Self> {
        writeln!(writer, "{}", GenerationRecord::CSV_HEADER)?;
        writer.flush()?;
        Ok(Self { writer })
    }

    pub fn append(&mut self, record: &GenerationRecord) -> io::Result<()> {
        writeln!(self.writer, "{}", record.to_csv_row())?;
        self.writer.flush()
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_follows_header_columns() {
        let record = GenerationRecord {
            generation: 3,
            x_wins: 1,
            o_wins: 2,
            draws: 3,
        };
        assert_eq!(record.to_csv_row(), "3,1,2,3");
        assert_eq!(record.total(), 6);
        assert_eq!(
            GenerationRecord::CSV_HEADER.split(',').count(),
            record.to_csv_row().split(',').count()
        );
    }

    #[test]
    fn test_rows_accumulate() {
        let mut writer = HistoryWriter::new(Vec::new()).unwrap();
        for generation in 1..=3 {
            writer
                .append(&GenerationRecord {
                    generation,
                    x_wins: generation,
                    o_wins: 0,
                    draws: 1,
                })
                .unwrap();
        }
        let text = String::from_utf8(writer.into_inner()).unwrap();
        let lines = text.lines().collect::<Vec<_>>();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], GenerationRecord::CSV_HEADER);
        assert_eq!(lines[3], "3,3,0,1");
    }
}
