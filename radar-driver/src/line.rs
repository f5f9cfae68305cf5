use crate::constants::{
    MARKER_DEVICE_READY, MARKER_SCAN_START, MARKER_SCAN_STOP, MAX_LINE_BYTES,
};
use crate::numeric::{to_angle, to_distance, to_string};
use radar_data::{Angle, StatusMarker};
use std::collections::VecDeque;

/// What a single protocol line turned out to be.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ParsedEvent {
    StatusMarker(StatusMarker),
    Sample { angle: Angle, distance: f64 },
    /// Empty, malformed or out-of-range line.
    Ignored,
}

/// Turns decoded lines into events. Never fails: anything it cannot use is `Ignored`.
#[derive(Clone, Copy, Debug)]
pub struct LineParser {
    max_distance: f64,
}

impl LineParser {
    pub fn new(max_distance: f64) -> LineParser {
        LineParser { max_distance }
    }

    pub fn parse(&self, line: &str) -> ParsedEvent {
        if let Some(marker) = find_marker(line) {
            return ParsedEvent::StatusMarker(marker);
        }
        match self.parse_sample(line) {
            Some((angle, distance)) => ParsedEvent::Sample { angle, distance },
            None => ParsedEvent::Ignored,
        }
    }

    fn parse_sample(&self, line: &str) -> Option<(Angle, f64)> {
        let mut fields = line.split(',');
        let angle_field = fields.next()?;
        // No comma at all leaves a single field
        let distance_field = fields.next()?;
        let angle = to_angle(angle_field)?;
        let distance = to_distance(distance_field, self.max_distance)?;
        Some((angle, distance))
    }
}

pub fn parse_line(line: &str, max_distance: f64) -> ParsedEvent {
    LineParser::new(max_distance).parse(line)
}

fn find_marker(line: &str) -> Option<StatusMarker> {
    [
        (MARKER_SCAN_START, StatusMarker::ScanStart),
        (MARKER_SCAN_STOP, StatusMarker::ScanStop),
        (MARKER_DEVICE_READY, StatusMarker::DeviceReady),
    ]
    .into_iter()
    .find(|(pattern, _)| line.contains(pattern))
    .map(|(_, marker)| marker)
}

/// Splits a raw byte stream into trimmed, newline-terminated lines.
#[derive(Debug, Default)]
pub(crate) struct LineAssembler {
    buffer: VecDeque<u8>,
    overflowed: u64,
    // Set after an over-long fragment was discarded, until its line break arrives
    skipping: bool,
}

impl LineAssembler {
    pub(crate) fn new() -> LineAssembler {
        LineAssembler::default()
    }

    pub(crate) fn extend(&mut self, data: &[u8]) {
        self.buffer.extend(data);
    }

    /// Number of over-long fragments discarded since the last call.
    pub(crate) fn take_overflowed(&mut self) -> u64 {
        std::mem::take(&mut self.overflowed)
    }

    pub(crate) fn next_line(&mut self) -> Option<String> {
        loop {
            let Some(end_index) = self.buffer.iter().position(|b| *b == b'\n') else {
                self.discard_if_overlong();
                return None;
            };
            let raw = self.buffer.drain(..=end_index).collect::<Vec<_>>();
            if std::mem::take(&mut self.skipping) {
                log::trace!("Discarding {} byte tail of an over-long line", raw.len());
                continue;
            }
            if raw.len() > MAX_LINE_BYTES {
                log::trace!("Discarding {} byte line", raw.len());
                self.overflowed += 1;
                continue;
            }
            return Some(decode(&raw));
        }
    }

    fn discard_if_overlong(&mut self) {
        if self.buffer.len() <= MAX_LINE_BYTES {
            return;
        }
        let head = self.buffer.iter().take(16).copied().collect::<Vec<_>>();
        log::trace!(
            "Discarding {} bytes without line break, starting {}",
            self.buffer.len(),
            to_string(&head)
        );
        self.buffer.clear();
        if !self.skipping {
            self.overflowed += 1;
            self.skipping = true;
        }
    }
}

/// Invalid UTF-8 sequences are dropped rather than replaced.
fn decode(raw: &[u8]) -> String {
    String::from_utf8_lossy(raw)
        .chars()
        .filter(|c| *c != char::REPLACEMENT_CHARACTER)
        .collect::<String>()
        .trim()
        .to_string()
}
