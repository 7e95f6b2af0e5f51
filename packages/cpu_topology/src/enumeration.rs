//! Parsing of the hierarchical socket/core/processor enumeration, the online processor list and
//! the core-spreading order.

use std::collections::{BTreeMap, VecDeque};
use std::ops::RangeInclusive;

use foldhash::HashSet;
use itertools::Itertools;

use crate::{Error, Location, Processor, ProcessorId, Result};

/// Number of comment lines that `lscpu -p=socket,core,cpu` prints before the first record.
pub const LSCPU_HEADER_LINES: usize = 4;

const FIELDS_PER_RECORD: usize = 3;

/// Parses a newline-delimited list of `socket,core,processor` records, skipping a fixed number
/// of header lines first.
///
/// Processors are returned in listing order. Blank lines are ignored. Anything else that is not
/// three comma-separated unsigned integers is an error, as is an enumeration without records.
///
/// # Example
///
/// ```
/// use cpu_topology::{Location, parse_enumeration};
///
/// let text = "# header\n0,0,0\n0,1,1\n0,0,2\n0,1,3\n";
/// let processors = parse_enumeration(text, 1).unwrap();
///
/// assert_eq!(processors.len(), 4);
/// assert_eq!(processors[2].location(), Some(Location::new(0, 0)));
/// ```
pub fn parse_enumeration(text: &str, header_lines: usize) -> Result<Vec<Processor>> {
    let mut processors = Vec::new();

    for (index, line) in text.lines().enumerate().skip(header_lines) {
        let line_number = index.saturating_add(1);
        let line = line.trim();

        if line.is_empty() {
            continue;
        }

        processors.push(parse_record(line, line_number)?);
    }

    if processors.is_empty() {
        return Err(Error::EmptyEnumeration);
    }

    Ok(processors)
}

fn parse_record(line: &str, line_number: usize) -> Result<Processor> {
    let fields = line.split(',').map(str::trim).collect::<Vec<_>>();

    let [socket, core, processor] = fields.as_slice() else {
        return Err(Error::malformed(
            line_number,
            format!(
                "expected {FIELDS_PER_RECORD} fields (socket,core,cpu) but found {}",
                fields.len()
            ),
        ));
    };

    let socket = parse_field(socket, "socket", line_number)?;
    let core = parse_field(core, "core", line_number)?;
    let processor = parse_field(processor, "cpu", line_number)?;

    Ok(Processor::with_location(
        processor,
        Location::new(socket, core),
    ))
}

fn parse_field(value: &str, name: &str, line_number: usize) -> Result<u32> {
    value.parse::<u32>().map_err(|inner| {
        Error::malformed(
            line_number,
            format!("{name} '{value}' could not be parsed as an integer: {inner}"),
        )
    })
}

/// Parses a processor list made of comma-separated IDs and inclusive `first-last` ranges, such as
/// `0-3,6,8-9`. This is the format of `/sys/devices/system/cpu/online` on Linux.
///
/// Returns the IDs in ascending order, removing duplicates. Surrounding whitespace is ignored and
/// blank input yields an empty list. The whole list counts as line 1 in error reports.
///
/// # Example
///
/// ```
/// use cpu_topology::parse_processor_list;
///
/// assert_eq!(parse_processor_list("0-2,5\n").unwrap(), vec![0, 1, 2, 5]);
/// ```
pub fn parse_processor_list(text: &str) -> Result<Vec<ProcessorId>> {
    let text = text.trim();

    if text.is_empty() {
        return Ok(Vec::new());
    }

    let ranges = text
        .split(',')
        .map(parse_processor_range)
        .collect::<Result<Vec<_>>>()?;

    Ok(ranges
        .into_iter()
        .flatten()
        .sorted_unstable()
        .dedup()
        .collect())
}

fn parse_processor_range(part: &str) -> Result<RangeInclusive<ProcessorId>> {
    let (first, last) = part.split_once('-').unwrap_or((part, part));

    let first = parse_field(first.trim(), "range start", 1)?;
    let last = parse_field(last.trim(), "range end", 1)?;

    if first > last {
        return Err(Error::malformed(1, format!("range '{part}' starts after it ends")));
    }

    Ok(first..=last)
}

/// Orders processors so that consecutive entries prefer different physical cores.
///
/// Sockets are visited in ascending order and each socket is exhausted before moving to the next.
/// Within a socket, we repeatedly sweep over all cores in ascending order, taking one
/// not-yet-taken processor from each core per sweep (in the order the processors were listed),
/// until no processors of the socket remain. Hyper-thread siblings therefore only appear once
/// every core of the socket already has a processor in the sequence.
///
/// Processors without a known location are treated as belonging to one shared core, which
/// preserves their relative order. Duplicate processor IDs are dropped.
///
/// # Example
///
/// ```
/// use cpu_topology::{Location, Processor, spread_across_cores};
///
/// // Two cores with two hyper-threads each, listed core by core.
/// let listed = [(0, 0), (1, 0), (2, 1), (3, 1)]
///     .map(|(id, core)| Processor::with_location(id, Location::new(0, core)));
///
/// let spread = spread_across_cores(listed);
/// let ids = spread.iter().map(|p| p.id()).collect::<Vec<_>>();
///
/// assert_eq!(ids, vec![0, 2, 1, 3]);
/// ```
#[must_use]
pub fn spread_across_cores(processors: impl IntoIterator<Item = Processor>) -> Vec<Processor> {
    let mut seen = HashSet::default();
    let mut sockets: BTreeMap<_, BTreeMap<_, VecDeque<Processor>>> = BTreeMap::new();

    for processor in processors {
        if !seen.insert(processor.id()) {
            continue;
        }

        let location = processor.location();

        sockets
            .entry(location.map(|l| l.socket()))
            .or_default()
            .entry(location.map(|l| l.core()))
            .or_default()
            .push_back(processor);
    }

    let mut ordered = Vec::with_capacity(seen.len());

    for cores in sockets.into_values() {
        let mut cores = cores.into_values().collect::<Vec<_>>();

        loop {
            let before_sweep = ordered.len();

            ordered.extend(cores.iter_mut().filter_map(VecDeque::pop_front));

            if ordered.len() == before_sweep {
                break;
            }
        }
    }

    ordered
}
