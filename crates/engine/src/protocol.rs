//! Result protocol: newline-delimited JSON consumed by the quality-gate
//! orchestrator.
//!
//! Three line shapes exist:
//!   `{"output": {<key>: <value>}}`  -- collaborator context, zero or more
//!   `{"result": {...}}`            -- one per check result, in order
//!   `{"status": ..., "reason": ...}` -- exactly one, last
//!
//! Lines are serialized through the typed structs so field order is
//! stable across runs; downstream consumers snapshot-compare this
//! stream.

use serde::Serialize;
use std::io::{self, Write};

use crate::types::{CheckResult, Evaluation, Output};

#[derive(Serialize)]
struct ResultLine<'a> {
    result: &'a CheckResult,
}

#[derive(Serialize)]
struct OutputLine<'a> {
    output: &'a serde_json::Map<String, serde_json::Value>,
}

/// Writes protocol lines to a sink. Flushed once, by the caller, at the
/// end of a run.
pub struct ProtocolWriter<W: Write> {
    sink: W,
}

impl<W: Write> ProtocolWriter<W> {
    pub fn new(sink: W) -> ProtocolWriter<W> {
        ProtocolWriter { sink }
    }

    /// Emit one collaborator context line, e.g. a record count.
    pub fn emit_output(&mut self, key: &str, value: serde_json::Value) -> io::Result<()> {
        let mut map = serde_json::Map::new();
        map.insert(key.to_string(), value);
        self.write_line(&OutputLine { output: &map })
    }

    /// Emit one check result line.
    pub fn emit_result(&mut self, result: &CheckResult) -> io::Result<()> {
        self.write_line(&ResultLine { result })
    }

    /// Emit the terminal status line.
    pub fn emit_status(&mut self, output: &Output) -> io::Result<()> {
        self.write_line(output)
    }

    /// Emit a full evaluation: every result in order, then the status.
    pub fn emit_evaluation(&mut self, evaluation: &Evaluation) -> io::Result<()> {
        for result in &evaluation.results {
            self.emit_result(result)?;
        }
        self.emit_status(&evaluation.output)
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.sink.flush()
    }

    /// Consumes the writer and returns the sink.
    pub fn into_inner(self) -> W {
        self.sink
    }

    fn write_line<T: Serialize>(&mut self, line: &T) -> io::Result<()> {
        let text = serde_json::to_string(line).map_err(io::Error::from)?;
        writeln!(self.sink, "{}", text)
    }
}
