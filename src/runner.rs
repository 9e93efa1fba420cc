//! End‑to‑end pipeline: scan → parse → resolve → interpret.
//!
//! Every call builds its own [`Interpreter`], so runs never observe each
//! other's globals, resolved locals or output.

use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;

use bytes::{BufMut, BytesMut};
use log::{debug, info};
use serde::Serialize;

use crate::error::{Diagnostic, Diagnostics};
use crate::interpreter::Interpreter;
use crate::parser::Parser;
use crate::resolver::Resolver;
use crate::scanner::scan_tokens;

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Ok,
    CompileError,
    RuntimeError,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunReport {
    pub status: Status,

    /// One entry per printed line, in order.
    pub output: Vec<String>,

    pub diagnostics: Vec<Diagnostic>,
}

impl RunReport {
    /// Conventional process exit code: 0, 65 (compile error) or 70 (runtime error).
    pub fn exit_code(&self) -> i32 {
        match self.status {
            Status::Ok => 0,
            Status::CompileError => 65,
            Status::RuntimeError => 70,
        }
    }
}

/// `Write` sink appending into a buffer shared with the runner.
#[derive(Clone, Default)]
struct CaptureBuffer(Rc<RefCell<BytesMut>>);

impl Write for CaptureBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().put_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl CaptureBuffer {
    fn lines(&self) -> Vec<String> {
        let buffer = self.0.borrow();
        let text = String::from_utf8_lossy(&buffer);

        let lines: Vec<String> = text.lines().map(str::to_string).collect();

        lines
    }
}

/// Run `source` to completion, capturing everything it prints.
pub fn run(source: &str) -> RunReport {
    let capture = CaptureBuffer::default();

    let mut report: RunReport = run_with_output(source, Box::new(capture.clone()));
    report.output = capture.lines();

    report
}

/// Run `source`, streaming `print` output to `out`.  The returned report's
/// `output` is left empty; the lines already went to `out`.
pub fn run_with_output(source: &str, out: Box<dyn Write>) -> RunReport {
    info!("Running program ({} bytes)", source.len());

    let mut diagnostics = Diagnostics::new();
    let mut interpreter = Interpreter::with_output(out);

    let tokens = scan_tokens(source, &mut diagnostics);
    let statements = Parser::new(tokens).parse(&mut diagnostics);

    // Resolving an unparsable program would only add follow‑on noise.
    if !diagnostics.has_compile_errors() {
        Resolver::new(&mut interpreter).resolve(&statements, &mut diagnostics);
    }

    if diagnostics.has_compile_errors() {
        debug!("Compile errors found, skipping execution");

        return RunReport {
            status: Status::CompileError,
            output: Vec::new(),
            diagnostics: diagnostics.into_vec(),
        };
    }

    let status: Status = match interpreter.interpret(&statements) {
        Ok(()) => Status::Ok,
        Err(e) => {
            diagnostics.report(e);
            Status::RuntimeError
        }
    };

    info!("Run finished with status {:?}", status);

    RunReport {
        status,
        output: Vec::new(),
        diagnostics: diagnostics.into_vec(),
    }
}
