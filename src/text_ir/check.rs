//! FileCheck-style test validation for `.ir` files.
//!
//! A fixture holds textual IR plus `; RUN:` lines carrying `tplgen`
//! flags and `; CHECK*` directives matched against the generated code,
//! split into one statement per line. A failing render is reported as a
//! single `error: ...` line so fixtures can check diagnostics too.

use clap::Parser;
use log::debug;
use thiserror::Error;

use super::parse_ir;
use crate::cli::RenderArgs;
use crate::core::{CompileError, Node, Renderer, STATEMENT_SEPARATOR};

/// A CHECK directive extracted from a fixture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckDirective {
    /// CHECK: pattern - match on this or any later line
    Check(String),
    /// CHECK-LABEL: pattern - like CHECK, marks a section
    CheckLabel(String),
    /// CHECK-NEXT: pattern - match on the line right after the previous match
    CheckNext(String),
    /// CHECK-NOT: pattern - must not occur before the next match
    CheckNot(String),
    /// CHECK-EMPTY - next line is empty
    CheckEmpty,
    /// COM: comment - ignored
    Comment(String),
}

/// A RUN directive: flags for one render of the fixture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunDirective {
    pub args: Vec<String>,
}

/// Everything extracted from a fixture.
#[derive(Debug)]
pub struct TestSpec {
    pub run_directives: Vec<RunDirective>,
    pub check_directives: Vec<CheckDirective>,
    pub ir_content: String,
}

#[derive(Error, Debug)]
pub enum CheckError {
    #[error("fixture has no RUN line")]
    NoRunLine,

    #[error("failed to read IR: {0}")]
    Ir(#[from] CompileError),

    #[error("bad RUN line `{line}`: {message}")]
    Run { line: String, message: String },

    #[error("{directive}: {message}")]
    Mismatch {
        directive: &'static str,
        message: String,
    },
}

#[derive(Parser)]
#[command(name = "RUN", no_binary_name = true)]
struct RunLine {
    #[command(flatten)]
    args: RenderArgs,
}

impl TestSpec {
    /// Split a fixture into directives and IR text.
    pub fn parse(content: &str) -> Self {
        let mut run_directives = Vec::new();
        let mut check_directives = Vec::new();
        let mut ir_lines = Vec::new();

        for line in content.lines() {
            let trimmed = line.trim();

            if let Some(run) = trimmed.strip_prefix("; RUN:") {
                run_directives.push(RunDirective {
                    args: run.split_whitespace().map(str::to_string).collect(),
                });
            } else if let Some(pattern) = trimmed.strip_prefix("; CHECK-LABEL:") {
                check_directives.push(CheckDirective::CheckLabel(pattern.trim().to_string()));
            } else if let Some(pattern) = trimmed.strip_prefix("; CHECK-NEXT:") {
                check_directives.push(CheckDirective::CheckNext(pattern.trim().to_string()));
            } else if let Some(pattern) = trimmed.strip_prefix("; CHECK-NOT:") {
                check_directives.push(CheckDirective::CheckNot(pattern.trim().to_string()));
            } else if trimmed.starts_with("; CHECK-EMPTY") {
                check_directives.push(CheckDirective::CheckEmpty);
            } else if let Some(pattern) = trimmed.strip_prefix("; CHECK:") {
                check_directives.push(CheckDirective::Check(pattern.trim().to_string()));
            } else if let Some(comment) = trimmed.strip_prefix("; COM:") {
                check_directives.push(CheckDirective::Comment(comment.trim().to_string()));
            } else {
                ir_lines.push(line);
            }
        }

        TestSpec {
            run_directives,
            check_directives,
            ir_content: ir_lines.join("\n"),
        }
    }
}

/// Runs fixtures and validates their output.
#[derive(Debug, Default)]
pub struct TestRunner;

impl TestRunner {
    pub fn new() -> Self {
        Self
    }

    /// Render the fixture once per RUN line and check each output.
    pub fn run_test(&self, spec: &TestSpec) -> Result<(), CheckError> {
        if spec.run_directives.is_empty() {
            return Err(CheckError::NoRunLine);
        }
        let ir = parse_ir(&spec.ir_content);

        for run in &spec.run_directives {
            let output = self.execute(&ir, run)?;
            debug!("RUN {:?} produced:\n{output}", run.args);
            self.validate_output(&output, &spec.check_directives)?;
        }
        Ok(())
    }

    fn execute(
        &self,
        ir: &Result<Node, CompileError>,
        run: &RunDirective,
    ) -> Result<String, CheckError> {
        let args = RunLine::try_parse_from(&run.args)
            .map_err(|e| CheckError::Run {
                line: run.args.join(" "),
                message: e.to_string(),
            })?
            .args;

        let ir = match ir {
            Ok(ir) => ir,
            Err(e) => return Ok(format!("error: {e}")),
        };

        if args.print_ir {
            return Ok(ir.to_string());
        }

        let rendered = args.renderer().and_then(|renderer| renderer.render(ir));
        Ok(match rendered {
            Ok(source) => source.split(STATEMENT_SEPARATOR).collect::<Vec<_>>().join("\n"),
            Err(e) => format!("error: {e}"),
        })
    }

    /// Validate `output` against `directives`.
    pub fn validate_output(
        &self,
        output: &str,
        directives: &[CheckDirective],
    ) -> Result<(), CheckError> {
        let lines: Vec<&str> = output.lines().collect();
        let mut line_idx = 0;
        let mut forbidden: Vec<&str> = Vec::new();

        for directive in directives {
            match directive {
                CheckDirective::Comment(_) => continue,

                CheckDirective::CheckNot(pattern) => forbidden.push(pattern),

                CheckDirective::Check(pattern) | CheckDirective::CheckLabel(pattern) => {
                    let name = if matches!(directive, CheckDirective::Check(_)) {
                        "CHECK"
                    } else {
                        "CHECK-LABEL"
                    };
                    let found = lines
                        .iter()
                        .skip(line_idx)
                        .position(|line| line.contains(pattern.as_str()))
                        .map(|offset| line_idx + offset);
                    let Some(found) = found else {
                        return Err(CheckError::Mismatch {
                            directive: name,
                            message: format!("pattern '{pattern}' not found in output:\n{output}"),
                        });
                    };
                    check_forbidden(&lines[line_idx..found], &mut forbidden)?;
                    debug!("{name}: '{pattern}' found at line {found}");
                    line_idx = found + 1;
                }

                CheckDirective::CheckNext(pattern) => {
                    // No line lies between a match and the line after it.
                    if let Some(pending) = forbidden.first() {
                        return Err(CheckError::Mismatch {
                            directive: "CHECK-NOT",
                            message: format!(
                                "'{pending}' directly before CHECK-NEXT can never match"
                            ),
                        });
                    }
                    let Some(line) = lines.get(line_idx) else {
                        return Err(CheckError::Mismatch {
                            directive: "CHECK-NEXT",
                            message: format!("no more lines, expected '{pattern}'"),
                        });
                    };
                    if !line.contains(pattern.as_str()) {
                        return Err(CheckError::Mismatch {
                            directive: "CHECK-NEXT",
                            message: format!("expected '{pattern}' but got '{line}'"),
                        });
                    }
                    line_idx += 1;
                }

                CheckDirective::CheckEmpty => {
                    // End of output counts as empty
                    if let Some(line) = lines.get(line_idx) {
                        if !line.trim().is_empty() {
                            return Err(CheckError::Mismatch {
                                directive: "CHECK-EMPTY",
                                message: format!("expected empty line but got '{line}'"),
                            });
                        }
                        line_idx += 1;
                    }
                }
            }
        }

        check_forbidden(lines.get(line_idx..).unwrap_or(&[]), &mut forbidden)
    }
}

/// Fail if a pending CHECK-NOT pattern occurs in `lines`, then clear them.
fn check_forbidden(lines: &[&str], forbidden: &mut Vec<&str>) -> Result<(), CheckError> {
    for pattern in forbidden.drain(..) {
        if let Some(line) = lines.iter().find(|line| line.contains(pattern)) {
            return Err(CheckError::Mismatch {
                directive: "CHECK-NOT",
                message: format!("'{pattern}' found in '{line}'"),
            });
        }
    }
    Ok(())
}
