use std::collections::HashMap;
use std::process::{Command, Stdio};
use std::sync::Mutex;

use tracing::{debug, warn};

/// Captured result of one external process invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code, `None` when the process could not be started or was killed
    pub code: Option<i32>,
    pub stdout: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Synchronous "run a program, capture stdout" capability.
///
/// Everything that talks to git or graphviz goes through this trait so the
/// pipeline can be driven by canned output in tests.
pub trait CommandRunner {
    fn run(&self, program: &str, args: &[String]) -> CommandOutput;

    /// Full standard output, or empty text when the command did not exit with 0
    fn execute(&self, program: &str, args: &[String]) -> String {
        let output = self.run(program, args);
        if output.success() {
            output.stdout
        } else {
            String::new()
        }
    }
}

impl<T: CommandRunner + ?Sized> CommandRunner for &T {
    fn run(&self, program: &str, args: &[String]) -> CommandOutput {
        (**self).run(program, args)
    }
}

/// Runs real processes with `std::process::Command`
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, program: &str, args: &[String]) -> CommandOutput {
        debug!(program, ?args, "spawning");

        let result = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output();

        match result {
            Ok(output) => {
                if !output.status.success() {
                    warn!(
                        program,
                        code = ?output.status.code(),
                        stderr = %String::from_utf8_lossy(&output.stderr).trim(),
                        "command exited unsuccessfully"
                    );
                }
                CommandOutput {
                    code: output.status.code(),
                    stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                }
            }
            Err(e) => {
                warn!(program, error = %e, "failed to start command");
                CommandOutput {
                    code: None,
                    stdout: String::new(),
                }
            }
        }
    }
}

/// Test double answering exact (program, arguments) pairs with canned output.
/// Unknown invocations exit with code 1 and no output. Every call is recorded.
#[derive(Debug, Default)]
pub struct ScriptedRunner {
    responses: HashMap<(String, Vec<String>), CommandOutput>,
    calls: Mutex<Vec<(String, Vec<String>)>>,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `program args` with `stdout` and exit code 0
    pub fn respond<I, S>(mut self, program: &str, args: I, stdout: &str) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let key = (program.to_string(), args.into_iter().map(Into::into).collect());
        self.responses.insert(
            key,
            CommandOutput {
                code: Some(0),
                stdout: stdout.to_string(),
            },
        );
        self
    }

    /// Answer `program args` with the given exit code and no output
    pub fn fail<I, S>(mut self, program: &str, args: I, code: i32) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let key = (program.to_string(), args.into_iter().map(Into::into).collect());
        self.responses.insert(
            key,
            CommandOutput {
                code: Some(code),
                stdout: String::new(),
            },
        );
        self
    }

    pub fn calls(&self) -> Vec<(String, Vec<String>)> {
        self.calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }
}

impl CommandRunner for ScriptedRunner {
    fn run(&self, program: &str, args: &[String]) -> CommandOutput {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push((program.to_string(), args.to_vec()));
        }
        self.responses
            .get(&(program.to_string(), args.to_vec()))
            .cloned()
            .unwrap_or(CommandOutput {
                code: Some(1),
                stdout: String::new(),
            })
    }
}
