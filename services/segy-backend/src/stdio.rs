//! The stdin/stdout request loop.

use std::io::{self, BufRead, Write};

use seismic_common::ErrorRecord;
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::protocol::{Backend, Reply};

fn write_line<W: Write>(output: &mut W, value: &Value) -> io::Result<()> {
    serde_json::to_writer(&mut *output, value)?;
    output.write_all(b"\n")?;
    output.flush()
}

/// Answer requests until EOF or a `shutdown` request. The ready and
/// shutdown status lines are always written.
pub fn serve<R: BufRead, W: Write>(
    backend: &Backend,
    mut input: R,
    output: &mut W,
) -> io::Result<()> {
    write_line(
        output,
        &json!({"status": "ready", "message": "SEG-Y backend started"}),
    )?;
    info!("Backend ready");

    let mut handled = 0u64;
    let mut buf = Vec::new();
    loop {
        buf.clear();
        if input.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        let reply = match std::str::from_utf8(&buf) {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                backend.handle_line(line)
            }
            Err(e) => {
                warn!(error = %e, "Request line is not valid UTF-8");
                Reply::error(ErrorRecord::input(format!("Invalid UTF-8 input: {}", e)))
            }
        };
        write_line(output, &reply.body)?;
        handled += 1;
        if reply.shutdown {
            break;
        }
    }

    info!(requests = handled, "Backend stopping");
    write_line(
        output,
        &json!({"status": "shutdown", "message": "SEG-Y backend stopped"}),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BackendConfig;

    fn run(input: &str) -> Vec<Value> {
        run_bytes(input.as_bytes())
    }

    fn run_bytes(input: &[u8]) -> Vec<Value> {
        let backend = Backend::new(BackendConfig::default());
        let mut output = Vec::new();
        serve(&backend, input, &mut output).unwrap();
        String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    #[test]
    fn test_ready_and_shutdown_on_eof() {
        let lines = run("");
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["status"], "ready");
        assert_eq!(lines[1]["status"], "shutdown");
    }

    #[test]
    fn test_loop_continues_after_errors() {
        let lines = run("garbage\n\n{\"endpoint\": \"ping\"}\n");
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[1]["error"]["type"], "input_error");
        assert_eq!(lines[2]["message"], "pong");
    }

    #[test]
    fn test_loop_continues_after_invalid_utf8() {
        let lines = run_bytes(b"\xff\xfe{\"endpoint\": \"ping\"}\n{\"endpoint\": \"ping\"}\n");
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[1]["error"]["type"], "input_error");
        assert!(lines[1]["error"]["message"]
            .as_str()
            .unwrap()
            .starts_with("Invalid UTF-8 input"));
        assert_eq!(lines[2]["message"], "pong");
        assert_eq!(lines[3]["status"], "shutdown");
    }

    #[test]
    fn test_shutdown_stops_reading() {
        let lines = run("{\"endpoint\": \"shutdown\"}\n{\"endpoint\": \"ping\"}\n");
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1]["message"], "Shutting down...");
        assert_eq!(lines[2]["status"], "shutdown");
    }
}
