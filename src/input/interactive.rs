//! Interactive mode: read lines from a terminal as they are typed.
//!
//! Waits in `poll(2)` on stdin alongside the signal wake pipe so a signal
//! interrupts the wait immediately. The cursor is shown while waiting for
//! input and hidden again while a line is being typed out.

use std::io;

use anyhow::Result;

use crate::config::Config;
use crate::exit::{ExitCode, FatalError};
use crate::render::Renderer;
use crate::signals::{self, SignalBridge};
use crate::term;

const READ_BUF_SIZE: usize = 4096;

/// Runs the interactive loop until stdin reaches end of file.
pub fn run(config: &Config, bridge: &SignalBridge) -> Result<()> {
    let mut renderer = Renderer::new(config, Some(bridge), io::stdout());
    let mut partial: Vec<u8> = Vec::new();
    let mut buf = [0u8; READ_BUF_SIZE];
    let mut lineno = 0usize;

    loop {
        if let Some(signo) = bridge.take() {
            signals::handle(signo, config);
        }

        term::show_cursor();

        let mut fds = [
            libc::pollfd {
                fd: libc::STDIN_FILENO,
                events: libc::POLLIN,
                revents: 0,
            },
            libc::pollfd {
                fd: bridge.wake_fd(),
                events: libc::POLLIN,
                revents: 0,
            },
        ];
        let res = unsafe { libc::poll(fds.as_mut_ptr(), fds.len() as libc::nfds_t, -1) };
        if res < 0 {
            let err = io::Error::last_os_error();
            if err.kind() == io::ErrorKind::Interrupted {
                continue;
            }
            return Err(FatalError::new(ExitCode::Runtime, format!("poll() failed: {err}")).into());
        }

        if fds[1].revents & libc::POLLIN != 0 {
            bridge.drain();
            if let Some(signo) = bridge.take() {
                signals::handle(signo, config);
            }
        }

        if fds[0].revents & (libc::POLLIN | libc::POLLERR | libc::POLLHUP) != 0 {
            let r = unsafe {
                libc::read(libc::STDIN_FILENO, buf.as_mut_ptr().cast(), buf.len())
            };
            if r < 0 {
                let err = io::Error::last_os_error();
                if err.kind() == io::ErrorKind::Interrupted {
                    continue;
                }
                return Err(
                    FatalError::new(ExitCode::Runtime, format!("read() failed: {err}")).into(),
                );
            }
            if r == 0 {
                break;
            }
            partial.extend_from_slice(&buf[..r as usize]);

            while let Some(pos) = partial.iter().position(|&b| b == b'\n') {
                let mut line: Vec<u8> = partial.drain(..=pos).collect();
                line.pop();
                if line.last() == Some(&b'\r') {
                    line.pop();
                }

                term::hide_cursor();
                lineno += 1;
                if config.line_numbers {
                    renderer.type_line(&line, Some(lineno), lineno)?;
                } else {
                    renderer.type_line(&line, None, 0)?;
                }
            }
        }
    }

    Ok(())
}
