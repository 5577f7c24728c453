use std::ffi::OsStr;
use std::io::{Read, Write};
use std::net::{Shutdown, TcpListener, TcpStream};
use std::process::{Command, Output};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

pub struct ServerHandle {
    shutdown: mpsc::Sender<()>,
    thread: Option<thread::JoinHandle<()>>,
    served: Arc<AtomicUsize>,
}

impl ServerHandle {
    /// Requests received so far.
    #[must_use]
    pub fn served(&self) -> usize {
        self.served.load(Ordering::SeqCst)
    }
}

impl Drop for ServerHandle {
    fn drop(&mut self) {
        let _send_result = self.shutdown.send(());
        if let Some(handle) = self.thread.take() {
            drop(handle.join());
        }
    }
}

/// Spawn a lightweight HTTP server for tests.
///
/// `/missing` answers 404, every other path answers 200 with `OK`.
///
/// # Errors
///
/// Returns an error if the listener cannot be created or configured.
pub fn spawn_http_server() -> Result<(String, ServerHandle), String> {
    let listener = TcpListener::bind("127.0.0.1:0")
        .map_err(|err| format!("bind test server failed: {}", err))?;
    let addr = listener
        .local_addr()
        .map_err(|err| format!("server addr failed: {}", err))?;
    listener
        .set_nonblocking(true)
        .map_err(|err| format!("set_nonblocking failed: {}", err))?;

    let (shutdown_tx, shutdown_rx) = mpsc::channel();
    let served = Arc::new(AtomicUsize::new(0));
    let served_counter = Arc::clone(&served);

    let handle = thread::spawn(move || {
        loop {
            if shutdown_rx.try_recv().is_ok() {
                break;
            }

            match listener.accept() {
                Ok((stream, _)) => {
                    let served = Arc::clone(&served_counter);
                    thread::spawn(move || handle_client(stream, &served));
                }
                Err(err) if err.kind() == std::io::ErrorKind::WouldBlock => {
                    thread::sleep(Duration::from_millis(10));
                }
                Err(_) => break,
            }
        }
    });

    Ok((
        format!("http://{}", addr),
        ServerHandle {
            shutdown: shutdown_tx,
            thread: Some(handle),
            served,
        },
    ))
}

/// Like [`spawn_http_server`], but returns `None` where the sandbox forbids
/// binding a local socket.
///
/// # Errors
///
/// Returns an error for any other server setup failure.
pub fn spawn_http_server_or_skip() -> Result<Option<(String, ServerHandle)>, String> {
    match spawn_http_server() {
        Ok(server) => Ok(Some(server)),
        Err(err) if err.contains("Operation not permitted") || err.contains("Permission denied") => {
            eprintln!("Skipping test: {}", err);
            Ok(None)
        }
        Err(err) => Err(err),
    }
}

fn handle_client(mut stream: TcpStream, served: &AtomicUsize) {
    if stream.set_nonblocking(false).is_err() {
        return;
    }
    let Some(request) = read_request(&mut stream) else {
        return;
    };
    served.fetch_add(1, Ordering::SeqCst);
    let response: &[u8] = if request.split_whitespace().nth(1) == Some("/missing") {
        b"HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n"
    } else {
        b"HTTP/1.1 200 OK\r\nContent-Length: 2\r\nConnection: close\r\n\r\nOK"
    };
    if stream.write_all(response).is_err() {
        return;
    }
    if stream.flush().is_err() {
        return;
    }
    drop(stream.shutdown(Shutdown::Both));
}

fn read_request(stream: &mut TcpStream) -> Option<String> {
    let mut buffer = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        let read = stream.read(&mut chunk).ok()?;
        if read == 0 {
            break;
        }
        buffer.extend_from_slice(chunk.get(..read)?);
        let text = String::from_utf8_lossy(&buffer);
        if let Some(header_end) = text.find("\r\n\r\n") {
            let content_length = text
                .get(..header_end)?
                .lines()
                .filter_map(|line| line.split_once(':'))
                .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
                .and_then(|(_, value)| value.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if buffer.len() >= header_end + 4 + content_length {
                break;
            }
        }
    }
    Some(String::from_utf8_lossy(&buffer).into_owned())
}

/// Returns an address on which nothing is listening.
///
/// # Errors
///
/// Returns an error if a probe socket cannot be bound.
pub fn closed_port_url() -> Result<String, String> {
    let listener = TcpListener::bind("127.0.0.1:0")
        .map_err(|err| format!("bind probe failed: {}", err))?;
    let addr = listener
        .local_addr()
        .map_err(|err| format!("probe addr failed: {}", err))?;
    drop(listener);
    Ok(format!("http://{}", addr))
}

/// Run the `clobbr` binary and capture output.
///
/// # Errors
///
/// Returns an error if the binary cannot be executed.
pub fn run_clobbr<I, S>(args: I) -> Result<Output, String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let bin = clobbr_bin()?;
    Command::new(bin)
        .args(args)
        .env("RUST_LOG", "error")
        .env_remove("CLOBBR_LOG")
        .env("NO_COLOR", "1")
        .output()
        .map_err(|err| format!("run clobbr failed: {}", err))
}

fn clobbr_bin() -> Result<String, String> {
    option_env!("CARGO_BIN_EXE_clobbr").map_or_else(
        || Err("CARGO_BIN_EXE_clobbr missing at compile time.".to_owned()),
        |path| Ok(path.to_owned()),
    )
}
