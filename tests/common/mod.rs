//! Shared test fixtures for the expense list integration tests.
//!
//! Provides sample records, a scripted in-memory [`ExpenseService`], a gated
//! service whose calls block until released (for race tests), and a
//! one-shot local HTTP server for exercising [`HttpExpenseService`].

#![allow(dead_code)]

use std::collections::VecDeque;
use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::mpsc::{Receiver, Sender};
use std::sync::Mutex;
use std::thread::JoinHandle;

use expense_list::{ExpenseError, ExpenseRecord, ExpenseService, Result};

pub fn record(id: &str, amount: f64, category: &str, description: &str, date: &str) -> ExpenseRecord {
    ExpenseRecord {
        id: id.to_string(),
        amount,
        category: category.to_string(),
        description: description.to_string(),
        date: date.into(),
    }
}

pub fn lunch() -> ExpenseRecord {
    record("1", 50.0, "Food", "Lunch", "2024-01-01")
}

pub fn sample_records() -> Vec<ExpenseRecord> {
    vec![
        lunch(),
        record("2", 1200.0, "Rent", "", "2024-01-03"),
        record("3", 35.5, "Transport", "Cab to airport", "2024-01-02"),
    ]
}

// ---------------------------------------------------------------------------
// MockService
// ---------------------------------------------------------------------------

/// Calls recorded by [`MockService`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    List { credential: String },
    Delete { id: String, credential: String },
}

/// Scripted service: each `list`/`delete_by_id` pops the next queued
/// response. An exhausted list queue fails with status 500; an exhausted
/// delete queue answers 200.
#[derive(Default)]
pub struct MockService {
    lists: Mutex<VecDeque<Result<Vec<ExpenseRecord>>>>,
    deletes: Mutex<VecDeque<Result<u16>>>,
    calls: Mutex<Vec<Call>>,
}

impl MockService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_list(self, records: Vec<ExpenseRecord>) -> Self {
        self.lists.lock().unwrap().push_back(Ok(records));
        self
    }

    pub fn with_list_error(self) -> Self {
        self.lists
            .lock()
            .unwrap()
            .push_back(Err(ExpenseError::Status(500)));
        self
    }

    pub fn with_delete(self, status: u16) -> Self {
        self.deletes.lock().unwrap().push_back(Ok(status));
        self
    }

    pub fn with_delete_error(self) -> Self {
        self.deletes
            .lock()
            .unwrap()
            .push_back(Err(ExpenseError::Task("connection reset".into())));
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }
}

impl ExpenseService for MockService {
    fn list(&self, credential: &str) -> Result<Vec<ExpenseRecord>> {
        self.calls.lock().unwrap().push(Call::List {
            credential: credential.to_string(),
        });
        self.lists
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(ExpenseError::Status(500)))
    }

    fn delete_by_id(&self, id: &str, credential: &str) -> Result<u16> {
        self.calls.lock().unwrap().push(Call::Delete {
            id: id.to_string(),
            credential: credential.to_string(),
        });
        self.deletes.lock().unwrap().pop_front().unwrap_or(Ok(200))
    }
}

// ---------------------------------------------------------------------------
// GatedService
// ---------------------------------------------------------------------------

/// One scripted `list` call: announces itself on `entered`, then waits for
/// `release` (if any) before answering with `records`.
pub struct Step {
    pub entered: Option<Sender<()>>,
    pub release: Option<Receiver<()>>,
    pub records: Vec<ExpenseRecord>,
}

impl Step {
    pub fn immediate(records: Vec<ExpenseRecord>) -> Self {
        Self {
            entered: None,
            release: None,
            records,
        }
    }

    /// A step that blocks until the returned release sender fires (or is
    /// dropped). The returned receiver fires once the call has started.
    pub fn gated(records: Vec<ExpenseRecord>) -> (Self, Receiver<()>, Sender<()>) {
        let (entered_tx, entered_rx) = std::sync::mpsc::channel();
        let (release_tx, release_rx) = std::sync::mpsc::channel();
        let step = Self {
            entered: Some(entered_tx),
            release: Some(release_rx),
            records,
        };
        (step, entered_rx, release_tx)
    }
}

/// Service whose `list` responses are scripted as [`Step`]s and whose
/// deletes may likewise be held back.
#[derive(Default)]
pub struct GatedService {
    lists: Mutex<VecDeque<Step>>,
    deletes: Mutex<VecDeque<(Option<Sender<()>>, Option<Receiver<()>>, u16)>>,
}

impl GatedService {
    pub fn new(steps: Vec<Step>) -> Self {
        Self {
            lists: Mutex::new(steps.into()),
            deletes: Mutex::new(VecDeque::new()),
        }
    }

    /// Queue a delete answering `status` once released.
    pub fn gated_delete(&self, status: u16) -> (Receiver<()>, Sender<()>) {
        let (entered_tx, entered_rx) = std::sync::mpsc::channel();
        let (release_tx, release_rx) = std::sync::mpsc::channel();
        self.deletes
            .lock()
            .unwrap()
            .push_back((Some(entered_tx), Some(release_rx), status));
        (entered_rx, release_tx)
    }
}

impl ExpenseService for GatedService {
    fn list(&self, _credential: &str) -> Result<Vec<ExpenseRecord>> {
        let step = self
            .lists
            .lock()
            .unwrap()
            .pop_front()
            .ok_or(ExpenseError::Status(500))?;
        if let Some(entered) = step.entered {
            let _ = entered.send(());
        }
        if let Some(release) = step.release {
            let _ = release.recv();
        }
        Ok(step.records)
    }

    fn delete_by_id(&self, _id: &str, _credential: &str) -> Result<u16> {
        let next = self.deletes.lock().unwrap().pop_front();
        match next {
            Some((entered, release, status)) => {
                if let Some(entered) = entered {
                    let _ = entered.send(());
                }
                if let Some(release) = release {
                    let _ = release.recv();
                }
                Ok(status)
            }
            None => Ok(200),
        }
    }
}

// ---------------------------------------------------------------------------
// Local HTTP server
// ---------------------------------------------------------------------------

/// A canned HTTP answer.
pub struct Reply {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl Reply {
    pub fn new(status: u16, body: &str) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: body.to_string(),
        }
    }

    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }
}

/// Serve exactly one HTTP request on a random local port, answering with
/// `status` and `body`.
///
/// Returns the base URL and a handle yielding the raw request head.
pub fn serve_once(status: u16, body: &str) -> (String, JoinHandle<String>) {
    let (base, handle) = serve(vec![Reply::new(status, body)]);
    let handle = std::thread::spawn(move || handle.join().unwrap().remove(0));
    (base, handle)
}

/// Serve one connection per reply, in order, each closed after its answer.
///
/// Returns the base URL and a handle yielding the raw request heads.
pub fn serve(replies: Vec<Reply>) -> (String, JoinHandle<Vec<String>>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();

    let handle = std::thread::spawn(move || {
        let mut requests = Vec::new();
        for reply in replies {
            let (mut stream, _) = listener.accept().unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = stream.read(&mut buf).unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }

            let mut head = format!(
                "HTTP/1.1 {} Status\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n",
                reply.status,
                reply.body.len()
            );
            for (name, value) in &reply.headers {
                head.push_str(&format!("{}: {}\r\n", name, value));
            }
            head.push_str("\r\n");
            stream.write_all(head.as_bytes()).unwrap();
            stream.write_all(reply.body.as_bytes()).unwrap();
            stream.flush().unwrap();
            requests.push(String::from_utf8_lossy(&request).into_owned());
        }
        requests
    });

    (format!("http://{}", addr), handle)
}
