#![allow(dead_code)]
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::net::UdpSocket;
use tokio::sync::oneshot;

pub const RCODE_SERVFAIL: u8 = 2;
pub const RCODE_NXDOMAIN: u8 = 3;
pub const RCODE_REFUSED: u8 = 5;

/// What the mock server answers for one record name
#[derive(Debug, Clone)]
pub enum MockAnswer {
    /// NOERROR with one TXT record per entry; each entry holds the
    /// character-strings of that record.
    Txt(Vec<Vec<String>>),
    /// Header-only response with the given RCODE
    Rcode(u8),
    /// NOERROR with the TC bit set
    Truncated,
    /// Never respond
    Silent,
}

impl MockAnswer {
    pub fn values(values: &[&str]) -> Self {
        Self::Txt(values.iter().map(|v| vec![v.to_string()]).collect())
    }
}

/// UDP DNS server answering TXT queries from a fixed table.
///
/// Names missing from the table get NXDOMAIN.
pub struct MockTxtServer {
    addr: SocketAddr,
    queries: Arc<AtomicUsize>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockTxtServer {
    pub async fn start(answers: HashMap<String, MockAnswer>) -> Result<Self, std::io::Error> {
        let socket = UdpSocket::bind("127.0.0.1:0").await?;
        let addr = socket.local_addr()?;
        let queries = Arc::new(AtomicUsize::new(0));

        let (shutdown_tx, mut shutdown_rx) = oneshot::channel();
        let counter = Arc::clone(&queries);

        tokio::spawn(async move {
            let mut buf = vec![0u8; 512];

            loop {
                tokio::select! {
                    _ = &mut shutdown_rx => break,
                    result = socket.recv_from(&mut buf) => {
                        let Ok((len, peer)) = result else { continue };
                        counter.fetch_add(1, Ordering::SeqCst);

                        let query = &buf[..len];
                        let answer = query_name(query)
                            .and_then(|name| answers.get(&name).cloned())
                            .unwrap_or(MockAnswer::Rcode(RCODE_NXDOMAIN));

                        if let Some(response) = build_response(query, &answer) {
                            let _ = socket.send_to(&response, peer).await;
                        }
                    }
                }
            }
        });

        Ok(Self {
            addr,
            queries,
            shutdown_tx: Some(shutdown_tx),
        })
    }

    /// Server answering a single record name
    pub async fn single(name: &str, answer: MockAnswer) -> Result<Self, std::io::Error> {
        Self::start(HashMap::from([(name.to_string(), answer)])).await
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn queries(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }

    pub fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for MockTxtServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

/// Question name of a query, lowercase, without the trailing dot
pub fn query_name(query: &[u8]) -> Option<String> {
    let mut pos = 12;
    let mut labels = Vec::new();

    loop {
        let len = *query.get(pos)? as usize;
        pos += 1;
        if len == 0 {
            break;
        }
        let label = query.get(pos..pos + len)?;
        labels.push(String::from_utf8_lossy(label).to_ascii_lowercase());
        pos += len;
    }

    Some(labels.join("."))
}

/// Response to `query` in wire format; `None` for [`MockAnswer::Silent`]
pub fn build_response(query: &[u8], answer: &MockAnswer) -> Option<Vec<u8>> {
    if query.len() < 12 {
        return None;
    }

    let no_records: &[Vec<String>] = &[];
    let (rcode, truncated, records) = match answer {
        MockAnswer::Txt(records) => (0u8, false, records.as_slice()),
        MockAnswer::Rcode(rcode) => (*rcode, false, no_records),
        MockAnswer::Truncated => (0u8, true, no_records),
        MockAnswer::Silent => return None,
    };

    let mut response = Vec::with_capacity(512);

    // Transaction ID
    response.extend_from_slice(&query[0..2]);

    // QR=1, RD=1, TC as requested
    response.push(if truncated { 0x83 } else { 0x81 });
    // RA=1, RCODE
    response.push(0x80 | (rcode & 0x0f));

    // Questions count (from query)
    response.extend_from_slice(&query[4..6]);
    response.extend_from_slice(&(records.len() as u16).to_be_bytes());
    // Authority and additional: 0
    response.extend_from_slice(&[0x00, 0x00, 0x00, 0x00]);

    // Question section
    response.extend_from_slice(&query[12..]);

    for strings in records {
        let rdata: Vec<u8> = strings
            .iter()
            .flat_map(|s| {
                let bytes = s.as_bytes();
                std::iter::once(bytes.len() as u8).chain(bytes.iter().copied())
            })
            .collect();

        response.extend_from_slice(&[
            0xc0, 0x0c, // Name pointer to question
            0x00, 0x10, // Type TXT
            0x00, 0x01, // Class IN
            0x00, 0x00, 0x00, 0x3c, // TTL: 60 seconds
        ]);
        response.extend_from_slice(&(rdata.len() as u16).to_be_bytes());
        response.extend_from_slice(&rdata);
    }

    Some(response)
}

/// Overwrites the transaction ID of a wire-format message
pub fn with_id(mut message: Vec<u8>, id: u16) -> Vec<u8> {
    message[0..2].copy_from_slice(&id.to_be_bytes());
    message
}
