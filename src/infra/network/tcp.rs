use crate::{
    application::network::transport::interface::{
        InboundMessage, TransportError, TransportInterface, TransportResult,
    },
    domain::{Ack, Envelope},
};
use std::{net::SocketAddr, time::Duration};
use tokio::{
    io::{self, AsyncBufReadExt, AsyncWriteExt, BufReader},
    net::{TcpListener, TcpStream, tcp::OwnedWriteHalf},
    sync::{
        Mutex,
        mpsc::{self, Receiver, Sender},
    },
    time,
};
use tracing::{info, warn};

const SEND_TIMEOUT: Duration = Duration::from_millis(4000);
const INBOUND_BUFFER: usize = 64;

pub struct TcpAdapter {
    listener: TcpListener,
    inbound_tx: Sender<InboundMessage>,
    inbound_rx: Mutex<Receiver<InboundMessage>>,
}

impl TcpAdapter {
    pub async fn new(port: u16) -> io::Result<Self> {
        let listener = TcpListener::bind(format!("0.0.0.0:{port}")).await?;
        let (inbound_tx, inbound_rx) = mpsc::channel(INBOUND_BUFFER);

        info!("Messaging listening on TCP {port}");

        Ok(Self {
            listener,
            inbound_tx,
            inbound_rx: Mutex::new(inbound_rx),
        })
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }
}

impl TransportInterface for TcpAdapter {
    async fn next(&self) -> io::Result<Option<InboundMessage>> {
        let mut inbound_rx = self.inbound_rx.lock().await;

        loop {
            tokio::select! {
                accepted = self.listener.accept() => {
                    let (stream, src_addr) = accepted?;
                    let tx = self.inbound_tx.clone();

                    tokio::spawn(async move {
                        if let Err(err) = serve_connection(stream, src_addr, tx).await {
                            warn!(peer = %src_addr, "Connection error: {err}");
                        }
                    });
                }

                inbound = inbound_rx.recv() => return Ok(inbound),
            }
        }
    }

    async fn send(
        &self,
        addr: SocketAddr,
        envelope: &Envelope,
    ) -> TransportResult<serde_json::Value> {
        let mut line = serde_json::to_string(envelope)?;
        line.push('\n');

        time::timeout(SEND_TIMEOUT, send_once(addr, line))
            .await
            .map_err(|_| TransportError::Timeout)?
    }
}

/// One connection, many messages: bytes are buffered across reads, split on
/// the newline delimiter, and every decoded line is acknowledged in place.
/// An undecodable line gets no acknowledgment; the sender observes that as
/// a timeout.
async fn serve_connection(
    stream: TcpStream,
    src_addr: SocketAddr,
    tx: Sender<InboundMessage>,
) -> io::Result<()> {
    info!(peer = %src_addr, "Connection accepted");

    let (read_half, mut write_half) = stream.into_split();
    let mut reader = BufReader::new(read_half);
    let mut line = String::new();

    loop {
        line.clear();
        if reader.read_line(&mut line).await? == 0 {
            return Ok(()); // peer hung up
        }

        match serde_json::from_str::<Envelope>(line.trim()) {
            Ok(envelope) => {
                let _ = tx
                    .send(InboundMessage {
                        envelope,
                        src_ip: src_addr.ip(),
                    })
                    .await;

                write_ack(&mut write_half).await?;
            }

            Err(err) => {
                warn!(peer = %src_addr, "Invalid message line: {err}");
            }
        }
    }
}

async fn write_ack(write_half: &mut OwnedWriteHalf) -> io::Result<()> {
    let mut ack = serde_json::to_string(&Ack::ok()).map_err(io::Error::other)?;
    ack.push('\n');

    write_half.write_all(ack.as_bytes()).await
}

/// A fresh connection per call: write one newline-terminated envelope, wait
/// for the first newline-terminated response, resolve with its content.
async fn send_once(addr: SocketAddr, line: String) -> TransportResult<serde_json::Value> {
    let mut stream = TcpStream::connect(addr).await?;

    stream.write_all(line.as_bytes()).await?;

    let mut reader = BufReader::new(stream);
    let mut response = String::new();

    if reader.read_line(&mut response).await? == 0 {
        return Err(TransportError::ConnectionClosed);
    }

    serde_json::from_str(response.trim())
        .map_err(|_| TransportError::BadAck(response.trim().to_string()))
}
