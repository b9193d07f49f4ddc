//! One-shot HTTP notification.
//!
//! Whoever launched the machine can poll this endpoint to learn which address
//! was announced and how long it took to get there. The first complete request
//! is answered and then [`Notifier::serve_once`] returns, which ends the
//! process. Nothing here touches the announcement pass; the notifier only
//! gets a copy of the interface it reports on.
use crate::{iface::NetworkInterface, Error, Result};
use hyper::header::{CONNECTION, CONTENT_TYPE};
use hyper::server::conn::Http;
use hyper::service::service_fn;
use hyper::{Body, Request, Response, StatusCode};
use serde::Serialize;
use std::future;
use std::io;
use std::net::{SocketAddr, TcpListener};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

// Budget for one connection, from accept to the end of the response.
const CONNECTION_TIMEOUT: Duration = Duration::from_secs(5);

/// The JSON body sent back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    /// First binding of the interface, in CIDR form.
    #[serde(rename = "Ip")]
    pub ip: Option<String>,
    #[serde(rename = "Mac")]
    pub mac: Option<String>,
    /// Microseconds between process start and the answer.
    #[serde(rename = "TimeSinceLaunchingPid1_us")]
    pub since_launch_us: u64,
}

/// What gets reported, captured once at bind time.
#[derive(Debug, Clone)]
struct Announced {
    ip: Option<String>,
    mac: Option<String>,
    boot: Instant,
}

impl Announced {
    fn notification(&self) -> Notification {
        Notification {
            ip: self.ip.clone(),
            mac: self.mac.clone(),
            since_launch_us: u64::try_from(self.boot.elapsed().as_micros()).unwrap_or(u64::MAX),
        }
    }
}

/// Serves a single notification request.
#[derive(Debug)]
pub struct Notifier {
    listener: TcpListener,
    announced: Announced,
}

impl Notifier {
    /// Start listening on `addr`, reporting on `iface`.
    ///
    /// # Errors
    ///
    /// Fails when the listener cannot be bound.
    pub fn bind(addr: SocketAddr, iface: &NetworkInterface, boot: Instant) -> Result<Self> {
        let listener = TcpListener::bind(addr).map_err(Error::Notify)?;
        Ok(Self {
            listener,
            announced: Announced {
                ip: iface.bindings.first().map(ToString::to_string),
                mac: iface.hardware_addr.map(|mac| mac.to_string()),
                boot,
            },
        })
    }

    /// The address actually bound, useful when the port was 0.
    ///
    /// # Errors
    ///
    /// Fails when the OS cannot report the socket address.
    pub fn local_addr(&self) -> Result<SocketAddr> {
        self.listener.local_addr().map_err(Error::Notify)
    }

    /// Block until one request has been answered.
    ///
    /// Connections that close, stall or send garbage before a request has
    /// been answered are logged and skipped.
    ///
    /// # Errors
    ///
    /// Fails when the runtime cannot start or accepting a connection fails.
    pub fn serve_once(self) -> Result<Notification> {
        tracing::info!(addr = %self.local_addr()?, "notification server starting");
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(Error::Notify)?;
        runtime.block_on(self.serve())
    }

    async fn serve(self) -> Result<Notification> {
        self.listener.set_nonblocking(true).map_err(Error::Notify)?;
        let listener = tokio::net::TcpListener::from_std(self.listener).map_err(Error::Notify)?;

        let mut http = Http::new();
        http.http1_keep_alive(false);

        loop {
            let (stream, peer) = listener.accept().await.map_err(Error::Notify)?;

            let served = Arc::new(Mutex::new(None));
            let service = {
                let announced = self.announced.clone();
                let served = Arc::clone(&served);
                service_fn(move |req: Request<Body>| {
                    let notification = announced.notification();
                    let response = respond(&notification);
                    if response.is_ok() {
                        tracing::debug!(method = %req.method(), uri = %req.uri(), "answering");
                        if let Ok(mut slot) = served.lock() {
                            *slot = Some(notification);
                        }
                    }
                    future::ready(response)
                })
            };

            let conn = http.serve_connection(stream, service);
            match tokio::time::timeout(CONNECTION_TIMEOUT, conn).await {
                Ok(Ok(())) => {
                    let notification = served.lock().ok().and_then(|mut slot| slot.take());
                    match notification {
                        Some(notification) => {
                            tracing::info!(%peer, us = notification.since_launch_us, "notification served");
                            return Ok(notification);
                        }
                        None => tracing::warn!(%peer, "connection closed before a request"),
                    }
                }
                Ok(Err(err)) => tracing::warn!(%peer, error = %err, "dropped notification connection"),
                Err(_) => tracing::warn!(%peer, "notification connection timed out"),
            }
        }
    }

    #[cfg(test)]
    fn notification(&self) -> Notification {
        self.announced.notification()
    }
}

fn respond(notification: &Notification) -> io::Result<Response<Body>> {
    let mut body = serde_json::to_vec(notification)?;
    body.push(b'\n');
    Response::builder()
        .status(StatusCode::OK)
        .header(CONTENT_TYPE, "application/json")
        .header(CONNECTION, "close")
        .body(Body::from(body))
        .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))
}
