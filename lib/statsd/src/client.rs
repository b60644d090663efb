use std::fmt::{Display, Formatter};
use std::io::ErrorKind;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};

use serde::{Deserialize, Serialize};
use tokio::io::{AsyncWriteExt, BufWriter};
use tokio::net::{TcpStream, UdpSocket, lookup_host};

use crate::Error;

#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, Eq, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    #[default]
    Udp,
    Tcp,
}

impl Display for Protocol {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Protocol::Udp => f.write_str("udp"),
            Protocol::Tcp => f.write_str("tcp"),
        }
    }
}

enum Transport {
    Udp(UdpSocket),
    Tcp(BufWriter<TcpStream>),
}

/// A connected StatsD client.
///
/// UDP sends one datagram per line, TCP writes newline terminated lines
/// into a buffered stream which is drained by [`Client::flush`].
pub struct Client {
    peer: SocketAddr,
    transport: Transport,
}

impl Client {
    pub async fn connect(host: &str, port: u16, protocol: Protocol) -> Result<Self, Error> {
        let peer = lookup_host((host, port))
            .await
            .map_err(|err| Error::Resolve {
                host: host.to_string(),
                err,
            })?
            .next()
            .ok_or_else(|| Error::NoAddresses(host.to_string()))?;

        let transport = match protocol {
            Protocol::Udp => {
                let socket = UdpSocket::bind(find_bind_address(&peer))
                    .await
                    .map_err(Error::Bind)?;
                socket.connect(peer).await.map_err(Error::Connect)?;

                Transport::Udp(socket)
            }
            Protocol::Tcp => {
                let stream = TcpStream::connect(peer).await.map_err(Error::Connect)?;

                Transport::Tcp(BufWriter::new(stream))
            }
        };

        Ok(Self { peer, transport })
    }

    pub fn peer_addr(&self) -> SocketAddr {
        self.peer
    }

    pub fn protocol(&self) -> Protocol {
        match self.transport {
            Transport::Udp(_) => Protocol::Udp,
            Transport::Tcp(_) => Protocol::Tcp,
        }
    }

    /// Send a single encoded line, `line` must not contain the trailing newline.
    ///
    /// A refused UDP datagram is dropped, the port unreachable of an earlier
    /// datagram shows up on a later send and must not fail that one.
    pub async fn send(&mut self, line: &str) -> Result<(), Error> {
        match &mut self.transport {
            Transport::Udp(socket) => match socket.send(line.as_bytes()).await {
                Ok(_) => {}
                Err(err) if err.kind() == ErrorKind::ConnectionRefused => {
                    debug!(
                        message = "Datagram refused by peer, dropped",
                        peer = %self.peer,
                        %err
                    );
                }
                Err(err) => return Err(Error::Send(err)),
            },
            Transport::Tcp(writer) => {
                writer.write_all(line.as_bytes()).await.map_err(Error::Send)?;
                writer.write_all(b"\n").await.map_err(Error::Send)?;
            }
        }

        Ok(())
    }

    pub async fn flush(&mut self) -> Result<(), Error> {
        match &mut self.transport {
            Transport::Udp(_) => Ok(()),
            Transport::Tcp(writer) => writer.flush().await.map_err(Error::Send),
        }
    }
}

fn find_bind_address(remote: &SocketAddr) -> SocketAddr {
    match remote.ip() {
        IpAddr::V4(ip) if ip.is_loopback() => SocketAddr::new(Ipv4Addr::LOCALHOST.into(), 0),
        IpAddr::V6(ip) if ip.is_loopback() => SocketAddr::new(Ipv6Addr::LOCALHOST.into(), 0),
        IpAddr::V4(_) => SocketAddr::new(Ipv4Addr::UNSPECIFIED.into(), 0),
        IpAddr::V6(_) => SocketAddr::new(Ipv6Addr::UNSPECIFIED.into(), 0),
    }
}
