use std::fmt::{Display, Formatter};

#[derive(Debug)]
pub enum Error {
    Resolve { host: String, err: std::io::Error },
    NoAddresses(String),
    Bind(std::io::Error),
    Connect(std::io::Error),
    Send(std::io::Error),
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Resolve { host, err } => write!(f, "unable to resolve `{host}`, {err}"),
            Error::NoAddresses(host) => write!(f, "no addresses returned for `{host}`"),
            Error::Bind(err) => write!(f, "failed to bind local socket, {err}"),
            Error::Connect(err) => write!(f, "connect error, {err}"),
            Error::Send(err) => write!(f, "send error, {err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Resolve { err, .. }
            | Error::Bind(err)
            | Error::Connect(err)
            | Error::Send(err) => Some(err),
            Error::NoAddresses(_) => None,
        }
    }
}
