use std::fmt;

/// Reachable endpoint of one cluster node, as reported at the time of a call.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ServerInfo {
    uuid: String,
    host: String,
    port: u16,
    is_leader: bool,
}

impl ServerInfo {
    pub fn new(uuid: impl Into<String>, host: impl Into<String>, port: u16, is_leader: bool) -> Self {
        Self {
            uuid: uuid.into(),
            host: host.into(),
            port,
            is_leader,
        }
    }

    pub fn uuid(&self) -> &str {
        &self.uuid
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn is_leader(&self) -> bool {
        self.is_leader
    }
}

impl fmt::Display for ServerInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}:{}", self.uuid, self.host, self.port)?;
        if self.is_leader {
            write!(f, " (leader)")?;
        }
        Ok(())
    }
}
