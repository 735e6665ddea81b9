use crate::server_info::ServerInfo;

/// Fields every completed call reports besides its decoded data.
pub trait CallResult {
    /// Milliseconds between the call's start and the decode of its response.
    fn elapsed_millis(&self) -> u64;

    /// Uuid of the server that produced the response.
    fn ts_uuid(&self) -> &str;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListTabletServersResponse {
    elapsed_millis: u64,
    ts_uuid: String,
    servers_count: usize,
    servers: Vec<ServerInfo>,
}

impl ListTabletServersResponse {
    pub fn new(elapsed_millis: u64, ts_uuid: impl Into<String>, servers: Vec<ServerInfo>) -> Self {
        Self {
            elapsed_millis,
            ts_uuid: ts_uuid.into(),
            servers_count: servers.len(),
            servers,
        }
    }

    pub fn servers_count(&self) -> usize {
        self.servers_count
    }

    pub fn servers(&self) -> &[ServerInfo] {
        &self.servers
    }

    pub fn into_servers(self) -> Vec<ServerInfo> {
        self.servers
    }
}

impl CallResult for ListTabletServersResponse {
    fn elapsed_millis(&self) -> u64 {
        self.elapsed_millis
    }

    fn ts_uuid(&self) -> &str {
        &self.ts_uuid
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListMastersResponse {
    elapsed_millis: u64,
    ts_uuid: String,
    masters: Vec<ServerInfo>,
}

impl ListMastersResponse {
    pub fn new(elapsed_millis: u64, ts_uuid: impl Into<String>, masters: Vec<ServerInfo>) -> Self {
        Self {
            elapsed_millis,
            ts_uuid: ts_uuid.into(),
            masters,
        }
    }

    pub fn masters(&self) -> &[ServerInfo] {
        &self.masters
    }

    pub fn leader(&self) -> Option<&ServerInfo> {
        self.masters.iter().find(|master| master.is_leader())
    }
}

impl CallResult for ListMastersResponse {
    fn elapsed_millis(&self) -> u64 {
        self.elapsed_millis
    }

    fn ts_uuid(&self) -> &str {
        &self.ts_uuid
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PingResponse {
    elapsed_millis: u64,
    ts_uuid: String,
}

impl PingResponse {
    pub fn new(elapsed_millis: u64, ts_uuid: impl Into<String>) -> Self {
        Self {
            elapsed_millis,
            ts_uuid: ts_uuid.into(),
        }
    }
}

impl CallResult for PingResponse {
    fn elapsed_millis(&self) -> u64 {
        self.elapsed_millis
    }

    fn ts_uuid(&self) -> &str {
        &self.ts_uuid
    }
}
