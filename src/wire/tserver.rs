//! Schemas of the tablet-server service.

use serde_derive::{Deserialize, Serialize};

use super::Message;

pub const TABLET_SERVER_SERVICE_NAME: &str = "yb.tserver.TabletServerService";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PingRequestPb {}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PingResponsePb {}

impl Message for PingRequestPb {}
impl Message for PingResponsePb {}
