//! # Role
//!
//! Work types executed per host within a stage. Roles order by their wire
//! name so that per-stage evaluation walks them in a reproducible sequence.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// A unit of work type executed on each host of a stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    ZookeeperServer,
    ZookeeperClient,
    Namenode,
    NamenodeServiceCheck,
    Datanode,
    SecondaryNamenode,
    HdfsClient,
    HdfsServiceCheck,
    Jobtracker,
    Tasktracker,
    MapreduceClient,
    MapreduceServiceCheck,
    HbaseMaster,
    HbaseRegionserver,
    HbaseClient,
    HbaseServiceCheck,
    HiveServer,
    HiveMetastore,
    HiveClient,
    OozieServer,
    OozieClient,
    GangliaServer,
    GangliaMonitor,
    NagiosServer,
}

impl Role {
    pub const ALL: &'static [Role] = &[
        Self::ZookeeperServer,
        Self::ZookeeperClient,
        Self::Namenode,
        Self::NamenodeServiceCheck,
        Self::Datanode,
        Self::SecondaryNamenode,
        Self::HdfsClient,
        Self::HdfsServiceCheck,
        Self::Jobtracker,
        Self::Tasktracker,
        Self::MapreduceClient,
        Self::MapreduceServiceCheck,
        Self::HbaseMaster,
        Self::HbaseRegionserver,
        Self::HbaseClient,
        Self::HbaseServiceCheck,
        Self::HiveServer,
        Self::HiveMetastore,
        Self::HiveClient,
        Self::OozieServer,
        Self::OozieClient,
        Self::GangliaServer,
        Self::GangliaMonitor,
        Self::NagiosServer,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ZookeeperServer => "ZOOKEEPER_SERVER",
            Self::ZookeeperClient => "ZOOKEEPER_CLIENT",
            Self::Namenode => "NAMENODE",
            Self::NamenodeServiceCheck => "NAMENODE_SERVICE_CHECK",
            Self::Datanode => "DATANODE",
            Self::SecondaryNamenode => "SECONDARY_NAMENODE",
            Self::HdfsClient => "HDFS_CLIENT",
            Self::HdfsServiceCheck => "HDFS_SERVICE_CHECK",
            Self::Jobtracker => "JOBTRACKER",
            Self::Tasktracker => "TASKTRACKER",
            Self::MapreduceClient => "MAPREDUCE_CLIENT",
            Self::MapreduceServiceCheck => "MAPREDUCE_SERVICE_CHECK",
            Self::HbaseMaster => "HBASE_MASTER",
            Self::HbaseRegionserver => "HBASE_REGIONSERVER",
            Self::HbaseClient => "HBASE_CLIENT",
            Self::HbaseServiceCheck => "HBASE_SERVICE_CHECK",
            Self::HiveServer => "HIVE_SERVER",
            Self::HiveMetastore => "HIVE_METASTORE",
            Self::HiveClient => "HIVE_CLIENT",
            Self::OozieServer => "OOZIE_SERVER",
            Self::OozieClient => "OOZIE_CLIENT",
            Self::GangliaServer => "GANGLIA_SERVER",
            Self::GangliaMonitor => "GANGLIA_MONITOR",
            Self::NagiosServer => "NAGIOS_SERVER",
        }
    }
}

impl Ord for Role {
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_str().cmp(other.as_str())
    }
}

impl PartialOrd for Role {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| format!("Invalid role: {s}"))
    }
}
