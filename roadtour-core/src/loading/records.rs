use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use super::de::{deserialize_flag, deserialize_speed};
use crate::{Error, NodeId};

/// Node row: `osmid,y,x[,highway]`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NodeRecord {
    pub osmid: NodeId,
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub highway: Option<String>,
}

/// Edge row: `u,v,osmid,oneway,reversed,length,maxspeed`
///
/// `length` is in meters, `maxspeed` in km/h.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EdgeRecord {
    pub u: NodeId,
    pub v: NodeId,
    pub osmid: String,
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub oneway: bool,
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub reversed: bool,
    pub length: f64,
    #[serde(default, deserialize_with = "deserialize_speed")]
    pub maxspeed: Option<f64>,
}

pub fn read_node_records<R: Read>(reader: R) -> Result<Vec<NodeRecord>, Error> {
    deserialize_records(reader)
}

pub fn read_edge_records<R: Read>(reader: R) -> Result<Vec<EdgeRecord>, Error> {
    deserialize_records(reader)
}

pub fn read_node_csv(path: &Path) -> Result<Vec<NodeRecord>, Error> {
    read_node_records(open(path)?)
}

pub fn read_edge_csv(path: &Path) -> Result<Vec<EdgeRecord>, Error> {
    read_edge_records(open(path)?)
}

fn deserialize_records<R, T>(reader: R) -> Result<Vec<T>, Error>
where
    R: Read,
    T: for<'de> Deserialize<'de>,
{
    csv::Reader::from_reader(reader)
        .deserialize()
        .collect::<Result<Vec<T>, _>>()
        .map_err(Error::from)
}

fn open(path: &Path) -> Result<File, Error> {
    File::open(path).map_err(|e| {
        Error::IoError(std::io::Error::new(
            e.kind(),
            format!("Failed to open file '{}': {}", path.display(), e),
        ))
    })
}
