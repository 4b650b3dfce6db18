//! Small hand-built road graphs shared by unit tests.

use crate::loading::{EdgeRecord, NodeRecord};
use crate::{NodeId, RoadGraph};

pub(crate) fn node(osmid: NodeId, x: f64, y: f64) -> NodeRecord {
    NodeRecord {
        osmid,
        x,
        y,
        highway: None,
    }
}

pub(crate) fn signal(osmid: NodeId, x: f64, y: f64) -> NodeRecord {
    NodeRecord {
        highway: Some("traffic_signals".to_string()),
        ..node(osmid, x, y)
    }
}

/// Street taking `minutes` to traverse (length in meters at 60 km/h).
pub(crate) fn street(u: NodeId, v: NodeId, minutes: f64, oneway: bool) -> EdgeRecord {
    EdgeRecord {
        u,
        v,
        osmid: format!("{u}-{v}"),
        oneway,
        reversed: false,
        length: minutes * 1000.0,
        maxspeed: Some(60.0),
    }
}

/// Diamond 1-2-4-3-1 where 1 -> 2 is a one-way street.
///
/// ```text
///     2
///   ↗   \
///  1     4
///   \   /
///     3
/// ```
pub(crate) fn diamond() -> RoadGraph {
    RoadGraph::build(
        &[
            node(1, 0.0, 0.0),
            node(2, 1.0, 1.0),
            node(3, 1.0, -1.0),
            node(4, 2.0, 0.0),
        ],
        &[
            street(1, 2, 1.0, true),
            street(2, 4, 2.0, false),
            street(1, 3, 2.0, false),
            street(3, 4, 2.0, false),
        ],
    )
    .unwrap()
}

/// `size` x `size` grid with irregular costs and a few one-way streets,
/// strongly connected for sizes 3 to 7. Node ids are `row * size + col + 1`.
pub(crate) fn grid(size: i64) -> RoadGraph {
    let id = |row: i64, col: i64| row * size + col + 1;
    let mut nodes = Vec::new();
    let mut edges = Vec::new();

    for row in 0..size {
        for col in 0..size {
            nodes.push(node(id(row, col), col as f64, row as f64));
            let minutes = 1.0 + ((row * 7 + col * 3) % 5) as f64;
            if col + 1 < size {
                edges.push(street(id(row, col), id(row, col + 1), minutes, (row + 2 * col) % 5 == 0));
            }
            if row + 1 < size {
                let mut edge = street(id(row, col), id(row + 1, col), minutes + 0.5, col % 4 == 1);
                edge.reversed = row % 2 == 1;
                edges.push(edge);
            }
        }
    }

    RoadGraph::build(&nodes, &edges).unwrap()
}
