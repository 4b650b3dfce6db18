//! `GeoJSON` export of routes and tours for external map viewers.

use geo::{Coord, LineString};
use geojson::{Feature, FeatureCollection, Geometry, GeometryValue};
use serde_json::{Map, Value as JsonValue, json};

use crate::{Error, NodeId, RoadGraph, Route, TourResult};

impl Route {
    /// Converts the route to a `GeoJSON` `FeatureCollection` with a single
    /// `LineString` feature.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownNode`] if the route references a node missing
    /// from `graph`.
    pub fn to_geojson(&self, graph: &RoadGraph) -> Result<FeatureCollection, Error> {
        let mut properties = Map::new();
        properties.insert("source".to_string(), json!(self.source));
        properties.insert("goal".to_string(), json!(self.goal));
        properties.insert("cost_minutes".to_string(), json!(self.cost));

        Ok(collection(vec![line_feature(graph, &self.nodes, properties)?]))
    }
}

impl TourResult {
    /// Converts the tour to a `GeoJSON` `FeatureCollection`, one `LineString`
    /// feature per leg in tour order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownNode`] if a leg references a node missing from
    /// `graph`.
    pub fn to_geojson(&self, graph: &RoadGraph) -> Result<FeatureCollection, Error> {
        let features = self
            .legs
            .iter()
            .enumerate()
            .map(|(index, leg)| {
                let mut properties = Map::new();
                properties.insert("leg".to_string(), json!(index));
                properties.insert("from".to_string(), json!(self.tour[index]));
                properties.insert("to".to_string(), json!(self.tour[index + 1]));
                properties.insert("cost_minutes".to_string(), json!(self.leg_costs[index]));
                line_feature(graph, leg, properties)
            })
            .collect::<Result<Vec<_>, Error>>()?;

        Ok(collection(features))
    }
}

fn line_feature(
    graph: &RoadGraph,
    nodes: &[NodeId],
    properties: Map<String, JsonValue>,
) -> Result<Feature, Error> {
    let coords = nodes
        .iter()
        .map(|&id| {
            graph
                .node(id)
                .map(|node| Coord::from(node.geometry))
                .ok_or(Error::UnknownNode(id))
        })
        .collect::<Result<Vec<_>, Error>>()?;
    let line = LineString::new(coords);

    Ok(Feature {
        bbox: None,
        geometry: Some(Geometry::new(GeometryValue::from(&line))),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    })
}

fn collection(features: Vec<Feature>) -> FeatureCollection {
    FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    }
}
