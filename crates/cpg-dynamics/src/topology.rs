// ─────────────────────────────────────────────────────────────────────
// Differential CPG Kernel — Actuator Topology
// ─────────────────────────────────────────────────────────────────────
//! Builds the oscillator-pair graph from a robot's actuator layout.
//!
//! Each actuator owns two neurons (A at flat index 2i, B at 2i+1).
//! Two actuators are coupled when their planar Manhattan distance equals
//! the module pitch, so only orthogonal lattice neighbours connect:
//! a diagonal neighbour sits at twice the pitch.
//!
//! The graph is a flat neuron array plus index pairs; nothing is
//! mutated after construction.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use cpg_types::layout::COORD_EPS;
use cpg_types::{validate_layout, ActuatorSpec, Coordinate, CpgResult, Polarity};

/// One half of an actuator's oscillator pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Neuron {
    /// Index of the owning actuator.
    pub actuator: usize,
    pub coordinate: Coordinate,
    pub polarity: Polarity,
}

/// Undirected coupling between the A neurons of two actuators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
    /// Lower actuator index.
    pub from: usize,
    /// Higher actuator index.
    pub to: usize,
    /// Position in the genome (already offset by the actuator count).
    pub weight_index: usize,
}

/// True if two actuators are orthogonal lattice neighbours.
#[inline]
pub fn is_adjacent(a: &Coordinate, b: &Coordinate, neighbor_distance: f64) -> bool {
    (a.planar_manhattan(b) - neighbor_distance).abs() < COORD_EPS
}

/// Immutable neuron / connection graph.
#[derive(Debug, Clone)]
pub struct Topology {
    actuators: Vec<ActuatorSpec>,
    neurons: Vec<Neuron>,
    connections: Vec<Connection>,
    /// Both orderings of each actuator pair → index into `connections`.
    lookup: HashMap<(usize, usize), usize>,
    neighbor_distance: f64,
}

impl Topology {
    /// Build the graph for an ordered actuator list.
    ///
    /// Connections get sequential genome slots in the order they are
    /// first discovered scanning pairs (i, j) with i < j.
    pub fn build(actuators: &[ActuatorSpec], neighbor_distance: f64) -> CpgResult<Self> {
        validate_layout(actuators)?;

        let n = actuators.len();
        let mut neurons = Vec::with_capacity(2 * n);
        for (i, a) in actuators.iter().enumerate() {
            neurons.push(Neuron {
                actuator: i,
                coordinate: a.coordinate,
                polarity: Polarity::A,
            });
            neurons.push(Neuron {
                actuator: i,
                coordinate: a.coordinate,
                polarity: Polarity::B,
            });
        }

        let mut connections = Vec::new();
        let mut lookup = HashMap::new();
        for i in 0..n {
            for j in 0..n {
                if i == j || lookup.contains_key(&(i, j)) {
                    continue;
                }
                if !is_adjacent(
                    &actuators[i].coordinate,
                    &actuators[j].coordinate,
                    neighbor_distance,
                ) {
                    continue;
                }
                let idx = connections.len();
                connections.push(Connection {
                    from: i.min(j),
                    to: i.max(j),
                    weight_index: n + idx,
                });
                lookup.insert((i, j), idx);
                lookup.insert((j, i), idx);
            }
        }

        Ok(Self {
            actuators: actuators.to_vec(),
            neurons,
            connections,
            lookup,
            neighbor_distance,
        })
    }

    pub fn n_actuators(&self) -> usize {
        self.actuators.len()
    }

    pub fn n_neurons(&self) -> usize {
        self.neurons.len()
    }

    /// Distinct undirected connections.
    pub fn n_connections(&self) -> usize {
        self.connections.len()
    }

    /// Genome length: one intra-pair gene per actuator plus one per connection.
    pub fn n_weights(&self) -> usize {
        self.n_actuators() + self.n_connections()
    }

    pub fn neighbor_distance(&self) -> f64 {
        self.neighbor_distance
    }

    pub fn actuators(&self) -> &[ActuatorSpec] {
        &self.actuators
    }

    /// Neurons in flat order: actuator-major, A before B.
    pub fn neurons(&self) -> &[Neuron] {
        &self.neurons
    }

    /// Distinct connections in discovery order.
    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    /// Connection between two actuators, from either endpoint.
    pub fn connection(&self, a: usize, b: usize) -> Option<&Connection> {
        self.lookup.get(&(a, b)).map(|&idx| &self.connections[idx])
    }

    /// Iterate every directed lookup entry (each connection appears twice).
    pub fn directed_pairs(&self) -> impl Iterator<Item = ((usize, usize), &Connection)> + '_ {
        self.lookup
            .iter()
            .map(move |(&pair, &idx)| (pair, &self.connections[idx]))
    }

    /// Flat neuron index by coordinate and polarity (linear scan).
    pub fn neuron_position(&self, coordinate: &Coordinate, polarity: Polarity) -> Option<usize> {
        self.neurons
            .iter()
            .position(|n| n.polarity == polarity && n.coordinate.approx_eq(coordinate))
    }

    /// Actuator index routed to by an (x, y) grid position.
    pub fn actuator_index_at(&self, x: f64, y: f64) -> Option<usize> {
        self.actuators
            .iter()
            .position(|a| a.coordinate.same_xy(x, y))
    }
}
