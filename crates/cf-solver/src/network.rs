//! Network of connections and components.

use crate::error::{SolverError, SolverResult};
use cf_components::{Component, Connection, Port};
use cf_core::units::{Temperature, pa};
use cf_core::{CompId, ConnId};
use cf_fluids::{FluidModel, Species};

/// Streams, components and the port wiring between them.
///
/// Connections and components live as long as the network; repeated solves
/// start from the state the previous solve left behind.
pub struct Network {
    species: Vec<Species>,
    fluid: Box<dyn FluidModel>,
    connections: Vec<Connection>,
    components: Vec<Box<dyn Component>>,
    wiring: Vec<[Option<ConnId>; 3]>,
}

impl Network {
    /// Empty network over `species`; every connection carries one mass
    /// fraction per species, in this order.
    pub fn new(species: Vec<Species>, fluid: impl FluidModel + 'static) -> Self {
        Self {
            species,
            fluid: Box::new(fluid),
            connections: Vec::new(),
            components: Vec::new(),
            wiring: Vec::new(),
        }
    }

    pub fn species(&self) -> &[Species] {
        &self.species
    }

    pub fn fluid(&self) -> &dyn FluidModel {
        self.fluid.as_ref()
    }

    pub fn add_connection(&mut self, label: impl Into<String>) -> ConnId {
        self.connections.push(Connection::new(label, &self.species));
        ConnId::from_index(self.connections.len() - 1)
    }

    pub fn connection(&self, id: ConnId) -> SolverResult<&Connection> {
        self.connections
            .get(id.index())
            .ok_or_else(|| SolverError::ProblemSetup {
                what: format!("unknown connection {id}"),
            })
    }

    pub fn connection_mut(&mut self, id: ConnId) -> SolverResult<&mut Connection> {
        self.connections
            .get_mut(id.index())
            .ok_or_else(|| SolverError::ProblemSetup {
                what: format!("unknown connection {id}"),
            })
    }

    pub fn connections(&self) -> impl Iterator<Item = (ConnId, &Connection)> + '_ {
        self.connections
            .iter()
            .enumerate()
            .map(|(i, c)| (ConnId::from_index(i), c))
    }

    /// Add a component built for the network's species list.
    pub fn add_component(&mut self, component: impl Component + 'static) -> SolverResult<CompId> {
        if component.species() != self.species.as_slice() {
            return Err(SolverError::ProblemSetup {
                what: format!(
                    "component {} was built for a different species list",
                    component.label()
                ),
            });
        }
        self.components.push(Box::new(component));
        self.wiring.push([None; 3]);
        Ok(CompId::from_index(self.components.len() - 1))
    }

    pub fn component(&self, id: CompId) -> SolverResult<&dyn Component> {
        self.components
            .get(id.index())
            .map(|c| c.as_ref())
            .ok_or_else(|| SolverError::ProblemSetup {
                what: format!("unknown component {id}"),
            })
    }

    pub fn component_mut(&mut self, id: CompId) -> SolverResult<&mut (dyn Component + 'static)> {
        self.components
            .get_mut(id.index())
            .map(|c| c.as_mut())
            .ok_or_else(|| SolverError::ProblemSetup {
                what: format!("unknown component {id}"),
            })
    }

    pub fn components(&self) -> impl Iterator<Item = (CompId, &dyn Component)> + '_ {
        self.components
            .iter()
            .enumerate()
            .map(|(i, c)| (CompId::from_index(i), c.as_ref()))
    }

    /// Attach connection `conn` to `port` of component `comp`.
    pub fn connect(&mut self, comp: CompId, port: Port, conn: ConnId) -> SolverResult<()> {
        self.connection(conn)?;
        let slots = self
            .wiring
            .get_mut(comp.index())
            .ok_or_else(|| SolverError::ProblemSetup {
                what: format!("unknown component {comp}"),
            })?;
        if let Some(existing) = slots[port.index()] {
            return Err(SolverError::ProblemSetup {
                what: format!("port {port} of component {comp} is already connected to {existing}"),
            });
        }
        slots[port.index()] = Some(conn);
        Ok(())
    }

    /// Temperature of a connection from its current pressure, enthalpy
    /// and composition.
    pub fn temperature(&self, id: ConnId) -> SolverResult<Temperature> {
        let c = self.connection(id)?;
        let guess = c.temperature_spec().or(c.temperature_start());
        Ok(self.fluid.t_mix_ph(pa(c.p()), c.h(), c.fluid(), guess)?)
    }

    /// Resolved port connections of every component, in component order.
    pub(crate) fn resolved_wiring(&self) -> SolverResult<Vec<[usize; 3]>> {
        let mut attached = vec![false; self.connections.len()];
        let wiring = self
            .wiring
            .iter()
            .zip(&self.components)
            .map(|(slots, comp)| {
                let mut ports = [0; 3];
                for port in Port::ALL {
                    let conn = slots[port.index()].ok_or_else(|| SolverError::ProblemSetup {
                        what: format!("port {port} of {} is not connected", comp.label()),
                    })?;
                    attached[conn.index()] = true;
                    ports[port.index()] = conn.index();
                }
                Ok(ports)
            })
            .collect::<SolverResult<Vec<_>>>()?;

        if let Some(i) = attached.iter().position(|&a| !a) {
            return Err(SolverError::ProblemSetup {
                what: format!(
                    "connection {} is not attached to any component",
                    self.connections[i].label()
                ),
            });
        }
        Ok(wiring)
    }

    pub(crate) fn parts_mut(
        &mut self,
    ) -> (&dyn FluidModel, &mut [Connection], &mut [Box<dyn Component>]) {
        (
            self.fluid.as_ref(),
            &mut self.connections,
            &mut self.components,
        )
    }

    pub(crate) fn connections_slice(&self) -> &[Connection] {
        &self.connections
    }

    pub(crate) fn components_slice(&self) -> &[Box<dyn Component>] {
        &self.components
    }
}
