//! Fluent builder for constructing a [`SimulationModel`].

use tracing::warn;

use dd_core::{EntityDescriptor, SimConfig, TripRequest};
use dd_fleet::CompositeFactory;
use dd_spatial::RoutingGraph;

use crate::{Controller, SimError, SimResult, SimulationModel};

/// Fluent builder for [`SimulationModel<C>`].
///
/// # Optional inputs
///
/// | Method           | Default                                   |
/// |------------------|-------------------------------------------|
/// | `.graph(g)`      | none: graph searches fly direct           |
/// | `.factory(f)`    | `CompositeFactory::default()`             |
/// | `.entity(d)`     | no entities                               |
/// | `.trip(t)`       | no trips                                  |
///
/// Entities are created in the order given, so their ids follow that order.
/// Trips are scheduled after every entity exists.  Unlike
/// [`SimulationModel::create_entity`], the builder treats an unrecognized
/// entity type as an error; a trip that finds no requester or package is
/// only logged.
///
/// # Example
///
/// ```rust,ignore
/// let mut model = SimBuilder::new(config, NoopController)
///     .entity(EntityDescriptor::charging_station("cs", Vec3::ZERO, 2, 50.0))
///     .entity(EntityDescriptor::drone("d1", Vec3::ZERO, 3_000, 10))
///     .build()?;
/// model.run();
/// ```
pub struct SimBuilder<C: Controller> {
    config:     SimConfig,
    controller: C,
    graph:      Option<RoutingGraph>,
    factory:    Option<CompositeFactory>,
    entities:   Vec<EntityDescriptor>,
    trips:      Vec<TripRequest>,
}

impl<C: Controller> SimBuilder<C> {
    pub fn new(config: SimConfig, controller: C) -> Self {
        Self {
            config,
            controller,
            graph:    None,
            factory:  None,
            entities: Vec::new(),
            trips:    Vec::new(),
        }
    }

    /// Routing graph for `astar`/`dijkstra`/`bfs`/`dfs` trips.
    pub fn graph(mut self, graph: RoutingGraph) -> Self {
        self.graph = Some(graph);
        self
    }

    /// Replace the standard entity factories.
    pub fn factory(mut self, factory: CompositeFactory) -> Self {
        self.factory = Some(factory);
        self
    }

    pub fn entity(mut self, desc: EntityDescriptor) -> Self {
        self.entities.push(desc);
        self
    }

    pub fn entities(mut self, descs: impl IntoIterator<Item = EntityDescriptor>) -> Self {
        self.entities.extend(descs);
        self
    }

    pub fn trip(mut self, trip: TripRequest) -> Self {
        self.trips.push(trip);
        self
    }

    pub fn trips(mut self, trips: impl IntoIterator<Item = TripRequest>) -> Self {
        self.trips.extend(trips);
        self
    }

    /// Validate the config, create every entity, schedule every trip.
    pub fn build(self) -> SimResult<SimulationModel<C>> {
        let dt = self.config.tick_dt;
        if !(dt.is_finite() && dt > 0.0) {
            return Err(SimError::Config(format!("tick_dt must be positive, got {dt}")));
        }

        let mut model = SimulationModel::new(self.config, self.controller);
        if let Some(factory) = self.factory {
            model.factory = factory;
        }
        model.graph = self.graph;

        for desc in &self.entities {
            if model.create_entity(desc)?.is_none() {
                return Err(SimError::UnrecognizedEntity {
                    kind: desc.kind.clone(),
                    name: desc.name.clone(),
                });
            }
        }
        for trip in &self.trips {
            if model.schedule_trip(trip).is_none() {
                warn!(name = %trip.name, "trip has no matching requester and package, skipped");
            }
        }
        Ok(model)
    }
}
