//! Deliverable packages.

use dd_core::{descriptor::DEFAULT_PACKAGE_WEIGHT, EntityId, SearchStrategy, Vec3};

use crate::Body;

/// A unit of cargo waiting at its pickup point, in a drone, or delivered.
///
/// The package never moves on its own: while carried, the drone mirrors its
/// own pose onto the package each tick.
#[derive(Debug, Clone)]
pub struct Package {
    pub body:          Body,
    destination:       Vec3,
    weight:            u32,
    strategy_name:     String,
    requires_delivery: bool,
    /// Drone assigned to (and later carrying) the package.
    carrier:           Option<EntityId>,
    /// Robot the package is addressed to.
    recipient:         Option<EntityId>,
    delivered:         bool,
}

impl Package {
    pub fn new(body: Body, destination: Vec3) -> Self {
        Self {
            body,
            destination,
            weight:            DEFAULT_PACKAGE_WEIGHT,
            strategy_name:     String::new(),
            requires_delivery: true,
            carrier:           None,
            recipient:         None,
            delivered:         false,
        }
    }

    pub fn id(&self) -> EntityId {
        self.body.id
    }

    pub fn position(&self) -> Vec3 {
        self.body.position
    }

    pub fn destination(&self) -> Vec3 {
        self.destination
    }

    pub fn weight(&self) -> u32 {
        self.weight
    }

    pub fn set_weight(&mut self, weight: u32) {
        self.weight = weight;
    }

    pub fn strategy_name(&self) -> &str {
        &self.strategy_name
    }

    pub fn set_strategy_name(&mut self, name: impl Into<String>) {
        self.strategy_name = name.into();
    }

    /// Routing strategy for the carry leg; unknown names fly a beeline.
    pub fn search(&self) -> SearchStrategy {
        SearchStrategy::from_name(&self.strategy_name)
    }

    pub fn requires_delivery(&self) -> bool {
        self.requires_delivery
    }

    /// Address the package to `recipient`; it no longer awaits scheduling.
    pub fn init_delivery(&mut self, recipient: EntityId) {
        self.recipient = Some(recipient);
        self.requires_delivery = false;
    }

    pub fn carrier(&self) -> Option<EntityId> {
        self.carrier
    }

    pub fn set_carrier(&mut self, drone: Option<EntityId>) {
        self.carrier = drone;
    }

    pub fn recipient(&self) -> Option<EntityId> {
        self.recipient
    }

    pub fn is_delivered(&self) -> bool {
        self.delivered
    }

    /// Release the package at its destination.  Returns the recipient.
    pub fn hand_off(&mut self) -> Option<EntityId> {
        self.carrier = None;
        self.delivered = true;
        self.recipient
    }
}
