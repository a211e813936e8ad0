//! Delivery requesters.

use dd_core::EntityId;

use crate::Body;

/// A stationary entity that asks for, and eventually receives, packages.
#[derive(Debug, Clone)]
pub struct Robot {
    pub body:           Body,
    requested_delivery: bool,
    received:           Vec<EntityId>,
}

impl Robot {
    pub fn new(body: Body) -> Self {
        Self { body, requested_delivery: true, received: Vec::new() }
    }

    /// `true` until the robot has received a package.
    pub fn requested_delivery(&self) -> bool {
        self.requested_delivery
    }

    /// Packages handed to this robot, in arrival order.
    pub fn received(&self) -> &[EntityId] {
        &self.received
    }

    pub fn receive(&mut self, package: EntityId) {
        self.received.push(package);
        self.requested_delivery = false;
    }
}
