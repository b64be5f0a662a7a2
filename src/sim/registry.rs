//! Role-partitioned entity storage
//!
//! Retirement only marks an entity; `sweep` removes everything marked in one
//! pass. Systems can therefore retire while iterating and the removal order
//! within a tick is fixed.

use super::state::{Entity, EntityId, Explosion, Hazard, Pickup, Projectile, Star, Tracked};

/// Entity role, one container per role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Projectile,
    Hazard,
    Pickup,
    Explosion,
    Star,
}

impl Role {
    pub const ALL: [Role; 5] = [
        Role::Star,
        Role::Hazard,
        Role::Pickup,
        Role::Projectile,
        Role::Explosion,
    ];
}

/// Handle to a registered entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntityRef {
    pub role: Role,
    pub id: EntityId,
}

/// Borrowed view of a live entity
#[derive(Debug, Clone, Copy)]
pub enum EntityView<'a> {
    Projectile(&'a Projectile),
    Hazard(&'a Hazard),
    Pickup(&'a Pickup),
    Explosion(&'a Explosion),
    Star(&'a Star),
}

/// Owns every entity of the session except the ship
#[derive(Debug, Clone, Default)]
pub struct Registry {
    pub projectiles: Vec<Projectile>,
    pub hazards: Vec<Hazard>,
    pub pickups: Vec<Pickup>,
    pub explosions: Vec<Explosion>,
    pub stars: Vec<Star>,
    next_id: u32,
}

impl Registry {
    /// Allocate a new entity ID
    fn next_entity_id(&mut self) -> EntityId {
        self.next_id += 1;
        EntityId(self.next_id)
    }

    /// Insert an entity into its role's container
    pub fn add(&mut self, entity: Entity) -> EntityRef {
        let id = self.next_entity_id();
        let role = match entity {
            Entity::Projectile(mut e) => {
                e.life_mut().id = id;
                self.projectiles.push(e);
                Role::Projectile
            }
            Entity::Hazard(mut e) => {
                e.life_mut().id = id;
                self.hazards.push(e);
                Role::Hazard
            }
            Entity::Pickup(mut e) => {
                e.life_mut().id = id;
                self.pickups.push(e);
                Role::Pickup
            }
            Entity::Explosion(mut e) => {
                e.life_mut().id = id;
                self.explosions.push(e);
                Role::Explosion
            }
            Entity::Star(mut e) => {
                e.life_mut().id = id;
                self.stars.push(e);
                Role::Star
            }
        };
        EntityRef { role, id }
    }

    /// Drop every entity of a role immediately
    pub fn remove_all(&mut self, role: Role) {
        match role {
            Role::Projectile => self.projectiles.clear(),
            Role::Hazard => self.hazards.clear(),
            Role::Pickup => self.pickups.clear(),
            Role::Explosion => self.explosions.clear(),
            Role::Star => self.stars.clear(),
        }
    }

    /// Drop everything
    pub fn clear(&mut self) {
        for role in Role::ALL {
            self.remove_all(role);
        }
    }

    /// Visit live entities of a role in insertion order
    pub fn for_each<'a>(&'a self, role: Role, mut f: impl FnMut(EntityView<'a>)) {
        match role {
            Role::Projectile => live(&self.projectiles).for_each(|e| f(EntityView::Projectile(e))),
            Role::Hazard => live(&self.hazards).for_each(|e| f(EntityView::Hazard(e))),
            Role::Pickup => live(&self.pickups).for_each(|e| f(EntityView::Pickup(e))),
            Role::Explosion => live(&self.explosions).for_each(|e| f(EntityView::Explosion(e))),
            Role::Star => live(&self.stars).for_each(|e| f(EntityView::Star(e))),
        }
    }

    /// Mark an entity for removal. Returns `false` if it was already retired
    /// or is unknown, so effects keyed on retirement apply at most once.
    pub fn retire(&mut self, entity: EntityRef) -> bool {
        match entity.role {
            Role::Projectile => retire_in(&mut self.projectiles, entity.id),
            Role::Hazard => retire_in(&mut self.hazards, entity.id),
            Role::Pickup => retire_in(&mut self.pickups, entity.id),
            Role::Explosion => retire_in(&mut self.explosions, entity.id),
            Role::Star => retire_in(&mut self.stars, entity.id),
        }
    }

    /// Remove everything marked retired
    pub fn sweep(&mut self) {
        self.projectiles.retain(|e| e.is_alive());
        self.hazards.retain(|e| e.is_alive());
        self.pickups.retain(|e| e.is_alive());
        self.explosions.retain(|e| e.is_alive());
        self.stars.retain(|e| e.is_alive());
    }

    /// Live entities of a role
    pub fn count(&self, role: Role) -> usize {
        let mut n = 0;
        self.for_each(role, |_| n += 1);
        n
    }

    pub fn is_empty(&self) -> bool {
        Role::ALL.iter().all(|&role| self.count(role) == 0)
    }
}

fn live<T: Tracked>(items: &[T]) -> impl Iterator<Item = &T> {
    items.iter().filter(|e| e.is_alive())
}

fn retire_in<T: Tracked>(items: &mut [T], id: EntityId) -> bool {
    match items.iter_mut().find(|e| e.id() == id) {
        Some(e) if e.is_alive() => {
            e.life_mut().alive = false;
            true
        }
        _ => false,
    }
}
