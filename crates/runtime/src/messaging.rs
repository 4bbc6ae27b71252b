//! Delivery of text to livings.
use mud_core::{EntityId, Messenger, RoomId, Tick};

use crate::census::Census;

/// One line of text delivered to one living.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Delivery {
    pub at: Tick,
    pub to: EntityId,
    pub text: String,
}

/// Records every delivery until drained by a frontend or test.
#[derive(Debug, Default)]
pub struct Outbox {
    deliveries: Vec<Delivery>,
}

impl Outbox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn deliveries(&self) -> &[Delivery] {
        &self.deliveries
    }

    /// Texts delivered to `entity`, oldest first.
    pub fn received_by(&self, entity: EntityId) -> impl Iterator<Item = &str> {
        self.deliveries
            .iter()
            .filter(move |delivery| delivery.to == entity)
            .map(|delivery| delivery.text.as_str())
    }

    pub fn drain(&mut self) -> std::vec::Drain<'_, Delivery> {
        self.deliveries.drain(..)
    }

    pub fn is_empty(&self) -> bool {
        self.deliveries.is_empty()
    }

    fn push(&mut self, at: Tick, to: EntityId, text: &str) {
        self.deliveries.push(Delivery {
            at,
            to,
            text: text.to_owned(),
        });
    }
}

/// Messenger resolving room audiences against the census.
pub struct Courier<'a> {
    pub census: &'a Census,
    pub outbox: &'a mut Outbox,
}

impl Messenger for Courier<'_> {
    fn tell(&mut self, entity: EntityId, text: &str) {
        if self.census.living(entity).is_some() {
            self.outbox.push(self.census.now(), entity, text);
        }
    }

    fn tell_room(&mut self, around: EntityId, except: &[EntityId], text: &str) {
        let Some(room) = self.census.room_of(around) else {
            return;
        };
        let now = self.census.now();
        for living in self.census.occupants(room) {
            if !except.contains(&living.id) {
                self.outbox.push(now, living.id, text);
            }
        }
    }
}

impl Courier<'_> {
    /// Tells everyone in `room`. Used when the usual anchor has left.
    pub fn tell_room_of(&mut self, room: RoomId, except: &[EntityId], text: &str) {
        let Some(anchor) = self.census.occupants(room).next().map(|living| living.id) else {
            return;
        };
        self.tell_room(anchor, except, text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::living::Living;
    use crate::room::Room;
    use mud_core::Message;

    #[test]
    fn room_delivery_honours_exclusions() {
        let mut census = Census::new();
        census.add_room(Room::new(RoomId(1), "square"));
        census.add_room(Room::new(RoomId(2), "alley"));
        census.insert_living(Living::player(EntityId(1), "Aria", RoomId(1)));
        census.insert_living(Living::player(EntityId(2), "Bram", RoomId(1)));
        census.insert_living(Living::player(EntityId(3), "Cato", RoomId(2)));

        let mut outbox = Outbox::new();
        let mut courier = Courier {
            census: &census,
            outbox: &mut outbox,
        };
        courier.deliver(&Message::room(EntityId(1), vec![EntityId(1)], "Bram waves."));
        courier.deliver(&Message::to(EntityId(3), "Psst."));
        courier.tell(EntityId(99), "nobody");

        assert_eq!(outbox.received_by(EntityId(2)).collect::<Vec<_>>(), ["Bram waves."]);
        assert_eq!(outbox.received_by(EntityId(1)).count(), 0);
        assert_eq!(outbox.received_by(EntityId(3)).collect::<Vec<_>>(), ["Psst."]);
    }
}
