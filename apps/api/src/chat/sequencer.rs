use std::collections::HashMap;

use uuid::Uuid;

/// Identifies one outstanding request on one surface (a conversation).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    surface: Uuid,
    seq: u64,
}

/// Latest-wins request tracking. Every send issues a ticket with a higher sequence
/// number; a reply is applied only if its ticket is still the newest for its surface.
#[derive(Debug, Default)]
pub struct RequestSequencer {
    next: u64,
    latest: HashMap<Uuid, u64>,
}

impl RequestSequencer {
    pub fn issue(&mut self, surface: Uuid) -> Ticket {
        self.next += 1;
        self.latest.insert(surface, self.next);
        Ticket {
            surface,
            seq: self.next,
        }
    }

    pub fn is_latest(&self, ticket: Ticket) -> bool {
        self.latest.get(&ticket.surface) == Some(&ticket.seq)
    }

    /// Consumes the ticket. Returns whether its reply should be applied.
    pub fn finish(&mut self, ticket: Ticket) -> bool {
        let latest = self.is_latest(ticket);
        if latest {
            self.latest.remove(&ticket.surface);
        }
        latest
    }

    pub fn forget(&mut self, surface: Uuid) {
        self.latest.remove(&surface);
    }

    pub fn clear(&mut self) {
        self.latest.clear();
    }
}
