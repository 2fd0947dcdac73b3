use serde::{Deserialize, Serialize};

/// A support request as submitted by the client. Not persisted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    pub name: String,
    pub topic: String,
    pub description: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketCreated {
    pub message: String,
    pub ticket: Ticket,
}

impl TicketCreated {
    pub const MESSAGE: &'static str = "Created";

    pub fn new(ticket: Ticket) -> TicketCreated {
        TicketCreated {
            message: TicketCreated::MESSAGE.to_string(),
            ticket,
        }
    }
}
