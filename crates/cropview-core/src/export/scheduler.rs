use tracing::trace;

/// Identifies one export request. Later requests compare greater.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ExportTicket(u64);

impl ExportTicket {
    pub fn id(&self) -> u64 {
        self.0
    }
}

/// One-frame deferral plus last-write-wins delivery for exports.
///
/// `request` marks an export as due; repeated requests before the next
/// frame coalesce. At frame time `take_due` hands out the ticket and the
/// caller snapshots the live crop and transform. `accept` drops results
/// older than one already delivered.
#[derive(Clone, Debug, Default)]
pub struct ExportScheduler {
    issued: u64,
    pending: Option<ExportTicket>,
    latest_accepted: Option<ExportTicket>,
}

impl ExportScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request(&mut self) -> ExportTicket {
        if let Some(ticket) = self.pending {
            return ticket;
        }
        self.issued += 1;
        let ticket = ExportTicket(self.issued);
        self.pending = Some(ticket);
        trace!(ticket = ticket.0, "Export requested");
        ticket
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn take_due(&mut self) -> Option<ExportTicket> {
        self.pending.take()
    }

    /// True if the result for `ticket` should be delivered.
    pub fn accept(&mut self, ticket: ExportTicket) -> bool {
        if self.latest_accepted.is_some_and(|latest| ticket < latest) {
            trace!(ticket = ticket.0, "Stale export ignored");
            return false;
        }
        self.latest_accepted = Some(ticket);
        true
    }

    /// Drop a pending request without issuing it.
    pub fn cancel_pending(&mut self) {
        self.pending = None;
    }
}
