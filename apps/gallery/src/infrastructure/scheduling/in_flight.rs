use tokio::task::AbortHandle;

/// The one outstanding request for a resource, tagged with the generation it
/// was dispatched under. A response is only applied if its generation is
/// still the current one; aborting only stops the local task, the server may
/// already have acted on the call.
#[derive(Debug)]
pub struct InFlight {
    generation: u64,
    handle: AbortHandle,
}

impl InFlight {
    pub fn new(generation: u64, handle: AbortHandle) -> Self {
        Self { generation, handle }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn abort(self) {
        self.handle.abort();
    }
}
