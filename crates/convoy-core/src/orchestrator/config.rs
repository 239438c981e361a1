/// What a failing result channel does to the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChannelErrorPolicy {
    /// Fail the whole run and cancel every other task.
    #[default]
    Abort,
    /// Log the failure and keep the slot as it is; the run may then end without a verdict.
    KeepPending,
}

#[derive(Debug, Clone, Default)]
pub struct OrchestratorConfig {
    /// Keep listening after the first verdict and emit a new one for every later result.
    pub watch: bool,
    pub channel_errors: ChannelErrorPolicy,
}

impl OrchestratorConfig {
    pub fn with_watch(mut self, watch: bool) -> Self {
        self.watch = watch;
        self
    }

    pub fn with_channel_errors(mut self, policy: ChannelErrorPolicy) -> Self {
        self.channel_errors = policy;
        self
    }
}
