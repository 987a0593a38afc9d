//! Command context
//!
//! Built once per command-group invocation and passed by reference to every leaf command.
//! Holds the resolved profile, one client per API family the group talks to, the global
//! flags, and the runtime that drives network calls. Leaf commands never resolve profiles
//! or build clients themselves.

use crate::client::{ApiFamily, ClientFactory, ClientHandle};
use crate::error::CliError;
use crate::profile::{Profile, ProfileResolver, ResolveContext};
use crate::render::{OutputMode, RenderRequest, Renderer, Resource};
use std::collections::HashMap;
use std::future::Future;
use std::time::Duration;
use tokio::runtime::Runtime;
use tracing::{debug, info, warn};

/// Default interval between task status polls when `--wait` is set.
pub const DEFAULT_TASK_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Upper bound on how long `--wait` blocks on one task.
pub const DEFAULT_TASK_TIMEOUT: Duration = Duration::from_secs(600);

/// Global flags shared by every leaf command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobalOptions {
    pub output: OutputMode,
    /// Block until asynchronous server-side operations finish.
    pub wait: bool,
    /// Skip the family path suffix (local API testing).
    pub local: bool,
    pub task_poll_interval: Duration,
    pub task_timeout: Duration,
}

impl Default for GlobalOptions {
    fn default() -> Self {
        Self {
            output: OutputMode::Human,
            wait: false,
            local: false,
            task_poll_interval: DEFAULT_TASK_POLL_INTERVAL,
            task_timeout: DEFAULT_TASK_TIMEOUT,
        }
    }
}

/// Lifecycle of a command context. Transitions only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextState {
    Uninitialized,
    Resolving,
    Ready,
    Discarded,
}

/// Builds a [`CommandContext`] for one command group.
pub struct ContextBuilder<'a> {
    resolve: ResolveContext<'a>,
    options: GlobalOptions,
    state: ContextState,
}

impl<'a> ContextBuilder<'a> {
    pub fn new(resolve: ResolveContext<'a>, options: GlobalOptions) -> Self {
        Self {
            resolve,
            options,
            state: ContextState::Uninitialized,
        }
    }

    pub fn state(&self) -> ContextState {
        self.state
    }

    /// Resolve the profile and construct one client per requested family.
    ///
    /// Fails before any client is built when the profile carries no credentials.
    pub fn build<'r>(
        mut self,
        families: &[ApiFamily],
        renderer: Renderer<'r>,
    ) -> Result<CommandContext<'r>, CliError> {
        self.transition(ContextState::Resolving);

        let profile = ProfileResolver::resolve(&self.resolve)?;
        let mut clients = HashMap::new();
        for &family in families {
            if clients.contains_key(&family) {
                continue;
            }
            let client =
                ClientFactory::build(&profile, family, &profile.api_url, self.options.local)?;
            clients.insert(family, client);
        }

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| CliError::ClientInit(format!("failed to start async runtime: {}", e)))?;

        self.transition(ContextState::Ready);
        info!(
            profile = %profile.name,
            families = ?clients.keys().collect::<Vec<_>>(),
            output = ?self.options.output,
            wait = self.options.wait,
            "command context ready"
        );

        Ok(CommandContext {
            profile,
            clients,
            options: self.options,
            renderer,
            runtime,
            state: ContextState::Ready,
        })
    }

    fn transition(&mut self, next: ContextState) {
        debug!(from = ?self.state, to = ?next, "command context transition");
        self.state = next;
    }
}

/// Scoping object threaded through a command group's leaf commands.
pub struct CommandContext<'r> {
    profile: Profile,
    clients: HashMap<ApiFamily, ClientHandle>,
    options: GlobalOptions,
    renderer: Renderer<'r>,
    runtime: Runtime,
    state: ContextState,
}

impl<'r> CommandContext<'r> {
    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    pub fn options(&self) -> &GlobalOptions {
        &self.options
    }

    pub fn output_mode(&self) -> OutputMode {
        self.options.output
    }

    pub fn wait(&self) -> bool {
        self.options.wait
    }

    pub fn state(&self) -> ContextState {
        self.state
    }

    /// Client for `family`. Only families requested at build time are available.
    pub fn client(&self, family: ApiFamily) -> Result<&ClientHandle, CliError> {
        self.clients.get(&family).ok_or_else(|| {
            CliError::ClientInit(format!("no {} client in this command context", family))
        })
    }

    /// Run a network future to completion. An interrupt aborts it with `Cancelled`.
    pub fn block_on<F, T>(&self, context: &str, future: F) -> Result<T, CliError>
    where
        F: Future<Output = Result<T, CliError>>,
    {
        self.runtime.block_on(async {
            tokio::select! {
                result = future => result,
                Ok(()) = tokio::signal::ctrl_c() => {
                    warn!(context, "interrupted; aborting pending request");
                    Err(CliError::Cancelled(format!("interrupted while {}", context)))
                }
            }
        })
    }

    pub fn renderer(&self) -> Renderer<'r> {
        self.renderer
    }

    pub fn render<T: Resource>(&self, request: RenderRequest<'_, T>) -> Result<String, CliError> {
        self.renderer.render(request)
    }
}

impl Drop for CommandContext<'_> {
    fn drop(&mut self) {
        debug!(from = ?self.state, to = ?ContextState::Discarded, "command context transition");
        self.state = ContextState::Discarded;
    }
}
