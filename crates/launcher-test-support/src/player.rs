//! Test players — mock `Player` implementations for tests.

use std::sync::{Arc, Mutex};

use launcher_core::error::PlayerError;
use launcher_core::options::LaunchOptions;
use launcher_core::player::{Player, PlayerChannel, PlayerInstance};

type StartHook = Box<dyn Fn(&Arc<dyn PlayerChannel>) + Send + Sync>;

#[derive(Default)]
struct ScriptedState {
    launches: Vec<LaunchOptions>,
    channels: Vec<Arc<dyn PlayerChannel>>,
    releases: usize,
}

/// A player that starts instantly and does nothing on its own. Tests drive
/// it through the channel it captured on each `start`.
#[derive(Default)]
pub struct ScriptedPlayer {
    state: Arc<Mutex<ScriptedState>>,
    on_start: Option<StartHook>,
}

impl ScriptedPlayer {
    /// Creates a player with no start behaviour.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `hook` inside every `start`, before it returns. Useful for
    /// players that emit or complete synchronously.
    #[must_use]
    pub fn with_on_start<F>(mut self, hook: F) -> Self
    where
        F: Fn(&Arc<dyn PlayerChannel>) + Send + Sync + 'static,
    {
        self.on_start = Some(Box::new(hook));
        self
    }

    /// The channel captured by the most recent `start`.
    ///
    /// # Panics
    ///
    /// Panics if the player was never started.
    pub fn channel(&self) -> Arc<dyn PlayerChannel> {
        let state = self.state.lock().unwrap();
        Arc::clone(state.channels.last().expect("player was never started"))
    }

    /// Options passed to every `start`, in order.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn launches(&self) -> Vec<LaunchOptions> {
        self.state.lock().unwrap().launches.clone()
    }

    /// How many player instances have been released.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn release_count(&self) -> usize {
        self.state.lock().unwrap().releases
    }
}

impl Player for ScriptedPlayer {
    fn start(
        &self,
        options: &LaunchOptions,
        channel: Arc<dyn PlayerChannel>,
    ) -> Result<Box<dyn PlayerInstance>, PlayerError> {
        {
            let mut state = self.state.lock().unwrap();
            state.launches.push(options.clone());
            state.channels.push(Arc::clone(&channel));
        }
        if let Some(hook) = &self.on_start {
            hook(&channel);
        }
        Ok(Box::new(ScriptedInstance {
            state: Arc::clone(&self.state),
        }))
    }
}

struct ScriptedInstance {
    state: Arc<Mutex<ScriptedState>>,
}

impl PlayerInstance for ScriptedInstance {
    fn release(self: Box<Self>) {
        self.state.lock().unwrap().releases += 1;
    }
}

/// A player that refuses every start.
#[derive(Debug)]
pub struct RefusingPlayer;

impl Player for RefusingPlayer {
    fn start(
        &self,
        _options: &LaunchOptions,
        _channel: Arc<dyn PlayerChannel>,
    ) -> Result<Box<dyn PlayerInstance>, PlayerError> {
        Err(PlayerError::Unavailable("engine not installed".into()))
    }
}
