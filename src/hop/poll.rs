//! The polling loop that reads the player's flags and drives the control field

use super::state::{step, HopState, WriteDecision};
use crate::config::Config;
use crate::core::types::{Address, MemoryError, MemoryResult};
use crate::input::InputSource;
use crate::memory::SafeAccess;
use std::fmt;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error, info, warn};

/// Resolved, immutable parameters of the loop
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollConfig {
    /// Absolute address of the local player pointer
    pub local_player_ptr: Address,
    /// Offset of the flag word inside the player structure
    pub flags_offset: usize,
    /// Absolute address of the control field
    pub control_address: Address,
    pub engage_value: u32,
    pub disengage_value: u32,
    pub engage_delay: Duration,
    pub tick_interval: Duration,
}

impl PollConfig {
    /// Turn module-relative offsets into absolute addresses
    pub fn resolve(config: &Config, module_base: Address) -> MemoryResult<Self> {
        Ok(PollConfig {
            local_player_ptr: module_base.checked_offset(config.offsets.local_player.as_usize())?,
            flags_offset: config.offsets.flags.as_usize(),
            control_address: module_base.checked_offset(config.offsets.control.as_usize())?,
            engage_value: config.control.engage_value,
            disengage_value: config.control.disengage_value,
            engage_delay: Duration::from_millis(config.control.engage_delay_ms),
            tick_interval: Duration::from_millis(config.control.tick_interval_ms),
        })
    }

    /// Control value written for a decision
    pub fn value_for(&self, decision: WriteDecision) -> u32 {
        match decision {
            WriteDecision::Engage => self.engage_value,
            WriteDecision::Disengage => self.disengage_value,
        }
    }
}

/// Step of a tick that touched target memory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickStage {
    /// Reading the local player pointer
    LocalPlayer,
    /// Reading the flag word through that pointer
    Flags,
    /// Writing the control value
    Control,
}

impl fmt::Display for TickStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TickStage::LocalPlayer => write!(f, "local player"),
            TickStage::Flags => write!(f, "flags"),
            TickStage::Control => write!(f, "control"),
        }
    }
}

/// A tick that failed; the loop logs it and carries on
#[derive(Debug, Error)]
#[error("{stage} stage failed: {source}")]
pub struct TickError {
    pub stage: TickStage,
    #[source]
    pub source: MemoryError,
}

impl TickError {
    fn at(stage: TickStage) -> impl FnOnce(MemoryError) -> TickError {
        move |source| TickError { stage, source }
    }
}

/// What a successful tick saw and did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickReport {
    pub flag_word: u32,
    pub state: HopState,
    pub decision: WriteDecision,
    pub value: u32,
}

/// Running counters, reported when the loop stops
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickStats {
    pub ticks: u64,
    pub engaged: u64,
    pub disengaged: u64,
    pub read_failures: u64,
    pub write_failures: u64,
}

/// The control loop
pub struct PollLoop<A, I> {
    access: A,
    input: I,
    config: PollConfig,
    state: HopState,
    stats: TickStats,
}

impl<A: SafeAccess, I: InputSource> PollLoop<A, I> {
    pub fn new(access: A, input: I, config: PollConfig) -> Self {
        PollLoop {
            access,
            input,
            config,
            state: HopState::default(),
            stats: TickStats::default(),
        }
    }

    pub fn state(&self) -> HopState {
        self.state
    }

    pub fn stats(&self) -> TickStats {
        self.stats
    }

    pub fn config(&self) -> &PollConfig {
        &self.config
    }

    /// First read of the pipeline: the local player pointer
    pub fn read_local_player(&self) -> Result<Address, TickError> {
        let raw = self
            .access
            .read_u64(self.config.local_player_ptr)
            .map_err(TickError::at(TickStage::LocalPlayer))?;

        let player = Address::try_from(raw).map_err(TickError::at(TickStage::LocalPlayer))?;
        if player.is_null() {
            return Err(TickError {
                stage: TickStage::LocalPlayer,
                source: MemoryError::pointer_chain_broken(1, "local player pointer is null"),
            });
        }
        Ok(player)
    }

    /// Second read of the pipeline: the flag word inside the player structure
    pub fn read_flags(&self, player: Address) -> Result<u32, TickError> {
        let at = player
            .checked_offset(self.config.flags_offset)
            .map_err(TickError::at(TickStage::Flags))?;
        self.access
            .read_u32(at)
            .map_err(TickError::at(TickStage::Flags))
    }

    fn write_control(&self, value: u32) -> Result<(), TickError> {
        self.access
            .write_u32(self.config.control_address, value)
            .map_err(TickError::at(TickStage::Control))
    }

    /// Run one tick: read, decide, optionally wait, write
    pub async fn tick(&mut self) -> Result<TickReport, TickError> {
        self.stats.ticks += 1;

        let flag_word = match self
            .read_local_player()
            .and_then(|player| self.read_flags(player))
        {
            Ok(word) => word,
            Err(e) => {
                self.stats.read_failures += 1;
                return Err(e);
            }
        };

        let input_active = self.input.is_active();
        let transition = step(self.state, flag_word, input_active);
        if transition.changed() {
            debug!(from = %transition.from, to = %transition.to, flag_word, "state transition");
        }
        self.state = transition.to;

        if transition.decision == WriteDecision::Engage && !self.config.engage_delay.is_zero() {
            tokio::time::sleep(self.config.engage_delay).await;
        }

        let value = self.config.value_for(transition.decision);
        if let Err(e) = self.write_control(value) {
            self.stats.write_failures += 1;
            return Err(e);
        }

        match transition.decision {
            WriteDecision::Engage => self.stats.engaged += 1,
            WriteDecision::Disengage => self.stats.disengaged += 1,
        }

        Ok(TickReport {
            flag_word,
            state: self.state,
            decision: transition.decision,
            value,
        })
    }

    /// Tick until `shutdown` resolves, then return the counters.
    ///
    /// Cancellation only lands on the tick interval or the engage delay, never
    /// between a protection relax and its restore.
    pub async fn run_until<F>(mut self, shutdown: F) -> TickStats
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        info!(
            local_player = %self.config.local_player_ptr,
            control = %self.config.control_address,
            "poll loop running"
        );

        loop {
            tokio::select! {
                biased;
                _ = &mut shutdown => break,
                result = self.tick() => {
                    if let Err(e) = result {
                        warn!(stage = %e.stage, "tick failed: {}", e.source);
                    }
                }
            }

            tokio::select! {
                biased;
                _ = &mut shutdown => break,
                _ = tokio::time::sleep(self.config.tick_interval) => {}
            }
        }

        let stats = self.stats;
        info!(
            ticks = stats.ticks,
            engaged = stats.engaged,
            disengaged = stats.disengaged,
            read_failures = stats.read_failures,
            write_failures = stats.write_failures,
            "poll loop stopped"
        );
        stats
    }

    /// Like `run_until`, for a shutdown signal that can fail to register.
    ///
    /// A failed signal still stops the loop, but its error is returned
    /// instead of the counters.
    pub async fn run_until_signal<F, E>(self, signal: F) -> Result<TickStats, E>
    where
        F: Future<Output = Result<(), E>>,
    {
        let mut outcome = Ok(());
        let stats = self
            .run_until(async {
                outcome = signal.await;
            })
            .await;

        if outcome.is_err() {
            error!("shutdown signal failed, loop stopped after {} ticks", stats.ticks);
        }
        outcome.map(|()| stats)
    }
}
