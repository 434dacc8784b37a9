//! The tick loop tying VMC input to Mop output.
//!
//! ```text
//! tick(now):
//!   1. queued Reconfigure -> settings (+ file), debounce restarts
//!   2. restart any transport whose settings have been quiet long enough
//!   3. drain inbound -> router -> rig
//!   4. sequencer step (calibration, then one bundle per tick) -> outbound queue
//!   5. pump outbound
//! ```
//!
//! Nothing here awaits; the host decides the tick rate.

use std::net::SocketAddr;
use std::time::{Duration, Instant};

use log::{debug, info, warn};
use thiserror::Error;
use tokio::runtime::Handle;
use tokio::sync::mpsc;

use crate::config::{Debouncer, Reconfigure, Settings, SettingsField, SettingsStore};
use crate::core::constants::RECONFIGURE_DEBOUNCE;
use crate::core::{AvatarRig, CodecError, ConfigError, EncodeError};
use crate::mop::{BodyMeasurementSequencer, CalibrationPhase, OutboundMotionEncoder};
use crate::rig::RigError;
use crate::transport::{InboundTransport, OutboundSender, OutboundTransport, TransportError};
use crate::vmc::{AvatarPoseApplier, DispatchStats, ProtocolRouter};

/// Top-level errors.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// Socket failure.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// Settings failure.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// OSC codec failure.
    #[error("codec error: {0}")]
    Codec(#[from] CodecError),

    /// Motion encoder failure.
    #[error("encode error: {0}")]
    Encode(#[from] EncodeError),

    /// Invalid rig.
    #[error("rig error: {0}")]
    Rig(#[from] RigError),
}

/// Cloneable handle for changing settings from other tasks or threads.
///
/// Changes take effect on the bridge's next tick.
#[derive(Debug, Clone)]
pub struct ConfigHandle {
    tx: mpsc::UnboundedSender<Reconfigure>,
}

impl ConfigHandle {
    /// Queue a change. Returns `false` if the bridge is gone.
    pub fn send(&self, change: Reconfigure) -> bool {
        self.tx.send(change).is_ok()
    }

    /// Queue a text edit of one field.
    ///
    /// Invalid port text is rejected here and never reaches the bridge.
    pub fn edit(&self, field: SettingsField, text: &str) -> Result<bool, ConfigError> {
        Ok(self.send(Settings::parse_edit(field, text)?))
    }
}

/// What one tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickReport {
    /// Inbound messages drained.
    pub received: usize,
    /// How they were dispatched.
    pub dispatch: DispatchStats,
    /// Outbound datagrams sent.
    pub sent: usize,
    /// Calibration phase after the step.
    pub phase: CalibrationPhase,
}

/// VMC in, Mop out, for one avatar.
pub struct Bridge<R: AvatarRig> {
    rig: R,
    settings: Settings,
    store: Option<SettingsStore>,
    inbound: InboundTransport,
    outbound: OutboundTransport,
    router: ProtocolRouter,
    sequencer: BodyMeasurementSequencer,
    encoder: OutboundMotionEncoder,
    receive_restart: Debouncer<u16>,
    send_restart: Debouncer<(String, u16)>,
    changes_tx: mpsc::UnboundedSender<Reconfigure>,
    changes_rx: mpsc::UnboundedReceiver<Reconfigure>,
}

impl<R: AvatarRig> Bridge<R> {
    /// Create a stopped bridge. The send socket is registered on `runtime`.
    pub fn new(rig: R, settings: Settings, runtime: Handle) -> Self {
        let (changes_tx, changes_rx) = mpsc::unbounded_channel();
        Self {
            rig,
            settings,
            store: None,
            inbound: InboundTransport::new(),
            outbound: OutboundTransport::new(runtime),
            router: ProtocolRouter::new(),
            sequencer: BodyMeasurementSequencer::new(),
            encoder: OutboundMotionEncoder::new(),
            receive_restart: Debouncer::new(RECONFIGURE_DEBOUNCE),
            send_restart: Debouncer::new(RECONFIGURE_DEBOUNCE),
            changes_tx,
            changes_rx,
        }
    }

    /// Persist accepted changes to `store`.
    pub fn with_store(mut self, store: SettingsStore) -> Self {
        self.store = Some(store);
        self
    }

    /// Quiet period before a changed transport restarts.
    pub fn with_debounce(mut self, delay: Duration) -> Self {
        self.receive_restart = Debouncer::new(delay);
        self.send_restart = Debouncer::new(delay);
        self
    }

    /// Open both sockets from the current settings.
    ///
    /// Both are attempted; a failed one stays down until its settings change.
    /// The first failure is returned.
    pub fn start(&mut self) -> Result<(), BridgeError> {
        let inbound = self.restart_inbound();
        let outbound = self.restart_outbound();
        inbound?;
        outbound?;
        Ok(())
    }

    /// Run one tick at time `now`.
    pub fn tick(&mut self, now: Instant) -> TickReport {
        while let Ok(change) = self.changes_rx.try_recv() {
            self.reconfigure(change, now);
        }
        // Failures are logged by the restart; the side stays down until its next edit.
        if self.receive_restart.poll(now).is_some() && self.restart_inbound().is_err() {
            debug!("VMC receiver down until the receive port changes");
        }
        if self.send_restart.poll(now).is_some() && self.restart_outbound().is_err() {
            debug!("Mop sender down until the send endpoint changes");
        }

        let messages = self.inbound.drain();
        let dispatch = self
            .router
            .dispatch_all(&messages, &mut AvatarPoseApplier::new(&mut self.rig));

        if let Some(bundle) = self.sequencer.step(&mut self.rig, &mut self.encoder) {
            self.outbound.enqueue(bundle);
        }
        let sent = self.outbound.pump();

        TickReport {
            received: messages.len(),
            dispatch,
            sent,
            phase: self.sequencer.phase(),
        }
    }

    /// Apply a settings change now and schedule the affected restart.
    ///
    /// Returns `false` if the setting already had that value.
    pub fn reconfigure(&mut self, change: Reconfigure, now: Instant) -> bool {
        if !self.settings.apply(&change) {
            debug!("{change} unchanged");
            return false;
        }
        info!("settings changed: {change}");
        if let Some(store) = &self.store {
            if let Err(e) = store.save(&self.settings) {
                warn!("could not save settings to {}: {e}", store.path().display());
            }
        }

        if change.affects_inbound() {
            self.receive_restart.push(self.settings.receive_port, now);
        } else {
            let endpoint = (self.settings.send_host.clone(), self.settings.send_port);
            self.send_restart.push(endpoint, now);
        }
        true
    }

    /// Handle for sending settings changes.
    pub fn config_handle(&self) -> ConfigHandle {
        ConfigHandle {
            tx: self.changes_tx.clone(),
        }
    }

    /// Close both sockets. Safe to call more than once.
    pub fn shutdown(&mut self) {
        self.receive_restart.cancel();
        self.send_restart.cancel();
        self.inbound.stop();
        self.outbound.stop();
    }

    /// The avatar rig.
    pub fn rig(&self) -> &R {
        &self.rig
    }

    /// The avatar rig, mutably.
    pub fn rig_mut(&mut self) -> &mut R {
        &mut self.rig
    }

    /// Current settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Calibration phase.
    pub fn phase(&self) -> CalibrationPhase {
        self.sequencer.phase()
    }

    /// The motion encoder and its measurement.
    pub fn encoder(&self) -> &OutboundMotionEncoder {
        &self.encoder
    }

    /// Dispatch counters since creation.
    pub fn dispatch_totals(&self) -> DispatchStats {
        self.router.totals()
    }

    /// Bound VMC address, if receiving.
    pub fn inbound_addr(&self) -> Option<SocketAddr> {
        self.inbound.local_addr()
    }

    /// Mop destination, if sending.
    pub fn outbound_addr(&self) -> Option<SocketAddr> {
        self.outbound.remote_addr()
    }

    /// Handle for queueing extra outbound packets.
    pub fn outbound_sender(&self) -> OutboundSender {
        self.outbound.sender()
    }

    fn restart_inbound(&mut self) -> Result<SocketAddr, BridgeError> {
        self.inbound.start(self.settings.receive_port).map_err(|e| {
            warn!("cannot receive VMC on port {}: {e}", self.settings.receive_port);
            e.into()
        })
    }

    fn restart_outbound(&mut self) -> Result<SocketAddr, BridgeError> {
        let Settings {
            send_host,
            send_port,
            ..
        } = &self.settings;
        self.outbound.start(send_host, *send_port).map_err(|e| {
            warn!("cannot send Mop to {send_host}:{send_port}: {e}");
            e.into()
        })
    }
}

impl<R: AvatarRig> Drop for Bridge<R> {
    fn drop(&mut self) {
        self.shutdown();
    }
}
