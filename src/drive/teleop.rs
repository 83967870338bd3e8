//! Fixed-period teleop loop: polls the normalizer once per cycle and
//! publishes the resulting [`DriveCommand`] through a watch channel.

use chrono::Local;
use statum::{machine, state};
use tokio::sync::watch;
use tracing::{debug, error, info};

use crate::drive::DriveCommand;
use crate::input::{ControlScheme, DeviceError, GilrsHub, Side, SwerveController};

// Teleop settings
#[derive(Clone, Debug)]
pub struct TeleopSettings {
    pub cycle_interval_ms: u64,
}

impl Default for TeleopSettings {
    fn default() -> Self {
        Self {
            cycle_interval_ms: 20,
        }
    }
}

// Teleop errors
#[derive(Debug, thiserror::Error)]
pub enum TeleopError {
    #[error("Failed to initialize teleop loop: {0}")]
    InitializationError(String),

    #[error("Failed to publish drive command: {0}")]
    PublishError(String),

    #[error("Device error: {0}")]
    DeviceError(#[from] DeviceError),
}

// Teleop loop states
#[state]
#[derive(Debug, Clone)]
pub enum TeleopState {
    Initializing,
    Driving,
}

#[machine]
pub struct TeleopLoop<S: TeleopState> {
    // Shared gilrs context, pumped once per cycle
    hub: GilrsHub,

    // The normalizer this loop polls
    controller: SwerveController,

    // Loop settings
    settings: TeleopSettings,

    // Command channel endpoints
    command_sender: watch::Sender<DriveCommand>,
    command_receiver: watch::Receiver<DriveCommand>,
}

// Methods available in all states
impl<S: TeleopState> TeleopLoop<S> {
    pub fn settings(&self) -> &TeleopSettings {
        &self.settings
    }

    // Get a receiver for the published drive commands
    pub fn subscribe(&self) -> watch::Receiver<DriveCommand> {
        self.command_receiver.clone()
    }
}

impl TeleopLoop<Initializing> {
    pub fn create(
        hub: GilrsHub,
        controller: SwerveController,
        settings: Option<TeleopSettings>,
    ) -> Result<Self, TeleopError> {
        let settings = settings.unwrap_or_default();
        debug!("Creating teleop loop with settings: {:?}", settings);

        let (command_sender, command_receiver) = watch::channel(DriveCommand::default());

        Ok(Self::new(
            hub,
            controller,
            settings,
            command_sender,
            command_receiver,
        ))
    }

    // Bring device state up to date and transition to Driving
    pub fn initialize(self) -> Result<TeleopLoop<Driving>, TeleopError> {
        info!(
            "Initializing teleop loop: source {:?}, scheme {:?}, cycle {}ms",
            self.controller.source(),
            self.controller.scheme(),
            self.settings.cycle_interval_ms
        );

        self.hub.pump();

        info!("Teleop loop initialized, transitioning to Driving state");
        Ok(self.transition())
    }
}

impl TeleopLoop<Driving> {
    // Run one polling cycle: pump devices, query the normalizer, publish
    pub fn drive_cycle(&mut self) -> Result<(), TeleopError> {
        self.hub.pump();

        let velocity_summary = format!(
            "mag {:.2} dir {:.1} deg",
            self.controller.magnitude(Side::Left),
            self.controller.direction_degrees(Side::Left)
        );

        let command = match self.controller.scheme() {
            ControlScheme::HaloDrive => {
                let rotation_rate = self.controller.halo_rotation_rate();
                debug!("Halo cycle: {} rate {:.2}", velocity_summary, rotation_rate);
                DriveCommand::Halo {
                    velocity: self.controller.halo_velocity_vector(),
                    rotation_rate,
                    high_gear: self.controller.high_gear_enabled(),
                    timestamp: Local::now(),
                }
            }
            ControlScheme::AngleDrive => {
                let heading_degrees = self.controller.angle_drive_heading();
                debug!(
                    "Angle cycle: {} heading {:.1} deg",
                    velocity_summary, heading_degrees
                );
                DriveCommand::Angle {
                    velocity: self.controller.angle_velocity_vector(),
                    heading_degrees,
                    high_gear: self.controller.high_gear_enabled(),
                    timestamp: Local::now(),
                }
            }
        };

        self.command_sender
            .send(command)
            .map_err(|e| TeleopError::PublishError(e.to_string()))?;

        Ok(())
    }
}

// Public interface for spawning and running the teleop loop
pub struct TeleopHandle {
    command_receiver: watch::Receiver<DriveCommand>,
}

impl TeleopHandle {
    // Create a new teleop loop and spawn it as a tokio task
    pub fn spawn(
        hub: GilrsHub,
        controller: SwerveController,
        settings: Option<TeleopSettings>,
    ) -> Result<Self, TeleopError> {
        info!("Spawning teleop loop with settings: {:?}", settings);

        let teleop = TeleopLoop::create(hub, controller, settings)?;
        let command_receiver = teleop.subscribe();

        info!("Spawning teleop task");
        let task_handle = tokio::spawn(async move {
            if let Err(e) = run_teleop_loop(teleop).await {
                error!("Teleop task terminated with error: {}", e);
            } else {
                info!("Teleop task finished"); // This shouldn't happen in practice
            }
        });

        debug!("Tokio task spawned with handle: {:?}", task_handle);
        info!("Teleop loop successfully started");

        Ok(Self { command_receiver })
    }

    // Get a receiver for the published drive commands
    pub fn subscribe(&self) -> watch::Receiver<DriveCommand> {
        self.command_receiver.clone()
    }
}

// Run the teleop loop
async fn run_teleop_loop(teleop: TeleopLoop<Initializing>) -> Result<(), TeleopError> {
    let mut teleop = teleop.initialize()?;

    let mut interval_timer = tokio::time::interval(tokio::time::Duration::from_millis(
        teleop.settings().cycle_interval_ms,
    ));

    // Stats for performance monitoring
    let mut cycles: u64 = 0;
    let mut last_stats_time = Local::now();
    let stats_interval = chrono::Duration::seconds(30);

    info!("Entering main teleop loop");
    loop {
        interval_timer.tick().await;

        teleop.drive_cycle()?;
        cycles += 1;

        // Log stats periodically
        let now = Local::now();
        if now - last_stats_time > stats_interval {
            let elapsed_seconds = (now - last_stats_time).num_seconds();
            info!(
                "Teleop stats: {} cycles in {} seconds ({:.2} cycles/sec)",
                cycles,
                elapsed_seconds,
                cycles as f64 / elapsed_seconds as f64
            );
            cycles = 0;
            last_stats_time = now;
        }
    }
}
