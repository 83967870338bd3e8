pub mod config;
pub mod drive;
pub mod input;

use crate::config::SwervepilotConfig;
use crate::drive::teleop::{TeleopHandle, TeleopSettings};
use crate::drive::DriveCommand;
use crate::input::{GilrsHub, GilrsStick, Side, SwerveController};
use color_eyre::{eyre::eyre, Result};
use tracing::{debug, info, Level};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    setup()?;

    info!("Loading swervepilot configuration");
    let config = SwervepilotConfig::load_or_default();
    debug!("Active config: {:?}", config);

    // Device layer
    let hub = GilrsHub::new().map_err(|e| eyre!("Failed to initialize device layer: {}", e))?;

    let controller = SwerveController::new(
        Box::new(GilrsStick::joystick(
            &hub,
            config.left_joystick_index,
            config.shift_button,
        )),
        Box::new(GilrsStick::joystick(
            &hub,
            config.right_joystick_index,
            config.shift_button,
        )),
        Box::new(GilrsStick::pad_stick(&hub, config.gamepad_index, Side::Left)),
        Box::new(GilrsStick::pad_stick(
            &hub,
            config.gamepad_index,
            Side::Right,
        )),
        config.source,
        config.scheme,
    );

    let teleop_settings = TeleopSettings {
        cycle_interval_ms: config.cycle_interval_ms,
    };
    let teleop_handle = TeleopHandle::spawn(hub, controller, Some(teleop_settings))
        .map_err(|e| eyre!("Failed to spawn teleop loop: {}", e))?;

    // Stand-in for the drivetrain control loop: follow published commands
    // until shutdown.
    let mut commands = teleop_handle.subscribe();
    info!("Swervepilot running, press Ctrl-C to stop");
    loop {
        tokio::select! {
            changed = commands.changed() => {
                if changed.is_err() {
                    return Err(eyre!("Teleop loop stopped publishing"));
                }
                log_command(&commands.borrow_and_update());
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Shutdown requested");
                return Ok(());
            }
        }
    }
}

fn log_command(command: &DriveCommand) {
    match command {
        DriveCommand::Halo {
            velocity,
            rotation_rate,
            high_gear,
            ..
        } => {
            debug!(
                "Drive: mag {:.2} dir {:.1} deg, rate {:.2}, high gear {}",
                velocity.mag(),
                velocity.angle_degrees(),
                rotation_rate,
                high_gear
            );
        }
        DriveCommand::Angle {
            velocity,
            heading_degrees,
            high_gear,
            ..
        } => {
            debug!(
                "Drive: mag {:.2} dir {:.1} deg, heading {:.1} deg, high gear {}",
                velocity.mag(),
                velocity.angle_degrees(),
                heading_degrees,
                high_gear
            );
        }
    }
}

fn setup() -> Result<()> {
    if std::env::var("RUST_LIB_BACKTRACE").is_err() {
        std::env::set_var("RUST_LIB_BACKTRACE", "0")
    }
    color_eyre::install()?;
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info")
    }
    setup_logging_env();
    Ok(())
}

fn setup_logging_env() {
    FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(false)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .pretty()
        .init();
}
