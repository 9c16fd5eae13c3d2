use std::io::{self, Write};

use logger::{Color, Logger};

use super::sim_error::SimError;

/// Delivery surface for alert side effects. The real platform services
/// (system notifications, audio, haptics) are best-effort: a failed delivery
/// is logged and the alert still completes.
pub trait Notifier: Send + Sync {
    fn notify(&self, title: &str, body: &str) -> Result<(), SimError>;

    fn play_sound(&self) -> Result<(), SimError>;

    fn vibrate(&self) -> Result<(), SimError>;
}

/// Console stand-in for the platform notification surface.
pub struct ConsoleNotifier {
    logger: Logger,
}

impl ConsoleNotifier {
    pub fn new(logger: Logger) -> Self {
        ConsoleNotifier { logger }
    }
}

impl Notifier for ConsoleNotifier {
    fn notify(&self, title: &str, body: &str) -> Result<(), SimError> {
        println!("\n==============================================");
        println!("  {}", title);
        println!("  {}", body);
        println!("==============================================");
        self.logger
            .info(&format!("Notification shown: {}", title), Color::Cyan, false)
            .map_err(|e| SimError::Other(e.to_string()))?;
        Ok(())
    }

    fn play_sound(&self) -> Result<(), SimError> {
        // The terminal bell is the closest audio cue available here
        print!("\x07");
        io::stdout()
            .flush()
            .map_err(|e| SimError::Other(e.to_string()))?;
        Ok(())
    }

    fn vibrate(&self) -> Result<(), SimError> {
        self.logger
            .warn("Vibration not supported on this device", false)
            .map_err(|e| SimError::Other(e.to_string()))?;
        Ok(())
    }
}
