//! Playback state classification
//!
//! Turns raw diagnostic dumps into an [`AppIdentity`] and a
//! [`PlaybackState`]. Scraping is best effort: any output that does not
//! match maps to "not detected" / `Unknown`, never to an error. Transport
//! failures do propagate, unretried.

mod foreground;
mod probes;

pub use foreground::ForegroundStrategy;
pub use probes::{default_probes, PlaybackProbe};

use tracing::debug;

use autoplay_protocol::{AppIdentity, PlaybackState};
use autoplay_utils::Result;

use crate::device::Device;

/// Result of one classification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub app: AppIdentity,
    pub state: PlaybackState,
}

impl Classification {
    pub fn unknown(app: AppIdentity) -> Self {
        Self {
            app,
            state: PlaybackState::Unknown,
        }
    }
}

/// Classifies what the device is playing
pub struct Classifier {
    strategy: ForegroundStrategy,
    probes: Vec<Box<dyn PlaybackProbe>>,
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new(ForegroundStrategy::default())
    }
}

impl Classifier {
    /// Create a classifier with the built-in probes
    pub fn new(strategy: ForegroundStrategy) -> Self {
        Self::with_probes(strategy, default_probes())
    }

    /// Create a classifier with a custom probe set
    pub fn with_probes(strategy: ForegroundStrategy, probes: Vec<Box<dyn PlaybackProbe>>) -> Self {
        Self { strategy, probes }
    }

    pub fn strategy(&self) -> ForegroundStrategy {
        self.strategy
    }

    /// Determine the foreground application
    pub async fn current_app(&self, device: &Device) -> Result<AppIdentity> {
        let output = device.shell(self.strategy.command()).await?;
        let app = self.strategy.parse(&output);
        if app == AppIdentity::NotDetected {
            debug!(strategy = ?self.strategy, "No foreground application in dump");
        }
        Ok(app)
    }

    /// Determine the foreground application and its playback state
    pub async fn classify(&self, device: &Device) -> Result<Classification> {
        let app = self.current_app(device).await?;

        let Some(probe) = self.probe_for(&app) else {
            // Unsupported or undetected app: no point issuing another dump.
            return Ok(Classification::unknown(app));
        };

        let output = device.shell(probe.command()).await?;
        let state = probe.interpret(&output);
        debug!(app = %app, state = %state, "Classified playback");

        Ok(Classification { app, state })
    }

    fn probe_for(&self, app: &AppIdentity) -> Option<&dyn PlaybackProbe> {
        let package = app.package()?;
        self.probes
            .iter()
            .find(|probe| probe.package() == package)
            .map(|probe| probe.as_ref())
    }
}
